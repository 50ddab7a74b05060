//! Named traits and class features shown on the sheet

use serde::{Deserialize, Serialize};

/// A species trait
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl TraitInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A class feature gained at a given level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub level: u8,
}

impl FeatureInfo {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            level,
        }
    }
}
