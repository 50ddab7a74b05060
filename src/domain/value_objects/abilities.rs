//! Ability scores and the point-buy cost table

use serde::{Deserialize, Serialize};

use crate::domain::services::matching::normalize;

/// Points available to spend when a build starts
pub const STARTING_POINTS: i32 = 15;
/// Score every ability starts at
pub const DEFAULT_ABILITY_SCORE: i32 = 10;
/// Lowest score the point-buy allows
pub const MIN_ABILITY_SCORE: i32 = 6;
/// Highest score the point-buy allows
pub const MAX_ABILITY_SCORE: i32 = 15;

/// Point cost of a base score. Scores below 10 refund points.
pub fn point_cost(score: i32) -> Option<i32> {
    match score {
        6 => Some(-3),
        7 | 8 => Some(-2),
        9 => Some(-1),
        10 => Some(0),
        11 => Some(1),
        12 => Some(2),
        13 => Some(3),
        14 => Some(5),
        15 => Some(7),
        _ => None,
    }
}

/// The six abilities, keyed by their French names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Force,
    Dexterite,
    Constitution,
    Intelligence,
    Sagesse,
    Charisme,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Force,
        Ability::Dexterite,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Sagesse,
        Ability::Charisme,
    ];

    /// Storage key, as used by catalog bonus maps
    pub fn key(&self) -> &'static str {
        match self {
            Self::Force => "force",
            Self::Dexterite => "dexterite",
            Self::Constitution => "constitution",
            Self::Intelligence => "intelligence",
            Self::Sagesse => "sagesse",
            Self::Charisme => "charisme",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Force => "Force",
            Self::Dexterite => "Dextérité",
            Self::Constitution => "Constitution",
            Self::Intelligence => "Intelligence",
            Self::Sagesse => "Sagesse",
            Self::Charisme => "Charisme",
        }
    }

    /// Parse an ability from a key or label, ignoring case and accents
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = normalize(name);
        Self::ALL
            .into_iter()
            .find(|ability| ability.key() == normalized)
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One score per ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub force: i32,
    pub dexterite: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub sagesse: i32,
    pub charisme: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::uniform(DEFAULT_ABILITY_SCORE)
    }
}

impl AbilityScores {
    pub fn uniform(value: i32) -> Self {
        Self {
            force: value,
            dexterite: value,
            constitution: value,
            intelligence: value,
            sagesse: value,
            charisme: value,
        }
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Force => self.force,
            Ability::Dexterite => self.dexterite,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Sagesse => self.sagesse,
            Ability::Charisme => self.charisme,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        match ability {
            Ability::Force => self.force = value,
            Ability::Dexterite => self.dexterite = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Sagesse => self.sagesse = value,
            Ability::Charisme => self.charisme = value,
        }
    }

    pub fn with(mut self, ability: Ability, value: i32) -> Self {
        self.set(ability, value);
        self
    }

    /// Apply `f` to every score
    pub fn map(&self, f: impl Fn(Ability, i32) -> i32) -> Self {
        let mut out = *self;
        for ability in Ability::ALL {
            out.set(ability, f(ability, self.get(ability)));
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::ALL.into_iter().map(move |a| (a, self.get(a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_cost_table() {
        let costs: Vec<i32> = (6..=15).filter_map(point_cost).collect();
        assert_eq!(costs, vec![-3, -2, -2, -1, 0, 1, 2, 3, 5, 7]);
        assert_eq!(point_cost(5), None);
        assert_eq!(point_cost(16), None);
    }

    #[test]
    fn test_ability_from_name() {
        assert_eq!(Ability::from_name("Dextérité"), Some(Ability::Dexterite));
        assert_eq!(Ability::from_name(" sagesse "), Some(Ability::Sagesse));
        assert_eq!(Ability::from_name("Strength"), None);
    }

    #[test]
    fn test_ability_serializes_as_key() {
        let json = serde_json::to_string(&Ability::Dexterite).unwrap();
        assert_eq!(json, "\"dexterite\"");
    }

    #[test]
    fn test_scores_get_set() {
        let scores = AbilityScores::default().with(Ability::Charisme, 14);
        assert_eq!(scores.get(Ability::Charisme), 14);
        assert_eq!(scores.get(Ability::Force), 10);
        assert_eq!(scores.iter().count(), 6);
    }
}
