use serde::{Deserialize, Serialize};

/// Coins carried by a character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub or: u32,
    pub argent: u32,
    pub cuivre: u32,
}

/// Partial currency update; absent denominations keep their value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrencyUpdate {
    pub or: Option<u32>,
    pub argent: Option<u32>,
    pub cuivre: Option<u32>,
}

impl Currency {
    pub fn apply(self, update: CurrencyUpdate) -> Self {
        Self {
            or: update.or.unwrap_or(self.or),
            argent: update.argent.unwrap_or(self.argent),
            cuivre: update.cuivre.unwrap_or(self.cuivre),
        }
    }
}
