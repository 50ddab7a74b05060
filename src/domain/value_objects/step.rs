//! Creation flow steps

use serde::{Deserialize, Serialize};

/// A step of the 9-step creation flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Step(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Step {0} is outside 1..={total}", total = Step::TOTAL)]
pub struct StepOutOfRange(pub u8);

impl Step {
    pub const TOTAL: u8 = 9;
    pub const FIRST: Step = Step(1);
    pub const LAST: Step = Step(Self::TOTAL);

    pub fn new(number: u8) -> Option<Self> {
        (1..=Self::TOTAL).contains(&number).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.0.checked_sub(1).and_then(Self::new)
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }

    pub fn title(self) -> &'static str {
        match self.0 {
            1 => "Espèce",
            2 => "Civilisation",
            3 => "Classe",
            4 => "Caractéristiques",
            5 => "Compétences",
            6 => "Équipement",
            7 => "Langues",
            8 => "Identité",
            _ => "Résumé",
        }
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for Step {
    type Error = StepOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(StepOutOfRange(value))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.0
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::TOTAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_bounds() {
        assert!(Step::new(0).is_none());
        assert!(Step::new(10).is_none());
        assert_eq!(Step::FIRST.previous(), None);
        assert_eq!(Step::LAST.next(), None);
        assert_eq!(Step::FIRST.next(), Step::new(2));
    }

    #[test]
    fn test_step_deserialization_rejects_out_of_range() {
        assert!(serde_json::from_str::<Step>("12").is_err());
        assert_eq!(serde_json::from_str::<Step>("4").unwrap().number(), 4);
    }
}
