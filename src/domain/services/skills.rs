//! Skill list and skill option expansion

use crate::domain::value_objects::Ability;

use super::matching::normalize;

/// Every skill of the game with the ability it keys off
pub const SKILLS: [(&str, Ability); 18] = [
    ("Acrobaties", Ability::Dexterite),
    ("Arcanes", Ability::Intelligence),
    ("Athlétisme", Ability::Force),
    ("Discrétion", Ability::Dexterite),
    ("Dressage", Ability::Sagesse),
    ("Escamotage", Ability::Dexterite),
    ("Histoire", Ability::Intelligence),
    ("Intimidation", Ability::Charisme),
    ("Intuition", Ability::Sagesse),
    ("Investigation", Ability::Intelligence),
    ("Médecine", Ability::Sagesse),
    ("Nature", Ability::Intelligence),
    ("Perception", Ability::Sagesse),
    ("Persuasion", Ability::Charisme),
    ("Religion", Ability::Intelligence),
    ("Représentation", Ability::Charisme),
    ("Survie", Ability::Sagesse),
    ("Tromperie", Ability::Charisme),
];

/// Option texts meaning "any skill"
const ANY_SKILL_KEYWORDS: [&str; 7] = [
    "toutes",
    "au choix",
    "any",
    "all",
    "libre",
    "n'importe laquelle",
    "n'importe lesquelles",
];

/// Outcome of a toggle on a capped selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The cap was reached; nothing changed
    Ignored,
}

pub fn skill_ability(skill: &str) -> Option<Ability> {
    let wanted = normalize(skill);
    SKILLS
        .iter()
        .find(|(name, _)| normalize(name) == wanted)
        .map(|(_, ability)| *ability)
}

/// Skills a class lets the player pick from.
///
/// An empty option list, or one containing an "any skill" wording,
/// opens the full skill list.
pub fn available_skills(options: &[String]) -> Vec<String> {
    let opens_all = options.is_empty()
        || options.iter().any(|option| {
            let option = option.to_lowercase();
            let option = option.trim();
            ANY_SKILL_KEYWORDS.iter().any(|keyword| option.contains(keyword))
        });

    if opens_all {
        SKILLS.iter().map(|(name, _)| name.to_string()).collect()
    } else {
        options.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_ability_lookup() {
        assert_eq!(skill_ability("Perception"), Some(Ability::Sagesse));
        assert_eq!(skill_ability("athletisme"), Some(Ability::Force));
        assert_eq!(skill_ability("Cuisine"), None);
    }

    #[test]
    fn test_available_skills_expansion() {
        assert_eq!(available_skills(&[]).len(), 18);
        assert_eq!(available_skills(&["Deux compétences au choix".into()]).len(), 18);

        let options = vec!["Athlétisme".to_string(), "Survie".to_string()];
        assert_eq!(available_skills(&options), options);
    }
}
