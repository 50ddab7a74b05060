//! Character entities - The finalized sheet handed to renderers

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    Ability, AbilityScores, CharacterId, Currency, FeatureInfo, ResolvedEquipmentItem, TraitInfo,
};

/// The finalized, fully-derived character.
///
/// Produced by [`compute_derived`](crate::domain::services::derivation::compute_derived)
/// and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DerivedCharacter {
    // Identity
    pub name: String,
    /// Display string, `"Species (Subspecies)"` when a subspecies is chosen
    pub species: String,
    pub subspecies: Option<String>,
    pub civilization: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub level: u8,
    pub experience: u32,
    pub background: String,
    pub alignment: String,

    // Abilities
    pub abilities: AbilityScores,
    pub ability_modifiers: AbilityScores,

    // Combat
    pub hit_points_max: i32,
    pub hit_points_current: i32,
    pub hit_points_temporary: i32,
    pub wound_threshold: i32,
    pub armor_class: i32,
    pub initiative: i32,
    pub proficiency_bonus: i32,
    pub weapon_attacks: Vec<WeaponAttack>,

    // Movement
    pub speed: f64,
    pub speed_climb: f64,
    pub speed_swim: f64,
    pub jump_height: i32,
    pub jump_length: i32,

    // Perception
    pub passive_perception: i32,
    pub has_darkvision: bool,
    pub darkvision_radius: f64,

    // Proficiencies
    pub saving_throws: Vec<String>,
    pub saving_throw_bonuses: BTreeMap<Ability, i32>,
    pub skills: Vec<String>,
    pub skill_bonuses: BTreeMap<String, i32>,
    pub armor_proficiencies: Vec<String>,
    pub weapon_proficiencies: Vec<String>,
    pub tool_proficiencies: Vec<String>,
    pub languages: Vec<String>,

    // Capabilities
    pub racial_traits: Vec<TraitInfo>,
    pub class_features: Vec<FeatureInfo>,
    pub resistances: Vec<String>,
    pub immunities: Vec<String>,

    pub spellcasting: Option<SpellcastingBlock>,

    // Equipment
    pub equipment: Vec<ResolvedEquipmentItem>,
    pub currency: Currency,

    // Roleplay
    pub description: String,
    pub traits: String,
    pub ideal: String,
    pub bonds: String,
    pub flaws: String,
    pub handicap: String,
    pub story: String,
}

/// Spellcasting numbers for a level-1 caster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellcastingBlock {
    pub ability: Ability,
    pub spell_save_dc: i32,
    pub spell_attack_bonus: i32,
    pub progression: SpellProgression,
}

/// Cantrips, spells known and slots.
///
/// There is no levelling system, so these are reported as not computed
/// rather than as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpellProgression {
    #[default]
    NotComputed,
    Computed {
        cantrips_known: u32,
        spells_known: u32,
        spell_slots: Vec<u32>,
    },
}

/// An attack line for a carried weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponAttack {
    pub name: String,
    pub ability: Ability,
    pub attack_bonus: i32,
    /// e.g. `"1d8+3 tranchant"`
    pub damage: String,
}

/// A finalized character kept in the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCharacter {
    pub id: CharacterId,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub character: DerivedCharacter,
}

impl SavedCharacter {
    /// Stamp a freshly finalized character
    pub fn new(character: DerivedCharacter) -> Self {
        Self {
            id: CharacterId::new(),
            created_at: Utc::now(),
            updated_at: None,
            character,
        }
    }

    pub fn name(&self) -> &str {
        &self.character.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_character_flattens_sheet() {
        let saved = SavedCharacter::new(DerivedCharacter {
            name: "Ysolde".into(),
            class_name: "Magicien".into(),
            ..DerivedCharacter::default()
        });
        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(value["name"], "Ysolde");
        assert_eq!(value["class"], "Magicien");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_none());

        let back: SavedCharacter = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, saved.id);
        assert_eq!(back.name(), "Ysolde");
    }

    #[test]
    fn test_spell_progression_not_computed_by_default() {
        let json = serde_json::to_value(SpellProgression::default()).unwrap();
        assert_eq!(json["status"], "not_computed");
    }
}
