//! BuildState entity - The character being assembled by the creation flow

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    Ability, AbilityScores, CivilizationId, ClassId, Currency, EquipmentChoiceSlot,
    EquipmentOption, FeatureInfo, ResolvedEquipmentItem, SpeciesId, SubspeciesId, TraitInfo,
    STARTING_POINTS,
};

/// Walking speed in meters when no species is chosen
pub const DEFAULT_SPEED_METERS: f64 = 9.0;
/// Size category when no species is chosen
pub const DEFAULT_SIZE: &str = "M";

/// The in-progress character record.
///
/// Grouped by the creation step that fills each part. Every field has a
/// default so partially written drafts still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildState {
    // Step 1 - Species
    pub species_id: Option<SpeciesId>,
    pub species_name: Option<String>,
    pub subspecies_id: Option<SubspeciesId>,
    pub subspecies_name: Option<String>,
    pub racial_bonuses: BTreeMap<Ability, i32>,
    pub species_traits: Vec<TraitInfo>,
    pub species_speed: f64,
    pub species_size: String,
    pub species_languages: Vec<String>,
    pub species_resistances: Vec<String>,
    pub has_darkvision: bool,
    pub darkvision_radius: f64,

    // Step 2 - Civilization
    pub civilization_id: Option<CivilizationId>,
    pub civilization_name: Option<String>,
    pub civilization_languages: Vec<String>,

    // Step 3 - Class
    pub class_id: Option<ClassId>,
    pub class_name: Option<String>,
    /// Flat hit point base granted by the class
    pub hit_die: i32,
    pub has_spellcasting: bool,
    pub spellcasting_ability: Option<Ability>,
    pub saving_throws: Vec<String>,
    pub armor_proficiencies: Vec<String>,
    pub weapon_proficiencies: Vec<String>,
    pub tool_proficiencies: Vec<String>,
    pub skill_options: Vec<String>,
    pub skill_choose_count: usize,
    pub class_features: Vec<FeatureInfo>,
    pub starting_equipment: Vec<EquipmentChoiceSlot>,

    // Step 4 - Abilities
    pub base_abilities: AbilityScores,
    pub points_remaining: i32,

    // Step 5 - Skills
    pub selected_skills: Vec<String>,

    // Step 6 - Equipment
    /// Selected option per starting-equipment slot index
    pub equipment_selections: BTreeMap<usize, EquipmentOption>,
    pub selected_equipment: Vec<ResolvedEquipmentItem>,
    pub currency: Currency,

    // Step 7 - Languages
    pub languages: BTreeSet<String>,

    // Step 8 - Identity
    pub name: String,
    pub description: String,
    pub background: String,
    pub alignment: String,
    pub traits: String,
    pub ideal: String,
    pub bonds: String,
    pub flaws: String,
    pub handicap: String,
    pub story: String,
}

impl Default for BuildState {
    fn default() -> Self {
        Self {
            species_id: None,
            species_name: None,
            subspecies_id: None,
            subspecies_name: None,
            racial_bonuses: BTreeMap::new(),
            species_traits: Vec::new(),
            species_speed: DEFAULT_SPEED_METERS,
            species_size: DEFAULT_SIZE.to_string(),
            species_languages: Vec::new(),
            species_resistances: Vec::new(),
            has_darkvision: false,
            darkvision_radius: 0.0,

            civilization_id: None,
            civilization_name: None,
            civilization_languages: Vec::new(),

            class_id: None,
            class_name: None,
            hit_die: 0,
            has_spellcasting: false,
            spellcasting_ability: None,
            saving_throws: Vec::new(),
            armor_proficiencies: Vec::new(),
            weapon_proficiencies: Vec::new(),
            tool_proficiencies: Vec::new(),
            skill_options: Vec::new(),
            skill_choose_count: 0,
            class_features: Vec::new(),
            starting_equipment: Vec::new(),

            base_abilities: AbilityScores::default(),
            points_remaining: STARTING_POINTS,

            selected_skills: Vec::new(),

            equipment_selections: BTreeMap::new(),
            selected_equipment: Vec::new(),
            currency: Currency::default(),

            languages: BTreeSet::new(),

            name: String::new(),
            description: String::new(),
            background: String::new(),
            alignment: String::new(),
            traits: String::new(),
            ideal: String::new(),
            bonds: String::new(),
            flaws: String::new(),
            handicap: String::new(),
            story: String::new(),
        }
    }
}

impl BuildState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn racial_bonus(&self, ability: Ability) -> i32 {
        self.racial_bonuses.get(&ability).copied().unwrap_or(0)
    }

    /// Species as shown on the sheet: `"Species (Subspecies)"` or `"Species"`
    pub fn species_display(&self) -> String {
        let species = self.species_name.clone().unwrap_or_default();
        match &self.subspecies_name {
            Some(subspecies) => format!("{} ({})", species, subspecies),
            None => species,
        }
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.selected_skills.iter().any(|s| s == skill)
    }

    pub fn can_select_more_skills(&self) -> bool {
        self.selected_skills.len() < self.skill_choose_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_build() {
        let state = BuildState::new();
        assert_eq!(state.points_remaining, 15);
        assert_eq!(state.base_abilities, AbilityScores::uniform(10));
        assert_eq!(state.species_speed, 9.0);
        assert_eq!(state.species_size, "M");
        assert!(state.languages.is_empty());
    }

    #[test]
    fn test_species_display() {
        let mut state = BuildState::new();
        state.species_name = Some("Elfe".into());
        assert_eq!(state.species_display(), "Elfe");
        state.subspecies_name = Some("Elfe des bois".into());
        assert_eq!(state.species_display(), "Elfe (Elfe des bois)");
    }

    #[test]
    fn test_partial_draft_loads_with_defaults() {
        let state: BuildState = serde_json::from_str(r#"{"name":"Aldric","pointsRemaining":3}"#)
            .expect("partial build should deserialize");
        assert_eq!(state.name, "Aldric");
        assert_eq!(state.points_remaining, 3);
        assert_eq!(state.species_speed, 9.0);
    }
}
