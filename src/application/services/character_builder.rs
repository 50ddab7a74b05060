//! Character Builder - The build state store behind the 9-step creation flow
//!
//! The builder owns the current [`BuildState`] snapshot, the step index and
//! the edit marker. Every mutation clones the snapshot, applies the change
//! and swaps in a new `Arc`, then mirrors the result to the draft slot.
//! Snapshots handed out earlier never change.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::application::ports::outbound::{CatalogError, CatalogPort};
use crate::domain::entities::{
    BuildState, ClassDetail, DerivedCharacter, SavedCharacter, SpeciesDetail, Subspecies,
};
use crate::domain::services::languages::{is_choice_placeholder, LanguagePlan, FALLBACK_LANGUAGES};
use crate::domain::services::{compute_derived, skills, steps, ToggleOutcome};
use crate::domain::value_objects::{
    point_cost, Ability, CharacterId, CivilizationId, ClassId, CurrencyUpdate, EditMarker,
    EquipmentChoiceSlot, EquipmentOption, FeatureInfo, ResolvedEquipmentItem, SpeciesId, Step,
    SubspeciesId, TraitInfo, MAX_ABILITY_SCORE, MIN_ABILITY_SCORE,
};
use crate::infrastructure::config::EngineConfig;

use super::draft_persistence::{remap_saved_character, DraftPersistence, PersistedDraft};
use super::equipment_resolver::{all_choices_made, EquipmentResolution, EquipmentResolver};

/// A rejected build mutation. The build is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationRejected {
    #[error(
        "{ability} score {value} is outside {min}..={max}",
        min = MIN_ABILITY_SCORE,
        max = MAX_ABILITY_SCORE
    )]
    OutOfRange { ability: Ability, value: i32 },
    #[error("{ability} needs {needed} points but only {remaining} remain")]
    InsufficientPoints {
        ability: Ability,
        needed: i32,
        remaining: i32,
    },
    #[error("No starting-equipment slot at index {0}")]
    UnknownEquipmentSlot(usize),
    #[error("Starting-equipment slot {slot} does not offer option {option}")]
    OptionUnavailable { slot: usize, option: EquipmentOption },
}

/// Everything a species choice sets, as one bundle
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesSelection {
    pub species_id: SpeciesId,
    pub species_name: String,
    pub subspecies_id: Option<SubspeciesId>,
    pub subspecies_name: Option<String>,
    pub racial_bonuses: BTreeMap<Ability, i32>,
    pub traits: Vec<TraitInfo>,
    pub speed: f64,
    pub size: String,
    pub languages: Vec<String>,
    pub resistances: Vec<String>,
    pub has_darkvision: bool,
    pub darkvision_radius: f64,
}

impl SpeciesSelection {
    /// Bundle a catalog species. Subspecies bonuses add onto the species
    /// bonuses and subspecies traits follow the species traits.
    pub fn from_catalog(species: &SpeciesDetail, subspecies: Option<&Subspecies>) -> Self {
        let mut racial_bonuses = BTreeMap::new();
        let sub_bonuses = subspecies
            .into_iter()
            .flat_map(|sub| sub.additional_stats.ability_bonuses.iter());
        for (key, bonus) in species.base_stats.ability_bonuses.iter().chain(sub_bonuses) {
            match Ability::from_name(key) {
                Some(ability) => *racial_bonuses.entry(ability).or_insert(0) += bonus,
                None => debug!(key = %key, "Ignoring bonus for unknown ability"),
            }
        }

        let mut traits = species.traits.clone();
        if let Some(sub) = subspecies {
            traits.extend(sub.additional_traits.iter().cloned());
        }

        Self {
            species_id: species.id.clone(),
            species_name: species.name.clone(),
            subspecies_id: subspecies.map(|s| s.id.clone()),
            subspecies_name: subspecies.map(|s| s.name.clone()),
            racial_bonuses,
            traits,
            speed: species.base_stats.speed_meters,
            size: species.base_stats.size_category.clone(),
            languages: species.languages.clone(),
            resistances: Vec::new(),
            has_darkvision: species.base_stats.has_darkvision,
            darkvision_radius: species.base_stats.darkvision_radius_meters,
        }
    }
}

/// Everything a class choice sets, as one bundle
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSelection {
    pub class_id: ClassId,
    pub class_name: String,
    pub hit_die: i32,
    pub spellcasting_ability: Option<Ability>,
    pub has_spellcasting: bool,
    pub saving_throws: Vec<String>,
    pub armor_proficiencies: Vec<String>,
    pub weapon_proficiencies: Vec<String>,
    pub tool_proficiencies: Vec<String>,
    pub skill_options: Vec<String>,
    pub skill_choose_count: usize,
    pub features: Vec<FeatureInfo>,
    pub starting_equipment: Vec<EquipmentChoiceSlot>,
}

impl ClassSelection {
    /// Bundle a catalog class with its level-1 features
    pub fn from_catalog(class: &ClassDetail) -> Self {
        let spellcasting_ability = class.spellcasting.as_ref().and_then(|casting| {
            let ability = Ability::from_name(&casting.ability);
            if ability.is_none() {
                warn!(ability = %casting.ability, class = %class.name, "Unknown spellcasting ability");
            }
            ability
        });

        Self {
            class_id: class.id.clone(),
            class_name: class.name.clone(),
            hit_die: class.hit_die,
            spellcasting_ability,
            has_spellcasting: class.spellcasting.is_some(),
            saving_throws: class.proficiencies.saving_throws.clone(),
            armor_proficiencies: class.proficiencies.armor.clone(),
            weapon_proficiencies: class.proficiencies.weapons.clone(),
            tool_proficiencies: class.proficiencies.tools.clone(),
            skill_options: class.proficiencies.skills.options.clone(),
            skill_choose_count: class.proficiencies.skills.choose_count,
            features: class
                .features_at(1)
                .map(|feature| FeatureInfo::new(feature.clone(), 1))
                .collect(),
            starting_equipment: class.starting_equipment.clone(),
        }
    }
}

/// Partial update of the narrative fields; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub background: Option<String>,
    pub alignment: Option<String>,
    pub traits: Option<String>,
    pub ideal: Option<String>,
    pub bonds: Option<String>,
    pub flaws: Option<String>,
    pub handicap: Option<String>,
    pub story: Option<String>,
}

pub struct CharacterBuilder {
    state: Arc<BuildState>,
    step: Step,
    editing: Option<EditMarker>,
    persistence: DraftPersistence,
}

impl CharacterBuilder {
    /// Start from the stored draft, or from an empty build
    pub fn new(persistence: DraftPersistence) -> Self {
        let draft = persistence.load().unwrap_or_default();
        Self {
            state: Arc::new(draft.character),
            step: draft.step,
            editing: draft.editing,
            persistence,
        }
    }

    /// Open the builder over the configured storage directory and pick up
    /// any pending edit request
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let store = config
            .open_store()
            .context("Failed to open build storage")?;
        let mut builder = Self::new(DraftPersistence::new(store, config.keys.clone()));
        builder.check_for_edit_mode();
        Ok(builder)
    }

    // =========================================================================
    // Snapshot plumbing
    // =========================================================================

    fn update(&mut self, apply: impl FnOnce(&mut BuildState)) {
        debug!(step = %self.step, "Build updated");
        let mut next = BuildState::clone(&self.state);
        apply(&mut next);
        self.state = Arc::new(next);
        self.persist();
    }

    /// Apply a change to the species or civilization bundle, then rebuild
    /// the language set against the new sources
    fn update_language_sources(&mut self, apply: impl FnOnce(&mut BuildState)) {
        self.update(|state| {
            let previous = LanguagePlan::from_sources(&state.species_languages, &state.civilization_languages);
            apply(state);
            let next = LanguagePlan::from_sources(&state.species_languages, &state.civilization_languages);
            state.languages = next.reconcile(&previous, &state.languages);
        });
    }

    fn persist(&self) {
        self.persistence.save(&PersistedDraft {
            character: BuildState::clone(&self.state),
            step: self.step,
            editing: self.editing,
        });
    }

    // =========================================================================
    // Edit mode
    // =========================================================================

    /// Consume a pending edit request. The saved character replaces the
    /// build and the flow jumps to the summary step.
    #[instrument(skip(self))]
    pub fn check_for_edit_mode(&mut self) -> bool {
        let Some(saved) = self.persistence.take_edit_request() else {
            return false;
        };
        let (state, marker) = remap_saved_character(&saved);
        info!(character_id = %marker.id, name = %saved.name(), "Editing saved character");
        self.state = Arc::new(state);
        self.editing = Some(marker);
        self.step = Step::LAST;
        self.persist();
        true
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_character_id(&self) -> Option<CharacterId> {
        self.editing.map(|marker| marker.id)
    }

    pub fn editing_created_at(&self) -> Option<DateTime<Utc>> {
        self.editing.map(|marker| marker.created_at)
    }

    // =========================================================================
    // Step 1 - Species
    // =========================================================================

    #[instrument(skip(self, selection), fields(species = %selection.species_name))]
    pub fn set_species(&mut self, selection: SpeciesSelection) {
        debug!(subspecies = ?selection.subspecies_name, "Species selected");
        self.update_language_sources(|state| {
            state.species_id = Some(selection.species_id);
            state.species_name = Some(selection.species_name);
            state.subspecies_id = selection.subspecies_id;
            state.subspecies_name = selection.subspecies_name;
            state.racial_bonuses = selection.racial_bonuses;
            state.species_traits = selection.traits;
            state.species_speed = selection.speed;
            state.species_size = selection.size;
            state.species_languages = selection.languages;
            state.species_resistances = selection.resistances;
            state.has_darkvision = selection.has_darkvision;
            state.darkvision_radius = selection.darkvision_radius;
        });
    }

    pub fn clear_species(&mut self) {
        self.update_language_sources(|state| {
            let defaults = BuildState::default();
            state.species_id = None;
            state.species_name = None;
            state.subspecies_id = None;
            state.subspecies_name = None;
            state.racial_bonuses = defaults.racial_bonuses;
            state.species_traits = defaults.species_traits;
            state.species_speed = defaults.species_speed;
            state.species_size = defaults.species_size;
            state.species_languages = defaults.species_languages;
            state.species_resistances = defaults.species_resistances;
            state.has_darkvision = defaults.has_darkvision;
            state.darkvision_radius = defaults.darkvision_radius;
        });
    }

    /// Fetch a species (and optionally one of its subspecies) and select it
    #[instrument(skip(self, catalog))]
    pub fn select_species(
        &mut self,
        catalog: &dyn CatalogPort,
        species_id: &SpeciesId,
        subspecies_id: Option<&SubspeciesId>,
    ) -> Result<(), CatalogError> {
        let species = catalog.get_species_detail(species_id)?;
        let subspecies = match subspecies_id {
            Some(id) => Some(
                species
                    .find_subspecies(id)
                    .ok_or_else(|| CatalogError::NotFound(format!("subspecies {}", id)))?,
            ),
            None => None,
        };
        self.set_species(SpeciesSelection::from_catalog(&species, subspecies));
        Ok(())
    }

    // =========================================================================
    // Step 2 - Civilization
    // =========================================================================

    pub fn set_civilization(
        &mut self,
        id: CivilizationId,
        name: impl Into<String>,
        official_languages: Vec<String>,
    ) {
        let name = name.into();
        debug!(civilization = %name, "Civilization selected");
        self.update_language_sources(|state| {
            state.civilization_id = Some(id);
            state.civilization_name = Some(name);
            state.civilization_languages = official_languages;
        });
    }

    pub fn clear_civilization(&mut self) {
        self.update_language_sources(|state| {
            state.civilization_id = None;
            state.civilization_name = None;
            state.civilization_languages = Vec::new();
        });
    }

    #[instrument(skip(self, catalog))]
    pub fn select_civilization(
        &mut self,
        catalog: &dyn CatalogPort,
        id: &CivilizationId,
    ) -> Result<(), CatalogError> {
        let civilization = catalog.get_civilization_detail(id)?;
        self.set_civilization(
            civilization.id,
            civilization.name,
            civilization.linguistics.official_languages,
        );
        Ok(())
    }

    // =========================================================================
    // Step 3 - Class
    // =========================================================================

    /// Replace the class bundle. Skills and equipment picked for the
    /// previous class are dropped.
    #[instrument(skip(self, selection), fields(class = %selection.class_name))]
    pub fn set_class(&mut self, selection: ClassSelection) {
        self.update(|state| {
            state.class_id = Some(selection.class_id);
            state.class_name = Some(selection.class_name);
            state.hit_die = selection.hit_die;
            state.has_spellcasting = selection.has_spellcasting;
            state.spellcasting_ability = selection.spellcasting_ability;
            state.saving_throws = selection.saving_throws;
            state.armor_proficiencies = selection.armor_proficiencies;
            state.weapon_proficiencies = selection.weapon_proficiencies;
            state.tool_proficiencies = selection.tool_proficiencies;
            state.skill_options = selection.skill_options;
            state.skill_choose_count = selection.skill_choose_count;
            state.class_features = selection.features;
            state.starting_equipment = selection.starting_equipment;
            state.selected_skills.clear();
            state.equipment_selections.clear();
            state.selected_equipment.clear();
        });
    }

    pub fn clear_class(&mut self) {
        self.update(|state| {
            let defaults = BuildState::default();
            state.class_id = None;
            state.class_name = None;
            state.hit_die = defaults.hit_die;
            state.has_spellcasting = false;
            state.spellcasting_ability = None;
            state.saving_throws = Vec::new();
            state.armor_proficiencies = Vec::new();
            state.weapon_proficiencies = Vec::new();
            state.tool_proficiencies = Vec::new();
            state.skill_options = Vec::new();
            state.skill_choose_count = 0;
            state.class_features = Vec::new();
            state.starting_equipment = Vec::new();
            state.selected_skills.clear();
            state.equipment_selections.clear();
            state.selected_equipment.clear();
        });
    }

    #[instrument(skip(self, catalog))]
    pub fn select_class(&mut self, catalog: &dyn CatalogPort, id: &ClassId) -> Result<(), CatalogError> {
        let class = catalog.get_class_detail(id)?;
        self.set_class(ClassSelection::from_catalog(&class));
        Ok(())
    }

    // =========================================================================
    // Step 4 - Abilities
    // =========================================================================

    /// Set a base score under the point-buy rules
    pub fn set_ability_score(&mut self, ability: Ability, value: i32) -> Result<(), ValidationRejected> {
        let remaining = self.points_after(ability, value).inspect_err(|rejection| {
            warn!(%rejection, "Ability change rejected");
        })?;
        self.update(|state| {
            state.base_abilities.set(ability, value);
            state.points_remaining = remaining;
        });
        Ok(())
    }

    /// Points left if `ability` moved to `value`
    fn points_after(&self, ability: Ability, value: i32) -> Result<i32, ValidationRejected> {
        if !(MIN_ABILITY_SCORE..=MAX_ABILITY_SCORE).contains(&value) {
            return Err(ValidationRejected::OutOfRange { ability, value });
        }

        let current = self.state.base_abilities.get(ability);
        let delta = point_cost(value).unwrap_or(0) - point_cost(current).unwrap_or(0);
        let remaining = self.state.points_remaining;
        if remaining - delta < 0 {
            return Err(ValidationRejected::InsufficientPoints {
                ability,
                needed: delta,
                remaining,
            });
        }
        Ok(remaining - delta)
    }

    pub fn increment_ability(&mut self, ability: Ability) -> Result<(), ValidationRejected> {
        let current = self.state.base_abilities.get(ability);
        self.set_ability_score(ability, current + 1)
    }

    pub fn decrement_ability(&mut self, ability: Ability) -> Result<(), ValidationRejected> {
        let current = self.state.base_abilities.get(ability);
        self.set_ability_score(ability, current - 1)
    }

    pub fn reset_abilities(&mut self) {
        self.update(|state| {
            let defaults = BuildState::default();
            state.base_abilities = defaults.base_abilities;
            state.points_remaining = defaults.points_remaining;
        });
    }

    // =========================================================================
    // Step 5 - Skills
    // =========================================================================

    /// Skills the current class lets the player pick from
    pub fn available_skills(&self) -> Vec<String> {
        skills::available_skills(&self.state.skill_options)
    }

    /// Select or deselect a skill. Selecting past the class quota does
    /// nothing.
    pub fn toggle_skill(&mut self, skill: &str) -> ToggleOutcome {
        if self.state.has_skill(skill) {
            self.update(|state| state.selected_skills.retain(|s| s != skill));
            ToggleOutcome::Removed
        } else if self.state.can_select_more_skills() {
            self.update(|state| state.selected_skills.push(skill.to_string()));
            ToggleOutcome::Added
        } else {
            debug!(skill, quota = self.state.skill_choose_count, "Skill quota reached");
            ToggleOutcome::Ignored
        }
    }

    pub fn clear_skills(&mut self) {
        self.update(|state| state.selected_skills.clear());
    }

    // =========================================================================
    // Step 6 - Equipment
    // =========================================================================

    /// Pick an option for a starting-equipment slot and rebuild the
    /// equipment list from all selections
    #[instrument(skip(self, resolver))]
    pub fn select_equipment_option(
        &mut self,
        slot_index: usize,
        option: EquipmentOption,
        resolver: &EquipmentResolver,
    ) -> Result<EquipmentResolution, ValidationRejected> {
        let available = match self.state.starting_equipment.get(slot_index) {
            None => Err(ValidationRejected::UnknownEquipmentSlot(slot_index)),
            Some(slot) if slot.is_fixed() || !slot.has_option(option) => {
                Err(ValidationRejected::OptionUnavailable {
                    slot: slot_index,
                    option,
                })
            }
            Some(_) => Ok(()),
        };
        available.inspect_err(|rejection| warn!(%rejection, "Equipment option rejected"))?;

        let mut selections = self.state.equipment_selections.clone();
        selections.insert(slot_index, option);
        let resolution = resolver.resolve_slots(&self.state.starting_equipment, &selections);

        let items = resolution.items.clone();
        self.update(|state| {
            state.equipment_selections = selections;
            state.selected_equipment = items;
        });
        Ok(resolution)
    }

    /// Rebuild the equipment list from the current selections
    pub fn resolve_equipment(&mut self, resolver: &EquipmentResolver) -> EquipmentResolution {
        let resolution =
            resolver.resolve_slots(&self.state.starting_equipment, &self.state.equipment_selections);
        let items = resolution.items.clone();
        self.update(|state| state.selected_equipment = items);
        resolution
    }

    pub fn equipment_choices_complete(&self) -> bool {
        all_choices_made(&self.state.starting_equipment, &self.state.equipment_selections)
    }

    pub fn add_equipment(&mut self, item: ResolvedEquipmentItem) {
        self.update(|state| state.selected_equipment.push(item));
    }

    /// Remove every equipment line with this name
    pub fn remove_equipment(&mut self, name: &str) {
        self.update(|state| state.selected_equipment.retain(|item| item.name != name));
    }

    pub fn set_equipment(&mut self, items: Vec<ResolvedEquipmentItem>) {
        self.update(|state| state.selected_equipment = items);
    }

    pub fn set_currency(&mut self, update: CurrencyUpdate) {
        self.update(|state| state.currency = state.currency.apply(update));
    }

    // =========================================================================
    // Step 7 - Languages
    // =========================================================================

    pub fn language_plan(&self) -> LanguagePlan {
        LanguagePlan::from_sources(&self.state.species_languages, &self.state.civilization_languages)
    }

    /// Languages open for a free pick. Falls back to a built-in list when
    /// the catalog cannot list languages.
    pub fn available_choice_languages(&self, catalog: &dyn CatalogPort) -> Vec<String> {
        let all: Vec<String> = match catalog.list_languages() {
            Ok(languages) => languages.into_iter().map(|l| l.name).collect(),
            Err(e) => {
                warn!(error = %e, "Language list unavailable, using built-in list");
                FALLBACK_LANGUAGES.iter().map(|l| l.to_string()).collect()
            }
        };
        self.language_plan().available_for_choice(&all, &self.state.languages)
    }

    pub fn add_language(&mut self, language: impl Into<String>) {
        let language = language.into();
        self.update(|state| {
            state.languages.insert(language);
        });
    }

    pub fn remove_language(&mut self, language: &str) {
        self.update(|state| {
            state.languages.remove(language);
        });
    }

    /// Replace the language set; duplicates collapse
    pub fn set_languages(&mut self, languages: impl IntoIterator<Item = String>) {
        let languages = languages.into_iter().collect();
        self.update(|state| state.languages = languages);
    }

    /// Select or deselect a free language pick, within the free-pick quota
    pub fn toggle_choice_language(&mut self, language: &str) -> ToggleOutcome {
        let plan = self.language_plan();
        if plan.is_fixed(language) || is_choice_placeholder(language) {
            return ToggleOutcome::Ignored;
        }

        if self.state.languages.contains(language) {
            self.remove_language(language);
            ToggleOutcome::Removed
        } else if plan.remaining_choices(&self.state.languages) > 0 {
            self.add_language(language);
            ToggleOutcome::Added
        } else {
            debug!(language, quota = plan.choice_count, "Free language quota reached");
            ToggleOutcome::Ignored
        }
    }

    /// Keep only the fixed languages
    pub fn clear_choice_languages(&mut self) {
        let fixed = self.language_plan().compose(&[]);
        self.update(|state| state.languages = fixed);
    }

    // =========================================================================
    // Step 8 - Identity
    // =========================================================================

    pub fn set_identity(&mut self, identity: IdentityUpdate) {
        self.update(|state| {
            let fields = [
                (&mut state.name, identity.name),
                (&mut state.description, identity.description),
                (&mut state.background, identity.background),
                (&mut state.alignment, identity.alignment),
                (&mut state.traits, identity.traits),
                (&mut state.ideal, identity.ideal),
                (&mut state.bonds, identity.bonds),
                (&mut state.flaws, identity.flaws),
                (&mut state.handicap, identity.handicap),
                (&mut state.story, identity.story),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    *field = value;
                }
            }
        });
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn is_current_step_valid(&self) -> bool {
        steps::is_step_valid(self.step, &self.state)
    }

    fn move_to(&mut self, step: Step) -> Step {
        if step != self.step {
            debug!(from = %self.step, to = %step, "Step changed");
            self.step = step;
            self.persist();
        }
        self.step
    }

    /// Advance when the current step is complete
    pub fn next_step(&mut self) -> Step {
        let next = steps::next_step(self.step, &self.state);
        self.move_to(next)
    }

    pub fn previous_step(&mut self) -> Step {
        let previous = steps::previous_step(self.step);
        self.move_to(previous)
    }

    /// Jump to a step by number; numbers outside 1..=9 are ignored
    pub fn go_to_step(&mut self, number: u8) -> Step {
        let target = steps::go_to_step(self.step, number);
        self.move_to(target)
    }

    // =========================================================================
    // Reads and lifecycle
    // =========================================================================

    pub fn snapshot(&self) -> Arc<BuildState> {
        Arc::clone(&self.state)
    }

    pub fn derived(&self) -> DerivedCharacter {
        compute_derived(&self.state)
    }

    pub fn generate_final_character(&self) -> DerivedCharacter {
        self.derived()
    }

    /// Drop the build, the edit marker and the stored draft
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.state = Arc::new(BuildState::default());
        self.step = Step::FIRST;
        self.editing = None;
        self.persistence.clear();
        info!("Build reset");
    }

    /// Stamp the finished sheet for the roster and start over. An edited
    /// character keeps its id and creation date.
    #[instrument(skip(self))]
    pub fn confirm_finalization(&mut self) -> SavedCharacter {
        let character = self.derived();
        let saved = match self.editing {
            Some(marker) => SavedCharacter {
                id: marker.id,
                created_at: marker.created_at,
                updated_at: Some(Utc::now()),
                character,
            },
            None => SavedCharacter::new(character),
        };
        info!(character_id = %saved.id, name = %saved.name(), "Character finalized");
        self.reset();
        saved
    }
}
