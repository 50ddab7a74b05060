//! Draft Persistence - Keeps the in-progress build in a key-value store
//!
//! The draft is rewritten after every mutation. A second, one-shot slot
//! carries a saved character to reopen for editing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::application::ports::outbound::{KeyValueStore, StorageError};
use crate::domain::entities::{BuildState, SavedCharacter};
use crate::domain::services::matching::split_qualified_name;
use crate::domain::value_objects::{
    CivilizationId, ClassId, EditMarker, SpeciesId, Step, SubspeciesId,
};

pub const DEFAULT_DRAFT_KEY: &str = "dragon_character_creation_v1";
pub const DEFAULT_EDIT_KEY: &str = "dragons-edit-character";
pub const DEFAULT_ROSTER_KEY: &str = "dragons-characters";

/// Slot names used in the key-value store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub draft: String,
    pub edit_request: String,
    pub roster: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            draft: DEFAULT_DRAFT_KEY.to_string(),
            edit_request: DEFAULT_EDIT_KEY.to_string(),
            roster: DEFAULT_ROSTER_KEY.to_string(),
        }
    }
}

/// The draft slot's JSON shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedDraft {
    pub character: BuildState,
    pub step: Step,
    #[serde(default)]
    pub editing: Option<EditMarker>,
}

impl Default for PersistedDraft {
    fn default() -> Self {
        Self {
            character: BuildState::default(),
            step: Step::FIRST,
            editing: None,
        }
    }
}

#[derive(Clone)]
pub struct DraftPersistence {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl DraftPersistence {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Write the draft. Failures are logged and dropped so a broken store
    /// never blocks the build.
    pub fn save(&self, draft: &PersistedDraft) {
        let json = match serde_json::to_string(draft) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize draft");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.keys.draft, &json) {
            error!(key = %self.keys.draft, error = %e, "Failed to save draft");
        }
    }

    /// The stored draft, if any. An unreadable draft is removed.
    #[instrument(skip(self), fields(key = %self.keys.draft))]
    pub fn load(&self) -> Option<PersistedDraft> {
        let raw = match self.store.get(&self.keys.draft) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!(error = %e, "Failed to read draft");
                return None;
            }
        };

        match serde_json::from_str::<PersistedDraft>(&raw) {
            Ok(draft) => {
                debug!(step = %draft.step, "Draft restored");
                Some(draft)
            }
            Err(e) => {
                error!(error = %e, "Corrupt draft, discarding");
                self.clear();
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.keys.draft) {
            error!(key = %self.keys.draft, error = %e, "Failed to clear draft");
        }
    }

    /// Queue a saved character to be reopened by the next builder
    pub fn request_edit(&self, character: &SavedCharacter) -> Result<(), StorageError> {
        let json = serde_json::to_string(character)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        self.store.set(&self.keys.edit_request, &json)?;
        info!(character_id = %character.id, "Edit requested");
        Ok(())
    }

    /// Read and remove the one-shot edit slot
    #[instrument(skip(self), fields(key = %self.keys.edit_request))]
    pub fn take_edit_request(&self) -> Option<SavedCharacter> {
        let raw = match self.store.get(&self.keys.edit_request) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!(error = %e, "Failed to read edit request");
                return None;
            }
        };

        if let Err(e) = self.store.remove(&self.keys.edit_request) {
            warn!(error = %e, "Failed to clear edit request");
        }

        match serde_json::from_str::<SavedCharacter>(&raw) {
            Ok(character) => Some(character),
            Err(e) => {
                error!(error = %e, "Corrupt edit request, ignoring");
                None
            }
        }
    }
}

/// Rebuild an editable build from a saved sheet.
///
/// Catalog ids are not kept on saved characters, so every named catalog
/// choice gets the edit placeholder id. The sheet stores final ability
/// scores, which become the base scores with no racial bonus on top.
pub fn remap_saved_character(saved: &SavedCharacter) -> (BuildState, EditMarker) {
    let sheet = &saved.character;
    let (species_name, subspecies_name) = split_qualified_name(&sheet.species);
    let species_name = Some(species_name).filter(|s| !s.is_empty());
    let civilization_name = Some(sheet.civilization.clone()).filter(|s| !s.is_empty());
    let class_name = Some(sheet.class_name.clone()).filter(|s| !s.is_empty());

    let defaults = BuildState::default();
    let state = BuildState {
        species_id: species_name.as_ref().map(|_| SpeciesId::edit_placeholder()),
        species_name,
        subspecies_id: subspecies_name.as_ref().map(|_| SubspeciesId::edit_placeholder()),
        subspecies_name,
        species_traits: sheet.racial_traits.clone(),
        species_speed: if sheet.speed > 0.0 { sheet.speed } else { defaults.species_speed },
        species_resistances: sheet.resistances.clone(),
        has_darkvision: sheet.has_darkvision,
        darkvision_radius: sheet.darkvision_radius,

        civilization_id: civilization_name.as_ref().map(|_| CivilizationId::edit_placeholder()),
        civilization_name,

        class_id: class_name.as_ref().map(|_| ClassId::edit_placeholder()),
        class_name,
        hit_die: sheet.hit_points_max - sheet.ability_modifiers.constitution,
        has_spellcasting: sheet.spellcasting.is_some(),
        spellcasting_ability: sheet.spellcasting.as_ref().map(|block| block.ability),
        saving_throws: sheet.saving_throws.clone(),
        armor_proficiencies: sheet.armor_proficiencies.clone(),
        weapon_proficiencies: sheet.weapon_proficiencies.clone(),
        tool_proficiencies: sheet.tool_proficiencies.clone(),
        skill_choose_count: sheet.skills.len(),
        class_features: sheet.class_features.clone(),

        base_abilities: sheet.abilities,
        points_remaining: 0,

        selected_skills: sheet.skills.clone(),

        selected_equipment: sheet.equipment.clone(),
        currency: sheet.currency,

        languages: sheet.languages.iter().cloned().collect(),

        name: sheet.name.clone(),
        description: sheet.description.clone(),
        background: sheet.background.clone(),
        alignment: sheet.alignment.clone(),
        traits: sheet.traits.clone(),
        ideal: sheet.ideal.clone(),
        bonds: sheet.bonds.clone(),
        flaws: sheet.flaws.clone(),
        handicap: sheet.handicap.clone(),
        story: sheet.story.clone(),

        ..defaults
    };

    let marker = EditMarker {
        id: saved.id,
        created_at: saved.created_at,
    };
    (state, marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DerivedCharacter;
    use crate::domain::value_objects::{Ability, AbilityScores};
    use crate::infrastructure::storage::InMemoryKeyValueStore;

    fn persistence() -> (Arc<InMemoryKeyValueStore>, DraftPersistence) {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let persistence = DraftPersistence::new(store.clone(), StorageKeys::default());
        (store, persistence)
    }

    fn saved_sheet() -> SavedCharacter {
        SavedCharacter::new(DerivedCharacter {
            name: "Thalia".into(),
            species: "Elfe (Elfe des bois)".into(),
            civilization: "Sylvanie".into(),
            class_name: "Rôdeur".into(),
            abilities: AbilityScores::default().with(Ability::Constitution, 14),
            ability_modifiers: AbilityScores::uniform(0).with(Ability::Constitution, 2),
            hit_points_max: 12,
            skills: vec!["Survie".into(), "Perception".into()],
            languages: vec!["Commun".into(), "Elfique".into()],
            speed: 10.5,
            ..DerivedCharacter::default()
        })
    }

    #[test]
    fn test_draft_round_trip_through_store() {
        let (_, persistence) = persistence();
        let mut draft = PersistedDraft::default();
        draft.character.name = "Aldric".into();
        draft.step = Step::new(4).unwrap();

        persistence.save(&draft);
        assert_eq!(persistence.load(), Some(draft));
    }

    #[test]
    fn test_corrupt_draft_is_cleared() {
        let (store, persistence) = persistence();
        store.set(DEFAULT_DRAFT_KEY, "{not json").unwrap();

        assert!(persistence.load().is_none());
        assert!(store.get(DEFAULT_DRAFT_KEY).unwrap().is_none());
    }

    #[test]
    fn test_out_of_range_step_is_corrupt() {
        let (store, persistence) = persistence();
        let json = serde_json::json!({ "character": {}, "step": 12, "editing": null });
        store.set(DEFAULT_DRAFT_KEY, &json.to_string()).unwrap();

        assert!(persistence.load().is_none());
        assert!(store.get(DEFAULT_DRAFT_KEY).unwrap().is_none());
    }

    #[test]
    fn test_edit_request_is_one_shot() {
        let (store, persistence) = persistence();
        let saved = saved_sheet();
        persistence.request_edit(&saved).unwrap();

        assert_eq!(persistence.take_edit_request(), Some(saved));
        assert!(store.get(DEFAULT_EDIT_KEY).unwrap().is_none());
        assert!(persistence.take_edit_request().is_none());
    }

    #[test]
    fn test_corrupt_edit_request_is_cleared() {
        let (store, persistence) = persistence();
        store.set(DEFAULT_EDIT_KEY, "[]").unwrap();
        assert!(persistence.take_edit_request().is_none());
        assert!(store.get(DEFAULT_EDIT_KEY).unwrap().is_none());
    }

    #[test]
    fn test_remap_saved_character() {
        let saved = saved_sheet();
        let (state, marker) = remap_saved_character(&saved);

        assert_eq!(marker.id, saved.id);
        assert_eq!(marker.created_at, saved.created_at);
        assert_eq!(state.species_name.as_deref(), Some("Elfe"));
        assert_eq!(state.subspecies_name.as_deref(), Some("Elfe des bois"));
        assert!(state.species_id.as_ref().is_some_and(|id| id.is_edit_placeholder()));
        assert!(state.subspecies_id.as_ref().is_some_and(|id| id.is_edit_placeholder()));
        assert!(state.class_id.is_some());
        assert_eq!(state.hit_die, 10);
        assert_eq!(state.skill_choose_count, 2);
        assert_eq!(state.points_remaining, 0);
        assert_eq!(state.base_abilities.constitution, 14);
        assert!(state.racial_bonuses.is_empty());
        assert_eq!(state.species_speed, 10.5);
        assert_eq!(state.languages.len(), 2);
    }

    #[test]
    fn test_remap_without_subspecies_or_names() {
        let saved = SavedCharacter::new(DerivedCharacter {
            species: "Humain".into(),
            ..DerivedCharacter::default()
        });
        let (state, _) = remap_saved_character(&saved);
        assert_eq!(state.species_name.as_deref(), Some("Humain"));
        assert!(state.subspecies_id.is_none());
        assert!(state.civilization_id.is_none());
        assert!(state.class_id.is_none());
        assert_eq!(state.species_speed, 9.0);
    }
}
