//! Roster Service - Finalized characters kept in the key-value store
//!
//! The roster is a single JSON array under its own key. Reopening a
//! character for editing goes through the one-shot edit slot read by the
//! next builder.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, instrument};

use crate::application::ports::outbound::{KeyValueStore, StorageError};
use crate::domain::entities::SavedCharacter;
use crate::domain::value_objects::CharacterId;

use super::draft_persistence::{DraftPersistence, StorageKeys};

/// Suffix added to the name of a duplicated character
const COPY_SUFFIX: &str = "(copie)";

#[derive(Clone)]
pub struct RosterService {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl RosterService {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    fn read(&self) -> Result<Vec<SavedCharacter>, StorageError> {
        let Some(raw) = self.store.get(&self.keys.roster)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(characters) => Ok(characters),
            Err(e) => {
                error!(key = %self.keys.roster, error = %e, "Corrupt roster, reading as empty");
                Ok(Vec::new())
            }
        }
    }

    fn write(&self, characters: &[SavedCharacter]) -> Result<(), StorageError> {
        let json = serde_json::to_string(characters)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        self.store.set(&self.keys.roster, &json)
    }

    /// Saved characters, newest first
    pub fn list(&self) -> Result<Vec<SavedCharacter>, StorageError> {
        let mut characters = self.read()?;
        characters.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(characters)
    }

    pub fn get(&self, id: CharacterId) -> Result<Option<SavedCharacter>, StorageError> {
        Ok(self.read()?.into_iter().find(|c| c.id == id))
    }

    /// Insert a character, or replace the one with the same id
    #[instrument(skip(self, character), fields(character_id = %character.id))]
    pub fn upsert(&self, character: SavedCharacter) -> Result<(), StorageError> {
        let mut characters = self.read()?;
        match characters.iter_mut().find(|c| c.id == character.id) {
            Some(existing) => {
                debug!("Replacing saved character");
                *existing = character;
            }
            None => {
                info!(name = %character.name(), "Saving new character");
                characters.push(character);
            }
        }
        self.write(&characters)
    }

    /// Remove a character; `false` when it was not in the roster
    #[instrument(skip(self))]
    pub fn delete(&self, id: CharacterId) -> Result<bool, StorageError> {
        let mut characters = self.read()?;
        let before = characters.len();
        characters.retain(|c| c.id != id);
        if characters.len() == before {
            return Ok(false);
        }
        self.write(&characters)?;
        info!("Character deleted");
        Ok(true)
    }

    /// Copy a character under a new id and a "(copie)" name
    #[instrument(skip(self))]
    pub fn duplicate(&self, id: CharacterId) -> Result<Option<SavedCharacter>, StorageError> {
        let mut characters = self.read()?;
        let Some(original) = characters.iter().find(|c| c.id == id) else {
            return Ok(None);
        };

        let mut copy = original.clone();
        copy.id = CharacterId::new();
        copy.created_at = Utc::now();
        copy.updated_at = None;
        copy.character.name = format!("{} {}", original.name(), COPY_SUFFIX);

        characters.push(copy.clone());
        self.write(&characters)?;
        info!(copy_id = %copy.id, "Character duplicated");
        Ok(Some(copy))
    }

    /// Queue a saved character for the next builder to reopen.
    /// Returns `false` when the id is unknown.
    #[instrument(skip(self))]
    pub fn begin_edit(&self, id: CharacterId) -> Result<bool, StorageError> {
        let Some(character) = self.get(id)? else {
            return Ok(false);
        };
        DraftPersistence::new(self.store.clone(), self.keys.clone()).request_edit(&character)?;
        Ok(true)
    }
}
