//! Application services - Use case implementations
//!
//! The character builder drives the creation flow. The equipment resolver,
//! draft persistence and roster services are its collaborators and can
//! also be used on their own.

pub mod character_builder;
pub mod draft_persistence;
pub mod equipment_resolver;
pub mod roster_service;

pub use character_builder::{
    CharacterBuilder, ClassSelection, IdentityUpdate, SpeciesSelection, ValidationRejected,
};
pub use draft_persistence::{remap_saved_character, DraftPersistence, PersistedDraft, StorageKeys};
pub use equipment_resolver::{all_choices_made, EquipmentResolution, EquipmentResolver};
pub use roster_service::RosterService;
