//! Dragons Engine - Character build engine for the Dragons TTRPG
//!
//! The engine is the in-process core behind the character creation flow:
//! - Holds the in-progress build and mirrors it to durable storage
//! - Applies the point-buy rules for ability scores
//! - Derives every computed sheet value from the build
//! - Resolves free-text equipment, language and skill choices against the catalog
//! - Gates the 9-step creation flow
//!
//! Catalog lookup, sheet rendering and UI are external collaborators reached
//! through the ports in [`application::ports`].

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::ports::outbound::{CatalogError, CatalogPort, KeyValueStore, StorageError};
pub use application::services::{
    CharacterBuilder, DraftPersistence, EquipmentResolution, EquipmentResolver, RosterService,
    ValidationRejected,
};
pub use domain::entities::{BuildState, DerivedCharacter, SavedCharacter};
pub use domain::services::derivation::compute_derived;
pub use infrastructure::config::EngineConfig;
pub use infrastructure::telemetry::init_tracing;
