//! Domain layer - Core build rules with no I/O
//!
//! This layer contains:
//! - Entities: BuildState, catalog records, DerivedCharacter, SavedCharacter
//! - Value Objects: abilities, equipment slots, ids, steps, currency
//! - Domain Services: derivation, step validation, name matching,
//!   language and skill choice rules

pub mod entities;
pub mod services;
pub mod value_objects;
