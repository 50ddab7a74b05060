//! Application layer - Use cases over the domain rules
//!
//! This layer contains:
//! - Ports: catalog and key-value storage interfaces
//! - Services: the character builder, equipment resolution, draft
//!   persistence and the saved-character roster

pub mod ports;
pub mod services;
