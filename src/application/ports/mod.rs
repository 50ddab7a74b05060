//! Ports - Boundaries between the builder and its collaborators

pub mod outbound;
