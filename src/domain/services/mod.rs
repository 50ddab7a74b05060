//! Domain services - Pure rules over build snapshots

pub mod derivation;
pub mod languages;
pub mod matching;
pub mod skills;
pub mod steps;

pub use derivation::compute_derived;
pub use languages::{LanguagePlan, FALLBACK_LANGUAGES};
pub use skills::{available_skills, ToggleOutcome, SKILLS};
pub use steps::{go_to_step, is_step_valid, next_step, previous_step};
