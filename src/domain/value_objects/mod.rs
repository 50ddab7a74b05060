//! Value objects - Immutable objects defined by their attributes

mod abilities;
mod currency;
mod edit_marker;
mod equipment;
mod features;
mod ids;
mod step;

pub use abilities::{
    point_cost, Ability, AbilityScores, DEFAULT_ABILITY_SCORE, MAX_ABILITY_SCORE,
    MIN_ABILITY_SCORE, STARTING_POINTS,
};
pub use currency::{Currency, CurrencyUpdate};
pub use edit_marker::EditMarker;
pub use equipment::{EquipmentChoiceSlot, EquipmentOption, ResolvedEquipmentItem};
pub use features::{FeatureInfo, TraitInfo};
pub use ids::*;
pub use step::{Step, StepOutOfRange};
