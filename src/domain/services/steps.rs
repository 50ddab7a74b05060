//! Step validation and navigation
//!
//! The flow is linear. Moving forward requires the current step to be
//! complete; moving back or jumping is always allowed within range.

use crate::domain::entities::BuildState;
use crate::domain::value_objects::Step;

/// Whether `step` has everything it needs to move on
pub fn is_step_valid(step: Step, state: &BuildState) -> bool {
    match step.number() {
        1 => state.species_id.is_some(),
        2 => state.civilization_id.is_some(),
        3 => state.class_id.is_some(),
        4 => state.points_remaining >= 0,
        5 => state.selected_skills.len() == state.skill_choose_count,
        6 => true,
        7 => !state.languages.is_empty(),
        8 => !state.name.trim().is_empty(),
        _ => true,
    }
}

/// The following step, or `current` when it is the last one or incomplete
pub fn next_step(current: Step, state: &BuildState) -> Step {
    if !is_step_valid(current, state) {
        return current;
    }
    current.next().unwrap_or(current)
}

pub fn previous_step(current: Step) -> Step {
    current.previous().unwrap_or(current)
}

/// Jump to step `number`; out-of-range numbers leave `current` in place
pub fn go_to_step(current: Step, number: u8) -> Step {
    Step::new(number).unwrap_or(current)
}
