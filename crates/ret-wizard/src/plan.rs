//! Step sequences per calculator mode.
//!
//! Field ids match the calculator form. A step's `required` list names the
//! fields that must validate before `next()` unlocks the following step;
//! fields hidden by the active mode are exempt at evaluation time.

use crate::machine::Mode;

#[derive(Debug, Clone, Copy)]
pub struct StepDef {
    pub required: &'static [&'static str],
    /// Terminal results step; submission happens on the step before it.
    pub results: bool,
}

const FORWARD: &[StepDef] = &[
    // Dane podstawowe
    StepDef {
        required: &["age", "sex"],
        results: false,
    },
    // Historia pracy
    StepDef {
        required: &["salary", "start-year", "end-year"],
        results: false,
    },
    // Dodatkowe założenia (accumulated, sick-leave, pension-goal — all optional)
    StepDef {
        required: &[],
        results: false,
    },
    StepDef {
        required: &[],
        results: true,
    },
];

const REVERSE: &[StepDef] = &[
    // Dane podstawowe
    StepDef {
        required: &["age-rev", "sex-rev"],
        results: false,
    },
    // Cel emerytalny
    StepDef {
        required: &["goal-income", "retirement-age"],
        results: false,
    },
    // Zgromadzone środki
    StepDef {
        required: &["current-savings"],
        results: false,
    },
    StepDef {
        required: &[],
        results: true,
    },
];

pub fn step_plan(mode: Mode) -> &'static [StepDef] {
    match mode {
        Mode::Forward => FORWARD,
        Mode::Reverse => REVERSE,
    }
}

/// Index of the last non-results step, where submission takes place.
pub fn last_input_index(mode: Mode) -> usize {
    let plan = step_plan(mode);
    plan.iter().rposition(|s| !s.results).unwrap_or(0)
}

/// Index of the terminal results step.
pub fn results_index(mode: Mode) -> usize {
    step_plan(mode).len() - 1
}
