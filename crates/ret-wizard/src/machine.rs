//! The wizard transition function.

use crate::plan::{last_input_index, results_index, step_plan};
use ret_rules::{Context, RuleSet, evaluate};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Forward,
    Reverse,
}

impl Mode {
    /// CSS class fragment used to tag mode-specific step sections.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Forward => "forward",
            Mode::Reverse => "reverse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ModeUnselected,
    StepActive { mode: Mode, index: usize },
    ResultsDisplayed { mode: Mode },
}

/// Why a transition was refused. State is unchanged after any refusal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Refusal {
    /// First invalid field in document order; the UI focuses it.
    #[error("{message}")]
    InvalidField { field: String, message: String },
    #[error("Ten krok nie został jeszcze odblokowany")]
    StepLocked,
    #[error("Obliczenia są już w toku")]
    SubmissionInFlight,
    #[error("Operacja niedostępna w tym stanie")]
    NotNow,
}

/// Read access to the live form. `visible` reflects conditional display:
/// a hidden field is never validated.
pub trait FormReader {
    fn value(&self, field: &str) -> String;
    fn visible(&self, field: &str) -> bool;
}

/// Validation rules keyed by field id, shared with the wizard by reference.
pub type RuleBook = HashMap<String, RuleSet>;

/// Rules for the calculator's own fields: everything in the step plan is
/// required, nothing more.
pub fn default_rules() -> RuleBook {
    let mut rules = RuleBook::new();
    for mode in [Mode::Forward, Mode::Reverse] {
        for step in step_plan(mode) {
            for field in step.required {
                rules.insert(
                    (*field).to_owned(),
                    RuleSet::required("Proszę wypełnić wszystkie wymagane pola"),
                );
            }
        }
    }
    rules
}

pub struct Wizard {
    phase: Phase,
    highest_reached: usize,
    in_flight: bool,
    rules: Rc<RuleBook>,
}

impl Wizard {
    pub fn new(rules: Rc<RuleBook>) -> Wizard {
        Wizard {
            phase: Phase::ModeUnselected,
            highest_reached: 0,
            in_flight: false,
            rules,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Option<Mode> {
        match self.phase {
            Phase::ModeUnselected => None,
            Phase::StepActive { mode, .. } | Phase::ResultsDisplayed { mode } => Some(mode),
        }
    }

    /// Index of the step currently shown, if any. The results phase counts
    /// as standing on the terminal results step.
    pub fn active_index(&self) -> Option<usize> {
        match self.phase {
            Phase::ModeUnselected => None,
            Phase::StepActive { index, .. } => Some(index),
            Phase::ResultsDisplayed { mode } => Some(results_index(mode)),
        }
    }

    pub fn highest_reached(&self) -> usize {
        self.highest_reached
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        self.mode().is_some() && index <= self.highest_reached
    }

    /// Choose a mode and land on its first step. Always permitted; choosing
    /// a mode discards any previous progress and results.
    pub fn select_mode(&mut self, mode: Mode) {
        self.phase = Phase::StepActive { mode, index: 0 };
        self.highest_reached = 0;
        self.in_flight = false;
    }

    /// Advance one step after validating the current step's visible
    /// required fields.
    pub fn next(&mut self, form: &impl FormReader) -> Result<(), Refusal> {
        if self.in_flight {
            return Err(Refusal::SubmissionInFlight);
        }
        let Phase::StepActive { mode, index } = self.phase else {
            return Err(Refusal::NotNow);
        };
        if index >= last_input_index(mode) {
            return Err(Refusal::NotNow);
        }
        self.validate_step(mode, index, form)?;
        self.phase = Phase::StepActive {
            mode,
            index: index + 1,
        };
        self.highest_reached = self.highest_reached.max(index + 1);
        Ok(())
    }

    /// Step back without validation. No-op on the first step; previously
    /// unlocked steps stay unlocked.
    pub fn prev(&mut self) {
        if self.in_flight {
            return;
        }
        if let Phase::StepActive { mode, index } = self.phase {
            if index > 0 {
                self.phase = Phase::StepActive {
                    mode,
                    index: index - 1,
                };
            }
        }
    }

    /// Direct navigation via a step header. Only previously reached steps
    /// are navigable; forward validation is bypassed.
    pub fn jump_to(&mut self, index: usize) -> Result<(), Refusal> {
        if self.in_flight {
            return Err(Refusal::SubmissionInFlight);
        }
        let Some(mode) = self.mode() else {
            return Err(Refusal::NotNow);
        };
        if index > self.highest_reached {
            return Err(Refusal::StepLocked);
        }
        self.phase = if index == results_index(mode) {
            Phase::ResultsDisplayed { mode }
        } else {
            Phase::StepActive { mode, index }
        };
        Ok(())
    }

    /// Start the submission. Re-validates every visible required field
    /// across the mode's input steps, then marks a submission in flight so
    /// a second submit is refused until [`Wizard::complete_submit`] runs.
    pub fn begin_submit(&mut self, form: &impl FormReader) -> Result<Mode, Refusal> {
        if self.in_flight {
            return Err(Refusal::SubmissionInFlight);
        }
        let Phase::StepActive { mode, index } = self.phase else {
            return Err(Refusal::NotNow);
        };
        if index != last_input_index(mode) {
            return Err(Refusal::NotNow);
        }
        for step in 0..=last_input_index(mode) {
            self.validate_step(mode, step, form)?;
        }
        self.in_flight = true;
        Ok(mode)
    }

    /// Resolve the in-flight submission. Success moves to the results
    /// phase; failure stays in place so the user can retry.
    pub fn complete_submit(&mut self, success: bool) {
        self.in_flight = false;
        if !success {
            return;
        }
        if let Phase::StepActive { mode, .. } = self.phase {
            self.phase = Phase::ResultsDisplayed { mode };
            self.highest_reached = self.highest_reached.max(results_index(mode));
        }
    }

    /// Full reset back to mode selection.
    pub fn start_over(&mut self) {
        self.phase = Phase::ModeUnselected;
        self.highest_reached = 0;
        self.in_flight = false;
    }

    fn validate_step(
        &self,
        mode: Mode,
        index: usize,
        form: &impl FormReader,
    ) -> Result<(), Refusal> {
        let step = &step_plan(mode)[index];
        let ctx = self.context(mode, form);
        for field in step.required {
            if !form.visible(field) {
                continue;
            }
            if let Some(rules) = self.rules.get(*field) {
                let verdict = evaluate(field, &form.value(field), rules, &ctx);
                if !verdict.valid {
                    return Err(Refusal::InvalidField {
                        field: (*field).to_owned(),
                        message: verdict
                            .message
                            .unwrap_or_else(|| "Nieprawidłowa wartość".to_owned()),
                    });
                }
            }
        }
        Ok(())
    }

    fn context(&self, mode: Mode, form: &impl FormReader) -> Context {
        let mut ctx = Context::new();
        for step in step_plan(mode) {
            for field in step.required {
                ctx.set(field, &form.value(field));
            }
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    struct MapForm {
        values: HashMap<String, String>,
        hidden: HashSet<String>,
    }

    impl MapForm {
        fn new() -> MapForm {
            MapForm {
                values: HashMap::new(),
                hidden: HashSet::new(),
            }
        }

        fn set(&mut self, field: &str, value: &str) {
            self.values.insert(field.to_owned(), value.to_owned());
        }

        fn hide(&mut self, field: &str) {
            self.hidden.insert(field.to_owned());
        }
    }

    impl FormReader for MapForm {
        fn value(&self, field: &str) -> String {
            self.values.get(field).cloned().unwrap_or_default()
        }

        fn visible(&self, field: &str) -> bool {
            !self.hidden.contains(field)
        }
    }

    fn wizard() -> Wizard {
        Wizard::new(Rc::new(default_rules()))
    }

    fn filled_forward_form() -> MapForm {
        let mut form = MapForm::new();
        form.set("age", "30");
        form.set("sex", "m");
        form.set("salary", "5000");
        form.set("start-year", "2015");
        form.set("end-year", "2045");
        form
    }

    #[test]
    fn next_refused_while_required_field_empty() {
        let mut w = wizard();
        w.select_mode(Mode::Forward);

        let mut form = MapForm::new();
        form.set("age", "30");
        let refusal = w.next(&form).unwrap_err();
        assert_eq!(
            refusal,
            Refusal::InvalidField {
                field: "sex".to_owned(),
                message: "Proszę wypełnić wszystkie wymagane pola".to_owned(),
            }
        );
        assert_eq!(w.active_index(), Some(0));
        assert_eq!(w.highest_reached(), 0);
    }

    #[test]
    fn first_invalid_field_is_reported_in_document_order() {
        let mut w = wizard();
        w.select_mode(Mode::Forward);
        let form = MapForm::new();
        let Err(Refusal::InvalidField { field, .. }) = w.next(&form) else {
            panic!("expected refusal");
        };
        assert_eq!(field, "age");
    }

    #[test]
    fn hidden_required_fields_are_exempt() {
        let mut w = wizard();
        w.select_mode(Mode::Forward);
        let mut form = MapForm::new();
        form.set("age", "30");
        form.hide("sex");
        assert!(w.next(&form).is_ok());
        assert_eq!(w.active_index(), Some(1));
    }

    #[test]
    fn highest_reached_is_monotone_until_start_over() {
        let mut w = wizard();
        w.select_mode(Mode::Forward);
        let form = filled_forward_form();

        w.next(&form).unwrap();
        w.next(&form).unwrap();
        assert_eq!(w.highest_reached(), 2);

        w.prev();
        w.prev();
        assert_eq!(w.active_index(), Some(0));
        assert_eq!(w.highest_reached(), 2);

        w.prev(); // clamped at the first step
        assert_eq!(w.active_index(), Some(0));

        w.start_over();
        assert_eq!(w.phase(), Phase::ModeUnselected);
        assert_eq!(w.highest_reached(), 0);
    }

    #[test]
    fn jump_to_succeeds_iff_previously_reached() {
        let mut w = wizard();
        w.select_mode(Mode::Forward);
        let form = filled_forward_form();
        w.next(&form).unwrap();

        assert_eq!(w.jump_to(3), Err(Refusal::StepLocked));
        assert_eq!(w.active_index(), Some(1));

        w.jump_to(0).unwrap();
        assert_eq!(w.active_index(), Some(0));
        w.jump_to(1).unwrap();
        assert_eq!(w.active_index(), Some(1));
    }

    #[test]
    fn submit_only_on_last_input_step_and_revalidates_everything() {
        let mut w = wizard();
        w.select_mode(Mode::Forward);
        let mut form = filled_forward_form();

        assert_eq!(w.begin_submit(&form), Err(Refusal::NotNow));

        w.next(&form).unwrap();
        w.next(&form).unwrap();

        // Defense in depth: a field from an earlier step emptied after it
        // was passed still blocks submission.
        form.set("salary", "");
        let Err(Refusal::InvalidField { field, .. }) = w.begin_submit(&form) else {
            panic!("expected refusal");
        };
        assert_eq!(field, "salary");

        form.set("salary", "5000");
        assert_eq!(w.begin_submit(&form), Ok(Mode::Forward));
        assert!(w.in_flight());
    }

    #[test]
    fn second_submit_refused_while_in_flight() {
        let mut w = wizard();
        w.select_mode(Mode::Forward);
        let form = filled_forward_form();
        w.next(&form).unwrap();
        w.next(&form).unwrap();

        w.begin_submit(&form).unwrap();
        assert_eq!(w.begin_submit(&form), Err(Refusal::SubmissionInFlight));
        assert_eq!(w.next(&form), Err(Refusal::SubmissionInFlight));

        w.complete_submit(false);
        assert!(!w.in_flight());
        assert_eq!(w.active_index(), Some(2)); // still in place after failure

        w.begin_submit(&form).unwrap();
        w.complete_submit(true);
        assert_eq!(w.phase(), Phase::ResultsDisplayed { mode: Mode::Forward });
        assert_eq!(w.highest_reached(), 3);
    }

    #[test]
    fn start_over_from_results_returns_to_mode_selection() {
        let mut w = wizard();
        w.select_mode(Mode::Reverse);
        let mut form = MapForm::new();
        form.set("age-rev", "30");
        form.set("sex-rev", "f");
        form.set("goal-income", "4000");
        form.set("retirement-age", "67");
        form.set("current-savings", "10000");

        w.next(&form).unwrap();
        w.next(&form).unwrap();
        w.begin_submit(&form).unwrap();
        w.complete_submit(true);
        assert_eq!(w.phase(), Phase::ResultsDisplayed { mode: Mode::Reverse });

        w.start_over();
        assert_eq!(w.phase(), Phase::ModeUnselected);
        assert_eq!(w.highest_reached(), 0);
        assert!(!w.in_flight());
    }

    #[test]
    fn jump_back_from_results_keeps_results_step_unlocked() {
        let mut w = wizard();
        w.select_mode(Mode::Forward);
        let form = filled_forward_form();
        w.next(&form).unwrap();
        w.next(&form).unwrap();
        w.begin_submit(&form).unwrap();
        w.complete_submit(true);

        w.jump_to(1).unwrap();
        assert_eq!(
            w.phase(),
            Phase::StepActive {
                mode: Mode::Forward,
                index: 1
            }
        );
        assert!(w.is_unlocked(3));
        w.jump_to(3).unwrap();
        assert_eq!(w.phase(), Phase::ResultsDisplayed { mode: Mode::Forward });
    }
}
