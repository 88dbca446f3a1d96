//! Calculator wizard state machine.
//!
//! Pure transition logic for the multi-step pension calculator: mode
//! selection, step unlocking, validation gating, and submission lifecycle.
//! The machine knows nothing about the DOM; the browser layer feeds it form
//! snapshots through [`FormReader`] and renders whatever state it reports.

pub mod format;
pub mod machine;
pub mod plan;
pub mod summary;

pub use machine::{FormReader, Mode, Phase, Refusal, RuleBook, Wizard};
pub use plan::{StepDef, last_input_index, step_plan};
pub use summary::{AVERAGE_PENSION_PLN, ForwardSummary, ReverseSummary};
