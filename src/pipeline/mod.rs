//! Submission pipeline state machine.
//!
//! Pure logic only: legal stage transitions, required accompanying data,
//! and the derived job-activation rule. All persistence happens in the
//! service layer; nothing here performs I/O or logging.

pub mod engine;
pub mod stage;

pub use engine::{PipelineError, TransitionPayload, TransitionPlan};
pub use stage::{JobStage, SubmissionStage};
