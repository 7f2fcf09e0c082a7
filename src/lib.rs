//! formcore - form state, validation, and scorecard scoring
//!
//! A rendering-agnostic engine for interactive forms: a per-field state
//! machine (pristine, touched, dirty, validated, submitted), a
//! dependency-aware validation pass with a flicker-free error-retention
//! policy, submit/reset orchestration over an ordered field collection,
//! and a weighted hierarchical scoring aggregator for review scorecards.
//!
//! The presentation layer is an external collaborator: it renders
//! [`FieldView`] snapshots, forwards change/blur events to the
//! [`FormSession`], and supplies the save and notification seams invoked
//! at submit time.

pub mod definition;
pub mod error;
pub mod field;
pub mod scoring;
pub mod session;
pub mod validate;

pub use definition::{FieldDescriptor, FieldGroup, FormDefinition};
pub use error::{save_error_message, ConfigError, SaveRejection};
pub use field::{Field, FieldKind, FieldMap, FieldValue, FieldView, FileRef};
pub use scoring::{evaluate, Answer, AnswerSet, Group, Question, QuestionKind, ScoreBreakdown, Scorecard, Section};
pub use session::{
    FormSession, InitialValues, Notifier, SaveHandler, SessionPhase, SettleOutcome, SubmitOutcome,
};
pub use validate::{Trigger, ValidatorKind, ValidatorSpec};
