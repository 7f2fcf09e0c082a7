//! Form session layer
//!
//! One session owns the live field collection for one rendered form
//! instance and orchestrates change/blur/submit/reset across it. The
//! loader handles sequential background enrichment of auxiliary data.

mod form_session;
pub mod loader;

pub use form_session::{
    FormSession, InitialValues, Notifier, SaveHandler, SessionPhase, SettleOutcome, SubmitOutcome,
    DEFAULT_SUCCESS_MESSAGE,
};
