//! Field validation
//!
//! The validator set maps values (and cross-field siblings) to optional
//! error messages; the engine orchestrates validator runs per trigger
//! event with the error-retention policy and the dependency cascade.

mod engine;
mod validators;

pub use engine::Trigger;
pub(crate) use engine::{is_valid, validate_field, validate_form};
pub use validators::{
    validate_does_not_match_other, validate_email, validate_match_other, validate_password,
    validate_required, validate_required_if_other, validate_ssl_url, CustomValidator,
    ValidatorKind, ValidatorSpec,
};
