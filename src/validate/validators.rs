//! Built-in validators
//!
//! Each validator maps a field value (and, for cross-field rules, a
//! sibling field) to an optional error message. Messages are user-facing
//! data; a missing sibling is a configuration error raised by the engine,
//! never a validation message.

use crate::field::{Field, FieldValue};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    )
    .expect("email pattern");
    static ref URL_RE: Regex =
        Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*)://\S+$").expect("url pattern");
}

/// Symbols that satisfy the password digit-or-symbol requirement
const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?`~";

const PASSWORD_MESSAGE: &str =
    "Password must be at least 8 characters and contain a letter and a number or symbol";

/// Host-supplied validation function for rules the built-ins don't cover
pub type CustomValidator = fn(&FieldValue, Option<&Field>) -> Option<String>;

/// The built-in validator set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    Required,
    Email,
    Password,
    MatchOther,
    DoesNotMatchOther,
    RequiredIfOther,
    SslUrl,
    /// Not expressible in JSON definitions
    #[serde(skip)]
    Custom(CustomValidator),
}

impl ValidatorKind {
    /// Cross-field validators must name a sibling in their spec
    pub fn requires_sibling(&self) -> bool {
        matches!(
            self,
            ValidatorKind::MatchOther
                | ValidatorKind::DoesNotMatchOther
                | ValidatorKind::RequiredIfOther
        )
    }
}

/// One validator attached to a field, optionally referencing a sibling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorSpec {
    pub kind: ValidatorKind,
    /// Sibling field consulted by cross-field validators
    #[serde(default)]
    pub other_field: Option<String>,
}

impl ValidatorSpec {
    pub fn required() -> Self {
        Self {
            kind: ValidatorKind::Required,
            other_field: None,
        }
    }

    pub fn email() -> Self {
        Self {
            kind: ValidatorKind::Email,
            other_field: None,
        }
    }

    pub fn password() -> Self {
        Self {
            kind: ValidatorKind::Password,
            other_field: None,
        }
    }

    pub fn ssl_url() -> Self {
        Self {
            kind: ValidatorKind::SslUrl,
            other_field: None,
        }
    }

    pub fn match_other(sibling: &str) -> Self {
        Self {
            kind: ValidatorKind::MatchOther,
            other_field: Some(sibling.to_string()),
        }
    }

    pub fn does_not_match_other(sibling: &str) -> Self {
        Self {
            kind: ValidatorKind::DoesNotMatchOther,
            other_field: Some(sibling.to_string()),
        }
    }

    pub fn required_if_other(sibling: &str) -> Self {
        Self {
            kind: ValidatorKind::RequiredIfOther,
            other_field: Some(sibling.to_string()),
        }
    }

    pub fn custom(f: CustomValidator) -> Self {
        Self {
            kind: ValidatorKind::Custom(f),
            other_field: None,
        }
    }
}

/// Dispatch one validator. Cross-field kinds receive their resolved
/// sibling from the engine.
pub(crate) fn run(
    spec: &ValidatorSpec,
    value: &FieldValue,
    sibling: Option<&Field>,
) -> Option<String> {
    match spec.kind {
        ValidatorKind::Required => validate_required(value),
        ValidatorKind::Email => validate_email(value),
        ValidatorKind::Password => validate_password(value),
        ValidatorKind::SslUrl => validate_ssl_url(value),
        ValidatorKind::MatchOther => sibling.and_then(|other| validate_match_other(value, other)),
        ValidatorKind::DoesNotMatchOther => {
            sibling.and_then(|other| validate_does_not_match_other(value, other))
        }
        ValidatorKind::RequiredIfOther => {
            sibling.and_then(|other| validate_required_if_other(value, other))
        }
        ValidatorKind::Custom(f) => f(value, sibling),
    }
}

/// Fails when the value is empty for its kind: empty string, unset flag,
/// or empty file list.
pub fn validate_required(value: &FieldValue) -> Option<String> {
    if value.is_empty() {
        Some("Required".to_string())
    } else {
        None
    }
}

/// Fails when a non-empty text value is not a plausible address.
/// Empty input and non-text values are not this validator's concern.
pub fn validate_email(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) if !s.is_empty() => {
            if EMAIL_RE.is_match(s) {
                None
            } else {
                Some("Invalid email".to_string())
            }
        }
        _ => None,
    }
}

/// Requires at least 8 characters, at least one letter, and at least one
/// digit or symbol from the fixed symbol set.
pub fn validate_password(value: &FieldValue) -> Option<String> {
    let s = value.as_text();
    let long_enough = s.chars().count() >= 8;
    let has_letter = s.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit_or_symbol = s
        .chars()
        .any(|c| c.is_ascii_digit() || PASSWORD_SYMBOLS.contains(c));
    if long_enough && has_letter && has_digit_or_symbol {
        None
    } else {
        Some(PASSWORD_MESSAGE.to_string())
    }
}

/// Value must parse as an absolute URL whose scheme is exactly `https`.
/// Syntax and scheme failures report distinct messages.
pub fn validate_ssl_url(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) if !s.is_empty() => match URL_RE.captures(s) {
            None => Some("Invalid URL".to_string()),
            Some(caps) => {
                if &caps["scheme"] == "https" {
                    None
                } else {
                    Some("links must start with https".to_string())
                }
            }
        },
        _ => None,
    }
}

/// Fails unless the value equals the sibling's current value
pub fn validate_match_other(value: &FieldValue, other: &Field) -> Option<String> {
    if value == &other.value {
        None
    } else {
        Some(format!("Does not match {}", other.label))
    }
}

/// Fails when the value equals the sibling's current value
pub fn validate_does_not_match_other(value: &FieldValue, other: &Field) -> Option<String> {
    if value == &other.value {
        Some(format!("Must not match {}", other.label))
    } else {
        None
    }
}

/// Required only while the sibling currently holds a value
pub fn validate_required_if_other(value: &FieldValue, other: &Field) -> Option<String> {
    if !other.value.is_empty() && value.is_empty() {
        Some("Required".to_string())
    } else {
        None
    }
}
