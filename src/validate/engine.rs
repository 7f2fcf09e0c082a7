//! Event-driven validation engine
//!
//! Runs a field's validators for a trigger event, applies the
//! error-retention policy, and cascades one level across the field's
//! declared dependents.

use super::validators;
use crate::error::ConfigError;
use crate::field::FieldMap;

/// Input event that triggered a validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Change,
    Blur,
    Submit,
}

/// Validate one field, then re-validate its declared dependents with the
/// same event semantics. The cascade is one level deep: dependents' own
/// dependents are not transitively revisited.
pub(crate) fn validate_field(
    fields: &mut FieldMap,
    name: &str,
    trigger: Trigger,
) -> Result<(), ConfigError> {
    validate_single(fields, name, trigger)?;

    let dependents = fields
        .get(name)
        .ok_or_else(|| ConfigError::UnknownField(name.to_string()))?
        .dependent_fields
        .clone();
    for dependent in dependents {
        validate_single(fields, &dependent, trigger)?;
    }
    Ok(())
}

/// Validate every field for the given trigger. On submit, every field is
/// force-marked dirty and touched first so required-but-untouched fields
/// surface their errors at once.
///
/// Every field is visited directly, so the dependent cascade is already
/// covered by the pass itself.
pub(crate) fn validate_form(fields: &mut FieldMap, trigger: Trigger) -> Result<(), ConfigError> {
    if trigger == Trigger::Submit {
        for field in fields.values_mut() {
            field.dirty = true;
            field.touched = true;
        }
    }
    let names: Vec<String> = fields.keys().cloned().collect();
    for name in names {
        validate_single(fields, &name, trigger)?;
    }
    Ok(())
}

/// The form is valid iff no field carries a defined error
pub(crate) fn is_valid(fields: &FieldMap) -> bool {
    fields.values().all(|f| f.error.is_none())
}

/// Run one field's validators in declared order and apply the
/// error-retention policy:
///
/// - `Change` only ever clears an error. A still-failing validator leaves
///   the previously displayed message untouched, so the text does not
///   flicker while the user types.
/// - `Blur`/`Submit` set an error only on a field that has none; an
///   existing error is never overwritten by a different validator's
///   message within the event. A passing field is always cleared.
fn validate_single(fields: &mut FieldMap, name: &str, trigger: Trigger) -> Result<(), ConfigError> {
    let candidate = first_failure(fields, name)?;

    let field = fields
        .get_mut(name)
        .ok_or_else(|| ConfigError::UnknownField(name.to_string()))?;
    match trigger {
        Trigger::Change => {
            if candidate.is_none() {
                field.error = None;
            }
        }
        Trigger::Blur | Trigger::Submit => match candidate {
            None => field.error = None,
            Some(message) => {
                if field.error.is_none() {
                    field.error = Some(message);
                }
            }
        },
    }
    Ok(())
}

/// First failing validator's message, in declared order.
/// Sibling lookups that cannot be satisfied are configuration errors.
fn first_failure(fields: &FieldMap, name: &str) -> Result<Option<String>, ConfigError> {
    let field = fields
        .get(name)
        .ok_or_else(|| ConfigError::UnknownField(name.to_string()))?;

    for spec in &field.validators {
        let sibling = if spec.kind.requires_sibling() {
            let other_name =
                spec.other_field
                    .as_deref()
                    .ok_or_else(|| ConfigError::MissingSiblingName {
                        field: name.to_string(),
                    })?;
            Some(
                fields
                    .get(other_name)
                    .ok_or_else(|| ConfigError::UnknownSibling {
                        field: name.to_string(),
                        sibling: other_name.to_string(),
                    })?,
            )
        } else {
            // custom validators may still name a sibling to consult
            spec.other_field.as_deref().and_then(|n| fields.get(n))
        };

        if let Some(message) = validators::run(spec, &field.value, sibling) {
            return Ok(Some(message));
        }
    }
    Ok(None)
}
