//! Form field value objects

use crate::validate::ValidatorSpec;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reference to an attached file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
}

impl FileRef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Free text; numeric input is kept as entered
    Text(String),
    /// On/off state for checkbox-style controls
    Flag(bool),
    /// Attached files for picker controls
    Files(Vec<FileRef>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    pub fn text(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }

    /// Emptiness is defined per value kind: empty string, unset flag,
    /// or empty file list.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Flag(b) => !b,
            FieldValue::Files(files) => files.is_empty(),
        }
    }

    /// Get the text value (returns empty string for non-text values)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    /// Seed a value from one entry of an initial-values object.
    ///
    /// Strings and booleans map directly; numbers are kept as text the
    /// way a user would have typed them; string arrays become file lists.
    /// Anything else does not seed the field.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(FieldValue::Text(s.clone())),
            serde_json::Value::Bool(b) => Some(FieldValue::Flag(*b)),
            serde_json::Value::Number(n) => Some(FieldValue::Text(n.to_string())),
            serde_json::Value::Array(items) => {
                let names: Vec<FileRef> = items
                    .iter()
                    .filter_map(|v| v.as_str().map(FileRef::new))
                    .collect();
                Some(FieldValue::Files(names))
            }
            _ => None,
        }
    }
}

/// Control kind the presentation layer renders for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TextArea,
    Rating,
    Radio,
    Checkbox,
    CardSet,
    FilePicker,
}

impl FieldKind {
    /// The value an unseeded field of this kind starts with
    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldKind::Checkbox => FieldValue::Flag(false),
            FieldKind::FilePicker => FieldValue::Files(Vec::new()),
            _ => FieldValue::Text(String::new()),
        }
    }
}

/// Ordered field collection for one form session.
/// Iteration order is the declared order from the form definition.
pub type FieldMap = IndexMap<String, Field>;

/// A single live field within a form session
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: FieldValue,
    /// Baseline from the initial-values object; dirty compares against this
    pub(crate) initial: FieldValue,
    /// Current validation error. Only the validation engine writes this.
    pub(crate) error: Option<String>,
    pub(crate) dirty: bool,
    pub(crate) touched: bool,
    pub(crate) validators: Vec<ValidatorSpec>,
    pub(crate) dependent_fields: Vec<String>,
}

impl Field {
    pub(crate) fn new(
        name: &str,
        label: &str,
        kind: FieldKind,
        value: FieldValue,
        validators: Vec<ValidatorSpec>,
        dependent_fields: Vec<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            initial: value.clone(),
            value,
            error: None,
            dirty: false,
            touched: false,
            validators,
            dependent_fields,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn touched(&self) -> bool {
        self.touched
    }

    /// A pristine field has never been edited or blurred
    pub fn is_pristine(&self) -> bool {
        !self.dirty && !self.touched
    }

    /// The error shown to the user. Pristine fields are exempt from eager
    /// error display; submit force-touches every field so outstanding
    /// errors become visible at once.
    pub fn visible_error(&self) -> Option<&str> {
        if self.dirty || self.touched {
            self.error.as_deref()
        } else {
            None
        }
    }

    /// True when the value differs from the initialization baseline.
    /// This drives the submit no-op check, independent of the `dirty`
    /// flag which submit forces on.
    pub(crate) fn is_modified(&self) -> bool {
        self.value != self.initial
    }

    pub(crate) fn set_value(&mut self, value: FieldValue) {
        self.value = value;
        self.dirty = self.is_modified();
        self.touched = true;
    }

    /// Replace the baseline and return the field to its pristine state
    pub(crate) fn rebaseline(&mut self, value: FieldValue) {
        self.initial = value.clone();
        self.value = value;
        self.error = None;
        self.dirty = false;
        self.touched = false;
    }

    /// Read-only snapshot for presentation adapters
    pub fn view(&self) -> FieldView {
        FieldView {
            name: self.name.clone(),
            label: self.label.clone(),
            kind: self.kind,
            value: self.value.clone(),
            error: self.visible_error().map(str::to_string),
        }
    }
}

/// What a presentation adapter needs to render one control
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: FieldValue,
    /// Already filtered by the pristine-exemption rule
    pub error: Option<String>,
}
