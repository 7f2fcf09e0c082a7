//! Form definitions
//!
//! A definition declares ordered groups of field descriptors plus optional
//! presentation strings. All cross-field references (validator siblings,
//! dependent fields) are checked once at build time, so a mismatched
//! definition fails at construction instead of mid-validation.

use crate::error::ConfigError;
use crate::field::FieldKind;
use crate::validate::ValidatorSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Describes one field within a form definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub validators: Vec<ValidatorSpec>,
    /// Fields re-validated whenever this field's value changes.
    /// The declaration is authoritative; dependencies are never inferred
    /// from validator arguments.
    #[serde(default)]
    pub dependent_fields: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            validators: Vec::new(),
            dependent_fields: Vec::new(),
        }
    }

    pub fn with_validator(mut self, spec: ValidatorSpec) -> Self {
        self.validators.push(spec);
        self
    }

    pub fn with_dependent(mut self, name: &str) -> Self {
        self.dependent_fields.push(name.to_string());
        self
    }
}

/// An ordered group of fields rendered together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGroup {
    #[serde(default)]
    pub title: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl FieldGroup {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: None,
            fields,
        }
    }

    pub fn titled(title: &str, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: Some(title.to_string()),
            fields,
        }
    }
}

/// A complete form definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Shown on successful save; a generic default is used when absent
    #[serde(default)]
    pub success_message: Option<String>,
    pub groups: Vec<FieldGroup>,
}

impl FormDefinition {
    /// Build a definition, resolving all cross-field references.
    /// A duplicate field name, a validator naming a nonexistent sibling,
    /// or a dependent reference to a nonexistent field fails here.
    pub fn new(groups: Vec<FieldGroup>) -> Result<Self, ConfigError> {
        let definition = Self {
            short_name: None,
            title: None,
            subtitle: None,
            success_message: None,
            groups,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Load and resolve a definition from a JSON configuration string
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let definition: Self = serde_json::from_str(json)?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn with_short_name(mut self, short_name: &str) -> Self {
        self.short_name = Some(short_name.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    pub fn with_success_message(mut self, message: &str) -> Self {
        self.success_message = Some(message.to_string());
        self
    }

    /// All field descriptors in declared order, across groups
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.groups.iter().flat_map(|g| g.fields.iter())
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let mut names: HashSet<&str> = HashSet::new();
        for field in self.fields() {
            if !names.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField(field.name.clone()));
            }
        }
        for field in self.fields() {
            for spec in &field.validators {
                if spec.kind.requires_sibling() {
                    let other = spec.other_field.as_deref().ok_or_else(|| {
                        ConfigError::MissingSiblingName {
                            field: field.name.clone(),
                        }
                    })?;
                    if !names.contains(other) {
                        return Err(ConfigError::UnknownSibling {
                            field: field.name.clone(),
                            sibling: other.to_string(),
                        });
                    }
                }
            }
            for dependent in &field.dependent_fields {
                if !names.contains(dependent.as_str()) {
                    return Err(ConfigError::UnknownDependent {
                        field: field.name.clone(),
                        dependent: dependent.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
