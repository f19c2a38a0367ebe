//! Field definitions
//!
//! Provides [`FieldDefinition`], the descriptor of one question in a form,
//! together with its [`FieldKind`], [`SelectOption`]s and [`Validations`].
//!
//! The serialized layout is camelCase JSON with the kind stored under `type`:
//!
//! ```json
//! {"id":"01J...","label":"Age","type":"number","placeholder":"years",
//!  "defaultValue":"5","validations":{"required":true,"min":1.0,"max":10.0}}
//! ```

use crate::ids::FieldId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Input kind of a field
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text
    #[default]
    Text,

    /// Numeric input
    Number,

    /// Single choice among options
    Select,
}

impl FieldKind {
    /// All kinds, in builder menu order
    pub const ALL: [FieldKind; 3] = [FieldKind::Text, FieldKind::Number, FieldKind::Select];

    /// Lowercase wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Select => "select",
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown field kind: {s}"))
    }
}

/// One `(label, value)` choice of a select field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct SelectOption {
    /// Text shown to the user
    pub label: String,
    /// Submitted value, unique within the field
    pub value: String,
}

impl SelectOption {
    /// Create new option
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Validation constraints attached to a field
///
/// `min`/`max` apply to number fields, `min_length`/`max_length` to text
/// fields. Constraints that do not match the field's kind are kept in storage
/// but ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Validations {
    /// Answer must be present
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    /// Lowest accepted number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Highest accepted number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Shortest accepted text, in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Longest accepted text, in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl Validations {
    /// True when no constraint is set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One question/input descriptor within a form schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Identifier, unique within the schema
    pub id: FieldId,

    /// Display text
    #[serde(default)]
    pub label: String,

    /// Input kind
    #[serde(rename = "type", default)]
    pub kind: FieldKind,

    /// Placeholder / helper text
    #[serde(default)]
    pub placeholder: String,

    /// Pre-filled answer, in its textual form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Choices (select kind only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,

    /// Constraints
    #[serde(default, skip_serializing_if = "Validations::is_empty")]
    pub validations: Validations,
}

impl FieldDefinition {
    /// Create an empty field of the given kind with a fresh id
    #[must_use]
    pub fn new(kind: FieldKind) -> Self {
        Self {
            id: FieldId::new(),
            label: String::new(),
            kind,
            placeholder: String::new(),
            default_value: None,
            options: Vec::new(),
            validations: Validations::default(),
        }
    }

    /// With label
    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// With placeholder
    #[inline]
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// With default value
    #[inline]
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// With option appended (no duplicate check; see the builder for that)
    #[inline]
    #[must_use]
    pub fn with_option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(label, value));
        self
    }

    /// With validations
    #[inline]
    #[must_use]
    pub fn with_validations(mut self, validations: Validations) -> Self {
        self.validations = validations;
        self
    }

    /// Default value, treating a blank string as absent
    #[inline]
    #[must_use]
    pub fn default_answer(&self) -> Option<&str> {
        self.default_value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Check whether an option with this value exists
    #[inline]
    #[must_use]
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    /// Label for headers, `NA` when blank
    #[must_use]
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            "NA"
        } else {
            &self.label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn new_field_defaults_to_empty_text() {
        let field = FieldDefinition::new(FieldKind::default());
        assert_eq!(field.kind, FieldKind::Text);
        assert!(field.label.is_empty());
        assert!(field.placeholder.is_empty());
        assert!(field.validations.is_empty());
        assert_eq!(field.display_label(), "NA");
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(FieldKind::from_str("Number").unwrap(), FieldKind::Number);
        assert_eq!(FieldKind::from_str(" select ").unwrap(), FieldKind::Select);
        assert!(FieldKind::from_str("date").is_err());
    }

    #[test]
    fn serialized_layout_uses_type_and_camel_case() {
        let mut field = FieldDefinition::new(FieldKind::Text).with_label("Name");
        field.validations.max_length = Some(20);
        let json = serde_json::to_value(&field).unwrap();

        assert_eq!(json["type"], "text");
        assert_eq!(json["validations"]["maxLength"], 20);
        assert!(json.get("defaultValue").is_none());
        assert!(json.get("options").is_none());
        assert!(json["validations"].get("required").is_none());
    }

    #[test]
    fn sparse_stored_field_deserializes() {
        let id = FieldId::new();
        let raw = format!(r#"{{"id":"{id}","label":"Q","type":"number","validations":{{"min":null}}}}"#);
        let field: FieldDefinition = serde_json::from_str(&raw).unwrap();
        assert_eq!(field.kind, FieldKind::Number);
        assert_eq!(field.placeholder, "");
        assert_eq!(field.validations.min, None);
    }

    #[test]
    fn empty_default_is_treated_as_absent() {
        let field = FieldDefinition::new(FieldKind::Text).with_default("");
        assert_eq!(field.default_answer(), None);
    }
}
