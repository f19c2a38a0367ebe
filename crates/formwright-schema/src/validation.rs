//! Schema validation
//!
//! Derives at most one [`FieldIssue`] per field and aggregates them into a
//! [`ValidationReport`]. Issues are values: nothing here fails or panics, and
//! an invalid schema can still be stored.

use crate::field::{FieldDefinition, FieldKind};
use crate::ids::FieldId;
use crate::schema::FormSchema;
use indexmap::IndexMap;

/// Problem with a single field definition
///
/// The `Display` text is the user-facing message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldIssue {
    /// Label is blank
    #[error("Label is required")]
    MissingLabel,

    /// Number field with `min > max`
    #[error("Max value should be greater than Min value")]
    InvertedRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Text field with `min_length > max_length`
    #[error("Max Length should be greater than Min Length")]
    InvertedLengthRange {
        /// Shortest length
        min_length: usize,
        /// Longest length
        max_length: usize,
    },

    /// Required field without a default value
    #[error("Default value is required for a required field")]
    RequiredWithoutDefault,

    /// Number field whose default does not parse
    #[error("Default value must be a number")]
    DefaultNotNumeric,

    /// Number default below `min`
    #[error("Default value must be at least {min}")]
    DefaultBelowMin {
        /// Lower bound
        min: f64,
    },

    /// Number default above `max`
    #[error("Default value must be at most {max}")]
    DefaultAboveMax {
        /// Upper bound
        max: f64,
    },

    /// Text default shorter than `min_length`
    #[error("Default value must be at least {min_length} characters")]
    DefaultTooShort {
        /// Shortest length
        min_length: usize,
    },

    /// Text default longer than `max_length`
    #[error("Default value must be at most {max_length} characters")]
    DefaultTooLong {
        /// Longest length
        max_length: usize,
    },

    /// Select default not among option values
    #[error("Default value must be one of the options")]
    DefaultNotAnOption,
}

/// Parse a numeric answer, rejecting NaN and infinities
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Validate one field definition
///
/// Checks run in a fixed order and the first failure wins:
/// label, constraint ranges, required default, then the default value
/// against the field's own constraints.
#[must_use]
pub fn validate_field(field: &FieldDefinition) -> Option<FieldIssue> {
    if field.label.trim().is_empty() {
        return Some(FieldIssue::MissingLabel);
    }

    let v = &field.validations;
    match field.kind {
        FieldKind::Number => {
            if let (Some(min), Some(max)) = (v.min, v.max) {
                if min > max {
                    return Some(FieldIssue::InvertedRange { min, max });
                }
            }
        }
        FieldKind::Text => {
            if let (Some(min_length), Some(max_length)) = (v.min_length, v.max_length) {
                if min_length > max_length {
                    return Some(FieldIssue::InvertedLengthRange {
                        min_length,
                        max_length,
                    });
                }
            }
        }
        FieldKind::Select => {}
    }

    let Some(default) = field.default_answer() else {
        return v.required.then_some(FieldIssue::RequiredWithoutDefault);
    };

    match field.kind {
        FieldKind::Number => {
            let Some(n) = parse_number(default) else {
                return Some(FieldIssue::DefaultNotNumeric);
            };
            if let Some(min) = v.min.filter(|min| n < *min) {
                return Some(FieldIssue::DefaultBelowMin { min });
            }
            if let Some(max) = v.max.filter(|max| n > *max) {
                return Some(FieldIssue::DefaultAboveMax { max });
            }
        }
        FieldKind::Text => {
            let len = default.chars().count();
            if let Some(min_length) = v.min_length.filter(|min| len < *min) {
                return Some(FieldIssue::DefaultTooShort { min_length });
            }
            if let Some(max_length) = v.max_length.filter(|max| len > *max) {
                return Some(FieldIssue::DefaultTooLong { max_length });
            }
        }
        FieldKind::Select => {
            if !field.has_option(default) {
                return Some(FieldIssue::DefaultNotAnOption);
            }
        }
    }

    None
}

/// Validate every field of a schema
#[must_use]
pub fn validate_schema(schema: &FormSchema) -> ValidationReport {
    let issues = schema
        .iter()
        .filter_map(|field| validate_field(field).map(|issue| (field.id, issue)))
        .collect();
    ValidationReport { issues }
}

/// Per-field validation outcome, in schema order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    issues: IndexMap<FieldId, FieldIssue>,
}

impl ValidationReport {
    /// True when no field has an issue
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of fields with an issue
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Check if report is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue for a field, if any
    #[inline]
    #[must_use]
    pub fn get(&self, id: &FieldId) -> Option<&FieldIssue> {
        self.issues.get(id)
    }

    /// Iterate `(field, issue)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &FieldIssue)> {
        self.issues.iter()
    }

    /// User-facing messages keyed by field
    #[must_use]
    pub fn messages(&self) -> IndexMap<FieldId, String> {
        self.issues
            .iter()
            .map(|(id, issue)| (*id, issue.to_string()))
            .collect()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .issues
            .iter()
            .map(|(id, issue)| format!("{id}: {issue}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
