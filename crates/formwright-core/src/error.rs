//! Error types for Formwright Core
//!
//! Validation problems inside a schema are not errors (see
//! [`ValidationReport`]); the types here cover rejected operations, blocked
//! transitions, failed submissions and storage failures.

use formwright_schema::{FieldId, ValidationReport};
use formwright_store::StoreError;
use indexmap::IndexMap;
use std::path::PathBuf;

/// Builder operation errors
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    /// No field with this id in the schema
    #[error("field not found: {0}")]
    FieldNotFound(FieldId),

    /// Select option rejected
    #[error("option rejected: {0}")]
    RejectedOption(#[from] OptionError),

    /// Schema has validation errors; preview is not allowed
    #[error("preview blocked: {} field(s) invalid", .0.len())]
    PreviewBlocked(ValidationReport),

    /// Persisting failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl BuilderError {
    /// Validation report behind a blocked preview
    #[inline]
    #[must_use]
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::PreviewBlocked(report) => Some(report),
            _ => None,
        }
    }
}

/// Reasons a select option is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    /// Field is not of select kind
    #[error("field {0} is not a select field")]
    NotSelectField(FieldId),

    /// Option value is blank
    #[error("option value must not be empty")]
    EmptyValue,

    /// Option value already present
    #[error("option value '{0}' already exists")]
    DuplicateValue(String),
}

/// Form submission errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    /// Form has no fields
    #[error("form is empty")]
    EmptyForm,

    /// Answer for a field that is not in the form
    #[error("unknown field: {0}")]
    UnknownField(FieldId),

    /// One or more answers failed their rules
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(IndexMap<FieldId, String>),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_error_display() {
        let id = FieldId::new();
        let err = BuilderError::FieldNotFound(id);
        assert!(err.to_string().contains(&id.to_string()));

        let err: BuilderError = OptionError::EmptyValue.into();
        assert_eq!(err.to_string(), "option rejected: option value must not be empty");
        assert!(err.report().is_none());
    }

    #[test]
    fn store_error_converts() {
        let err: BuilderError = StoreError::Unavailable("down".into()).into();
        assert!(matches!(err, BuilderError::Store(_)));
    }

    #[test]
    fn submit_error_counts_fields() {
        let mut errors = IndexMap::new();
        errors.insert(FieldId::new(), "This field is required".to_string());
        assert_eq!(SubmitError::Invalid(errors).to_string(), "1 field(s) failed validation");
    }
}
