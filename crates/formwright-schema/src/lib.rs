//! Formwright Schema
//!
//! Typed model for dynamic forms and the validation rules derived from it.
//!
//! # Overview
//!
//! - **FieldDefinition**: one question (label, kind, helper text, default, options, constraints)
//! - **FormSchema**: insertion-ordered fields keyed by [`FieldId`]
//! - **validate_schema**: zero-or-one [`FieldIssue`] per field, aggregated in a [`ValidationReport`]
//!
//! # Example
//!
//! ```rust
//! use formwright_schema::{validate_schema, FieldDefinition, FieldKind, FormSchema};
//!
//! let mut schema = FormSchema::new();
//! let mut age = FieldDefinition::new(FieldKind::Number).with_label("Age");
//! age.validations.min = Some(1.0);
//! age.validations.max = Some(10.0);
//! age.default_value = Some("15".to_string());
//! let id = age.id;
//! schema.push(age);
//!
//! let report = validate_schema(&schema);
//! assert_eq!(report.len(), 1);
//! assert!(report.get(&id).is_some());
//! ```

#![warn(missing_docs)]

pub mod field;
pub mod ids;
pub mod schema;
pub mod validation;

// Re-exports
pub use field::{FieldDefinition, FieldKind, SelectOption, Validations};
pub use ids::{FieldId, FormId, IdError};
pub use schema::FormSchema;
pub use validation::{parse_number, validate_field, validate_schema, FieldIssue, ValidationReport};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for schema operations
    pub use crate::{
        validate_schema, FieldDefinition, FieldId, FieldIssue, FieldKind, FormId, FormSchema,
        SelectOption, ValidationReport, Validations,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
