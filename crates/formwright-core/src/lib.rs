//! Formwright Core
//!
//! Builder sessions, autosave and the renderer, all working against an
//! injected [`KeyValueStore`](formwright_store::KeyValueStore):
//! - [`FormCatalog`]: list known forms, create new ones
//! - [`FormBuilder`]: edit one form's fields, validate, save
//! - [`Autosave`]: debounced background save of a shared builder
//! - [`FormRenderer`]: widgets, validation rules and submission
//!
//! # Example
//!
//! ```rust
//! use formwright_core::{FieldPatch, FormBuilder, FormCatalog, FormRenderer};
//! use formwright_schema::FieldKind;
//! use formwright_store::{MemoryStore, SchemaStore};
//! use std::sync::Arc;
//!
//! let store = SchemaStore::new(Arc::new(MemoryStore::new()));
//! let form_id = FormCatalog::new(store.clone()).create_form()?;
//!
//! let mut builder = FormBuilder::load(store.clone(), form_id);
//! let field = builder.add_field();
//! builder.edit_field(&field, FieldPatch::new().label("Age").kind(FieldKind::Number))?;
//! builder.preview()?;
//!
//! let form = FormRenderer::load(&store, form_id).render();
//! assert_eq!(form.fields.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod autosave;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod renderer;

// Re-exports for convenience
pub use autosave::{Autosave, SharedBuilder};
pub use builder::{FieldPatch, FormBuilder, SaveState};
pub use catalog::{FormCatalog, FormSummary};
pub use config::{FormsConfig, DEFAULT_AUTOSAVE_DELAY_MS};
pub use error::{BuilderError, ConfigError, OptionError, SubmitError};
pub use renderer::{
    derive_rules, Answers, FormRenderer, RenderedField, RenderedForm, Rule, Submission, Widget,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Formwright Core
    pub use crate::{
        Answers, Autosave, FieldPatch, FormBuilder, FormCatalog, FormRenderer, FormsConfig,
        RenderedForm, Rule, Widget,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
