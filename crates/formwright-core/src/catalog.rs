//! Form catalog: the list view and form creation

use chrono::{DateTime, Utc};
use formwright_schema::{FormId, FormSchema};
use formwright_store::{KeyValueStore, SchemaStore, StoreError};
use serde::Serialize;

/// One row of the form list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSummary {
    /// Form identifier
    pub id: FormId,
    /// Display name
    pub name: String,
    /// Creation time, recovered from the identifier
    pub created_at: DateTime<Utc>,
}

impl FormSummary {
    /// Summary for a form id
    #[must_use]
    pub fn for_form(id: FormId) -> Self {
        Self {
            id,
            name: format!("Form {id}"),
            created_at: id.created_at(),
        }
    }
}

/// Entry point for listing and creating forms
#[derive(Debug, Clone)]
pub struct FormCatalog<S> {
    store: SchemaStore<S>,
}

impl<S: KeyValueStore> FormCatalog<S> {
    /// Create catalog over a schema store
    #[inline]
    #[must_use]
    pub fn new(store: SchemaStore<S>) -> Self {
        Self { store }
    }

    /// Underlying schema store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &SchemaStore<S> {
        &self.store
    }

    /// Create a new empty form and register it in the index
    ///
    /// # Errors
    /// Returns error if either write fails
    pub fn create_form(&self) -> Result<FormId, StoreError> {
        let id = FormId::new();
        self.store.save_schema(&id, &FormSchema::new())?;
        self.store.register_form(&id)?;
        tracing::info!(form_id = %id, "form created");
        Ok(id)
    }

    /// All known forms, oldest first
    ///
    /// # Errors
    /// Returns error if the index cannot be read
    pub fn list_forms(&self) -> Result<Vec<FormSummary>, StoreError> {
        Ok(self
            .store
            .form_ids()?
            .into_iter()
            .map(FormSummary::for_form)
            .collect())
    }
}
