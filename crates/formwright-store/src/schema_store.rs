//! Typed schema store
//!
//! Layout on top of any [`KeyValueStore`]:
//! - a fixed index key (default `formIds`) holding a JSON array of form ids
//! - one key per form id holding that form's JSON field array
//!
//! Reads fail closed: an absent key is an empty list and unparseable content
//! is logged and treated as empty. Only an unreachable backend is an error.

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use formwright_schema::{FormId, FormSchema};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default key of the form index
pub const DEFAULT_INDEX_KEY: &str = "formIds";

/// Typed access to the form index and per-form schemas
#[derive(Debug, Clone)]
pub struct SchemaStore<S> {
    backend: S,
    index_key: String,
}

impl<S: KeyValueStore> SchemaStore<S> {
    /// Create store over `backend` using the default index key
    #[inline]
    #[must_use]
    pub fn new(backend: S) -> Self {
        Self::with_index_key(backend, DEFAULT_INDEX_KEY)
    }

    /// Create store with a custom index key
    #[inline]
    #[must_use]
    pub fn with_index_key(backend: S, index_key: impl Into<String>) -> Self {
        Self {
            backend,
            index_key: index_key.into(),
        }
    }

    /// Underlying backend
    #[inline]
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Key of the form index
    #[inline]
    #[must_use]
    pub fn index_key(&self) -> &str {
        &self.index_key
    }

    /// Known form ids, in creation order
    ///
    /// # Errors
    /// Returns error only if the backend is unreachable
    pub fn form_ids(&self) -> Result<Vec<FormId>, StoreError> {
        self.read_or_default(&self.index_key)
    }

    /// Append a form id to the index if not already present
    ///
    /// # Errors
    /// Returns error if the index cannot be read or written
    pub fn register_form(&self, id: &FormId) -> Result<(), StoreError> {
        let mut ids = self.form_ids()?;
        if ids.contains(id) {
            return Ok(());
        }
        ids.push(*id);
        self.write(&self.index_key, &ids)
    }

    /// Load a form's schema, empty if absent or malformed
    ///
    /// # Errors
    /// Returns error only if the backend is unreachable
    pub fn load_schema(&self, id: &FormId) -> Result<FormSchema, StoreError> {
        self.read_or_default(&id.storage_key())
    }

    /// Persist a form's schema
    ///
    /// # Errors
    /// Returns error if the schema cannot be serialized or written
    pub fn save_schema(&self, id: &FormId, schema: &FormSchema) -> Result<(), StoreError> {
        self.write(&id.storage_key(), schema)?;
        tracing::debug!(form_id = %id, fields = schema.len(), "schema saved");
        Ok(())
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "malformed stored content, treating as empty");
                Ok(T::default())
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, &raw)
    }
}
