//! Formwright Store
//!
//! Persistence boundary for form schemas.
//!
//! # Overview
//!
//! - [`KeyValueStore`]: the storage port (`get` / `set` of serialized text)
//! - [`MemoryStore`]: concurrent in-memory backend
//! - [`FileStore`]: one JSON file per key under a root directory
//! - [`SchemaStore`]: typed facade holding the form index and per-form schemas
//!
//! # Example
//!
//! ```rust
//! use formwright_schema::{FieldDefinition, FieldKind, FormId, FormSchema};
//! use formwright_store::{MemoryStore, SchemaStore};
//!
//! let store = SchemaStore::new(MemoryStore::new());
//! let id = FormId::new();
//!
//! // Absent forms load as empty schemas
//! assert!(store.load_schema(&id).unwrap().is_empty());
//!
//! let schema: FormSchema = vec![FieldDefinition::new(FieldKind::Text).with_label("Name")].into();
//! store.save_schema(&id, &schema).unwrap();
//! assert_eq!(store.load_schema(&id).unwrap(), schema);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod file;
pub mod kv;
pub mod memory;
pub mod schema_store;

// Re-exports
pub use error::StoreError;
pub use file::FileStore;
pub use kv::{KeyValueStore, SharedStore};
pub use memory::MemoryStore;
pub use schema_store::{SchemaStore, DEFAULT_INDEX_KEY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
