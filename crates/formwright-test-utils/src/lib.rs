//! Testing utilities for Formwright workspace
//!
//! Shared field fixtures and a store whose availability can be toggled.

#![allow(missing_docs)]

use formwright_schema::{FieldDefinition, FieldKind, Validations};
use formwright_store::{KeyValueStore, MemoryStore, StoreError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub fn number_field(label: &str, min: f64, max: f64) -> FieldDefinition {
    FieldDefinition::new(FieldKind::Number)
        .with_label(label)
        .with_validations(Validations {
            min: Some(min),
            max: Some(max),
            ..Validations::default()
        })
}

pub fn text_field(label: &str, min_length: usize, max_length: usize) -> FieldDefinition {
    FieldDefinition::new(FieldKind::Text)
        .with_label(label)
        .with_validations(Validations {
            min_length: Some(min_length),
            max_length: Some(max_length),
            ..Validations::default()
        })
}

pub fn select_field(label: &str, values: &[&str]) -> FieldDefinition {
    values.iter().fold(
        FieldDefinition::new(FieldKind::Select).with_label(label),
        |field, value| field.with_option(value.to_uppercase(), *value),
    )
}

/// Memory store that can be switched offline and counts successful writes
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    offline: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store switched offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.set(key, value)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
