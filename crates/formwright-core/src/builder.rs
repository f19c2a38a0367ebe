//! Form builder session
//!
//! A [`FormBuilder`] owns the working copy of one form's schema. It is
//! created already loaded ([`FormBuilder::load`]), mutated synchronously, and
//! written back only through [`FormBuilder::save`] (called by the navigation
//! helpers and by [`Autosave`](crate::Autosave)).
//!
//! # State
//! - `Saved`: working copy equals the last successful write
//! - `Dirty`: at least one edit since then, or the last save failed
//!
//! Every edit bumps a revision counter published on a
//! [`tokio::sync::watch`] channel so autosave can debounce on it.

use crate::error::{BuilderError, OptionError};
use formwright_schema::{
    validate_schema, FieldDefinition, FieldId, FieldKind, FormId, FormSchema, SelectOption,
    ValidationReport,
};
use formwright_store::{KeyValueStore, SchemaStore, StoreError};
use tokio::sync::watch;

/// Persistence state of the working copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    /// Matches the last successful write
    Saved,
    /// Has edits not yet written
    Dirty,
}

/// Partial update of a field definition
///
/// Unset members leave the field untouched. For optional attributes the
/// inner `None` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub kind: Option<FieldKind>,
    pub placeholder: Option<String>,
    pub default_value: Option<Option<String>>,
    pub required: Option<bool>,
    pub min: Option<Option<f64>>,
    pub max: Option<Option<f64>>,
    pub min_length: Option<Option<usize>>,
    pub max_length: Option<Option<usize>>,
}

impl FieldPatch {
    /// Create empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(Some(value.into()));
        self
    }

    #[must_use]
    pub fn clear_default(mut self) -> Self {
        self.default_value = Some(None);
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    #[must_use]
    pub fn min(mut self, min: Option<f64>) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn max(mut self, max: Option<f64>) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn min_length(mut self, min_length: Option<usize>) -> Self {
        self.min_length = Some(min_length);
        self
    }

    #[must_use]
    pub fn max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// True when the patch changes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produce the patched copy of `field`
    #[must_use]
    pub fn apply(self, mut field: FieldDefinition) -> FieldDefinition {
        if let Some(label) = self.label {
            field.label = label;
        }
        if let Some(kind) = self.kind {
            field.kind = kind;
        }
        if let Some(placeholder) = self.placeholder {
            field.placeholder = placeholder;
        }
        if let Some(default_value) = self.default_value {
            field.default_value = default_value;
        }
        let v = &mut field.validations;
        if let Some(required) = self.required {
            v.required = required;
        }
        if let Some(min) = self.min {
            v.min = min;
        }
        if let Some(max) = self.max {
            v.max = max;
        }
        if let Some(min_length) = self.min_length {
            v.min_length = min_length;
        }
        if let Some(max_length) = self.max_length {
            v.max_length = max_length;
        }
        field
    }
}

/// Editing session over one form
#[derive(Debug)]
pub struct FormBuilder<S> {
    form_id: FormId,
    store: SchemaStore<S>,
    schema: FormSchema,
    last_saved: FormSchema,
    active: Option<FieldId>,
    state: SaveState,
    loaded: bool,
    revision: watch::Sender<u64>,
}

impl<S: KeyValueStore> FormBuilder<S> {
    /// Start a session on `form_id`, loading its stored schema
    ///
    /// An absent schema starts empty. If the store cannot be read the
    /// session also starts empty and keeps working in memory; the stored
    /// fields are read again and merged in before the first write.
    pub fn load(store: SchemaStore<S>, form_id: FormId) -> Self {
        let (schema, loaded) = match store.load_schema(&form_id) {
            Ok(schema) => (schema, true),
            Err(e) => {
                tracing::warn!(form_id = %form_id, error = %e, "store unavailable, starting with empty schema");
                (FormSchema::new(), false)
            }
        };
        tracing::debug!(form_id = %form_id, fields = schema.len(), "builder loaded");

        let (revision, _) = watch::channel(0);
        Self {
            form_id,
            store,
            last_saved: schema.clone(),
            schema,
            active: None,
            state: SaveState::Saved,
            loaded,
            revision,
        }
    }

    /// Form being edited
    #[inline]
    #[must_use]
    pub fn form_id(&self) -> FormId {
        self.form_id
    }

    /// Working copy
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Last snapshot that was successfully written
    #[inline]
    #[must_use]
    pub fn last_saved(&self) -> &FormSchema {
        &self.last_saved
    }

    /// Field by id
    #[inline]
    #[must_use]
    pub fn field(&self, id: &FieldId) -> Option<&FieldDefinition> {
        self.schema.get(id)
    }

    /// Field currently expanded for editing
    #[inline]
    #[must_use]
    pub fn active_field(&self) -> Option<FieldId> {
        self.active
    }

    /// Persistence state
    #[inline]
    #[must_use]
    pub fn save_state(&self) -> SaveState {
        self.state
    }

    /// Check whether the stored schema has been read
    ///
    /// False after a degraded [`load`](Self::load) until a save manages to
    /// read the store.
    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Check for unsaved edits
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state == SaveState::Dirty
    }

    /// Number of edits applied in this session
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Receiver notified on every edit
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Append an empty text field and make it active
    pub fn add_field(&mut self) -> FieldId {
        let field = FieldDefinition::new(FieldKind::Text);
        let id = field.id;
        self.schema.push(field);
        self.active = Some(id);
        self.touch();
        tracing::debug!(form_id = %self.form_id, field_id = %id, "field added");
        id
    }

    /// Remove a field
    ///
    /// The field before it becomes active; if it was first, the new first
    /// field does; if none remain, nothing is active.
    ///
    /// # Errors
    /// Returns error if the field does not exist
    pub fn remove_field(&mut self, id: &FieldId) -> Result<FieldDefinition, BuilderError> {
        let (index, removed) = self
            .schema
            .remove(id)
            .ok_or(BuilderError::FieldNotFound(*id))?;

        let neighbour = index.saturating_sub(1);
        self.active = self.schema.get_index(neighbour).map(|f| f.id);
        self.touch();
        tracing::debug!(form_id = %self.form_id, field_id = %id, "field removed");
        Ok(removed)
    }

    /// Apply a patch to one field, leaving the others untouched
    ///
    /// # Errors
    /// Returns error if the field does not exist
    pub fn edit_field(&mut self, id: &FieldId, patch: FieldPatch) -> Result<(), BuilderError> {
        if !self.schema.contains(id) {
            return Err(BuilderError::FieldNotFound(*id));
        }
        if patch.is_empty() {
            return Ok(());
        }
        self.schema.update(id, |field| patch.apply(field));
        self.touch();
        tracing::debug!(form_id = %self.form_id, field_id = %id, "field edited");
        Ok(())
    }

    /// Expand a field for editing, or collapse all with `None`
    ///
    /// # Errors
    /// Returns error if the field does not exist
    pub fn set_active(&mut self, id: Option<FieldId>) -> Result<(), BuilderError> {
        if let Some(id) = id {
            if !self.schema.contains(&id) {
                return Err(BuilderError::FieldNotFound(id));
            }
        }
        self.active = id;
        Ok(())
    }

    /// Append a `(label, value)` choice to a select field
    ///
    /// A blank label falls back to the value. The option list is left
    /// unchanged on rejection.
    ///
    /// # Errors
    /// Returns error if the field is missing or not a select field, or the
    /// value is empty or already present
    pub fn add_option(
        &mut self,
        id: &FieldId,
        label: &str,
        value: &str,
    ) -> Result<(), BuilderError> {
        let field = self
            .schema
            .get(id)
            .ok_or(BuilderError::FieldNotFound(*id))?;
        if field.kind != FieldKind::Select {
            return Err(OptionError::NotSelectField(*id).into());
        }

        let value = value.trim();
        if value.is_empty() {
            return Err(OptionError::EmptyValue.into());
        }
        if field.has_option(value) {
            return Err(OptionError::DuplicateValue(value.to_string()).into());
        }

        let label = if label.trim().is_empty() { value } else { label };
        let option = SelectOption::new(label, value);
        self.schema.update(id, |mut field| {
            field.options.push(option);
            field
        });
        self.touch();
        Ok(())
    }

    /// Remove the option with this value from a field
    ///
    /// Returns whether an option was removed.
    ///
    /// # Errors
    /// Returns error if the field does not exist
    pub fn remove_option(&mut self, id: &FieldId, value: &str) -> Result<bool, BuilderError> {
        let field = self
            .schema
            .get(id)
            .ok_or(BuilderError::FieldNotFound(*id))?;
        if !field.has_option(value) {
            return Ok(false);
        }

        self.schema.update(id, |mut field| {
            field.options.retain(|o| o.value != value);
            field
        });
        self.touch();
        Ok(true)
    }

    /// Validate the working copy
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        validate_schema(&self.schema)
    }

    /// Write the working copy to the store
    ///
    /// On failure the working copy stays authoritative, the session stays
    /// dirty and [`last_saved`](Self::last_saved) keeps the previous snapshot.
    /// A session whose load failed first reads the stored schema and merges
    /// the in-memory fields after it, so stored fields are never overwritten
    /// by an empty working copy.
    ///
    /// # Errors
    /// Returns error if the stored schema still cannot be read, or the store
    /// rejects the write
    pub fn save(&mut self) -> Result<(), StoreError> {
        if !self.loaded {
            self.reconcile()?;
        }
        match self.store.save_schema(&self.form_id, &self.schema) {
            Ok(()) => {
                self.last_saved = self.schema.clone();
                self.state = SaveState::Saved;
                tracing::info!(form_id = %self.form_id, fields = self.schema.len(), "form saved");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(form_id = %self.form_id, error = %e, "save failed, keeping in-memory copy");
                Err(e)
            }
        }
    }

    /// Navigate to the preview: validate, then save
    ///
    /// # Errors
    /// Returns [`BuilderError::PreviewBlocked`] if any field is invalid
    /// (nothing is written), or the store error if saving fails
    pub fn preview(&mut self) -> Result<(), BuilderError> {
        let report = self.validate();
        if !report.is_valid() {
            tracing::debug!(form_id = %self.form_id, invalid = report.len(), "preview blocked");
            return Err(BuilderError::PreviewBlocked(report));
        }
        self.save()?;
        Ok(())
    }

    /// Navigate away from the builder: save without the validation gate
    ///
    /// # Errors
    /// Returns error if saving fails
    pub fn leave(&mut self) -> Result<(), BuilderError> {
        self.save()?;
        Ok(())
    }

    fn reconcile(&mut self) -> Result<(), StoreError> {
        let stored = self.store.load_schema(&self.form_id).map_err(|e| {
            tracing::warn!(form_id = %self.form_id, error = %e, "stored schema still unreadable, not saving");
            e
        })?;

        let mut merged = stored.clone();
        for field in &self.schema {
            merged.push(field.clone());
        }
        tracing::info!(
            form_id = %self.form_id,
            stored = stored.len(),
            merged = merged.len(),
            "stored schema recovered"
        );
        self.schema = merged;
        self.last_saved = stored;
        self.loaded = true;
        Ok(())
    }

    fn touch(&mut self) {
        self.state = SaveState::Dirty;
        self.revision.send_modify(|r| *r += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_store::MemoryStore;
    use formwright_test_utils::{number_field, select_field, FlakyStore};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn builder() -> FormBuilder<MemoryStore> {
        FormBuilder::load(SchemaStore::new(MemoryStore::new()), FormId::new())
    }

    fn builder_with(fields: Vec<FieldDefinition>) -> FormBuilder<MemoryStore> {
        let store = SchemaStore::new(MemoryStore::new());
        let id = FormId::new();
        store.save_schema(&id, &fields.into()).unwrap();
        FormBuilder::load(store, id)
    }

    #[test]
    fn load_starts_clean() {
        let b = builder();
        assert!(b.schema().is_empty());
        assert_eq!(b.active_field(), None);
        assert_eq!(b.save_state(), SaveState::Saved);
        assert_eq!(b.revision(), 0);
    }

    #[test]
    fn load_reads_stored_schema() {
        let b = builder_with(vec![number_field("Age", 1.0, 10.0)]);
        assert_eq!(b.schema().len(), 1);
        assert!(!b.is_dirty());
    }

    #[test]
    fn add_field_appends_empty_text_and_activates() {
        let mut b = builder();
        let id = b.add_field();

        let field = b.field(&id).unwrap();
        assert_eq!(field.kind, FieldKind::Text);
        assert!(field.label.is_empty());
        assert!(field.placeholder.is_empty());
        assert_eq!(b.active_field(), Some(id));
        assert!(b.is_dirty());
        assert_eq!(b.revision(), 1);
    }

    #[test]
    fn remove_activates_previous_field() {
        let mut b = builder();
        let first = b.add_field();
        let second = b.add_field();
        let third = b.add_field();

        b.remove_field(&third).unwrap();
        assert_eq!(b.active_field(), Some(second));

        b.remove_field(&first).unwrap();
        assert_eq!(b.active_field(), Some(second));
    }

    #[test]
    fn removing_last_field_clears_active() {
        let mut b = builder();
        let id = b.add_field();
        b.remove_field(&id).unwrap();
        assert_eq!(b.active_field(), None);
        assert!(b.schema().is_empty());
    }

    #[test]
    fn remove_unknown_field_fails() {
        let mut b = builder();
        assert!(matches!(
            b.remove_field(&FieldId::new()),
            Err(BuilderError::FieldNotFound(_))
        ));
    }

    #[test]
    fn edit_touches_only_target() {
        let mut b = builder();
        let a = b.add_field();
        let c = b.add_field();
        let before = b.field(&c).unwrap().clone();

        b.edit_field(
            &a,
            FieldPatch::new()
                .label("Age")
                .kind(FieldKind::Number)
                .min(Some(1.0))
                .required(true),
        )
        .unwrap();

        let edited = b.field(&a).unwrap();
        assert_eq!(edited.label, "Age");
        assert_eq!(edited.kind, FieldKind::Number);
        assert_eq!(edited.validations.min, Some(1.0));
        assert!(edited.validations.required);
        assert_eq!(b.field(&c).unwrap(), &before);
        assert_eq!(b.schema().position(&a), Some(0));
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut b = builder_with(vec![number_field("Age", 1.0, 10.0)]);
        let id = *b.schema().ids().next().unwrap();
        b.edit_field(&id, FieldPatch::new()).unwrap();
        assert!(!b.is_dirty());
    }

    #[test]
    fn patch_clears_optional_values() {
        let mut b = builder_with(vec![number_field("Age", 1.0, 10.0).with_default("5")]);
        let id = *b.schema().ids().next().unwrap();

        b.edit_field(&id, FieldPatch::new().clear_default().max(None))
            .unwrap();

        let field = b.field(&id).unwrap();
        assert_eq!(field.default_value, None);
        assert_eq!(field.validations.max, None);
        assert_eq!(field.validations.min, Some(1.0));
    }

    #[test]
    fn options_reject_empty_and_duplicate_values() {
        let mut b = builder_with(vec![select_field("Color", &["red"])]);
        let id = *b.schema().ids().next().unwrap();
        let before = b.field(&id).unwrap().options.clone();

        assert!(matches!(
            b.add_option(&id, "Blank", "  "),
            Err(BuilderError::RejectedOption(OptionError::EmptyValue))
        ));
        assert!(matches!(
            b.add_option(&id, "Red again", "red"),
            Err(BuilderError::RejectedOption(OptionError::DuplicateValue(_)))
        ));
        assert_eq!(b.field(&id).unwrap().options, before);
        assert!(!b.is_dirty());

        b.add_option(&id, "", "blue").unwrap();
        let options = &b.field(&id).unwrap().options;
        assert_eq!(options.len(), 2);
        assert_eq!(options[1], SelectOption::new("blue", "blue"));
    }

    #[test]
    fn options_only_on_select_fields() {
        let mut b = builder();
        let id = b.add_field();
        assert!(matches!(
            b.add_option(&id, "A", "a"),
            Err(BuilderError::RejectedOption(OptionError::NotSelectField(_)))
        ));
    }

    #[test]
    fn remove_option_filters_by_value() {
        let mut b = builder_with(vec![select_field("Color", &["red", "green"])]);
        let id = *b.schema().ids().next().unwrap();

        assert!(b.remove_option(&id, "red").unwrap());
        assert!(!b.remove_option(&id, "red").unwrap());
        let values: Vec<_> = b.field(&id).unwrap().options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["green"]);
    }

    #[test]
    fn preview_is_blocked_by_validation_errors() {
        let mut b = builder();
        b.add_field();

        let err = b.preview().unwrap_err();
        assert_eq!(err.report().unwrap().len(), 1);
        assert!(b.is_dirty());
        assert!(b.last_saved().is_empty());
    }

    #[test]
    fn preview_saves_valid_schema() {
        let mut b = builder();
        let id = b.add_field();
        b.edit_field(&id, FieldPatch::new().label("Name")).unwrap();

        b.preview().unwrap();
        assert_eq!(b.save_state(), SaveState::Saved);
        assert_eq!(b.last_saved(), b.schema());
    }

    #[test]
    fn leave_saves_even_when_invalid() {
        let mut b = builder();
        b.add_field();
        b.leave().unwrap();
        assert!(!b.is_dirty());
        assert_eq!(b.last_saved().len(), 1);
    }

    #[test]
    fn failed_save_keeps_last_good_state() {
        let backend = Arc::new(FlakyStore::new());
        let mut b = FormBuilder::load(SchemaStore::new(Arc::clone(&backend)), FormId::new());

        let first = b.add_field();
        b.edit_field(&first, FieldPatch::new().label("First")).unwrap();
        b.save().unwrap();
        let good = b.schema().clone();

        backend.set_offline(true);
        b.add_field();
        assert!(b.save().is_err());
        assert!(b.is_dirty());
        assert_eq!(b.schema().len(), 2);
        assert_eq!(b.last_saved(), &good);

        backend.set_offline(false);
        b.save().unwrap();
        assert_eq!(b.last_saved().len(), 2);
    }

    #[test]
    fn degraded_load_never_overwrites_stored_fields() {
        let backend = Arc::new(FlakyStore::new());
        let store = SchemaStore::new(Arc::clone(&backend));
        let form_id = FormId::new();
        let stored = FormSchema::from(vec![
            number_field("Age", 1.0, 10.0),
            select_field("Color", &["red"]),
        ]);
        store.save_schema(&form_id, &stored).unwrap();

        backend.set_offline(true);
        let mut b = FormBuilder::load(store.clone(), form_id);
        assert!(!b.is_loaded());
        let added = b.add_field();

        assert!(b.leave().is_err());
        assert!(b.is_dirty());
        assert_eq!(backend.writes(), 1);

        backend.set_offline(false);
        b.leave().unwrap();
        assert!(b.is_loaded());

        let saved = store.load_schema(&form_id).unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved.position(&added), Some(2));
        assert_eq!(b.schema(), &saved);
        assert_eq!(b.last_saved(), &saved);
    }

    #[test]
    fn unavailable_store_on_load_degrades_to_empty() {
        let backend = Arc::new(FlakyStore::new());
        backend.set_offline(true);
        let mut b = FormBuilder::load(SchemaStore::new(Arc::clone(&backend)), FormId::new());

        assert!(b.schema().is_empty());
        assert!(!b.is_loaded());
        b.add_field();
        assert_eq!(b.schema().len(), 1);
    }
}
