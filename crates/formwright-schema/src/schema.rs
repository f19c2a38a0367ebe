//! Ordered form schema
//!
//! Provides [`FormSchema`]: field definitions keyed by [`FieldId`] in
//! insertion order. Stored as a plain JSON array of fields.

use crate::field::FieldDefinition;
use crate::ids::FieldId;
use indexmap::IndexMap;
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ordered sequence of field definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<FieldDefinition>", into = "Vec<FieldDefinition>")]
pub struct FormSchema {
    fields: IndexMap<FieldId, FieldDefinition>,
}

impl FormSchema {
    /// Create empty schema
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if schema has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get field by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &FieldId) -> Option<&FieldDefinition> {
        self.fields.get(id)
    }

    /// Get field by position
    #[inline]
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&FieldDefinition> {
        self.fields.get_index(index).map(|(_, f)| f)
    }

    /// Check if a field exists
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &FieldId) -> bool {
        self.fields.contains_key(id)
    }

    /// Position of a field in the sequence
    #[inline]
    #[must_use]
    pub fn position(&self, id: &FieldId) -> Option<usize> {
        self.fields.get_index_of(id)
    }

    /// Append a field
    ///
    /// If the id is already present the definition is replaced in place and
    /// the previous one returned.
    pub fn push(&mut self, field: FieldDefinition) -> Option<FieldDefinition> {
        self.fields.insert(field.id, field)
    }

    /// Remove a field, shifting later fields up
    ///
    /// Returns the former position together with the removed definition.
    pub fn remove(&mut self, id: &FieldId) -> Option<(usize, FieldDefinition)> {
        self.fields
            .shift_remove_full(id)
            .map(|(index, _, field)| (index, field))
    }

    /// Replace one field by id, leaving every other field and the order untouched
    ///
    /// The closure receives a copy of the current definition and returns its
    /// replacement. The id is pinned: a closure that changes it has no effect
    /// on the key.
    pub fn update<F>(&mut self, id: &FieldId, f: F) -> Option<&FieldDefinition>
    where
        F: FnOnce(FieldDefinition) -> FieldDefinition,
    {
        let slot = self.fields.get_mut(id)?;
        let mut next = f(slot.clone());
        next.id = *id;
        *slot = next;
        Some(slot)
    }

    /// Iterate fields in order
    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    /// Iterate field ids in order
    pub fn ids(&self) -> impl Iterator<Item = &FieldId> {
        self.fields.keys()
    }
}

// IndexMap equality ignores order; schemas compare as sequences.
impl PartialEq for FormSchema {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl From<Vec<FieldDefinition>> for FormSchema {
    fn from(fields: Vec<FieldDefinition>) -> Self {
        let mut schema = Self::new();
        for field in fields {
            let id = field.id;
            if schema.push(field).is_some() {
                tracing::warn!(field_id = %id, "duplicate field id in stored schema, keeping last definition");
            }
        }
        schema
    }
}

impl From<FormSchema> for Vec<FieldDefinition> {
    fn from(schema: FormSchema) -> Self {
        schema.fields.into_values().collect()
    }
}

impl FromIterator<FieldDefinition> for FormSchema {
    fn from_iter<I: IntoIterator<Item = FieldDefinition>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a FormSchema {
    type Item = &'a FieldDefinition;
    type IntoIter = indexmap::map::Values<'a, FieldId, FieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.values()
    }
}

impl JsonSchema for FormSchema {
    fn schema_name() -> String {
        "FormSchema".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        Vec::<FieldDefinition>::json_schema(gen)
    }
}
