//! Identifiers for forms and fields
//!
//! Both are ULIDs: minted from the current time plus 80 random bits, so two
//! ids created in the same millisecond still differ.

use chrono::{DateTime, Utc};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use ulid::Ulid;

/// Identifier parse failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier '{input}': {reason}")]
pub struct IdError {
    /// Rejected input
    pub input: String,
    /// Decoder message
    pub reason: String,
}

fn parse_ulid(s: &str) -> Result<Ulid, IdError> {
    Ulid::from_string(s.trim()).map_err(|e| IdError {
        input: s.to_string(),
        reason: e.to_string(),
    })
}

/// Unique field identifier within a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub Ulid);

impl FieldId {
    /// Generate new field ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for FieldId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for FieldId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_ulid(s).map(Self)
    }
}

impl JsonSchema for FieldId {
    fn schema_name() -> String {
        "FieldId".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

/// Unique form identifier, doubling as the form's storage key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub Ulid);

impl FormId {
    /// Generate new form ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Creation time encoded in the identifier
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.0.datetime())
    }

    /// Key under which this form's fields are stored
    #[inline]
    #[must_use]
    pub fn storage_key(&self) -> String {
        self.0.to_string()
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for FormId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FormId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_ulid(s).map(Self)
    }
}

impl JsonSchema for FormId {
    fn schema_name() -> String {
        "FormId".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}
