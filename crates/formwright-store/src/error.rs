//! Storage errors

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore) or the schema store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend cannot be reached or refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Filesystem failure
    #[error("io error on key '{key}': {source}")]
    Io {
        /// Key being read or written
        key: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Value could not be encoded
    #[error("serialization failed for key '{key}': {source}")]
    Serialization {
        /// Key being written
        key: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Key contains characters the backend cannot address
    #[error("invalid key '{0}'")]
    InvalidKey(String),
}

impl StoreError {
    /// Check if the failure is transient
    ///
    /// Transient failures leave in-memory state authoritative and may
    /// succeed on the next save.
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::Unavailable("offline".to_string());
        assert!(err.to_string().contains("store unavailable"));
        assert!(err.is_transient());
        assert!(!StoreError::InvalidKey("a/b".into()).is_transient());
    }
}
