use thiserror::Error;

/// Failures reported by a [`LedgerStore`](super::LedgerStore) backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row does not exist.
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Any other backend failure.
    #[error("Store failure: {0}")]
    Backend(String),
}
