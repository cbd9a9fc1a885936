//! Error types for the expense tracker library.

/// Reasons a transaction input or a filter value is rejected.
///
/// Validation failures abort the operation before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Description is empty after trimming whitespace.
    #[error("description must not be empty")]
    EmptyDescription,

    /// Amount text does not parse to a finite number.
    #[error("invalid amount '{input}': expected a finite number")]
    InvalidAmount {
        /// The rejected amount text.
        input: String,
    },

    /// A field required by the edit surface was left blank.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Date text is not a `YYYY-MM-DD` calendar date.
    #[error("invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected date text.
        input: String,
    },

    /// Month filter text is neither `all` nor `YYYY-MM`.
    #[error("invalid month '{input}', expected YYYY-MM or 'all'")]
    InvalidMonth {
        /// The rejected month text.
        input: String,
    },

    /// Type filter text is not one of `all`, `income`, `expense`.
    #[error("invalid type filter '{input}', expected all, income or expense")]
    InvalidTypeFilter {
        /// The rejected filter text.
        input: String,
    },

    /// Export was requested while the store holds no transactions.
    #[error("no transactions to export")]
    NothingToExport,
}

/// All errors that can occur when using the expense tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Input failed validation; no state was changed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV encoding failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading or writing an export target failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Persistence backend failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, TrackerError>;
