//! Error types for report operations.

use thiserror::Error;

use crate::wizard::WizardStep;

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while editing or exporting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Block not found in the document.
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// Operation not valid for this block kind.
    #[error("Invalid operation on block: {0}")]
    InvalidOperation(String),

    /// Unknown table column identifier.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Unknown enum value while parsing user input.
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Field being parsed.
        field: &'static str,
        /// Rejected input.
        value: String,
    },

    /// Email delivery selected without a recipient.
    #[error("Recipient email is required for email delivery")]
    RecipientRequired,

    /// Wizard action issued from the wrong step.
    #[error("Wizard action not allowed at step {0:?}")]
    WrongStep(Option<WizardStep>),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
