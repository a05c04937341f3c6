//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering an export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Export encoding failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// PDF generation failed.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
