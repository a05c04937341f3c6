//! Export dispatch.
//!
//! Turns a submitted [`ExportRequest`] into a named file artifact. Email
//! delivery is simulated: the file is produced exactly as for a download
//! and a confirmation message stands in for sending it.

use chrono::NaiveDate;
use report_core::content::ReportData;
use report_core::document::ReportBuilderValue;
use report_core::wizard::{Delivery, ExportFormat, ExportRequest};
use serde::Serialize;

use crate::csv_export::export_csv;
use crate::error::RenderResult;
use crate::pdf::{export_pdf, PdfConfig};

/// A generated export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    /// Suggested file name, e.g. `roster-export-2025-01-31.csv`.
    pub file_name: String,
    /// MIME type.
    pub mime_type: &'static str,
    /// File contents.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Where the file goes.
    pub delivery: Delivery,
}

impl ExportArtifact {
    /// Confirmation shown after a simulated email, `None` for downloads.
    #[must_use]
    pub fn confirmation(&self) -> Option<String> {
        match &self.delivery {
            Delivery::Download => None,
            Delivery::Email { recipient } => Some(format!(
                "Export {} queued for delivery to {recipient}",
                self.file_name
            )),
        }
    }
}

/// Date-stamped export file name.
#[must_use]
pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "roster-export-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Renders export requests.
#[derive(Debug, Clone, Default)]
pub struct ReportExporter {
    pdf: PdfConfig,
}

impl ReportExporter {
    /// Create an exporter with the given PDF settings.
    #[must_use]
    pub fn new(pdf: PdfConfig) -> Self {
        Self { pdf }
    }

    /// Create an exporter with default settings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// PDF settings.
    #[must_use]
    pub fn pdf_config(&self) -> &PdfConfig {
        &self.pdf
    }

    /// Render `request` over the document and roster data.
    ///
    /// The file name is stamped with `data.generated_on`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be encoded.
    pub fn export(
        &self,
        request: &ExportRequest,
        value: &ReportBuilderValue,
        data: &ReportData<'_>,
    ) -> RenderResult<ExportArtifact> {
        let bytes = match request.format {
            ExportFormat::Csv => export_csv(data.rows, data.selected_columns)?,
            ExportFormat::Pdf => export_pdf(value, data, request.orientation, &self.pdf)?,
        };
        let artifact = ExportArtifact {
            file_name: export_file_name(request.format, data.generated_on),
            mime_type: request.format.mime_type(),
            bytes,
            delivery: request.delivery.clone(),
        };

        tracing::info!(
            "Exported {} ({} bytes, {} rows)",
            artifact.file_name,
            artifact.bytes.len(),
            data.row_count()
        );
        if let Some(message) = artifact.confirmation() {
            tracing::info!("{message}");
        }
        Ok(artifact)
    }
}
