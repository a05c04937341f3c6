//! # Roster Report Renderer
//!
//! Export renderers for roster reports.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        ExportRequest + ReportData           │
//! ├──────────────┬──────────────┬───────────────┤
//! │ CSV          │ PDF          │ SVG preview   │
//! │ (csv crate)  │ (printpdf)   │ (string)      │
//! └──────────────┴──────────────┴───────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod chart;
pub mod csv_export;
pub mod error;
pub mod export;
pub mod pdf;
pub mod preview;
pub mod text;

pub use csv_export::{export_csv, write_csv};
pub use error::{RenderError, RenderResult};
pub use export::{export_file_name, ExportArtifact, ReportExporter};
pub use pdf::{export_pdf, plan_page, PageTransform, PdfConfig};
pub use preview::render_preview_svg;

/// Renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
