//! # Roster Report CLI
//!
//! Command-line host for the roster report builder.
//!
//! The binary plays the part of the roster page: it filters the mock
//! roster, optionally loads a saved report layout, drives the export
//! wizard through both steps and writes the resulting file.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p report-cli -- --format pdf --orientation landscape --output-dir out
//! ```
//!
//! ## With a saved layout and an SVG preview:
//!
//! ```bash
//! cargo run -p report-cli -- --layout report.json --preview out/preview.svg --columns name,sites
//! ```
//!
//! ## Architecture
//!
//! - `RosterReportArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Export settings, filters and file locations
//! - `run` - Builds a `ReportSession`, submits the wizard and writes files

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use report_core::roster::WorkStatus;
use report_core::{
    sample_roster, ChartCategory, DeliveryAction, ExportFormat, ExportWizard, PageOrientation,
    ReportBuilderValue, ReportEditor, ReportHost, ReportSession, RosterColumn, RosterFilters,
};
use report_renderer::{render_preview_svg, PdfConfig, ReportExporter};

/// Command-line arguments for roster-report.
#[derive(Debug, Clone, Parser)]
#[command(name = "roster-report")]
#[command(about = "Export the roster report as CSV or PDF")]
#[command(version)]
pub struct RosterReportArgs {
    /// Export format (csv or pdf)
    #[arg(long, env = "ROSTER_REPORT_FORMAT", default_value = "csv")]
    pub format: ExportFormat,

    /// Page orientation for PDF exports (portrait or landscape)
    #[arg(long, env = "ROSTER_REPORT_ORIENTATION", default_value = "portrait")]
    pub orientation: PageOrientation,

    /// Delivery action (download or email)
    #[arg(long, env = "ROSTER_REPORT_DELIVERY", default_value = "download")]
    pub delivery: DeliveryAction,

    /// Recipient address for email delivery
    #[arg(long, env = "ROSTER_REPORT_RECIPIENT")]
    pub recipient: Option<String>,

    /// Directory the export is written to
    #[arg(short, long, env = "ROSTER_REPORT_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Report layout JSON to load instead of the default layout
    #[arg(long, env = "ROSTER_REPORT_LAYOUT")]
    pub layout: Option<PathBuf>,

    /// Write the composed layout JSON here
    #[arg(long)]
    pub save_layout: Option<PathBuf>,

    /// Write an SVG preview of the report here
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// PDF settings JSON (page size, fonts, table budgets)
    #[arg(long, env = "ROSTER_REPORT_PDF_CONFIG")]
    pub pdf_config: Option<PathBuf>,

    /// Table columns, comma separated (default: all)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<RosterColumn>,

    /// Free-text roster search
    #[arg(short, long)]
    pub query: Option<String>,

    /// Only providers credentialed at this site
    #[arg(long)]
    pub site: Option<String>,

    /// Only providers with this work status (FT, PT, PRN, LOC, IL)
    #[arg(long)]
    pub work_status: Option<WorkStatus>,

    /// Chart category (site, work-status, status, type)
    #[arg(long, default_value = "site")]
    pub chart: ChartCategory,

    /// Report title
    #[arg(long)]
    pub title: Option<String>,

    /// Report subtitle
    #[arg(long)]
    pub subtitle: Option<String>,

    /// Generation date stamped on the report (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Report export configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Export format.
    pub format: ExportFormat,
    /// PDF page orientation.
    pub orientation: PageOrientation,
    /// Delivery action.
    pub delivery: DeliveryAction,
    /// Recipient for email delivery.
    pub recipient: Option<String>,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Layout JSON to load.
    pub layout: Option<PathBuf>,
    /// Where to save the composed layout.
    pub save_layout: Option<PathBuf>,
    /// Where to write the SVG preview.
    pub preview: Option<PathBuf>,
    /// PDF settings JSON.
    pub pdf_config: Option<PathBuf>,
    /// Selected table columns.
    pub columns: Vec<RosterColumn>,
    /// Roster filters.
    pub filters: RosterFilters,
    /// Chart category.
    pub category: ChartCategory,
    /// Title override.
    pub title: Option<String>,
    /// Subtitle override.
    pub subtitle: Option<String>,
    /// Generation date; today when unset.
    pub date: Option<NaiveDate>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: ExportFormat::default(),
            orientation: PageOrientation::default(),
            delivery: DeliveryAction::default(),
            recipient: None,
            output_dir: PathBuf::from("."),
            layout: None,
            save_layout: None,
            preview: None,
            pdf_config: None,
            columns: Vec::new(),
            filters: RosterFilters::default(),
            category: ChartCategory::default(),
            title: None,
            subtitle: None,
            date: None,
        }
    }
}

impl From<RosterReportArgs> for CliConfig {
    fn from(args: RosterReportArgs) -> Self {
        Self {
            format: args.format,
            orientation: args.orientation,
            delivery: args.delivery,
            recipient: args.recipient,
            output_dir: args.output_dir,
            layout: args.layout,
            save_layout: args.save_layout,
            preview: args.preview,
            pdf_config: args.pdf_config,
            columns: args.columns,
            filters: RosterFilters {
                query: args.query,
                site: args.site,
                work_status: args.work_status,
            },
            category: args.chart,
            title: args.title,
            subtitle: args.subtitle,
            date: args.date,
        }
    }
}

/// Files produced by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// The written export.
    pub file: PathBuf,
    /// Rows in the filtered roster.
    pub rows: usize,
    /// Email confirmation, if the export was emailed.
    pub confirmation: Option<String>,
    /// The written SVG preview.
    pub preview: Option<PathBuf>,
}

fn read_text(path: &Path, what: &str) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {what} {}", path.display()))
}

fn write_bytes(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

/// Compose the report, submit the export wizard and write the files.
///
/// # Errors
///
/// Returns an error if an input file cannot be read or parsed, if the
/// wizard refuses the request (e.g. email without a recipient), or if an
/// output file cannot be written.
pub fn run(config: &CliConfig) -> anyhow::Result<ExportOutcome> {
    let generated_on = config
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut session = ReportSession::new(sample_roster(), generated_on)
        .with_filters(config.filters.clone())
        .with_category(config.category);
    if let Some(path) = &config.layout {
        let value = ReportBuilderValue::from_json(&read_text(path, "layout")?)
            .with_context(|| format!("Invalid layout {}", path.display()))?;
        tracing::debug!("Loaded layout with {} blocks", value.blocks.len());
        session = session.with_value(value);
    }

    let mut editor = ReportEditor::new(config.orientation);
    for column in &config.columns {
        if !session.selection().contains(*column) {
            editor.toggle_column(&mut session, *column);
        }
    }
    if let Some(title) = &config.title {
        editor.set_title(&mut session, title.as_str());
    }
    if let Some(subtitle) = &config.subtitle {
        editor.set_subtitle(&mut session, subtitle.as_str());
    }

    if let Some(path) = &config.save_layout {
        write_bytes(path, session.value().to_json()?.as_bytes())?;
        tracing::info!("Saved layout to {}", path.display());
    }

    let pdf = match &config.pdf_config {
        Some(path) => serde_json::from_str::<PdfConfig>(&read_text(path, "PDF config")?)
            .with_context(|| format!("Invalid PDF config {}", path.display()))?,
        None => PdfConfig::default(),
    };

    let mut wizard = ExportWizard::new();
    wizard.open();
    wizard.format = config.format;
    wizard.orientation = config.orientation;
    wizard.delivery = config.delivery;
    wizard.recipient = config.recipient.clone().unwrap_or_default();
    wizard.next()?;
    let request = wizard.submit()?;

    let data = session.data();
    let artifact = ReportExporter::new(pdf).export(&request, session.value(), &data)?;
    let file = config.output_dir.join(&artifact.file_name);
    write_bytes(&file, &artifact.bytes)?;
    tracing::info!("Wrote {} ({})", file.display(), artifact.mime_type);

    let preview = match &config.preview {
        Some(path) => {
            let svg = render_preview_svg(session.value(), &data, config.orientation);
            write_bytes(path, svg.as_bytes())?;
            tracing::info!("Wrote preview {}", path.display());
            Some(path.clone())
        }
        None => None,
    };

    Ok(ExportOutcome {
        file,
        rows: data.row_count(),
        confirmation: artifact.confirmation(),
        preview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> RosterReportArgs {
        RosterReportArgs::try_parse_from(std::iter::once("roster-report").chain(args.iter().copied()))
            .expect("args")
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::from(parse(&[]));
        assert_eq!(config.format, ExportFormat::Csv);
        assert_eq!(config.orientation, PageOrientation::Portrait);
        assert_eq!(config.delivery, DeliveryAction::Download);
        assert_eq!(config.category, ChartCategory::Site);
        assert!(config.columns.is_empty());
        assert_eq!(config.filters, RosterFilters::default());
    }

    #[test]
    fn test_parse_export_options() {
        let config = CliConfig::from(parse(&[
            "--format",
            "pdf",
            "--orientation",
            "landscape",
            "--delivery",
            "email",
            "--recipient",
            "ops@example.com",
            "--chart",
            "work-status",
            "--date",
            "2025-03-14",
        ]));
        assert_eq!(config.format, ExportFormat::Pdf);
        assert_eq!(config.orientation, PageOrientation::Landscape);
        assert_eq!(config.delivery, DeliveryAction::Email);
        assert_eq!(config.recipient.as_deref(), Some("ops@example.com"));
        assert_eq!(config.category, ChartCategory::WorkStatus);
        assert_eq!(config.date, NaiveDate::from_ymd_opt(2025, 3, 14));
    }

    #[test]
    fn test_export_options_have_env_fallbacks() {
        let command = RosterReportArgs::command();
        for (id, var) in [
            ("format", "ROSTER_REPORT_FORMAT"),
            ("orientation", "ROSTER_REPORT_ORIENTATION"),
            ("delivery", "ROSTER_REPORT_DELIVERY"),
            ("recipient", "ROSTER_REPORT_RECIPIENT"),
        ] {
            let env = command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env());
            assert_eq!(env, Some(std::ffi::OsStr::new(var)), "{id}");
        }
    }

    #[test]
    fn test_parse_filters_and_columns() {
        let config = CliConfig::from(parse(&[
            "--columns",
            "phone,name",
            "-q",
            "sarah",
            "--site",
            "FH",
            "--work-status",
            "ft",
        ]));
        assert_eq!(config.columns, vec![RosterColumn::Phone, RosterColumn::Name]);
        assert_eq!(config.filters.query.as_deref(), Some("sarah"));
        assert_eq!(config.filters.site.as_deref(), Some("FH"));
        assert_eq!(config.filters.work_status, Some(WorkStatus::FullTime));
    }

    #[test]
    fn test_rejects_unknown_values() {
        let bad = [
            ["--format", "xlsx"],
            ["--orientation", "sideways"],
            ["--columns", "salary"],
            ["--chart", "region"],
        ];
        for args in bad {
            assert!(
                RosterReportArgs::try_parse_from(
                    std::iter::once("roster-report").chain(args.iter().copied())
                )
                    .is_err(),
                "{args:?} should be rejected"
            );
        }
    }
}
