//! Integration tests for the roster-report command line.
//!
//! Each test runs the full pipeline into a temporary directory.

use chrono::NaiveDate;
use clap::Parser;
use report_cli::{run, CliConfig, RosterReportArgs};
use report_core::{BlockKind, DeliveryAction, ExportFormat, PageOrientation, ReportBuilderValue, ReportBlock};

fn config_in(dir: &tempfile::TempDir) -> CliConfig {
    CliConfig {
        output_dir: dir.path().to_path_buf(),
        date: NaiveDate::from_ymd_opt(2025, 3, 14),
        ..CliConfig::default()
    }
}

// ============================================================================
// CSV
// ============================================================================

#[test]
fn test_csv_download_writes_dated_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let outcome = run(&config_in(&dir)).expect("run");

    assert_eq!(outcome.file, dir.path().join("roster-export-2025-03-14.csv"));
    assert_eq!(outcome.rows, 9);
    assert!(outcome.confirmation.is_none());

    let text = std::fs::read_to_string(&outcome.file).expect("read");
    assert!(text.starts_with("Provider Name,Preferred Name,Type,Service Lines,Sites"));
    assert_eq!(text.split("\r\n").filter(|l| !l.is_empty()).count(), 10);
}

#[test]
fn test_parsed_args_filter_and_select_columns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().to_string_lossy().into_owned();
    let args = RosterReportArgs::try_parse_from([
        "roster-report",
        "--output-dir",
        out.as_str(),
        "--date",
        "2025-03-14",
        "--columns",
        "sites,name",
        "--work-status",
        "PRN",
    ])
    .expect("args");

    let outcome = run(&CliConfig::from(args)).expect("run");
    assert_eq!(outcome.rows, 2);
    let text = std::fs::read_to_string(&outcome.file).expect("read");
    assert_eq!(
        text,
        "Provider Name,Sites\r\nJordan Lee,\"FH, CMC\"\r\nJamie Foster,NMHS\r\n"
    );
}

// ============================================================================
// PDF and preview
// ============================================================================

#[test]
fn test_landscape_pdf_with_preview() {
    let dir = tempfile::tempdir().expect("tempdir");
    let preview = dir.path().join("previews").join("report.svg");
    let config = CliConfig {
        format: ExportFormat::Pdf,
        orientation: PageOrientation::Landscape,
        preview: Some(preview.clone()),
        title: Some("Q1 Staffing".to_string()),
        ..config_in(&dir)
    };

    let outcome = run(&config).expect("run");
    assert_eq!(outcome.file, dir.path().join("roster-export-2025-03-14.pdf"));
    let bytes = std::fs::read(&outcome.file).expect("read");
    assert!(bytes.starts_with(b"%PDF"));

    assert_eq!(outcome.preview.as_ref(), Some(&preview));
    let svg = std::fs::read_to_string(&preview).expect("svg");
    assert!(svg.contains("width=\"560\""));
    assert!(svg.contains("Q1 Staffing"));
}

#[test]
fn test_pdf_config_file_is_applied() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pdf_config = dir.path().join("pdf.json");
    std::fs::write(&pdf_config, r#"{"table_max_rows": 2, "document_title": "Weekly"}"#)
        .expect("write");
    let config = CliConfig {
        format: ExportFormat::Pdf,
        pdf_config: Some(pdf_config),
        ..config_in(&dir)
    };
    let outcome = run(&config).expect("run");
    assert!(std::fs::read(&outcome.file).expect("read").starts_with(b"%PDF"));
}

// ============================================================================
// Layouts
// ============================================================================

#[test]
fn test_saved_layout_loads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = dir.path().join("layout.json");
    let mut value = ReportBuilderValue::new("Custom");
    value.blocks.push(ReportBlock::new(BlockKind::Text).with_text("Hello"));
    std::fs::write(&layout, value.to_json().expect("json")).expect("write");

    let saved = dir.path().join("saved.json");
    let config = CliConfig {
        layout: Some(layout),
        save_layout: Some(saved.clone()),
        subtitle: Some("March".to_string()),
        ..config_in(&dir)
    };
    run(&config).expect("run");

    let loaded =
        ReportBuilderValue::from_json(&std::fs::read_to_string(&saved).expect("read")).expect("parse");
    assert_eq!(loaded.title, "Custom");
    assert_eq!(loaded.subtitle, "March");
    assert_eq!(loaded.blocks.len(), 1);
    assert_eq!(loaded.blocks[0].text.as_deref(), Some("Hello"));
}

#[test]
fn test_invalid_layout_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = dir.path().join("layout.json");
    std::fs::write(&layout, "{ not json").expect("write");
    let config = CliConfig {
        layout: Some(layout),
        ..config_in(&dir)
    };
    let err = run(&config).expect_err("bad layout");
    assert!(err.to_string().contains("Invalid layout"));
    assert!(!dir.path().join("roster-export-2025-03-14.csv").exists());
}

// ============================================================================
// Email delivery
// ============================================================================

#[test]
fn test_email_requires_recipient() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = CliConfig {
        delivery: DeliveryAction::Email,
        recipient: Some("   ".to_string()),
        ..config_in(&dir)
    };
    assert!(run(&config).is_err());
    assert!(std::fs::read_dir(dir.path()).expect("dir").next().is_none());
}

#[test]
fn test_email_produces_confirmation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = CliConfig {
        delivery: DeliveryAction::Email,
        recipient: Some("scheduler@example.com".to_string()),
        ..config_in(&dir)
    };
    let outcome = run(&config).expect("run");
    assert!(outcome.file.exists());
    assert_eq!(
        outcome.confirmation.as_deref(),
        Some("Export roster-export-2025-03-14.csv queued for delivery to scheduler@example.com")
    );
}
