//! Integration tests for report export (report-renderer).
//!
//! Drives the wizard against a roster session and checks the produced CSV,
//! PDF and preview artifacts.

use chrono::NaiveDate;
use report_core::roster::{RosterFilters, WorkStatus};
use report_core::{
    BlockKind, ChartCategory, DeliveryAction, ExportFormat, ExportWizard, PageOrientation,
    PointerEvent, ReportEditor, ReportHost, ReportSession, RosterColumn,
};
use report_renderer::pdf::DrawOp;
use report_renderer::{plan_page, render_preview_svg, PdfConfig, ReportExporter};

fn session() -> ReportSession {
    ReportSession::new(
        report_core::sample_roster(),
        NaiveDate::from_ymd_opt(2025, 7, 4).expect("date"),
    )
}

fn submit(format: ExportFormat, orientation: PageOrientation) -> report_core::ExportRequest {
    let mut wizard = ExportWizard::new();
    wizard.open();
    wizard.format = format;
    wizard.orientation = orientation;
    wizard.next().expect("next");
    wizard.submit().expect("submit")
}

// ==========================================================================
// CSV
// ==========================================================================

#[test]
fn test_csv_export_of_filtered_roster() {
    let mut session = session().with_filters(RosterFilters {
        query: Some("nmhs".to_string()),
        ..RosterFilters::default()
    });
    let mut editor = ReportEditor::default();
    editor.toggle_column(&mut session, RosterColumn::Phone);
    editor.toggle_column(&mut session, RosterColumn::Name);

    let request = submit(ExportFormat::Csv, PageOrientation::Landscape);
    assert_eq!(request.orientation, PageOrientation::Portrait);

    let artifact = ReportExporter::with_defaults()
        .export(&request, session.value(), &session.data())
        .expect("export");
    assert_eq!(artifact.file_name, "roster-export-2025-07-04.csv");

    let mut reader = csv::ReaderBuilder::new().from_reader(artifact.bytes.as_slice());
    let headers: Vec<String> = reader
        .headers()
        .expect("headers")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(headers, vec!["Provider Name", "Phone"]);
    let names: Vec<String> = reader
        .records()
        .map(|r| r.expect("record")[0].to_string())
        .collect();
    assert_eq!(names.len(), session.rows().len());
    assert!(names.iter().all(|n| n != "Jordan Lee"));

    let text = String::from_utf8(artifact.bytes).expect("utf8");
    assert_eq!(text.matches("\r\n").count(), names.len() + 1);
}

#[test]
fn test_csv_with_work_status_filter_and_no_rows() {
    let session = session().with_filters(RosterFilters {
        query: Some("nobody-matches-this".to_string()),
        work_status: Some(WorkStatus::Locum),
        ..RosterFilters::default()
    });
    let request = submit(ExportFormat::Csv, PageOrientation::Portrait);
    let artifact = ReportExporter::with_defaults()
        .export(&request, session.value(), &session.data())
        .expect("export");
    let text = String::from_utf8(artifact.bytes).expect("utf8");
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("Provider Name,Preferred Name,Type"));
}

// ==========================================================================
// PDF
// ==========================================================================

#[test]
fn test_pdf_export_in_both_orientations() {
    let session = session().with_category(ChartCategory::Status);
    for orientation in [PageOrientation::Portrait, PageOrientation::Landscape] {
        let request = submit(ExportFormat::Pdf, orientation);
        let artifact = ReportExporter::with_defaults()
            .export(&request, session.value(), &session.data())
            .expect("export");
        assert!(artifact.bytes.starts_with(b"%PDF"));
        assert_eq!(artifact.mime_type, "application/pdf");
        assert!(artifact.file_name.ends_with(".pdf"));
    }
}

#[test]
fn test_pdf_plan_stays_on_page_after_gestures() {
    let mut session = session();
    let mut editor = ReportEditor::new(PageOrientation::Landscape);
    let note = editor.add_block(&mut session, BlockKind::Text);
    editor
        .set_block_text(&mut session, &note, "Staffing notes for the holiday weekend")
        .expect("text");
    editor
        .begin_block_drag(&session, &note, &PointerEvent::down(30.0, 300.0))
        .expect("drag");
    editor
        .pointer_move(&mut session, &PointerEvent::moved(900.0, 900.0))
        .expect("move");
    editor.pointer_up(&mut session, &PointerEvent::up(900.0, 900.0));

    let config = PdfConfig::default();
    let plan = plan_page(session.value(), &session.data(), PageOrientation::Landscape, &config);
    assert_eq!((plan.width_mm, plan.height_mm), (297.0, 210.0));
    for op in &plan.ops {
        if let DrawOp::Rect { rect, .. } = op {
            assert!(rect.x >= 0.0 && rect.y >= 0.0);
            assert!(rect.right() <= plan.width_mm + 1e-2);
            assert!(rect.bottom() <= plan.height_mm + 1e-2);
        }
    }
    assert!(plan.texts().any(|t| t.contains("Staffing")));
}

// ==========================================================================
// Email and preview
// ==========================================================================

#[test]
fn test_email_delivery_is_simulated() {
    let session = session();
    let mut wizard = ExportWizard::new();
    wizard.open();
    wizard.delivery = DeliveryAction::Email;
    wizard.next().expect("next");
    assert!(!wizard.can_submit());
    wizard.recipient = "scheduler@example.com".to_string();
    let request = wizard.submit().expect("submit");

    let artifact = ReportExporter::with_defaults()
        .export(&request, session.value(), &session.data())
        .expect("export");
    assert!(!artifact.bytes.is_empty());
    let confirmation = artifact.confirmation().expect("confirmation");
    assert!(confirmation.contains("scheduler@example.com"));
    assert!(confirmation.contains(&artifact.file_name));
}

#[test]
fn test_preview_matches_session_layout() {
    let mut session = session();
    let mut editor = ReportEditor::default();
    editor.set_title(&mut session, "July roster");
    editor.add_block(&mut session, BlockKind::Text);
    let svg = render_preview_svg(session.value(), &session.data(), PageOrientation::Portrait);
    assert_eq!(svg.matches("<g data-block-id=").count(), 4);
    assert!(svg.contains("July roster"));
    assert!(svg.contains("Total rows: 9"));
    assert!(!svg.contains("more rows"));
}
