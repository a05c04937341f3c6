//! Integration tests for the report editor driving a roster session.
//!
//! Covers the full pointer lifecycle against the reference host, auto-flow
//! cascades after gestures, and the wizard hand-off.

use chrono::NaiveDate;
use report_core::editor::ListenerKind;
use report_core::geometry::{MIN_BLOCK_HEIGHT, MIN_BLOCK_WIDTH};
use report_core::{
    block_layout, canvas_content, canvas_size, sample_roster, BlockId, BlockKind, BlockLayout,
    CanvasContent, CanvasFrame, ExportFormat, ExportWizard, GestureOutcome, PageOrientation,
    PointerEvent, ReportBuilderValue, ReportEditor, ReportHost, ReportSession, RosterColumn,
};

fn empty_session() -> ReportSession {
    ReportSession::new(
        sample_roster(),
        NaiveDate::from_ymd_opt(2025, 6, 30).expect("date"),
    )
    .with_value(ReportBuilderValue::new("Roster Report"))
}

fn layout_of(session: &ReportSession, id: &BlockId) -> BlockLayout {
    let value = session.value();
    let index = value.index_of(id).expect("block present");
    block_layout(&value.blocks, index).expect("layout")
}

// ==========================================================================
// Auto-flow cascade
// ==========================================================================

#[test]
fn test_click_add_then_drag_cascades() {
    let mut session = empty_session();
    let mut editor = ReportEditor::new(PageOrientation::Portrait);

    let chart = editor.add_block(&mut session, BlockKind::Chart);
    let table = editor.add_block(&mut session, BlockKind::Table);
    let summary = editor.add_block(&mut session, BlockKind::Summary);
    assert_eq!(layout_of(&session, &table).y, 110.0);
    assert_eq!(layout_of(&session, &summary).y, 200.0);

    editor
        .begin_block_drag(&session, &chart, &PointerEvent::down(20.0, 20.0))
        .expect("drag");
    for step in 1..=5u8 {
        let offset = f32::from(step) * 6.0;
        editor
            .handle_pointer(&mut session, &PointerEvent::moved(20.0 + offset, 20.0 + offset))
            .expect("move");
    }
    editor
        .handle_pointer(&mut session, &PointerEvent::up(50.0, 50.0))
        .expect("up");

    assert_eq!(layout_of(&session, &chart).y, 50.0);
    assert_eq!(layout_of(&session, &table).y, 140.0);
    assert_eq!(layout_of(&session, &summary).y, 230.0);
}

#[test]
fn test_resize_of_first_block_pushes_followers_down() {
    let mut session = empty_session();
    let mut editor = ReportEditor::default();
    let chart = editor.add_block(&mut session, BlockKind::Chart);
    let note = editor.add_block(&mut session, BlockKind::Text);

    editor
        .begin_resize(&session, &chart, &PointerEvent::down(380.0, 100.0))
        .expect("resize");
    editor
        .pointer_move(&mut session, &PointerEvent::moved(380.0, 160.0))
        .expect("move");
    editor.pointer_up(&mut session, &PointerEvent::up(380.0, 160.0));

    assert_eq!(layout_of(&session, &chart).height, 140.0);
    assert_eq!(layout_of(&session, &note).y, 170.0);
}

// ==========================================================================
// Listener discipline
// ==========================================================================

#[test]
fn test_every_exit_path_detaches_once() {
    let mut session = empty_session();
    let frame = CanvasFrame::at(200.0, 80.0, canvas_size(PageOrientation::Portrait)).with_border(1.0);
    let mut editor = ReportEditor::default().with_frame(frame);
    let chart = editor.add_block(&mut session, BlockKind::Chart);

    // Palette drop inside.
    editor.begin_palette_drag(BlockKind::Summary, &PointerEvent::down(10.0, 10.0));
    let dropped = editor.pointer_up(&mut session, &PointerEvent::up(260.0, 300.0));
    assert!(matches!(dropped, GestureOutcome::Added(_)));

    // Palette drop outside.
    editor.begin_palette_drag(BlockKind::Summary, &PointerEvent::down(10.0, 10.0));
    assert_eq!(
        editor.pointer_up(&mut session, &PointerEvent::up(10.0, 10.0)),
        GestureOutcome::Ended
    );

    // Move then cancel.
    editor
        .begin_block_drag(&session, &chart, &PointerEvent::down(230.0, 110.0))
        .expect("drag");
    editor
        .pointer_move(&mut session, &PointerEvent::moved(240.0, 120.0))
        .expect("move");
    editor.pointer_cancel(&PointerEvent::cancel(240.0, 120.0));

    // Resize superseded by another gesture.
    editor
        .begin_resize(&session, &chart, &PointerEvent::down(500.0, 200.0))
        .expect("resize");
    editor.begin_palette_drag(BlockKind::Text, &PointerEvent::down(0.0, 0.0).with_pointer(2));
    editor.pointer_up(&mut session, &PointerEvent::up(0.0, 0.0).with_pointer(2));

    let listeners = editor.listeners();
    // Five gestures, each with one move and one up listener.
    assert_eq!(listeners.attached(), 10);
    assert_eq!(listeners.detached(), 10);
    assert_eq!(listeners.active_of(ListenerKind::PointerMove), 0);
    assert_eq!(listeners.active_of(ListenerKind::PointerUp), 0);
    assert_eq!(session.value().blocks.len(), 2);
}

#[test]
fn test_gestures_keep_blocks_inside_canvas() {
    let mut session = empty_session();
    let mut editor = ReportEditor::new(PageOrientation::Landscape);
    let canvas = editor.canvas();
    let chart = editor.add_block(&mut session, BlockKind::Chart);

    editor
        .begin_block_drag(&session, &chart, &PointerEvent::down(30.0, 30.0))
        .expect("drag");
    for (x, y) in [(-400.0, -400.0), (2000.0, 2000.0), (300.0, -50.0)] {
        editor
            .pointer_move(&mut session, &PointerEvent::moved(x, y))
            .expect("move");
        assert!(layout_of(&session, &chart).fits(canvas));
    }
    editor.pointer_up(&mut session, &PointerEvent::up(300.0, -50.0));

    editor
        .begin_resize(&session, &chart, &PointerEvent::down(0.0, 0.0))
        .expect("resize");
    editor
        .pointer_move(&mut session, &PointerEvent::moved(-5000.0, -5000.0))
        .expect("move");
    let shrunk = layout_of(&session, &chart);
    assert_eq!((shrunk.width, shrunk.height), (MIN_BLOCK_WIDTH, MIN_BLOCK_HEIGHT));
    editor.pointer_up(&mut session, &PointerEvent::up(0.0, 0.0));
}

// ==========================================================================
// Content and wizard
// ==========================================================================

#[test]
fn test_table_card_tracks_column_toggles() {
    let mut session = empty_session();
    let mut editor = ReportEditor::default();
    let table = editor.add_block(&mut session, BlockKind::Table);
    editor.toggle_column(&mut session, RosterColumn::Email);
    editor.toggle_column(&mut session, RosterColumn::Name);

    let block = session.value().block(&table).expect("table").clone();
    let content = canvas_content(&block, None, &session.data());
    assert!(matches!(content, CanvasContent::Card { detail, .. } if detail == "2 cols · 9 rows"));
}

#[test]
fn test_wizard_round_trip_leaves_layout_alone() {
    let mut session = empty_session();
    let mut editor = ReportEditor::default();
    editor.add_block(&mut session, BlockKind::Chart);
    let before = session.value().clone();

    let mut wizard = ExportWizard::new();
    wizard.open();
    wizard.format = ExportFormat::Pdf;
    wizard.next().expect("next");
    wizard.cancel();
    assert_eq!(session.value(), &before);

    wizard.open();
    wizard.next().expect("next");
    let request = wizard.submit().expect("submit");
    assert_eq!(request.format, ExportFormat::Csv);
}
