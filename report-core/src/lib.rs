//! # Roster Report Core
//!
//! Report builder logic for the roster portal: the block document, canvas
//! geometry, block content, the pointer-driven editor and the export wizard.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 report-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Document        │  Editor                  │
//! │  - Blocks        │  - Gesture sessions      │
//! │  - Title/subtitle│  - Selection             │
//! │  - JSON layout   │  - Host callbacks        │
//! ├─────────────────────────────────────────────┤
//! │  Geometry        │  Content                 │
//! │  - Auto-flow     │  - Canvas summaries      │
//! │  - Clamping      │  - Preview excerpts      │
//! ├─────────────────────────────────────────────┤
//! │  Roster dataset  │  Export wizard           │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod block;
pub mod content;
pub mod document;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod roster;
pub mod session;
pub mod wizard;

pub use block::{BlockId, BlockKind, BlockPatch, ReportBlock};
pub use content::{
    canvas_content, preview_content, CanvasContent, ChartContent, ChartStyle, PreviewContent,
    ReportData, TableExcerpt,
};
pub use document::ReportBuilderValue;
pub use editor::{GestureOutcome, ReportEditor, ReportHost};
pub use error::{ReportError, ReportResult};
pub use event::{PointerEvent, PointerPhase};
pub use geometry::{
    block_layout, canvas_size, create_block, layout_all, BlockLayout, CanvasFrame, CanvasSize,
    GeometryPatch, PageOrientation, Point,
};
pub use roster::{
    sample_roster, ChartBucket, ChartCategory, ColumnSelection, RosterColumn, RosterFilters,
    RosterProvider,
};
pub use session::ReportSession;
pub use wizard::{Delivery, DeliveryAction, ExportFormat, ExportRequest, ExportWizard, WizardStep};

/// Report core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
