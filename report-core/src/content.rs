//! Block content for the edit canvas and the read-only preview.
//!
//! Both contexts dispatch on [`BlockKind`] over the same ambient
//! [`ReportData`]. Content never touches block geometry and tolerates empty
//! data (no rows, no buckets, no selected columns).

use chrono::NaiveDate;
use serde::Serialize;

use crate::block::{BlockKind, ReportBlock};
use crate::geometry::{BlockLayout, DEFAULT_BLOCK_HEIGHT};
use crate::roster::{ChartBucket, ChartCategory, ColumnSelection, RosterColumn, RosterProvider};

/// Rows shown by a preview table before the overflow note.
pub const PREVIEW_TABLE_ROWS: usize = 12;
/// Placeholder for empty text and missing cells.
pub const EMPTY_PLACEHOLDER: &str = "—";
/// Placeholder of the text editor.
pub const TEXT_PLACEHOLDER: &str = "Enter your text...";

/// Ambient data every block renders from.
#[derive(Debug, Clone)]
pub struct ReportData<'a> {
    /// Category the chart groups by.
    pub chart_category: ChartCategory,
    /// Buckets for bar charts and the canvas summary.
    pub chart_data: &'a [ChartBucket],
    /// Buckets for pie charts.
    pub chart_data_for_pie: &'a [ChartBucket],
    /// Selected table columns.
    pub selected_columns: &'a ColumnSelection,
    /// Rows of the filtered roster.
    pub rows: &'a [RosterProvider],
    /// Date printed by summary blocks.
    pub generated_on: NaiveDate,
}

impl ReportData<'_> {
    /// Total number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Format a summary date.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Abbreviated content shown inside a canvas block while editing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CanvasContent {
    /// Heading plus a one-line description.
    Card {
        /// Card heading.
        heading: &'static str,
        /// Detail line.
        detail: String,
    },
    /// Live text editor.
    TextEditor {
        /// Current text.
        value: String,
        /// Placeholder shown when empty.
        placeholder: &'static str,
        /// Minimum editor height in pixels.
        min_height: f32,
    },
}

/// Edit-canvas content for a block.
#[must_use]
pub fn canvas_content(block: &ReportBlock, layout: Option<&BlockLayout>, data: &ReportData<'_>) -> CanvasContent {
    match block.kind {
        BlockKind::Chart => CanvasContent::Card {
            heading: "Chart summary",
            detail: format!(
                "{}: {}",
                data.chart_category.label(),
                data.chart_data
                    .iter()
                    .map(|b| format!("{} ({})", b.name, b.count))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        },
        BlockKind::Table => CanvasContent::Card {
            heading: "Table",
            detail: format!(
                "{} cols · {} rows",
                data.selected_columns.effective_columns().len(),
                data.row_count()
            ),
        },
        BlockKind::Summary => CanvasContent::Card {
            heading: "Report info",
            detail: "Generated date, total rows".to_string(),
        },
        BlockKind::Text => {
            let height = layout.map_or_else(
                || block.height.unwrap_or(DEFAULT_BLOCK_HEIGHT),
                |l| l.height,
            );
            CanvasContent::TextEditor {
                value: block.text.clone().unwrap_or_default(),
                placeholder: TEXT_PLACEHOLDER,
                min_height: (height - 24.0).max(36.0),
            }
        }
    }
}

/// Chart style chosen for the current category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    /// Vertical bars.
    Bar,
    /// Pie wedges.
    Pie,
}

/// Chart content of a preview block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartContent {
    /// Bar or pie.
    pub style: ChartStyle,
    /// Category label.
    pub label: &'static str,
    /// Buckets to draw.
    pub buckets: Vec<ChartBucket>,
}

impl ChartContent {
    /// Chart for the current category.
    #[must_use]
    pub fn from_data(data: &ReportData<'_>) -> Self {
        let pie = data.chart_category.is_pie();
        Self {
            style: if pie { ChartStyle::Pie } else { ChartStyle::Bar },
            label: data.chart_category.label(),
            buckets: if pie {
                data.chart_data_for_pie.to_vec()
            } else {
                data.chart_data.to_vec()
            },
        }
    }

    /// Sum of all bucket counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Largest bucket count.
    #[must_use]
    pub fn max(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// A truncated excerpt of the roster table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableExcerpt {
    /// Header labels.
    pub headers: Vec<&'static str>,
    /// Visible rows of cell text.
    pub rows: Vec<Vec<String>>,
    /// Rows left out of the excerpt.
    pub hidden_rows: usize,
}

impl TableExcerpt {
    /// Excerpt of `columns` over the first `max_rows` rows.
    #[must_use]
    pub fn new(columns: &[RosterColumn], rows: &[RosterProvider], max_rows: usize) -> Self {
        let visible: Vec<Vec<String>> = rows
            .iter()
            .take(max_rows)
            .map(|row| {
                columns
                    .iter()
                    .map(|c| {
                        let cell = row.cell(*c);
                        if cell.is_empty() {
                            EMPTY_PLACEHOLDER.to_string()
                        } else {
                            cell
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            headers: columns.iter().map(|c| c.label()).collect(),
            hidden_rows: rows.len() - visible.len(),
            rows: visible,
        }
    }

    /// Overflow note such as `+3 more rows`, if any rows are hidden.
    #[must_use]
    pub fn overflow_note(&self) -> Option<String> {
        (self.hidden_rows > 0).then(|| format!("+{} more rows", self.hidden_rows))
    }
}

/// Read-only content of a preview block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PreviewContent {
    /// Full chart.
    Chart(ChartContent),
    /// Table excerpt.
    Table(TableExcerpt),
    /// Fixed metadata lines.
    Summary {
        /// Lines in display order.
        lines: [String; 2],
    },
    /// Trimmed text or the placeholder.
    Text {
        /// Text to display.
        text: String,
    },
}

/// Summary lines shared by the preview and the PDF.
#[must_use]
pub fn summary_lines(data: &ReportData<'_>) -> [String; 2] {
    [
        format!("Generated: {}", format_date(data.generated_on)),
        format!("Total rows: {}", data.row_count()),
    ]
}

/// Trimmed block text, or the placeholder when blank.
#[must_use]
pub fn display_text(block: &ReportBlock) -> String {
    match block.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => EMPTY_PLACEHOLDER.to_string(),
    }
}

/// Preview content for a block.
#[must_use]
pub fn preview_content(block: &ReportBlock, data: &ReportData<'_>) -> PreviewContent {
    match block.kind {
        BlockKind::Chart => PreviewContent::Chart(ChartContent::from_data(data)),
        BlockKind::Table => PreviewContent::Table(TableExcerpt::new(
            &data.selected_columns.effective_columns(),
            data.rows,
            PREVIEW_TABLE_ROWS,
        )),
        BlockKind::Summary => PreviewContent::Summary {
            lines: summary_lines(data),
        },
        BlockKind::Text => PreviewContent::Text {
            text: display_text(block),
        },
    }
}
