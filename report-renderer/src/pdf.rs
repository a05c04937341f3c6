//! Single-page PDF export.
//!
//! Rendering happens in two passes. [`plan_page`] projects every block
//! through a [`PageTransform`] and emits [`DrawOp`]s in page millimetres with
//! a top-left origin. [`render_pdf`] replays the ops onto a printpdf layer,
//! flipping y into PDF's bottom-left space.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference,
    Point as PdfPoint, Polygon, Rgb,
};
use report_core::block::BlockKind;
use report_core::content::{display_text, summary_lines, ChartContent, ChartStyle, ReportData, TableExcerpt};
use report_core::document::{ReportBuilderValue, DEFAULT_TITLE};
use report_core::geometry::{canvas_size, BlockLayout, PageOrientation, Point};
use serde::{Deserialize, Serialize};

use crate::chart::{bar_chart, pie_wedges, wedge_outline, Rect, Rgb8};
use crate::error::{RenderError, RenderResult};
use crate::text::{truncate_chars, wrap_words};

/// Millimetres per typographic point.
pub const MM_PER_PT: f32 = 0.352_778;

const INK: Rgb8 = Rgb8::new(0x22, 0x22, 0x22);
const MUTED: Rgb8 = Rgb8::new(0x66, 0x66, 0x66);
const RULE: Rgb8 = Rgb8::new(0xcc, 0xcc, 0xcc);

/// PDF page and typography settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Portrait page width in millimetres.
    pub page_width_mm: f32,
    /// Portrait page height in millimetres.
    pub page_height_mm: f32,
    /// Document title stored in the PDF metadata.
    pub document_title: String,
    /// Left offset of the title and subtitle.
    pub header_x_mm: f32,
    /// Baseline of the title from the top of the page.
    pub title_y_mm: f32,
    /// Baseline of the subtitle from the top of the page.
    pub subtitle_y_mm: f32,
    /// Title font size in points.
    pub title_size: f32,
    /// Subtitle font size in points.
    pub subtitle_size: f32,
    /// Body font size in points (summary, text, chart labels).
    pub body_size: f32,
    /// Table font size in points.
    pub table_size: f32,
    /// Most table rows drawn per block.
    pub table_max_rows: usize,
    /// Most characters per table cell.
    pub cell_char_budget: usize,
    /// Inner padding of each block.
    pub block_padding_mm: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            document_title: "Roster Export".to_string(),
            header_x_mm: 10.0,
            title_y_mm: 10.0,
            subtitle_y_mm: 15.5,
            title_size: 14.0,
            subtitle_size: 10.0,
            body_size: 9.0,
            table_size: 7.0,
            table_max_rows: 8,
            cell_char_budget: 14,
            block_padding_mm: 2.0,
        }
    }
}

/// Canvas-to-page projection with an independent scale per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    /// Page width in millimetres.
    pub page_width: f32,
    /// Page height in millimetres.
    pub page_height: f32,
    /// Millimetres per canvas pixel horizontally.
    pub scale_x: f32,
    /// Millimetres per canvas pixel vertically.
    pub scale_y: f32,
}

impl PageTransform {
    /// Transform for `orientation`. Landscape transposes both the page and
    /// the canvas.
    #[must_use]
    pub fn new(orientation: PageOrientation, config: &PdfConfig) -> Self {
        let (page_width, page_height) = match orientation {
            PageOrientation::Portrait => (config.page_width_mm, config.page_height_mm),
            PageOrientation::Landscape => (config.page_height_mm, config.page_width_mm),
        };
        let canvas = canvas_size(orientation);
        Self {
            page_width,
            page_height,
            scale_x: page_width / canvas.width,
            scale_y: page_height / canvas.height,
        }
    }

    /// Project a canvas point.
    #[must_use]
    pub fn project_point(&self, point: Point) -> (f32, f32) {
        (point.x * self.scale_x, point.y * self.scale_y)
    }

    /// Project a block layout.
    #[must_use]
    pub fn project(&self, layout: BlockLayout) -> Rect {
        Rect::new(
            layout.x * self.scale_x,
            layout.y * self.scale_y,
            layout.width * self.scale_x,
            layout.height * self.scale_y,
        )
    }
}

/// A drawing primitive in page millimetres, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Single line of text; `y` is the baseline.
    Text {
        /// Left edge.
        x: f32,
        /// Baseline.
        y: f32,
        /// Font size in points.
        size: f32,
        /// Bold face.
        bold: bool,
        /// Fill color.
        color: Rgb8,
        /// Text.
        text: String,
    },
    /// Rectangle.
    Rect {
        /// Bounds.
        rect: Rect,
        /// Fill color.
        fill: Option<Rgb8>,
        /// Outline color.
        stroke: Option<Rgb8>,
    },
    /// Filled closed polygon.
    Polygon {
        /// Vertices.
        points: Vec<(f32, f32)>,
        /// Fill color.
        fill: Rgb8,
    },
    /// Straight line.
    Line {
        /// Start.
        from: (f32, f32),
        /// End.
        to: (f32, f32),
        /// Stroke color.
        color: Rgb8,
    },
}

/// Everything drawn on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// Page width in millimetres.
    pub width_mm: f32,
    /// Page height in millimetres.
    pub height_mm: f32,
    /// Ops in paint order.
    pub ops: Vec<DrawOp>,
}

impl PagePlan {
    /// Text of every text op, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

fn line_height(size: f32) -> f32 {
    size * MM_PER_PT * 1.4
}

fn char_width(size: f32) -> f32 {
    size * MM_PER_PT * 0.5
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fit_count(available: f32, unit: f32) -> usize {
    if available <= 0.0 || unit <= 0.0 {
        0
    } else {
        (available / unit).floor() as usize
    }
}

/// Lay out the page for a document.
#[must_use]
pub fn plan_page(
    value: &ReportBuilderValue,
    data: &ReportData<'_>,
    orientation: PageOrientation,
    config: &PdfConfig,
) -> PagePlan {
    let transform = PageTransform::new(orientation, config);
    let mut painter = Painter {
        config,
        ops: Vec::new(),
    };

    let title = match value.title.trim() {
        "" => DEFAULT_TITLE,
        title => title,
    };
    painter.text(config.header_x_mm, config.title_y_mm, config.title_size, true, INK, title);
    let subtitle = value.subtitle.trim();
    if !subtitle.is_empty() {
        painter.text(
            config.header_x_mm,
            config.subtitle_y_mm,
            config.subtitle_size,
            false,
            MUTED,
            subtitle,
        );
    }

    for (block, layout) in value.blocks.iter().zip(value.layouts()) {
        let rect = transform.project(layout);
        painter.ops.push(DrawOp::Rect {
            rect,
            fill: None,
            stroke: Some(RULE),
        });
        let inner = rect.inset(config.block_padding_mm);
        match block.kind {
            BlockKind::Chart => painter.chart(inner, &ChartContent::from_data(data)),
            BlockKind::Table => painter.table(inner, data),
            BlockKind::Summary => painter.summary(inner, data),
            BlockKind::Text => painter.paragraph(inner, &display_text(block)),
        }
    }

    tracing::debug!(
        "Planned {:?} page with {} blocks and {} ops",
        orientation,
        value.blocks.len(),
        painter.ops.len()
    );
    PagePlan {
        width_mm: transform.page_width,
        height_mm: transform.page_height,
        ops: painter.ops,
    }
}

struct Painter<'a> {
    config: &'a PdfConfig,
    ops: Vec<DrawOp>,
}

impl Painter<'_> {
    fn text(&mut self, x: f32, y: f32, size: f32, bold: bool, color: Rgb8, text: &str) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            size,
            bold,
            color,
            text: text.to_string(),
        });
    }

    fn chart(&mut self, inner: Rect, chart: &ChartContent) {
        let size = self.config.body_size;
        let heading = line_height(size);
        if inner.height < heading {
            return;
        }
        self.text(inner.x, inner.y + size * MM_PER_PT, size, true, INK, chart.label);
        let area = Rect::new(inner.x, inner.y + heading, inner.width, inner.height - heading);
        match chart.style {
            ChartStyle::Bar => self.bar_chart(area, chart),
            ChartStyle::Pie => self.pie_chart(area, chart),
        }
    }

    fn bar_chart(&mut self, area: Rect, chart: &ChartContent) {
        let label_size = self.config.table_size;
        let band = line_height(label_size);
        let plot = Rect::new(area.x, area.y + band, area.width, area.height - band * 2.0);
        let bars = bar_chart(&chart.buckets, plot, 1.5);
        if bars.is_empty() {
            self.text(area.x, area.y + band, label_size, false, MUTED, "No data");
            return;
        }
        for bar in &bars {
            self.ops.push(DrawOp::Rect {
                rect: bar.rect,
                fill: Some(bar.color),
                stroke: None,
            });
            let budget = fit_count(bar.rect.width, char_width(label_size)).max(1);
            self.text(
                bar.rect.x,
                bar.rect.y - 0.6,
                label_size,
                false,
                INK,
                &bar.count.to_string(),
            );
            self.text(
                bar.rect.x,
                plot.bottom() + band * 0.8,
                label_size,
                false,
                INK,
                &truncate_chars(&bar.label, budget),
            );
        }
    }

    fn pie_chart(&mut self, area: Rect, chart: &ChartContent) {
        let label_size = self.config.table_size;
        let wedges = pie_wedges(&chart.buckets);
        if wedges.is_empty() {
            self.text(area.x, area.y + line_height(label_size), label_size, false, MUTED, "No data");
            return;
        }
        let radius = (area.width * 0.45).min(area.height) / 2.0;
        let (cx, cy) = (area.x + radius, area.y + area.height / 2.0);
        for wedge in &wedges {
            self.ops.push(DrawOp::Polygon {
                points: wedge_outline(cx, cy, radius, wedge),
                fill: wedge.color,
            });
        }

        let legend_x = cx + radius + 3.0;
        let row = line_height(label_size);
        let swatch = label_size * MM_PER_PT;
        let budget = fit_count(area.right() - legend_x - swatch - 1.0, char_width(label_size));
        let rows = fit_count(area.height, row);
        for (i, wedge) in wedges.iter().take(rows).enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let y = area.y + row * (i as f32 + 1.0);
            self.ops.push(DrawOp::Rect {
                rect: Rect::new(legend_x, y - swatch, swatch, swatch),
                fill: Some(wedge.color),
                stroke: None,
            });
            let label = format!("{} ({})", wedge.label, wedge.count);
            self.text(
                legend_x + swatch + 1.0,
                y,
                label_size,
                false,
                INK,
                &truncate_chars(&label, budget),
            );
        }
    }

    fn table(&mut self, inner: Rect, data: &ReportData<'_>) {
        let size = self.config.table_size;
        let row = size * MM_PER_PT * 1.5;
        let budget = self.config.cell_char_budget;
        #[allow(clippy::cast_precision_loss)]
        let column_width = budget as f32 * char_width(size) + 1.0;

        let columns = data.selected_columns.effective_columns();
        let fit_columns = fit_count(inner.width, column_width).clamp(1, columns.len().max(1));
        let columns = &columns[..fit_columns.min(columns.len())];
        // Header row and overflow note both need a row.
        let fit_rows = fit_count(inner.height - row * 2.0, row);
        let excerpt = TableExcerpt::new(columns, data.rows, fit_rows.min(self.config.table_max_rows));

        if inner.height < row {
            return;
        }
        let mut y = inner.y + row * 0.75;
        for (i, header) in excerpt.headers.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = inner.x + column_width * i as f32;
            self.text(x, y, size, true, INK, &truncate_chars(header, budget));
        }
        let rule_y = inner.y + row;
        self.ops.push(DrawOp::Line {
            from: (inner.x, rule_y),
            to: (inner.right(), rule_y),
            color: RULE,
        });
        for cells in &excerpt.rows {
            y += row;
            for (i, cell) in cells.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let x = inner.x + column_width * i as f32;
                self.text(x, y, size, false, INK, &truncate_chars(cell, budget));
            }
        }
        if let Some(note) = excerpt.overflow_note() {
            if y + row <= inner.bottom() + f32::EPSILON {
                self.text(inner.x, y + row, size, false, MUTED, &note);
            }
        }
    }

    fn summary(&mut self, inner: Rect, data: &ReportData<'_>) {
        let size = self.config.body_size;
        let row = line_height(size);
        let mut y = inner.y + size * MM_PER_PT;
        for line in summary_lines(data) {
            if y > inner.bottom() {
                break;
            }
            self.text(inner.x, y, size, false, INK, &line);
            y += row;
        }
    }

    fn paragraph(&mut self, inner: Rect, text: &str) {
        let size = self.config.body_size;
        let row = line_height(size);
        let max_chars = fit_count(inner.width, char_width(size)).max(1);
        let max_lines = fit_count(inner.height, row);
        let first = inner.y + size * MM_PER_PT;
        for (i, line) in wrap_words(text, max_chars).iter().take(max_lines).enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let y = first + row * i as f32;
            self.text(inner.x, y, size, false, INK, line);
        }
    }
}

fn pdf_color(color: Rgb8) -> Color {
    let (r, g, b) = color.unit();
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn page_point(x: f32, y: f32, page_height: f32) -> (PdfPoint, bool) {
    (PdfPoint::new(Mm(x), Mm(page_height - y)), false)
}

fn draw_op(
    layer: &PdfLayerReference,
    op: &DrawOp,
    page_height: f32,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    match op {
        DrawOp::Text {
            x,
            y,
            size,
            bold: is_bold,
            color,
            text,
        } => {
            layer.set_fill_color(pdf_color(*color));
            let font = if *is_bold { bold } else { regular };
            layer.use_text(text.clone(), *size, Mm(*x), Mm(page_height - y), font);
        }
        DrawOp::Rect { rect, fill, stroke } => {
            let mode = match (fill, stroke) {
                (Some(_), Some(_)) => PaintMode::FillStroke,
                (Some(_), None) => PaintMode::Fill,
                (None, Some(_)) => PaintMode::Stroke,
                (None, None) => return,
            };
            if let Some(fill) = fill {
                layer.set_fill_color(pdf_color(*fill));
            }
            if let Some(stroke) = stroke {
                layer.set_outline_color(pdf_color(*stroke));
                layer.set_outline_thickness(0.5);
            }
            let ring = vec![
                page_point(rect.x, rect.y, page_height),
                page_point(rect.right(), rect.y, page_height),
                page_point(rect.right(), rect.bottom(), page_height),
                page_point(rect.x, rect.bottom(), page_height),
            ];
            layer.add_polygon(Polygon {
                rings: vec![ring],
                mode,
                winding_order: WindingOrder::NonZero,
            });
        }
        DrawOp::Polygon { points, fill } => {
            layer.set_fill_color(pdf_color(*fill));
            let ring = points
                .iter()
                .map(|(x, y)| page_point(*x, *y, page_height))
                .collect();
            layer.add_polygon(Polygon {
                rings: vec![ring],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
        DrawOp::Line { from, to, color } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(0.3);
            layer.add_line(Line {
                points: vec![
                    page_point(from.0, from.1, page_height),
                    page_point(to.0, to.1, page_height),
                ],
                is_closed: false,
            });
        }
    }
}

/// Encode a page plan as a single-page PDF.
///
/// # Errors
///
/// Returns an error if fonts cannot be loaded or the document cannot be saved.
pub fn render_pdf(plan: &PagePlan, config: &PdfConfig) -> RenderResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        &config.document_title,
        Mm(plan.width_mm),
        Mm(plan.height_mm),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(format!("Failed to load font: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(format!("Failed to load font: {e}")))?;

    let current_layer = doc.get_page(page).get_layer(layer);
    for op in &plan.ops {
        draw_op(&current_layer, op, plan.height_mm, &regular, &bold);
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Pdf(format!("PDF save failed: {e}")))
}

/// Plan and encode a document as PDF bytes.
///
/// # Errors
///
/// Returns an error if PDF generation fails.
pub fn export_pdf(
    value: &ReportBuilderValue,
    data: &ReportData<'_>,
    orientation: PageOrientation,
    config: &PdfConfig,
) -> RenderResult<Vec<u8>> {
    let plan = plan_page(value, data, orientation, config);
    render_pdf(&plan, config)
}
