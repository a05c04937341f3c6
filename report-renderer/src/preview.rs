//! SVG rendering of the read-only report preview.
//!
//! The preview is drawn at canvas size below a header band that carries the
//! title and subtitle. Each block becomes one clipped `<g>`.

use std::fmt::Write;

use report_core::content::{preview_content, ChartContent, ChartStyle, PreviewContent, TableExcerpt};
use report_core::document::{ReportBuilderValue, DEFAULT_TITLE};
use report_core::geometry::{canvas_size, PageOrientation};
use report_core::ReportData;

use crate::chart::{bar_chart, pie_wedges, Rect};
use crate::text::{truncate_chars, wrap_words};

/// Height of the title band above the canvas, in pixels.
pub const HEADER_HEIGHT: f32 = 48.0;

const FONT: &str = "font-family=\"sans-serif\"";
const PADDING: f32 = 8.0;
const ROW: f32 = 14.0;

/// Render the preview of `value` as an SVG document.
#[must_use]
pub fn render_preview_svg(
    value: &ReportBuilderValue,
    data: &ReportData<'_>,
    orientation: PageOrientation,
) -> String {
    let canvas = canvas_size(orientation);
    let height = canvas.height + HEADER_HEIGHT;

    let mut svg = String::with_capacity(8192);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{height}\" viewBox=\"0 0 {} {height}\">",
        canvas.width, canvas.width,
    );
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>");

    let title = match value.title.trim() {
        "" => DEFAULT_TITLE,
        title => title,
    };
    let _ = write!(
        svg,
        "<text x=\"{PADDING}\" y=\"22\" font-size=\"16\" font-weight=\"bold\" fill=\"#222\" {FONT}>{}</text>",
        escape_xml(title),
    );
    let subtitle = value.subtitle.trim();
    if !subtitle.is_empty() {
        let _ = write!(
            svg,
            "<text x=\"{PADDING}\" y=\"40\" font-size=\"11\" fill=\"#666\" {FONT}>{}</text>",
            escape_xml(subtitle),
        );
    }

    let _ = write!(svg, "<g transform=\"translate(0,{HEADER_HEIGHT})\">");
    for (index, (block, layout)) in value.blocks.iter().zip(value.layouts()).enumerate() {
        let rect = Rect::from(layout);
        let _ = write!(
            svg,
            "<clipPath id=\"clip-{index}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath>",
            rect.x, rect.y, rect.width, rect.height,
        );
        let _ = write!(
            svg,
            "<g data-block-id=\"{}\" data-kind=\"{}\" clip-path=\"url(#clip-{index})\">",
            escape_xml(block.id.as_str()),
            block.kind.as_str(),
        );
        let _ = write!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#fafafa\" stroke=\"#ddd\" stroke-width=\"1\"/>",
            rect.x, rect.y, rect.width, rect.height,
        );
        let inner = rect.inset(PADDING);
        match preview_content(block, data) {
            PreviewContent::Chart(chart) => render_chart(&mut svg, inner, &chart),
            PreviewContent::Table(table) => render_table(&mut svg, inner, &table),
            PreviewContent::Summary { lines } => {
                for (i, line) in lines.iter().enumerate() {
                    #[allow(clippy::cast_precision_loss)]
                    let y = inner.y + ROW * (i as f32 + 1.0);
                    text(&mut svg, inner.x, y, 12.0, "#222", line);
                }
            }
            PreviewContent::Text { text: body } => {
                // Roughly 6px per character at 12px.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let max_chars = (inner.width / 6.0).max(1.0) as usize;
                for (i, line) in wrap_words(&body, max_chars).iter().enumerate() {
                    #[allow(clippy::cast_precision_loss)]
                    let y = inner.y + ROW * (i as f32 + 1.0);
                    text(&mut svg, inner.x, y, 12.0, "#222", line);
                }
            }
        }
        svg.push_str("</g>");
    }
    svg.push_str("</g></svg>");

    tracing::debug!("Rendered SVG preview of {} blocks", value.blocks.len());
    svg
}

fn text(svg: &mut String, x: f32, y: f32, size: f32, fill: &str, content: &str) {
    let _ = write!(
        svg,
        "<text x=\"{x}\" y=\"{y}\" font-size=\"{size}\" fill=\"{fill}\" {FONT}>{}</text>",
        escape_xml(content),
    );
}

fn render_chart(svg: &mut String, inner: Rect, chart: &ChartContent) {
    text(svg, inner.x, inner.y + 10.0, 11.0, "#666", chart.label);
    let area = Rect::new(inner.x, inner.y + ROW, inner.width, inner.height - ROW);
    match chart.style {
        ChartStyle::Bar => {
            let plot = Rect::new(area.x, area.y, area.width, area.height - ROW);
            for bar in bar_chart(&chart.buckets, plot, 4.0) {
                let r = bar.rect;
                let _ = write!(
                    svg,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"2\"><title>{} ({})</title></rect>",
                    r.x,
                    r.y,
                    r.width,
                    r.height,
                    bar.color.hex(),
                    escape_xml(&bar.label),
                    bar.count,
                );
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let budget = (r.width / 5.0).max(1.0) as usize;
                text(svg, r.x, plot.bottom() + 11.0, 9.0, "#444", &truncate_chars(&bar.label, budget));
            }
        }
        ChartStyle::Pie => {
            let radius = (area.width * 0.45).min(area.height) / 2.0;
            let cx = area.x + radius;
            let cy = area.y + area.height / 2.0;
            let wedges = pie_wedges(&chart.buckets);
            for wedge in &wedges {
                let x1 = cx + radius * wedge.start.cos();
                let y1 = cy + radius * wedge.start.sin();
                let x2 = cx + radius * wedge.end.cos();
                let y2 = cy + radius * wedge.end.sin();
                let large_arc = i32::from(wedge.sweep() > std::f32::consts::PI);
                if wedges.len() == 1 {
                    let _ = write!(
                        svg,
                        "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" fill=\"{}\"/>",
                        wedge.color.hex(),
                    );
                } else {
                    let _ = write!(
                        svg,
                        "<path d=\"M{cx},{cy} L{x1},{y1} A{radius},{radius} 0 {large_arc},1 {x2},{y2} Z\" fill=\"{}\"/>",
                        wedge.color.hex(),
                    );
                }
            }
            let legend_x = cx + radius + 12.0;
            for (i, wedge) in wedges.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let y = area.y + ROW * (i as f32 + 1.0);
                let _ = write!(
                    svg,
                    "<rect x=\"{legend_x}\" y=\"{}\" width=\"8\" height=\"8\" fill=\"{}\"/>",
                    y - 8.0,
                    wedge.color.hex(),
                );
                text(
                    svg,
                    legend_x + 12.0,
                    y,
                    10.0,
                    "#222",
                    &format!("{} ({})", wedge.label, wedge.count),
                );
            }
        }
    }
}

fn render_table(svg: &mut String, inner: Rect, table: &TableExcerpt) {
    if table.headers.is_empty() {
        return;
    }
    #[allow(clippy::cast_precision_loss)]
    let column_width = inner.width / table.headers.len() as f32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let budget = (column_width / 5.0).max(1.0) as usize;
    let mut y = inner.y + 10.0;
    for (i, header) in table.headers.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let x = inner.x + column_width * i as f32;
        text(svg, x, y, 9.0, "#222", &truncate_chars(header, budget));
    }
    for row in &table.rows {
        y += ROW;
        for (i, cell) in row.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = inner.x + column_width * i as f32;
            text(svg, x, y, 9.0, "#444", &truncate_chars(cell, budget));
        }
    }
    if let Some(note) = table.overflow_note() {
        text(svg, inner.x, y + ROW, 9.0, "#888", &note);
    }
}

/// Escape special XML characters.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
