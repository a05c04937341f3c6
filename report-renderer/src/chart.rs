//! Chart geometry shared by the SVG preview and the PDF page.
//!
//! Everything here works in a top-left origin coordinate space with any unit
//! (canvas pixels for SVG, millimetres for PDF).

use report_core::geometry::BlockLayout;
use report_core::roster::ChartBucket;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Create a color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form.
    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to `0.0..=1.0`.
    #[must_use]
    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

/// Series colors, cycled by bucket index.
pub const PALETTE: [Rgb8; 6] = [
    Rgb8::new(0x4e, 0x79, 0xa7),
    Rgb8::new(0xf2, 0x8e, 0x2b),
    Rgb8::new(0xe1, 0x57, 0x59),
    Rgb8::new(0x76, 0xb7, 0xb2),
    Rgb8::new(0x59, 0xa1, 0x4f),
    Rgb8::new(0xed, 0xc9, 0x48),
];

/// Color for the bucket at `index`.
#[must_use]
pub fn series_color(index: usize) -> Rgb8 {
    PALETTE[index % PALETTE.len()]
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrink by `pad` on every side, never below zero size.
    #[must_use]
    pub fn inset(&self, pad: f32) -> Self {
        Self {
            x: self.x + pad,
            y: self.y + pad,
            width: (self.width - pad * 2.0).max(0.0),
            height: (self.height - pad * 2.0).max(0.0),
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

impl From<BlockLayout> for Rect {
    fn from(layout: BlockLayout) -> Self {
        Self::new(layout.x, layout.y, layout.width, layout.height)
    }
}

/// One bar of a bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Bar rectangle.
    pub rect: Rect,
    /// Fill color.
    pub color: Rgb8,
    /// Bucket name.
    pub label: String,
    /// Bucket count.
    pub count: usize,
}

/// Lay out bars inside `area`, bottom aligned and scaled to the largest
/// bucket. Returns nothing when every bucket is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bar_chart(buckets: &[ChartBucket], area: Rect, gap: f32) -> Vec<Bar> {
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    if max == 0 || area.width <= 0.0 || area.height <= 0.0 {
        return Vec::new();
    }
    let n = buckets.len() as f32;
    let bar_width = ((area.width - gap * (n - 1.0)) / n).max(0.0);
    buckets
        .iter()
        .enumerate()
        .map(|(idx, bucket)| {
            let height = bucket.count as f32 / max as f32 * area.height;
            Bar {
                rect: Rect::new(
                    area.x + idx as f32 * (bar_width + gap),
                    area.bottom() - height,
                    bar_width,
                    height,
                ),
                color: series_color(idx),
                label: bucket.name.clone(),
                count: bucket.count,
            }
        })
        .collect()
}

/// One wedge of a pie chart. Angles are radians, clockwise from 12 o'clock
/// in a y-down space.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    /// Start angle.
    pub start: f32,
    /// End angle.
    pub end: f32,
    /// Fill color.
    pub color: Rgb8,
    /// Bucket name.
    pub label: String,
    /// Bucket count.
    pub count: usize,
}

impl Wedge {
    /// Angular size.
    #[must_use]
    pub fn sweep(&self) -> f32 {
        self.end - self.start
    }
}

/// Split a full turn between buckets by count. Zero buckets get no wedge.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pie_wedges(buckets: &[ChartBucket]) -> Vec<Wedge> {
    let total: usize = buckets.iter().map(|b| b.count).sum();
    if total == 0 {
        return Vec::new();
    }
    let mut start = -std::f32::consts::FRAC_PI_2;
    buckets
        .iter()
        .enumerate()
        .filter(|(_, b)| b.count > 0)
        .map(|(idx, bucket)| {
            let sweep = bucket.count as f32 / total as f32 * std::f32::consts::TAU;
            let wedge = Wedge {
                start,
                end: start + sweep,
                color: series_color(idx),
                label: bucket.name.clone(),
                count: bucket.count,
            };
            start += sweep;
            wedge
        })
        .collect()
}

/// Closed outline of a wedge: the center followed by points along the arc.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn wedge_outline(cx: f32, cy: f32, radius: f32, wedge: &Wedge) -> Vec<(f32, f32)> {
    // About one segment per 6 degrees.
    let steps = ((wedge.sweep() / 0.105).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push((cx, cy));
    for i in 0..=steps {
        let angle = wedge.start + wedge.sweep() * i as f32 / steps as f32;
        points.push((cx + radius * angle.cos(), cy + radius * angle.sin()));
    }
    points
}
