//! Canvas geometry - canvas sizes, block layout and clamping.
//!
//! Layout is a pure projection over the ordered block list. Nothing here is
//! cached on the blocks, so moving or resizing an earlier block moves every
//! auto-flow block after it on the next call.

use serde::{Deserialize, Serialize};

use crate::block::{BlockKind, ReportBlock};

/// Portrait canvas width in pixels.
pub const CANVAS_PORTRAIT_WIDTH: f32 = 400.0;
/// Portrait canvas height in pixels.
pub const CANVAS_PORTRAIT_HEIGHT: f32 = 560.0;
/// Smallest width a block can be resized to.
pub const MIN_BLOCK_WIDTH: f32 = 80.0;
/// Smallest height a block can be resized to.
pub const MIN_BLOCK_HEIGHT: f32 = 40.0;
/// Width of a freshly created block.
pub const DEFAULT_BLOCK_WIDTH: f32 = 360.0;
/// Height of a freshly created block.
pub const DEFAULT_BLOCK_HEIGHT: f32 = 80.0;
/// Left margin and top margin of the first auto-flow block.
pub const MARGIN: f32 = 20.0;
/// Vertical gap between stacked auto-flow blocks.
pub const GAP: f32 = 10.0;

const EDGE_TOLERANCE: f32 = 1e-3;

/// Page orientation of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl std::str::FromStr for PageOrientation {
    type Err = crate::ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(crate::ReportError::InvalidValue {
                field: "orientation",
                value: s.to_string(),
            }),
        }
    }
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// Canvas size for an orientation. Landscape is portrait transposed.
#[must_use]
pub fn canvas_size(orientation: PageOrientation) -> CanvasSize {
    match orientation {
        PageOrientation::Portrait => CanvasSize {
            width: CANVAS_PORTRAIT_WIDTH,
            height: CANVAS_PORTRAIT_HEIGHT,
        },
        PageOrientation::Landscape => CanvasSize {
            width: CANVAS_PORTRAIT_HEIGHT,
            height: CANVAS_PORTRAIT_WIDTH,
        },
    }
}

/// Resolved position and size of a block in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockLayout {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl BlockLayout {
    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Whether the rectangle sits fully inside the canvas with at least the
    /// minimum block size, up to float rounding on the far edges.
    #[must_use]
    pub fn fits(&self, canvas: CanvasSize) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= canvas.width + EDGE_TOLERANCE
            && self.bottom() <= canvas.height + EDGE_TOLERANCE
            && self.width >= MIN_BLOCK_WIDTH
            && self.height >= MIN_BLOCK_HEIGHT
    }
}

/// A point in canvas or client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Layout of the block given its predecessor's layout.
fn resolve(block: &ReportBlock, prev: Option<&BlockLayout>) -> BlockLayout {
    let width = block.width.unwrap_or(DEFAULT_BLOCK_WIDTH);
    let height = block.height.unwrap_or(DEFAULT_BLOCK_HEIGHT);
    if let (Some(x), Some(y)) = (block.x, block.y) {
        return BlockLayout {
            x,
            y,
            width,
            height,
        };
    }
    let y = prev.map_or(MARGIN, |p| p.bottom() + GAP);
    BlockLayout {
        x: MARGIN,
        y,
        width,
        height,
    }
}

/// Layout of the block at `index`, walking every earlier block.
///
/// Returns `None` if `index` is out of range.
#[must_use]
pub fn block_layout(blocks: &[ReportBlock], index: usize) -> Option<BlockLayout> {
    let upto = blocks.get(..=index)?;
    let mut prev: Option<BlockLayout> = None;
    for block in upto {
        prev = Some(resolve(block, prev.as_ref()));
    }
    prev
}

/// Layouts of all blocks in order.
#[must_use]
pub fn layout_all(blocks: &[ReportBlock]) -> Vec<BlockLayout> {
    let mut out: Vec<BlockLayout> = Vec::with_capacity(blocks.len());
    for block in blocks {
        let layout = resolve(block, out.last());
        out.push(layout);
    }
    out
}

/// Create a block of `kind`.
///
/// With a cursor the block is placed there at default size, clamped so it
/// fits the canvas. Without one it auto-flows below its predecessor, unless
/// an earlier block reaches lower: then it gets an explicit position below
/// the lowest block so nothing overlaps.
#[must_use]
pub fn create_block(
    kind: BlockKind,
    existing: &[ReportBlock],
    at_cursor: Option<Point>,
    canvas: CanvasSize,
) -> ReportBlock {
    let block = ReportBlock::new(kind);
    match at_cursor {
        Some(cursor) => {
            let width = DEFAULT_BLOCK_WIDTH.min(canvas.width);
            let height = DEFAULT_BLOCK_HEIGHT.min(canvas.height);
            let x = clamp_axis(cursor.x, canvas.width - width);
            let y = clamp_axis(cursor.y, canvas.height - height);
            block.with_geometry(x, y, width, height)
        }
        None => {
            let layouts = layout_all(existing);
            let lowest = layouts.iter().map(BlockLayout::bottom).reduce(f32::max);
            let predecessor = layouts.last().map(BlockLayout::bottom);
            match (lowest, predecessor) {
                (Some(lowest), Some(predecessor)) if lowest > predecessor + EDGE_TOLERANCE => {
                    let width = DEFAULT_BLOCK_WIDTH.min(canvas.width);
                    let height = DEFAULT_BLOCK_HEIGHT.min(canvas.height);
                    let y = clamp_axis(lowest + GAP, canvas.height - height);
                    tracing::debug!(
                        "Placing {} block below lowest block at y={y}",
                        kind.as_str()
                    );
                    block.with_geometry(MARGIN, y, width, height)
                }
                _ => {
                    tracing::debug!(
                        "Appending auto-flow {} block after {} existing",
                        kind.as_str(),
                        existing.len()
                    );
                    block
                }
            }
        }
    }
}

/// Clamp `value` to `[0, max]`, with `max` floored at zero.
fn clamp_axis(value: f32, max: f32) -> f32 {
    value.min(max).max(0.0)
}

/// Clamp a size to `[min, available]`, preferring `min` when the canvas is
/// too small to honor both.
fn clamp_extent(value: f32, min: f32, available: f32) -> f32 {
    value.min(available).max(min)
}

/// Partial geometry edit from the position/size editor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryPatch {
    /// New X, if edited.
    pub x: Option<f32>,
    /// New Y, if edited.
    pub y: Option<f32>,
    /// New width, if edited.
    pub width: Option<f32>,
    /// New height, if edited.
    pub height: Option<f32>,
}

/// Merge a geometry edit with the current layout and clamp the result into
/// the canvas. Size is clamped first so the position clamp always has room.
#[must_use]
pub fn clamp_geometry(patch: GeometryPatch, layout: BlockLayout, canvas: CanvasSize) -> BlockLayout {
    let width = clamp_extent(
        patch.width.unwrap_or(layout.width),
        MIN_BLOCK_WIDTH,
        canvas.width,
    );
    let height = clamp_extent(
        patch.height.unwrap_or(layout.height),
        MIN_BLOCK_HEIGHT,
        canvas.height,
    );
    BlockLayout {
        x: clamp_axis(patch.x.unwrap_or(layout.x), canvas.width - width),
        y: clamp_axis(patch.y.unwrap_or(layout.y), canvas.height - height),
        width,
        height,
    }
}

/// Clamp a drag target so the block stays fully inside the canvas.
///
/// The size only changes when the block no longer fits the canvas at all.
#[must_use]
pub fn clamp_move(layout: BlockLayout, target: Point, canvas: CanvasSize) -> BlockLayout {
    clamp_geometry(
        GeometryPatch {
            x: Some(target.x),
            y: Some(target.y),
            width: None,
            height: None,
        },
        layout,
        canvas,
    )
}

/// Clamp a resize of `start_size + delta` anchored at the layout origin.
///
/// An origin that leaves no room for the minimum size is pulled back inside.
#[must_use]
pub fn clamp_resize(
    layout: BlockLayout,
    start_width: f32,
    start_height: f32,
    delta: Point,
    canvas: CanvasSize,
) -> BlockLayout {
    let x = clamp_axis(layout.x, canvas.width - MIN_BLOCK_WIDTH);
    let y = clamp_axis(layout.y, canvas.height - MIN_BLOCK_HEIGHT);
    BlockLayout {
        x,
        y,
        width: clamp_extent(start_width + delta.x, MIN_BLOCK_WIDTH, canvas.width - x),
        height: clamp_extent(start_height + delta.y, MIN_BLOCK_HEIGHT, canvas.height - y),
    }
}

/// Client-space placement of the canvas element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasFrame {
    /// Left edge of the bounding rectangle in client coordinates.
    pub left: f32,
    /// Top edge of the bounding rectangle in client coordinates.
    pub top: f32,
    /// Width of the bounding rectangle (including borders).
    pub width: f32,
    /// Height of the bounding rectangle (including borders).
    pub height: f32,
    /// Left border width.
    pub border_left: f32,
    /// Top border width.
    pub border_top: f32,
}

impl CanvasFrame {
    /// Frame at `(left, top)` for a canvas of the given size with no border.
    #[must_use]
    pub fn at(left: f32, top: f32, size: CanvasSize) -> Self {
        Self {
            left,
            top,
            width: size.width,
            height: size.height,
            border_left: 0.0,
            border_top: 0.0,
        }
    }

    /// Add a uniform border around the canvas.
    #[must_use]
    pub fn with_border(mut self, border: f32) -> Self {
        self.border_left = border;
        self.border_top = border;
        self.width += border * 2.0;
        self.height += border * 2.0;
        self
    }

    /// Convert a client point to canvas coordinates.
    #[must_use]
    pub fn to_canvas(&self, client: Point) -> Point {
        Point {
            x: client.x - self.left - self.border_left,
            y: client.y - self.top - self.border_top,
        }
    }

    /// Whether a client point lies within the bounding rectangle, edges included.
    #[must_use]
    pub fn contains(&self, client: Point) -> bool {
        client.x >= self.left
            && client.x <= self.left + self.width
            && client.y >= self.top
            && client.y <= self.top + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portrait() -> CanvasSize {
        canvas_size(PageOrientation::Portrait)
    }

    #[test]
    fn test_canvas_size_transposes_for_landscape() {
        let p = canvas_size(PageOrientation::Portrait);
        let l = canvas_size(PageOrientation::Landscape);
        assert_eq!((p.width, p.height), (400.0, 560.0));
        assert_eq!((l.width, l.height), (p.height, p.width));
    }

    #[test]
    fn test_explicit_geometry_is_identity() {
        let blocks = vec![ReportBlock::new(BlockKind::Chart).with_geometry(33.0, 44.0, 120.0, 60.0)];
        let layout = block_layout(&blocks, 0).expect("layout");
        assert_eq!(
            layout,
            BlockLayout {
                x: 33.0,
                y: 44.0,
                width: 120.0,
                height: 60.0
            }
        );
    }

    #[test]
    fn test_auto_flow_stacks_with_gap() {
        let blocks = vec![
            ReportBlock::new(BlockKind::Chart),
            ReportBlock::new(BlockKind::Table),
            ReportBlock::new(BlockKind::Summary),
        ];
        let layouts = layout_all(&blocks);
        assert_eq!(layouts[0].y, MARGIN);
        assert_eq!(layouts[1].y, 110.0);
        assert_eq!(layouts[2].y, 200.0);
        assert!(layouts.iter().all(|l| l.x == MARGIN));
    }

    #[test]
    fn test_auto_flow_follows_moved_predecessor() {
        let mut blocks = vec![
            ReportBlock::new(BlockKind::Chart),
            ReportBlock::new(BlockKind::Table),
        ];
        blocks[0].x = Some(50.0);
        blocks[0].y = Some(50.0);
        assert_eq!(block_layout(&blocks, 1).map(|l| l.y), Some(140.0));
    }

    #[test]
    fn test_layout_out_of_range() {
        assert!(block_layout(&[], 0).is_none());
    }

    #[test]
    fn test_create_block_at_cursor_is_clamped() {
        let block = create_block(BlockKind::Text, &[], Some(Point::new(390.0, -20.0)), portrait());
        assert_eq!(block.x, Some(40.0));
        assert_eq!(block.y, Some(0.0));
        assert_eq!(block.width, Some(DEFAULT_BLOCK_WIDTH));
        assert_eq!(block.text.as_deref(), Some(""));
    }

    #[test]
    fn test_create_block_without_cursor_auto_flows() {
        let existing = vec![ReportBlock::new(BlockKind::Chart)];
        let block = create_block(BlockKind::Table, &existing, None, portrait());
        assert!(!block.has_explicit_position());
        let mut all = existing;
        all.push(block);
        assert_eq!(block_layout(&all, 1).map(|l| l.y), Some(110.0));
    }

    #[test]
    fn test_create_block_without_cursor_clears_lower_earlier_block() {
        let existing = vec![
            ReportBlock::new(BlockKind::Chart).with_geometry(20.0, 100.0, 360.0, 80.0),
            ReportBlock::new(BlockKind::Text).with_geometry(20.0, 20.0, 360.0, 80.0),
        ];
        let block = create_block(BlockKind::Table, &existing, None, portrait());
        let mut all = existing;
        all.push(block);
        let layout = block_layout(&all, 2).expect("layout");
        assert_eq!(layout.y, 190.0);
        assert_eq!(layout.x, MARGIN);
        assert!(layout.fits(portrait()));
    }

    #[test]
    fn test_clamp_geometry_clamps_size_before_position() {
        let layout = BlockLayout {
            x: 20.0,
            y: 20.0,
            width: 360.0,
            height: 80.0,
        };
        let out = clamp_geometry(
            GeometryPatch {
                x: Some(-50.0),
                width: Some(900.0),
                ..GeometryPatch::default()
            },
            layout,
            portrait(),
        );
        assert_eq!(out.x, 0.0);
        assert_eq!(out.width, 400.0);
        assert!(out.fits(portrait()));

        let tiny = clamp_geometry(
            GeometryPatch {
                width: Some(1.0),
                height: Some(1.0),
                ..GeometryPatch::default()
            },
            layout,
            portrait(),
        );
        assert_eq!((tiny.width, tiny.height), (MIN_BLOCK_WIDTH, MIN_BLOCK_HEIGHT));
    }

    #[test]
    fn test_clamp_resize_pulls_back_overflowing_origin() {
        let layout = BlockLayout {
            x: 20.0,
            y: 700.0,
            width: 360.0,
            height: 80.0,
        };
        let out = clamp_resize(layout, 360.0, 80.0, Point::new(10.0, 10.0), portrait());
        assert_eq!(out.y, 520.0);
        assert!(out.fits(portrait()));
    }

    #[test]
    fn test_frame_conversion_and_containment() {
        let frame = CanvasFrame::at(100.0, 50.0, portrait()).with_border(2.0);
        assert_eq!(frame.to_canvas(Point::new(112.0, 62.0)), Point::new(10.0, 10.0));
        assert!(frame.contains(Point::new(100.0, 50.0)));
        assert!(frame.contains(Point::new(504.0, 614.0)));
        assert!(!frame.contains(Point::new(505.0, 300.0)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_orientation() -> impl Strategy<Value = PageOrientation> {
            prop_oneof![Just(PageOrientation::Portrait), Just(PageOrientation::Landscape)]
        }

        fn arb_layout() -> impl Strategy<Value = BlockLayout> {
            (-200.0f32..900.0, -200.0f32..900.0, 0.0f32..900.0, 0.0f32..900.0).prop_map(
                |(x, y, width, height)| BlockLayout {
                    x,
                    y,
                    width,
                    height,
                },
            )
        }

        proptest! {
            #[test]
            fn prop_move_always_fits(
                orientation in arb_orientation(),
                layout in arb_layout(),
                tx in -1000.0f32..1000.0,
                ty in -1000.0f32..1000.0,
            ) {
                let canvas = canvas_size(orientation);
                let out = clamp_move(layout, Point::new(tx, ty), canvas);
                prop_assert!(out.fits(canvas), "{:?} does not fit {:?}", out, canvas);
            }

            #[test]
            fn prop_resize_always_fits(
                orientation in arb_orientation(),
                layout in arb_layout(),
                dx in -1000.0f32..1000.0,
                dy in -1000.0f32..1000.0,
            ) {
                let canvas = canvas_size(orientation);
                let out = clamp_resize(layout, layout.width, layout.height, Point::new(dx, dy), canvas);
                prop_assert!(out.fits(canvas), "{:?} does not fit {:?}", out, canvas);
            }

            #[test]
            fn prop_geometry_edit_always_fits(
                orientation in arb_orientation(),
                layout in arb_layout(),
                x in proptest::option::of(-1000.0f32..1000.0),
                width in proptest::option::of(-1000.0f32..1000.0),
            ) {
                let canvas = canvas_size(orientation);
                let patch = GeometryPatch { x, y: None, width, height: None };
                let out = clamp_geometry(patch, layout, canvas);
                prop_assert!(out.fits(canvas), "{:?} does not fit {:?}", out, canvas);
            }

            #[test]
            fn prop_auto_flow_follows_previous_layout(
                explicit in prop::collection::vec(proptest::option::of((0.0f32..300.0, 0.0f32..400.0)), 1..8),
            ) {
                let blocks: Vec<ReportBlock> = explicit
                    .iter()
                    .map(|pos| {
                        let mut block = ReportBlock::new(BlockKind::Text);
                        if let Some((x, y)) = pos {
                            block.x = Some(*x);
                            block.y = Some(*y);
                        }
                        block
                    })
                    .collect();
                let layouts = layout_all(&blocks);
                for (i, block) in blocks.iter().enumerate() {
                    let single = block_layout(&blocks, i).expect("in range");
                    prop_assert_eq!(single, layouts[i]);
                    if block.has_explicit_position() {
                        prop_assert_eq!(Some(single.x), block.x);
                        prop_assert_eq!(Some(single.y), block.y);
                    } else if i == 0 {
                        prop_assert_eq!(single.y, MARGIN);
                    } else {
                        prop_assert_eq!(single.y, layouts[i - 1].y + layouts[i - 1].height + GAP);
                    }
                }
            }
        }
    }
}
