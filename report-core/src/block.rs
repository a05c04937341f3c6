//! Report blocks - the typed content placed on the canvas.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ReportError;

/// Unique identifier for a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generate a fresh id for a block of the given kind.
    #[must_use]
    pub fn generate(kind: BlockKind) -> Self {
        Self(format!("block-{}-{}", kind.as_str(), Uuid::new_v4().simple()))
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The type of content a block renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Bar or pie chart of the current category buckets.
    Chart,
    /// Excerpt of the roster table.
    Table,
    /// Generation date and total row count.
    Summary,
    /// Free text.
    Text,
}

impl BlockKind {
    /// All block kinds in palette order.
    pub const ALL: [BlockKind; 4] = [Self::Chart, Self::Table, Self::Summary, Self::Text];

    /// Lowercase identifier used in ids and JSON.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chart => "chart",
            Self::Table => "table",
            Self::Summary => "summary",
            Self::Text => "text",
        }
    }

    /// Label shown in the asset palette.
    #[must_use]
    pub fn palette_label(self) -> &'static str {
        match self {
            Self::Chart => "Chart summary",
            Self::Table => "Table",
            Self::Summary => "Report info",
            Self::Text => "Text block",
        }
    }
}

impl FromStr for BlockKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chart" => Ok(Self::Chart),
            "table" => Ok(Self::Table),
            "summary" => Ok(Self::Summary),
            "text" => Ok(Self::Text),
            _ => Err(ReportError::InvalidValue {
                field: "block kind",
                value: s.to_string(),
            }),
        }
    }
}

/// A block on the report canvas.
///
/// Geometry is optional: a block with both `x` and `y` is placed explicitly,
/// anything else auto-flows below its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBlock {
    /// Unique identifier.
    pub id: BlockId,
    /// Content type.
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// Free text (text blocks only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// X position in canvas pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Y position in canvas pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Width in canvas pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Height in canvas pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

impl ReportBlock {
    /// Create an auto-flow block of the given kind with a fresh id.
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: BlockId::generate(kind),
            kind,
            text: (kind == BlockKind::Text).then(String::new),
            x: None,
            y: None,
            width: None,
            height: None,
        }
    }

    /// Replace the generated id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<BlockId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set explicit position and size.
    #[must_use]
    pub fn with_geometry(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Whether the block is placed explicitly rather than auto-flowed.
    #[must_use]
    pub fn has_explicit_position(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    /// Merge a partial update into this block.
    pub fn apply(&mut self, patch: &BlockPatch) {
        if let Some(text) = &patch.text {
            self.text = Some(text.clone());
        }
        if patch.x.is_some() {
            self.x = patch.x;
        }
        if patch.y.is_some() {
            self.y = patch.y;
        }
        if patch.width.is_some() {
            self.width = patch.width;
        }
        if patch.height.is_some() {
            self.height = patch.height;
        }
    }
}

/// Partial update for a block. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockPatch {
    /// New text.
    pub text: Option<String>,
    /// New X position.
    pub x: Option<f32>,
    /// New Y position.
    pub y: Option<f32>,
    /// New width.
    pub width: Option<f32>,
    /// New height.
    pub height: Option<f32>,
}

impl BlockPatch {
    /// Patch that only moves the block.
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that only resizes the block.
    #[must_use]
    pub fn size(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Patch that only replaces the text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
