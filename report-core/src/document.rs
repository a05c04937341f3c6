//! The report document under edit.

use serde::{Deserialize, Serialize};

use crate::block::{BlockId, BlockKind, BlockPatch, ReportBlock};
use crate::geometry::{layout_all, BlockLayout};
use crate::{ReportError, ReportResult};

/// Default report title for a new session.
pub const DEFAULT_TITLE: &str = "Roster Report";

/// Title, subtitle and ordered blocks of a report.
///
/// Block order is both the auto-flow stacking order and the z-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportBuilderValue {
    /// Report title.
    #[serde(default)]
    pub title: String,
    /// Optional subtitle or description.
    #[serde(default)]
    pub subtitle: String,
    /// Blocks in stacking order.
    #[serde(default)]
    pub blocks: Vec<ReportBlock>,
}

impl ReportBuilderValue {
    /// Create an empty document with a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: String::new(),
            blocks: Vec::new(),
        }
    }

    /// Default layout: chart, table and summary stacked by auto-flow.
    #[must_use]
    pub fn default_layout() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subtitle: String::new(),
            blocks: vec![
                ReportBlock::new(BlockKind::Chart),
                ReportBlock::new(BlockKind::Table),
                ReportBlock::new(BlockKind::Summary),
            ],
        }
    }

    /// Index of the block with `id`.
    #[must_use]
    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    /// Block with `id`.
    #[must_use]
    pub fn block(&self, id: &BlockId) -> Option<&ReportBlock> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    /// Resolved layouts of every block, in order.
    #[must_use]
    pub fn layouts(&self) -> Vec<BlockLayout> {
        layout_all(&self.blocks)
    }

    /// Copy of this document with `block` appended.
    #[must_use]
    pub fn with_block_added(&self, block: ReportBlock) -> Self {
        let mut next = self.clone();
        next.blocks.push(block);
        next
    }

    /// Copy of this document without the block `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is not found.
    pub fn with_block_removed(&self, id: &BlockId) -> ReportResult<Self> {
        let index = self
            .index_of(id)
            .ok_or_else(|| ReportError::BlockNotFound(id.to_string()))?;
        let mut next = self.clone();
        next.blocks.remove(index);
        Ok(next)
    }

    /// Copy of this document with `patch` merged into block `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is not found.
    pub fn with_block_updated(&self, id: &BlockId, patch: &BlockPatch) -> ReportResult<Self> {
        let index = self
            .index_of(id)
            .ok_or_else(|| ReportError::BlockNotFound(id.to_string()))?;
        let mut next = self.clone();
        next.blocks[index].apply(patch);
        Ok(next)
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> ReportResult<String> {
        serde_json::to_string_pretty(self).map_err(ReportError::Serialization)
    }

    /// Deserialize a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> ReportResult<Self> {
        serde_json::from_str(json).map_err(ReportError::Serialization)
    }
}
