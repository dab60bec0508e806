//! Reconstruction result with blocks and statistics.

use crate::model::{BlockType, FullyMergedBlock};
use serde::{Deserialize, Serialize};

/// Result of rebuilding a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reconstruction {
    /// The assembled Markdown document
    pub markdown: String,

    /// Finished blocks in document order
    pub blocks: Vec<FullyMergedBlock>,

    /// Reconstruction statistics
    pub stats: ReconstructionStats,
}

impl Reconstruction {
    /// Create a new reconstruction.
    pub fn new(markdown: String, blocks: Vec<FullyMergedBlock>, stats: ReconstructionStats) -> Self {
        Self {
            markdown,
            blocks,
            stats,
        }
    }

    /// Blocks whose identifier matches `id`.
    pub fn blocks_with_id(&self, id: u32) -> impl Iterator<Item = &FullyMergedBlock> {
        self.blocks.iter().filter(move |b| b.block_id == Some(id))
    }

    /// Content blocks, without page markers.
    pub fn content_blocks(&self) -> impl Iterator<Item = &FullyMergedBlock> {
        self.blocks.iter().filter(|b| !b.page_start)
    }
}

/// Statistics collected while rebuilding a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionStats {
    /// Number of input pages
    pub page_count: u32,

    /// Number of finished content blocks
    pub block_count: u32,

    /// Number of title and section header blocks
    pub heading_count: u32,

    /// Number of table blocks
    pub table_count: u32,

    /// Number of list item blocks
    pub list_item_count: u32,

    /// Number of formula blocks
    pub formula_count: u32,

    /// Number of code blocks
    pub code_count: u32,

    /// Number of page markers
    pub page_marker_count: u32,

    /// Number of lines that survived span merging
    pub lines_merged: u32,

    /// Number of input lines dropped as empty
    pub lines_dropped: u32,

    /// Number of line joins performed
    pub line_joins: u32,

    /// Number of joins that removed a line-break hyphen
    pub dehyphenations: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ReconstructionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished block by kind.
    pub fn add_block(&mut self, block: &FullyMergedBlock) {
        if block.page_start {
            self.page_marker_count += 1;
            return;
        }

        self.block_count += 1;
        if block.block_type.is_heading() {
            self.heading_count += 1;
            return;
        }
        match block.block_type {
            BlockType::Table => self.table_count += 1,
            BlockType::ListItem => self.list_item_count += 1,
            BlockType::Formula => self.formula_count += 1,
            BlockType::Code => self.code_count += 1,
            _ => {}
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
