//! Intermediate and output types produced during reconstruction.

use super::{BBox, BlockType};
use serde::{Deserialize, Serialize};

/// One source line with its spans flattened into annotated text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedLine {
    /// Line text with inline emphasis and the trailing positional tag
    pub text: String,

    /// Lowercased font names of the spans, in order
    pub fonts: Vec<String>,

    /// Bounding box of the source line
    pub bbox: BBox,
}

/// Merged lines of one source block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedBlock {
    /// Lines in source order
    pub lines: Vec<MergedLine>,

    /// Page number the block came from
    pub page: u32,

    /// Block bounding box (the page box for placeholders)
    pub bbox: BBox,

    /// Block classification
    pub block_type: BlockType,

    /// Heading level of the source block
    pub heading_level: Option<u32>,

    /// Source block identifier
    pub id: Option<u32>,
}

impl MergedBlock {
    /// Empty `Text` block standing in for a page that produced no content.
    pub fn placeholder(page: u32, bbox: BBox) -> Self {
        Self {
            lines: Vec::new(),
            page,
            bbox,
            block_type: BlockType::Text,
            heading_level: None,
            id: None,
        }
    }
}

/// A fully joined and formatted logical block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullyMergedBlock {
    /// Final Markdown text of the block
    pub text: String,

    /// Block classification
    pub block_type: BlockType,

    /// Set on the empty marker emitted at each page boundary
    pub page_start: bool,

    /// Page number
    pub page: Option<u32>,

    /// Identifier of the first source block merged into this one
    pub block_id: Option<u32>,
}

impl FullyMergedBlock {
    /// Page-boundary marker for `page`.
    pub fn page_marker(page: u32) -> Self {
        Self {
            text: String::new(),
            block_type: BlockType::Text,
            page_start: true,
            page: Some(page),
            block_id: None,
        }
    }

    /// Whether the block carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
