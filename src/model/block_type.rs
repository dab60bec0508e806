//! Block classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a layout region, as assigned by the layout stage.
///
/// Labels are matched by exact string equality. Anything outside the known
/// taxonomy is kept as [`BlockType::Other`] and formatted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    /// Body text
    #[default]
    Text,
    /// Document title
    Title,
    /// Section heading
    SectionHeader,
    /// List item
    ListItem,
    /// Table, already rendered as a Markdown table
    Table,
    /// Source code
    Code,
    /// Math formula
    Formula,
    /// Figure or table caption
    Caption,
    /// Footnote
    Footnote,
    /// Figure (text found inside a figure region)
    Figure,
    /// Unrecognized label, preserved verbatim
    Other(String),
}

impl BlockType {
    /// The label used by the layout stage for this block type.
    pub fn label(&self) -> &str {
        match self {
            BlockType::Text => "Text",
            BlockType::Title => "Title",
            BlockType::SectionHeader => "Section-header",
            BlockType::ListItem => "List-item",
            BlockType::Table => "Table",
            BlockType::Code => "Code",
            BlockType::Formula => "Formula",
            BlockType::Caption => "Caption",
            BlockType::Footnote => "Footnote",
            BlockType::Figure => "Figure",
            BlockType::Other(label) => label,
        }
    }

    /// Whether lines of this block are joined as running prose.
    pub fn is_prose(&self) -> bool {
        matches!(
            self,
            BlockType::Text
                | BlockType::ListItem
                | BlockType::Footnote
                | BlockType::Caption
                | BlockType::Figure
        )
    }

    /// Whether this block is a title or section heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockType::Title | BlockType::SectionHeader)
    }
}

impl From<&str> for BlockType {
    fn from(label: &str) -> Self {
        match label {
            "Text" => BlockType::Text,
            "Title" => BlockType::Title,
            "Section-header" => BlockType::SectionHeader,
            "List-item" => BlockType::ListItem,
            "Table" => BlockType::Table,
            "Code" => BlockType::Code,
            "Formula" => BlockType::Formula,
            "Caption" => BlockType::Caption,
            "Footnote" => BlockType::Footnote,
            "Figure" => BlockType::Figure,
            other => BlockType::Other(other.to_string()),
        }
    }
}

impl From<String> for BlockType {
    fn from(label: String) -> Self {
        BlockType::from(label.as_str())
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.label().to_string()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
