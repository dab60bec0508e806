//! Input layout types.

use super::BlockType;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in layout units.
///
/// Origin is the top-left corner of the page and `y` grows downward.
/// Serialized as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

impl From<[f32; 4]> for BBox {
    fn from([x0, y0, x1, y1]: [f32; 4]) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

/// A single page of layout output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number as assigned by the layout stage
    pub number: u32,

    /// Page bounding box
    pub bbox: BBox,

    /// Blocks in reading order
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32, bbox: BBox) -> Self {
        Self {
            number,
            bbox,
            blocks: Vec::new(),
        }
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Builder form of [`Page::add_block`].
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Total number of lines across all blocks.
    pub fn line_count(&self) -> usize {
        self.blocks.iter().map(|b| b.lines.len()).sum()
    }

    /// Total number of spans across all blocks.
    pub fn span_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|b| &b.lines)
            .map(|l| l.spans.len())
            .sum()
    }
}

/// A classified layout region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Region bounding box
    pub bbox: BBox,

    /// Classification assigned by the layout stage
    pub block_type: BlockType,

    /// Heading level, only meaningful for section headers
    #[serde(default)]
    pub heading_level: Option<u32>,

    /// Stable identifier
    #[serde(default)]
    pub id: Option<u32>,

    /// Lines in reading order
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Block {
    /// Create an empty block.
    pub fn new(block_type: BlockType, bbox: BBox) -> Self {
        Self {
            bbox,
            block_type,
            heading_level: None,
            id: None,
            lines: Vec::new(),
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the heading level.
    pub fn with_heading_level(mut self, level: u32) -> Self {
        self.heading_level = Some(level);
        self
    }

    /// Append a line.
    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }
}

/// A line of text made of styled spans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Line bounding box
    pub bbox: BBox,

    /// Spans from left to right
    #[serde(default)]
    pub spans: Vec<Span>,

    /// Stable identifier
    #[serde(default)]
    pub id: Option<u32>,
}

impl Line {
    /// Create a line from its spans.
    pub fn new(bbox: BBox, spans: Vec<Span>) -> Self {
        Self {
            bbox,
            spans,
            id: None,
        }
    }

    /// Create a line holding a single plain span covering the whole line.
    pub fn plain(text: impl Into<String>, bbox: BBox) -> Self {
        Self::new(bbox, vec![Span::new(text, bbox)])
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }
}

/// The smallest unit of styled text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    /// Text content
    pub text: String,

    /// Span bounding box
    pub bbox: BBox,

    /// Font name
    #[serde(default)]
    pub font: String,

    /// Bold weight
    #[serde(default)]
    pub bold: bool,

    /// Italic style
    #[serde(default)]
    pub italic: bool,
}

impl Span {
    /// Create an unstyled span.
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
            font: String::new(),
            bold: false,
            italic: false,
        }
    }

    /// Mark as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Mark as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Set the font name.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let b = BBox::new(10.0, 20.0, 110.0, 32.0);
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 12.0);
    }

    #[test]
    fn test_bbox_serializes_as_array() {
        let b = BBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(serde_json::to_string(&b).unwrap(), "[1.0,2.0,3.0,4.0]");
        let back: BBox = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn test_page_counts() {
        let bbox = BBox::new(0.0, 0.0, 100.0, 10.0);
        let page = Page::new(1, BBox::new(0.0, 0.0, 612.0, 792.0)).with_block(
            Block::new(BlockType::Text, bbox)
                .with_line(Line::plain("one", bbox))
                .with_line(Line::new(bbox, vec![])),
        );
        assert_eq!(page.line_count(), 2);
        assert_eq!(page.span_count(), 1);
    }

    #[test]
    fn test_deserialize_minimal_page() {
        let json = r#"{
            "number": 3,
            "bbox": [0, 0, 612, 792],
            "blocks": [{
                "bbox": [0, 0, 100, 10],
                "block_type": "Section-header",
                "heading_level": 2,
                "lines": [{"bbox": [0, 0, 100, 10], "spans": [{"text": "Intro", "bbox": [0, 0, 100, 10]}]}]
            }]
        }"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.number, 3);
        let block = &page.blocks[0];
        assert_eq!(block.block_type, BlockType::SectionHeader);
        assert_eq!(block.heading_level, Some(2));
        assert_eq!(block.id, None);
        assert!(!block.lines[0].spans[0].bold);
    }
}
