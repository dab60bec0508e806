//! AWS Textract input.
//!
//! Converts a Textract `AnalyzeDocument` response into the crate's page
//! model. `LINE` blocks become one-line `Text` blocks and `TABLE` blocks
//! become a single `Table` block holding a Markdown table whose cells end in
//! `[[t{table}_{row}_{col}]]` tags. Lines whose words sit inside a table cell
//! are dropped so their text only appears once.

mod table;

pub use table::{render_markdown_table, TableCell};

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{BBox, Block, BlockType, Line, Page, Span};
use table::CellIndex;

/// Page width used when the caller does not know the real size.
pub const DEFAULT_PAGE_WIDTH: f32 = 1000.0;

/// Page height used when the caller does not know the real size.
pub const DEFAULT_PAGE_HEIGHT: f32 = 1000.0;

const LINE: &str = "LINE";
const WORD: &str = "WORD";
const TABLE: &str = "TABLE";
const CELL: &str = "CELL";
const CHILD: &str = "CHILD";
const LAYOUT_PREFIX: &str = "LAYOUT";

/// Font name given to Textract text, which carries no font information.
const TEXTRACT_FONT: &str = "default";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TextractDocument {
    blocks: Vec<TextractBlock>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct TextractBlock {
    id: String,
    block_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    relationships: Vec<Relationship>,
    #[serde(default)]
    row_index: Option<usize>,
    #[serde(default)]
    column_index: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Geometry {
    bounding_box: BoundingBox,
}

/// Normalized box, every value in `0..=1` of the page size.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BoundingBox {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct Relationship {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Ids", default)]
    ids: Vec<String>,
}

impl TextractBlock {
    fn children(&self) -> impl Iterator<Item = &str> {
        self.relationships
            .iter()
            .filter(|r| r.kind == CHILD)
            .flat_map(|r| r.ids.iter().map(String::as_str))
    }

    fn page_number(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    fn bbox(&self, width: f32, height: f32) -> Result<BBox> {
        let geometry = self.geometry.as_ref().ok_or_else(|| {
            Error::InvalidInput(format!(
                "{} block {} has no Geometry",
                self.block_type, self.id
            ))
        })?;
        Ok(convert_bbox(&geometry.bounding_box, width, height))
    }
}

fn convert_bbox(b: &BoundingBox, width: f32, height: f32) -> BBox {
    let x0 = b.left * width;
    let y0 = b.top * height;
    BBox::new(x0, y0, x0 + b.width * width, y0 + b.height * height)
}

/// Convert parsed Textract JSON into pages.
pub fn parse_textract_json(
    value: &serde_json::Value,
    page_width: f32,
    page_height: f32,
) -> Result<Vec<Page>> {
    let document = TextractDocument::deserialize(value)?;
    build_pages(&document, page_width, page_height)
}

/// Parse Textract JSON text into pages.
pub fn parse_textract_str(json: &str, page_width: f32, page_height: f32) -> Result<Vec<Page>> {
    let document: TextractDocument = serde_json::from_str(json)?;
    build_pages(&document, page_width, page_height)
}

/// Read a Textract JSON file into pages.
pub fn parse_textract_file<P: AsRef<Path>>(
    path: P,
    page_width: f32,
    page_height: f32,
) -> Result<Vec<Page>> {
    let json = std::fs::read_to_string(path)?;
    parse_textract_str(&json, page_width, page_height)
}

fn build_pages(document: &TextractDocument, width: f32, height: f32) -> Result<Vec<Page>> {
    let by_id: HashMap<&str, &TextractBlock> = document
        .blocks
        .iter()
        .map(|b| (b.id.as_str(), b))
        .collect();
    let index = CellIndex::build(&document.blocks, &by_id)?;

    let mut pages: BTreeMap<u32, Vec<Block>> = BTreeMap::new();
    for block in &document.blocks {
        let number = block.page_number();
        let kind = block.block_type.as_str();

        if kind.starts_with(LAYOUT_PREFIX) {
            pages.entry(number).or_default();
        } else if kind == LINE && !index.covered_lines.contains(&block.id) {
            let text = block.text.clone().unwrap_or_default();
            let converted = single_span_block(BlockType::Text, text, block.bbox(width, height)?);
            pages.entry(number).or_default().push(converted);
        } else if kind == TABLE {
            let text = render_markdown_table(&index.cells_of(block));
            let converted = single_span_block(BlockType::Table, text, block.bbox(width, height)?);
            pages.entry(number).or_default().push(converted);
        }
    }

    log::debug!(
        "Textract: {} blocks into {} pages ({} tables, {} lines inside cells)",
        document.blocks.len(),
        pages.len(),
        index.table_count,
        index.covered_lines.len()
    );

    let page_box = BBox::new(0.0, 0.0, width, height);
    Ok(pages
        .into_iter()
        .map(|(number, blocks)| {
            let mut page = Page::new(number, page_box);
            for (id, block) in reorder_by_position(blocks).into_iter().enumerate() {
                page.add_block(block.with_id(id as u32));
            }
            page
        })
        .collect())
}

fn single_span_block(block_type: BlockType, text: String, bbox: BBox) -> Block {
    let span = Span::new(text, bbox).with_font(TEXTRACT_FONT);
    Block::new(block_type, bbox).with_line(Line::new(bbox, vec![span]).with_id(0))
}

/// Sort text blocks top to bottom and slot each table in before the first
/// text block that starts below it. Tables keep their document order.
fn reorder_by_position(blocks: Vec<Block>) -> Vec<Block> {
    let total = blocks.len();
    let (tables, mut text): (Vec<Block>, Vec<Block>) = blocks
        .into_iter()
        .partition(|b| b.block_type == BlockType::Table);
    text.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

    let mut tables = tables.into_iter().peekable();
    let mut ordered = Vec::with_capacity(total);
    for block in text {
        while let Some(table) = tables.next_if(|t| t.bbox.y0 < block.bbox.y0) {
            ordered.push(table);
        }
        ordered.push(block);
    }
    ordered.extend(tables);
    ordered
}
