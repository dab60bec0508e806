//! Textract table cells and their Markdown rendering.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::{TextractBlock, CELL, LINE, TABLE, WORD};
use crate::error::{Error, Result};
use crate::tags::CellTag;

/// A table cell with its text already tagged.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    /// 0-based row
    pub row: usize,
    /// 0-based column
    pub col: usize,
    /// Cell words followed by the cell tag
    pub text: String,
}

/// Cell text, keyed by cell id, plus the lines swallowed by cells.
#[derive(Debug, Default)]
pub(crate) struct CellIndex {
    pub(crate) cells: HashMap<String, TableCell>,
    pub(crate) covered_lines: HashSet<String>,
    pub(crate) table_count: usize,
}

impl CellIndex {
    /// Number tables in document order and build the text of every cell.
    pub(crate) fn build(
        blocks: &[TextractBlock],
        by_id: &HashMap<&str, &TextractBlock>,
    ) -> Result<Self> {
        let mut table_of_cell: HashMap<&str, usize> = HashMap::new();
        let mut table_sizes: Vec<usize> = Vec::new();
        for table in blocks.iter().filter(|b| b.block_type == TABLE) {
            let mut size = 0;
            for id in table.children() {
                if by_id.get(id).is_some_and(|b| b.block_type == CELL) {
                    table_of_cell.insert(id, table_sizes.len());
                    size += 1;
                }
            }
            table_sizes.push(size);
        }
        let table_count = table_sizes.len();

        let mut cells = HashMap::new();
        let mut cell_words: HashSet<&str> = HashSet::new();

        for cell in blocks.iter().filter(|b| b.block_type == CELL) {
            cell_words.extend(cell.children());

            let Some(&table) = table_of_cell.get(cell.id.as_str()) else {
                log::warn!("Cell {} does not belong to any table, skipping", cell.id);
                continue;
            };

            let words: Vec<&str> = cell
                .children()
                .filter_map(|id| match by_id.get(id) {
                    Some(word) if word.block_type == WORD => word.text.as_deref(),
                    Some(_) => None,
                    None => {
                        log::warn!("Cell {} references missing block {}", cell.id, id);
                        None
                    }
                })
                .collect();

            // A table of n cells has at most n rows and n columns.
            let size = table_sizes[table];
            let row = one_based(cell.row_index, size, "RowIndex", &cell.id)?;
            let col = one_based(cell.column_index, size, "ColumnIndex", &cell.id)?;
            let tag = CellTag::new(table, row, col);

            cells.insert(
                cell.id.clone(),
                TableCell {
                    row,
                    col,
                    text: format!("{} {}", words.join(" "), tag),
                },
            );
        }

        let covered_lines = blocks
            .iter()
            .filter(|b| b.block_type == LINE)
            .filter(|line| line.children().any(|id| cell_words.contains(id)))
            .map(|line| line.id.clone())
            .collect();

        Ok(Self {
            cells,
            covered_lines,
            table_count,
        })
    }

    /// Cells of `table`, in relationship order.
    pub(crate) fn cells_of<'a>(&'a self, table: &'a TextractBlock) -> Vec<&'a TableCell> {
        table
            .children()
            .filter_map(|id| self.cells.get(id))
            .collect()
    }
}

/// Convert a 1-based Textract index to 0-based, rejecting anything outside
/// `1..=max`.
fn one_based(index: Option<usize>, max: usize, field: &str, id: &str) -> Result<usize> {
    match index {
        Some(i) if (1..=max).contains(&i) => Ok(i - 1),
        Some(i) => Err(Error::InvalidInput(format!(
            "cell {} has {} {} outside 1..={}",
            id, field, i, max
        ))),
        None => Err(Error::InvalidInput(format!(
            "cell {} has no {}",
            id, field
        ))),
    }
}

/// Render cells as a GitHub Markdown table.
///
/// The first row is the header. Rows and columns that hold no cell at all
/// are left out; missing cells inside the table are left empty.
pub fn render_markdown_table(cells: &[&TableCell]) -> String {
    let mut rows: BTreeMap<usize, BTreeMap<usize, String>> = BTreeMap::new();
    let mut cols: BTreeSet<usize> = BTreeSet::new();
    for cell in cells {
        rows.entry(cell.row)
            .or_default()
            .insert(cell.col, escape_cell(&cell.text));
        cols.insert(cell.col);
    }

    let mut output = String::new();
    for (i, row) in rows.values().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push('|');
        for col in &cols {
            let content = row.get(col).map_or("", String::as_str);
            output.push_str(&format!(" {} |", content));
        }

        // Separator after header row
        if i == 0 {
            output.push_str("\n|");
            for _ in 0..cols.len() {
                output.push_str(" --- |");
            }
        }
    }

    output
}

fn escape_cell(text: &str) -> String {
    text.trim().replace('\n', " ").replace('|', "\\|")
}
