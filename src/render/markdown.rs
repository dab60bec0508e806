//! Markdown assembly of finished blocks into one document string.

use crate::model::{BlockType, FullyMergedBlock};

use super::RenderOptions;

/// Concatenate finished blocks into one Markdown document.
pub fn assemble(blocks: &[FullyMergedBlock], options: &RenderOptions) -> String {
    MarkdownAssembler::new(options).assemble(blocks)
}

/// Joins [`FullyMergedBlock`]s with block separators and page markers.
pub struct MarkdownAssembler<'a> {
    options: &'a RenderOptions,
}

impl<'a> MarkdownAssembler<'a> {
    /// Create a new assembler.
    pub fn new(options: &'a RenderOptions) -> Self {
        Self { options }
    }

    /// Assemble the blocks in order.
    pub fn assemble(&self, blocks: &[FullyMergedBlock]) -> String {
        let capacity = blocks.iter().map(|b| b.text.len() + 2).sum();
        let mut output = String::with_capacity(capacity);
        let mut previous: Option<&FullyMergedBlock> = None;

        for block in blocks {
            if block.page_start {
                self.push_page_marker(&mut output, block.page);
            } else if let Some(prev) = previous {
                output.push_str(block_separator(&prev.block_type));
                output.push_str(&block.text);
            } else {
                output.push_str(&block.text);
            }
            previous = Some(block);
        }

        output
    }

    fn push_page_marker(&self, output: &mut String, page: Option<u32>) {
        output.push_str("\n\n{");
        if let Some(page) = page {
            output.push_str(&page.to_string());
        }
        output.push('}');
        output.push_str(&self.options.page_separator);
    }
}

/// Separator written before a block, chosen by the type of the block before it.
pub fn block_separator(previous: &BlockType) -> &'static str {
    if *previous == BlockType::Text {
        "\n\n"
    } else {
        "\n"
    }
}
