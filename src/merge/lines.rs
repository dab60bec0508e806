//! Line joining across the whole document.
//!
//! Blocks are folded in document order through a [`JoinState`]. Each step
//! consumes the state and returns the next one, so any intermediate state can
//! be built by hand and stepped in isolation.

use super::format::format_block;
use super::policy::{append_line, is_geometric_continuation, join_kind, JoinKind};
use crate::model::{BBox, BlockType, FullyMergedBlock, MergedBlock};
use crate::render::RenderOptions;

/// Accumulator carried from one block to the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinState {
    /// Text joined so far for the open block
    pub text: String,

    /// Type of the most recent block
    pub block_type: Option<BlockType>,

    /// Heading level of the most recent block
    pub heading_level: Option<u32>,

    /// Box of the most recent line, across block and page boundaries
    pub previous_line: Option<BBox>,

    /// Page where the open text started
    pub page: Option<u32>,

    /// Identifier of the block that started the open text
    pub block_id: Option<u32>,

    /// Blocks emitted so far
    pub emitted: Vec<FullyMergedBlock>,

    /// Number of line joins performed
    pub joins: usize,

    /// Number of joins that removed a line-break hyphen
    pub dehyphenations: usize,
}

impl JoinState {
    /// Start of a new page: with pagination on, close the open text and emit
    /// a page marker. Block type and heading level carry over.
    pub fn start_page(self, page: &[MergedBlock], options: &RenderOptions) -> Self {
        if !options.paginate_output {
            return self;
        }
        let mut state = self.flush(options);
        if let Some(first) = page.first() {
            log::debug!("Page marker for page {}", first.page);
            state.emitted.push(FullyMergedBlock::page_marker(first.page));
        }
        state
    }

    /// Fold one merged block into the state.
    ///
    /// A change of block type, or of a previously set heading level, closes
    /// the open text first.
    pub fn push_block(self, block: &MergedBlock, options: &RenderOptions) -> Self {
        let type_changed = self
            .block_type
            .as_ref()
            .is_some_and(|prev| *prev != block.block_type);
        let level_changed =
            self.heading_level.is_some() && self.heading_level != block.heading_level;

        let mut state = if type_changed || level_changed {
            self.flush(options)
        } else {
            self
        };

        state.block_type = Some(block.block_type.clone());
        state.heading_level = block.heading_level;

        for line in &block.lines {
            let continuation = is_geometric_continuation(
                state.previous_line.as_ref(),
                &line.bbox,
                options.max_block_gap,
            );
            state.previous_line = Some(line.bbox);

            if state.text.is_empty() {
                state.text.push_str(&line.text);
                state.page = Some(block.page);
                state.block_id = block.id;
                continue;
            }

            let kind = join_kind(&state.text, &line.text, &block.block_type, continuation);
            log::trace!(
                "Joining line on page {} with {:?} (continuation: {})",
                block.page,
                kind,
                continuation
            );
            append_line(&mut state.text, &line.text, kind);
            state.joins += 1;
            if kind == JoinKind::Dehyphenate {
                state.dehyphenations += 1;
            }
        }

        state
    }

    /// Format and emit the open text, if any.
    pub fn flush(mut self, options: &RenderOptions) -> Self {
        if self.text.is_empty() {
            return self;
        }

        let block_type = self
            .block_type
            .clone()
            .unwrap_or_else(|| options.default_block_type.clone());
        let text = format_block(&self.text, &block_type, self.heading_level);
        log::debug!(
            "Flushing {} block ({} chars) from page {:?}",
            block_type,
            text.len(),
            self.page
        );

        self.emitted.push(FullyMergedBlock {
            text,
            block_type,
            page_start: false,
            page: self.page.take(),
            block_id: self.block_id.take(),
        });
        self.text.clear();
        self
    }

    /// Close the document: flush and drop blocks left blank.
    pub fn finish(self, options: &RenderOptions) -> JoinSummary {
        let state = self.flush(options);
        let mut blocks = state.emitted;
        blocks.retain(|b| b.page_start || !b.is_blank());
        JoinSummary {
            blocks,
            joins: state.joins,
            dehyphenations: state.dehyphenations,
        }
    }
}

/// Result of joining a whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSummary {
    /// Final blocks in document order
    pub blocks: Vec<FullyMergedBlock>,
    /// Number of line joins performed
    pub joins: usize,
    /// Number of joins that removed a line-break hyphen
    pub dehyphenations: usize,
}

/// Join the merged blocks of every page into final blocks.
pub fn join_blocks(pages: &[Vec<MergedBlock>], options: &RenderOptions) -> JoinSummary {
    pages
        .iter()
        .fold(JoinState::default(), |state, page| {
            let state = state.start_page(page, options);
            page.iter()
                .fold(state, |state, block| state.push_block(block, options))
        })
        .finish(options)
}

/// Join the merged blocks of every page, returning only the final blocks.
pub fn merge_lines(pages: &[Vec<MergedBlock>], options: &RenderOptions) -> Vec<FullyMergedBlock> {
    join_blocks(pages, options).blocks
}
