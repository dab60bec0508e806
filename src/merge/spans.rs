//! Span merging: flatten each line's spans into one annotated string.

use rayon::prelude::*;

use crate::model::{Block, BlockType, Line, MergedBlock, MergedLine, Page, Span};
use crate::render::{EmphasisConfig, RenderOptions};
use crate::tags::LineTag;

/// Merge the spans of every page, returning one block list per page.
///
/// Pages are independent here, so they are merged in parallel when
/// `options.parallel` is set. The result is in page order either way.
pub fn merge_spans(pages: &[Page], options: &RenderOptions) -> Vec<Vec<MergedBlock>> {
    if options.parallel && pages.len() > 1 {
        pages
            .par_iter()
            .map(|page| merge_page(page, options))
            .collect()
    } else {
        pages.iter().map(|page| merge_page(page, options)).collect()
    }
}

/// Merge the spans of one page.
///
/// Blocks whose lines all come out empty are dropped. A page left with no
/// blocks gets a single empty `Text` placeholder so the page boundary
/// survives into the output.
pub fn merge_page(page: &Page, options: &RenderOptions) -> Vec<MergedBlock> {
    let mut blocks: Vec<MergedBlock> = page
        .blocks
        .iter()
        .filter_map(|block| merge_block(page.number, block, options))
        .collect();

    if blocks.is_empty() {
        log::debug!("Page {}: no content, emitting placeholder", page.number);
        blocks.push(MergedBlock::placeholder(page.number, page.bbox));
    } else {
        log::debug!(
            "Page {}: merged {} of {} blocks",
            page.number,
            blocks.len(),
            page.blocks.len()
        );
    }

    blocks
}

fn merge_block(page_number: u32, block: &Block, options: &RenderOptions) -> Option<MergedBlock> {
    let lines: Vec<MergedLine> = block
        .lines
        .iter()
        .filter_map(|line| {
            let tag = options
                .positional_tags
                .then(|| LineTag::new(page_number, block.id, line.id));
            merge_line(line, tag, &options.emphasis)
        })
        .collect();

    if lines.is_empty() {
        return None;
    }

    Some(MergedBlock {
        lines,
        page: page_number,
        bbox: block.bbox,
        block_type: resolve_block_type(&block.block_type, options),
        heading_level: block.heading_level,
        id: block.id,
    })
}

/// Blocks the layout stage left unlabeled take the configured default type.
fn resolve_block_type(block_type: &BlockType, options: &RenderOptions) -> BlockType {
    match block_type {
        BlockType::Other(label) if label.trim().is_empty() => options.default_block_type.clone(),
        other => other.clone(),
    }
}

/// Merge one line's spans into a [`MergedLine`].
///
/// Returns `None` for lines without spans or whose text is blank. When `tag`
/// is given it is appended after a single space.
pub fn merge_line(
    line: &Line,
    tag: Option<LineTag>,
    emphasis: &EmphasisConfig,
) -> Option<MergedLine> {
    if line.spans.is_empty() {
        return None;
    }

    let last = line.spans.len() - 1;
    let mut text = String::new();
    let mut fonts = Vec::with_capacity(line.spans.len());

    for (i, span) in line.spans.iter().enumerate() {
        fonts.push(span.font.to_lowercase());

        // Edge spans stay bare so emphasis never straddles a line join.
        let inner = i > 0 && i < last;
        let marker = if inner && span.text.chars().count() > emphasis.min_span_chars {
            let next = lookahead_span(&line.spans, i, emphasis.lookahead_min_chars);
            emphasis_marker(span, next)
        } else {
            None
        };

        match marker {
            Some(marker) => text.push_str(&surround(&span.text, marker)),
            None => text.push_str(&span.text),
        }
    }

    if text.trim().is_empty() {
        return None;
    }

    if let Some(tag) = tag {
        text.push(' ');
        text.push_str(&tag.to_string());
    }

    Some(MergedLine {
        text,
        fonts,
        bbox: line.bbox,
    })
}

/// The first span after `index` whose trimmed text is longer than
/// `min_chars`, falling back to the last span of the line.
fn lookahead_span(spans: &[Span], index: usize, min_chars: usize) -> Option<&Span> {
    let rest = spans.get(index + 1..)?;
    rest.iter()
        .find(|s| s.text.trim().chars().count() > min_chars)
        .or_else(|| rest.last())
}

fn emphasis_marker(span: &Span, next: Option<&Span>) -> Option<&'static str> {
    if span.italic && !next.is_some_and(|n| n.italic) {
        Some("*")
    } else if span.bold && !next.is_some_and(|n| n.bold) {
        Some("**")
    } else {
        None
    }
}

/// Wrap the trimmed text in `marker`, keeping outer whitespace outside.
fn surround(text: &str, marker: &str) -> String {
    let core = text.trim();
    if core.is_empty() {
        return text.to_string();
    }
    let start = text.len() - text.trim_start().len();
    let end = start + core.len();
    format!("{}{marker}{core}{marker}{}", &text[..start], &text[end..])
}
