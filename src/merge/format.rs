//! Block-type formatting applied when a joined block is flushed.

use crate::model::BlockType;
use crate::tags::{map_outside_tags, split_trailing_tags};

/// Heading level used when a section header has none, or an unusable one.
pub const DEFAULT_HEADING_LEVEL: usize = 2;

/// Turn the joined text of a block into its final Markdown form.
pub fn format_block(text: &str, block_type: &BlockType, heading_level: Option<u32>) -> String {
    match block_type {
        BlockType::SectionHeader => {
            if text.starts_with('#') {
                return text.to_string();
            }
            let hashes = "#".repeat(resolve_heading_level(heading_level));
            format!("\n{} {}\n", hashes, title_case(text.trim()))
        }
        BlockType::Title => {
            if text.starts_with('#') {
                return text.to_string();
            }
            format!("# {}\n", title_case(text.trim()))
        }
        BlockType::Table => format!("\n{}\n", text.trim_matches('\n')),
        BlockType::ListItem => format!("{}\n", escape_markdown(text.trim_end())),
        BlockType::Code => format!("\n```\n{}\n```\n", text),
        BlockType::Text => escape_markdown(text),
        BlockType::Formula => {
            let trimmed = text.trim();
            if is_display_math(trimmed) {
                format!("\n{}\n", trimmed)
            } else {
                text.to_string()
            }
        }
        BlockType::Caption => format!("\n{}\n", escape_markdown(text)),
        BlockType::Footnote | BlockType::Figure | BlockType::Other(_) => text.to_string(),
    }
}

fn resolve_heading_level(level: Option<u32>) -> usize {
    match level {
        Some(level @ 1..=6) => level as usize,
        Some(level) => {
            log::warn!(
                "Heading level {} out of range, using {}",
                level,
                DEFAULT_HEADING_LEVEL
            );
            DEFAULT_HEADING_LEVEL
        }
        None => DEFAULT_HEADING_LEVEL,
    }
}

fn is_display_math(text: &str) -> bool {
    let (math, _) = split_trailing_tags(text);
    let math = math.trim();
    math.starts_with("$$") && math.ends_with("$$")
}

/// Escape `#` so OCR text cannot turn into a heading.
///
/// Already escaped `\#` is left alone, so escaping is idempotent. Positional
/// tags are copied through untouched.
pub fn escape_markdown(text: &str) -> String {
    map_outside_tags(text, |segment| {
        let mut out = String::with_capacity(segment.len());
        let mut prev = None;
        for c in segment.chars() {
            if c == '#' && prev != Some('\\') {
                out.push('\\');
            }
            out.push(c);
            prev = Some(c);
        }
        out
    })
}

/// Capitalize the first letter of every word and lowercase the rest.
///
/// Digits and apostrophes count as part of a word, so `1st` and `don't`
/// come out unchanged. Positional tags are copied through untouched.
pub fn title_case(text: &str) -> String {
    map_outside_tags(text, |segment| {
        let mut out = String::with_capacity(segment.len());
        let mut in_word = false;
        for c in segment.chars() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = c.is_alphanumeric() || c == '\'' || c == '’';
        }
        out
    })
}
