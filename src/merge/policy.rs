//! Line-joining policy: how the next line attaches to the text so far.

use super::script::{
    is_hyphen, is_letter_or_digit, is_sentence_terminator, is_soft_continuation,
    is_word_continuing,
};
use crate::model::{BBox, BlockType};
use crate::tags::split_trailing_tags;

/// The join chosen between two consecutive lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Drop the trailing hyphen and glue the word back together
    Dehyphenate,
    /// Single space; the sentence carries on
    Space,
    /// Single newline; keep the lines distinct
    Newline,
    /// Blank line; start a new paragraph
    BlankLine,
}

/// Whether `current` looks like a visual wrap of `previous`: same height,
/// same left edge, and a vertical gap below `max_gap` in both directions.
pub fn is_geometric_continuation(previous: Option<&BBox>, current: &BBox, max_gap: f32) -> bool {
    let Some(previous) = previous else {
        return false;
    };
    let gap = (current.y0 - previous.y1)
        .abs()
        .min((current.y1 - previous.y0).abs());
    current.height() == previous.height() && current.x0 == previous.x0 && gap < max_gap
}

/// Decide how `next` joins onto `previous`.
///
/// Punctuation tests look at `previous` with any trailing positional tags set
/// aside, so tagged and untagged text join the same way.
pub fn join_kind(
    previous: &str,
    next: &str,
    block_type: &BlockType,
    continuation: bool,
) -> JoinKind {
    let (prose, _) = split_trailing_tags(previous);

    if ends_with_break_hyphen(prose) && starts_word_continuing(next) {
        return JoinKind::Dehyphenate;
    }

    if block_type.is_heading() {
        return JoinKind::Space;
    }
    if *block_type == BlockType::Formula {
        return JoinKind::Newline;
    }

    if block_type.is_prose() && ends_mid_sentence(prose) && starts_with_letter(next) {
        JoinKind::Space
    } else if continuation {
        JoinKind::Space
    } else if block_type.is_prose() && ends_sentence(prose) {
        JoinKind::BlankLine
    } else if *block_type == BlockType::Table {
        JoinKind::BlankLine
    } else {
        JoinKind::Newline
    }
}

/// Append `next` to `text` using `kind`.
pub fn append_line(text: &mut String, next: &str, kind: JoinKind) {
    match kind {
        JoinKind::Dehyphenate => {
            let (prose, tail) = split_trailing_tags(text);
            let tail = tail.trim().to_string();
            let body = strip_one_trailing_ws(prose);
            let hyphen_len = body.chars().next_back().map_or(0, char::len_utf8);
            let stem_len = body[..body.len() - hyphen_len].trim_end().len();
            text.truncate(stem_len);

            // The carried tag goes after the rejoined word, never inside it.
            let next = next.trim_start();
            let word_end = continuation_word_len(next);
            text.push_str(&next[..word_end]);
            if !tail.is_empty() {
                text.push(' ');
                text.push_str(&tail);
            }
            text.push_str(&next[word_end..]);
        }
        JoinKind::Space => {
            let keep = text.trim_end().len();
            text.truncate(keep);
            text.push(' ');
            text.push_str(next.trim_start());
        }
        JoinKind::Newline => {
            text.push('\n');
            text.push_str(next);
        }
        JoinKind::BlankLine => {
            text.push_str("\n\n");
            text.push_str(next);
        }
    }
}

/// Join two lines under the policy and return the combined text.
pub fn join_lines(previous: &str, next: &str, block_type: &BlockType, continuation: bool) -> String {
    let mut text = previous.to_string();
    append_line(&mut text, next, join_kind(previous, next, block_type, continuation));
    text
}

/// Byte length of the word fragment that completes a hyphenated word.
fn continuation_word_len(s: &str) -> usize {
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    s[..end].find("[[").unwrap_or(end)
}

fn strip_one_trailing_ws(s: &str) -> &str {
    match s.chars().next_back() {
        Some(c) if c.is_whitespace() => &s[..s.len() - c.len_utf8()],
        _ => s,
    }
}

fn strip_one_leading_ws(s: &str) -> &str {
    match s.chars().next() {
        Some(c) if c.is_whitespace() => &s[c.len_utf8()..],
        _ => s,
    }
}

fn ends_with_break_hyphen(s: &str) -> bool {
    let mut rev = strip_one_trailing_ws(s).chars().rev();
    matches!(
        (rev.next(), rev.next()),
        (Some(h), Some(c)) if is_hyphen(h) && is_word_continuing(c)
    )
}

fn ends_mid_sentence(s: &str) -> bool {
    let mut rev = strip_one_trailing_ws(s).chars().rev();
    match rev.next() {
        Some(c) if is_word_continuing(c) => true,
        Some(c) if is_soft_continuation(c) => rev.next().is_some_and(is_word_continuing),
        _ => false,
    }
}

fn ends_sentence(s: &str) -> bool {
    strip_one_trailing_ws(s)
        .chars()
        .next_back()
        .is_some_and(is_sentence_terminator)
}

fn starts_word_continuing(s: &str) -> bool {
    strip_one_leading_ws(s)
        .chars()
        .next()
        .is_some_and(is_word_continuing)
}

fn starts_with_letter(s: &str) -> bool {
    strip_one_leading_ws(s)
        .chars()
        .next()
        .is_some_and(is_letter_or_digit)
}
