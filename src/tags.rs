//! Positional tags embedded in reconstructed text.
//!
//! Every merged line ends with a tag such as `[[3_12_4]]` (page, block, line)
//! and table cells produced by the Textract adapter carry `[[t0_2_1]]`
//! (table, row, column). Downstream tools use these to map output text back
//! to source geometry, so text transforms must leave them untouched.
//!
//! ```
//! use unlayout::tags::{find_tags, strip_tags, LineTag, Tag};
//!
//! let text = "Hello world [[1_0_3]]";
//! let found = find_tags(text);
//! assert_eq!(found[0].tag, Tag::Line(LineTag::new(1, Some(0), Some(3))));
//! assert_eq!(strip_tags(text), "Hello world");
//! ```

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

const TAG_BODY: &str = r"\[\[(?:t(?P<table>\d+)_(?P<row>\d+)_(?P<col>\d+)|(?P<page>\d+)_(?P<block>\d*)_(?P<line>\d*))\]\]";

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(TAG_BODY).unwrap());

static TRAILING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\s*\[\[(?:t\d+_\d+_\d+|\d+_\d*_\d*)\]\])+\s*$").unwrap()
});

static STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?\[\[(?:t\d+_\d+_\d+|\d+_\d*_\d*)\]\]").unwrap());

/// Tag linking a merged line to its source page, block and line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineTag {
    /// Page number
    pub page: u32,
    /// Block identifier, if the source block had one
    pub block: Option<u32>,
    /// Line identifier, if the source line had one
    pub line: Option<u32>,
}

impl LineTag {
    /// Create a line tag.
    pub fn new(page: u32, block: Option<u32>, line: Option<u32>) -> Self {
        Self { page, block, line }
    }
}

impl fmt::Display for LineTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[{}_", self.page)?;
        if let Some(block) = self.block {
            write!(f, "{}", block)?;
        }
        f.write_str("_")?;
        if let Some(line) = self.line {
            write!(f, "{}", line)?;
        }
        f.write_str("]]")
    }
}

/// Tag linking table cell text to its table, row and column (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellTag {
    /// Table index in document order
    pub table: usize,
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
}

impl CellTag {
    /// Create a cell tag.
    pub fn new(table: usize, row: usize, col: usize) -> Self {
        Self { table, row, col }
    }
}

impl fmt::Display for CellTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[t{}_{}_{}]]", self.table, self.row, self.col)
    }
}

/// A parsed positional tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tag {
    /// Page/block/line tag
    Line(LineTag),
    /// Table cell tag
    Cell(CellTag),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Line(t) => t.fmt(f),
            Tag::Cell(t) => t.fmt(f),
        }
    }
}

/// A tag found in text, with its byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// The parsed tag
    pub tag: Tag,
    /// Byte range of the tag in the searched text
    pub range: Range<usize>,
}

fn optional_number(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn tag_from_captures(caps: &Captures<'_>) -> Option<Tag> {
    if let (Some(table), Some(row), Some(col)) =
        (caps.name("table"), caps.name("row"), caps.name("col"))
    {
        return Some(Tag::Cell(CellTag::new(
            table.as_str().parse().ok()?,
            row.as_str().parse().ok()?,
            col.as_str().parse().ok()?,
        )));
    }
    let page = caps.name("page")?.as_str().parse().ok()?;
    Some(Tag::Line(LineTag::new(
        page,
        optional_number(caps, "block"),
        optional_number(caps, "line"),
    )))
}

/// Parse a string consisting of exactly one tag.
pub fn parse_tag(s: &str) -> Option<Tag> {
    let caps = TAG_RE.captures(s)?;
    let whole = caps.get(0)?;
    if whole.start() != 0 || whole.end() != s.len() {
        return None;
    }
    tag_from_captures(&caps)
}

/// Find every tag in `text`, in order.
pub fn find_tags(text: &str) -> Vec<TagMatch> {
    TAG_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(TagMatch {
                tag: tag_from_captures(&caps)?,
                range: whole.range(),
            })
        })
        .collect()
}

/// Remove every tag, together with one space directly before it.
pub fn strip_tags(text: &str) -> String {
    STRIP_RE.replace_all(text, "").into_owned()
}

/// Split `text` into its prose and the run of tags (with surrounding
/// whitespace) at its end. The tail is empty when the text ends in prose.
pub fn split_trailing_tags(text: &str) -> (&str, &str) {
    match TRAILING_RE.find(text) {
        Some(m) => text.split_at(m.start()),
        None => (text, ""),
    }
}

/// Apply `f` to every stretch of text between tags, copying tags verbatim.
pub(crate) fn map_outside_tags<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in TAG_RE.find_iter(text) {
        out.push_str(&f(&text[last..m.start()]));
        out.push_str(m.as_str());
        last = m.end();
    }
    out.push_str(&f(&text[last..]));
    out
}
