//! # unlayout
//!
//! Rebuilds readable Markdown from layout analysis output.
//!
//! An upstream layout/OCR stage splits a document into pages, blocks, lines
//! and styled text spans. This library stitches those fragments back into one
//! document: it merges spans with inline emphasis, joins wrapped lines and
//! hyphenated words, formats each block by type and assembles the result.
//!
//! ## Quick Start
//!
//! ```
//! use unlayout::{reconstruct, BBox, Block, BlockType, Line, Page, RenderOptions};
//!
//! let bbox = BBox::new(0.0, 0.0, 500.0, 12.0);
//! let page = Page::new(1, BBox::new(0.0, 0.0, 612.0, 792.0)).with_block(
//!     Block::new(BlockType::Text, bbox)
//!         .with_id(0)
//!         .with_line(Line::plain("An exam-", bbox).with_id(0))
//!         .with_line(Line::plain("ple of text.", bbox).with_id(1)),
//! );
//!
//! let options = RenderOptions::default().with_positional_tags(false);
//! let result = reconstruct(&[page], &options);
//! assert_eq!(result.markdown, "An example of text.");
//! ```
//!
//! ## Features
//!
//! - **Script-aware joining**: Latin, Cyrillic, CJK and Thai punctuation rules
//! - **Positional tags**: `[[page_block_line]]` markers trace text to geometry
//! - **Block formatting**: headings, tables, code, formulas, captions, lists
//! - **Pagination**: optional page markers with a configurable separator
//! - **Textract input**: AWS Textract JSON converted to the page model
//! - **Parallel processing**: spans are merged per page with Rayon

pub mod error;
pub mod merge;
pub mod model;
pub mod render;
pub mod tags;
pub mod textract;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    BBox, Block, BlockType, FullyMergedBlock, Line, MergedBlock, MergedLine, Page, Span,
};
pub use render::{
    EmphasisConfig, JsonFormat, Reconstruction, ReconstructionStats, RenderOptions,
};
pub use tags::{find_tags, strip_tags, CellTag, LineTag, Tag};

use std::path::Path;

/// Rebuild a Markdown document from layout pages.
///
/// Never fails: empty lines, empty pages, unknown block types and odd
/// heading levels all fall back to a sensible output.
pub fn reconstruct(pages: &[Page], options: &RenderOptions) -> Reconstruction {
    let merged = merge::merge_spans(pages, options);
    let summary = merge::join_blocks(&merged, options);
    let markdown = render::assemble(&summary.blocks, options);

    let input_lines: usize = pages.iter().map(Page::line_count).sum();
    let merged_lines: usize = merged.iter().flatten().map(|b| b.lines.len()).sum();

    let mut stats = ReconstructionStats::new();
    stats.page_count = pages.len() as u32;
    stats.lines_merged = merged_lines as u32;
    stats.lines_dropped = input_lines.saturating_sub(merged_lines) as u32;
    stats.line_joins = summary.joins as u32;
    stats.dehyphenations = summary.dehyphenations as u32;
    for block in &summary.blocks {
        stats.add_block(block);
    }
    stats.count_text(&markdown);

    log::debug!(
        "Reconstructed {} pages into {} blocks ({} lines dropped)",
        stats.page_count,
        stats.block_count,
        stats.lines_dropped
    );

    Reconstruction::new(markdown, summary.blocks, stats)
}

/// Rebuild a document and return only the Markdown.
pub fn to_markdown(pages: &[Page], options: &RenderOptions) -> String {
    reconstruct(pages, options).markdown
}

/// Parse pages from JSON.
///
/// Accepts either an array of pages or an object with a `pages` array.
///
/// # Example
///
/// ```
/// use unlayout::parse_pages_json;
///
/// let json = r#"[{"number": 1, "bbox": [0, 0, 612, 792], "blocks": []}]"#;
/// let pages = parse_pages_json(json).unwrap();
/// assert_eq!(pages[0].number, 1);
/// ```
pub fn parse_pages_json(json: &str) -> Result<Vec<Page>> {
    let mut value: serde_json::Value = serde_json::from_str(json)?;
    if let Some(pages) = value.get_mut("pages") {
        return Ok(serde_json::from_value(pages.take())?);
    }
    if !value.is_array() {
        return Err(Error::InvalidInput(
            "expected an array of pages or an object with a \"pages\" array".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Parse pages from a JSON file.
///
/// # Example
///
/// ```no_run
/// use unlayout::{parse_pages_file, to_markdown, RenderOptions};
///
/// let pages = parse_pages_file("layout.json")?;
/// println!("{}", to_markdown(&pages, &RenderOptions::default()));
/// # Ok::<(), unlayout::Error>(())
/// ```
pub fn parse_pages_file<P: AsRef<Path>>(path: P) -> Result<Vec<Page>> {
    let json = std::fs::read_to_string(path)?;
    parse_pages_json(&json)
}

/// Input format accepted by [`Unlayout`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputFormat {
    /// The crate's own page JSON
    #[default]
    Pages,
    /// AWS Textract JSON, scaled to the given page size
    Textract {
        /// Page width in layout units
        width: f32,
        /// Page height in layout units
        height: f32,
    },
}

/// Builder for loading layout output and rebuilding it.
///
/// # Example
///
/// ```no_run
/// use unlayout::Unlayout;
///
/// let markdown = Unlayout::new()
///     .paginate()
///     .with_max_block_gap(10.0)
///     .load("layout.json")?
///     .to_markdown();
/// # Ok::<(), unlayout::Error>(())
/// ```
pub struct Unlayout {
    input: InputFormat,
    options: RenderOptions,
}

impl Unlayout {
    /// Create a new Unlayout builder.
    pub fn new() -> Self {
        Self {
            input: InputFormat::default(),
            options: RenderOptions::default(),
        }
    }

    /// Read AWS Textract JSON at the default 1000x1000 page size.
    pub fn textract(self) -> Self {
        self.textract_with_size(
            textract::DEFAULT_PAGE_WIDTH,
            textract::DEFAULT_PAGE_HEIGHT,
        )
    }

    /// Read AWS Textract JSON scaled to `width` x `height`.
    pub fn textract_with_size(mut self, width: f32, height: f32) -> Self {
        self.input = InputFormat::Textract { width, height };
        self
    }

    /// Insert page markers.
    pub fn paginate(mut self) -> Self {
        self.options = self.options.with_pagination(true);
        self
    }

    /// Set the page separator token.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.options = self.options.with_page_separator(separator);
        self
    }

    /// Set the geometric continuation threshold.
    pub fn with_max_block_gap(mut self, gap: f32) -> Self {
        self.options = self.options.with_max_block_gap(gap);
        self
    }

    /// Leave positional tags out of the output.
    pub fn without_tags(mut self) -> Self {
        self.options = self.options.with_positional_tags(false);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Replace all render options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Load a layout file.
    pub fn load<P: AsRef<Path>>(self, path: P) -> Result<UnlayoutResult> {
        let json = std::fs::read_to_string(path)?;
        self.load_str(&json)
    }

    /// Load layout JSON from a string.
    pub fn load_str(self, json: &str) -> Result<UnlayoutResult> {
        let pages = match self.input {
            InputFormat::Pages => parse_pages_json(json)?,
            InputFormat::Textract { width, height } => {
                textract::parse_textract_str(json, width, height)?
            }
        };
        self.from_pages(pages)
    }

    /// Use pages that are already in memory.
    pub fn from_pages(self, pages: Vec<Page>) -> Result<UnlayoutResult> {
        self.options.validate()?;
        Ok(UnlayoutResult {
            pages,
            options: self.options,
        })
    }
}

impl Default for Unlayout {
    fn default() -> Self {
        Self::new()
    }
}

/// Loaded layout pages ready to be rebuilt.
pub struct UnlayoutResult {
    /// The loaded pages
    pub pages: Vec<Page>,
    /// Render options to use
    options: RenderOptions,
}

impl UnlayoutResult {
    /// Rebuild the document.
    pub fn reconstruct(&self) -> Reconstruction {
        reconstruct(&self.pages, &self.options)
    }

    /// Rebuild the document and return the Markdown.
    pub fn to_markdown(&self) -> String {
        to_markdown(&self.pages, &self.options)
    }

    /// Rebuild the document and return blocks and statistics as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.reconstruct(), format)
    }

    /// Options in effect.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }
}
