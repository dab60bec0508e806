//! Reconstruction options and configuration.

use crate::error::{Error, Result};
use crate::model::BlockType;

/// Default vertical gap (layout units) under which two aligned lines of equal
/// height are treated as one wrapped paragraph.
pub const DEFAULT_MAX_BLOCK_GAP: f32 = 15.0;

/// Options controlling how a document is rebuilt.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Insert a page marker and page separator at every page boundary
    pub paginate_output: bool,

    /// Token written after each page marker
    pub page_separator: String,

    /// Block type given to blocks with a blank label, and to open text
    /// that has no block type when it is flushed
    pub default_block_type: BlockType,

    /// Maximum vertical gap for geometric line continuation
    pub max_block_gap: f32,

    /// Inline emphasis thresholds
    pub emphasis: EmphasisConfig,

    /// Append `[[page_block_line]]` tags to merged lines
    pub positional_tags: bool,

    /// Merge spans of different pages in parallel
    pub parallel: bool,
}

impl RenderOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable page markers.
    pub fn with_pagination(mut self, paginate: bool) -> Self {
        self.paginate_output = paginate;
        self
    }

    /// Set the page separator token.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    /// Set the fallback block type.
    pub fn with_default_block_type(mut self, block_type: BlockType) -> Self {
        self.default_block_type = block_type;
        self
    }

    /// Set the geometric continuation threshold.
    pub fn with_max_block_gap(mut self, gap: f32) -> Self {
        self.max_block_gap = gap;
        self
    }

    /// Set emphasis thresholds.
    pub fn with_emphasis(mut self, emphasis: EmphasisConfig) -> Self {
        self.emphasis = emphasis;
        self
    }

    /// Enable or disable positional tags on merged lines.
    pub fn with_positional_tags(mut self, tags: bool) -> Self {
        self.positional_tags = tags;
        self
    }

    /// Enable or disable parallel span merging.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Merge spans on the current thread only.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that every value can be honored.
    pub fn validate(&self) -> Result<()> {
        if !self.max_block_gap.is_finite() || self.max_block_gap < 0.0 {
            return Err(Error::InvalidOption(format!(
                "max_block_gap must be a non-negative number, got {}",
                self.max_block_gap
            )));
        }
        Ok(())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            paginate_output: false,
            page_separator: format!("{}\n\n", "-".repeat(48)),
            default_block_type: BlockType::Text,
            max_block_gap: DEFAULT_MAX_BLOCK_GAP,
            emphasis: EmphasisConfig::default(),
            positional_tags: true,
            parallel: true,
        }
    }
}

/// Thresholds for wrapping spans in `*`/`**` emphasis.
///
/// Both were tuned empirically and may need adjusting per corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmphasisConfig {
    /// A span is only wrapped if its text is longer than this (in chars)
    pub min_span_chars: usize,

    /// When looking ahead for the span that decides whether emphasis ends,
    /// skip spans whose trimmed text is not longer than this
    pub lookahead_min_chars: usize,
}

impl Default for EmphasisConfig {
    fn default() -> Self {
        Self {
            min_span_chars: 3,
            lookahead_min_chars: 2,
        }
    }
}
