//! Reconstruction stages that turn positioned spans into joined blocks.
//!
//! The [`spans`] stage flattens every line into one annotated string and
//! groups lines per page. The [`lines`] stage then walks the whole document
//! in order, joining lines under the [`policy`] rules and formatting each
//! finished block by type.

pub mod format;
pub mod lines;
pub mod policy;
pub mod script;
pub mod spans;

pub use format::{escape_markdown, format_block, title_case, DEFAULT_HEADING_LEVEL};
pub use lines::{join_blocks, merge_lines, JoinState, JoinSummary};
pub use policy::{append_line, is_geometric_continuation, join_kind, join_lines, JoinKind};
pub use spans::{merge_line, merge_page, merge_spans};
