//! Document model types for layout reconstruction.
//!
//! The input side (`Page` → `Block` → `Line` → `Span`) mirrors what an
//! upstream layout/OCR stage produces. The derived side (`MergedLine`,
//! `MergedBlock`, `FullyMergedBlock`) is built by the merge stages and only
//! lives for one reconstruction.

mod block_type;
mod merged;
mod page;

pub use block_type::BlockType;
pub use merged::{FullyMergedBlock, MergedBlock, MergedLine};
pub use page::{BBox, Block, Line, Page, Span};
