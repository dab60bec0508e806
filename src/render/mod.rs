//! Rendering module: options, Markdown assembly and structured output.

mod json;
mod markdown;
mod options;
mod result;

pub use json::{to_json, JsonFormat};
pub use markdown::{assemble, block_separator, MarkdownAssembler};
pub use options::{EmphasisConfig, RenderOptions, DEFAULT_MAX_BLOCK_GAP};
pub use result::{Reconstruction, ReconstructionStats};
