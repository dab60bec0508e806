//! Error types for unlayout library.

use std::io;
use thiserror::Error;

/// Result type alias for unlayout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading layout input or writing output.
///
/// Reconstruction itself never fails: malformed layout is absorbed with a
/// fallback. These errors only come from the edges (files, JSON, adapters).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON or does not match the page schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The collaborator document is structurally malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A configuration value cannot be honored.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}
