pub mod format;
pub mod manifest;
pub mod writer;

use thiserror::Error;

pub use format::{output_limit, render_story, OutputEntries, STORY_SEPARATOR};
pub use manifest::{ContentDigest, ExportManifest};
pub use writer::{resolve_output_path, write_output};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
