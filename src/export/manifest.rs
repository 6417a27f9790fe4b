use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Summary of a written export. Everything except `written_at` is a pure
/// function of the exported view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub path: PathBuf,
    pub story_count: usize,
    pub byte_count: usize,
    pub content_digest: String,
    pub written_at: DateTime<Utc>, // informational only
}

/// Incremental `sha256:<hex>` digest over export entries.
#[derive(Clone, Default)]
pub struct ContentDigest {
    hasher: Sha256,
}

impl ContentDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &str) {
        self.hasher.update(chunk.as_bytes());
    }

    pub fn finish(self) -> String {
        format!("sha256:{}", hex::encode(self.hasher.finalize()))
    }

    /// Digest of a complete text in one call.
    pub fn of(content: &str) -> String {
        let mut digest = Self::new();
        digest.update(content);
        digest.finish()
    }
}
