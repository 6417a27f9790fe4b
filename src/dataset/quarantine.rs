//! Heuristic detection of corrupted stories.
//!
//! Some upstream stories were scraped as page garbage instead of prose. Those
//! pages happen to end with a fixed trailer, which is what [`TrailingMarker`]
//! looks for. This is a detector for that one known defect, not a general
//! validity check.

use crate::config::{QuarantineConfig, DEFAULT_BROKEN_TEXT_MARKER};
use crate::record::Story;

pub trait BrokenStoryDetector {
    fn is_broken(&self, story: &Story) -> bool;
}

/// Flags stories whose right-trimmed text ends with a marker string.
/// An empty marker flags nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingMarker {
    marker: String,
}

impl TrailingMarker {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn from_config(config: &QuarantineConfig) -> Self {
        Self::new(config.trailing_marker.clone())
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Default for TrailingMarker {
    fn default() -> Self {
        Self::new(DEFAULT_BROKEN_TEXT_MARKER)
    }
}

impl BrokenStoryDetector for TrailingMarker {
    fn is_broken(&self, story: &Story) -> bool {
        !self.marker.is_empty() && story.text.trim_end().ends_with(&self.marker)
    }
}
