use serde::{Deserialize, Serialize};

use crate::types::identifiers::{CategoryId, StoryId};

/// Lightweight projection of a story, used for lookups without the body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortStoryMeta {
    pub id: StoryId,
    pub title: String,
    pub url: String,
    pub category: CategoryId,
    pub rating: f64,
}
