pub mod category;
pub mod meta;
pub mod story;

use thiserror::Error;

pub use crate::types::identifiers::{CategoryId, StoryId};
pub use crate::types::validation::ValidationError;
pub use category::{Category, CategoryRecord};
pub use meta::ShortStoryMeta;
pub use story::{Story, StoryRecord};

/// Failure while converting a record to or from JSON.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Malformed record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
