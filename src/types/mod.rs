pub mod identifiers;
pub mod validation;

pub use identifiers::{CategoryId, StoryId};
pub use validation::ValidationError;
