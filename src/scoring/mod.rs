pub mod fields;
pub mod groups;
pub mod weights;

use crate::record::Story;

pub use fields::{PageCount, QuantizedRating, Rating, WordCount};
pub use groups::{KeywordGroup, KeywordGroups};
pub use weights::WeightedKeywordGroups;

/// Computes a per-story value used by range filters and sorts.
pub trait StoryScorer {
    type Score: PartialOrd + Copy + std::fmt::Debug;

    fn score(&self, story: &Story) -> Self::Score;
}

impl StoryScorer for KeywordGroups {
    type Score = usize;

    fn score(&self, story: &Story) -> usize {
        self.hit_count(story)
    }
}

impl StoryScorer for WeightedKeywordGroups {
    type Score = f64;

    fn score(&self, story: &Story) -> f64 {
        self.weighted_score(story)
    }
}
