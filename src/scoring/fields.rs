//! Plain story fields exposed as scorers, so numeric range filters and sorts
//! share one code path with the keyword scorers.

use super::StoryScorer;
use crate::record::Story;

#[derive(Debug, Clone, Copy, Default)]
pub struct Rating;

impl StoryScorer for Rating {
    type Score = f64;

    fn score(&self, story: &Story) -> f64 {
        story.rating
    }
}

/// Rating, optionally bucketed so that ratings within one `step` tie.
///
/// With a positive step the key is `floor(rating / step)`; otherwise it is the
/// raw rating.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantizedRating {
    step: Option<f64>,
}

impl QuantizedRating {
    pub fn new(step: Option<f64>) -> Self {
        let step = step.filter(|step| *step > 0.0);
        Self { step }
    }

    pub fn step(&self) -> Option<f64> {
        self.step
    }
}

impl StoryScorer for QuantizedRating {
    type Score = f64;

    fn score(&self, story: &Story) -> f64 {
        match self.step {
            Some(step) => (story.rating / step).floor(),
            None => story.rating,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PageCount;

impl StoryScorer for PageCount {
    type Score = u32;

    fn score(&self, story: &Story) -> u32 {
        story.page_count()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WordCount;

impl StoryScorer for WordCount {
    type Score = u32;

    fn score(&self, story: &Story) -> u32 {
        story.word_count()
    }
}
