use std::collections::HashMap;

use tracing::debug;

use super::groups::{GroupIndex, KeywordGroup};
use crate::record::Story;

/// Synonym groups carrying a weight each. A story's score is the sum of the
/// weights of the distinct groups it hits.
#[derive(Debug, Clone, Default)]
pub struct WeightedKeywordGroups {
    index: GroupIndex,
    weight_by_group: HashMap<String, f64>,
}

impl WeightedKeywordGroups {
    /// Groups sharing a canonical name are merged; the later weight wins.
    pub fn new<I, G>(groups: I) -> Self
    where
        I: IntoIterator<Item = (G, f64)>,
        G: Into<KeywordGroup>,
    {
        let mut index = GroupIndex::default();
        let mut weight_by_group = HashMap::new();
        for (group, weight) in groups {
            if let Some(name) = index.insert(&group.into()) {
                weight_by_group.insert(name, weight);
            }
        }
        debug!(
            groups = weight_by_group.len(),
            keywords = index.keyword_count(),
            "built weighted keyword group index"
        );
        Self {
            index,
            weight_by_group,
        }
    }

    pub fn weighted_score(&self, story: &Story) -> f64 {
        // Hits come back sorted, so the summation order is deterministic.
        self.index
            .hits(story)
            .into_iter()
            .filter_map(|name| self.weight_by_group.get(name))
            .sum()
    }

    pub fn weight_of(&self, group_name: &str) -> Option<f64> {
        self.weight_by_group.get(group_name).copied()
    }
}
