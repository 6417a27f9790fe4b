use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::record::Story;

/// Keywords considered equivalent for scoring. The first member names the group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordGroup(Vec<String>);

impl KeywordGroup {
    pub fn new<I, S>(synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeywordGroup(synonyms.into_iter().map(Into::into).collect())
    }

    /// Canonical name, or `None` for an empty group.
    pub fn name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn synonyms(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for KeywordGroup {
    fn from(keyword: &str) -> Self {
        KeywordGroup(vec![keyword.to_string()])
    }
}

impl From<String> for KeywordGroup {
    fn from(keyword: String) -> Self {
        KeywordGroup(vec![keyword])
    }
}

impl From<Vec<String>> for KeywordGroup {
    fn from(synonyms: Vec<String>) -> Self {
        KeywordGroup(synonyms)
    }
}

impl From<Vec<&str>> for KeywordGroup {
    fn from(synonyms: Vec<&str>) -> Self {
        KeywordGroup::new(synonyms)
    }
}

impl From<&[&str]> for KeywordGroup {
    fn from(synonyms: &[&str]) -> Self {
        KeywordGroup::new(synonyms.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for KeywordGroup {
    fn from(synonyms: [&str; N]) -> Self {
        KeywordGroup::new(synonyms)
    }
}

/// Keyword -> canonical group name lookup shared by both scorers.
#[derive(Debug, Clone, Default)]
pub(crate) struct GroupIndex {
    group_by_keyword: HashMap<String, String>,
}

impl GroupIndex {
    /// Registers a group and returns its canonical name. Later groups win on overlap.
    pub(crate) fn insert(&mut self, group: &KeywordGroup) -> Option<String> {
        let Some(name) = group.name() else {
            debug!("ignoring empty keyword group");
            return None;
        };
        for keyword in group.synonyms() {
            self.group_by_keyword.insert(keyword.clone(), name.to_string());
        }
        Some(name.to_string())
    }

    /// Distinct group names hit by the story, in sorted order.
    pub(crate) fn hits<'a>(&'a self, story: &Story) -> BTreeSet<&'a str> {
        story
            .keywords
            .iter()
            .filter_map(|keyword| self.group_by_keyword.get(keyword))
            .map(String::as_str)
            .collect()
    }

    pub(crate) fn keyword_count(&self) -> usize {
        self.group_by_keyword.len()
    }
}

/// Counts how many distinct synonym groups a story hits.
///
/// A story tagged with several synonyms of the same group counts once for it.
#[derive(Debug, Clone, Default)]
pub struct KeywordGroups {
    index: GroupIndex,
}

impl KeywordGroups {
    pub fn new<I, G>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<KeywordGroup>,
    {
        let mut index = GroupIndex::default();
        for group in groups {
            index.insert(&group.into());
        }
        debug!(keywords = index.keyword_count(), "built keyword group index");
        Self { index }
    }

    pub fn hit_count(&self, story: &Story) -> usize {
        self.index.hits(story).len()
    }

    /// Canonical names of the groups the story hits.
    pub fn hit_groups<'a>(&'a self, story: &Story) -> BTreeSet<&'a str> {
        self.index.hits(story)
    }
}
