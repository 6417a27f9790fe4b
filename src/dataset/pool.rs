use std::collections::HashMap;
use std::sync::Arc;

use crate::record::{Story, StoryId};

/// Insertion-ordered story collection keyed by case-insensitive story id.
///
/// Inserting an id that is already present replaces the story in place and
/// keeps its position; new ids are appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryPool {
    entries: Vec<Arc<Story>>,
    position_by_key: HashMap<String, usize>,
}

impl StoryPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        StoryPool {
            entries: Vec::with_capacity(capacity),
            position_by_key: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the story previously stored under the same id, if any.
    pub fn insert(&mut self, story: Arc<Story>) -> Option<Arc<Story>> {
        let key = story.id.key().to_string();
        match self.position_by_key.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position], story)),
            None => {
                self.position_by_key.insert(key, self.entries.len());
                self.entries.push(story);
                None
            }
        }
    }

    /// Looks a story up by id, ignoring case.
    pub fn get(&self, id: &str) -> Option<&Arc<Story>> {
        self.position_by_key
            .get(&id.to_lowercase())
            .map(|&position| &self.entries[position])
    }

    pub fn contains(&self, id: &StoryId) -> bool {
        self.position_by_key.contains_key(id.key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Story>> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &StoryId> + '_ {
        self.entries.iter().map(|story| &story.id)
    }

    pub fn as_slice(&self) -> &[Arc<Story>] {
        &self.entries
    }
}

impl FromIterator<Arc<Story>> for StoryPool {
    fn from_iter<I: IntoIterator<Item = Arc<Story>>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut pool = StoryPool::with_capacity(iter.size_hint().0);
        for story in iter {
            pool.insert(story);
        }
        pool
    }
}

impl FromIterator<Story> for StoryPool {
    fn from_iter<I: IntoIterator<Item = Story>>(iter: I) -> Self {
        iter.into_iter().map(Arc::new).collect()
    }
}

impl<'a> IntoIterator for &'a StoryPool {
    type Item = &'a Arc<Story>;
    type IntoIter = std::slice::Iter<'a, Arc<Story>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
