use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::types::identifiers::{CategoryId, StoryId};
use crate::types::validation::ValidationError;

use super::RecordError;

/// A dataset category and its keyword index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "CategoryRecord", try_from = "CategoryRecord")]
pub struct Category {
    pub category: CategoryId,
    pub description: String,
    pub url: String,
    pub stories: BTreeSet<StoryId>,
    /// Keyword -> ids of the stories in this category tagged with it.
    pub stories_by_keyword: BTreeMap<String, BTreeSet<StoryId>>,
    pub page_links: Vec<String>,
}

impl Category {
    pub fn new(
        category: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Category {
            category: CategoryId::new(category)?,
            description: description.into(),
            url: url.into(),
            stories: BTreeSet::new(),
            stories_by_keyword: BTreeMap::new(),
            page_links: Vec::new(),
        })
    }

    pub fn with_stories<I, S>(mut self, story_ids: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stories = collect_ids(story_ids)?;
        Ok(self)
    }

    pub fn with_keyword_index<I, K, V, S>(mut self, index: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stories_by_keyword = index
            .into_iter()
            .map(|(keyword, ids)| Ok((keyword.into(), collect_ids(ids)?)))
            .collect::<Result<_, ValidationError>>()?;
        Ok(self)
    }

    pub fn with_page_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.page_links = links.into_iter().map(Into::into).collect();
        self
    }

    /// Keyword vocabulary known for this category (keys of `stories_by_keyword`).
    pub fn keywords(&self) -> impl Iterator<Item = &str> + '_ {
        self.stories_by_keyword.keys().map(String::as_str)
    }

    fn json_basename(&self) -> String {
        self.category.as_str().replace('/', " & ")
    }

    pub fn json_keywords_filename(&self) -> String {
        format!("{}_keywords_top.json", self.json_basename())
    }

    pub fn json_stories_filename(&self) -> String {
        format!("{}_stories.json", self.json_basename())
    }

    /// JSON-safe record with every set rendered as a list sorted by raw string.
    pub fn to_record(&self) -> CategoryRecord {
        CategoryRecord {
            category: self.category.as_str().to_string(),
            description: self.description.clone(),
            url: self.url.clone(),
            stories: id_strings(&self.stories),
            stories_by_keyword: self
                .stories_by_keyword
                .iter()
                .map(|(keyword, ids)| (keyword.clone(), id_strings(ids)))
                .collect(),
            page_links: self.page_links.clone(),
        }
    }

    pub fn from_record(record: CategoryRecord) -> Result<Self, ValidationError> {
        Category::new(record.category, record.description, record.url)?
            .with_stories(record.stories)?
            .with_keyword_index(record.stories_by_keyword)
            .map(|category| category.with_page_links(record.page_links))
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, RecordError> {
        Ok(serde_json::to_value(self.to_record())?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, RecordError> {
        let record: CategoryRecord = serde_json::from_value(value)?;
        Ok(Category::from_record(record)?)
    }
}

fn collect_ids<I, S>(ids: I) -> Result<BTreeSet<StoryId>, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter().map(StoryId::new).collect()
}

/// Raw ids in plain string order, independent of the case-insensitive set order.
fn id_strings(ids: &BTreeSet<StoryId>) -> Vec<String> {
    let mut raw: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
    raw.sort();
    raw
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.category.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category: String,
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub stories: Vec<String>,
    #[serde(default)]
    pub stories_by_keyword: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub page_links: Vec<String>,
}

impl From<Category> for CategoryRecord {
    fn from(category: Category) -> Self {
        category.to_record()
    }
}

impl TryFrom<CategoryRecord> for Category {
    type Error = ValidationError;

    fn try_from(record: CategoryRecord) -> Result<Self, Self::Error> {
        Category::from_record(record)
    }
}
