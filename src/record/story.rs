use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::types::identifiers::{CategoryId, StoryId};
use crate::types::validation::{positive_count, ValidationError};

use super::RecordError;

/// A single story with its full body text.
///
/// Identity is the story id (case-insensitive). Two `Story` values with the same
/// id compare equal even if their other fields differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "StoryRecord", try_from = "StoryRecord")]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    pub url: String,
    /// Name of the owning category. No back-reference is kept.
    pub category: CategoryId,
    pub rating: f64,
    pub description: String,
    pub keywords: BTreeSet<String>,
    pub text: String,
    page_count: u32,
    word_count: u32,
    pub author: String,
    pub date_approved: String,
}

impl Story {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        category: impl Into<String>,
        rating: f64,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Story {
            id: StoryId::new(id)?,
            title: title.into(),
            url: url.into(),
            category: CategoryId::new(category)?,
            rating,
            description: description.into(),
            keywords: BTreeSet::new(),
            text: String::new(),
            page_count: 1,
            word_count: 1,
            author: String::new(),
            date_approved: String::new(),
        })
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_counts(mut self, page_count: i64, word_count: i64) -> Result<Self, ValidationError> {
        self.page_count = positive_count("page_count", page_count)?;
        self.word_count = positive_count("word_count", word_count)?;
        Ok(self)
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_date_approved(mut self, date_approved: impl Into<String>) -> Self {
        self.date_approved = date_approved.into();
        self
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    /// JSON-safe record with keywords as a sorted list.
    pub fn to_record(&self) -> StoryRecord {
        StoryRecord {
            id: self.id.as_str().to_string(),
            title: self.title.clone(),
            url: self.url.clone(),
            category: self.category.as_str().to_string(),
            rating: self.rating,
            description: self.description.clone(),
            keywords: self.keywords.iter().cloned().collect(),
            text: self.text.clone(),
            page_count: i64::from(self.page_count),
            word_count: i64::from(self.word_count),
            author: self.author.clone(),
            date_approved: self.date_approved.clone(),
        }
    }

    /// Inverse of [`Story::to_record`]. Re-runs all validation.
    pub fn from_record(record: StoryRecord) -> Result<Self, ValidationError> {
        Ok(Story {
            id: StoryId::new(record.id)?,
            title: record.title,
            url: record.url,
            category: CategoryId::new(record.category)?,
            rating: record.rating,
            description: record.description,
            keywords: record.keywords.into_iter().collect(),
            text: record.text,
            page_count: positive_count("page_count", record.page_count)?,
            word_count: positive_count("word_count", record.word_count)?,
            author: record.author,
            date_approved: record.date_approved,
        })
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, RecordError> {
        Ok(serde_json::to_value(self.to_record())?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, RecordError> {
        let record: StoryRecord = serde_json::from_value(value)?;
        Ok(Story::from_record(record)?)
    }
}

impl PartialEq for Story {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Story {}

impl Hash for Story {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Persisted shape of a [`Story`]. Field order matches the dataset files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    pub category: String,
    pub rating: f64,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_count")]
    pub page_count: i64,
    #[serde(default = "default_count")]
    pub word_count: i64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub date_approved: String,
}

fn default_count() -> i64 {
    1
}

impl From<Story> for StoryRecord {
    fn from(story: Story) -> Self {
        story.to_record()
    }
}

impl TryFrom<StoryRecord> for Story {
    type Error = ValidationError;

    fn try_from(record: StoryRecord) -> Result<Self, Self::Error> {
        Story::from_record(record)
    }
}
