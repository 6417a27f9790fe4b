//! Reads an already-unpacked dataset directory of JSON files and writes a
//! category's stories back to it. Downloading the dataset is not handled here.

pub mod layout;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ExportConfig, DEFAULT_FIX_FILE};
use crate::dataset::StoryPool;
use crate::paths::resolve_in_working_dir;
use crate::record::{
    Category, CategoryId, CategoryRecord, ShortStoryMeta, Story, StoryRecord, ValidationError,
};

pub use layout::DatasetLayout;

/// The same story id appears in two category files with different data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Story `{story_id}` appears in `{first_category}` and `{second_category}` with different data")]
pub struct DataConsistencyError {
    pub story_id: String,
    pub first_category: String,
    pub second_category: String,
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unknown category referenced by dataset: {0}")]
    UnknownCategory(String),
    #[error(transparent)]
    DataConsistency(#[from] DataConsistencyError),
}

pub type Categories = BTreeMap<CategoryId, Category>;

#[derive(Debug, Clone)]
pub struct DatasetLoader {
    layout: DatasetLayout,
}

impl DatasetLoader {
    pub fn new(dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout: DatasetLayout::new(dataset_dir),
        }
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    fn load_json_file<T: DeserializeOwned>(&self, path: &Path) -> Result<T, LoaderError> {
        let file = fs::File::open(path).map_err(|source| LoaderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LoaderError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Categories with their story id sets and per-category keyword indices.
    pub fn load_categories(&self) -> Result<Categories, LoaderError> {
        let records: BTreeMap<String, CategoryRecord> =
            self.load_json_file(&self.layout.categories())?;
        let mut categories = Categories::new();
        for record in records.into_values() {
            let category = Category::from_record(record)?;
            categories.insert(category.category.clone(), category);
        }

        let story_ids_by_category: BTreeMap<String, Vec<String>> =
            self.load_json_file(&self.layout.story_ids_by_category())?;
        for (name, story_ids) in story_ids_by_category {
            let id = CategoryId::new(name.as_str())?;
            let category = categories
                .get_mut(&id)
                .ok_or(LoaderError::UnknownCategory(name))?;
            *category = category.clone().with_stories(story_ids)?;
        }

        for category in categories.values_mut() {
            let index: BTreeMap<String, Vec<String>> =
                self.load_json_file(&self.layout.category_keywords(category))?;
            *category = category.clone().with_keyword_index(index)?;
            debug!(
                category = %category.category,
                stories = category.stories.len(),
                keywords = category.stories_by_keyword.len(),
                "loaded category"
            );
        }

        info!(categories = categories.len(), "categories loaded");
        Ok(categories)
    }

    /// Every story across all category files, flattened into one pool.
    ///
    /// A story listed under several categories is kept once if every copy
    /// holds the same data; differing copies are a [`DataConsistencyError`].
    /// Numbers compare by value, so `4` and `4.0` are the same rating.
    pub fn load_all_stories(&self, categories: &Categories) -> Result<Vec<Story>, LoaderError> {
        let mut order: Vec<String> = Vec::new();
        let mut raw_by_key: HashMap<String, (Value, String)> = HashMap::new();

        for category in categories.values() {
            let raw_stories: BTreeMap<String, Value> =
                self.load_json_file(&self.layout.category_stories(category))?;
            for (story_id, raw) in raw_stories {
                let key = story_id.to_lowercase();
                match raw_by_key.get(&key) {
                    Some((existing, first_category)) => {
                        if !same_json_data(existing, &raw) {
                            return Err(DataConsistencyError {
                                story_id,
                                first_category: first_category.clone(),
                                second_category: category.category.to_string(),
                            }
                            .into());
                        }
                    }
                    None => {
                        order.push(key.clone());
                        raw_by_key.insert(key, (raw, category.category.to_string()));
                    }
                }
            }
        }

        let mut stories = Vec::with_capacity(order.len());
        for key in order {
            if let Some((raw, _)) = raw_by_key.remove(&key) {
                let record: StoryRecord = serde_json::from_value(raw)?;
                stories.push(Story::from_record(record)?);
            }
        }
        info!(stories = stories.len(), "stories loaded");
        Ok(stories)
    }

    pub fn load_all(&self) -> Result<(Categories, Vec<Story>), LoaderError> {
        let categories = self.load_categories()?;
        let stories = self.load_all_stories(&categories)?;
        Ok((categories, stories))
    }

    pub fn load_short_story_metas(&self) -> Result<BTreeMap<String, ShortStoryMeta>, LoaderError> {
        self.load_json_file(&self.layout.story_metas())
    }

    /// Overall keyword index. The upstream file only lists the most popular
    /// stories per keyword.
    pub fn load_shortened_story_ids_by_keyword(
        &self,
    ) -> Result<BTreeMap<String, Vec<String>>, LoaderError> {
        self.load_json_file(&self.layout.story_ids_by_keyword())
    }

    /// Overwrites the category's stories file with `stories`.
    ///
    /// Pass the stories of a view that was only narrowed to the one category.
    /// Any other filtering drops stories from the file, and that includes
    /// quarantine: to save a fixed broken story, apply
    /// [`DataSet::with_replaced_story`](crate::DataSet::with_replaced_story)
    /// to the view from before quarantine and dump that view.
    ///
    /// If writing fails the partial temp file is removed and the original
    /// file is left untouched.
    pub fn dump_stories_to_category_json(
        &self,
        category: &Category,
        stories: &StoryPool,
    ) -> Result<PathBuf, LoaderError> {
        let path = self.layout.category_stories(category);
        let records: BTreeMap<&str, StoryRecord> = stories
            .iter()
            .map(|story| (story.id.as_str(), story.to_record()))
            .collect();

        write_json_atomically(&path, &records)?;

        info!(
            category = %category.category,
            stories = records.len(),
            path = %path.display(),
            "category stories written"
        );
        Ok(path)
    }
}

/// Writes next to the target, then renames over it. A failed write removes
/// the temp file and leaves the target untouched.
fn write_json_atomically<T: Serialize>(path: &Path, value: &T) -> Result<(), LoaderError> {
    let temp_path = path.with_extension("json.tmp");
    if let Err(err) = write_json_synced(&temp_path, value) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    fs::rename(&temp_path, path)?;
    Ok(())
}

fn write_json_synced<T: Serialize>(path: &Path, value: &T) -> Result<(), LoaderError> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

/// Structural equality where numbers compare by value rather than by
/// representation.
fn same_json_data(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => match (x.as_u64(), y.as_u64()) {
                (Some(x), Some(y)) => x == y,
                _ => x.as_f64() == y.as_f64(),
            },
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_json_data(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).map_or(false, |y| same_json_data(x, y)))
        }
        _ => a == b,
    }
}

/// Reads a replacement story text. Lines are right-trimmed and joined with
/// `\n`, so `\r\n` input is normalized.
pub fn load_single_story_text_from_file(file_name: Option<&Path>) -> Result<String, LoaderError> {
    load_single_story_text_from_file_or(file_name, DEFAULT_FIX_FILE)
}

pub fn load_single_story_text_with_config(
    file_name: Option<&Path>,
    config: &ExportConfig,
) -> Result<String, LoaderError> {
    load_single_story_text_from_file_or(file_name, &config.default_fix_file)
}

pub fn load_single_story_text_from_file_or(
    file_name: Option<&Path>,
    default_name: &str,
) -> Result<String, LoaderError> {
    let path = resolve_in_working_dir(file_name, default_name, "txt file with story fix")?;
    let content = fs::read_to_string(&path).map_err(|source| LoaderError::Read {
        path: path.clone(),
        source,
    })?;
    Ok(content.lines().map(str::trim_end).collect::<Vec<_>>().join("\n"))
}
