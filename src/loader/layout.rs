use std::path::{Path, PathBuf};

use crate::record::Category;

pub const CATEGORIES_FILE: &str = "categories.json";
pub const STORY_IDS_BY_KEYWORD_FILE: &str = "keywords_top_overall.json";
pub const STORY_METAS_FILE: &str = "story_list.json";
pub const STORY_IDS_BY_CATEGORY_FILE: &str = "story_list_by_category.json";

/// File locations inside an unpacked dataset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn categories(&self) -> PathBuf {
        self.root.join(CATEGORIES_FILE)
    }

    pub fn story_ids_by_keyword(&self) -> PathBuf {
        self.root.join(STORY_IDS_BY_KEYWORD_FILE)
    }

    pub fn story_metas(&self) -> PathBuf {
        self.root.join(STORY_METAS_FILE)
    }

    pub fn story_ids_by_category(&self) -> PathBuf {
        self.root.join(STORY_IDS_BY_CATEGORY_FILE)
    }

    pub fn category_keywords(&self, category: &Category) -> PathBuf {
        self.root.join(category.json_keywords_filename())
    }

    pub fn category_stories(&self, category: &Category) -> PathBuf {
        self.root.join(category.json_stories_filename())
    }
}
