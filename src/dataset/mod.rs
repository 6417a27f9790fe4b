pub mod filters;
pub mod pool;
pub mod quarantine;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ExportConfig, QuarantineConfig};
use crate::export::{self, ExportError, ExportManifest, OutputEntries};
use crate::loader::{DatasetLoader, LoaderError};
use crate::record::{Category, CategoryId, Story};
use crate::scoring::{
    KeywordGroup, KeywordGroups, PageCount, QuantizedRating, Rating, StoryScorer,
    WeightedKeywordGroups, WordCount,
};

pub use filters::{
    AuthorFilter, Bounds, CategoryFilter, ExcludedKeywords, KeywordVocabularyFilter, Membership,
    RequiredKeywords, ScoreFilter, StoryPredicate,
};
pub use pool::StoryPool;
pub use quarantine::{BrokenStoryDetector, TrailingMarker};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Unknown story: {0}")]
    UnknownStory(String),
}

/// An immutable snapshot of the corpus: categories, active stories and
/// quarantined stories.
///
/// Every query returns a new `DataSet`. Membership containers are rebuilt per
/// snapshot while the `Story` and `Category` records themselves are shared
/// through `Arc`. Records are never edited in place; use
/// [`DataSet::with_replaced_story`] to swap one in a new snapshot.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    categories: BTreeMap<CategoryId, Arc<Category>>,
    stories: StoryPool,
    broken_stories: StoryPool,
}

impl DataSet {
    /// Wraps freshly loaded records. Nothing is quarantined yet; call
    /// [`DataSet::filter_out_broken_stories`] explicitly.
    pub fn new<C, S>(categories: C, stories: S) -> Self
    where
        C: IntoIterator<Item = Category>,
        S: IntoIterator<Item = Story>,
    {
        let categories = categories
            .into_iter()
            .map(|category| (category.category.clone(), Arc::new(category)))
            .collect();
        DataSet {
            categories,
            stories: stories.into_iter().collect(),
            broken_stories: StoryPool::new(),
        }
    }

    pub fn load(loader: &DatasetLoader) -> Result<Self, LoaderError> {
        let (categories, stories) = loader.load_all()?;
        let dataset = DataSet::new(categories.into_values(), stories);
        info!(
            categories = dataset.categories.len(),
            stories = dataset.stories.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    pub fn categories(&self) -> &BTreeMap<CategoryId, Arc<Category>> {
        &self.categories
    }

    pub fn stories(&self) -> &StoryPool {
        &self.stories
    }

    pub fn broken_stories(&self) -> &StoryPool {
        &self.broken_stories
    }

    pub fn story(&self, id: &str) -> Option<&Arc<Story>> {
        self.stories.get(id)
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn category(&self, name: &str) -> Result<&Category, LookupError> {
        CategoryId::new(name)
            .ok()
            .and_then(|id| self.categories.get(&id))
            .map(|category| category.as_ref())
            .ok_or_else(|| LookupError::UnknownCategory(name.to_string()))
    }

    /// Keyword vocabulary known for a category.
    pub fn category_keywords(&self, name: &str) -> Result<Vec<&str>, LookupError> {
        Ok(self.category(name)?.keywords().collect())
    }

    /// Every keyword used by the current stories with its number of stories,
    /// most frequent first. Ties keep first-seen order.
    pub fn keyword_hits(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut slot_by_keyword: HashMap<&str, usize> = HashMap::new();
        for story in &self.stories {
            for keyword in &story.keywords {
                match slot_by_keyword.get(keyword.as_str()) {
                    Some(&slot) => counts[slot].1 += 1,
                    None => {
                        slot_by_keyword.insert(keyword.as_str(), counts.len());
                        counts.push((keyword.clone(), 1));
                    }
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    fn with_stories(&self, stories: StoryPool) -> DataSet {
        DataSet {
            categories: self.categories.clone(),
            stories,
            broken_stories: self.broken_stories.clone(),
        }
    }

    // Primitives

    /// Keeps the stories matching `predicate`, in their current order.
    pub fn filtered<P: StoryPredicate + ?Sized>(&self, predicate: &P) -> DataSet {
        let stories: StoryPool = self
            .stories
            .iter()
            .filter(|story| predicate.matches(story))
            .cloned()
            .collect();
        debug!(
            kept = stories.len(),
            dropped = self.stories.len() - stories.len(),
            "filtered stories"
        );
        self.with_stories(stories)
    }

    /// Reorders all stories by `key`. The sort is stable in both directions:
    /// stories with equal keys keep their relative order. Keys that are not
    /// comparable to themselves (NaN) rank below every other key.
    pub fn sorted_by<K, F>(&self, key: F, descending: bool) -> DataSet
    where
        K: PartialOrd,
        F: Fn(&Story) -> K,
    {
        let mut keyed: Vec<(K, &Arc<Story>)> =
            self.stories.iter().map(|story| (key(story), story)).collect();
        keyed.sort_by(|(a, _), (b, _)| {
            let order = total_order(a, b);
            if descending {
                order.reverse()
            } else {
                order
            }
        });
        debug!(stories = keyed.len(), descending, "sorted stories");
        self.with_stories(keyed.into_iter().map(|(_, story)| Arc::clone(story)).collect())
    }

    pub fn sorted_by_score<S: StoryScorer>(&self, scorer: &S, descending: bool) -> DataSet {
        self.sorted_by(|story| scorer.score(story), descending)
    }

    // Membership filters (allow/deny lists)

    pub fn with_authors<I, S>(&self, authors: I) -> DataSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filtered(&AuthorFilter::new(authors, Membership::Include))
    }

    pub fn not_authors<I, S>(&self, authors: I) -> DataSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filtered(&AuthorFilter::new(authors, Membership::Exclude))
    }

    pub fn with_categories<I, S>(&self, categories: I) -> DataSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filtered(&CategoryFilter::new(categories, Membership::Include))
    }

    pub fn not_categories<I, S>(&self, categories: I) -> DataSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filtered(&CategoryFilter::new(categories, Membership::Exclude))
    }

    /// Stories tagged with any keyword from the vocabularies of the given categories.
    pub fn with_keywords_from_categories<I, S>(&self, categories: I) -> Result<DataSet, LookupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filter = self.category_vocabulary_filter(categories, Membership::Include)?;
        Ok(self.filtered(&filter))
    }

    /// Stories tagged with no keyword from the vocabularies of the given categories.
    pub fn not_keywords_from_categories<I, S>(&self, categories: I) -> Result<DataSet, LookupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filter = self.category_vocabulary_filter(categories, Membership::Exclude)?;
        Ok(self.filtered(&filter))
    }

    fn category_vocabulary_filter<I, S>(
        &self,
        categories: I,
        membership: Membership,
    ) -> Result<KeywordVocabularyFilter, LookupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Vec::new();
        for name in categories {
            vocabulary.extend(self.category(name.as_ref())?.keywords().map(str::to_string));
        }
        Ok(KeywordVocabularyFilter::new(vocabulary, membership))
    }

    /// Stories carrying every one of `keywords`.
    pub fn with_keywords<I, S>(&self, keywords: I) -> DataSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filtered(&RequiredKeywords::new(keywords))
    }

    /// Stories carrying none of `keywords`.
    pub fn not_keywords<I, S>(&self, keywords: I) -> DataSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filtered(&ExcludedKeywords::new(keywords))
    }

    // Keyword-group filters

    /// Keeps stories hitting at least `n` distinct synonym groups.
    pub fn keyword_hits_min<I, G>(&self, n: usize, groups: I) -> DataSet
    where
        I: IntoIterator<Item = G>,
        G: Into<KeywordGroup>,
    {
        self.keyword_hits_within(Bounds::at_least(n), groups)
    }

    /// Keeps stories hitting at most `n` distinct synonym groups.
    pub fn keyword_hits_max<I, G>(&self, n: usize, groups: I) -> DataSet
    where
        I: IntoIterator<Item = G>,
        G: Into<KeywordGroup>,
    {
        self.keyword_hits_within(Bounds::at_most(n), groups)
    }

    pub fn keyword_hits_range<I, G>(&self, min: usize, max: usize, groups: I) -> DataSet
    where
        I: IntoIterator<Item = G>,
        G: Into<KeywordGroup>,
    {
        self.keyword_hits_within(Bounds::between(min, max), groups)
    }

    fn keyword_hits_within<I, G>(&self, bounds: Bounds<usize>, groups: I) -> DataSet
    where
        I: IntoIterator<Item = G>,
        G: Into<KeywordGroup>,
    {
        self.filtered(&ScoreFilter::new(KeywordGroups::new(groups), bounds))
    }

    /// Keeps stories whose weighted group score is at least `weight`.
    pub fn keyword_weights_min<I, G>(&self, weight: f64, groups: I) -> DataSet
    where
        I: IntoIterator<Item = (G, f64)>,
        G: Into<KeywordGroup>,
    {
        self.keyword_weights_within(Bounds::at_least(weight), groups)
    }

    /// Keeps stories whose weighted group score is at most `weight`.
    pub fn keyword_weights_max<I, G>(&self, weight: f64, groups: I) -> DataSet
    where
        I: IntoIterator<Item = (G, f64)>,
        G: Into<KeywordGroup>,
    {
        self.keyword_weights_within(Bounds::at_most(weight), groups)
    }

    pub fn keyword_weights_range<I, G>(&self, min: f64, max: f64, groups: I) -> DataSet
    where
        I: IntoIterator<Item = (G, f64)>,
        G: Into<KeywordGroup>,
    {
        self.keyword_weights_within(Bounds::between(min, max), groups)
    }

    fn keyword_weights_within<I, G>(&self, bounds: Bounds<f64>, groups: I) -> DataSet
    where
        I: IntoIterator<Item = (G, f64)>,
        G: Into<KeywordGroup>,
    {
        self.filtered(&ScoreFilter::new(WeightedKeywordGroups::new(groups), bounds))
    }

    // Numeric field filters

    pub fn rating_min(&self, rating: f64) -> DataSet {
        self.filtered(&ScoreFilter::new(Rating, Bounds::at_least(rating)))
    }

    pub fn rating_max(&self, rating: f64) -> DataSet {
        self.filtered(&ScoreFilter::new(Rating, Bounds::at_most(rating)))
    }

    pub fn rating_range(&self, min: f64, max: f64) -> DataSet {
        self.filtered(&ScoreFilter::new(Rating, Bounds::between(min, max)))
    }

    pub fn pages_min(&self, n: u32) -> DataSet {
        self.filtered(&ScoreFilter::new(PageCount, Bounds::at_least(n)))
    }

    pub fn pages_max(&self, n: u32) -> DataSet {
        self.filtered(&ScoreFilter::new(PageCount, Bounds::at_most(n)))
    }

    pub fn pages_range(&self, min: u32, max: u32) -> DataSet {
        self.filtered(&ScoreFilter::new(PageCount, Bounds::between(min, max)))
    }

    pub fn words_min(&self, n: u32) -> DataSet {
        self.filtered(&ScoreFilter::new(WordCount, Bounds::at_least(n)))
    }

    pub fn words_max(&self, n: u32) -> DataSet {
        self.filtered(&ScoreFilter::new(WordCount, Bounds::at_most(n)))
    }

    pub fn words_range(&self, min: u32, max: u32) -> DataSet {
        self.filtered(&ScoreFilter::new(WordCount, Bounds::between(min, max)))
    }

    // Sorts

    pub fn sorted_by_max_keyword_hits<I, G>(&self, groups: I, descending: bool) -> DataSet
    where
        I: IntoIterator<Item = G>,
        G: Into<KeywordGroup>,
    {
        self.sorted_by_score(&KeywordGroups::new(groups), descending)
    }

    pub fn sorted_by_max_keywords_weight<I, G>(&self, groups: I, descending: bool) -> DataSet
    where
        I: IntoIterator<Item = (G, f64)>,
        G: Into<KeywordGroup>,
    {
        self.sorted_by_score(&WeightedKeywordGroups::new(groups), descending)
    }

    /// Sorts by rating. With a positive `step`, ratings in the same
    /// `floor(rating / step)` bucket tie and keep their current order.
    pub fn sorted_by_rating(&self, step: Option<f64>, descending: bool) -> DataSet {
        self.sorted_by_score(&QuantizedRating::new(step), descending)
    }

    // Quarantine

    /// Moves stories flagged by the default [`TrailingMarker`] into `broken_stories`.
    pub fn filter_out_broken_stories(&self) -> DataSet {
        self.quarantined(&TrailingMarker::default())
    }

    pub fn quarantined_with_config(&self, config: &QuarantineConfig) -> DataSet {
        self.quarantined(&TrailingMarker::from_config(config))
    }

    pub fn quarantined<D: BrokenStoryDetector + ?Sized>(&self, detector: &D) -> DataSet {
        let mut stories = StoryPool::with_capacity(self.stories.len());
        let mut broken_stories = self.broken_stories.clone();
        for story in &self.stories {
            if detector.is_broken(story) {
                debug!(story = %story.id, "quarantining broken story");
                broken_stories.insert(Arc::clone(story));
            } else {
                stories.insert(Arc::clone(story));
            }
        }
        info!(
            quarantined = broken_stories.len() - self.broken_stories.len(),
            remaining = stories.len(),
            "filtered out broken stories"
        );
        DataSet {
            categories: self.categories.clone(),
            stories,
            broken_stories,
        }
    }

    // Combination and replacement

    /// Dict-style update with another view's stories: ids already present keep
    /// their position and take `other`'s record, new ids are appended. Stories
    /// quarantined in `self` are not re-admitted. Categories missing from
    /// `self` are taken from `other`.
    pub fn united_with(&self, other: &DataSet) -> DataSet {
        let mut stories = self.stories.clone();
        let mut skipped = 0usize;
        for story in &other.stories {
            if self.broken_stories.contains(&story.id) {
                skipped += 1;
                continue;
            }
            stories.insert(Arc::clone(story));
        }
        let mut categories = self.categories.clone();
        for (id, category) in &other.categories {
            categories
                .entry(id.clone())
                .or_insert_with(|| Arc::clone(category));
        }
        debug!(stories = stories.len(), skipped, "united story pools");
        DataSet {
            categories,
            stories,
            broken_stories: self.broken_stories.clone(),
        }
    }

    /// A new snapshot where `story` replaces the record with the same id, in
    /// whichever pool (active or quarantined) holds it. `self` is unchanged.
    pub fn with_replaced_story(&self, story: Story) -> Result<DataSet, LookupError> {
        let story = Arc::new(story);
        if self.stories.contains(&story.id) {
            let mut stories = self.stories.clone();
            stories.insert(story);
            Ok(self.with_stories(stories))
        } else if self.broken_stories.contains(&story.id) {
            let mut broken_stories = self.broken_stories.clone();
            broken_stories.insert(story);
            Ok(DataSet {
                categories: self.categories.clone(),
                stories: self.stories.clone(),
                broken_stories,
            })
        } else {
            Err(LookupError::UnknownStory(story.id.to_string()))
        }
    }

    // Export

    /// Lazily rendered export entries; see [`export::OutputEntries`].
    pub fn output_entries(&self, max_stories: Option<isize>) -> OutputEntries<'_> {
        OutputEntries::new(self.stories.as_slice(), max_stories)
    }

    pub fn dumped_as_output_text(&self, max_stories: Option<isize>) -> Vec<String> {
        self.output_entries(max_stories).collect()
    }

    /// Writes the export to `file_name`, or to the default file in the
    /// current directory.
    pub fn dump_to_output_txt_file(
        &self,
        file_name: Option<&Path>,
        max_stories: Option<isize>,
    ) -> Result<ExportManifest, ExportError> {
        self.dump_to_output_txt_file_with_config(file_name, max_stories, &ExportConfig::default())
    }

    pub fn dump_to_output_txt_file_with_config(
        &self,
        file_name: Option<&Path>,
        max_stories: Option<isize>,
        config: &ExportConfig,
    ) -> Result<ExportManifest, ExportError> {
        let path = export::resolve_output_path(file_name, &config.default_output_file)?;
        export::write_output(&path, self.output_entries(max_stories))
    }
}

/// Total order over a partial one. Values incomparable to themselves sort
/// first and tie with each other, which keeps `sort_by` well defined.
fn total_order<K: PartialOrd>(a: &K, b: &K) -> Ordering {
    let a_valid = a.partial_cmp(a).is_some();
    let b_valid = b.partial_cmp(b).is_some();
    match (a_valid, b_valid) {
        (true, true) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => Ordering::Equal,
    }
}
