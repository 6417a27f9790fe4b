//! Story predicates used with [`DataSet::filtered`](super::DataSet::filtered).
//!
//! Each filter is a small value holding its comparison parameters. Any
//! `Fn(&Story) -> bool` closure is a predicate too.

use std::collections::BTreeSet;

use crate::record::Story;
use crate::scoring::{
    KeywordGroups, PageCount, Rating, StoryScorer, WeightedKeywordGroups, WordCount,
};

pub trait StoryPredicate {
    fn matches(&self, story: &Story) -> bool;
}

impl<F> StoryPredicate for F
where
    F: Fn(&Story) -> bool,
{
    fn matches(&self, story: &Story) -> bool {
        self(story)
    }
}

/// Allow-list or deny-list mode for set-membership filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Include,
    Exclude,
}

impl Membership {
    fn apply(self, is_member: bool) -> bool {
        match self {
            Membership::Include => is_member,
            Membership::Exclude => !is_member,
        }
    }
}

/// Inclusive range. A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn at_least(min: T) -> Self {
        Bounds { min: Some(min), max: None }
    }

    pub fn at_most(max: T) -> Self {
        Bounds { min: None, max: Some(max) }
    }

    pub fn between(min: T, max: T) -> Self {
        Bounds { min: Some(min), max: Some(max) }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.map_or(true, |min| min <= value) && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone)]
pub struct AuthorFilter {
    authors: BTreeSet<String>,
    membership: Membership,
}

impl AuthorFilter {
    pub fn new<I, S>(authors: I, membership: Membership) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authors: authors.into_iter().map(Into::into).collect(),
            membership,
        }
    }
}

impl StoryPredicate for AuthorFilter {
    fn matches(&self, story: &Story) -> bool {
        self.membership.apply(self.authors.contains(&story.author))
    }
}

/// Category names are matched case-insensitively.
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    keys: BTreeSet<String>,
    membership: Membership,
}

impl CategoryFilter {
    pub fn new<I, S>(categories: I, membership: Membership) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: categories
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
            membership,
        }
    }
}

impl StoryPredicate for CategoryFilter {
    fn matches(&self, story: &Story) -> bool {
        self.membership.apply(self.keys.contains(story.category.key()))
    }
}

/// Matches stories tagged with at least one keyword of a vocabulary.
#[derive(Debug, Clone)]
pub struct KeywordVocabularyFilter {
    vocabulary: BTreeSet<String>,
    membership: Membership,
}

impl KeywordVocabularyFilter {
    pub fn new<I, S>(vocabulary: I, membership: Membership) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: vocabulary.into_iter().map(Into::into).collect(),
            membership,
        }
    }
}

impl StoryPredicate for KeywordVocabularyFilter {
    fn matches(&self, story: &Story) -> bool {
        let hit = story
            .keywords
            .iter()
            .any(|keyword| self.vocabulary.contains(keyword));
        self.membership.apply(hit)
    }
}

/// Story must carry every listed keyword.
#[derive(Debug, Clone)]
pub struct RequiredKeywords(BTreeSet<String>);

impl RequiredKeywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keywords.into_iter().map(Into::into).collect())
    }
}

impl StoryPredicate for RequiredKeywords {
    fn matches(&self, story: &Story) -> bool {
        self.0.is_subset(&story.keywords)
    }
}

/// Story must carry none of the listed keywords.
#[derive(Debug, Clone)]
pub struct ExcludedKeywords(BTreeSet<String>);

impl ExcludedKeywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keywords.into_iter().map(Into::into).collect())
    }
}

impl StoryPredicate for ExcludedKeywords {
    fn matches(&self, story: &Story) -> bool {
        self.0.is_disjoint(&story.keywords)
    }
}

/// Keeps stories whose score falls inside inclusive bounds.
#[derive(Debug, Clone)]
pub struct ScoreFilter<S: StoryScorer> {
    scorer: S,
    bounds: Bounds<S::Score>,
}

impl<S: StoryScorer> ScoreFilter<S> {
    pub fn new(scorer: S, bounds: Bounds<S::Score>) -> Self {
        Self { scorer, bounds }
    }
}

impl<S: StoryScorer> StoryPredicate for ScoreFilter<S> {
    fn matches(&self, story: &Story) -> bool {
        self.bounds.contains(self.scorer.score(story))
    }
}

pub type HitCountFilter = ScoreFilter<KeywordGroups>;
pub type WeightFilter = ScoreFilter<WeightedKeywordGroups>;
pub type RatingFilter = ScoreFilter<Rating>;
pub type PageCountFilter = ScoreFilter<PageCount>;
pub type WordCountFilter = ScoreFilter<WordCount>;
