//! Deterministic curation engine for tagged story corpora.
//!
//! `corpus-curator` loads categories and stories from an unpacked dataset
//! directory, then narrows them through chained filters, synonym-group keyword
//! scoring and stable sorts. Every step returns a new immutable [`DataSet`]
//! snapshot. The final view is rendered into a flat text export.
//!
//! ```no_run
//! use corpus_curator::{DataSet, DatasetLoader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = DataSet::load(&DatasetLoader::new("dataset_repo/LitEroticaV2JSON"))?;
//! let picked = db
//!     .with_categories(["Romance"])
//!     .keyword_hits_min(1, [vec!["beach", "ocean"], vec!["summer"]])
//!     .rating_min(4.0)
//!     .filter_out_broken_stories()
//!     .sorted_by_rating(Some(0.25), true);
//! picked.dump_to_output_txt_file(None, None)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dataset;
pub mod export;
pub mod loader;
pub mod paths;
pub mod record;
pub mod scoring;
pub mod types;

pub use config::CurationConfig;
pub use dataset::{DataSet, LookupError, StoryPool};
pub use loader::{DataConsistencyError, DatasetLoader, LoaderError};
pub use record::{Category, ShortStoryMeta, Story, ValidationError};
