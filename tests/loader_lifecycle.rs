use std::fs;
use std::path::Path;

use corpus_curator::config::ExportConfig;
use corpus_curator::loader::{
    load_single_story_text_from_file, load_single_story_text_with_config, DatasetLoader,
    LoaderError,
};
use corpus_curator::record::CategoryId;
use corpus_curator::{DataSet, Story};
use serde_json::{json, Value};
use tempfile::tempdir;

fn write_json(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn story_json(id: &str, category: &str, keywords: &[&str], text: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Title {id}"),
        "url": format!("https://example.org/s/{id}"),
        "category": category,
        "rating": 4.25,
        "description": "",
        "keywords": keywords,
        "text": text,
        "page_count": 2,
        "word_count": 3100,
        "author": "someone",
        "date_approved": "01/02/2020"
    })
}

fn write_dataset(dir: &Path) {
    write_json(
        dir,
        "categories.json",
        &json!({
            "Romance": {
                "category": "Romance",
                "description": "Love stories",
                "url": "https://example.org/c/romance",
                "page_links": ["https://example.org/c/romance?page=2", "https://example.org/c/romance?page=1"]
            },
            "Toys/Masturbation": {
                "category": "Toys/Masturbation",
                "description": "Solo",
                "url": "https://example.org/c/toys"
            }
        }),
    );
    write_json(
        dir,
        "story_list_by_category.json",
        &json!({
            "Romance": ["r1", "r2"],
            "Toys/Masturbation": ["t1", "r1"]
        }),
    );
    write_json(dir, "Romance_keywords_top.json", &json!({ "love": ["r1", "r2"] }));
    write_json(dir, "Toys & Masturbation_keywords_top.json", &json!({ "toy": ["t1"] }));

    let r1 = story_json("r1", "Romance", &["love", "toy"], "First.");
    write_json(
        dir,
        "Romance_stories.json",
        &json!({
            "r2": story_json("r2", "Romance", &["love"], "Second."),
            "r1": r1.clone()
        }),
    );
    write_json(
        dir,
        "Toys & Masturbation_stories.json",
        &json!({
            "t1": story_json("t1", "Toys/Masturbation", &["toy"], "Third."),
            "r1": r1
        }),
    );
}

#[test]
fn test_load_all_categories_and_stories() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());

    let loader = DatasetLoader::new(dir.path());
    let (categories, stories) = loader.load_all().unwrap();

    assert_eq!(categories.len(), 2);
    let toys = categories.values().find(|c| c.category.matches("toys/masturbation")).unwrap();
    assert_eq!(toys.stories.len(), 2);
    assert_eq!(toys.keywords().collect::<Vec<_>>(), vec!["toy"]);

    let romance = categories.values().find(|c| c.category.matches("Romance")).unwrap();
    assert_eq!(
        romance.page_links,
        vec!["https://example.org/c/romance?page=2", "https://example.org/c/romance?page=1"]
    );

    // category order, then story id order within each file; duplicates kept once
    let ids: Vec<&str> = stories.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2", "t1"]);
    assert_eq!(stories[0].page_count(), 2);
    assert_eq!(stories[0].word_count(), 3100);
}

#[test]
fn test_dataset_load_and_query() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());

    let db = DataSet::load(&DatasetLoader::new(dir.path())).unwrap();
    assert_eq!(db.len(), 3);
    assert!(db.broken_stories().is_empty());
    assert_eq!(db.category_keywords("romance").unwrap(), vec!["love"]);

    let toy_words = db.with_keywords_from_categories(["Toys/Masturbation"]).unwrap();
    let ids: Vec<&str> = toy_words.stories().ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "t1"]);
}

#[test]
fn test_conflicting_duplicate_is_consistency_error() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    write_json(
        dir.path(),
        "Toys & Masturbation_stories.json",
        &json!({
            "t1": story_json("t1", "Toys/Masturbation", &["toy"], "Third."),
            "r1": story_json("r1", "Romance", &["love", "toy"], "A different text.")
        }),
    );

    let err = DatasetLoader::new(dir.path()).load_all().unwrap_err();
    match err {
        LoaderError::DataConsistency(conflict) => {
            assert_eq!(conflict.story_id, "r1");
            assert_eq!(conflict.first_category, "Romance");
            assert_eq!(conflict.second_category, "Toys/Masturbation");
        }
        other => panic!("expected a consistency error, got {other:?}"),
    }
}

#[test]
fn test_unknown_category_in_story_index() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    write_json(
        dir.path(),
        "story_list_by_category.json",
        &json!({ "Sci-Fi": ["x1"] }),
    );

    let err = DatasetLoader::new(dir.path()).load_categories().unwrap_err();
    assert!(matches!(err, LoaderError::UnknownCategory(name) if name == "Sci-Fi"));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let err = DatasetLoader::new(dir.path()).load_categories().unwrap_err();
    match err {
        LoaderError::Read { path, .. } => assert!(path.ends_with("categories.json")),
        other => panic!("expected a read error, got {other:?}"),
    }
}

#[test]
fn test_short_metas_and_keyword_index() {
    let dir = tempdir().unwrap();
    write_json(
        dir.path(),
        "story_list.json",
        &json!({
            "r1": {
                "id": "r1",
                "title": "Title r1",
                "url": "https://example.org/s/r1",
                "category": "Romance",
                "rating": 4.25
            }
        }),
    );
    write_json(dir.path(), "keywords_top_overall.json", &json!({ "love": ["r1"] }));

    let loader = DatasetLoader::new(dir.path());
    let metas = loader.load_short_story_metas().unwrap();
    assert_eq!(metas["r1"].category.as_str(), "Romance");
    assert!(metas["r1"].category.matches("romance"));
    assert_eq!(metas["r1"].category, CategoryId::new("ROMANCE").unwrap());
    assert_eq!(metas["r1"].rating, 4.25);

    let index = loader.load_shortened_story_ids_by_keyword().unwrap();
    assert_eq!(index["love"], vec!["r1"]);
}

#[test]
fn test_fixed_story_round_trips_through_category_file() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    let loader = DatasetLoader::new(dir.path());
    let db = DataSet::load(&loader).unwrap();

    let fix_path = dir.path().join("fix.txt");
    fs::write(&fix_path, "Line one.   \r\nLine two.\t\r\n").unwrap();
    let fixed_text = load_single_story_text_from_file(Some(&fix_path)).unwrap();
    assert_eq!(fixed_text, "Line one.\nLine two.");

    let story = Story::clone(db.story("r2").unwrap()).with_text(fixed_text.clone());
    let fixed = db.with_replaced_story(story).unwrap();
    let romance = fixed.with_categories(["Romance"]);
    let category = fixed.category("Romance").unwrap();

    let path = loader
        .dump_stories_to_category_json(category, romance.stories())
        .unwrap();
    assert!(path.ends_with("Romance_stories.json"));
    assert!(!dir.path().join("Romance_stories.json.tmp").exists());

    let reloaded = DataSet::load(&loader).unwrap();
    assert_eq!(reloaded.story("r2").unwrap().text, fixed_text);
    assert_eq!(reloaded.story("r1").unwrap().text, "First.");
    assert_eq!(reloaded.len(), 3);
}

#[test]
fn test_fix_text_with_config_uses_explicit_path() {
    let dir = tempdir().unwrap();
    let fix_path = dir.path().join("other.txt");
    fs::write(&fix_path, "Only line.  \n\n").unwrap();

    let config = ExportConfig {
        default_fix_file: "never-used.txt".to_string(),
        ..ExportConfig::default()
    };
    let text = load_single_story_text_with_config(Some(&fix_path), &config).unwrap();
    assert_eq!(text, "Only line.\n");
}

fn write_cross_listed_dataset(dir: &Path, romance_rating: Value, other_rating: Value) {
    write_json(
        dir,
        "categories.json",
        &json!({
            "Romance": { "category": "Romance", "description": "", "url": "" },
            "Other": { "category": "Other", "description": "", "url": "" }
        }),
    );
    write_json(
        dir,
        "story_list_by_category.json",
        &json!({ "Romance": ["r1"], "Other": ["r1"] }),
    );
    write_json(dir, "Romance_keywords_top.json", &json!({}));
    write_json(dir, "Other_keywords_top.json", &json!({}));

    let mut romance_copy = story_json("r1", "Romance", &["love"], "Text.");
    romance_copy["rating"] = romance_rating;
    let mut other_copy = story_json("r1", "Romance", &["love"], "Text.");
    other_copy["rating"] = other_rating;
    write_json(dir, "Romance_stories.json", &json!({ "r1": romance_copy }));
    write_json(dir, "Other_stories.json", &json!({ "r1": other_copy }));
}

#[test]
fn test_integer_and_float_ratings_are_the_same_data() {
    let dir = tempdir().unwrap();
    write_cross_listed_dataset(dir.path(), json!(4), json!(4.0));

    let (_, stories) = DatasetLoader::new(dir.path()).load_all().unwrap();
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].rating, 4.0);
}

#[test]
fn test_unchanged_dump_of_cross_listed_story_reloads() {
    let dir = tempdir().unwrap();
    write_cross_listed_dataset(dir.path(), json!(4), json!(4));
    let loader = DatasetLoader::new(dir.path());
    let db = DataSet::load(&loader).unwrap();

    let romance = db.with_categories(["Romance"]);
    loader
        .dump_stories_to_category_json(db.category("Romance").unwrap(), romance.stories())
        .unwrap();

    let reloaded = DataSet::load(&loader).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.story("r1").unwrap().rating, 4.0);
}

#[test]
fn test_quarantined_story_is_fixed_on_source_view() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    write_json(
        dir.path(),
        "Romance_stories.json",
        &json!({
            "r2": story_json("r2", "Romance", &["love"], "<nav>junk</nav> COVID-19 RESOURCES\n"),
            "r1": story_json("r1", "Romance", &["love", "toy"], "First.")
        }),
    );
    let loader = DatasetLoader::new(dir.path());
    let db = DataSet::load(&loader).unwrap();

    let cleaned = db.filter_out_broken_stories();
    let broken = Story::clone(cleaned.broken_stories().get("r2").unwrap());
    let name = broken.category.to_string();

    // a fix applied to the quarantined view never reaches its active stories
    let fixed_in_quarantine = cleaned
        .with_replaced_story(broken.clone().with_text("Fixed."))
        .unwrap();
    assert!(fixed_in_quarantine.story("r2").is_none());

    let fixed = db.with_replaced_story(broken.with_text("Fixed.")).unwrap();
    loader
        .dump_stories_to_category_json(
            fixed.category(&name).unwrap(),
            fixed.with_categories([name.as_str()]).stories(),
        )
        .unwrap();

    let reloaded = DataSet::load(&loader).unwrap();
    assert_eq!(reloaded.len(), db.len());
    assert_eq!(reloaded.story("r2").unwrap().text, "Fixed.");
    assert_eq!(reloaded.story("r1").unwrap().text, "First.");
    assert!(reloaded.filter_out_broken_stories().broken_stories().is_empty());
}
