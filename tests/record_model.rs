use std::collections::HashSet;

use corpus_curator::record::{Category, CategoryRecord, Story, StoryRecord, ValidationError};

fn make_story(id: &str) -> Story {
    Story::new(id, "Title", "https://example.com/s/x", "Romance", 4.5, "desc")
        .unwrap()
        .with_keywords(["beach", "summer", "ocean"])
        .with_text("Once upon a time.")
        .with_author("someone")
        .with_date_approved("01/02/2020")
}

#[test]
fn invariant_empty_identifiers_rejected() {
    let result = Story::new("", "T", "", "Romance", 1.0, "");
    assert!(matches!(result, Err(ValidationError::EmptyIdentifier { field: "id" })));

    let result = Story::new("s", "T", "", "", 1.0, "");
    assert!(matches!(result, Err(ValidationError::EmptyIdentifier { field: "category" })));

    let result = Category::new("", "d", "u");
    assert!(matches!(result, Err(ValidationError::EmptyIdentifier { field: "category" })));
}

#[test]
fn invariant_counts_must_be_positive() {
    let story = make_story("s");
    assert!(matches!(
        story.clone().with_counts(0, 10),
        Err(ValidationError::NonPositiveCount { field: "page_count", value: 0 })
    ));
    assert!(matches!(
        story.clone().with_counts(1, -3),
        Err(ValidationError::NonPositiveCount { field: "word_count", value: -3 })
    ));
    assert!(matches!(
        story.clone().with_counts(1, i64::from(u32::MAX) + 1),
        Err(ValidationError::CountOutOfRange { field: "word_count", .. })
    ));
    assert!(story.clone().with_counts(1, i64::from(u32::MAX)).is_ok());

    let story = story.with_counts(3, 1200).unwrap();
    assert_eq!(story.page_count(), 3);
    assert_eq!(story.word_count(), 1200);
}

#[test]
fn invariant_defaults_on_construction() {
    let story = Story::new("s", "T", "", "Romance", 1.0, "").unwrap();
    assert_eq!(story.page_count(), 1);
    assert_eq!(story.word_count(), 1);
    assert!(story.keywords.is_empty());
    assert_eq!(story.text, "");
    assert_eq!(story.author, "");
}

#[test]
fn invariant_identity_is_case_insensitive() {
    let a = make_story("Late-Night");
    let b = make_story("late-night").with_text("different body");
    assert_eq!(a, b);

    let set: HashSet<Story> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);

    let c1 = Category::new("Gay Male", "x", "u1").unwrap();
    let c2 = Category::new("gay male", "y", "u2").unwrap();
    assert_eq!(c1, c2);
}

#[test]
fn invariant_story_round_trip() {
    let story = make_story("s-1").with_counts(2, 900).unwrap();
    let value = story.to_json_value().unwrap();
    let back = Story::from_json_value(value).unwrap();

    assert_eq!(back, story);
    assert_eq!(back.to_record(), story.to_record());
    assert_eq!(back.keywords, story.keywords);
}

#[test]
fn invariant_category_round_trip() {
    let category = Category::new("Toys/Masturbation", "desc", "https://example.com/c")
        .unwrap()
        .with_stories(["b", "a"])
        .unwrap()
        .with_keyword_index([("solo", vec!["b", "a"]), ("toy", vec!["a"])])
        .unwrap()
        .with_page_links(["p2", "p1"]);

    let back = Category::from_json_value(category.to_json_value().unwrap()).unwrap();
    assert_eq!(back, category);
    assert_eq!(back.to_record(), category.to_record());
    // page links keep their order, they are not a set
    assert_eq!(back.page_links, vec!["p2", "p1"]);
    assert_eq!(back.keywords().collect::<Vec<_>>(), vec!["solo", "toy"]);
}

#[test]
fn invariant_missing_optional_fields_take_defaults() {
    let raw = serde_json::json!({
        "id": "s",
        "title": "T",
        "url": "",
        "category": "Romance",
        "rating": 4.0,
        "description": ""
    });
    let story = Story::from_json_value(raw).unwrap();
    assert_eq!(story.page_count(), 1);
    assert!(story.keywords.is_empty());

    let record: CategoryRecord = serde_json::from_value(serde_json::json!({
        "category": "Romance",
        "description": "",
        "url": ""
    }))
    .unwrap();
    let category = Category::from_record(record).unwrap();
    assert!(category.stories.is_empty());
}

#[test]
fn invariant_invalid_json_record_is_rejected() {
    let raw = serde_json::json!({
        "id": "s",
        "title": "T",
        "url": "",
        "category": "Romance",
        "rating": 4.0,
        "description": "",
        "page_count": 0
    });
    assert!(Story::from_json_value(raw.clone()).is_err());
    assert!(serde_json::from_value::<Story>(raw).is_err());

    let record: StoryRecord = serde_json::from_value(serde_json::json!({
        "id": "",
        "title": "T",
        "url": "",
        "category": "Romance",
        "rating": 4.0,
        "description": ""
    }))
    .unwrap();
    assert!(Story::from_record(record).is_err());
}
