use std::sync::Arc;

use crate::record::Story;

/// Placed before every entry except the first.
pub const STORY_SEPARATOR: &str = "\n\n----\n\n";

/// Renders one story as
/// `[ Title: <title>;\nTags: <keywords> ]\n***\n<text>`, with title and text
/// trimmed and keywords joined by `", "` in sorted order.
pub fn render_story(story: &Story) -> String {
    let tags = story
        .keywords
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "[ Title: {};\nTags: {} ]\n***\n{}",
        story.title.trim(),
        tags,
        story.text.trim()
    )
}

/// How many entries an export keeps.
///
/// `None` keeps everything, a non-negative value is an upper bound and a
/// negative value drops that many entries from the end.
pub fn output_limit(len: usize, max_stories: Option<isize>) -> usize {
    match max_stories {
        None => len,
        Some(max) if max >= 0 => len.min(max as usize),
        Some(max) => len.saturating_sub(max.unsigned_abs()),
    }
}

/// Lazy sequence of rendered export entries. Entries after the first carry
/// the [`STORY_SEPARATOR`] prefix, so concatenating them gives the full export.
#[derive(Debug, Clone)]
pub struct OutputEntries<'a> {
    stories: std::slice::Iter<'a, Arc<Story>>,
    remaining: usize,
    first: bool,
}

impl<'a> OutputEntries<'a> {
    pub fn new(stories: &'a [Arc<Story>], max_stories: Option<isize>) -> Self {
        Self {
            remaining: output_limit(stories.len(), max_stories),
            stories: stories.iter(),
            first: true,
        }
    }
}

impl Iterator for OutputEntries<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }
        let story = self.stories.next()?;
        self.remaining -= 1;

        let rendered = render_story(story);
        if self.first {
            self.first = false;
            Some(rendered)
        } else {
            Some(format!("{STORY_SEPARATOR}{rendered}"))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for OutputEntries<'_> {}
