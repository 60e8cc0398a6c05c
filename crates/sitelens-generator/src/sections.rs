//! Blog section segmentation.
//!
//! The blog page is split into addressable sections: every `h1`/`h2`/`h3` or
//! `article` element carrying an `id` becomes one section, titled by its own
//! text and summarized by the text of the block elements that follow it.

use std::{path::Path, sync::LazyLock};

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use sitelens_core::{
    SectionRecord,
    content::{FEED_SUMMARY_LIMIT, SECTION_CONTENT_LIMIT, SECTION_TAGS},
    text::{join_fragments, truncate_chars},
};
use tracing::debug;

use crate::html::{self, HtmlError, element_text};

/// Sibling tags whose text feeds a section snippet.
pub const SNIPPET_TAGS: &[&str] = &["p", "ul", "ol", "pre", "code"];

/// Content used for a search section whose siblings carry no text.
pub const EMPTY_SECTION_CONTENT: &str = "Blog section";

static CANDIDATE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1[id], h2[id], h3[id], article[id]").expect("valid section selector")
});

/// Knobs for one segmentation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentOptions {
    /// Following sibling elements inspected per section.
    pub step_limit: usize,

    /// Snippet length cap in characters.
    pub snippet_limit: usize,

    /// Candidates considered, in document order. Counted before candidates
    /// with an empty id are skipped.
    pub max_candidates: Option<usize>,
}

impl SegmentOptions {
    /// Options for search index sections.
    pub const SEARCH: Self = Self {
        step_limit: 5,
        snippet_limit: SECTION_CONTENT_LIMIT,
        max_candidates: None,
    };

    /// Options for feed entries.
    pub const FEED: Self = Self {
        step_limit: 4,
        snippet_limit: FEED_SUMMARY_LIMIT,
        max_candidates: Some(30),
    };
}

/// One identified section of the blog page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Anchor id.
    pub id: String,

    /// Collapsed element text (may be empty).
    pub title: String,

    /// Sibling text, capped by the pass's snippet limit (may be empty).
    pub snippet: String,
}

/// Segment the blog page at `path`.
///
/// A missing page has no sections.
pub fn segment(path: &Path, options: SegmentOptions) -> Result<Vec<Section>, HtmlError> {
    if !path.is_file() {
        debug!(path = %path.display(), "no blog page, no sections");
        return Ok(Vec::new());
    }
    let source = html::read_lossy(path)?;
    Ok(segment_document(&Html::parse_document(&source), options))
}

/// Segment an already parsed document.
pub fn segment_document(document: &Html, options: SegmentOptions) -> Vec<Section> {
    let limit = options.max_candidates.unwrap_or(usize::MAX);

    document
        .select(&CANDIDATE_SELECTOR)
        .take(limit)
        .filter_map(|element| {
            let id = element.value().attr("id").filter(|id| !id.is_empty())?;
            let snippet = sibling_text(element, options.step_limit, SNIPPET_TAGS);
            Some(Section {
                id: id.to_string(),
                title: element_text(element),
                snippet: truncate_chars(&snippet, options.snippet_limit),
            })
        })
        .collect()
}

/// Text of the elements following `element`.
///
/// Walks at most `step_limit` following sibling elements (text nodes are not
/// steps) and keeps the text of those whose tag is in `allowed_tags`.
pub fn sibling_text(element: ElementRef<'_>, step_limit: usize, allowed_tags: &[&str]) -> String {
    let chunks: Vec<String> = element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take(step_limit)
        .filter(|sibling| allowed_tags.contains(&sibling.value().name()))
        .map(element_text)
        .collect();
    join_fragments(chunks.iter().map(String::as_str))
}

/// Search index records for the blog sections.
///
/// `page_url` is the blog page's site-relative URL.
pub fn search_records(sections: &[Section], page_url: &str, lastmod: NaiveDate) -> Vec<SectionRecord> {
    sections
        .iter()
        .map(|section| SectionRecord {
            url: format!("{page_url}#{}", section.id),
            title: section.title.clone(),
            content: if section.snippet.is_empty() {
                EMPTY_SECTION_CONTENT.to_string()
            } else {
                section.snippet.clone()
            },
            lastmod,
            tags: SECTION_TAGS.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG: &str = r#"<html><body>
        <h1 id="top">Blog</h1>
        <h2 id="xyz">Post   A</h2>
        <p>First paragraph.</p>
        <div>Ignored div</div>
        <ul><li>one</li><li>two</li></ul>
        <h2>No id here</h2>
        <h3 id="">Empty id</h3>
        <article id="art"><h2>Nested</h2><p>Inside</p></article>
        <pre>code block</pre>
    </body></html>"#;

    fn doc(s: &str) -> Html {
        Html::parse_document(s)
    }

    #[test]
    fn test_segment_document_order_and_skips() {
        let sections = segment_document(&doc(BLOG), SegmentOptions::SEARCH);
        let ids: Vec<_> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "xyz", "art"]);

        assert_eq!(sections[1].title, "Post A");
        assert_eq!(sections[2].title, "Nested Inside");
    }

    #[test]
    fn test_sibling_walk_collects_allowed_tags() {
        let sections = segment_document(&doc(BLOG), SegmentOptions::SEARCH);
        // p, div (skipped but counted), ul, h2, h3 -> five steps
        assert_eq!(sections[1].snippet, "First paragraph. one two");
        // article is followed by the pre block
        assert_eq!(sections[2].snippet, "code block");
    }

    #[test]
    fn test_step_limit_is_respected() {
        let html = "<body><h2 id='a'>A</h2><div>1</div><div>2</div><div>3</div><div>4</div><p>fifth</p></body>";
        let document = doc(html);

        let search = segment_document(&document, SegmentOptions::SEARCH);
        assert_eq!(search[0].snippet, "fifth");

        let feed = segment_document(&document, SegmentOptions::FEED);
        assert_eq!(feed[0].snippet, "");
    }

    #[test]
    fn test_sibling_text_ignores_text_nodes() {
        let html = "<body><h2 id='a'>A</h2> loose text <p>kept</p></body>";
        let document = doc(html);
        let selector = Selector::parse("h2").unwrap();
        let heading = document.select(&selector).next().unwrap();

        assert_eq!(sibling_text(heading, 1, SNIPPET_TAGS), "kept");
        assert_eq!(sibling_text(heading, 0, SNIPPET_TAGS), "");
        assert_eq!(sibling_text(heading, 1, &["div"]), "");
    }

    #[test]
    fn test_snippet_caps() {
        let long = "lorem ipsum ".repeat(200);
        let html = format!("<body><h2 id='a'>A</h2><p>{long}</p></body>");
        let document = doc(&html);

        let search = segment_document(&document, SegmentOptions::SEARCH);
        assert_eq!(search[0].snippet.chars().count(), SECTION_CONTENT_LIMIT);

        let feed = segment_document(&document, SegmentOptions::FEED);
        assert_eq!(feed[0].snippet.chars().count(), FEED_SUMMARY_LIMIT);
    }

    #[test]
    fn test_feed_candidate_cap() {
        let mut html = String::from("<body>");
        // The first candidate has an empty id and still counts toward the cap.
        html.push_str("<h2 id=''>skip</h2>");
        for i in 0..40 {
            html.push_str(&format!("<h2 id='s{i}'>Section {i}</h2><p>text {i}</p>"));
        }
        html.push_str("</body>");
        let document = doc(&html);

        assert_eq!(segment_document(&document, SegmentOptions::FEED).len(), 29);
        assert_eq!(segment_document(&document, SegmentOptions::SEARCH).len(), 40);
    }

    #[test]
    fn test_segment_missing_file() {
        let sections = segment(Path::new("/nonexistent/blog.html"), SegmentOptions::SEARCH).unwrap();
        assert!(sections.is_empty());
    }

    #[test]
    fn test_search_records() {
        let sections = vec![
            Section {
                id: "xyz".to_string(),
                title: "Post A".to_string(),
                snippet: "Body".to_string(),
            },
            Section {
                id: "empty".to_string(),
                title: "Post B".to_string(),
                snippet: String::new(),
            },
        ];
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let records = search_records(&sections, "/blog.html", date);

        assert_eq!(records[0].url, "/blog.html#xyz");
        assert_eq!(records[0].content, "Body");
        assert_eq!(records[0].tags, "blog, section");
        assert_eq!(records[1].content, EMPTY_SECTION_CONTENT);
        assert_eq!(records[1].lastmod, date);
    }
}
