//! Search index generation.
//!
//! The index is a flat JSON array that the search page loads into lunr. Pages
//! come first, in discovery order, followed by the blog sections in document
//! order.

use serde::{Deserialize, Serialize};
use sitelens_core::{PageRecord, SectionRecord};
use thiserror::Error;
use tracing::info;

/// File name of the search index, relative to the site root.
pub const SEARCH_INDEX_FILE: &str = "search_index.json";

/// Search index errors.
#[derive(Debug, Error)]
pub enum SearchIndexError {
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for search index operations.
pub type Result<T> = std::result::Result<T, SearchIndexError>;

/// One searchable document.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Site-relative URL, used as the lunr ref.
    pub url: String,

    /// Title field.
    pub title: String,

    /// Body snippet field.
    pub content: String,

    /// Comma-separated tags; empty for whole pages.
    pub tags: String,

    /// Last modification date, `YYYY-MM-DD`.
    pub lastmod: String,
}

impl From<&PageRecord> for SearchDocument {
    fn from(page: &PageRecord) -> Self {
        Self {
            url: page.url.clone(),
            title: page.title.clone(),
            content: page.content.clone(),
            tags: String::new(),
            lastmod: page.lastmod.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&SectionRecord> for SearchDocument {
    fn from(section: &SectionRecord) -> Self {
        Self {
            url: section.url.clone(),
            title: section.title.clone(),
            content: section.content.clone(),
            tags: section.tags.clone(),
            lastmod: section.lastmod.format("%Y-%m-%d").to_string(),
        }
    }
}

/// The complete search index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchIndex {
    /// All indexed documents.
    pub documents: Vec<SearchDocument>,
}

impl SearchIndex {
    /// Build an index from page records followed by section records.
    pub fn from_records(pages: &[PageRecord], sections: &[SectionRecord]) -> Self {
        let documents: Vec<_> = pages
            .iter()
            .map(SearchDocument::from)
            .chain(sections.iter().map(SearchDocument::from))
            .collect();

        info!(
            pages = pages.len(),
            sections = sections.len(),
            "built search index"
        );

        Self { documents }
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the index has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 5).unwrap()
    }

    fn page(url: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            title: "Home".to_string(),
            description: String::new(),
            content: "Welcome".to_string(),
            lastmod: date(),
        }
    }

    fn section(url: &str) -> SectionRecord {
        SectionRecord {
            url: url.to_string(),
            title: "Post A".to_string(),
            content: "Body".to_string(),
            lastmod: date(),
            tags: "blog, section".to_string(),
        }
    }

    #[test]
    fn test_pages_then_sections() {
        let index = SearchIndex::from_records(
            &[page("/blog.html"), page("/index.html")],
            &[section("/blog.html#xyz")],
        );

        let urls: Vec<_> = index.documents.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(urls, vec!["/blog.html", "/index.html", "/blog.html#xyz"]);
        assert_eq!(index.documents[0].tags, "");
        assert_eq!(index.documents[2].tags, "blog, section");
    }

    #[test]
    fn test_key_order_and_format() {
        let index = SearchIndex::from_records(&[page("/index.html")], &[]);
        let json = index.to_json().unwrap();

        let expected = r#"[
  {
    "url": "/index.html",
    "title": "Home",
    "content": "Welcome",
    "tags": "",
    "lastmod": "2024-04-05"
  }
]"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_empty_index() {
        let index = SearchIndex::from_records(&[], &[]);
        assert!(index.is_empty());
        assert_eq!(index.to_json().unwrap(), "[]");
    }

    #[test]
    fn test_json_escapes_content() {
        let mut p = page("/index.html");
        p.content = "say \"hi\" <now>".to_string();
        let json = SearchIndex::from_records(&[p], &[]).to_json().unwrap();

        let parsed: Vec<SearchDocument> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].content, "say \"hi\" <now>");
    }
}
