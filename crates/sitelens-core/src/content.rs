//! Records derived from the site's HTML pages.
//!
//! Every record is rebuilt from the file system on each run; none of them are
//! persisted except through the generated artifacts.

use std::path::{Component, Path};

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Maximum characters kept in a page's content snippet.
pub const PAGE_CONTENT_LIMIT: usize = 2000;

/// Maximum characters kept in a blog section's search snippet.
pub const SECTION_CONTENT_LIMIT: usize = 600;

/// Maximum characters kept in a feed entry summary.
pub const FEED_SUMMARY_LIMIT: usize = 500;

/// Tags attached to every blog section search record.
pub const SECTION_TAGS: &str = "blog, section";

/// One record per discovered HTML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Site-root-relative URL with a leading slash (e.g. `/posts/a.html`).
    pub url: String,

    /// Document title, or the file stem when the document has none.
    pub title: String,

    /// Meta description, possibly empty.
    pub description: String,

    /// Plain-text snippet of the page body.
    pub content: String,

    /// Last modification date.
    pub lastmod: NaiveDate,
}

/// One record per identified heading or article on the blog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Blog page URL plus `#` and the anchor id.
    pub url: String,

    /// Collapsed text of the heading/article element.
    pub title: String,

    /// Text gathered from the element's following siblings.
    pub content: String,

    /// Last modification date of the blog page.
    pub lastmod: NaiveDate,

    /// Fixed tag list for section records.
    pub tags: String,
}

/// One Atom feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Entry title.
    pub title: String,

    /// Absolute entry URL.
    pub url: String,

    /// Entry id (equal to `url`).
    pub id: String,

    /// Update instant.
    pub updated: DateTime<FixedOffset>,

    /// Publication instant. There is no separate creation-time source, so this
    /// always equals `updated`.
    pub published: DateTime<FixedOffset>,

    /// Plain-text summary.
    pub summary: String,
}

impl FeedEntry {
    /// Create an entry whose id, updated and published fields follow from
    /// `url` and `updated`.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        updated: DateTime<FixedOffset>,
        summary: impl Into<String>,
    ) -> Self {
        let url = url.into();
        Self {
            title: title.into(),
            id: url.clone(),
            url,
            updated,
            published: updated,
            summary: summary.into(),
        }
    }
}

/// Convert a root-relative file path to a site URL path.
///
/// Separators are always forward slashes regardless of the host platform.
///
/// ```
/// use std::path::Path;
/// use sitelens_core::content::url_path;
///
/// assert_eq!(url_path(Path::new("posts/hello.html")), "/posts/hello.html");
/// ```
pub fn url_path(relative: &Path) -> String {
    let segments: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("/{}", segments.join("/"))
}
