//! Atom feed generation.
//!
//! Entries come from the blog page's sections. A blog page without sections
//! still produces one entry pointing at the page itself; a site without a blog
//! page produces an empty feed.

use atom_syndication::{Entry, Feed, Link, Person, Text};
use chrono::{DateTime, FixedOffset};
use sitelens_core::{Config, FeedEntry};
use thiserror::Error;
use tracing::debug;

use crate::sections::Section;

/// File name of the feed, relative to the site root.
pub const FEED_FILE: &str = "feed.xml";

/// Title of the entry used when the blog page has no sections.
pub const FALLBACK_TITLE: &str = "Blog update";

/// Summary of the entry used when the blog page has no sections.
pub const FALLBACK_SUMMARY: &str = "New content on the blog.";

/// Summary used for a section without sibling text.
pub const EMPTY_SUMMARY: &str = "Blog update";

/// Feed generation errors.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Atom serialization error.
    #[error("Atom error: {0}")]
    Atom(#[from] atom_syndication::Error),

    /// The writer produced invalid UTF-8.
    #[error("feed is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Atom feed generator.
#[derive(Debug)]
pub struct FeedGenerator {
    config: Config,
}

impl FeedGenerator {
    /// Create a new feed generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Derive feed entries from the blog page's sections.
    ///
    /// `sections` is `None` when there is no blog page.
    pub fn entries(
        &self,
        sections: Option<&[Section]>,
        updated: DateTime<FixedOffset>,
    ) -> Vec<FeedEntry> {
        let Some(sections) = sections else {
            return Vec::new();
        };

        let blog_url = self.config.url_for(&self.config.scan.blog_page);

        let mut entries: Vec<_> = sections
            .iter()
            .map(|section| {
                let title = if section.title.is_empty() {
                    format!("Post: {}", section.id)
                } else {
                    section.title.clone()
                };
                let summary = if section.snippet.is_empty() {
                    EMPTY_SUMMARY
                } else {
                    section.snippet.as_str()
                };
                FeedEntry::new(title, format!("{blog_url}#{}", section.id), updated, summary)
            })
            .collect();

        if entries.is_empty() {
            debug!("blog page has no sections, using fallback entry");
            entries.push(FeedEntry::new(
                FALLBACK_TITLE,
                blog_url,
                updated,
                FALLBACK_SUMMARY,
            ));
        }

        entries
    }

    /// Generate the Atom document.
    pub fn generate(&self, entries: &[FeedEntry], updated: DateTime<FixedOffset>) -> Result<String> {
        debug!(count = entries.len(), "generating Atom feed");

        let site = &self.config.site;
        let mut feed = Feed::default();

        feed.set_title(Text::plain(site.title.clone()));
        if let Some(description) = &site.description {
            feed.set_subtitle(Text::plain(description.clone()));
        }
        feed.set_links(vec![
            link(self.config.url_for(FEED_FILE), Some("self")),
            link(self.config.url_for("/"), None),
        ]);
        feed.set_updated(updated);
        feed.set_id(self.config.url_for("/"));
        // Atom requires an author; entries inherit the feed's.
        let mut person = Person::default();
        person.set_name(site.author.clone().unwrap_or_else(|| site.title.clone()));
        feed.set_authors(vec![person]);
        feed.set_entries(entries.iter().map(to_atom_entry).collect::<Vec<_>>());

        let bytes = feed.write_to(Vec::new())?;
        Ok(String::from_utf8(bytes)?)
    }
}

fn link(href: String, rel: Option<&str>) -> Link {
    let mut link = Link::default();
    link.set_href(href);
    if let Some(rel) = rel {
        link.set_rel(rel);
    }
    link
}

fn to_atom_entry(entry: &FeedEntry) -> Entry {
    let mut atom = Entry::default();
    atom.set_title(Text::plain(entry.title.clone()));
    atom.set_links(vec![link(entry.url.clone(), None)]);
    atom.set_id(entry.id.clone());
    atom.set_updated(entry.updated);
    atom.set_published(Some(entry.published));
    atom.set_summary(Some(Text::html(entry.summary.clone())));
    atom
}
