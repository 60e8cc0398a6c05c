//! Sitemap generation.
//!
//! Generates a sitemaps.org 0.9 `urlset` with one `<url>` per page.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use sitelens_core::{Config, PageRecord};
use tracing::debug;

/// File name of the sitemap, relative to the site root.
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// Sitemap protocol namespace.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// A sitemap URL entry.
///
/// Ordering is by location, then date, which is the order entries are
/// written in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SitemapUrl {
    /// Absolute URL.
    pub loc: String,

    /// Last modification date.
    pub lastmod: NaiveDate,
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: Config,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate sitemap XML from pages.
    ///
    /// Entries are deduplicated on `(loc, lastmod)` and sorted, so the output
    /// only depends on the set of pages, not their order.
    pub fn generate(&self, pages: &[PageRecord]) -> String {
        let urls: BTreeSet<SitemapUrl> = pages.iter().map(|p| self.page_to_url(p)).collect();

        debug!(pages = pages.len(), urls = urls.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for url in &urls {
            xml.push_str(&url_to_xml(url));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Convert a page to a sitemap URL entry.
    fn page_to_url(&self, page: &PageRecord) -> SitemapUrl {
        SitemapUrl {
            loc: self.config.url_for(&page.url),
            lastmod: page.lastmod,
        }
    }
}

/// Convert a URL entry to XML.
fn url_to_xml(url: &SitemapUrl) -> String {
    let mut xml = String::from("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));
    xml.push_str(&format!(
        "    <lastmod>{}</lastmod>\n",
        url.lastmod.format("%Y-%m-%d")
    ));
    xml.push_str("  </url>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
