//! Build orchestration.
//!
//! Coordinates one artifact run over a site root: collect pages, segment the
//! blog page, render every artifact in memory, then write them and scaffold
//! the search page and robots file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::{DateTime, FixedOffset, Utc};
use scraper::Html;
use sitelens_core::{Config, CoreError, FeedEntry, PageRecord, SectionRecord, content::url_path};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    collector::{CollectorError, ContentCollector},
    feed::{FEED_FILE, FeedError, FeedGenerator},
    html::{self, HtmlError},
    lastmod::{LastModError, LastModified, ResolverChain},
    robots::{RobotsError, RobotsGenerator, RobotsOutcome},
    search::{SEARCH_INDEX_FILE, SearchIndex, SearchIndexError},
    search_page::{SearchPageError, SearchPageGenerator},
    sections::{SegmentOptions, search_records, segment_document},
    sitemap::{SITEMAP_FILE, SitemapGenerator},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Blog page read error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Last-modified lookup error.
    #[error("lastmod error: {0}")]
    LastMod(#[from] LastModError),

    /// Search index error.
    #[error("search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),

    /// Feed generation error.
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// Robots error.
    #[error("robots error: {0}")]
    Robots(#[from] RobotsError),

    /// Search page error.
    #[error("search page error: {0}")]
    SearchPage(#[from] SearchPageError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] CoreError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of pages in the sitemap and index.
    pub pages: usize,

    /// Number of blog sections in the index.
    pub sections: usize,

    /// Number of feed entries.
    pub feed_entries: usize,

    /// Whether `search.html` was created by this run.
    pub search_page_created: bool,

    /// What happened to `robots.txt`.
    pub robots: RobotsOutcome,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Everything derived from the site before rendering.
#[derive(Debug, Clone)]
pub struct SiteContent {
    /// One record per discovered page, in discovery order.
    pub pages: Vec<PageRecord>,

    /// Search records for the blog sections, in document order.
    pub sections: Vec<SectionRecord>,

    /// Feed entries for the blog sections.
    pub feed_entries: Vec<FeedEntry>,

    /// Feed-level `updated` instant.
    pub feed_updated: DateTime<FixedOffset>,
}

/// Site builder that orchestrates the artifact run.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    root: PathBuf,
    resolver: Box<dyn LastModified>,
}

impl Builder {
    /// Create a new builder using the configured last-modified chain.
    #[must_use]
    pub fn new(config: Config, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let resolver = Box::new(ResolverChain::from_config(&root, &config.lastmod));
        Self {
            config,
            root,
            resolver,
        }
    }

    /// Replace the last-modified resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn LastModified>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Site root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Collect pages, blog sections and feed entries without writing anything.
    pub fn collect(&self) -> Result<SiteContent> {
        let collector = ContentCollector::new(&self.config, &self.root);
        let pages = collector.collect(self.resolver.as_ref())?;

        let blog_page = Path::new(&self.config.scan.blog_page);
        let blog_path = self.root.join(blog_page);

        if !blog_path.is_file() {
            debug!(path = %blog_path.display(), "no blog page, feed will be empty");
            return Ok(SiteContent {
                pages,
                sections: Vec::new(),
                feed_entries: Vec::new(),
                feed_updated: Utc::now().fixed_offset(),
            });
        }

        let updated = self.resolver.last_modified(&blog_path)?;
        let document = Html::parse_document(&html::read_lossy(&blog_path)?);

        let search_sections = segment_document(&document, SegmentOptions::SEARCH);
        let sections = search_records(&search_sections, &url_path(blog_page), updated.date_naive());

        let feed_sections = segment_document(&document, SegmentOptions::FEED);
        let feed_entries = FeedGenerator::new(self.config.clone())
            .entries(Some(feed_sections.as_slice()), updated);

        info!(
            sections = sections.len(),
            feed_entries = feed_entries.len(),
            "segmented blog page"
        );

        Ok(SiteContent {
            pages,
            sections,
            feed_entries,
            feed_updated: updated,
        })
    }

    /// Execute the full build.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        self.config.validate()?;

        info!(root = %self.root.display(), base_url = self.config.base_url(), "starting build");

        let content = self.collect()?;

        // Render everything before touching the site.
        let sitemap = SitemapGenerator::new(self.config.clone()).generate(&content.pages);
        let index = SearchIndex::from_records(&content.pages, &content.sections).to_json()?;
        let feed = FeedGenerator::new(self.config.clone())
            .generate(&content.feed_entries, content.feed_updated)?;

        self.write_artifact(SITEMAP_FILE, &sitemap)?;
        self.write_artifact(SEARCH_INDEX_FILE, &index)?;
        self.write_artifact(FEED_FILE, &feed)?;

        let search_page_created = SearchPageGenerator::new(self.config.clone()).ensure(&self.root)?;
        let robots = RobotsGenerator::new(self.config.clone()).ensure(&self.root)?;

        let stats = BuildStats {
            pages: content.pages.len(),
            sections: content.sections.len(),
            feed_entries: content.feed_entries.len(),
            search_page_created,
            robots,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            pages = stats.pages,
            sections = stats.sections,
            feed_entries = stats.feed_entries,
            %robots,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    fn write_artifact(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.root.join(name);
        fs::write(&path, contents)?;
        info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
        Ok(())
    }
}
