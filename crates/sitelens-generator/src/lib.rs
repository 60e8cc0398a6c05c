//! sitelens Generator Library
//!
//! Discovery and artifact generation for an already-built static site.
//!
//! # Modules
//!
//! - [`lastmod`] - Last-modified resolution (git, then file mtime)
//! - [`collector`] - HTML page discovery and record collection
//! - [`html`] - Title, description and content extraction
//! - [`sections`] - Blog page segmentation into anchored sections
//! - [`sitemap`] - XML sitemap generation
//! - [`search`] - JSON search index generation
//! - [`feed`] - Atom feed generation
//! - [`search_page`] - Client-side search page scaffolding
//! - [`robots`] - robots.txt maintenance
//! - [`build`] - Build orchestration

pub mod build;
pub mod collector;
pub mod feed;
pub mod html;
pub mod lastmod;
pub mod robots;
pub mod search;
pub mod search_page;
pub mod sections;
pub mod sitemap;

pub use build::{BuildError, BuildStats, Builder, SiteContent};
pub use collector::ContentCollector;
pub use feed::FeedGenerator;
pub use lastmod::{FileMtime, GitLog, LastModified, ResolverChain, TimestampSource};
pub use robots::{RobotsGenerator, RobotsOutcome};
pub use search::{SearchDocument, SearchIndex};
pub use search_page::SearchPageGenerator;
pub use sections::{Section, SegmentOptions};
pub use sitemap::SitemapGenerator;
