//! Page discovery and collection.
//!
//! Walks the site root for HTML files and turns each one into a [`PageRecord`].

use std::{
    collections::BTreeSet,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use sitelens_core::{
    Config, PageRecord,
    content::url_path,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    html::{self, HtmlError},
    lastmod::{LastModError, LastModified},
};

/// File extension of discovered pages.
pub const HTML_EXTENSION: &str = "html";

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// The site root could not be walked.
    #[error("cannot read site root {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Page extraction error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Last-modified lookup error.
    #[error("lastmod error: {0}")]
    LastMod(#[from] LastModError),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Content collector that discovers and extracts HTML pages.
#[derive(Debug)]
pub struct ContentCollector {
    root: PathBuf,
    exclude_dirs: BTreeSet<String>,
}

impl ContentCollector {
    /// Create a new content collector for `root`.
    #[must_use]
    pub fn new(config: &Config, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_dirs: config.scan.exclude_dirs.iter().cloned().collect(),
        }
    }

    /// Site root this collector walks.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover HTML files under the root.
    ///
    /// Returns root-relative paths, deduplicated and sorted. A path is skipped
    /// when any of its segments is an excluded directory name.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_excluded(e.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(CollectorError::Walk {
                        path: self.root.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let path = entry.path();
            if path.extension() != Some(OsStr::new(HTML_EXTENSION)) || !path.is_file() {
                continue;
            }

            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };
            files.insert(relative.to_path_buf());
        }

        debug!(count = files.len(), root = %self.root.display(), "discovered pages");
        Ok(files.into_iter().collect())
    }

    /// Discover and extract every page, in discovery order.
    pub fn collect(&self, resolver: &dyn LastModified) -> Result<Vec<PageRecord>> {
        info!(dir = %self.root.display(), "collecting pages");

        let files = self.discover()?;
        let mut pages = Vec::with_capacity(files.len());

        for relative in &files {
            pages.push(self.page_record(relative, resolver)?);
        }

        info!(pages = pages.len(), "page collection complete");
        Ok(pages)
    }

    /// Build the record for one root-relative page path.
    pub fn page_record(
        &self,
        relative: &Path,
        resolver: &dyn LastModified,
    ) -> Result<PageRecord> {
        let path = self.root.join(relative);
        let info = html::extract(&path)?;
        let lastmod = resolver.last_modified(&path)?.date_naive();
        let url = url_path(relative);

        debug!(%url, title = %info.title, %lastmod, "extracted page");

        Ok(PageRecord {
            url,
            title: info.title,
            description: info.description,
            content: info.content,
            lastmod,
        })
    }

    fn is_excluded(&self, name: &OsStr) -> bool {
        name.to_str()
            .is_some_and(|name| self.exclude_dirs.contains(name))
    }
}
