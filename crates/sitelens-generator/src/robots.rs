//! Robots.txt maintenance.
//!
//! Makes sure the site's robots.txt points crawlers at the sitemap without
//! disturbing rules the site author already wrote.

use std::{fmt, fs, path::Path};

use sitelens_core::Config;
use thiserror::Error;
use tracing::{debug, info};

use crate::sitemap::SITEMAP_FILE;

/// File name of the robots file, relative to the site root.
pub const ROBOTS_FILE: &str = "robots.txt";

/// Robots generation errors.
#[derive(Debug, Error)]
pub enum RobotsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for robots generation.
pub type Result<T> = std::result::Result<T, RobotsError>;

/// What [`RobotsGenerator::ensure`] did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RobotsOutcome {
    /// No robots.txt existed; a permissive default was written.
    Created,
    /// The sitemap directive was appended to an existing file.
    Appended,
    /// The file already carried the directive and was not touched.
    #[default]
    Unchanged,
}

impl fmt::Display for RobotsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Appended => "appended",
            Self::Unchanged => "unchanged",
        })
    }
}

/// Robots.txt generator.
#[derive(Debug)]
pub struct RobotsGenerator {
    config: Config,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The `Sitemap:` line for this site.
    pub fn sitemap_directive(&self) -> String {
        format!("Sitemap: {}", self.config.url_for(SITEMAP_FILE))
    }

    /// Ensure `root/robots.txt` references the sitemap.
    pub fn ensure(&self, root: &Path) -> Result<RobotsOutcome> {
        let path = root.join(ROBOTS_FILE);
        let directive = self.sitemap_directive();

        if !path.exists() {
            info!(path = %path.display(), "creating robots.txt");
            fs::write(&path, format!("User-agent: *\nAllow: /\n\n{directive}\n"))?;
            return Ok(RobotsOutcome::Created);
        }

        let bytes = fs::read(&path)?;
        let existing = String::from_utf8_lossy(&bytes);
        if existing.contains(&directive) {
            debug!(path = %path.display(), "robots.txt already references sitemap");
            return Ok(RobotsOutcome::Unchanged);
        }

        info!(path = %path.display(), "appending sitemap to robots.txt");
        fs::write(&path, format!("{}\n\n{directive}\n", existing.trim_end()))?;
        Ok(RobotsOutcome::Appended)
    }
}
