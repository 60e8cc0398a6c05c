//! Last-modified resolution.
//!
//! A page's last-modified instant comes from an ordered chain of
//! [`TimestampSource`]s: the first source that answers wins. The default chain
//! asks git for the last commit touching the file and falls back to the file's
//! modification time.

use std::{
    fmt, fs,
    io::Read,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use chrono::{DateTime, FixedOffset, Utc};
use sitelens_core::config::LastModConfig;
use thiserror::Error;
use tracing::{debug, trace};

/// Last-modified lookup errors.
#[derive(Debug, Error)]
pub enum LastModError {
    /// IO error while reading file metadata.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No source in the chain produced a timestamp.
    #[error("no timestamp source answered for {0}")]
    Unresolved(PathBuf),
}

/// Result type for last-modified lookups.
pub type Result<T> = std::result::Result<T, LastModError>;

/// Anything that can tell when a file last changed.
pub trait LastModified: fmt::Debug {
    /// Resolve the last-modified instant of `path`.
    fn last_modified(&self, path: &Path) -> Result<DateTime<FixedOffset>>;
}

/// One strategy in a [`ResolverChain`].
pub trait TimestampSource: fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// `Ok(None)` hands the lookup to the next source in the chain.
    fn timestamp(&self, path: &Path) -> Result<Option<DateTime<FixedOffset>>>;
}

/// Committer date of the most recent commit touching a file.
#[derive(Debug, Clone)]
pub struct GitLog {
    repo_root: PathBuf,
    timeout: Duration,
}

const GIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

impl GitLog {
    /// Create a git source running inside `repo_root`.
    ///
    /// The root is made absolute so that lookups do not depend on the
    /// process working directory.
    #[must_use]
    pub fn new(repo_root: impl Into<PathBuf>, timeout: Duration) -> Self {
        let repo_root = repo_root.into();
        Self {
            repo_root: fs::canonicalize(&repo_root).unwrap_or(repo_root),
            timeout,
        }
    }

    /// Directory git runs in.
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Run `git log -1 --format=%cI` and return its stdout, or `None` on any
    /// failure including the timeout.
    fn run(&self, path: &Path) -> Option<String> {
        // `path` is relative to the process, git runs in `repo_root`.
        let path = fs::canonicalize(path)
            .map_err(|e| trace!(error = %e, path = %path.display(), "cannot resolve path for git"))
            .ok()?;

        let mut child = Command::new("git")
            .args(["log", "-1", "--format=%cI", "--"])
            .arg(&path)
            .current_dir(&self.repo_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| trace!(error = %e, "git unavailable"))
            .ok()?;

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) if status.success() => break,
                Ok(Some(status)) => {
                    trace!(%status, path = %path.display(), "git log failed");
                    return None;
                }
                Ok(None) if Instant::now() >= deadline => {
                    debug!(path = %path.display(), timeout = ?self.timeout, "git log timed out");
                    if let Err(e) = child.kill() {
                        trace!(error = %e, "failed to kill git");
                    }
                    if let Err(e) = child.wait() {
                        trace!(error = %e, "failed to reap git");
                    }
                    return None;
                }
                Ok(None) => thread::sleep(GIT_POLL_INTERVAL),
                Err(e) => {
                    trace!(error = %e, "failed to poll git");
                    return None;
                }
            }
        }

        let mut out = String::new();
        child.stdout.take()?.read_to_string(&mut out).ok()?;
        Some(out)
    }
}

impl TimestampSource for GitLog {
    fn name(&self) -> &'static str {
        "git"
    }

    fn timestamp(&self, path: &Path) -> Result<Option<DateTime<FixedOffset>>> {
        let Some(out) = self.run(path) else {
            return Ok(None);
        };
        let out = out.trim();
        if out.is_empty() {
            return Ok(None);
        }
        Ok(DateTime::parse_from_rfc3339(out).ok())
    }
}

/// File modification time, interpreted as UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMtime;

impl TimestampSource for FileMtime {
    fn name(&self) -> &'static str {
        "mtime"
    }

    fn timestamp(&self, path: &Path) -> Result<Option<DateTime<FixedOffset>>> {
        let modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|source| LastModError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Some(DateTime::<Utc>::from(modified).fixed_offset()))
    }
}

/// Ordered list of timestamp sources; first answer wins.
#[derive(Debug, Default)]
pub struct ResolverChain {
    sources: Vec<Box<dyn TimestampSource>>,
}

impl ResolverChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source to the end of the chain.
    #[must_use]
    pub fn with_source(mut self, source: impl TimestampSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Build the default chain for a site root: git (when enabled) then mtime.
    #[must_use]
    pub fn from_config(root: &Path, config: &LastModConfig) -> Self {
        let mut chain = Self::new();
        if config.git {
            chain = chain.with_source(GitLog::new(
                root,
                Duration::from_millis(config.git_timeout_ms),
            ));
        }
        chain.with_source(FileMtime)
    }

    /// Names of the configured sources, in order.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

impl LastModified for ResolverChain {
    fn last_modified(&self, path: &Path) -> Result<DateTime<FixedOffset>> {
        for source in &self.sources {
            if let Some(ts) = source.timestamp(path)? {
                trace!(source = source.name(), path = %path.display(), %ts, "resolved lastmod");
                return Ok(ts);
            }
            debug!(source = source.name(), path = %path.display(), "no timestamp, trying next source");
        }
        Err(LastModError::Unresolved(path.to_path_buf()))
    }
}
