//! Site configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Prefix for environment variable overrides (e.g. `SITELENS_SITE__BASE_URL`).
pub const ENV_PREFIX: &str = "SITELENS";

/// Main configuration structure for sitelens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Page discovery settings.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Last-modified lookup settings.
    #[serde(default)]
    pub lastmod: LastModConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Canonical site URL (scheme and host, e.g. "https://example.com").
    #[serde(default)]
    pub base_url: String,

    /// Site title, used for the feed and the search page.
    #[serde(default = "default_title")]
    pub title: String,

    /// Feed subtitle.
    #[serde(default)]
    pub description: Option<String>,

    /// Feed author name; the feed falls back to the site title.
    #[serde(default)]
    pub author: Option<String>,
}

/// Page discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Root-relative path of the page segmented into blog sections.
    #[serde(default = "default_blog_page")]
    pub blog_page: String,

    /// Directory names excluded anywhere in a page's relative path.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

/// Last-modified lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastModConfig {
    /// Ask git for the last commit date before falling back to file mtime.
    #[serde(default = "default_true")]
    pub git: bool,

    /// Upper bound for a single git invocation, in milliseconds.
    #[serde(default = "default_git_timeout_ms")]
    pub git_timeout_ms: u64,
}

// Default value functions
fn default_title() -> String {
    "Blog".to_string()
}

fn default_blog_page() -> String {
    "blog.html".to_string()
}

fn default_exclude_dirs() -> Vec<String> {
    [
        ".git",
        ".github",
        "node_modules",
        "vendor",
        "dist",
        "build",
        "assets",
        "images",
        "img",
        "css",
        "js",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

fn default_true() -> bool {
    true
}

fn default_git_timeout_ms() -> u64 {
    2000
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            title: default_title(),
            description: None,
            author: None,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            blog_page: default_blog_page(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

impl Default for LastModConfig {
    fn default() -> Self {
        Self {
            git: true,
            git_timeout_ms: default_git_timeout_ms(),
        }
    }
}

impl Config {
    /// Create a default configuration for the given site URL.
    pub fn with_base_url(base_url: &str) -> Self {
        let mut config = Self::default();
        config.set_base_url(base_url);
        config
    }

    /// Load configuration from an optional TOML file layered with
    /// `SITELENS_*` environment variables.
    ///
    /// The result is not validated; callers apply overrides first and then
    /// call [`Config::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(CoreError::config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("scan.exclude_dirs"),
            )
            .build()
            .map_err(|e| {
                CoreError::config_with_source(
                    match path {
                        Some(p) => format!("Failed to load config file: {}", p.display()),
                        None => "Failed to load configuration from environment".to_string(),
                    },
                    e,
                )
            })?;

        let mut config: Config = settings.try_deserialize()?;
        let base_url = config.site.base_url.clone();
        config.set_base_url(&base_url);
        Ok(config)
    }

    /// Set the site URL, dropping any trailing slashes.
    pub fn set_base_url(&mut self, base_url: &str) {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.len() != base_url.trim().len() {
            tracing::warn!(base_url, "site.base_url should not have a trailing slash");
        }
        self.site.base_url = trimmed.to_string();
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.base_url.is_empty() {
            return Err(CoreError::config(
                "site.base_url is required (pass --site-url or set it in the config file)",
            ));
        }

        if !(self.site.base_url.starts_with("http://") || self.site.base_url.starts_with("https://"))
        {
            return Err(CoreError::config(format!(
                "site.base_url must start with http:// or https://, got {}",
                self.site.base_url
            )));
        }

        if self.scan.blog_page.trim().is_empty() {
            return Err(CoreError::config("scan.blog_page cannot be empty"));
        }

        if self.lastmod.git && self.lastmod.git_timeout_ms == 0 {
            tracing::warn!("lastmod.git_timeout_ms is 0; every git lookup will fall back to file mtime");
        }

        Ok(())
    }

    /// Site URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.base_url())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[site]
base_url = "https://example.com/"
title = "Security Notes"
description = "Walkthroughs and tools"
author = "Jane Doe"

[scan]
blog_page = "posts/index.html"
exclude_dirs = [".git", "drafts"]

[lastmod]
git = false
git_timeout_ms = 500
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("sitelens.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(Some(&config_path)).expect("load config");

        assert_eq!(config.site.base_url, "https://example.com");
        assert_eq!(config.site.title, "Security Notes");
        assert_eq!(config.site.description.as_deref(), Some("Walkthroughs and tools"));
        assert_eq!(config.site.author.as_deref(), Some("Jane Doe"));
        assert_eq!(config.scan.blog_page, "posts/index.html");
        assert_eq!(config.scan.exclude_dirs, vec![".git", "drafts"]);
        assert!(!config.lastmod.git);
        assert_eq!(config.lastmod.git_timeout_ms, 500);
        config.validate().expect("valid config");
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("sitelens.toml");
        std::fs::write(&config_path, "[site]\nbase_url = \"https://example.com\"\n")
            .expect("write");

        let config = Config::load(Some(&config_path)).expect("load config");

        assert_eq!(config.site.title, "Blog");
        assert!(config.site.description.is_none());
        assert_eq!(config.scan.blog_page, "blog.html");
        assert!(config.scan.exclude_dirs.iter().any(|d| d == "node_modules"));
        assert_eq!(config.scan.exclude_dirs.len(), 11);
        assert!(config.lastmod.git);
        assert_eq!(config.lastmod.git_timeout_ms, 2000);
    }

    #[test]
    fn test_url_for() {
        let config = Config::with_base_url("https://example.com/");

        assert_eq!(config.base_url(), "https://example.com");
        assert_eq!(config.url_for("/blog.html"), "https://example.com/blog.html");
        assert_eq!(config.url_for("blog.html"), "https://example.com/blog.html");
        assert_eq!(config.url_for(""), "https://example.com/");
    }

    #[test]
    fn test_validation_requires_base_url() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url is required"));
    }

    #[test]
    fn test_validation_rejects_missing_scheme() {
        let config = Config::with_base_url("example.com");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http:// or https://"));
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Some(Path::new("/nonexistent/sitelens.toml")));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
