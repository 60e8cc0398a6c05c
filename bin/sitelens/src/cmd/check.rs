//! Check command - validate configuration and preview what would be indexed

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
use sitelens_generator::Builder;

use super::load_config;

/// Run the check command.
///
/// Validates the configuration, then discovers pages and blog sections
/// without writing anything.
pub fn run(config_path: Option<&Path>, root: &Path, site_url: Option<&str>) -> Result<()> {
    tracing::info!(?config_path, ?root, "Checking configuration and site");

    println!("Checking configuration...");
    let config = load_config(config_path, site_url)?;
    if let Err(e) = config.validate() {
        println!("  ✗ Configuration invalid: {e}");
        bail!("Configuration invalid: {e}");
    }
    println!("  ✓ Configuration valid");
    println!("  Site URL:  {}", config.base_url());
    println!("  Blog page: {}", config.scan.blog_page);

    let blog_page = root.join(&config.scan.blog_page);
    let builder = Builder::new(config, root);
    println!("  Lastmod:   {}", lastmod_label(builder.config()));

    println!("\nScanning {}...", root.display());
    let content = builder.collect().wrap_err("Failed to scan site")?;

    for page in &content.pages {
        println!("  {} ({})", page.url, page.title);
    }

    if !blog_page.is_file() {
        println!("\n  ⚠ Blog page {} not found; the feed will be empty", blog_page.display());
    }

    println!();
    println!("Summary:");
    println!("  Pages:        {}", content.pages.len());
    println!("  Sections:     {}", content.sections.len());
    println!("  Feed entries: {}", content.feed_entries.len());

    Ok(())
}

fn lastmod_label(config: &sitelens_core::Config) -> String {
    if config.lastmod.git {
        format!("git ({} ms timeout), then file mtime", config.lastmod.git_timeout_ms)
    } else {
        "file mtime".to_string()
    }
}
