//! Build command - generates the site artifacts

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use sitelens_generator::Builder;

use super::load_config;

/// Run the build command.
///
/// Writes `sitemap.xml`, `search_index.json` and `feed.xml` into `root`,
/// creates `search.html` if missing and makes sure `robots.txt` references
/// the sitemap.
pub fn run(config_path: Option<&Path>, root: &Path, site_url: Option<&str>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?root, ?site_url, "Starting build");

    let config = load_config(config_path, site_url)?;
    config.validate().wrap_err("Invalid configuration")?;

    let stats = Builder::new(config, root).build().wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!("Generated: feed.xml, sitemap.xml, robots.txt, search_index.json");
    println!();
    println!("  Pages:        {}", stats.pages);
    println!("  Sections:     {}", stats.sections);
    println!("  Feed entries: {}", stats.feed_entries);
    println!("  robots.txt:   {}", stats.robots);
    if stats.search_page_created {
        println!("  search.html:  created");
    }
    println!("  Duration:     {:.2}s", duration.as_secs_f64());
    println!();
    println!("Tip: Add a link to /search.html in your nav.");

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}
