//! sitelens CLI
//!
//! Generates discovery artifacts (sitemap, search index, Atom feed, robots.txt
//! and a search page) for an already-built static HTML site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for sitelens.
#[derive(Parser)]
#[command(
    name = "sitelens",
    version,
    about = "Generate sitemap, search index and feed for a static site"
)]
struct Cli {
    /// Path to configuration file (defaults to sitelens.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate all artifacts into the site root
    Build {
        /// Site root containing the HTML files
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
        /// Override site URL (e.g., https://example.com)
        #[arg(long)]
        site_url: Option<String>,
    },
    /// Validate configuration and report what a build would index
    Check {
        /// Site root containing the HTML files
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
        /// Override site URL (e.g., https://example.com)
        #[arg(long)]
        site_url: Option<String>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    sitelens::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { root, site_url } => {
            sitelens::cmd::build::run(cli.config.as_deref(), &root, site_url.as_deref())?;
        }
        Commands::Check { root, site_url } => {
            sitelens::cmd::check::run(cli.config.as_deref(), &root, site_url.as_deref())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["sitelens", "build"];
        let cli = Cli::parse_from(args);

        assert!(cli.config.is_none());
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build { root, site_url } => {
                assert_eq!(root, PathBuf::from("."));
                assert!(site_url.is_none());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_root_and_site_url() {
        let args = [
            "sitelens",
            "build",
            "--root",
            "public",
            "--site-url",
            "https://example.com",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build { root, site_url } => {
                assert_eq!(root, PathBuf::from("public"));
                assert_eq!(site_url.as_deref(), Some("https://example.com"));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["sitelens", "check", "-r", "site"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check { root, site_url } => {
                assert_eq!(root, PathBuf::from("site"));
                assert!(site_url.is_none());
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["sitelens", "-vvv", "build"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let args = ["sitelens", "--config", "site.toml", "build"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, Some(PathBuf::from("site.toml")));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["sitelens"]).is_err());
    }
}
