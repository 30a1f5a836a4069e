// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three subcommands, one per public operation of the library:
// - sitemaps: list the sitemaps we can find for a website
// - links:    list the URLs inside one sitemap (indexes are expanded)
// - all:      every URL for a website, scraping the home page if needed
//
// The tuning flags are global, so they work before or after the subcommand,
// and each one can also come from an environment variable.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use sitemap_scout::ScoutConfig;

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-scout",
    version,
    about = "Find a website's sitemaps and list the URLs they contain",
    long_about = "sitemap-scout looks for sitemaps via robots.txt, well-known paths and the home page's \
                  <link rel=\"sitemap\">, expands sitemap indexes, and falls back to the links on the \
                  home page when a site has no sitemap at all."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub options: ScoutOptions,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find every sitemap for a website
    ///
    /// Example: sitemap-scout sitemaps https://example.com
    Sitemaps {
        /// Website URL (e.g., https://example.com)
        website_url: String,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the URLs in one sitemap, expanding sitemap indexes
    ///
    /// Example: sitemap-scout links https://example.com/sitemap.xml
    Links {
        /// Sitemap URL (e.g., https://example.com/sitemap.xml)
        sitemap_url: String,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List every URL of a website: from its sitemaps, or from its home page
    ///
    /// Example: sitemap-scout all https://example.com --json
    All {
        /// Website URL (e.g., https://example.com)
        website_url: String,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}

// Knobs shared by every subcommand
#[derive(Args, Debug)]
pub struct ScoutOptions {
    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "SITEMAP_SCOUT_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// User-Agent header to send (defaults to sitemap-scout/<version>)
    #[arg(long, global = true, env = "SITEMAP_SCOUT_USER_AGENT")]
    pub user_agent: Option<String>,

    /// How deep sitemap indexes may nest before we stop following them
    #[arg(long, global = true, env = "SITEMAP_SCOUT_MAX_DEPTH", default_value_t = 5)]
    pub max_depth: usize,

    /// Maximum number of sitemap documents fetched per sitemap
    #[arg(long, global = true, env = "SITEMAP_SCOUT_MAX_SITEMAPS", default_value_t = 500)]
    pub max_sitemaps: usize,

    /// How many well-known sitemap paths to probe at once
    #[arg(long, global = true, default_value_t = 4)]
    pub probe_concurrency: usize,

    /// Log every request and every swallowed failure to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl ScoutOptions {
    pub fn to_config(&self) -> ScoutConfig {
        let defaults = ScoutConfig::default();
        ScoutConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            max_depth: self.max_depth,
            max_sitemaps: self.max_sitemaps,
            probe_concurrency: self.probe_concurrency,
            ..defaults
        }
    }
}
