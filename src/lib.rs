// src/lib.rs
// =============================================================================
// sitemap-scout: find a website's sitemaps and pull the URLs out of them.
//
// Modules:
// - locate: the cascade that finds sitemap URLs for a website
// - sitemap: fetching and parsing sitemaps, expanding sitemap indexes
// - scrape: the one-page link scraper used when no sitemap exists
// - pipeline: SitemapScout, the three public operations
// - fetch, links, config, error: shared plumbing and data types
//
// Quick start:
//   let scout = SitemapScout::new(ScoutConfig::default())?;
//   let links = scout.extract_all_links_from_website("https://example.com").await?;
// =============================================================================

pub mod config;
pub mod error;
pub mod fetch;
pub mod links;
pub mod locate;
pub mod pipeline;
pub mod scrape;
pub mod sitemap;

pub use config::ScoutConfig;
pub use error::{Result, ScoutError};
pub use links::{dedup_links, LinkEntry, ResultSet, SitemapReference};
pub use pipeline::SitemapScout;
pub use sitemap::{SitemapReport, Truncation, TruncationReason};
