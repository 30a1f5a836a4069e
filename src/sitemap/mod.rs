// src/sitemap/mod.rs
// =============================================================================
// Sitemap Extractor.
//
// Submodules:
// - parse: structured XML parsing and the <loc> text-scan fallback
// - extract: fetching, recursion through sitemap indexes, truncation limits
// =============================================================================

mod extract;
mod parse;

pub use extract::{Extractor, SitemapReport, Truncation, TruncationReason};
pub use parse::{parse_sitemap, scan_locs, SitemapDocument};
