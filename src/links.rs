// src/links.rs
// =============================================================================
// The data that flows through the pipeline.
//
// - SitemapReference: a sitemap URL we found but have not fetched yet
// - LinkEntry: one destination URL, plus whatever metadata came with it
// - ResultSet: the envelope the CLI prints ({ requestedUrl, totalCount, items })
//
// Deduplication lives here too. It is exact string equality on the URL and the
// first occurrence wins; "https://A.com/" and "https://a.com" stay separate.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// A located, not-yet-fetched sitemap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapReference {
    pub url: String,
}

impl SitemapReference {
    pub fn new(url: impl Into<String>) -> Self {
        SitemapReference { url: url.into() }
    }
}

// One discovered destination URL
//
// `url` is the identity key. `source` records which sitemap or page produced
// the entry and never takes part in deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkEntry {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<String>,
}

impl LinkEntry {
    /// Entry with only a URL and the place it came from
    pub fn from_source(url: impl Into<String>, source: impl Into<String>) -> Self {
        LinkEntry {
            url: url.into(),
            source: Some(source.into()),
            ..Default::default()
        }
    }
}

// What the CLI serializes for every command
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet<T> {
    pub requested_url: String,
    pub total_count: usize,
    pub items: Vec<T>,
}

impl<T> ResultSet<T> {
    pub fn new(requested_url: impl Into<String>, items: Vec<T>) -> Self {
        ResultSet {
            requested_url: requested_url.into(),
            total_count: items.len(),
            items,
        }
    }
}

// Keeps the first item for every key, preserving order
pub(crate) fn dedup_first_by<T, F>(items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen: HashSet<String> = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item).to_string()))
        .collect()
}

/// Folds partial results into one list with unique URLs (first writer wins)
pub fn dedup_links(links: Vec<LinkEntry>) -> Vec<LinkEntry> {
    dedup_first_by(links, |link| link.url.as_str())
}
