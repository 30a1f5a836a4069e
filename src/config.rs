// src/config.rs
// =============================================================================
// Runtime settings shared by every component.
//
// The CLI fills this in from flags (see cli.rs); library users can start from
// ScoutConfig::default() and override what they need.
// =============================================================================

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ScoutConfig {
    /// Per-request timeout for every GET and HEAD
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Redirects followed before a request is treated as failed
    pub max_redirects: usize,
    /// How deep sitemap indexes may nest before we stop following them
    /// (the sitemap passed in by the caller is depth 0)
    pub max_depth: usize,
    /// Upper bound on sitemap documents fetched for one extraction
    pub max_sitemaps: usize,
    /// How many common-path HEAD probes may be in flight at once
    pub probe_concurrency: usize,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        ScoutConfig {
            timeout: Duration::from_secs(10),
            user_agent: format!("sitemap-scout/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 5,
            max_depth: 5,
            max_sitemaps: 500,
            probe_concurrency: 4,
        }
    }
}
