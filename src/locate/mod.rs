// src/locate/mod.rs
// =============================================================================
// Sitemap Locator: finds every plausible sitemap URL for a website.
//
// The cascade, in order:
// 1. fetch robots.txt and read its sitemap hints
// 2. take the `Sitemap:` directives it lists
// 3. HEAD {website}/sitemap.xml
// 4. look for <link rel="sitemap"> on the home page
// 5. HEAD the twelve common paths, but only when robots.txt gave us nothing
//
// Results of steps 2-5 are concatenated in that order, deduplicated, and
// narrowed to URLs ending in ".xml". That last filter drops directory style
// hits such as /sitemap/ on purpose.
// =============================================================================

mod probe;
mod robots;

pub use probe::{find_sitemap_link, COMMON_SITEMAP_PATHS};
pub use robots::{parse_robots, robots_url, RobotsHints};

use tracing::{debug, info};
use url::Url;

use crate::config::ScoutConfig;
use crate::error::{Result, ScoutError};
use crate::fetch::Fetcher;
use crate::links::{dedup_first_by, SitemapReference};

#[derive(Debug, Clone)]
pub struct Locator {
    fetcher: Fetcher,
    probe_concurrency: usize,
}

impl Locator {
    pub fn new(fetcher: Fetcher, config: &ScoutConfig) -> Self {
        Locator {
            fetcher,
            probe_concurrency: config.probe_concurrency,
        }
    }

    // Runs the whole cascade for one website
    //
    // Only an unparseable website URL is an error. Every network problem
    // inside a strategy just means that strategy found nothing.
    pub async fn locate(&self, website_url: &str) -> Result<Vec<SitemapReference>> {
        let base = Url::parse(website_url).map_err(|e| ScoutError::invalid_url(website_url, e))?;

        // Steps 1 + 2: one fetch, both signals come from the same body
        let hints = self.robots_hints(website_url).await;
        debug!(
            mentions_sitemap = hints.mentions_sitemap,
            has_directive = hints.has_directive,
            directives = hints.sitemaps.len(),
            "robots.txt checked"
        );

        let mut candidates: Vec<String> = hints.sitemaps.clone();

        // Step 3
        if let Some(found) = probe::probe_standard_path(&self.fetcher, website_url).await {
            candidates.push(found);
        }

        // Step 4
        if let Some(found) = probe::probe_html_header(&self.fetcher, &base).await {
            debug!(url = %found, "sitemap advertised in HTML head");
            candidates.push(found);
        }

        // Step 5
        if hints.needs_common_probe() {
            let found =
                probe::probe_common_paths(&self.fetcher, &base, self.probe_concurrency).await;
            debug!(hits = found.len(), "common sitemap paths probed");
            candidates.extend(found);
        }

        let sitemaps = aggregate_candidates(candidates);
        info!(website = %website_url, count = sitemaps.len(), "sitemaps located");
        Ok(sitemaps)
    }

    async fn robots_hints(&self, website_url: &str) -> RobotsHints {
        let url = robots_url(website_url);
        match self.fetcher.get_text(&url).await {
            Ok(body) => parse_robots(&body),
            Err(e) => {
                debug!(error = %e, "robots.txt unavailable");
                RobotsHints::default()
            }
        }
    }
}

// Dedupes by exact string, then keeps only URLs that end in .xml
pub fn aggregate_candidates(candidates: Vec<String>) -> Vec<SitemapReference> {
    dedup_first_by(candidates, |url| url.as_str())
        .into_iter()
        .filter(|url| url.to_lowercase().ends_with(".xml"))
        .map(SitemapReference::new)
        .collect()
}
