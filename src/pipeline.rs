// src/pipeline.rs
// =============================================================================
// The three operations callers use, and the "extract all links" pipeline.
//
// extract_all_links_from_website:
// 1. locate sitemaps
// 2. if there are any, extract each one in order and concatenate
// 3. otherwise scrape the website root once (never both)
// 4. dedupe by exact URL, first occurrence wins
//
// Everything below these functions absorbs its own failures. What escapes is
// an error about the input itself: a website or sitemap URL we cannot parse.
// =============================================================================

use tracing::info;
use url::Url;

use crate::config::ScoutConfig;
use crate::error::{Result, ScoutError};
use crate::fetch::Fetcher;
use crate::links::{dedup_links, LinkEntry, SitemapReference};
use crate::locate::Locator;
use crate::scrape::Scraper;
use crate::sitemap::{Extractor, SitemapReport};

#[derive(Debug, Clone)]
pub struct SitemapScout {
    locator: Locator,
    extractor: Extractor,
    scraper: Scraper,
}

impl SitemapScout {
    // Builds all three components on one shared HTTP client
    pub fn new(config: ScoutConfig) -> Result<Self> {
        let fetcher = Fetcher::new(&config)?;

        Ok(SitemapScout {
            locator: Locator::new(fetcher.clone(), &config),
            extractor: Extractor::new(fetcher.clone(), &config),
            scraper: Scraper::new(fetcher),
        })
    }

    pub async fn find_all_sitemaps(&self, website_url: &str) -> Result<Vec<SitemapReference>> {
        self.locator.locate(website_url).await
    }

    pub async fn extract_links_from_sitemap(&self, sitemap_url: &str) -> Result<Vec<LinkEntry>> {
        Ok(self.sitemap_report(sitemap_url).await?.links)
    }

    // Like extract_links_from_sitemap, but keeps the truncation details
    pub async fn sitemap_report(&self, sitemap_url: &str) -> Result<SitemapReport> {
        ensure_absolute(sitemap_url)?;
        Ok(self.extractor.extract_report(sitemap_url).await)
    }

    pub async fn extract_all_links_from_website(&self, website_url: &str) -> Result<Vec<LinkEntry>> {
        let sitemaps = self.locator.locate(website_url).await?;

        let links = if sitemaps.is_empty() {
            info!(website = %website_url, "no sitemap found, scraping the page instead");
            self.scraper.scrape(website_url).await
        } else {
            let mut links = Vec::new();
            for sitemap in &sitemaps {
                links.extend(self.extractor.extract(&sitemap.url).await);
            }
            links
        };

        let links = dedup_links(links);
        info!(website = %website_url, count = links.len(), "links extracted");
        Ok(links)
    }
}

fn ensure_absolute(url: &str) -> Result<()> {
    Url::parse(url)
        .map(|_| ())
        .map_err(|e| ScoutError::invalid_url(url, e))
}
