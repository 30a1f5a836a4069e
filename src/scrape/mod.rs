// src/scrape/mod.rs
// =============================================================================
// Page Scraper: the fallback when a website has no sitemap.
//
// One hop only. We fetch the page we were given and return its links; we
// never follow those links to find more.
// =============================================================================

mod html;

pub use html::extract_page_links;

use tracing::{debug, info};
use url::Url;

use crate::fetch::Fetcher;
use crate::links::LinkEntry;

#[derive(Debug, Clone)]
pub struct Scraper {
    fetcher: Fetcher,
}

impl Scraper {
    pub fn new(fetcher: Fetcher) -> Self {
        Scraper { fetcher }
    }

    // Fetches one page and returns every usable link on it
    //
    // Never fails: a bad URL, a failed fetch or an unusable page all give
    // an empty list.
    pub async fn scrape(&self, page_url: &str) -> Vec<LinkEntry> {
        if let Err(e) = Url::parse(page_url) {
            debug!(%page_url, error = %e, "cannot scrape an invalid URL");
            return Vec::new();
        }

        let html = match self.fetcher.get_text(page_url).await {
            Ok(html) => html,
            Err(e) => {
                debug!(error = %e, "page unavailable for scraping");
                return Vec::new();
            }
        };

        let links = extract_page_links(&html, page_url);
        info!(page = %page_url, count = links.len(), "links scraped from page");
        links
    }
}
