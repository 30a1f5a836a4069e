// src/locate/probe.rs
// =============================================================================
// The probing strategies of the locator.
//
// - standard path: HEAD {website}/sitemap.xml
// - HTML header: <link rel="sitemap" href="..."> on the home page
// - common paths: HEAD against a fixed list of well-known locations
//
// Every probe returns what it found (Option / Vec). A failure means
// "found nothing"; nothing here returns an error.
// =============================================================================

use futures::stream::{self, StreamExt};
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::fetch::Fetcher;

// Well-known sitemap locations, relative to the site root
//
// Order matters: results keep this order so deduplication stays predictable.
pub const COMMON_SITEMAP_PATHS: [&str; 12] = [
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-index.xml",
    "/sitemapindex.xml",
    "/sitemap/",
    "/sitemaps/",
    "/sitemap/sitemap.xml",
    "/wp-sitemap.xml",
    "/news-sitemap.xml",
    "/image-sitemap.xml",
    "/video-sitemap.xml",
    "/post-sitemap.xml",
];

// HEAD {website}/sitemap.xml
pub async fn probe_standard_path(fetcher: &Fetcher, website_url: &str) -> Option<String> {
    let candidate = format!("{}/sitemap.xml", website_url.trim_end_matches('/'));

    if fetcher.exists(&candidate).await {
        debug!(url = %candidate, "standard sitemap path exists");
        Some(candidate)
    } else {
        None
    }
}

// Looks for <link rel="sitemap"> on the home page
pub async fn probe_html_header(fetcher: &Fetcher, base: &Url) -> Option<String> {
    let html = match fetcher.get_text(base.as_str()).await {
        Ok(html) => html,
        Err(e) => {
            debug!(error = %e, "home page unavailable for <link rel=sitemap> probe");
            return None;
        }
    };

    find_sitemap_link(&html, base)
}

// Finds the first <link rel="sitemap"> and resolves its href against the base
//
// `rel` is a space separated token list and is compared without regard to
// case, so rel="Sitemap" and rel="alternate sitemap" both count.
pub fn find_sitemap_link(html: &str, base: &Url) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("link[rel][href]").expect("link selector is valid");

    document
        .select(&selector)
        .filter(|element| {
            element
                .value()
                .attr("rel")
                .map(|rel| {
                    rel.split_ascii_whitespace()
                        .any(|token| token.eq_ignore_ascii_case("sitemap"))
                })
                .unwrap_or(false)
        })
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .and_then(|href| base.join(href).ok())
        .map(|url| url.to_string())
}

// HEAD every well-known path and keep the ones that answer 2xx
//
// Probes run `concurrency` at a time, but `buffered` hands results back in
// list order, so the output is the same as probing one by one.
pub async fn probe_common_paths(fetcher: &Fetcher, base: &Url, concurrency: usize) -> Vec<String> {
    let candidates: Vec<String> = COMMON_SITEMAP_PATHS
        .iter()
        .filter_map(|path| match base.join(path) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                debug!(%path, error = %e, "could not resolve common sitemap path");
                None
            }
        })
        .collect();

    let checks = candidates.into_iter().map(|candidate| async move {
        if fetcher.exists(&candidate).await {
            Some(candidate)
        } else {
            None
        }
    });

    stream::iter(checks)
        .buffered(concurrency.max(1))
        .filter_map(|found| async move { found })
        .collect()
        .await
}
