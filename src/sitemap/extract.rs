// src/sitemap/extract.rs
// =============================================================================
// Sitemap Extractor: one sitemap URL in, a flat list of entries out.
//
// How it works:
// 1. Fetch the sitemap body
// 2. Parse it (see parse.rs); on a parse error, scan for <loc> tags instead
// 3. A sitemap index pushes its nested sitemaps onto a stack, so they are
//    expanded depth-first in document order, exactly like plain recursion
//
// Remote servers control the shape of that tree, so the walk is bounded:
// - a sitemap already fetched in this walk is not fetched again (cycles)
// - nested sitemaps deeper than max_depth are not followed
// - at most max_sitemaps documents are fetched
// Each of those cut-offs is logged and returned as a Truncation.
// =============================================================================

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::parse::{parse_sitemap, scan_locs, SitemapDocument};
use crate::config::ScoutConfig;
use crate::fetch::Fetcher;
use crate::links::LinkEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationReason {
    /// The sitemap was already fetched earlier in this walk
    AlreadyVisited,
    /// The sitemap sits deeper than the configured nesting limit
    DepthLimit,
    /// The walk already fetched the maximum number of sitemaps
    SitemapLimit,
}

impl fmt::Display for TruncationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TruncationReason::AlreadyVisited => "already visited",
            TruncationReason::DepthLimit => "nesting too deep",
            TruncationReason::SitemapLimit => "too many sitemaps",
        };
        f.write_str(text)
    }
}

// A nested sitemap we deliberately did not fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Truncation {
    pub url: String,
    pub depth: usize,
    pub reason: TruncationReason,
}

// Everything one extraction produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct SitemapReport {
    pub links: Vec<LinkEntry>,
    pub truncations: Vec<Truncation>,
    /// Number of sitemap documents actually requested
    pub fetched: usize,
}

#[derive(Debug, Clone)]
pub struct Extractor {
    fetcher: Fetcher,
    max_depth: usize,
    max_sitemaps: usize,
}

impl Extractor {
    pub fn new(fetcher: Fetcher, config: &ScoutConfig) -> Self {
        Extractor {
            fetcher,
            max_depth: config.max_depth,
            max_sitemaps: config.max_sitemaps,
        }
    }

    // Extracts every entry reachable from one sitemap
    //
    // Never fails: an unreachable or unreadable sitemap contributes nothing,
    // and only that branch of the tree is lost.
    pub async fn extract(&self, sitemap_url: &str) -> Vec<LinkEntry> {
        self.extract_report(sitemap_url).await.links
    }

    // Same as extract(), but also says what was cut off and why
    pub async fn extract_report(&self, sitemap_url: &str) -> SitemapReport {
        let mut report = SitemapReport::default();
        let mut visited: HashSet<String> = HashSet::new();
        // (url, depth); popped from the end, so children are pushed reversed
        let mut stack: Vec<(String, usize)> = vec![(sitemap_url.to_string(), 0)];

        while let Some((url, depth)) = stack.pop() {
            let cut = if visited.contains(&url) {
                Some(TruncationReason::AlreadyVisited)
            } else if depth > self.max_depth {
                Some(TruncationReason::DepthLimit)
            } else if report.fetched >= self.max_sitemaps {
                Some(TruncationReason::SitemapLimit)
            } else {
                None
            };

            if let Some(reason) = cut {
                warn!(%url, depth, %reason, "sitemap not followed");
                report.truncations.push(Truncation { url, depth, reason });
                continue;
            }

            visited.insert(url.clone());
            report.fetched += 1;

            match self.fetch_document(&url).await {
                Some(SitemapDocument::Index(nested)) => {
                    debug!(%url, nested = nested.len(), "sitemap index");
                    stack.extend(nested.into_iter().rev().map(|child| (child, depth + 1)));
                }
                Some(SitemapDocument::UrlSet(links)) => {
                    debug!(%url, entries = links.len(), "urlset");
                    report.links.extend(links);
                }
                Some(SitemapDocument::Unsupported(kind)) => {
                    info!(%url, %kind, "sitemap format recognized but not decoded");
                }
                None => {}
            }
        }

        report
    }

    // Fetches and parses one document; None when it could not be fetched
    async fn fetch_document(&self, url: &str) -> Option<SitemapDocument> {
        let body = match self.fetcher.get_text(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "sitemap unavailable");
                return None;
            }
        };

        match parse_sitemap(&body, url) {
            Ok(document) => Some(document),
            Err(e) => {
                debug!(error = %e, "falling back to <loc> text scan");
                Some(SitemapDocument::UrlSet(scan_locs(&body, url)))
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a Vec used as a stack instead of a recursive async fn?
//    - A recursive async fn needs Box::pin because its future would
//      otherwise have infinite size
//    - A stack keeps the same depth-first order with no boxing, and makes
//      the depth of each item explicit
//
// 2. Why push children in reverse?
//    - pop() takes from the end, so reversing keeps document order
//
// 3. Why check `visited` before inserting?
//    - A sitemap cut off for depth may show up again higher in the tree;
//      only sitemaps we actually fetched count as visited
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn extractor_with(config: ScoutConfig) -> Extractor {
        Extractor::new(Fetcher::new(&config).unwrap(), &config)
    }

    fn extractor() -> Extractor {
        extractor_with(ScoutConfig::default())
    }

    async fn serve(server: &MockServer, at: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(server)
            .await;
    }

    fn urlset(locs: &[String]) -> String {
        let urls: String = locs
            .iter()
            .map(|loc| format!("<url><loc>{}</loc></url>", loc))
            .collect();
        format!("<urlset>{}</urlset>", urls)
    }

    fn index(locs: &[String]) -> String {
        let maps: String = locs
            .iter()
            .map(|loc| format!("<sitemap><loc>{}</loc></sitemap>", loc))
            .collect();
        format!("<sitemapindex>{}</sitemapindex>", maps)
    }

    #[tokio::test]
    async fn test_urlset_scenario() {
        let server = MockServer::start().await;
        let sitemap_url = format!("{}/sitemap.xml", server.uri());
        serve(
            &server,
            "/sitemap.xml",
            "<urlset><url><loc>https://a.com/1</loc><lastmod>2024-01-01</lastmod></url></urlset>"
                .to_string(),
        )
        .await;

        let links = extractor().extract(&sitemap_url).await;
        assert_eq!(
            links,
            vec![LinkEntry {
                url: "https://a.com/1".to_string(),
                lastmod: Some("2024-01-01".to_string()),
                source: Some(sitemap_url.clone()),
                ..Default::default()
            }]
        );
    }

    #[tokio::test]
    async fn test_index_expands_every_leaf_once_in_order() {
        let server = MockServer::start().await;
        let uri = server.uri();

        serve(
            &server,
            "/index.xml",
            index(&[format!("{}/a.xml", uri), format!("{}/nested.xml", uri), format!("{}/c.xml", uri)]),
        )
        .await;
        serve(&server, "/nested.xml", index(&[format!("{}/b.xml", uri)])).await;
        serve(&server, "/a.xml", urlset(&["https://a.com/a".to_string()])).await;
        serve(&server, "/b.xml", urlset(&["https://a.com/b".to_string()])).await;
        serve(
            &server,
            "/c.xml",
            urlset(&["https://a.com/c1".to_string(), "https://a.com/c2".to_string()]),
        )
        .await;

        let report = extractor().extract_report(&format!("{}/index.xml", uri)).await;
        let urls: Vec<&str> = report.links.iter().map(|l| l.url.as_str()).collect();

        assert_eq!(urls, vec!["https://a.com/a", "https://a.com/b", "https://a.com/c1", "https://a.com/c2"]);
        assert_eq!(report.links[1].source.as_deref(), Some(format!("{}/b.xml", uri).as_str()));
        assert!(report.truncations.is_empty());
        assert_eq!(report.fetched, 5);
    }

    #[tokio::test]
    async fn test_failed_nested_fetch_yields_empty_list() {
        let server = MockServer::start().await;
        let sitemap_url = format!("{}/sitemap.xml", server.uri());
        // s1.xml is not mounted, so the mock server answers 404
        serve(&server, "/sitemap.xml", index(&[format!("{}/s1.xml", server.uri())])).await;

        let links = extractor().extract(&sitemap_url).await;
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_failed_branch_does_not_abort_siblings() {
        let server = MockServer::start().await;
        let uri = server.uri();
        serve(
            &server,
            "/index.xml",
            index(&[format!("{}/broken.xml", uri), format!("{}/ok.xml", uri)]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/broken.xml"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        serve(&server, "/ok.xml", urlset(&["https://a.com/ok".to_string()])).await;

        let links = extractor().extract(&format!("{}/index.xml", uri)).await;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://a.com/ok");
    }

    #[tokio::test]
    async fn test_malformed_xml_falls_back_to_text_scan() {
        let server = MockServer::start().await;
        let sitemap_url = format!("{}/broken.xml", server.uri());
        serve(
            &server,
            "/broken.xml",
            "<urlset><url><loc>https://a.com/2</loc><lastmod>2024</url>".to_string(),
        )
        .await;

        let links = extractor().extract(&sitemap_url).await;
        assert_eq!(links, vec![LinkEntry::from_source("https://a.com/2", sitemap_url.as_str())]);
    }

    #[tokio::test]
    async fn test_news_sitemap_contributes_nothing() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/news.xml",
            r#"<news:news xmlns:news="http://www.google.com/schemas/sitemap-news/0.9"><news:title>x</news:title></news:news>"#
                .to_string(),
        )
        .await;

        let links = extractor().extract(&format!("{}/news.xml", server.uri())).await;
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_cycle_is_fetched_once_and_reported() {
        let server = MockServer::start().await;
        let uri = server.uri();
        let a = format!("{}/a.xml", uri);
        let b = format!("{}/b.xml", uri);
        serve(&server, "/a.xml", index(&[b.clone()])).await;
        serve(&server, "/b.xml", index(&[a.clone()])).await;

        let report = extractor().extract_report(&a).await;

        assert!(report.links.is_empty());
        assert_eq!(
            report.truncations,
            vec![Truncation {
                url: a,
                depth: 2,
                reason: TruncationReason::AlreadyVisited,
            }]
        );
    }

    #[tokio::test]
    async fn test_depth_limit_stops_nesting() {
        let server = MockServer::start().await;
        let uri = server.uri();
        serve(&server, "/top.xml", index(&[format!("{}/mid.xml", uri)])).await;
        serve(&server, "/mid.xml", index(&[format!("{}/leaf.xml", uri)])).await;
        Mock::given(method("GET"))
            .and(path("/leaf.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&["https://a.com/x".to_string()])))
            .expect(0)
            .mount(&server)
            .await;

        let config = ScoutConfig {
            max_depth: 1,
            ..ScoutConfig::default()
        };
        let report = extractor_with(config).extract_report(&format!("{}/top.xml", uri)).await;

        assert!(report.links.is_empty());
        assert_eq!(report.truncations.len(), 1);
        assert_eq!(report.truncations[0].reason, TruncationReason::DepthLimit);
        assert_eq!(report.truncations[0].depth, 2);
    }

    #[tokio::test]
    async fn test_sitemap_limit_caps_fetches() {
        let server = MockServer::start().await;
        let uri = server.uri();
        serve(
            &server,
            "/index.xml",
            index(&[format!("{}/one.xml", uri), format!("{}/two.xml", uri)]),
        )
        .await;
        serve(&server, "/one.xml", urlset(&["https://a.com/1".to_string()])).await;

        let config = ScoutConfig {
            max_sitemaps: 2,
            ..ScoutConfig::default()
        };
        let report = extractor_with(config).extract_report(&format!("{}/index.xml", uri)).await;

        assert_eq!(report.links.len(), 1);
        assert_eq!(report.fetched, 2);
        assert_eq!(report.truncations[0].reason, TruncationReason::SitemapLimit);
    }

    #[tokio::test]
    async fn test_unreachable_sitemap_yields_empty_list() {
        let links = extractor().extract("http://127.0.0.1:9/sitemap.xml").await;
        assert!(links.is_empty());
    }
}
