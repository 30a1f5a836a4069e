// src/fetch/http.rs
// =============================================================================
// This module talks to the network.
//
// Key functionality:
// - GET a URL and return its body as text (robots.txt, sitemaps, HTML pages)
// - HEAD a URL to see whether it exists, without downloading the body
// - Turn reqwest errors into short, readable reasons for the logs
//
// Nothing here retries. A failed fetch is reported once and the caller
// decides what "no answer" means for its step.
// =============================================================================

use reqwest::{Client, Response};
use tracing::debug;

use crate::config::ScoutConfig;
use crate::error::{Result, ScoutError};

// A cheap-to-clone handle around one reqwest client
//
// All components share the same Fetcher so they share one connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // Builds the HTTP client from the timeout, redirect and user agent settings
    pub fn new(config: &ScoutConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Fetcher { client })
    }

    // Fetches a URL and returns the body as text
    //
    // Any non-2xx status counts as a network failure, the same as a
    // connection error.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScoutError::network(url, describe_error(&e)))?;

        let response = ensure_success(url, response)?;

        response
            .text()
            .await
            .map_err(|e| ScoutError::network(url, describe_error(&e)))
    }

    // Header-only existence check
    //
    // Returns true only for a 2xx answer to HEAD. Errors and every other
    // status collapse to false.
    pub async fn exists(&self, url: &str) -> bool {
        debug!(%url, "HEAD");
        match self.client.head(url).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                if !ok {
                    debug!(%url, status = response.status().as_u16(), "probe missed");
                }
                ok
            }
            Err(e) => {
                debug!(%url, reason = %describe_error(&e), "probe failed");
                false
            }
        }
    }
}

fn ensure_success(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ScoutError::network(url, format!("HTTP {}", status)))
    }
}

// Categorizes reqwest errors into a short reason
fn describe_error(error: &reqwest::Error) -> String {
    let error_string = error.to_string();

    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "could not resolve hostname".to_string()
        } else {
            "connection failed".to_string()
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error".to_string()
    } else {
        error_string
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> Fetcher {
        Fetcher::new(&ScoutConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_get_text_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *"))
            .mount(&server)
            .await;

        let body = fetcher()
            .get_text(&format!("{}/robots.txt", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "User-agent: *");
    }

    #[tokio::test]
    async fn test_get_text_rejects_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410).set_body_string("gone"))
            .mount(&server)
            .await;

        let result = fetcher().get_text(&format!("{}/gone", server.uri())).await;
        assert!(matches!(result, Err(ScoutError::Network { .. })));
    }

    #[tokio::test]
    async fn test_exists_uses_head() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher();
        assert!(fetcher.exists(&format!("{}/sitemap.xml", server.uri())).await);
        // unmatched requests get a 404 from the mock server
        assert!(!fetcher.exists(&format!("{}/missing.xml", server.uri())).await);
    }

    #[tokio::test]
    async fn test_exists_is_false_when_host_unreachable() {
        // port 9 (discard) is essentially never listening locally
        assert!(!fetcher().exists("http://127.0.0.1:9/sitemap.xml").await);
    }
}
