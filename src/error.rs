// src/error.rs
// =============================================================================
// Error types for the sitemap-scout library.
//
// Two kinds of failure matter inside the core:
// - Network: DNS, connection refused, timeouts, non-2xx responses
// - Parse: malformed XML or a document we cannot make sense of
//
// Almost every function that returns one of these is called by code that
// turns the error into "no contribution" (an empty Vec or None). Only
// InvalidUrl and Client ever escape the public operations.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoutError {
    /// The URL handed to us could not be parsed as an absolute URL
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request failed or the server answered with a non-2xx status
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// The body was fetched but could not be parsed
    #[error("could not parse {url}: {reason}")]
    Parse { url: String, reason: String },

    /// The HTTP client itself could not be built
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl ScoutError {
    pub(crate) fn network(url: &str, reason: impl ToString) -> Self {
        ScoutError::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn parse(url: &str, reason: impl ToString) -> Self {
        ScoutError::Parse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_url(url: &str, reason: impl ToString) -> Self {
        ScoutError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_url() {
        let err = ScoutError::network("https://a.com/robots.txt", "HTTP 404 Not Found");
        assert_eq!(
            err.to_string(),
            "request to https://a.com/robots.txt failed: HTTP 404 Not Found"
        );

        let err = ScoutError::invalid_url("not a url", "relative URL without a base");
        assert!(err.to_string().starts_with("invalid URL 'not a url'"));
    }
}
