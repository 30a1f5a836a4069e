// src/locate/robots.rs
// =============================================================================
// Reads sitemap hints out of robots.txt.
//
// We only care about two things in the file:
// - does it mention "sitemap" anywhere (loose signal, any casing)
// - which lines are real `Sitemap: <url>` directives
//
// Disallow/Allow rules are ignored. This module never decides whether we may
// crawl something; it only collects hints.
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;

// What robots.txt told us about sitemaps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsHints {
    /// "sitemap" appears somewhere in the file, in any casing
    pub mentions_sitemap: bool,
    /// At least one line looks like a `Sitemap:` directive
    pub has_directive: bool,
    /// Every directive value, trimmed, in file order
    pub sitemaps: Vec<String>,
}

impl RobotsHints {
    // The common-path probe is only worth running when robots.txt did not
    // hand us a sitemap
    pub fn needs_common_probe(&self) -> bool {
        !self.has_directive || self.sitemaps.is_empty()
    }
}

// Builds the robots.txt URL by appending to the website URL as given
//
// "https://a.com/" and "https://a.com" both become "https://a.com/robots.txt".
pub fn robots_url(website_url: &str) -> String {
    format!("{}/robots.txt", website_url.trim_end_matches('/'))
}

// Scans a robots.txt body for sitemap hints
pub fn parse_robots(body: &str) -> RobotsHints {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?im)^[ \t]*sitemap[ \t]*:[ \t]*(.*)$").expect("sitemap directive regex is valid")
    });

    let mentions_sitemap = body.to_lowercase().contains("sitemap");
    let has_directive = re.is_match(body);

    let sitemaps = re
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();

    RobotsHints {
        mentions_sitemap,
        has_directive,
        sitemaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_directive() {
        let body = "User-agent: *\nDisallow: /admin\nSitemap: https://a.com/one.xml\nsitemap:https://a.com/two.xml  \n";
        let hints = parse_robots(body);

        assert!(hints.mentions_sitemap);
        assert!(hints.has_directive);
        assert_eq!(
            hints.sitemaps,
            vec!["https://a.com/one.xml", "https://a.com/two.xml"]
        );
        assert!(!hints.needs_common_probe());
    }

    #[test]
    fn test_handles_crlf_line_endings() {
        let hints = parse_robots("User-agent: *\r\nSITEMAP: https://a.com/s.xml\r\n");
        assert_eq!(hints.sitemaps, vec!["https://a.com/s.xml"]);
    }

    #[test]
    fn test_loose_mention_without_directive() {
        let hints = parse_robots("# our Sitemap lives somewhere else\nUser-agent: *\n");

        assert!(hints.mentions_sitemap);
        assert!(!hints.has_directive);
        assert!(hints.sitemaps.is_empty());
        assert!(hints.needs_common_probe());
    }

    #[test]
    fn test_empty_directive_value_is_dropped() {
        let hints = parse_robots("Sitemap:\n");
        assert!(hints.has_directive);
        assert!(hints.sitemaps.is_empty());
        assert!(hints.needs_common_probe());
    }

    #[test]
    fn test_robots_url_trims_trailing_slash() {
        assert_eq!(robots_url("https://a.com/"), "https://a.com/robots.txt");
        assert_eq!(robots_url("https://a.com"), "https://a.com/robots.txt");
    }
}
