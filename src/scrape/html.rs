// src/scrape/html.rs
// =============================================================================
// This module extracts links from one HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken markup still parses
//
// We also use the `url` crate to resolve relative hrefs against the page URL.
//
// Only two kinds of href are skipped: pure fragments ("#top") and script
// pseudo-URLs ("javascript:..."). Everything else is kept, including
// off-site links and mailto:/tel: links.
// =============================================================================

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::links::LinkEntry;

// Extracts all links from HTML content, in document order
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL of the page (for resolving relative links); it is
//             also copied verbatim into every entry's `source`
//
// Example:
//   html = "<a href='/about'>About us</a>"
//   page_url = "https://a.com/x"
//   result = [{ url: "https://a.com/about", text: "About us", source: "https://a.com/x" }]
pub fn extract_page_links(html: &str, page_url: &str) -> Vec<LinkEntry> {
    // If the page URL is invalid we can't resolve relative links
    let page = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            debug!(%page_url, error = %e, "invalid page URL");
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("anchor selector is valid");

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            let url = resolve_href(&page, href)?;

            let text = element.text().collect::<String>();
            let text = text.trim();

            Some(LinkEntry {
                url,
                text: (!text.is_empty()).then(|| text.to_string()),
                source: Some(page_url.to_string()),
                ..Default::default()
            })
        })
        .collect()
}

// Resolves an href to an absolute URL, or None when it should be skipped
//
// Examples:
//   base = "https://a.com/x"
//   href = "/about"             -> Some("https://a.com/about")
//   href = "https://other.com"  -> Some("https://other.com/")
//   href = "mailto:me@a.com"    -> Some("mailto:me@a.com")
//   href = "#section"           -> None
//   href = "javascript:void(0)" -> None
fn resolve_href(base: &Url, href: &str) -> Option<String> {
    if href.is_empty() || href.starts_with('#') || is_script(href) {
        return None;
    }

    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!(%href, error = %e, "skipping unresolvable href");
            None
        }
    }
}

fn is_script(href: &str) -> bool {
    href.get(..11)
        .map(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
        .unwrap_or(false)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does extract_page_links take &str and not Url?
//    - The caller's string is copied into `source` untouched
//    - Url::parse normalizes ("https://a.com" becomes "https://a.com/"),
//      which would change provenance the caller handed us
//
// 2. What does element.text() return?
//    - An iterator over every text node inside the element
//    - collect::<String>() glues them together, so <a>Hi <b>there</b></a>
//      becomes "Hi there"
//
// 3. What is bool::then?
//    - (cond).then(|| value) gives Some(value) when cond is true, else None
// -----------------------------------------------------------------------------
