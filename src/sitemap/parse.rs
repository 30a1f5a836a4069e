// src/sitemap/parse.rs
// =============================================================================
// Turns a sitemap body into something we can act on.
//
// Structured parsing walks the XML with quick-xml and classifies the root:
// - <urlset>       -> page entries (loc + optional lastmod/priority/changefreq)
// - <sitemapindex> -> nested sitemap URLs to expand
// - news root      -> recognized, but we do not decode it
// - anything else  -> parse error
//
// When structured parsing fails, scan_locs() pulls every <loc>...</loc> out of
// the raw text, ignoring structure entirely.
// =============================================================================

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Result, ScoutError};
use crate::links::LinkEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// A <urlset>: the entries it lists
    UrlSet(Vec<LinkEntry>),
    /// A <sitemapindex>: the nested sitemap URLs, in document order
    Index(Vec<String>),
    /// A format we recognize but do not decode (the root element's name)
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootKind {
    UrlSet,
    Index,
    News,
}

// Fields collected for the <url> or <sitemap> element being read
#[derive(Debug, Default)]
struct PendingEntry {
    loc: String,
    lastmod: String,
    priority: String,
    changefreq: String,
}

impl PendingEntry {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "loc" => Some(&mut self.loc),
            "lastmod" => Some(&mut self.lastmod),
            "priority" => Some(&mut self.priority),
            "changefreq" => Some(&mut self.changefreq),
            _ => None,
        }
    }

    fn into_link(self, source: &str) -> Option<LinkEntry> {
        let url = self.loc.trim();
        if url.is_empty() {
            return None;
        }

        Some(LinkEntry {
            url: url.to_string(),
            source: Some(source.to_string()),
            lastmod: non_empty(self.lastmod),
            priority: non_empty(self.priority),
            changefreq: non_empty(self.changefreq),
            ..Default::default()
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn classify_root(e: &BytesStart, sitemap_url: &str) -> Result<RootKind> {
    let local = local_name(e);
    let name = e.name();
    let prefix = name.prefix().map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());

    match local.as_str() {
        "urlset" => Ok(RootKind::UrlSet),
        "sitemapindex" => Ok(RootKind::Index),
        _ if local == "news" || prefix.as_deref() == Some("news") => Ok(RootKind::News),
        _ => Err(ScoutError::parse(
            sitemap_url,
            format!("unrecognized root element <{}>", String::from_utf8_lossy(name.as_ref())),
        )),
    }
}

// Parses a sitemap body
//
// `sitemap_url` becomes the `source` of every entry and is used in errors.
// Any XML error, an element left open at the end of the body, or an unknown
// root is a parse error; the caller falls back to scan_locs().
pub fn parse_sitemap(xml: &str, sitemap_url: &str) -> Result<SitemapDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut kind: Option<RootKind> = None;
    // local names of the open elements, root first
    let mut stack: Vec<String> = Vec::new();
    let mut pending = PendingEntry::default();
    let mut links = Vec::new();
    let mut nested = Vec::new();

    loop {
        let text = match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = local_name(&e);
                if stack.is_empty() {
                    if kind.is_some() {
                        return Err(ScoutError::parse(sitemap_url, "more than one root element"));
                    }
                    kind = Some(classify_root(&e, sitemap_url)?);
                } else if stack.len() == 1 {
                    pending = PendingEntry::default();
                }
                stack.push(name);
                continue;
            }
            Ok(Event::Empty(e)) => {
                // a self-closing root such as <urlset/> is an empty document
                if stack.is_empty() {
                    if kind.is_some() {
                        return Err(ScoutError::parse(sitemap_url, "more than one root element"));
                    }
                    kind = Some(classify_root(&e, sitemap_url)?);
                }
                continue;
            }
            Ok(Event::End(_)) => {
                let name = stack
                    .pop()
                    .ok_or_else(|| ScoutError::parse(sitemap_url, "unexpected closing tag"))?;
                if stack.len() == 1 {
                    let entry = std::mem::take(&mut pending);
                    match (kind, name.as_str()) {
                        (Some(RootKind::UrlSet), "url") => links.extend(entry.into_link(sitemap_url)),
                        (Some(RootKind::Index), "sitemap") => {
                            let loc = entry.loc.trim();
                            if !loc.is_empty() {
                                nested.push(loc.to_string());
                            }
                        }
                        _ => {}
                    }
                }
                continue;
            }
            Ok(Event::Text(t)) => t
                .unescape()
                .map_err(|e| ScoutError::parse(sitemap_url, e))?
                .into_owned(),
            Ok(Event::CData(c)) => String::from_utf8_lossy(&c.into_inner()).into_owned(),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ScoutError::parse(
                    sitemap_url,
                    format!("{} at byte {}", e, reader.buffer_position()),
                ))
            }
            Ok(_) => continue,
        };

        // only direct children of <url>/<sitemap> carry data we read;
        // extension elements such as <image:image><image:loc> sit deeper
        if stack.len() == 3 {
            if let Some(field) = pending.field_mut(&stack[2]) {
                field.push_str(&text);
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(ScoutError::parse(
            sitemap_url,
            format!("document ended before <{}> was closed", open),
        ));
    }

    match kind {
        Some(RootKind::UrlSet) => Ok(SitemapDocument::UrlSet(links)),
        Some(RootKind::Index) => Ok(SitemapDocument::Index(nested)),
        Some(RootKind::News) => Ok(SitemapDocument::Unsupported("news".to_string())),
        None => Err(ScoutError::parse(sitemap_url, "no root element")),
    }
}

// Permissive fallback: every <loc>...</loc> anywhere in the text
pub fn scan_locs(body: &str, sitemap_url: &str) -> Vec<LinkEntry> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?s)<loc>(.*?)</loc>").expect("loc regex is valid"));

    re.captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|url| !url.is_empty())
        .map(|url| LinkEntry::from_source(url, sitemap_url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "https://a.com/sitemap.xml";

    #[test]
    fn test_urlset_with_metadata() {
        let xml = r#"<urlset><url><loc>https://a.com/1</loc><lastmod>2024-01-01</lastmod></url></urlset>"#;

        let doc = parse_sitemap(xml, SOURCE).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec![LinkEntry {
                url: "https://a.com/1".to_string(),
                source: Some(SOURCE.to_string()),
                lastmod: Some("2024-01-01".to_string()),
                ..Default::default()
            }])
        );
    }

    #[test]
    fn test_urlset_with_namespaces_and_extensions() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
  <url>
    <loc> https://a.com/page?a=1&amp;b=2 </loc>
    <changefreq>weekly</changefreq>
    <priority>0.8</priority>
    <image:image><image:loc>https://a.com/img.png</image:loc></image:image>
  </url>
  <url>
    <loc><![CDATA[https://a.com/cdata]]></loc>
  </url>
  <url>
    <lastmod>2024-02-02</lastmod>
  </url>
</urlset>"#;

        let SitemapDocument::UrlSet(links) = parse_sitemap(xml, SOURCE).unwrap() else {
            panic!("expected a urlset");
        };

        // the entry without <loc> is skipped, the image loc is not a page
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "https://a.com/page?a=1&b=2");
        assert_eq!(links[0].changefreq.as_deref(), Some("weekly"));
        assert_eq!(links[0].priority.as_deref(), Some("0.8"));
        assert_eq!(links[0].lastmod, None);
        assert_eq!(links[1].url, "https://a.com/cdata");
    }

    #[test]
    fn test_sitemap_index() {
        let xml = r#"<sitemapindex>
            <sitemap><loc>https://a.com/s1.xml</loc><lastmod>2024-01-01</lastmod></sitemap>
            <sitemap><lastmod>2024-01-01</lastmod></sitemap>
            <sitemap><loc>https://a.com/s2.xml</loc></sitemap>
        </sitemapindex>"#;

        assert_eq!(
            parse_sitemap(xml, SOURCE).unwrap(),
            SitemapDocument::Index(vec![
                "https://a.com/s1.xml".to_string(),
                "https://a.com/s2.xml".to_string(),
            ])
        );
    }

    #[test]
    fn test_news_root_is_recognized_but_not_decoded() {
        let xml = r#"<news:news xmlns:news="http://www.google.com/schemas/sitemap-news/0.9">
            <news:title>Headline</news:title>
        </news:news>"#;

        assert_eq!(
            parse_sitemap(xml, SOURCE).unwrap(),
            SitemapDocument::Unsupported("news".to_string())
        );
    }

    #[test]
    fn test_empty_self_closing_urlset() {
        assert_eq!(
            parse_sitemap("<urlset/>", SOURCE).unwrap(),
            SitemapDocument::UrlSet(vec![])
        );
    }

    #[test]
    fn test_unknown_root_is_a_parse_error() {
        let result = parse_sitemap("<html><body>hi</body></html>", SOURCE);
        assert!(matches!(result, Err(ScoutError::Parse { .. })));
    }

    #[test]
    fn test_mismatched_tags_are_a_parse_error() {
        let result = parse_sitemap("<urlset><url><loc>https://a.com/2</loc></urlset>", SOURCE);
        assert!(matches!(result, Err(ScoutError::Parse { .. })));
    }

    #[test]
    fn test_truncated_document_is_a_parse_error() {
        let result = parse_sitemap("<urlset><url><loc>https://a.com/2</loc></url>", SOURCE);
        assert!(matches!(result, Err(ScoutError::Parse { .. })));
    }

    #[test]
    fn test_empty_body_is_a_parse_error() {
        assert!(parse_sitemap("", SOURCE).is_err());
    }

    #[test]
    fn test_scan_locs_ignores_structure() {
        let body = "garbage <<< <loc>https://a.com/2</loc> more </nope> <loc>\n https://a.com/3 \n</loc><loc></loc>";

        assert_eq!(
            scan_locs(body, SOURCE),
            vec![
                LinkEntry::from_source("https://a.com/2", SOURCE),
                LinkEntry::from_source("https://a.com/3", SOURCE),
            ]
        );
    }
}
