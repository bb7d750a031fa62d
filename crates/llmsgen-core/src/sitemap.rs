//! Sitemap URL discovery.
//!
//! URLs are taken from every `<loc>...</loc>` occurrence in the document.
//! This is a tag-content match rather than an XML parse, so both `<urlset>`
//! sitemaps and malformed documents yield whatever `<loc>` values they carry.
//!
//! ```rust
//! use llmsgen_core::sitemap::extract_urls;
//!
//! let xml = r#"<urlset>
//!   <url><loc>https://example.com/docs/</loc></url>
//!   <url><loc>https://example.com/api?a=1&amp;b=2</loc></url>
//!   <url><loc>https://example.com/docs/</loc></url>
//! </urlset>"#;
//!
//! assert_eq!(
//!     extract_urls(xml),
//!     vec!["https://example.com/docs/", "https://example.com/api?a=1&b=2"]
//! );
//! ```

use crate::fetcher::PageFetcher;
use crate::{Error, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{info, instrument};

static LOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<loc>(.*?)</loc>").unwrap());

/// Extract `<loc>` values in document order, decoded and de-duplicated.
///
/// Empty values are dropped; the first occurrence of a URL wins.
#[must_use]
pub fn extract_urls(xml: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    LOC_RE
        .captures_iter(xml)
        .filter_map(|caps| {
            let raw = caps.get(1)?.as_str().trim();
            let url = html_escape::decode_html_entities(raw).trim().to_string();
            (!url.is_empty() && seen.insert(url.clone())).then_some(url)
        })
        .collect()
}

/// Fetch a sitemap and return its page URLs.
///
/// # Errors
///
/// Returns [`Error::Sitemap`] if the sitemap cannot be fetched or contains
/// no `<loc>` entries. Both abort the run.
#[instrument(skip(fetcher))]
pub async fn fetch_sitemap<F: PageFetcher + ?Sized>(fetcher: &F, url: &str) -> Result<Vec<String>> {
    let xml = fetcher
        .fetch(url)
        .await
        .map_err(|e| Error::Sitemap(format!("Failed to fetch sitemap '{url}': {e}")))?;

    let urls = extract_urls(&xml);
    if urls.is_empty() {
        return Err(Error::Sitemap(format!("No <loc> entries found in '{url}'")));
    }

    info!("Found {} URLs in sitemap", urls.len());
    Ok(urls)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fetcher::HttpFetcher;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_preserves_order_and_dedupes() {
        let xml = "<urlset>\
            <url><loc>https://e.com/b</loc></url>\
            <url><loc>https://e.com/a</loc></url>\
            <url><loc>https://e.com/b</loc></url>\
            <url><loc>https://e.com/c</loc></url>\
            </urlset>";
        assert_eq!(
            extract_urls(xml),
            vec!["https://e.com/b", "https://e.com/a", "https://e.com/c"]
        );
    }

    #[test]
    fn test_extract_handles_whitespace_case_and_multiline() {
        let xml = "<URL><LOC>\n    https://e.com/page\n  </LOC></URL><loc></loc><loc>   </loc>";
        assert_eq!(extract_urls(xml), vec!["https://e.com/page"]);
    }

    #[test]
    fn test_extract_no_locs() {
        assert!(extract_urls("<urlset></urlset>").is_empty());
        assert!(extract_urls("not xml at all").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sitemap_success() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<urlset><url><loc>https://e.com/one</loc></url></urlset>",
            ))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("llmsgen-test")?;
        let urls = fetch_sitemap(&fetcher, &format!("{}/sitemap.xml", server.uri())).await?;
        assert_eq!(urls, vec!["https://e.com/one"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_sitemap_without_locs_is_error() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<urlset></urlset>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("llmsgen-test")?;
        let err = fetch_sitemap(&fetcher, &format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Sitemap(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_sitemap_http_error() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("llmsgen-test")?;
        let err = fetch_sitemap(&fetcher, &format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"));
        Ok(())
    }
}
