//! Slug derivation from page URLs.
//!
//! A slug names a page's output artifacts. It is derived from the URL path
//! only, so the same path on any host maps to the same slug.
//!
//! ## Rules
//!
//! - Lowercase the path
//! - Replace every run of characters outside `[a-z0-9_.-]` with one hyphen
//! - Collapse repeated hyphens and trim them from both ends
//! - An empty result (the site root) becomes `index`

use regex::Regex;
use std::sync::LazyLock;

/// Slug used for the site root.
pub const ROOT_SLUG: &str = "index";

static DISALLOWED_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_.\-]+").unwrap());

static HYPHEN_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Derive the slug for a page URL.
///
/// Strings that do not parse as absolute URLs are treated as a bare path.
///
/// ```rust
/// use llmsgen_core::slug::slug_from_url;
///
/// assert_eq!(slug_from_url("https://example.com/foo//Bar_Baz!"), "foo-bar_baz");
/// assert_eq!(slug_from_url("https://example.com/"), "index");
/// assert_eq!(slug_from_url("https://example.com/docs/getting-started/"), "docs-getting-started");
/// ```
#[must_use]
pub fn slug_from_url(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => slug_from_path(parsed.path()),
        Err(_) => slug_from_path(url.split(['?', '#']).next().unwrap_or_default()),
    }
}

/// Derive a slug from a URL path.
#[must_use]
pub fn slug_from_path(path: &str) -> String {
    let lowered = path.to_lowercase();
    let replaced = DISALLOWED_RUN_RE.replace_all(&lowered, "-");
    let collapsed = HYPHEN_RUN_RE.replace_all(&replaced, "-");
    let slug = collapsed.trim_matches('-');
    if slug.is_empty() {
        ROOT_SLUG.to_string()
    } else {
        slug.to_string()
    }
}
