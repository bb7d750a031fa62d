//! HTML sanitization ahead of classification.
//!
//! Pages are reduced to the markup that carries documentation content before
//! they are sent to the backend. The pass runs in four steps:
//!
//! 1. Drop `<script>`, `<style>`, `<header>`, `<nav>` and `<footer>` elements
//!    together with their content, and HTML comments
//! 2. Narrow to the main content region: the first `<article>`, else the
//!    first element whose `class` mentions `entry-content`, `content` or
//!    `main`, else the whole remaining document
//! 3. Strip every tag outside [`ALLOWED_TAGS`], keeping allowed tags verbatim
//! 4. Trim surrounding whitespace
//!
//! An empty result means the page has no usable body.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Tags that survive sanitization, attributes included.
pub const ALLOWED_TAGS: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "pre",
    "code",
    "table",
    "thead",
    "tbody",
    "tr",
    "td",
    "th",
    "blockquote",
    "strong",
    "em",
    "dl",
    "dt",
    "dd",
    "figure",
    "figcaption",
];

/// Reduces raw HTML to content markup.
pub trait Sanitizer: Send + Sync {
    /// Clean `html`. An empty string means nothing usable remained.
    fn clean(&self, html: &str) -> String;
}

static NOISE_ELEMENT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["script", "style", "header", "nav", "footer"]
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).unwrap())
        .collect()
});

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<article\b[^>]*>(.*?)</article\s*>").unwrap());

static CONTENT_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<([a-z][a-z0-9]*)\b[^>]*?\bclass\s*=\s*["'][^"']*(?:entry-content|content|main)[^"']*["'][^>]*>"#,
    )
    .unwrap()
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)</?([A-Za-z][A-Za-z0-9]*)\b[^>]*>|<[!?][^>]*>").unwrap()
});

/// Regex-driven [`Sanitizer`].
///
/// ```rust
/// use llmsgen_core::sanitize::{RegexSanitizer, Sanitizer};
///
/// let html = r#"<html><body><nav>Menu</nav>
/// <article><h1 id="t">Install</h1><div><p>Run <code>make</code>.</p></div></article>
/// </body></html>"#;
///
/// assert_eq!(
///     RegexSanitizer.clean(html),
///     r#"<h1 id="t">Install</h1><p>Run <code>make</code>.</p>"#
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexSanitizer;

impl RegexSanitizer {
    fn remove_noise(html: &str) -> String {
        let mut out = COMMENT_RE.replace_all(html, "").into_owned();
        for re in NOISE_ELEMENT_RES.iter() {
            out = re.replace_all(&out, "").into_owned();
        }
        out
    }

    fn main_region(html: &str) -> &str {
        if let Some(inner) = ARTICLE_RE.captures(html).and_then(|caps| caps.get(1)) {
            return inner.as_str();
        }
        Self::class_region(html).unwrap_or(html)
    }

    /// Inner content of the first content-classed element, up to the first
    /// closing tag with the same name.
    fn class_region(html: &str) -> Option<&str> {
        let caps = CONTENT_CLASS_RE.captures(html)?;
        let open = caps.get(0)?;
        let name = caps.get(1)?.as_str().to_ascii_lowercase();
        let start = open.end();
        let end = start + find_closing_tag(&html[start..], &name)?;
        Some(&html[start..end])
    }

    fn strip_tags(html: &str) -> String {
        TAG_RE
            .replace_all(html, |caps: &Captures<'_>| {
                let allowed = caps.get(1).is_some_and(|name| {
                    ALLOWED_TAGS
                        .iter()
                        .any(|tag| tag.eq_ignore_ascii_case(name.as_str()))
                });
                if allowed {
                    caps[0].to_string()
                } else {
                    String::new()
                }
            })
            .into_owned()
    }
}

impl Sanitizer for RegexSanitizer {
    fn clean(&self, html: &str) -> String {
        let without_noise = Self::remove_noise(html);
        let region = Self::main_region(&without_noise);
        Self::strip_tags(region).trim().to_string()
    }
}

/// Byte offset of the first `</name>` (case-insensitive, optional whitespace
/// before `>`) in `haystack`.
fn find_closing_tag(haystack: &str, name: &str) -> Option<usize> {
    let lowered = haystack.to_ascii_lowercase();
    let needle = format!("</{name}");
    let mut from = 0;
    while let Some(pos) = lowered[from..].find(&needle) {
        let at = from + pos;
        let rest = lowered[at + needle.len()..].trim_start();
        if rest.starts_with('>') {
            return Some(at);
        }
        from = at + needle.len();
    }
    None
}
