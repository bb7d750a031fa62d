//! Prompt construction and reply interpretation for the three backend roles.
//!
//! | Role        | Input          | Reply used as                         |
//! |-------------|----------------|---------------------------------------|
//! | Relevance   | sanitized HTML | verdict: only `YES` proceeds          |
//! | Transform   | sanitized HTML | full Markdown body, fences stripped   |
//! | Description | Markdown       | first line, or a generic fallback     |

use regex::Regex;
use std::sync::LazyLock;

/// Token budget for the relevance verdict.
pub const RELEVANCE_MAX_TOKENS: u32 = 5;

/// Token budget for the Markdown conversion.
pub const TRANSFORM_MAX_TOKENS: u32 = 4096;

/// Token budget for the one-line description.
pub const DESCRIPTION_MAX_TOKENS: u32 = 100;

/// Used when the description call fails or returns nothing.
pub const FALLBACK_DESCRIPTION: &str = "Technical documentation page.";

/// Used for pages kept from a previous run without calling the backend.
pub const CACHED_DESCRIPTION: &str = "Cached technical documentation page.";

static OPENING_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A```(?:markdown)?[ \t]*(?:\r?\n)?").unwrap());

static CLOSING_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n)?```\s*\z").unwrap());

/// Ask whether a page is technical documentation.
#[must_use]
pub fn relevance_prompt(html: &str) -> String {
    format!(
        "You are reviewing a page from a website. Decide whether it is technical \
documentation: API references, developer guides, tutorials, configuration or \
installation instructions, or similar material written for developers and operators. \
Marketing pages, blog posts, news, legal text, pricing and contact pages are not \
technical documentation.\n\n\
Answer with exactly one word: YES or NO.\n\n\
Page content:\n{html}"
    )
}

/// Ask for the page rewritten as clean Markdown.
#[must_use]
pub fn transform_prompt(html: &str) -> String {
    format!(
        "Convert the following HTML documentation into clean, well-structured Markdown.\n\
Rules:\n\
- Keep every technical detail: code samples, parameters, tables, warnings.\n\
- Use ATX headings (#, ##, ###) and fenced code blocks with a language tag when known.\n\
- Drop navigation remnants, cookie notices and calls to action.\n\
- Do not add commentary, summaries or content that is not in the source.\n\
- Reply with the Markdown document only.\n\n\
HTML:\n{html}"
    )
}

/// Ask for a one-sentence description of a Markdown document.
#[must_use]
pub fn description_prompt(markdown: &str) -> String {
    format!(
        "Write a single sentence (at most 25 words) describing what the following \
documentation page covers. Reply with the sentence only, no quotes or prefix.\n\n\
Document:\n{markdown}"
    )
}

/// Whether a relevance reply is affirmative.
///
/// Only `YES` counts, ignoring case and surrounding whitespace.
///
/// ```rust
/// use llmsgen_core::llm::prompts::is_affirmative;
///
/// assert!(is_affirmative(" yes\n"));
/// assert!(!is_affirmative("Yes, it is."));
/// assert!(!is_affirmative(""));
/// ```
#[must_use]
pub fn is_affirmative(reply: &str) -> bool {
    reply.trim().eq_ignore_ascii_case("YES")
}

/// Remove a code fence wrapping a transform reply and trim the result.
///
/// The opening fence may carry a `markdown` info string. A closing fence is
/// only removed together with an opening one, so replies that merely end in
/// a code block keep it intact.
///
/// ```rust
/// use llmsgen_core::llm::prompts::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```markdown\n# Title\n```"), "# Title");
/// assert_eq!(strip_code_fence("# Title"), "# Title");
/// ```
#[must_use]
pub fn strip_code_fence(reply: &str) -> String {
    let trimmed = reply.trim();
    let Some(open) = OPENING_FENCE_RE.find(trimmed) else {
        return trimmed.to_string();
    };
    let inner = &trimmed[open.end()..];
    CLOSING_FENCE_RE.replace(inner, "").trim().to_string()
}

/// First non-blank line of a description reply, trimmed. `None` if the reply
/// is blank.
#[must_use]
pub fn first_line(reply: &str) -> Option<String> {
    let line = reply.trim_start().split('\n').next().unwrap_or_default().trim();
    (!line.is_empty()).then(|| line.to_string())
}
