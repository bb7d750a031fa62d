//! Per-URL workflow driving a generation run.
//!
//! URLs are processed strictly one after another:
//!
//! ```text
//! slug -> freshness -> fetch -> sanitize -> relevance -> transform -> describe -> persist
//! ```
//!
//! Failures after the freshness check only affect the URL being processed.
//! Each URL ends in exactly one [`PageOutcome`], and the outcomes are tallied
//! into a [`RunReport`] whose entries feed the index.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info, instrument, warn};

use crate::fetcher::PageFetcher;
use crate::freshness::{Freshness, FreshnessCache};
use crate::index::IndexEntry;
use crate::llm::TextGenerator;
use crate::llm::prompts::{
    self, CACHED_DESCRIPTION, DESCRIPTION_MAX_TOKENS, FALLBACK_DESCRIPTION, RELEVANCE_MAX_TOKENS,
    TRANSFORM_MAX_TOKENS,
};
use crate::sanitize::{RegexSanitizer, Sanitizer};
use crate::slug::slug_from_url;
use crate::storage::ArtifactStore;

/// Why a URL was skipped without touching its artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The page could not be fetched.
    FetchFailed,
    /// Nothing was left after sanitization.
    EmptyContent,
    /// The Markdown transform failed or came back empty.
    TransformFailed,
    /// The Markdown artifact could not be written.
    WriteFailed,
    /// Another URL earlier in the run already produced this slug.
    DuplicateSlug,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::FetchFailed => "fetch failed",
            Self::EmptyContent => "no content after sanitizing",
            Self::TransformFailed => "transform failed",
            Self::WriteFailed => "write failed",
            Self::DuplicateSlug => "duplicate slug",
        };
        f.write_str(reason)
    }
}

/// Result of processing one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Transformed and saved this run.
    Written(IndexEntry),
    /// Kept from a previous run without any network calls.
    CachedKeep(IndexEntry),
    /// Rejected in a previous run; left out without any network calls.
    CachedReject,
    /// Classified as not technical this run.
    Rejected,
    /// Dropped for this run; eligible for retry next run.
    Skipped(SkipReason),
}

/// Counters and index entries for a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// URLs considered after de-duplication and limiting.
    pub total: usize,
    /// Pages transformed and written this run.
    pub written: usize,
    /// Pages kept from the cache.
    pub cached_kept: usize,
    /// Pages excluded by a fresh rejection marker.
    pub cached_rejected: usize,
    /// Pages classified as not technical this run.
    pub rejected: usize,
    /// Pages skipped because of an error.
    pub skipped: usize,
    /// Retained pages in processing order.
    pub entries: Vec<IndexEntry>,
}

impl RunReport {
    fn record(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Written(entry) => {
                self.written += 1;
                self.entries.push(entry);
            },
            PageOutcome::CachedKeep(entry) => {
                self.cached_kept += 1;
                self.entries.push(entry);
            },
            PageOutcome::CachedReject => self.cached_rejected += 1,
            PageOutcome::Rejected => self.rejected += 1,
            PageOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} URLs: {} written, {} cached, {} cached rejections, {} rejected, {} skipped",
            self.total,
            self.written,
            self.cached_kept,
            self.cached_rejected,
            self.rejected,
            self.skipped
        )
    }
}

/// Drives fetching, classification, transformation and persistence.
pub struct Pipeline<F: PageFetcher, G: TextGenerator, S: Sanitizer = RegexSanitizer> {
    fetcher: F,
    generator: G,
    sanitizer: S,
    store: ArtifactStore,
    cache: FreshnessCache,
    write_markers: bool,
    limit: Option<usize>,
}

impl<F: PageFetcher, G: TextGenerator> Pipeline<F, G> {
    /// Create a pipeline writing into `store` and reusing artifacts younger
    /// than `max_age_days`.
    #[must_use]
    pub fn new(fetcher: F, generator: G, store: ArtifactStore, max_age_days: u32) -> Self {
        let cache = FreshnessCache::new(store.clone(), max_age_days);
        Self {
            fetcher,
            generator,
            sanitizer: RegexSanitizer,
            store,
            cache,
            write_markers: true,
            limit: None,
        }
    }
}

impl<F: PageFetcher, G: TextGenerator, S: Sanitizer> Pipeline<F, G, S> {
    /// Replace the sanitizer.
    #[must_use]
    pub fn with_sanitizer<T: Sanitizer>(self, sanitizer: T) -> Pipeline<F, G, T> {
        Pipeline {
            fetcher: self.fetcher,
            generator: self.generator,
            sanitizer,
            store: self.store,
            cache: self.cache,
            write_markers: self.write_markers,
            limit: self.limit,
        }
    }

    /// Whether rejected pages get a marker file (default on).
    #[must_use]
    pub const fn with_markers(mut self, write_markers: bool) -> Self {
        self.write_markers = write_markers;
        self
    }

    /// Consider at most `limit` URLs.
    #[must_use]
    pub const fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Process `urls` in order and report the outcome.
    ///
    /// Duplicate URLs are dropped before the limit is applied. A URL whose
    /// slug was already produced earlier in the run is skipped.
    pub async fn run(&self, urls: &[String]) -> RunReport {
        let mut seen_urls = HashSet::new();
        let queue: Vec<&str> = urls
            .iter()
            .map(String::as_str)
            .filter(|url| seen_urls.insert(*url))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();

        let mut report = RunReport {
            total: queue.len(),
            ..RunReport::default()
        };
        let mut seen_slugs = HashSet::new();

        for (idx, url) in queue.iter().enumerate() {
            let slug = slug_from_url(url);
            info!("[{}/{}] {} ({})", idx + 1, report.total, url, slug);

            let outcome = if seen_slugs.insert(slug.clone()) {
                self.process_url(url, &slug).await
            } else {
                warn!("Skipping {}: slug '{}' already used in this run", url, slug);
                PageOutcome::Skipped(SkipReason::DuplicateSlug)
            };
            report.record(outcome);
        }

        info!("Run complete: {}", report);
        report
    }

    /// Process one URL whose slug is `slug`.
    #[instrument(skip(self))]
    pub async fn process_url(&self, url: &str, slug: &str) -> PageOutcome {
        match self.cache.decide(slug) {
            Freshness::SkipKeep => {
                debug!("Keeping cached artifact for {}", slug);
                return PageOutcome::CachedKeep(IndexEntry {
                    slug: slug.to_string(),
                    description: CACHED_DESCRIPTION.to_string(),
                });
            },
            Freshness::SkipReject => {
                debug!("{} was rejected recently, skipping", slug);
                return PageOutcome::CachedReject;
            },
            Freshness::Reprocess => {},
        }

        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                return PageOutcome::Skipped(SkipReason::FetchFailed);
            },
        };

        let cleaned = self.sanitizer.clean(&html);
        if cleaned.is_empty() {
            warn!("No usable content in {}", url);
            return PageOutcome::Skipped(SkipReason::EmptyContent);
        }

        if !self.is_technical(url, &cleaned).await {
            info!("Not technical: {}", url);
            if self.write_markers {
                if let Err(e) = self.store.save_marker(slug) {
                    warn!("Failed to write marker for {}: {}", slug, e);
                }
            }
            return PageOutcome::Rejected;
        }

        let Some(markdown) = self.transform(url, &cleaned).await else {
            return PageOutcome::Skipped(SkipReason::TransformFailed);
        };

        let description = self.describe(url, &markdown).await;

        if let Err(e) = self.store.save_markdown(slug, &markdown) {
            warn!("Failed to save {}: {}", slug, e);
            return PageOutcome::Skipped(SkipReason::WriteFailed);
        }

        info!("Wrote {} ({} chars)", slug, markdown.len());
        PageOutcome::Written(IndexEntry {
            slug: slug.to_string(),
            description,
        })
    }

    async fn is_technical(&self, url: &str, cleaned: &str) -> bool {
        match self
            .generator
            .complete(&prompts::relevance_prompt(cleaned), RELEVANCE_MAX_TOKENS)
            .await
        {
            Ok(reply) => {
                debug!("Relevance verdict for {}: {:?}", url, reply.trim());
                prompts::is_affirmative(&reply)
            },
            Err(e) => {
                warn!("Relevance check failed for {}: {}", url, e);
                false
            },
        }
    }

    async fn transform(&self, url: &str, cleaned: &str) -> Option<String> {
        match self
            .generator
            .complete(&prompts::transform_prompt(cleaned), TRANSFORM_MAX_TOKENS)
            .await
        {
            Ok(reply) => {
                let markdown = prompts::strip_code_fence(&reply);
                if markdown.is_empty() {
                    warn!("Transform of {} returned no content", url);
                    None
                } else {
                    Some(markdown)
                }
            },
            Err(e) => {
                warn!("Transform failed for {}: {}", url, e);
                None
            },
        }
    }

    async fn describe(&self, url: &str, markdown: &str) -> String {
        match self
            .generator
            .complete(&prompts::description_prompt(markdown), DESCRIPTION_MAX_TOKENS)
            .await
        {
            Ok(reply) => prompts::first_line(&reply).unwrap_or_else(|| {
                warn!("Empty description for {}, using fallback", url);
                FALLBACK_DESCRIPTION.to_string()
            }),
            Err(e) => {
                warn!("Description failed for {}: {}, using fallback", url, e);
                FALLBACK_DESCRIPTION.to_string()
            },
        }
    }
}
