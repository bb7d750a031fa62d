//! Per-slug cache decisions from artifact modification times.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};

use crate::storage::ArtifactStore;

const SECONDS_PER_DAY: u64 = 86_400;

/// What to do with a slug before any network work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// A fresh Markdown artifact exists; keep it in the index.
    SkipKeep,
    /// A fresh rejection marker exists; leave the slug out.
    SkipReject,
    /// Process the page from scratch.
    Reprocess,
}

/// Decides whether existing artifacts are young enough to reuse.
///
/// A max-age of zero disables caching: every slug is reprocessed.
#[derive(Debug, Clone)]
pub struct FreshnessCache {
    store: ArtifactStore,
    max_age: Duration,
}

impl FreshnessCache {
    /// Create a cache over `store` accepting artifacts younger than `max_age_days`.
    #[must_use]
    pub fn new(store: ArtifactStore, max_age_days: u32) -> Self {
        Self {
            store,
            max_age: Duration::from_secs(u64::from(max_age_days) * SECONDS_PER_DAY),
        }
    }

    /// Whether caching is enabled at all.
    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.max_age.is_zero()
    }

    /// Decide for `slug` as of now.
    pub fn decide(&self, slug: &str) -> Freshness {
        self.decide_at(slug, SystemTime::now())
    }

    /// Decide for `slug` as of `now`.
    ///
    /// The Markdown artifact is checked before the marker. A stale artifact
    /// of either kind causes both to be deleted.
    pub fn decide_at(&self, slug: &str, now: SystemTime) -> Freshness {
        if !self.enabled() {
            return Freshness::Reprocess;
        }

        let markdown = self.store.markdown_path(slug);
        let marker = self.store.marker_path(slug);

        for (path, verdict) in [
            (&markdown, Freshness::SkipKeep),
            (&marker, Freshness::SkipReject),
        ] {
            let Some(age) = artifact_age(path, now) else {
                continue;
            };
            if age < self.max_age {
                debug!("{} is fresh ({}s old)", path.display(), age.as_secs());
                return verdict;
            }

            debug!("{} is stale, reprocessing {}", path.display(), slug);
            if let Err(e) = self.store.remove_all(slug) {
                warn!("Failed to remove stale artifacts for {}: {}", slug, e);
            }
            return Freshness::Reprocess;
        }

        Freshness::Reprocess
    }
}

/// Age of the file at `path`, or `None` if it does not exist.
///
/// Future modification times count as zero. An unreadable mtime counts as
/// infinitely old.
fn artifact_age(path: &Path, now: SystemTime) -> Option<Duration> {
    let metadata = fs::metadata(path).ok()?;
    let age = metadata.modified().map_or(Duration::MAX, |modified| {
        now.duration_since(modified).unwrap_or(Duration::ZERO)
    });
    Some(age)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    const DAY: Duration = Duration::from_secs(SECONDS_PER_DAY);

    fn setup(max_age_days: u32) -> (TempDir, ArtifactStore, FreshnessCache) {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path());
        let cache = FreshnessCache::new(store.clone(), max_age_days);
        (temp, store, cache)
    }

    fn set_age(path: &Path, age: Duration) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn test_no_artifacts_reprocess() {
        let (_temp, _store, cache) = setup(30);
        assert_eq!(cache.decide("missing"), Freshness::Reprocess);
    }

    #[test]
    fn test_fresh_markdown_is_kept() {
        let (_temp, store, cache) = setup(90);
        let path = store.save_markdown("guide", "# Guide").unwrap();
        set_age(&path, DAY);

        assert_eq!(cache.decide("guide"), Freshness::SkipKeep);
        assert!(path.exists());
    }

    #[test]
    fn test_fresh_marker_is_rejected() {
        let (_temp, store, cache) = setup(30);
        store.save_marker("pricing").unwrap();
        assert_eq!(cache.decide("pricing"), Freshness::SkipReject);
    }

    #[test]
    fn test_stale_marker_deleted_and_reprocessed() {
        let (_temp, store, cache) = setup(30);
        let marker = store.save_marker("blog").unwrap();
        set_age(&marker, DAY * 31);

        assert_eq!(cache.decide("blog"), Freshness::Reprocess);
        assert!(!marker.exists());
    }

    #[test]
    fn test_stale_markdown_deletes_both() {
        let (_temp, store, cache) = setup(7);
        let markdown = store.save_markdown("api", "# API").unwrap();
        set_age(&markdown, DAY * 7);
        // Both present only if written outside the store.
        fs::write(store.marker_path("api"), b"").unwrap();

        assert_eq!(cache.decide("api"), Freshness::Reprocess);
        assert!(!markdown.exists());
        assert!(!store.marker_path("api").exists());
    }

    #[test]
    fn test_markdown_checked_before_marker() {
        let (_temp, store, cache) = setup(30);
        store.save_markdown("both", "# Both").unwrap();
        fs::write(store.marker_path("both"), b"").unwrap();
        assert_eq!(cache.decide("both"), Freshness::SkipKeep);
    }

    #[test]
    fn test_future_mtime_counts_as_fresh() {
        let (_temp, store, cache) = setup(1);
        let path = store.save_markdown("future", "# F").unwrap();
        let now = SystemTime::now() - DAY * 10;
        assert_eq!(cache.decide_at("future", now), Freshness::SkipKeep);
        assert!(path.exists());
    }

    #[test]
    fn test_zero_max_age_always_reprocesses() {
        let (_temp, store, cache) = setup(0);
        let path = store.save_markdown("any", "# Any").unwrap();

        assert!(!cache.enabled());
        assert_eq!(cache.decide("any"), Freshness::Reprocess);
        assert!(path.exists());
    }
}
