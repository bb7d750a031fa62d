//! Output artifact storage.
//!
//! Every slug owns at most one artifact in the output directory:
//!
//! ```text
//! <output_dir>/
//!   getting-started.html.md                # transformed Markdown
//!   pricing.not_technical.html.md          # empty rejection marker
//! ```
//!
//! Writing one kind of artifact removes the other. If that removal fails the
//! write still counts and a warning is logged; the freshness cache checks the
//! Markdown artifact first when both are present.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{Error, Result};

/// Suffix of a transformed Markdown artifact.
pub const MARKDOWN_SUFFIX: &str = ".html.md";

/// Suffix of a rejection marker.
pub const MARKER_SUFFIX: &str = ".not_technical.html.md";

/// File-backed store for per-slug artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `root` (the configured output directory).
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the artifacts.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the Markdown artifact for `slug`.
    #[must_use]
    pub fn markdown_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}{MARKDOWN_SUFFIX}"))
    }

    /// Path of the rejection marker for `slug`.
    #[must_use]
    pub fn marker_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}{MARKER_SUFFIX}"))
    }

    /// Create the output directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            Error::Storage(format!(
                "Failed to create output directory '{}': {e}",
                self.root.display()
            ))
        })
    }

    /// Persist the Markdown body for `slug`, replacing any previous artifact.
    ///
    /// Uses atomic write (temp file + rename). A rejection marker for the
    /// same slug is removed afterwards; failing to remove it only logs a
    /// warning, since the Markdown is already in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or committed.
    pub fn save_markdown(&self, slug: &str, markdown: &str) -> Result<PathBuf> {
        let path = self.markdown_path(slug);
        write_atomic(&path, markdown.as_bytes())?;
        if let Err(e) = remove_if_exists(&self.marker_path(slug)) {
            warn!("Saved {} but kept its stale marker: {}", slug, e);
        }
        debug!("Saved {}", path.display());
        Ok(path)
    }

    /// Record `slug` as not technical with an empty marker file.
    ///
    /// Any Markdown artifact for the slug is removed afterwards. As with
    /// [`save_markdown`](Self::save_markdown), a failed removal is only logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker cannot be written.
    pub fn save_marker(&self, slug: &str) -> Result<PathBuf> {
        let path = self.marker_path(slug);
        fs::write(&path, b"").map_err(|e| {
            Error::Storage(format!("Failed to write marker '{}': {e}", path.display()))
        })?;
        if let Err(e) = remove_if_exists(&self.markdown_path(slug)) {
            warn!("Marked {} but kept its stale Markdown: {}", slug, e);
        }
        debug!("Marked {} as not technical", slug);
        Ok(path)
    }

    /// Delete both artifacts for `slug`. Missing files are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be removed.
    pub fn remove_all(&self, slug: &str) -> Result<()> {
        remove_if_exists(&self.markdown_path(slug))?;
        remove_if_exists(&self.marker_path(slug))
    }
}

/// Write `contents` to `path` through a sibling temp file.
///
/// # Errors
///
/// Returns an error if the temp file cannot be written or renamed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, contents).map_err(|e| {
        Error::Storage(format!(
            "Failed to write temp file '{}': {e}",
            tmp_path.display()
        ))
    })?;

    // Handle Windows: remove target before rename
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)
            .map_err(|e| Error::Storage(format!("Failed to remove existing file: {e}")))?;
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::Storage(format!("Failed to commit '{}': {e}", path.display()))
    })
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Storage(format!(
            "Failed to remove '{}': {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ArtifactStore) {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path().join("llms"));
        store.ensure_root().unwrap();
        (temp, store)
    }

    #[test]
    fn test_paths() {
        let store = ArtifactStore::new("/srv/out");
        assert_eq!(
            store.markdown_path("docs-intro"),
            PathBuf::from("/srv/out/docs-intro.html.md")
        );
        assert_eq!(
            store.marker_path("docs-intro"),
            PathBuf::from("/srv/out/docs-intro.not_technical.html.md")
        );
    }

    #[test]
    fn test_save_markdown_overwrites_and_leaves_no_temp() {
        let (_temp, store) = store();
        store.save_markdown("guide", "# Old").unwrap();
        let path = store.save_markdown("guide", "# New").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "# New");
        let names: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["guide.html.md"]);
    }

    #[test]
    fn test_artifacts_are_mutually_exclusive() {
        let (_temp, store) = store();

        store.save_markdown("page", "# Body").unwrap();
        store.save_marker("page").unwrap();
        assert!(!store.markdown_path("page").exists());
        assert_eq!(fs::metadata(store.marker_path("page")).unwrap().len(), 0);

        store.save_markdown("page", "# Back").unwrap();
        assert!(store.markdown_path("page").exists());
        assert!(!store.marker_path("page").exists());
    }

    #[test]
    fn test_stale_counterpart_removal_failure_is_not_fatal() {
        let (_temp, store) = store();

        // A directory cannot be removed with remove_file.
        fs::create_dir(store.marker_path("page")).unwrap();
        let path = store.save_markdown("page", "# Body").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "# Body");

        fs::create_dir(store.markdown_path("other")).unwrap();
        let marker = store.save_marker("other").unwrap();
        assert!(marker.is_file());
    }

    #[test]
    fn test_remove_all_ignores_missing() {
        let (_temp, store) = store();
        store.remove_all("nothing").unwrap();

        store.save_marker("gone").unwrap();
        store.remove_all("gone").unwrap();
        assert!(!store.marker_path("gone").exists());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path().join("absent"));
        let err = store.save_markdown("x", "# X").unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
