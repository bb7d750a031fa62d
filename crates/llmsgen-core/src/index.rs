//! Index document rendering for `llms.txt`.
//!
//! The index is regenerated from scratch on every run and written to the web
//! root, replacing any previous file.
//!
//! ## Format
//!
//! ```markdown
//! # Example
//!
//! > Developer documentation for Example.
//!
//! ## Documentation
//!
//! - [getting-started](/llms/getting-started.html.md): How to install Example.
//! ```
//!
//! When no page was retained, the `Documentation` section is replaced by the
//! line [`EMPTY_INDEX_LINE`].
//!
//! ## Example
//!
//! ```rust
//! use llmsgen_core::index::{IndexEntry, IndexWriter};
//!
//! let writer = IndexWriter::new("Example", "", "/llms");
//! let entries = vec![IndexEntry {
//!     slug: "api".to_string(),
//!     description: "API reference.".to_string(),
//! }];
//!
//! let rendered = writer.render(&entries);
//! assert!(rendered.contains("- [api](/llms/api.html.md): API reference."));
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::storage::{MARKDOWN_SUFFIX, write_atomic};
use crate::{Config, Result};

/// File name of the index inside the web root.
pub const INDEX_FILE_NAME: &str = "llms.txt";

/// Replaces the documentation section when no page was retained.
pub const EMPTY_INDEX_LINE: &str = "No technical documentation pages found.";

/// A page retained in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Slug naming the Markdown artifact.
    pub slug: String,
    /// One-line description.
    pub description: String,
}

/// Renders and writes the index document.
#[derive(Debug, Clone)]
pub struct IndexWriter {
    project_name: String,
    project_summary: String,
    link_base: String,
}

impl IndexWriter {
    /// Create a writer emitting links as `<link_base>/<slug>.html.md`.
    #[must_use]
    pub fn new(
        project_name: impl Into<String>,
        project_summary: impl Into<String>,
        link_base: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            project_summary: project_summary.into(),
            link_base: link_base.into(),
        }
    }

    /// Build a writer from configuration.
    ///
    /// The link base is the output directory's location under the web root,
    /// prefixed with the site URL when absolute links are enabled.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let prefix = link_prefix(&config.output_dir, &config.web_root);
        let link_base = match (&config.site_url, config.absolute_links) {
            (Some(site), true) => format!("{}{prefix}", site.trim_end_matches('/')),
            _ => prefix,
        };
        Self::new(
            config.project_name.clone(),
            config.project_summary.clone(),
            link_base,
        )
    }

    /// Link to the Markdown artifact of `slug`.
    #[must_use]
    pub fn link(&self, slug: &str) -> String {
        format!("{}/{slug}{MARKDOWN_SUFFIX}", self.link_base)
    }

    /// Render the index for `entries`, in order.
    #[must_use]
    pub fn render(&self, entries: &[IndexEntry]) -> String {
        let mut out = format!("# {}\n\n", self.project_name);
        if !self.project_summary.trim().is_empty() {
            let _ = write!(out, "> {}\n\n", self.project_summary.trim());
        }

        if entries.is_empty() {
            out.push_str(EMPTY_INDEX_LINE);
            out.push('\n');
            return out;
        }

        out.push_str("## Documentation\n\n");
        for entry in entries {
            let _ = writeln!(
                out,
                "- [{}]({}): {}",
                entry.slug,
                self.link(&entry.slug),
                entry.description
            );
        }
        out
    }

    /// Render and write `llms.txt` into `web_root`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, web_root: &Path, entries: &[IndexEntry]) -> Result<PathBuf> {
        let path = web_root.join(INDEX_FILE_NAME);
        write_atomic(&path, self.render(entries).as_bytes())?;
        info!("Wrote {} with {} entries", path.display(), entries.len());
        Ok(path)
    }
}

/// URL path under which `output_dir` is served from `web_root`.
///
/// Returns `/<relative path>` when `output_dir` lies inside `web_root`, an
/// empty string when both are the same directory, and `/<dir name>`
/// otherwise. Existing paths are canonicalized first.
///
/// ```rust
/// use std::path::Path;
/// use llmsgen_core::index::link_prefix;
///
/// let prefix = link_prefix(Path::new("/var/www/site/llms"), Path::new("/var/www/site"));
/// assert_eq!(prefix, "/llms");
/// ```
#[must_use]
pub fn link_prefix(output_dir: &Path, web_root: &Path) -> String {
    let output_dir = canonical_or_lexical(output_dir);
    let web_root = canonical_or_lexical(web_root);

    match output_dir.strip_prefix(&web_root) {
        Ok(relative) => relative
            .components()
            .map(|c| format!("/{}", c.as_os_str().to_string_lossy()))
            .collect(),
        Err(_) => output_dir
            .file_name()
            .map(|name| format!("/{}", name.to_string_lossy()))
            .unwrap_or_default(),
    }
}

fn canonical_or_lexical(path: &Path) -> PathBuf {
    path.canonicalize()
        .unwrap_or_else(|_| path.components().collect())
}
