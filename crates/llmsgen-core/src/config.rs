//! Configuration for a generation run.
//!
//! Configuration is stored in TOML and loaded once by the binary, then passed
//! by value or reference into each component. Nothing in this crate reads
//! configuration from ambient process state.
//!
//! ## Example Configuration File
//!
//! ```toml
//! sitemap_url = "https://example.com/sitemap.xml"
//! backend = "openai"
//! output_dir = "/var/www/site/llms"
//! web_root = "/var/www/site"
//! project_name = "Example"
//! project_summary = "Developer documentation for Example."
//! site_url = "https://example.com"
//! absolute_links = true
//! cache_max_age_days = 90
//!
//! [api_keys]
//! openai = "/etc/llmsgen/openai.key"
//!
//! [logging]
//! mode = "both"
//! file = "/var/log/llmsgen.log"
//! ```
//!
//! Relative paths are resolved against the directory containing the config file.

use crate::llm::Backend;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default cache max-age in days.
pub const DEFAULT_CACHE_MAX_AGE_DAYS: u32 = 30;

/// Full configuration of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sitemap listing the pages to consider.
    pub sitemap_url: String,

    /// Text-generation backend used for classification and transformation.
    #[serde(default)]
    pub backend: Backend,

    /// Overrides the backend's default model identifier.
    #[serde(default)]
    pub model: Option<String>,

    /// Overrides the backend's default endpoint (compatible gateways, tests).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Paths of the files holding each backend's API key.
    #[serde(default)]
    pub api_keys: ApiKeyPaths,

    /// Directory receiving the per-page Markdown artifacts.
    pub output_dir: PathBuf,

    /// Web root; `llms.txt` is written here.
    pub web_root: PathBuf,

    /// Project name rendered as the index heading.
    pub project_name: String,

    /// One-line project summary rendered as the index blockquote.
    #[serde(default)]
    pub project_summary: String,

    /// Public base URL of the site, used for absolute links.
    #[serde(default)]
    pub site_url: Option<String>,

    /// Emit absolute links (`site_url` + path) instead of root-relative ones.
    #[serde(default)]
    pub absolute_links: bool,

    /// Maximum artifact age in days before a page is reprocessed.
    ///
    /// Zero disables the cache.
    #[serde(default = "default_cache_max_age_days")]
    pub cache_max_age_days: u32,

    /// Write a marker for pages classified as non-technical so later runs skip them.
    #[serde(default = "default_true")]
    pub cache_non_technical: bool,

    /// User agent sent with page and sitemap requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Log targets.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Paths to API key files, one per backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeyPaths {
    /// Key file for [`Backend::OpenAi`].
    pub openai: Option<PathBuf>,
    /// Key file for [`Backend::Anthropic`].
    pub anthropic: Option<PathBuf>,
}

impl ApiKeyPaths {
    /// Key file configured for `backend`, if any.
    #[must_use]
    pub fn for_backend(&self, backend: Backend) -> Option<&Path> {
        match backend {
            Backend::OpenAi => self.openai.as_deref(),
            Backend::Anthropic => self.anthropic.as_deref(),
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Discard all log output.
    None,
    /// Write to stderr.
    #[default]
    Console,
    /// Append to the log file.
    File,
    /// Write to stderr and append to the log file.
    Both,
}

impl LogMode {
    /// Whether lines go to the console.
    #[must_use]
    pub const fn console(self) -> bool {
        matches!(self, Self::Console | Self::Both)
    }

    /// Whether lines go to the log file.
    #[must_use]
    pub const fn file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log targets.
    #[serde(default)]
    pub mode: LogMode,
    /// Append-only log file used by [`LogMode::File`] and [`LogMode::Both`].
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            mode: LogMode::default(),
            file: default_log_file(),
        }
    }
}

const fn default_cache_max_age_days() -> u32 {
    DEFAULT_CACHE_MAX_AGE_DAYS
}

const fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!("llmsgen/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("llmsgen.log")
}

impl Config {
    /// Load and validate configuration from a TOML file.
    ///
    /// Relative paths inside the file resolve against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file is missing, unreadable, malformed
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        let base_dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        Self::parse(&content, base_dir)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// When `base_dir` is given, relative paths are resolved against it.
    pub fn parse(content: &str, base_dir: Option<&Path>) -> Result<Self> {
        let mut config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        if let Some(base) = base_dir {
            config.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.output_dir);
        resolve(&mut self.web_root);
        resolve(&mut self.logging.file);
        if let Some(p) = self.api_keys.openai.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.api_keys.anthropic.as_mut() {
            resolve(p);
        }
    }

    /// Check required fields and cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        let sitemap = url::Url::parse(self.sitemap_url.trim())
            .map_err(|e| Error::Config(format!("Invalid sitemap_url '{}': {e}", self.sitemap_url)))?;
        if !matches!(sitemap.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "sitemap_url must use http or https: {}",
                self.sitemap_url
            )));
        }
        if self.project_name.trim().is_empty() {
            return Err(Error::Config("project_name must not be empty".into()));
        }
        if self.output_dir.as_os_str().is_empty() || self.web_root.as_os_str().is_empty() {
            return Err(Error::Config(
                "output_dir and web_root must not be empty".into(),
            ));
        }
        if self.absolute_links
            && self
                .site_url
                .as_deref()
                .is_none_or(|u| u.trim().is_empty())
        {
            return Err(Error::Config(
                "absolute_links requires site_url to be set".into(),
            ));
        }
        if self.api_keys.for_backend(self.backend).is_none() {
            return Err(Error::Config(format!(
                "api_keys.{} is required for the selected backend",
                self.backend.name()
            )));
        }
        Ok(())
    }

    /// Read the API key for the selected backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no key file is configured, the file cannot
    /// be read, or it holds only whitespace.
    pub fn load_api_key(&self) -> Result<String> {
        let path = self.api_keys.for_backend(self.backend).ok_or_else(|| {
            Error::Config(format!("No API key file configured for {}", self.backend.name()))
        })?;
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read API key file {}: {e}", path.display()))
        })?;
        let key = raw.trim();
        if key.is_empty() {
            return Err(Error::Config(format!(
                "API key file {} is empty",
                path.display()
            )));
        }
        Ok(key.to_string())
    }
}
