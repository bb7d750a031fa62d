//! # llmsgen-core
//!
//! Core functionality for llmsgen - generates an `llms.txt` index of a site's
//! technical documentation from its sitemap.
//!
//! Each page listed in the sitemap is fetched, stripped down to its main
//! content, classified by a text-generation backend, converted to Markdown
//! and described in one sentence. Results are cached on disk so repeated runs
//! only touch new or stale pages.
//!
//! ## Architecture
//!
//! - **Configuration**: TOML settings and API key loading ([`config`])
//! - **Discovery**: sitemap `<loc>` extraction ([`sitemap`]) over an HTTP
//!   [`fetcher`]
//! - **Sanitization**: regex-based main-content extraction ([`sanitize`])
//! - **Backend**: chat-style completion client and prompt handling ([`llm`])
//! - **Storage**: per-slug artifacts and age-based reuse ([`storage`],
//!   [`freshness`])
//! - **Orchestration**: the sequential per-URL workflow ([`pipeline`])
//! - **Output**: `llms.txt` rendering ([`index`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llmsgen_core::{ArtifactStore, ChatClient, Config, HttpFetcher, IndexWriter, Pipeline};
//! use std::path::Path;
//!
//! # async fn example() -> llmsgen_core::Result<()> {
//! let config = Config::load(Path::new("llmsgen.toml"))?;
//! let fetcher = HttpFetcher::new(&config.user_agent)?;
//! let urls = llmsgen_core::sitemap::fetch_sitemap(&fetcher, &config.sitemap_url).await?;
//!
//! let client = ChatClient::new(config.backend, config.load_api_key()?, config.model.clone())?;
//! let store = ArtifactStore::new(&config.output_dir);
//! store.ensure_root()?;
//!
//! let report = Pipeline::new(fetcher, client, store, config.cache_max_age_days)
//!     .run(&urls)
//!     .await;
//! IndexWriter::from_config(&config).write(&config.web_root, &report.entries)?;
//! # Ok(())
//! # }
//! ```

/// Configuration loading and validation
pub mod config;
/// Error types and result aliases
pub mod error;
/// HTTP fetching of sitemaps and pages
pub mod fetcher;
pub mod freshness;
pub mod index;
pub mod llm;
pub mod pipeline;
pub mod sanitize;
pub mod sitemap;
pub mod slug;
pub mod storage;

// Re-export commonly used types
pub use config::{ApiKeyPaths, Config, LogMode, LoggingConfig};
pub use error::{Error, Result};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use freshness::{Freshness, FreshnessCache};
pub use index::{IndexEntry, IndexWriter};
pub use llm::{Backend, ChatClient, TextGenerator};
pub use pipeline::{PageOutcome, Pipeline, RunReport, SkipReason};
pub use sanitize::{RegexSanitizer, Sanitizer};
pub use storage::ArtifactStore;
