//! Error types and handling for llmsgen-core operations.
//!
//! Errors fall into two groups that drive the pipeline's control flow:
//!
//! - **Setup errors**: configuration, API key, directory and sitemap failures.
//!   They are returned from the entry points the CLI calls before any page is
//!   processed, and abort the whole run.
//! - **Page errors**: everything that can go wrong while processing a single
//!   URL. The orchestrator logs them and moves on to the next URL.
//!
//! ```rust
//! use llmsgen_core::Error;
//!
//! let err = Error::Config("sitemap_url is required".to_string());
//! assert_eq!(err.to_string(), "Configuration error: sitemap_url is required");
//! ```

use thiserror::Error;

/// The main error type for llmsgen-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure (DNS, connect, timeout, body decode).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with something other than `200 OK`.
    #[error("HTTP {status} from '{url}'")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Status code returned by the server.
        status: u16,
    },

    /// Configuration is missing, malformed or fails validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The text-generation backend returned an unusable response.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The sitemap could not be used to discover URLs.
    #[error("Sitemap error: {0}")]
    Sitemap(String),

    /// Writing or removing an output artifact failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
