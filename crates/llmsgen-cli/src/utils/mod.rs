//! # Utility Functions and Helpers
//!
//! - [`logging`]: tracing subscriber setup for console and log file output

pub mod logging;

pub use logging::initialize_logging;
