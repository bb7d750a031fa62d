//! llmsgen CLI - Generate llms.txt from a site's sitemap
//!
//! Loads the configuration, discovers pages through the sitemap, keeps the
//! technical ones as Markdown and writes the `llms.txt` index.
use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
pub mod guard;
mod utils;

use cli::Cli;

/// Execute the llmsgen CLI with the current process environment.
///
/// Returns a failure exit code without error when refusing a web request.
///
/// # Errors
///
/// Returns an error if any setup step of the run fails.
pub async fn run() -> Result<ExitCode> {
    if guard::process_is_web_request() {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(guard::ACCESS_DENIED_RESPONSE.as_bytes())?;
        stdout.flush()?;
        return Ok(ExitCode::FAILURE);
    }

    let cli = Cli::parse();
    commands::generate(&cli).await?;
    Ok(ExitCode::SUCCESS)
}
