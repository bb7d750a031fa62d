//! llmsgen CLI - Generate llms.txt from a site's sitemap
//!
//! This is the main entry point for the llmsgen command-line interface.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match llmsgen_cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}
