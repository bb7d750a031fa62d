//! The generation run: configuration through `llms.txt`.

use std::fs;

use anyhow::{Context, Result};
use llmsgen_core::sitemap::fetch_sitemap;
use llmsgen_core::{
    ArtifactStore, ChatClient, Config, HttpFetcher, IndexWriter, Pipeline, RunReport,
};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::utils::initialize_logging;

/// Execute a full run.
///
/// Any error returned here is a setup failure and ends the process with a
/// failure status. Per-page problems are logged by the pipeline and only
/// show up in the report.
pub async fn execute(cli: &Cli) -> Result<RunReport> {
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(days) = cli.max_age_days {
        config.cache_max_age_days = days;
    }

    initialize_logging(cli, &config.logging)?;
    debug!("Loaded config from {}", cli.config.display());

    let store = ArtifactStore::new(&config.output_dir);
    store.ensure_root()?;
    fs::create_dir_all(&config.web_root).with_context(|| {
        format!(
            "Failed to create web root {}",
            config.web_root.display()
        )
    })?;

    let api_key = config.load_api_key()?;
    let mut client = ChatClient::new(config.backend, api_key, config.model.clone())?;
    if let Some(endpoint) = &config.endpoint {
        client = client.with_endpoint(endpoint.as_str());
    }
    info!(
        "Using {} backend with model {}",
        client.backend(),
        client.model()
    );

    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let urls = fetch_sitemap(&fetcher, &config.sitemap_url).await?;

    let report = Pipeline::new(fetcher, client, store, config.cache_max_age_days)
        .with_markers(config.cache_non_technical)
        .with_limit(cli.limit)
        .run(&urls)
        .await;

    let index_path = IndexWriter::from_config(&config)
        .write(&config.web_root, &report.entries)
        .context("Failed to write index")?;
    info!(
        "{} pages listed in {}",
        report.entries.len(),
        index_path.display()
    );

    Ok(report)
}
