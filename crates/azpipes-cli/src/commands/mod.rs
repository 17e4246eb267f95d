//! CLI command implementations.

pub mod pipelines;

use anyhow::{Context, Result};
use azpipes_client::AzureDevOpsClient;
use azpipes_config::ConnectionConfig;
use azpipes_core::PipelineService;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

fn load_config(path: Option<&Path>) -> Result<ConnectionConfig> {
    ConnectionConfig::load(path).context("Failed to load configuration")
}

/// Build a pipeline service from configuration.
pub fn connect(config_path: Option<&Path>) -> Result<PipelineService> {
    let config = load_config(config_path)?;
    debug!(
        organization = config.organization(),
        project = %config.default_project,
        "Connecting to Azure DevOps"
    );

    let client = AzureDevOpsClient::new(&config).context("Failed to create API client")?;
    Ok(PipelineService::new(
        Arc::new(client),
        config.default_project.clone(),
    ))
}

pub fn show_config(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    print_json(&config.redacted())
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
