//! Pipeline commands.

use anyhow::{Context, Result, bail};
use azpipes_core::{
    ListPipelinesOptions, PipelineService, RunResources, TriggerOptions, Variable,
};
use clap::Args;
use std::path::PathBuf;

use super::print_json;

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Project to list from (defaults to the configured project)
    #[arg(long)]
    pub project: Option<String>,
    /// Order by field and direction (e.g. "name desc")
    #[arg(long)]
    pub order_by: Option<String>,
    /// Maximum number of pipelines to return
    #[arg(long)]
    pub top: Option<u32>,
    /// Continuation token from a previous page
    #[arg(long)]
    pub continuation_token: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct TriggerArgs {
    /// Numeric ID of the pipeline
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub pipeline: u32,
    /// Project containing the pipeline (defaults to the configured project)
    #[arg(long)]
    pub project: Option<String>,
    /// Branch to run on (e.g. "main", "feature/login")
    #[arg(long)]
    pub branch: Option<String>,
    /// Pipeline variable, repeatable
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub vars: Vec<(String, String)>,
    /// Secret pipeline variable, repeatable
    #[arg(long = "secret-var", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub secret_vars: Vec<(String, String)>,
    /// Template parameter, repeatable
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
    /// Stage to skip, repeatable
    #[arg(long = "skip-stage", value_name = "STAGE")]
    pub skip_stages: Vec<String>,
    /// File with YAML to use instead of the pipeline's own
    #[arg(long, value_name = "FILE")]
    pub yaml_override: Option<PathBuf>,
    /// JSON file with a resources map ({"repositories": {...}, "pipelines": {...}})
    #[arg(long, value_name = "FILE")]
    pub resources: Option<PathBuf>,
    /// Only preview the run without queueing it
    #[arg(long)]
    pub preview: bool,
}

pub async fn list(service: &PipelineService, args: ListArgs) -> Result<()> {
    let pipelines = service.list_pipelines(args.into_options()).await?;
    print_json(&pipelines)
}

pub async fn trigger(service: &PipelineService, args: TriggerArgs) -> Result<()> {
    let options = args.into_options()?;
    let run = service.trigger_pipeline(options).await?;
    print_json(&run)
}

impl ListArgs {
    fn into_options(self) -> ListPipelinesOptions {
        ListPipelinesOptions {
            project_id: self.project,
            order_by: self.order_by,
            top: self.top,
            continuation_token: self.continuation_token,
        }
    }
}

impl TriggerArgs {
    fn into_options(self) -> Result<TriggerOptions> {
        let yaml_override = self
            .yaml_override
            .map(|path| {
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read YAML override: {}", path.display()))
            })
            .transpose()?;

        let resources = self
            .resources
            .map(|path| {
                let content = std::fs::read_to_string(&path).with_context(|| {
                    format!("Failed to read resources file: {}", path.display())
                })?;
                parse_resources(&content)
                    .with_context(|| format!("Invalid resources file: {}", path.display()))
            })
            .transpose()?;

        let mut options = TriggerOptions::new(self.pipeline);
        options.project_id = self.project;
        options.branch = self.branch;
        options.yaml_override = yaml_override;
        options.resources = resources;
        options.preview_run = self.preview;

        for (name, value) in self.vars {
            options = options.with_variable(name, Variable::new(value));
        }
        for (name, value) in self.secret_vars {
            options = options.with_variable(name, Variable::secret(value));
        }
        for (name, value) in self.params {
            options = options.with_template_parameter(name, value);
        }
        if !self.skip_stages.is_empty() {
            options = options.with_stages_to_skip(self.skip_stages);
        }

        Ok(options)
    }
}

fn parse_resources(content: &str) -> Result<RunResources> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if !value.is_object() {
        bail!("expected a JSON object with \"repositories\" and/or \"pipelines\"");
    }
    Ok(serde_json::from_value(value)?)
}

/// Parse a `NAME=VALUE` argument. The value may itself contain `=`.
fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}
