//! Request assembly.
//!
//! Turns caller options into exactly what the remote API needs. Absent
//! optional inputs stay absent in the payload: an explicit empty field would
//! be read by the provider as an override of its own defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::PipelineId;
use crate::options::{ListPipelinesOptions, TriggerOptions, Variable};
use crate::resources::RunResources;

/// Body of a run (or preview) request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, Variable>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_parameters: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages_to_skip: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaml_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_run: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<RunResources>,
}

/// Which remote invocation a trigger request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Queue a real run.
    Run,
    /// Dry run: expand the YAML without queueing anything.
    Preview,
}

/// A fully assembled trigger request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest {
    pub project: String,
    pub pipeline_id: PipelineId,
    pub mode: RunMode,
    pub parameters: RunPipelineParameters,
}

/// Arguments for listing pipelines, passed through positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPipelinesRequest {
    pub project: String,
    pub order_by: Option<String>,
    pub top: Option<u32>,
    pub continuation_token: Option<String>,
}

/// Build the request for a trigger operation.
pub fn build_trigger_request(options: TriggerOptions, default_project: &str) -> TriggerRequest {
    let TriggerOptions {
        project_id,
        pipeline_id,
        branch,
        variables,
        template_parameters,
        stages_to_skip,
        yaml_override,
        preview_run,
        resources,
    } = options;

    let resources = merge_branch(resources.unwrap_or_default(), branch.as_deref());

    let parameters = RunPipelineParameters {
        variables,
        template_parameters,
        stages_to_skip: stages_to_skip.filter(|stages| !stages.is_empty()),
        yaml_override: yaml_override.filter(|yaml| !yaml.is_empty()),
        preview_run: preview_run.then_some(true),
        resources: Some(resources).filter(|r| !r.is_empty()),
    };

    TriggerRequest {
        project: project_id.unwrap_or_else(|| default_project.to_string()),
        pipeline_id,
        mode: if preview_run {
            RunMode::Preview
        } else {
            RunMode::Run
        },
        parameters,
    }
}

/// Build the arguments for a list operation.
pub fn build_list_request(
    options: ListPipelinesOptions,
    default_project: &str,
) -> ListPipelinesRequest {
    ListPipelinesRequest {
        project: options
            .project_id
            .unwrap_or_else(|| default_project.to_string()),
        order_by: options.order_by,
        top: options.top,
        continuation_token: options.continuation_token,
    }
}

// The branch shorthand never overrides an explicit `self` repository.
fn merge_branch(resources: RunResources, branch: Option<&str>) -> RunResources {
    match branch {
        Some(branch) if !branch.is_empty() => resources.with_branch_default(branch),
        _ => resources,
    }
}
