//! Caller-supplied options for each operation.
//!
//! Options arrive already validated: required fields are present and
//! `pipeline_id` is positive. Nothing here re-checks them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::PipelineId;
use crate::resources::RunResources;

/// Options for listing pipelines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelinesOptions {
    /// Project to list from. Falls back to the default project.
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub order_by: Option<String>,
    /// Maximum number of pipelines to return.
    #[serde(default)]
    pub top: Option<u32>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

/// A variable passed to a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub value: String,
    #[serde(default)]
    pub is_secret: bool,
}

impl Variable {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_secret: false,
        }
    }

    pub fn secret(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_secret: true,
        }
    }
}

/// Options for triggering a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerOptions {
    /// Project containing the pipeline. Falls back to the default project.
    #[serde(default)]
    pub project_id: Option<String>,
    pub pipeline_id: PipelineId,
    /// Short branch name (e.g. `main`), applied to the `self` repository.
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub variables: Option<BTreeMap<String, Variable>>,
    #[serde(default)]
    pub template_parameters: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub stages_to_skip: Option<Vec<String>>,
    #[serde(default)]
    pub yaml_override: Option<String>,
    /// Only preview the run instead of queueing it.
    #[serde(default)]
    pub preview_run: bool,
    #[serde(default)]
    pub resources: Option<RunResources>,
}

impl TriggerOptions {
    pub fn new(pipeline_id: impl Into<PipelineId>) -> Self {
        Self {
            project_id: None,
            pipeline_id: pipeline_id.into(),
            branch: None,
            variables: None,
            template_parameters: None,
            stages_to_skip: None,
            yaml_override: None,
            preview_run: false,
            resources: None,
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project_id = Some(project.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, variable: Variable) -> Self {
        self.variables
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), variable);
        self
    }

    pub fn with_template_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.template_parameters
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_stages_to_skip(mut self, stages: Vec<String>) -> Self {
        self.stages_to_skip = Some(stages);
        self
    }

    pub fn with_yaml_override(mut self, yaml: impl Into<String>) -> Self {
        self.yaml_override = Some(yaml.into());
        self
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview_run = preview;
        self
    }

    pub fn with_resources(mut self, resources: RunResources) -> Self {
        self.resources = Some(resources);
        self
    }
}
