//! Run resources: the repositories and pipelines a run binds to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Alias of the repository the pipeline definition itself lives in.
pub const SELF_REPOSITORY: &str = "self";

/// Resource map passed with a run.
///
/// Each sub-map is keyed by the resource alias used in the pipeline YAML.
/// A sub-map that was never supplied stays `None` and is not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repositories: Option<BTreeMap<String, RepositoryResource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipelines: Option<BTreeMap<String, PipelineResource>>,
}

/// A repository resource override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RepositoryResource {
    /// Full ref, e.g. `refs/heads/main`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_id: Option<String>,
}

/// A pipeline resource override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PipelineResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<String>,
}

impl RepositoryResource {
    /// A repository resource pinned to the head of `branch`.
    pub fn at_branch(branch: &str) -> Self {
        Self {
            ref_name: Some(branch_ref(branch)),
            ..Self::default()
        }
    }
}

/// Expand a short branch name into a full ref.
pub fn branch_ref(branch: &str) -> String {
    format!("refs/heads/{}", branch)
}

impl RunResources {
    /// True when neither sub-map was supplied.
    pub fn is_empty(&self) -> bool {
        self.repositories.is_none() && self.pipelines.is_none()
    }

    pub fn self_repository(&self) -> Option<&RepositoryResource> {
        self.repositories
            .as_ref()
            .and_then(|repos| repos.get(SELF_REPOSITORY))
    }

    pub fn with_repository(mut self, alias: impl Into<String>, repo: RepositoryResource) -> Self {
        self.repositories
            .get_or_insert_with(BTreeMap::new)
            .insert(alias.into(), repo);
        self
    }

    pub fn with_pipeline(mut self, alias: impl Into<String>, pipeline: PipelineResource) -> Self {
        self.pipelines
            .get_or_insert_with(BTreeMap::new)
            .insert(alias.into(), pipeline);
        self
    }

    /// Point the `self` repository at `branch` unless an explicit `self`
    /// entry is already present. Other aliases are left untouched.
    pub fn with_branch_default(mut self, branch: &str) -> Self {
        self.repositories
            .get_or_insert_with(BTreeMap::new)
            .entry(SELF_REPOSITORY.to_string())
            .or_insert_with(|| RepositoryResource::at_branch(branch));
        self
    }
}
