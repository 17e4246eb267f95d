//! Remote pipelines API trait.
//!
//! Implementations talk to the provider and report failures as
//! [`crate::RemoteFailure`]s. They do not classify; [`crate::PipelineService`]
//! does.

use async_trait::async_trait;

use crate::pipeline::{RawPipeline, Run};
use crate::request::RunPipelineParameters;
use crate::{PipelineId, RemoteResult};

/// The remote pipelines API.
#[async_trait]
pub trait PipelinesApi: Send + Sync {
    /// Name of the backend, for logs.
    fn name(&self) -> &'static str;

    /// List pipelines in a project. Optional arguments left as `None` are
    /// not sent, so the provider applies its own defaults.
    async fn list_pipelines(
        &self,
        project: &str,
        order_by: Option<&str>,
        top: Option<u32>,
        continuation_token: Option<&str>,
    ) -> RemoteResult<Vec<RawPipeline>>;

    /// Queue a run.
    async fn run_pipeline(
        &self,
        parameters: &RunPipelineParameters,
        project: &str,
        pipeline_id: PipelineId,
    ) -> RemoteResult<Run>;

    /// Preview a run without queueing it.
    async fn preview(
        &self,
        parameters: &RunPipelineParameters,
        project: &str,
        pipeline_id: PipelineId,
    ) -> RemoteResult<Run>;
}
