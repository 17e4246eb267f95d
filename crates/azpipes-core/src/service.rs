//! Pipeline operations exposed to callers.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::PipelinesApi;
use crate::error::{Error, Operation, RemoteFailure, Result, classify};
use crate::options::{ListPipelinesOptions, TriggerOptions};
use crate::pipeline::{Pipeline, Run};
use crate::request::{RunMode, TriggerRequest, build_list_request, build_trigger_request};

/// Typed facade over a [`PipelinesApi`].
///
/// Holds no mutable state, so one service can serve any number of
/// concurrent operations.
pub struct PipelineService {
    api: Arc<dyn PipelinesApi>,
    default_project: String,
}

impl PipelineService {
    pub fn new(api: Arc<dyn PipelinesApi>, default_project: impl Into<String>) -> Self {
        Self {
            api,
            default_project: default_project.into(),
        }
    }

    /// List pipelines in a project.
    pub async fn list_pipelines(&self, options: ListPipelinesOptions) -> Result<Vec<Pipeline>> {
        let request = build_list_request(options, &self.default_project);
        info!(
            backend = self.api.name(),
            project = %request.project,
            top = ?request.top,
            "Listing pipelines"
        );

        let raw = self
            .api
            .list_pipelines(
                &request.project,
                request.order_by.as_deref(),
                request.top,
                request.continuation_token.as_deref(),
            )
            .await
            .map_err(|failure| fail(failure, Operation::ListPipelines))?;

        debug!(count = raw.len(), "Pipelines listed");
        Ok(raw.into_iter().map(Pipeline::from).collect())
    }

    /// Trigger a run, or a preview when `preview_run` is set.
    pub async fn trigger_pipeline(&self, options: TriggerOptions) -> Result<Run> {
        let TriggerRequest {
            project,
            pipeline_id,
            mode,
            parameters,
        } = build_trigger_request(options, &self.default_project);

        info!(
            backend = self.api.name(),
            project = %project,
            pipeline_id = %pipeline_id,
            mode = ?mode,
            "Triggering pipeline"
        );

        let result = match mode {
            RunMode::Preview => self.api.preview(&parameters, &project, pipeline_id).await,
            RunMode::Run => {
                self.api
                    .run_pipeline(&parameters, &project, pipeline_id)
                    .await
            }
        };

        let run = result.map_err(|failure| fail(failure, Operation::TriggerPipeline))?;
        debug!(run_id = ?run.id, state = ?run.state, "Pipeline triggered");
        Ok(run)
    }
}

fn fail(failure: RemoteFailure, operation: Operation) -> Error {
    let err = classify(failure, operation);
    warn!(operation = %operation, error = %err, "Remote call failed");
    err
}
