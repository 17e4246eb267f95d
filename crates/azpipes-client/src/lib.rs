//! Azure DevOps REST implementation of [`azpipes_core::PipelinesApi`].
//!
//! Failures are reported as [`RemoteFailure`]s carrying the HTTP status line
//! and the provider's message, so the classifier in `azpipes-core` can see
//! codes like `401` and `404`. Request URLs are kept out of those messages;
//! project names and pipeline ids would otherwise be scanned as signals.

use async_trait::async_trait;
use azpipes_config::{AuthMethod, ConnectionConfig};
use azpipes_core::{
    PipelineId, PipelinesApi, RawPipeline, RemoteFailure, RemoteResult, Run,
    RunPipelineParameters,
};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client construction errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Envelope Azure DevOps wraps list results in.
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

/// Error body returned by Azure DevOps.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Azure DevOps pipelines API client.
pub struct AzureDevOpsClient {
    client: reqwest::Client,
    organization: String,
    auth: AuthMethod,
    api_version: String,
}

impl AzureDevOpsClient {
    pub fn new(config: &ConnectionConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("azpipes/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            organization: config.organization().to_string(),
            auth: config.auth.clone(),
            api_version: config.api_version.clone(),
        })
    }

    fn pipelines_url(&self, project: &str) -> String {
        format!(
            "{}/{}/_apis/pipelines",
            self.organization,
            urlencoding::encode(project)
        )
    }

    // The preview endpoint is only published as a preview API version.
    fn preview_api_version(&self) -> String {
        if self.api_version.contains("-preview") {
            self.api_version.clone()
        } else {
            format!("{}-preview.1", self.api_version)
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            AuthMethod::Pat { token } => builder.basic_auth("", Some(token)),
            AuthMethod::None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> RemoteResult<T> {
        let response = self
            .authorize(builder)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| RemoteFailure::message(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        debug!(status = %status, url = %response.url(), "Azure DevOps responded");

        // A rejected PAT gets the sign-in page instead of a 401.
        if status == StatusCode::NON_AUTHORITATIVE_INFORMATION {
            return Err(RemoteFailure::message(concat!(
                "Authentication failed: received a sign-in page ",
                "(203 Non-Authoritative Information)"
            )));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RemoteFailure::message(error_message(status, &text)));
        }

        response
            .json()
            .await
            .map_err(|e| {
                RemoteFailure::message(format!("Invalid response body: {}", e.without_url()))
            })
    }

    async fn post_run(
        &self,
        endpoint: &str,
        api_version: String,
        parameters: &RunPipelineParameters,
        project: &str,
        pipeline_id: PipelineId,
    ) -> RemoteResult<Run> {
        let url = format!("{}/{}/{}", self.pipelines_url(project), pipeline_id, endpoint);
        debug!(url = %url, "Posting pipeline run");

        let request = self
            .client
            .post(&url)
            .query(&[("api-version", api_version)])
            .json(parameters);

        self.send(request).await
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().to_string());

    if message.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, message)
    }
}

#[async_trait]
impl PipelinesApi for AzureDevOpsClient {
    fn name(&self) -> &'static str {
        "azure-devops"
    }

    async fn list_pipelines(
        &self,
        project: &str,
        order_by: Option<&str>,
        top: Option<u32>,
        continuation_token: Option<&str>,
    ) -> RemoteResult<Vec<RawPipeline>> {
        let mut query = vec![("api-version", self.api_version.clone())];
        if let Some(order_by) = order_by {
            query.push(("orderBy", order_by.to_string()));
        }
        if let Some(top) = top {
            query.push(("$top", top.to_string()));
        }
        if let Some(token) = continuation_token {
            query.push(("continuationToken", token.to_string()));
        }

        let request = self.client.get(self.pipelines_url(project)).query(&query);
        let list: ListResponse<RawPipeline> = self.send(request).await?;
        Ok(list.value)
    }

    async fn run_pipeline(
        &self,
        parameters: &RunPipelineParameters,
        project: &str,
        pipeline_id: PipelineId,
    ) -> RemoteResult<Run> {
        self.post_run(
            "runs",
            self.api_version.clone(),
            parameters,
            project,
            pipeline_id,
        )
        .await
    }

    async fn preview(
        &self,
        parameters: &RunPipelineParameters,
        project: &str,
        pipeline_id: PipelineId,
    ) -> RemoteResult<Run> {
        self.post_run(
            "preview",
            self.preview_api_version(),
            parameters,
            project,
            pipeline_id,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_provider_message() {
        let body = r#"{"$id":"1","message":"TF400813: The user is not authorized","typeKey":"x"}"#;
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, body),
            "401 Unauthorized: TF400813: The user is not authorized"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "502 Bad Gateway: upstream down"
        );
    }

    #[test]
    fn test_error_message_empty_body() {
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "404 Not Found");
    }
}
