//! Pipeline and run records.
//!
//! Raw records mirror what the provider sends and keep every field optional.
//! [`Pipeline`] is the caller-facing summary with all fields defaulted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A pipeline as returned by the provider. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPipeline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Caller-facing pipeline summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: u32,
    pub name: String,
    pub folder: String,
    pub revision: u32,
    pub url: String,
}

impl From<RawPipeline> for Pipeline {
    fn from(raw: RawPipeline) -> Self {
        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            folder: raw.folder.unwrap_or_default(),
            revision: raw.revision.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
        }
    }
}

/// State of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunState {
    InProgress,
    Canceling,
    Completed,
    #[serde(other)]
    Unknown,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunResult {
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// A run record exactly as the provider returned it.
///
/// Well-known fields are typed; everything else is kept in `extra` so nothing
/// the provider sent is lost when the run is handed back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RunState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<RunResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<RawPipeline>,
    /// Expanded YAML, populated by preview runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_yaml: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_are_defaulted() {
        let raw: RawPipeline = serde_json::from_value(json!({ "name": "Build" })).unwrap();
        let pipeline = Pipeline::from(raw);

        assert_eq!(
            pipeline,
            Pipeline {
                id: 0,
                name: "Build".to_string(),
                folder: String::new(),
                revision: 0,
                url: String::new(),
            }
        );
    }

    #[test]
    fn test_present_fields_are_copied() {
        let raw: RawPipeline = serde_json::from_value(json!({
            "id": 12,
            "revision": 3,
            "name": "CI",
            "folder": "\\infra",
            "url": "https://dev.azure.com/contoso/Fabrikam/_apis/pipelines/12?revision=3",
            "_links": { "self": { "href": "ignored" } }
        }))
        .unwrap();
        let pipeline = Pipeline::from(raw);

        assert_eq!(pipeline.id, 12);
        assert_eq!(pipeline.revision, 3);
        assert_eq!(pipeline.name, "CI");
        assert_eq!(pipeline.folder, "\\infra");
        assert!(pipeline.url.ends_with("revision=3"));
    }

    #[test]
    fn test_empty_record_maps_to_zero_values() {
        let pipeline = Pipeline::from(RawPipeline::default());
        assert_eq!(pipeline, Pipeline::default());

        let value = serde_json::to_value(&pipeline).unwrap();
        assert_eq!(
            value,
            json!({ "id": 0, "name": "", "folder": "", "revision": 0, "url": "" })
        );
    }

    #[test]
    fn test_run_keeps_unknown_fields() {
        let run: Run = serde_json::from_value(json!({
            "id": 4711,
            "name": "20240501.3",
            "state": "inProgress",
            "createdDate": "2024-05-01T10:00:00.1234567Z",
            "pipeline": { "id": 7, "name": "CI" },
            "templateParameters": { "env": "prod" }
        }))
        .unwrap();

        assert_eq!(run.id, Some(4711));
        assert_eq!(run.state, Some(RunState::InProgress));
        assert_eq!(run.pipeline.as_ref().and_then(|p| p.id), Some(7));
        assert_eq!(run.extra["templateParameters"], json!({ "env": "prod" }));

        let back = serde_json::to_value(&run).unwrap();
        assert_eq!(back["templateParameters"], json!({ "env": "prod" }));
        assert!(back.get("finalYaml").is_none());
    }

    #[test]
    fn test_unrecognised_state_is_unknown() {
        let run: Run =
            serde_json::from_value(json!({ "state": "paused", "result": "partiallySucceeded" }))
                .unwrap();
        assert_eq!(run.state, Some(RunState::Unknown));
        assert_eq!(run.result, Some(RunResult::Unknown));
    }

    #[test]
    fn test_preview_run_has_final_yaml() {
        let run: Run = serde_json::from_value(json!({ "finalYaml": "steps:\n- script: echo hi\n" }))
            .unwrap();
        assert_eq!(run.final_yaml.as_deref(), Some("steps:\n- script: echo hi\n"));
        assert!(run.id.is_none());
    }
}
