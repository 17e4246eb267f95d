//! Core of azpipes: a typed facade over a remote CI/CD pipelines API.
//!
//! This crate contains:
//! - Caller options and the request builder that turns them into payloads
//! - The closed domain error taxonomy and the failure classifier
//! - Pipeline and run records, and the response shape mapping
//! - The `PipelinesApi` trait implemented by transports
//! - `PipelineService`, which runs each operation end to end

pub mod api;
pub mod error;
pub mod id;
pub mod options;
pub mod pipeline;
pub mod request;
pub mod resources;
pub mod service;

pub use api::PipelinesApi;
pub use error::{Error, Operation, RemoteFailure, RemoteResult, Result, classify};
pub use id::PipelineId;
pub use options::{ListPipelinesOptions, TriggerOptions, Variable};
pub use pipeline::{Pipeline, RawPipeline, Run, RunResult, RunState};
pub use request::{ListPipelinesRequest, RunMode, RunPipelineParameters, TriggerRequest};
pub use resources::{PipelineResource, RepositoryResource, RunResources};
pub use service::PipelineService;
