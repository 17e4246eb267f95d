//! Pipeline identifiers.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Numeric identifier of a pipeline definition within a project.
///
/// Callers are expected to hand in positive values; the service does not
/// re-check.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[display("{_0}")]
#[serde(transparent)]
pub struct PipelineId(u32);

impl PipelineId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}
