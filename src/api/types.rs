//! API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::task::{TaskKind, UnsupportedTaskType};

/// A validated `POST /generate-task` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateTaskRequest {
    /// Topic to build the task around, kept verbatim
    pub topic: String,

    /// Requested kind, `speaking` when `taskType` is absent or null
    pub kind: TaskKind,
}

/// Why a request body was rejected with 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Missing topic in request body")]
    MissingTopic,

    #[error(transparent)]
    UnsupportedTaskType(#[from] UnsupportedTaskType),
}

impl GenerateTaskRequest {
    /// Validate a raw request body.
    ///
    /// A body that is empty, not JSON, or not an object is reported as a
    /// missing topic. The topic is checked before the task type.
    pub fn from_body(body: &[u8]) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| RequestError::MissingTopic)?;
        let fields = value.as_object().ok_or(RequestError::MissingTopic)?;

        let topic = fields
            .get("topic")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or(RequestError::MissingTopic)?
            .to_string();

        let kind = match fields.get("taskType") {
            None | Some(Value::Null) => TaskKind::default(),
            Some(Value::String(s)) => s.parse()?,
            Some(other) => return Err(UnsupportedTaskType(other.to_string()).into()),
        };

        Ok(Self { topic, kind })
    }
}

/// Error body for rejected requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<RequestError> for ErrorResponse {
    fn from(err: RequestError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    /// False means every generation will return the fallback task
    pub api_key_configured: bool,
}
