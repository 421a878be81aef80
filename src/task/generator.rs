//! Task generation against the completion API, with fallback on any failure.

use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::prompt::build_messages;
use super::task::{GeneratedTask, TaskKind};
use crate::config::Config;
use crate::llm::{ChatOptions, LlmClient, LlmError, OpenAiClient};
use crate::util::preview;

/// Characters of raw model output included in logs.
const RAW_PREVIEW_CHARS: usize = 100;

/// Why a generation attempt fell back.
///
/// The `Display` output is the `error` string reported on the fallback task.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("ConfigurationError: OpenAI API key is not set. Set OPENAI_API_KEY in the environment or a .env file.")]
    MissingCredential,

    #[error("JSON parsing error: {0}")]
    InvalidTaskJson(#[source] serde_json::Error),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// The four fields the model is asked to produce. Anything else it emits is dropped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskBody {
    task_title: String,
    task_description: String,
    suggested_points: Vec<String>,
    #[serde(deserialize_with = "deserialize_difficulty")]
    difficulty_level: u8,
}

/// Accept any JSON number or numeric string, rounded to the nearest integer.
fn deserialize_difficulty<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| D::Error::custom(format!("invalid difficultyLevel: {}", value)))?;

    let rounded = number.round();
    if !(0.0..=f64::from(u8::MAX)).contains(&rounded) {
        return Err(D::Error::custom(format!(
            "difficultyLevel out of range: {}",
            value
        )));
    }
    Ok(rounded as u8)
}

impl TaskBody {
    fn into_task(self, topic: &str) -> GeneratedTask {
        GeneratedTask {
            task_title: self.task_title,
            task_description: self.task_description,
            suggested_points: self.suggested_points,
            difficulty_level: self.difficulty_level,
            topic: topic.to_string(),
            error: None,
        }
    }
}

/// Generates speaking and writing tasks.
///
/// Holds no mutable state; one instance is shared by all requests.
pub struct TaskGenerator {
    /// `None` when no credential is configured.
    client: Option<Arc<dyn LlmClient>>,
    model: String,
}

impl TaskGenerator {
    pub fn new(client: Option<Arc<dyn LlmClient>>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build a generator backed by the OpenAI client described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = match &config.api_key {
            Some(key) => {
                let openai =
                    OpenAiClient::new(key.clone(), config.api_url.clone(), config.request_timeout)?;
                Some(Arc::new(openai) as Arc<dyn LlmClient>)
            }
            None => None,
        };
        Ok(Self::new(client, config.model.clone()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_credential(&self) -> bool {
        self.client.is_some()
    }

    /// Generate a task for `topic`. Failures come back as the fallback task.
    pub async fn generate(&self, kind: TaskKind, topic: &str) -> GeneratedTask {
        match self.try_generate(kind, topic).await {
            Ok(task) => task,
            Err(e) => {
                warn!("Error generating {} task: {}", kind, e);
                GeneratedTask::fallback(kind, topic, e.to_string())
            }
        }
    }

    /// Single attempt with no retry.
    pub async fn try_generate(
        &self,
        kind: TaskKind,
        topic: &str,
    ) -> Result<GeneratedTask, GenerationError> {
        let client = self
            .client
            .as_ref()
            .ok_or(GenerationError::MissingCredential)?;

        info!("Generating {} task for topic: {}", kind, topic);
        info!("Using model: {}", self.model);

        let messages = build_messages(kind, topic);
        let response = client
            .chat_completion(&self.model, &messages, ChatOptions::json_object())
            .await?;

        info!(
            "Raw API response: {}...",
            preview(&response.content, RAW_PREVIEW_CHARS)
        );
        debug!(
            "Completion finished: model={}, finish_reason={}, tokens={}",
            response.model.as_deref().unwrap_or(&self.model),
            response.finish_reason.as_deref().unwrap_or("unknown"),
            response
                .usage
                .as_ref()
                .map(|u| format!(
                    "{} prompt + {} completion = {}",
                    u.prompt_tokens, u.completion_tokens, u.total_tokens
                ))
                .unwrap_or_else(|| "unreported".to_string())
        );

        let body: TaskBody = serde_json::from_str(&response.content).map_err(|e| {
            warn!("Raw response was: {}", response.content);
            GenerationError::InvalidTaskJson(e)
        })?;

        Ok(body.into_task(topic))
    }
}
