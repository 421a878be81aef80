//! Task kinds and the generated task returned to callers.
//!
//! # Invariants
//! - `GeneratedTask::topic` is always the topic the caller asked for
//! - `GeneratedTask::error` is `None` exactly when generation succeeded

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty assigned to every fallback task.
pub const FALLBACK_DIFFICULTY: u8 = 3;

/// Kind of exercise to generate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Short spoken response (about 45 seconds)
    #[default]
    Speaking,
    /// Independent essay (300-350 words)
    Writing,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Speaking => "speaking",
            TaskKind::Writing => "writing",
        }
    }

    /// Capitalized name used in fallback titles.
    pub fn title(&self) -> &'static str {
        match self {
            TaskKind::Speaking => "Speaking",
            TaskKind::Writing => "Writing",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task type string that is neither `speaking` nor `writing`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported task type: {0}")]
pub struct UnsupportedTaskType(pub String);

impl FromStr for TaskKind {
    type Err = UnsupportedTaskType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "speaking" => Ok(TaskKind::Speaking),
            "writing" => Ok(TaskKind::Writing),
            other => Err(UnsupportedTaskType(other.to_string())),
        }
    }
}

/// A generated exercise, serialized with camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTask {
    pub task_title: String,
    pub task_description: String,
    /// Usually 2-3 points; the count is not enforced.
    pub suggested_points: Vec<String>,
    /// 1 (easiest) to 5 (hardest); the range is not enforced.
    pub difficulty_level: u8,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeneratedTask {
    /// The deterministic task returned when generation fails.
    pub fn fallback(kind: TaskKind, topic: &str, error: impl Into<String>) -> Self {
        let (description, points) = match kind {
            TaskKind::Speaking => (
                format!(
                    "Talk about your experience or opinion regarding {}. \
                     Provide specific examples to support your answer.",
                    topic
                ),
                ["Personal experience", "Specific examples", "Your opinion"],
            ),
            TaskKind::Writing => (
                format!(
                    "Write an essay discussing your views on {}. \
                     Support your opinion with specific reasons and examples.",
                    topic
                ),
                [
                    "Introduction with thesis",
                    "Supporting arguments",
                    "Conclusion",
                ],
            ),
        };

        Self {
            task_title: format!("{} about {}", kind.title(), topic),
            task_description: description,
            suggested_points: points.iter().map(|p| p.to_string()).collect(),
            difficulty_level: FALLBACK_DIFFICULTY,
            topic: topic.to_string(),
            error: Some(error.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}
