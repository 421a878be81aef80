//! Task module - builds TOEFL exercise prompts and turns model output into tasks.
//!
//! Generation never fails toward the caller: any failure degrades to a
//! deterministic, topic-specific fallback task carrying an `error` string.

mod generator;
mod prompt;
pub mod task;

pub use generator::{GenerationError, TaskGenerator};
pub use prompt::{build_instruction, build_messages, SYSTEM_PROMPT};
pub use task::{GeneratedTask, TaskKind, UnsupportedTaskType};
