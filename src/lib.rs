//! # taskgen
//!
//! Small web service that generates TOEFL speaking and writing exercises.
//!
//! ## Request Flow
//! 1. `POST /generate-task` with `{topic, taskType?}`
//! 2. Validate the body and pick the task kind (default `speaking`)
//! 3. Build a kind-specific instruction and call the chat-completion API
//! 4. Parse the JSON task embedded in the reply and stamp the caller's topic
//! 5. On any failure return a fixed fallback task with an `error` string
//!
//! ## Modules
//! - `api`: axum router, request validation, server lifecycle
//! - `task`: task kinds, prompts, generation and fallback
//! - `llm`: chat-completion client abstraction and OpenAI implementation
//! - `config`: environment configuration

pub mod api;
pub mod config;
pub mod llm;
pub mod task;
pub mod util;

pub use config::Config;
pub use task::{GeneratedTask, TaskGenerator, TaskKind};
