//! documntr: a code documentation service backed by chat-completion models.
//!
//! The crate provides:
//! - A chat model abstraction (`ChatModel`) with an OpenAI-compatible client
//!   and a scriptable stub for tests.
//! - A `CodeAnalyzer` that wraps prompt assembly, running generation metrics,
//!   and an optional file-backed exchange history used to prime new requests
//!   with prior turns (`history` feature).
//! - An axum HTTP surface behind the `server` feature.

mod analyzer;
mod config;
mod error;
#[cfg(feature = "history")]
mod history;
mod llm;
mod message;
mod metrics;
#[cfg(feature = "server")]
pub mod server;
#[cfg(feature = "history")]
mod store;

pub use analyzer::{AnalysisReport, CodeAnalyzer, SYSTEM_PROMPT};
#[cfg(feature = "history")]
pub use config::HistoryConfig;
pub use config::{AppConfig, ModelConfig, ServerConfig};
pub use error::{DocumntrError, Result};
#[cfg(feature = "history")]
pub use history::{Exchange, ExchangeHistory, REPLAY_WINDOW};
pub use llm::{ChatModel, OpenAIClient, StubModel};
pub use message::{Message, Role};
pub use metrics::{token_proxy, GenerationMetrics, MetricsSnapshot};
#[cfg(feature = "history")]
pub use store::{FileHistoryStore, HistoryStore};
