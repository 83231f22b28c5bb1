//! Chat completion clients and abstractions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::ModelConfig;
use crate::error::{DocumntrError, Result};
use crate::message::Message;

/// Minimal abstraction around a chat completion provider. One outbound call,
/// no retry, no streaming; failures carry only the cause description.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

fn coalesce_error(status: reqwest::StatusCode, body: &str) -> DocumntrError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return DocumntrError::Completion(format!("rate limit exceeded: {body}"));
    }
    DocumntrError::Completion(format!("request failed with {status}: {body}"))
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
#[derive(Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    model: String,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Builds a client from config. The credential comes from the config file
    /// or, failing that, the `DOCUMNTR_API_KEY` / `OPENAI_API_KEY`
    /// environment variables; its absence is fatal here.
    pub fn from_config(cfg: &ModelConfig) -> Result<Self> {
        let api_key = cfg
            .api_key
            .clone()
            .or_else(|| std::env::var("DOCUMNTR_API_KEY").ok())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                DocumntrError::Config(
                    "missing API key: set OPENAI_API_KEY or [model] api_key".into(),
                )
            })?;
        let base_url = cfg
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .map_err(|err| DocumntrError::Completion(format!("http client error: {err}")))?,
            model: cfg.model.clone(),
            api_key,
            base_url,
        })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAIClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        if messages.is_empty() {
            return Err(DocumntrError::Completion("no messages to send".into()));
        }

        let payload = json!({
            "model": self.model,
            "messages": messages,
        });

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .json(&payload)
            .send()
            .await
            .map_err(|err| DocumntrError::Completion(format!("request error: {err}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(coalesce_error(status, &body));
        }

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|err| DocumntrError::Completion(format!("response parse error: {err}")))?;

        let first = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DocumntrError::Completion("no choices returned".into()))?;

        first
            .message
            .content
            .ok_or_else(|| DocumntrError::Completion("empty completion returned".into()))
    }
}

/// A deterministic model used for tests and demos. Pops scripted responses in
/// order; a failing variant surfaces a fixed cause on every call.
pub struct StubModel {
    behavior: StubBehavior,
}

enum StubBehavior {
    Scripted(Mutex<VecDeque<String>>),
    Fail(String),
}

impl StubModel {
    pub fn new(responses: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            behavior: StubBehavior::Scripted(Mutex::new(responses.into())),
        })
    }

    pub fn failing(cause: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            behavior: StubBehavior::Fail(cause.into()),
        })
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        if messages.is_empty() {
            return Err(DocumntrError::Completion("no messages to send".into()));
        }
        match &self.behavior {
            StubBehavior::Scripted(responses) => responses
                .lock()
                .expect("stub model poisoned")
                .pop_front()
                .ok_or_else(|| {
                    DocumntrError::Completion("StubModel ran out of scripted responses".into())
                }),
            StubBehavior::Fail(cause) => Err(DocumntrError::Completion(cause.clone())),
        }
    }
}
