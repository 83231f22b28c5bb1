//! Code analysis pipeline: prompt assembly, completion, metrics, and the
//! optional exchange history used to prime new requests.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{DocumntrError, Result};
#[cfg(feature = "history")]
use crate::history::{Exchange, ExchangeHistory};
use crate::llm::ChatModel;
use crate::message::Message;
use crate::metrics::{token_proxy, GenerationMetrics, MetricsSnapshot};
#[cfg(feature = "history")]
use crate::store::HistoryStore;

/// Fixed instruction sent as the first message of every request.
pub const SYSTEM_PROMPT: &str = "\
You are an assistant that analyzes code and suggests documentation based on the recommended best practices for the given language.
Your response should include only the updated code, formatted with proper indentation for the specified language (if one can be ascertained).
Under no circumstances are you to alter the functionality or layout of the code in any way other than to insert code documentation.
Under no circumstances are you to add comments inside functions or methods describing what the code does.
Provide documentation above each function or method giving a summary as well as detailing any parameters and return values.
Make sure each function in the class file contains documentation above it.
Aim for clarity, completeness, and consistency. Try to be as succinct as possible.
DO NOT ADD ANY MARKDOWN CODE TO YOUR RESPONSE. DO NOT INCLUDE ANY CODE BLOCKS OR BACK TICKS WHATSOEVER.
Under no circumstances are you to include any flavor text saying that you've updated the code or anything like that, simply output code.
Take your initial response and ask yourself how you would improve upon that documentation and then respond with the improved documentation after your own reflection.
DO NOT INCLUDE YOUR REFLECTION IN THE RESPONSE.";

/// Successful analysis plus the metrics derived from this call. Times are in
/// seconds.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub documented_code: String,
    pub generation_time: f64,
    pub average_time: f64,
    pub token_time_ratio: f64,
}

#[cfg(feature = "history")]
struct HistoryState {
    store: Box<dyn HistoryStore>,
    exchanges: Mutex<ExchangeHistory>,
}

/// Drives one analysis round trip and owns the process-lifetime counters.
pub struct CodeAnalyzer {
    model: Arc<dyn ChatModel>,
    metrics: Mutex<GenerationMetrics>,
    #[cfg(feature = "history")]
    history: Option<HistoryState>,
}

impl CodeAnalyzer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            metrics: Mutex::new(GenerationMetrics::default()),
            #[cfg(feature = "history")]
            history: None,
        }
    }

    /// Enables history priming, seeding the in-memory list from whatever the
    /// store already holds.
    #[cfg(feature = "history")]
    pub async fn with_history(mut self, store: Box<dyn HistoryStore>) -> Result<Self> {
        let stored = store.load().await?;
        self.history = Some(HistoryState {
            store,
            exchanges: Mutex::new(ExchangeHistory::with_exchanges(stored)),
        });
        Ok(self)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.lock().expect("metrics poisoned").snapshot()
    }

    /// Analyzes `code` and returns the documented version plus derived
    /// metrics. Counters and history are touched only on success.
    pub async fn analyze_code(&self, code: &str) -> Result<AnalysisReport> {
        if code.trim().is_empty() {
            return Err(DocumntrError::EmptyCode);
        }

        let user_message = format!("Analyze the following code:\n\n{code}");
        let mut messages = vec![Message::system(SYSTEM_PROMPT)];
        #[cfg(feature = "history")]
        if let Some(history) = &self.history {
            messages.extend(
                history
                    .exchanges
                    .lock()
                    .expect("history poisoned")
                    .context_messages(),
            );
        }
        messages.push(Message::user(user_message.clone()));

        let start = Instant::now();
        let documented_code = match self.model.complete(&messages).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "completion failed");
                return Err(err);
            }
        };
        let generation_time = start.elapsed();

        let tokens = token_proxy(code);
        let (average_time, token_time_ratio) = {
            let mut metrics = self.metrics.lock().expect("metrics poisoned");
            metrics.record(generation_time, tokens);
            (metrics.average_time(), metrics.token_time_ratio())
        };

        info!(
            generation_time = generation_time.as_secs_f64(),
            tokens, "analysis complete"
        );

        #[cfg(feature = "history")]
        if let Some(history) = &self.history {
            let snapshot = {
                let mut exchanges = history.exchanges.lock().expect("history poisoned");
                exchanges.push(Exchange {
                    user_message: user_message.clone(),
                    assistant_response: documented_code.clone(),
                });
                exchanges.exchanges().to_vec()
            };
            history.store.save(&snapshot).await?;
        }

        Ok(AnalysisReport {
            documented_code,
            generation_time: generation_time.as_secs_f64(),
            average_time,
            token_time_ratio,
        })
    }
}
