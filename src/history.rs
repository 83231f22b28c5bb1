use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Number of stored exchanges replayed into each new prompt.
pub const REPLAY_WINDOW: usize = 5;

/// One completed request/response round trip. Appended only, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub user_message: String,
    pub assistant_response: String,
}

/// In-memory exchange list. The stored list grows without bound; only the
/// last [`REPLAY_WINDOW`] entries ever feed prompt construction.
#[derive(Debug, Clone, Default)]
pub struct ExchangeHistory {
    exchanges: Vec<Exchange>,
}

impl ExchangeHistory {
    pub fn with_exchanges(exchanges: Vec<Exchange>) -> Self {
        Self { exchanges }
    }

    pub fn push(&mut self, exchange: Exchange) {
        self.exchanges.push(exchange);
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Prior turns for the next prompt: the most recent exchanges flattened
    /// into alternating user/assistant messages, oldest first.
    pub fn context_messages(&self) -> Vec<Message> {
        let start = self.exchanges.len().saturating_sub(REPLAY_WINDOW);
        let mut messages = Vec::with_capacity((self.exchanges.len() - start) * 2);
        for exchange in &self.exchanges[start..] {
            messages.push(Message::user(exchange.user_message.clone()));
            messages.push(Message::assistant(exchange.assistant_response.clone()));
        }
        messages
    }
}
