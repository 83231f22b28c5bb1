use std::time::Duration;

use serde::Serialize;

/// Whitespace-delimited word count, a cheap stand-in for a real tokenizer.
pub fn token_proxy(code: &str) -> u64 {
    code.split_whitespace().count() as u64
}

/// Process-lifetime generation counters. Mutated only after a successful
/// completion; derived values are 0 until their divisor is non-zero.
#[derive(Debug, Clone, Default)]
pub struct GenerationMetrics {
    total_time: Duration,
    num_generations: u64,
    total_tokens: u64,
    current_generation_time: Duration,
}

impl GenerationMetrics {
    pub fn record(&mut self, generation_time: Duration, tokens: u64) {
        self.current_generation_time = generation_time;
        self.total_time += generation_time;
        self.num_generations += 1;
        // Tokens accumulate. An earlier revision assigned here, which silently
        // capped the lifetime total at the last request's size.
        self.total_tokens += tokens;
    }

    pub fn num_generations(&self) -> u64 {
        self.num_generations
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    pub fn current_generation_time(&self) -> Duration {
        self.current_generation_time
    }

    /// Mean wall time per generation, in seconds.
    pub fn average_time(&self) -> f64 {
        if self.num_generations == 0 {
            return 0.0;
        }
        self.total_time.as_secs_f64() / self.num_generations as f64
    }

    /// Lifetime tokens over lifetime generation time.
    pub fn token_time_ratio(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.total_tokens as f64 / secs
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            num_generations: self.num_generations,
            total_tokens: self.total_tokens,
            total_time: self.total_time.as_secs_f64(),
            average_time: self.average_time(),
            token_time_ratio: self.token_time_ratio(),
        }
    }
}

/// Point-in-time view of the counters, as returned by `GET /metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub num_generations: u64,
    pub total_tokens: u64,
    pub total_time: f64,
    pub average_time: f64,
    pub token_time_ratio: f64,
}
