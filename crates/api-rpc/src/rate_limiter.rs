//! Rate Limiter (Token Bucket)
//!
//! Caps the request rate on mutating RPC methods so a misbehaving client
//! cannot flood the stores.

use std::time::Instant;
use tokio::sync::Mutex;

/// Token bucket rate limiter
pub struct RateLimiter {
    state: Mutex<Bucket>,
    max_tokens: f64,
    refill_per_sec: f64,
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `max_tokens` - Maximum burst size
    /// * `refill_per_sec` - Tokens added per second
    pub fn new(max_tokens: u32, refill_per_sec: u32) -> Self {
        Self {
            state: Mutex::new(Bucket {
                tokens: max_tokens as f64,
                last_refill: Instant::now(),
            }),
            max_tokens: max_tokens as f64,
            refill_per_sec: refill_per_sec as f64,
        }
    }

    /// Check if a request is allowed (consumes 1 token)
    pub async fn check(&self) -> bool {
        let mut bucket = self.state.lock().await;

        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.max_tokens);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
