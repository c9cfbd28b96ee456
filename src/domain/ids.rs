// src/domain/ids.rs

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out timestamp-based ids like `L-1760601600123`.
///
/// Millisecond clocks collide during bulk imports, so each new value is
/// bumped past the previous one. Ids stay unique and increasing per process.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, prefix: &str) -> String {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return format!("{prefix}-{candidate}"),
                Err(actual) => prev = actual,
            }
        }
    }
}
