//! Identifier and version generation.
//!
//! Widgets that arrive without an `id` get `"<unix millis>_<counter>"`, where the
//! counter is owned by one [`IdGenerator`] and advances once per construction.
//! Widgets without a `version` get `"<id>_v1"`.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Monotonic construction counter used to synthesize widget ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Advance the counter for one construction and return its new value.
    pub fn advance(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Advance the counter and format a fresh id.
    pub fn next_id(&self) -> String {
        let index = self.advance();
        format!("{}_{index}", Utc::now().timestamp_millis())
    }

    /// Id for one construction: the supplied id when non-empty, otherwise a
    /// fresh one. The counter advances either way.
    pub fn assign(&self, supplied: Option<&str>) -> String {
        match supplied.filter(|id| !id.is_empty()) {
            Some(id) => {
                self.advance();
                id.to_string()
            }
            None => self.next_id(),
        }
    }

    /// Constructions recorded so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Reset the counter to zero.
    ///
    /// Only meant for isolating tests that assert on counter values.
    pub fn reset(&self) {
        self.counter.store(0, Ordering::SeqCst);
    }
}

/// Version assigned to a widget that was supplied without one.
#[must_use]
pub fn default_version(id: &str) -> String {
    format!("{id}_v1")
}
