//! Attempt budget for the search loop.
//!
//! Only a wrong package type (`.apk`) consumes an attempt and triggers a new
//! search; there is no backoff between attempts.

/// Decision taken after an attempt ended in a retryable classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptDecision {
    /// Start attempt `n` (1-based).
    SearchAgain(u32),
    /// Budget exhausted after this many attempts.
    GiveUp(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptPolicy {
    /// Maximum number of searches, including the first.
    pub max_attempts: u32,
}

impl AttemptPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Whether attempt `attempt` (1-based) may run at all.
    pub fn allows(&self, attempt: u32) -> bool {
        attempt >= 1 && attempt <= self.max_attempts
    }

    /// What to do after attempt `finished` asked for a retry.
    pub fn after_retryable(&self, finished: u32) -> AttemptDecision {
        let next = finished.saturating_add(1);
        if self.allows(next) {
            AttemptDecision::SearchAgain(next)
        } else {
            AttemptDecision::GiveUp(finished)
        }
    }
}
