//! Retry Policy
//!
//! A single-shot retry budget for one purchase flow. Not a backoff schedule:
//! a flow gets exactly one automatic re-submission.

use serde::Serialize;

/// Automatic re-submissions allowed per purchase flow
pub const MAX_AUTOMATIC_RETRIES: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryState {
    /// No retry spent yet
    Fresh,
    /// Budget spent, further failures surface to the buyer
    Exhausted,
}

/// Attempt counter owned by one purchase-flow caller.
///
/// Never reset automatically; the caller resets it when an unrelated purchase
/// begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicy {
    pub const fn new() -> Self {
        Self {
            attempts: 0,
            max_attempts: MAX_AUTOMATIC_RETRIES,
        }
    }

    pub const fn can_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }

    pub const fn increment(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    pub const fn reset(&mut self) {
        self.attempts = 0;
    }

    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    pub const fn state(&self) -> RetryState {
        if self.can_retry() {
            RetryState::Fresh
        } else {
            RetryState::Exhausted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_policy_allows_one_retry() {
        let policy = RetryPolicy::new();
        assert!(policy.can_retry());
        assert_eq!(policy.state(), RetryState::Fresh);
        assert_eq!(policy.attempts(), 0);
    }

    #[test]
    fn test_increment_exhausts_until_reset() {
        let mut policy = RetryPolicy::new();
        policy.increment();
        assert!(!policy.can_retry());
        assert_eq!(policy.state(), RetryState::Exhausted);

        policy.increment();
        assert!(!policy.can_retry());

        policy.reset();
        assert!(policy.can_retry());
        assert_eq!(policy.state(), RetryState::Fresh);
    }

    #[test]
    fn test_reset_on_fresh_is_noop() {
        let mut policy = RetryPolicy::new();
        policy.reset();
        assert_eq!(policy, RetryPolicy::new());
    }
}
