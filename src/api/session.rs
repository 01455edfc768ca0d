//! Session initialization
//!
//! The server hands out one session per browser cookie and may refuse new
//! sessions while at capacity. Creation is retried with bounded exponential
//! backoff.

use std::time::Duration;

use crate::api::types::SessionInfo;
use crate::api::{ApiError, ChatBackend};
use crate::storage::settings::AppSettings;

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(2000),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            max_attempts: settings.session_retry_attempts.max(1),
            initial_backoff: Duration::from_millis(settings.session_retry_backoff_ms),
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (0-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

/// Create a session, retrying transient failures.
///
/// Non-retryable errors (see [`ApiError::is_retryable`]) are returned
/// immediately; otherwise the last error is returned once the attempts run out.
pub async fn ensure_session<B>(backend: &B, policy: &RetryPolicy) -> Result<SessionInfo, ApiError>
where
    B: ChatBackend + ?Sized,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match backend.new_session().await {
            Ok(session) => {
                tracing::info!(
                    "Session ready: {} (attempt {}/{})",
                    crate::truncate_str(&session.session_id, 8),
                    attempt,
                    attempts
                );
                return Ok(session);
            }
            Err(e) if e.is_retryable() && attempt < attempts => {
                let delay = policy.backoff(attempt - 1);
                tracing::warn!(
                    "Session creation failed ({}), retrying in {:?} ({}/{})",
                    e,
                    delay,
                    attempt,
                    attempts
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                tracing::error!("Session creation failed after {} attempt(s): {}", attempt, e);
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(350),
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(350));
        assert_eq!(policy.backoff(40), Duration::from_millis(350));
    }

    #[test]
    fn test_policy_from_settings() {
        let mut settings = AppSettings::default();
        settings.session_retry_attempts = 0;
        settings.session_retry_backoff_ms = 250;
        let policy = RetryPolicy::from_settings(&settings);
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.initial_backoff, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_first_attempt_succeeds() {
        let backend = MockBackend::new();
        let session = ensure_session(&backend, &fast_policy(3)).await.unwrap();
        assert_eq!(session.session_id, "session-test");
        assert_eq!(backend.calls("new_session"), 1);
    }

    #[tokio::test]
    async fn test_retries_busy_server() {
        let backend = MockBackend::new();
        backend.fail_new_session(vec![ApiError::Busy, ApiError::Transport("reset".into())]);
        let session = ensure_session(&backend, &fast_policy(3)).await.unwrap();
        assert_eq!(session.session_id, "session-test");
        assert_eq!(backend.calls("new_session"), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let backend = MockBackend::new();
        backend.fail_new_session(vec![ApiError::Busy, ApiError::Busy, ApiError::Busy]);
        let err = ensure_session(&backend, &fast_policy(2)).await.unwrap_err();
        assert_eq!(err, ApiError::Busy);
        assert_eq!(backend.calls("new_session"), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let backend = MockBackend::new();
        backend.fail_new_session(vec![ApiError::Rejected("bloqueado".into())]);
        let err = ensure_session(&backend, &fast_policy(5)).await.unwrap_err();
        assert_eq!(err, ApiError::Rejected("bloqueado".into()));
        assert_eq!(backend.calls("new_session"), 1);
    }
}
