//! Reconnect policy.
//!
//! Pure functions so the runner's decisions can be tested without a socket.

use std::time::Duration;

use crate::error::ClientError;

/// How many times and how often the runner retries a lost connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(5),
        }
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if retrying can never succeed (e.g., InvalidUrl), `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidUrl(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that ended the session
/// * `failed_attempts` - Consecutive failures so far, including this one
/// * `policy` - Retry limits
pub fn should_attempt_reconnect(
    error: &ClientError,
    failed_attempts: u32,
    policy: &ReconnectPolicy,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    failed_attempts < policy.max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_exits_immediately() {
        // テスト項目: URL が不正な場合は再接続せず即座に終了する
        // given (前提条件):
        let error = ClientError::InvalidUrl("not a url".to_string());

        // when (操作):
        let exit = should_exit_immediately(&error);
        let retry = should_attempt_reconnect(&error, 0, &ReconnectPolicy::default());

        // then (期待する結果):
        assert!(exit);
        assert!(!retry);
    }

    #[test]
    fn test_connection_lost_is_retried_until_limit() {
        // テスト項目: 接続断は上限回数に達するまで再接続を試みる
        // given (前提条件):
        let error = ClientError::ConnectionLost;
        let policy = ReconnectPolicy::default();

        // when (操作):
        let decisions: Vec<bool> = (1..=5)
            .map(|attempt| should_attempt_reconnect(&error, attempt, &policy))
            .collect();

        // then (期待する結果):
        assert_eq!(decisions, vec![true, true, true, true, false]);
    }

    #[test]
    fn test_default_policy_is_five_attempts_five_seconds_apart() {
        // テスト項目: デフォルトのポリシーは 5 回 / 5 秒間隔
        // given (前提条件):

        // when (操作):
        let policy = ReconnectPolicy::default();

        // then (期待する結果):
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.interval, Duration::from_secs(5));
    }

    #[test]
    fn test_connection_error_with_zero_budget_is_not_retried() {
        // テスト項目: 再接続回数 0 のポリシーでは一度も再接続しない
        // given (前提条件):
        let error = ClientError::ConnectionError("refused".to_string());
        let policy = ReconnectPolicy {
            max_attempts: 0,
            interval: Duration::ZERO,
        };

        // when (操作):
        let retry = should_attempt_reconnect(&error, 0, &policy);

        // then (期待する結果):
        assert!(!retry);
    }
}
