//! Push provider trait for pluggable delivery transports.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A single multicast payload: one message fanned out to many device tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulticastMessage {
    /// The rendered notification body.
    pub body: String,
    /// Small key/value payload delivered alongside the body.
    pub data: HashMap<String, String>,
    /// Device tokens to deliver to, in registration order.
    pub tokens: Vec<String>,
}

/// Per-token delivery result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResult {
    /// Whether delivery to this token was accepted by the gateway.
    pub success: bool,
    /// Gateway error code for failed tokens (e.g. `"NotRegistered"`).
    pub error: Option<String>,
}

/// Result of a multicast send.
///
/// `results` is position-aligned with the `tokens` list of the request:
/// `results[i]` describes delivery to `tokens[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulticastOutcome {
    /// Number of tokens the gateway reported as failed.
    pub failure_count: usize,
    /// Per-token results, same length and order as the request tokens.
    pub results: Vec<SendResult>,
}

impl MulticastOutcome {
    /// Zip failed results back to their token strings.
    pub fn failed_tokens<'a>(&self, tokens: &'a [String]) -> Vec<&'a str> {
        tokens
            .iter()
            .zip(self.results.iter())
            .filter(|(_, result)| !result.success)
            .map(|(token, _)| token.as_str())
            .collect()
    }
}

/// Trait for push delivery transports (FCM, or an in-memory fake in tests).
///
/// The provider is best-effort: callers do not retry and treat a transport
/// error the same as an all-tokens failure.
#[async_trait]
pub trait PushProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Send one message to many device tokens in a single call.
    async fn send_multicast(&self, message: &MulticastMessage) -> AppResult<MulticastOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_tokens_zip() {
        let tokens = vec!["tok1".to_string(), "tok2".to_string(), "tok3".to_string()];
        let outcome = MulticastOutcome {
            failure_count: 2,
            results: vec![
                SendResult {
                    success: false,
                    error: Some("NotRegistered".to_string()),
                },
                SendResult {
                    success: true,
                    error: None,
                },
                SendResult {
                    success: false,
                    error: Some("InvalidRegistration".to_string()),
                },
            ],
        };
        assert_eq!(outcome.failed_tokens(&tokens), vec!["tok1", "tok3"]);
    }

    #[test]
    fn test_failed_tokens_empty_when_all_succeed() {
        let tokens = vec!["tok1".to_string()];
        let outcome = MulticastOutcome {
            failure_count: 0,
            results: vec![SendResult {
                success: true,
                error: None,
            }],
        };
        assert!(outcome.failed_tokens(&tokens).is_empty());
    }
}
