//! FCM multicast push provider.
//!
//! One HTTP request carries the message body, the data payload, and every
//! device token; the gateway responds with a per-token result list in the
//! same order as the request tokens.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use linkup_core::config::push::PushConfig;
use linkup_core::error::AppError;
use linkup_core::result::AppResult;
use linkup_core::traits::push::{MulticastMessage, MulticastOutcome, PushProvider, SendResult};

/// Push provider backed by the FCM multicast send endpoint.
#[derive(Debug, Clone)]
pub struct FcmPushProvider {
    client: reqwest::Client,
    endpoint: String,
    server_key: String,
}

/// Multicast request body.
#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    registration_ids: &'a [String],
    notification: FcmNotification<'a>,
    data: &'a HashMap<String, String>,
}

/// The visible notification portion of the request.
#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    body: &'a str,
}

/// Multicast response body.
#[derive(Debug, Deserialize)]
struct FcmResponse {
    failure: usize,
    results: Vec<FcmResult>,
}

/// A single per-token result entry.
#[derive(Debug, Deserialize)]
struct FcmResult {
    message_id: Option<String>,
    error: Option<String>,
}

impl FcmPushProvider {
    /// Create a new provider from configuration.
    pub fn new(config: &PushConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::external_service(format!("Failed to build push HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            server_key: config.server_key.clone(),
        })
    }
}

#[async_trait]
impl PushProvider for FcmPushProvider {
    async fn send_multicast(&self, message: &MulticastMessage) -> AppResult<MulticastOutcome> {
        if message.tokens.is_empty() {
            return Ok(MulticastOutcome {
                failure_count: 0,
                results: Vec::new(),
            });
        }

        let request = FcmRequest {
            registration_ids: &message.tokens,
            notification: FcmNotification {
                body: &message.body,
            },
            data: &message.data,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Push request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Push gateway returned {status}"
            )));
        }

        let body: FcmResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Invalid push response: {e}")))?;

        debug!(
            tokens = message.tokens.len(),
            failures = body.failure,
            "Multicast send completed"
        );

        outcome_from_response(body, message.tokens.len())
    }
}

/// Map the gateway response onto the position-aligned outcome contract.
fn outcome_from_response(response: FcmResponse, token_count: usize) -> AppResult<MulticastOutcome> {
    if response.results.len() != token_count {
        return Err(AppError::external_service(format!(
            "Push gateway returned {} results for {} tokens",
            response.results.len(),
            token_count
        )));
    }

    let results = response
        .results
        .into_iter()
        .map(|r| SendResult {
            success: r.message_id.is_some() && r.error.is_none(),
            error: r.error,
        })
        .collect();

    Ok(MulticastOutcome {
        failure_count: response.failure,
        results,
    })
}
