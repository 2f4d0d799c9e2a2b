//! Push delivery gateway configuration.

use serde::{Deserialize, Serialize};

/// Push gateway (FCM) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Multicast send endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Server API key sent in the `Authorization` header.
    pub server_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_endpoint() -> String {
    "https://fcm.googleapis.com/fcm/send".to_string()
}

fn default_timeout() -> u64 {
    10
}
