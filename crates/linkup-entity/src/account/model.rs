//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account in the LinkUp network.
///
/// Only the fields the notification pipeline reads are modeled here; the
/// full account record is owned by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// While the current time is before this value, push delivery is
    /// suppressed for this account. Cleared lazily on the next dispatch
    /// after it expires.
    pub notification_pause_expires_at: Option<DateTime<Utc>>,
    /// Registered device tokens, in registration order.
    pub push_tokens: Vec<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// The account's human-readable display name.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Check whether push delivery is currently paused.
    pub fn is_pause_active(&self, now: DateTime<Utc>) -> bool {
        self.notification_pause_expires_at
            .map(|expires_at| now < expires_at)
            .unwrap_or(false)
    }
}
