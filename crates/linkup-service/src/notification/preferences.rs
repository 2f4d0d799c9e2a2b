//! Notification pause/resume and device token management.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use linkup_core::error::AppError;
use linkup_core::result::AppResult;
use linkup_core::types::id::UserId;

use super::stores::AccountStore;

/// Manages the recipient side of push delivery: the pause flag and the
/// registered device tokens.
#[derive(Debug, Clone)]
pub struct PreferenceService {
    /// Account store for preference updates.
    accounts: Arc<dyn AccountStore>,
}

impl PreferenceService {
    /// Create a new preference service.
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Pause push delivery until the given time. In-app records are still
    /// created while paused; only push delivery is suppressed.
    pub async fn pause_notifications(
        &self,
        user_id: UserId,
        until: DateTime<Utc>,
    ) -> AppResult<()> {
        if until <= Utc::now() {
            return Err(AppError::validation("Pause expiry must be in the future"));
        }

        self.accounts.set_notification_pause(user_id, until).await?;
        info!(user = %user_id, until = %until, "Push notifications paused");
        Ok(())
    }

    /// Resume push delivery immediately.
    pub async fn resume_notifications(&self, user_id: UserId) -> AppResult<()> {
        self.accounts.clear_notification_pause(user_id).await?;
        info!(user = %user_id, "Push notifications resumed");
        Ok(())
    }

    /// Register a device token for push delivery. Re-registering an
    /// existing token is a no-op rather than a duplicate.
    pub async fn register_push_token(&self, user_id: UserId, token: &str) -> AppResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::validation("Push token must not be empty"));
        }
        self.accounts.add_push_token(user_id, token).await
    }

    /// Remove a registered device token.
    pub async fn remove_push_token(&self, user_id: UserId, token: &str) -> AppResult<()> {
        self.accounts.remove_push_token(user_id, token).await
    }
}
