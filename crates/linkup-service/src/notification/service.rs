//! Notification feed queries and read-state updates.

use std::sync::Arc;

use tracing::debug;

use linkup_core::result::AppResult;
use linkup_core::types::id::{NotificationId, UserId};
use linkup_core::types::pagination::{PageRequest, PageResponse};
use linkup_database::repositories::NotificationRepository;
use linkup_entity::notification::Notification;

/// Read-side operations on a user's notification feed.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    repo: Arc<NotificationRepository>,
}

impl NotificationService {
    /// Create a new notification service.
    pub fn new(repo: Arc<NotificationRepository>) -> Self {
        Self { repo }
    }

    /// List notifications for a user, newest first. Deleted notifications
    /// are excluded.
    pub async fn list(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.repo.find_by_user(user_id, page).await
    }

    /// Unread notification count, for the badge.
    pub async fn unread_count(&self, user_id: UserId) -> AppResult<i64> {
        self.repo.count_unread(user_id).await
    }

    /// Mark a notification as read.
    pub async fn mark_read(&self, user_id: UserId, id: NotificationId) -> AppResult<()> {
        self.repo.mark_read(id, user_id).await
    }

    /// Mark all of a user's notifications as read. Returns the number updated.
    pub async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let updated = self.repo.mark_all_read(user_id).await?;
        debug!(user = %user_id, updated, "Marked all notifications read");
        Ok(updated)
    }

    /// Soft-delete a notification from the feed.
    pub async fn delete(&self, user_id: UserId, id: NotificationId) -> AppResult<()> {
        self.repo.soft_delete(id, user_id).await
    }
}
