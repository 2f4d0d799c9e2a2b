//! Store seams the notification services depend on.
//!
//! The dispatcher and preference service talk to these traits rather than
//! to concrete repositories, so tests can substitute in-memory fakes. The
//! production implementations delegate to the `linkup-database` repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use linkup_core::result::AppResult;
use linkup_core::types::id::{CommentId, UserId};
use linkup_database::repositories::{AccountRepository, CommentRepository, NotificationRepository};
use linkup_entity::account::Account;
use linkup_entity::comment::Comment;
use linkup_entity::notification::{NewNotification, Notification};

/// Account lookups and the read-modify-write of the two notification
/// preference fields (`notification_pause_expires_at`, `push_tokens`).
///
/// No concurrency control beyond the store's own: pause/resume is a
/// low-frequency, single-user operation and last-write-wins is acceptable.
#[async_trait]
pub trait AccountStore: Send + Sync + std::fmt::Debug {
    /// Find an account by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Account>>;

    /// Pause push delivery until the given time.
    async fn set_notification_pause(&self, id: UserId, until: DateTime<Utc>) -> AppResult<()>;

    /// Clear the pause flag.
    async fn clear_notification_pause(&self, id: UserId) -> AppResult<()>;

    /// Register a device token.
    async fn add_push_token(&self, id: UserId, token: &str) -> AppResult<()>;

    /// Remove a device token.
    async fn remove_push_token(&self, id: UserId, token: &str) -> AppResult<()>;
}

/// Comment lookups, used to resolve a comment reaction to its parent post.
#[async_trait]
pub trait CommentStore: Send + Sync + std::fmt::Debug {
    /// Find a comment by id.
    async fn find_by_id(&self, id: CommentId) -> AppResult<Option<Comment>>;
}

/// Notification record persistence.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug {
    /// Create a notification record.
    async fn create(&self, data: &NewNotification) -> AppResult<Notification>;
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Account>> {
        AccountRepository::find_by_id(self, id).await
    }

    async fn set_notification_pause(&self, id: UserId, until: DateTime<Utc>) -> AppResult<()> {
        AccountRepository::set_notification_pause(self, id, until).await
    }

    async fn clear_notification_pause(&self, id: UserId) -> AppResult<()> {
        AccountRepository::clear_notification_pause(self, id).await
    }

    async fn add_push_token(&self, id: UserId, token: &str) -> AppResult<()> {
        AccountRepository::add_push_token(self, id, token).await
    }

    async fn remove_push_token(&self, id: UserId, token: &str) -> AppResult<()> {
        AccountRepository::remove_push_token(self, id, token).await
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn find_by_id(&self, id: CommentId) -> AppResult<Option<Comment>> {
        CommentRepository::find_by_id(self, id).await
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, data: &NewNotification) -> AppResult<Notification> {
        NotificationRepository::create(self, data).await
    }
}
