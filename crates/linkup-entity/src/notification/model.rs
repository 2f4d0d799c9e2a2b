//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A notification delivered to a user's in-app feed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The account that triggered the event.
    pub from_user: Uuid,
    /// The recipient account. Never equal to `from_user`.
    pub to_user: Uuid,
    /// Event subject, e.g. `"impression"`, `"comment"`, `"follow"`.
    pub subject: String,
    /// Rendered message body. Never empty.
    pub content: String,
    /// Opaque id of the triggering entity.
    pub resource_id: Uuid,
    /// The related post, for post reactions, comments, and comment reactions.
    pub related_post_id: Option<Uuid>,
    /// The related comment, for comment reactions only.
    pub related_comment_id: Option<Uuid>,
    /// The related chat, for messages only.
    pub related_chat_id: Option<Uuid>,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// Whether the recipient has deleted this notification.
    pub is_deleted: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

/// Data required to create a new notification record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// The account that triggered the event.
    pub from_user: Uuid,
    /// The recipient account.
    pub to_user: Uuid,
    /// Event subject.
    pub subject: String,
    /// Rendered message body.
    pub content: String,
    /// Opaque id of the triggering entity.
    pub resource_id: Uuid,
    /// The related post, if any.
    pub related_post_id: Option<Uuid>,
    /// The related comment, if any.
    pub related_comment_id: Option<Uuid>,
    /// The related chat, if any.
    pub related_chat_id: Option<Uuid>,
}
