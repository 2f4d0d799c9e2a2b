//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A comment on a post.
///
/// Read-only within the notification pipeline: dispatch uses it to resolve
/// a comment reaction back to the parent post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: Uuid,
    /// The post this comment belongs to.
    pub post_id: Uuid,
    /// The account that wrote the comment.
    pub author_id: Uuid,
    /// Comment text.
    pub body: String,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
}
