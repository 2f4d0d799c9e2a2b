//! Comment repository implementation.

use sqlx::PgPool;

use linkup_core::error::{AppError, ErrorKind};
use linkup_core::result::AppResult;
use linkup_core::types::id::CommentId;
use linkup_entity::comment::Comment;

/// Read-only repository for comments.
///
/// Dispatch uses it to resolve a comment reaction back to the comment's
/// parent post.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a comment by primary key.
    pub async fn find_by_id(&self, id: CommentId) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find comment by id", e)
            })
    }
}
