//! Account repository implementation.
//!
//! The pipeline only reads accounts and writes the two notification
//! preference fields (`notification_pause_expires_at`, `push_tokens`).
//! Account creation and profile management live in the identity service.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use linkup_core::error::{AppError, ErrorKind};
use linkup_core::result::AppResult;
use linkup_core::types::id::UserId;
use linkup_entity::account::Account;

/// Repository for account lookups and preference updates.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an account by primary key.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    /// Pause push delivery for an account until the given time.
    pub async fn set_notification_pause(
        &self,
        id: UserId,
        until: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET notification_pause_expires_at = $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(until)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to set notification pause", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {id} not found")));
        }
        Ok(())
    }

    /// Clear the notification pause flag.
    pub async fn clear_notification_pause(&self, id: UserId) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET notification_pause_expires_at = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear notification pause", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {id} not found")));
        }
        Ok(())
    }

    /// Register a device token. Re-registering an existing token moves it
    /// to the end of the list rather than duplicating it.
    pub async fn add_push_token(&self, id: UserId, token: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET push_tokens = array_append(array_remove(push_tokens, $2), $2), \
                                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add push token", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {id} not found")));
        }
        Ok(())
    }

    /// Remove a device token.
    pub async fn remove_push_token(&self, id: UserId, token: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET push_tokens = array_remove(push_tokens, $2), \
                                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to remove push token", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {id} not found")));
        }
        Ok(())
    }
}
