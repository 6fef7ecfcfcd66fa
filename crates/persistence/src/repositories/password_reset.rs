//! Password reset token repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PasswordResetTokenEntity;
use crate::metrics::QueryTimer;

/// Repository for password-reset-token database operations.
#[derive(Clone)]
pub struct PasswordResetRepository {
    pool: PgPool,
}

impl PasswordResetRepository {
    /// Creates a new PasswordResetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new reset token for a member.
    pub async fn create_token(
        &self,
        member_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetTokenEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_password_reset_token");
        let result = sqlx::query_as::<_, PasswordResetTokenEntity>(
            r#"
            INSERT INTO password_reset_tokens (member_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, member_id, token_hash, created_at, expires_at
            "#,
        )
        .bind(member_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an unexpired reset token by its hash.
    pub async fn find_valid_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<PasswordResetTokenEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_valid_password_reset_token");
        let result = sqlx::query_as::<_, PasswordResetTokenEntity>(
            r#"
            SELECT id, member_id, token_hash, created_at, expires_at
            FROM password_reset_tokens
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Remove every reset token a member holds (tokens are single use).
    pub async fn delete_for_member(&self, member_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_password_reset_tokens_for_member");
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE member_id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }
}
