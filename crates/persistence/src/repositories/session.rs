//! Session repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{MemberEntity, SessionEntity};
use crate::metrics::QueryTimer;

/// Repository for session-related database operations.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new SessionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new session for a member.
    pub async fn create_session(
        &self,
        member_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_session");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            INSERT INTO sessions (member_id, token_hash, expires_at)
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

    /// Resolve a session token hash to its member.
    ///
    /// Expired sessions and sessions of deactivated members resolve to
    /// nothing; the caller treats both as unauthenticated.
    pub async fn find_member_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<MemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_member_by_session_token");
        let result = sqlx::query_as::<_, MemberEntity>(
            r#"
            SELECT m.id, m.username, m.password_hash, m.first_name, m.last_name,
                   m.email, m.is_active, m.date_joined
            FROM members m
            JOIN sessions s ON s.member_id = m.id
            WHERE s.token_hash = $1
              AND s.expires_at > NOW()
              AND m.is_active = TRUE
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Remove the session with the given token hash (logout).
    pub async fn delete_by_token_hash(&self, token_hash: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_session_by_token");
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }

    /// Remove every session a member holds.
    pub async fn delete_for_member(&self, member_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_sessions_for_member");
        let result = sqlx::query("DELETE FROM sessions WHERE member_id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }

    /// Remove every session a member holds except the one presented.
    ///
    /// Used after a password change: other devices are logged out while the
    /// session that performed the change stays valid.
    pub async fn delete_for_member_except(
        &self,
        member_id: Uuid,
        token_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_other_sessions_for_member");
        let result = sqlx::query("DELETE FROM sessions WHERE member_id = $1 AND token_hash <> $2")
            .bind(member_id)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }
}
