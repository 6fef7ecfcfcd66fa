//! Member repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MemberEntity;
use crate::metrics::QueryTimer;

const MEMBER_COLUMNS: &str =
    "id, username, password_hash, first_name, last_name, email, is_active, date_joined";

/// Repository for member-related database operations.
#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// Creates a new MemberRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new member account.
    pub async fn create_member(
        &self,
        username: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<MemberEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_member");
        let result = sqlx::query_as::<_, MemberEntity>(&format!(
            r#"
            INSERT INTO members (username, password_hash, first_name, last_name, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MEMBER_COLUMNS}
            "#,
        ))
        .bind(username)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a member by exact username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<MemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_member_by_username");
        let result = sqlx::query_as::<_, MemberEntity>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS}
            FROM members
            WHERE username = $1
            "#,
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a member by id.
    pub async fn find_by_id(&self, member_id: Uuid) -> Result<Option<MemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_member_by_id");
        let result = sqlx::query_as::<_, MemberEntity>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS}
            FROM members
            WHERE id = $1
            "#,
        ))
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether a username is taken, case-insensitively.
    pub async fn username_exists(&self, username: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("member_username_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM members WHERE LOWER(username) = LOWER($1)
            )
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find all active members registered under an email address.
    pub async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<MemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_members_by_email");
        let result = sqlx::query_as::<_, MemberEntity>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS}
            FROM members
            WHERE LOWER(email) = LOWER($1) AND is_active = TRUE
            "#,
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace a member's password hash.
    pub async fn update_password(
        &self,
        member_id: Uuid,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_member_password");
        let result = sqlx::query("UPDATE members SET password_hash = $2 WHERE id = $1")
            .bind(member_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }

    /// Deactivate a member: flip the active flag and end every session.
    ///
    /// The password hash is left untouched so the account can be reactivated
    /// later without a credential reset. Runs in one transaction so a member
    /// is never observed deactivated but still logged in.
    pub async fn deactivate(&self, member_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("deactivate_member");

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE members SET is_active = FALSE WHERE id = $1")
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sessions WHERE member_id = $1")
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(())
    }

    /// Hard-delete a member and everything the member transitively owns.
    ///
    /// Dependent rows go leaf-to-root in a single transaction:
    /// data, devices, groups, sessions, reset tokens, then the member row.
    pub async fn delete_member(&self, member_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("delete_member");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM device_data dd
            USING devices d, device_groups g
            WHERE dd.device_id = d.id AND d.group_id = g.id AND g.owner_id = $1
            "#,
        )
        .bind(member_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM devices d
            USING device_groups g
            WHERE d.group_id = g.id AND g.owner_id = $1
            "#,
        )
        .bind(member_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM device_groups WHERE owner_id = $1")
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sessions WHERE member_id = $1")
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE member_id = $1")
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(())
    }
}
