//! Device group repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::DeviceGroupEntity;
use crate::metrics::QueryTimer;

const GROUP_COLUMNS: &str = "id, name, description, creation_date, owner_id";

/// Repository for device-group database operations.
#[derive(Clone)]
pub struct DeviceGroupRepository {
    pool: PgPool,
}

impl DeviceGroupRepository {
    /// Creates a new DeviceGroupRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new device group for a member.
    ///
    /// The caller has already lower-cased and uniqueness-checked the name;
    /// the `(owner_id, name)` unique constraint backstops races.
    pub async fn create_group(
        &self,
        owner_id: Uuid,
        name: &str,
        description: &str,
        creation_date: Option<DateTime<Utc>>,
    ) -> Result<DeviceGroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_device_group");
        let result = sqlx::query_as::<_, DeviceGroupEntity>(&format!(
            r#"
            INSERT INTO device_groups (owner_id, name, description, creation_date)
            VALUES ($1, $2, $3, COALESCE($4, NOW()))
            RETURNING {GROUP_COLUMNS}
            "#,
        ))
        .bind(owner_id)
        .bind(name)
        .bind(description)
        .bind(creation_date)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a member's groups, oldest first.
    pub async fn find_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<DeviceGroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_groups_by_owner");
        let result = sqlx::query_as::<_, DeviceGroupEntity>(&format!(
            r#"
            SELECT {GROUP_COLUMNS}
            FROM device_groups
            WHERE owner_id = $1
            ORDER BY creation_date, name
            "#,
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find one of a member's groups by name, case-insensitively.
    ///
    /// The owner filter is part of the query, so a group owned by someone
    /// else comes back as absent, never as a different error.
    pub async fn find_by_owner_and_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> Result<Option<DeviceGroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_owner_and_name");
        let result = sqlx::query_as::<_, DeviceGroupEntity>(&format!(
            r#"
            SELECT {GROUP_COLUMNS}
            FROM device_groups
            WHERE owner_id = $1 AND LOWER(name) = LOWER($2)
            "#,
        ))
        .bind(owner_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether the owner already has a group with this name.
    ///
    /// Names are stored lower-cased, so the comparison is effectively
    /// case-insensitive.
    pub async fn name_exists_for_owner(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("group_name_exists_for_owner");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM device_groups
                WHERE owner_id = $1 AND name = LOWER($2)
            )
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a group's name, description and, when supplied, its
    /// creation date. An absent date leaves the stored one untouched.
    pub async fn update_group(
        &self,
        group_id: Uuid,
        name: &str,
        description: &str,
        creation_date: Option<DateTime<Utc>>,
    ) -> Result<DeviceGroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_device_group");
        let result = sqlx::query_as::<_, DeviceGroupEntity>(&format!(
            r#"
            UPDATE device_groups
            SET name = $2, description = $3, creation_date = COALESCE($4, creation_date)
            WHERE id = $1
            RETURNING {GROUP_COLUMNS}
            "#,
        ))
        .bind(group_id)
        .bind(name)
        .bind(description)
        .bind(creation_date)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a group and everything under it.
    ///
    /// Data rows first, then devices, then the group row, in one
    /// transaction.
    pub async fn delete_group(&self, group_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("delete_device_group");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM device_data dd
            USING devices d
            WHERE dd.device_id = d.id AND d.group_id = $1
            "#,
        )
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM devices WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM device_groups WHERE id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(())
    }
}
