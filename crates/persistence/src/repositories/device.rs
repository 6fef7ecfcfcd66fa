//! Device repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::DeviceEntity;
use crate::metrics::QueryTimer;

const DEVICE_COLUMNS: &str = "id, uid, name, is_active, date_added, group_id";

/// Repository for device database operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new device in a group.
    ///
    /// The UID was computed by the caller at creation time and is stored
    /// verbatim; it is never derived again.
    pub async fn create_device(
        &self,
        group_id: Uuid,
        uid: Uuid,
        name: &str,
        date_added: Option<DateTime<Utc>>,
    ) -> Result<DeviceEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_device");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            INSERT INTO devices (group_id, uid, name, date_added)
            VALUES ($1, $2, $3, COALESCE($4, NOW()))
            RETURNING {DEVICE_COLUMNS}
            "#,
        ))
        .bind(group_id)
        .bind(uid)
        .bind(name)
        .bind(date_added)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the devices in one group, oldest first.
    pub async fn find_by_group(&self, group_id: Uuid) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_devices_by_group");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            SELECT {DEVICE_COLUMNS}
            FROM devices
            WHERE group_id = $1
            ORDER BY date_added, name
            "#,
        ))
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a device by UID within one group.
    ///
    /// The group was itself resolved through its owner, so a hit here proves
    /// the whole member -> group -> device chain.
    pub async fn find_by_group_and_uid(
        &self,
        group_id: Uuid,
        uid: Uuid,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_device_by_group_and_uid");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            SELECT {DEVICE_COLUMNS}
            FROM devices
            WHERE group_id = $1 AND uid = $2
            "#,
        ))
        .bind(group_id)
        .bind(uid)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether a member already owns a device with this name,
    /// in any of the member's groups.
    ///
    /// Device names are scoped to the member as a whole, not to one group,
    /// so the check joins through device_groups. Names are stored
    /// lower-cased.
    pub async fn name_exists_for_member(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("device_name_exists_for_member");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM devices d
                JOIN device_groups g ON d.group_id = g.id
                WHERE g.owner_id = $1 AND d.name = LOWER($2)
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

    /// Update a device's name, group and active flag.
    ///
    /// Moving between groups is only ever called with a target group of the
    /// same owner; the UID column is deliberately not touched.
    pub async fn update_device(
        &self,
        device_id: Uuid,
        name: &str,
        group_id: Uuid,
        is_active: bool,
    ) -> Result<DeviceEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_device");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            UPDATE devices
            SET name = $2, group_id = $3, is_active = $4
            WHERE id = $1
            RETURNING {DEVICE_COLUMNS}
            "#,
        ))
        .bind(device_id)
        .bind(name)
        .bind(group_id)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a device and its data rows, leaf first, in one transaction.
    pub async fn delete_device(&self, device_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("delete_device");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM device_data WHERE device_id = $1")
            .bind(device_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(device_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(())
    }
}
