//! Device data repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::device_data::default_update_datetime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::DeviceDataEntity;
use crate::metrics::QueryTimer;

const DATA_COLUMNS: &str = "id, message, date, device_id";

/// Repository for device-data database operations.
#[derive(Clone)]
pub struct DeviceDataRepository {
    pool: PgPool,
}

impl DeviceDataRepository {
    /// Creates a new DeviceDataRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach a new data row to a device.
    ///
    /// A `None` date stores the "never updated" sentinel.
    pub async fn create_data(
        &self,
        device_id: Uuid,
        message: &serde_json::Value,
        date: Option<DateTime<Utc>>,
    ) -> Result<DeviceDataEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_device_data");
        let result = sqlx::query_as::<_, DeviceDataEntity>(&format!(
            r#"
            INSERT INTO device_data (device_id, message, date)
            VALUES ($1, $2, $3)
            RETURNING {DATA_COLUMNS}
            "#,
        ))
        .bind(device_id)
        .bind(message)
        .bind(date.unwrap_or_else(default_update_datetime))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find one data row belonging to a device.
    pub async fn find_by_device_and_id(
        &self,
        device_id: Uuid,
        data_id: i64,
    ) -> Result<Option<DeviceDataEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_device_data_by_id");
        let result = sqlx::query_as::<_, DeviceDataEntity>(&format!(
            r#"
            SELECT {DATA_COLUMNS}
            FROM device_data
            WHERE device_id = $1 AND id = $2
            "#,
        ))
        .bind(device_id)
        .bind(data_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Page through a device's data history, most recent first.
    ///
    /// `after` is the `(date, id)` position of the last row of the previous
    /// page; rows strictly before it in `(date DESC, id DESC)` order are
    /// returned. Fetches `limit + 1` rows so the caller can tell whether a
    /// further page exists.
    pub async fn find_history(
        &self,
        device_id: Uuid,
        after: Option<(DateTime<Utc>, i64)>,
        limit: i64,
    ) -> Result<Vec<DeviceDataEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_device_data_history");

        let result = if let Some((date, id)) = after {
            sqlx::query_as::<_, DeviceDataEntity>(&format!(
                r#"
                SELECT {DATA_COLUMNS}
                FROM device_data
                WHERE device_id = $1 AND (date, id) < ($2, $3)
                ORDER BY date DESC, id DESC
                LIMIT $4
                "#,
            ))
            .bind(device_id)
            .bind(date)
            .bind(id)
            .bind(limit + 1)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, DeviceDataEntity>(&format!(
                r#"
                SELECT {DATA_COLUMNS}
                FROM device_data
                WHERE device_id = $1
                ORDER BY date DESC, id DESC
                LIMIT $2
                "#,
            ))
            .bind(device_id)
            .bind(limit + 1)
            .fetch_all(&self.pool)
            .await
        };

        timer.record();
        result
    }

    /// Count the data rows attached to a device.
    pub async fn count_for_device(&self, device_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_device_data");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM device_data WHERE device_id = $1")
                .bind(device_id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Replace a data row's payload and date. The row id never changes;
    /// a `None` date resets the row to the "never updated" sentinel.
    pub async fn update_data(
        &self,
        data_id: i64,
        message: &serde_json::Value,
        date: Option<DateTime<Utc>>,
    ) -> Result<DeviceDataEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_device_data");
        let result = sqlx::query_as::<_, DeviceDataEntity>(&format!(
            r#"
            UPDATE device_data
            SET message = $2, date = $3
            WHERE id = $1
            RETURNING {DATA_COLUMNS}
            "#,
        ))
        .bind(data_id)
        .bind(message)
        .bind(date.unwrap_or_else(default_update_datetime))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete one data row.
    pub async fn delete_data(&self, data_id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_device_data");
        let result = sqlx::query("DELETE FROM device_data WHERE id = $1")
            .bind(data_id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }
}
