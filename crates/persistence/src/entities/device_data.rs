//! Device data entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the device_data table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceDataEntity {
    pub id: i64,
    pub message: serde_json::Value,
    pub date: DateTime<Utc>,
    pub device_id: Uuid,
}
