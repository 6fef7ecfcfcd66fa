//! Device group entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the device_groups table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceGroupEntity {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
    pub owner_id: Uuid,
}
