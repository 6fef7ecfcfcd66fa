//! Device entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: Uuid,
    pub uid: Uuid,
    pub name: String,
    pub is_active: bool,
    pub date_added: DateTime<Utc>,
    pub group_id: Uuid,
}
