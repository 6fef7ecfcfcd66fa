//! Member entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the members table.
#[derive(Debug, Clone, FromRow)]
pub struct MemberEntity {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<MemberEntity> for domain::models::Member {
    fn from(entity: MemberEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            password_hash: entity.password_hash,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            is_active: entity.is_active,
            date_joined: entity.date_joined,
        }
    }
}
