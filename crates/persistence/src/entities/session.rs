//! Session entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the sessions table.
///
/// Only the SHA-256 hash of the opaque session token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct SessionEntity {
    pub id: Uuid,
    pub member_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
