//! Password reset token entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the password_reset_tokens table.
///
/// Tokens are single use and stored as SHA-256 hashes.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetTokenEntity {
    pub id: Uuid,
    pub member_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
