//! Session token authentication extractor.
//!
//! Provides an Axum extractor for resolving Bearer session tokens from
//! requests. Tokens are opaque; only their SHA-256 hash is stored, so
//! resolution hashes the presented token and looks the hash up.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::Member;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated member resolved from a session token.
///
/// Validates the Bearer token in the Authorization header against the
/// sessions table. Expired sessions and sessions of deactivated members
/// both reject as unauthenticated.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    /// The member who holds the session.
    pub member: Member,
    /// Hash of the presented token, for session-scoped operations
    /// (logout, keep-this-session-alive after a password change).
    pub token_hash: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

#[async_trait]
impl FromRequestParts<AppState> for SessionAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::NotAuthenticated)?;

        let token_hash = shared::crypto::sha256_hex(token);
        let member = state
            .session_repository()
            .find_member_by_token_hash(&token_hash)
            .await?
            .ok_or(ApiError::NotAuthenticated)?;

        Ok(SessionAuth {
            member: member.into(),
            token_hash,
        })
    }
}

/// Optional session authentication.
///
/// Used by anonymous-only endpoints (signup, login, password reset) to
/// detect already-authenticated callers without rejecting anonymous ones.
/// An invalid or expired token counts as anonymous.
#[derive(Debug, Clone)]
pub struct OptionalSessionAuth(pub Option<SessionAuth>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalSessionAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(OptionalSessionAuth(None));
        };

        let token_hash = shared::crypto::sha256_hex(token);
        let member = state
            .session_repository()
            .find_member_by_token_hash(&token_hash)
            .await?;

        Ok(OptionalSessionAuth(member.map(|m| SessionAuth {
            member: m.into(),
            token_hash,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(v) = value {
            builder = builder.header("Authorization", v);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with_header(Some("Bearer drs_abc123"));
        assert_eq!(bearer_token(&parts), Some("drs_abc123"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let parts = parts_with_header(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let parts = parts_with_header(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_optional_auth_none() {
        let auth = OptionalSessionAuth(None);
        assert!(auth.0.is_none());
    }
}
