//! Account endpoints: signup, login, logout, password management and
//! the password-gated destructive actions.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{OptionalSessionAuth, SessionAuth};
use crate::routes::member_url;
use domain::models::member::{
    ConfirmPasswordRequest, LoginRequest, PasswordChangeRequest, PasswordResetConfirmRequest,
    PasswordResetRequest, SignupRequest,
};
use domain::models::Member;

/// Member fields exposed by account endpoints.
#[derive(Debug, Serialize)]
pub struct MemberSummary {
    pub url: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl MemberSummary {
    fn from_member(member: &Member, base: &str) -> Self {
        Self {
            url: member_url(base, &member.username),
            username: member.username.clone(),
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
            email: member.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub member: MemberSummary,
}

/// Sends an already-authenticated caller away from an anonymous-only
/// endpoint.
fn redirect_home(state: &AppState) -> Response {
    Redirect::to(&state.config.server.home_redirect).into_response()
}

/// POST /api/v1/accounts/signup
///
/// Anonymous-only: logged-in callers are redirected home.
pub async fn signup(
    State(state): State<AppState>,
    OptionalSessionAuth(auth): OptionalSessionAuth,
    Json(req): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    if auth.is_some() {
        return Ok(redirect_home(&state));
    }

    let member = state.auth_service().signup(req).await?;
    let summary = MemberSummary::from_member(&member, &state.config.server.app_base_url);
    Ok((StatusCode::CREATED, Json(summary)).into_response())
}

/// POST /api/v1/accounts/login
///
/// Anonymous-only: logged-in callers are redirected home. Returns the
/// session token; this is the only time the token is visible.
pub async fn login(
    State(state): State<AppState>,
    OptionalSessionAuth(auth): OptionalSessionAuth,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if auth.is_some() {
        return Ok(redirect_home(&state));
    }

    let outcome = state.auth_service().login(req).await?;
    let response = LoginResponse {
        member: MemberSummary::from_member(&outcome.member, &state.config.server.app_base_url),
        token: outcome.token,
    };
    Ok(Json(response).into_response())
}

/// POST /api/v1/accounts/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: SessionAuth,
) -> Result<StatusCode, ApiError> {
    state.auth_service().logout(&auth.token_hash).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/accounts/password/change
pub async fn change_password(
    State(state): State<AppState>,
    auth: SessionAuth,
    Json(req): Json<PasswordChangeRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .auth_service()
        .change_password(&auth.member, &auth.token_hash, req)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/accounts/password/reset
///
/// Anonymous-only: logged-in callers are redirected home. Always
/// succeeds, whether or not the address is registered.
pub async fn start_password_reset(
    State(state): State<AppState>,
    OptionalSessionAuth(auth): OptionalSessionAuth,
    Json(req): Json<PasswordResetRequest>,
) -> Result<Response, ApiError> {
    if auth.is_some() {
        return Ok(redirect_home(&state));
    }

    state.auth_service().start_password_reset(req).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// POST /api/v1/accounts/password/reset/confirm
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetConfirmRequest>,
) -> Result<StatusCode, ApiError> {
    state.auth_service().confirm_password_reset(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/accounts/deactivate
///
/// Password-gated. The account is retained but can no longer log in;
/// every open session ends.
pub async fn deactivate(
    State(state): State<AppState>,
    auth: SessionAuth,
    Json(req): Json<ConfirmPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .auth_service()
        .deactivate(&auth.member, &req.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/accounts/delete
///
/// Password-gated. Permanently removes the account and everything it
/// transitively owns.
pub async fn delete_account(
    State(state): State<AppState>,
    auth: SessionAuth,
    Json(req): Json<ConfirmPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .auth_service()
        .delete_account(&auth.member, &req.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
