//! Member detail endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::SessionAuth;
use crate::routes::{authorize, group_url, member_url};

/// Member detail with links to the member's groups.
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub url: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub device_groups: Vec<String>,
}

/// GET /api/v1/members/:username
pub async fn get_member(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path(username): Path<String>,
) -> Result<Json<MemberResponse>, ApiError> {
    authorize(&auth, &username)?;

    let base = &state.config.server.app_base_url;
    let groups = state
        .group_repository()
        .find_by_owner(auth.member.id)
        .await?;

    Ok(Json(MemberResponse {
        url: member_url(base, &auth.member.username),
        username: auth.member.username.clone(),
        first_name: auth.member.first_name.clone(),
        last_name: auth.member.last_name.clone(),
        email: auth.member.email.clone(),
        device_groups: groups
            .iter()
            .map(|g| group_url(base, &auth.member.username, &g.name))
            .collect(),
    }))
}
