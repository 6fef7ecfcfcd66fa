//! Device group CRUD endpoints.
//!
//! All routes live under /api/v1/members/:username/groups and are only
//! reachable by the member named in the path. Group names are stored
//! lower-cased and are unique per owner, case-insensitively; two members
//! may each own a group of the same name.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::SessionAuth;
use crate::routes::{
    authorize, check_not_future, device_url, group_url, member_url, resolve_group,
};
use domain::models::device_group::{GroupRequest, UNIQUE_NAME_CODE, UNIQUE_NAME_MESSAGE};
use persistence::entities::DeviceGroupEntity;

/// Device group with links to its owner and devices.
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub url: String,
    pub name: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
    pub owner: String,
    pub devices: Vec<String>,
}

async fn group_response(
    state: &AppState,
    username: &str,
    group: DeviceGroupEntity,
) -> Result<GroupResponse, ApiError> {
    let base = &state.config.server.app_base_url;
    let devices = state.device_repository().find_by_group(group.id).await?;

    Ok(GroupResponse {
        url: group_url(base, username, &group.name),
        owner: member_url(base, username),
        devices: devices
            .iter()
            .map(|d| device_url(base, username, &group.name, &d.uid))
            .collect(),
        name: group.name,
        description: group.description,
        creation_date: group.creation_date,
    })
}

/// GET /api/v1/members/:username/groups
pub async fn list_groups(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path(username): Path<String>,
) -> Result<Json<Vec<GroupResponse>>, ApiError> {
    authorize(&auth, &username)?;

    let groups = state
        .group_repository()
        .find_by_owner(auth.member.id)
        .await?;

    let mut responses = Vec::with_capacity(groups.len());
    for group in groups {
        responses.push(group_response(&state, &username, group).await?);
    }
    Ok(Json(responses))
}

/// POST /api/v1/members/:username/groups
pub async fn create_group(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path(username): Path<String>,
    Json(req): Json<GroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), ApiError> {
    authorize(&auth, &username)?;
    req.validate()?;
    check_not_future("creation_date", req.creation_date)?;

    let name = req.normalized_name();
    if state
        .group_repository()
        .name_exists_for_owner(auth.member.id, &name)
        .await?
    {
        return Err(ApiError::field("name", UNIQUE_NAME_CODE, UNIQUE_NAME_MESSAGE));
    }

    let group = state
        .group_repository()
        .create_group(auth.member.id, &name, &req.description, req.creation_date)
        .await?;

    tracing::info!(owner = %username, group = %group.name, "Device group created");
    Ok((
        StatusCode::CREATED,
        Json(group_response(&state, &username, group).await?),
    ))
}

/// GET /api/v1/members/:username/groups/:group_name
pub async fn get_group(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name)): Path<(String, String)>,
) -> Result<Json<GroupResponse>, ApiError> {
    authorize(&auth, &username)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;
    Ok(Json(group_response(&state, &username, group).await?))
}

/// PUT /api/v1/members/:username/groups/:group_name
///
/// A name equal to the stored one counts as unchanged and skips the
/// uniqueness check, so a no-op update of an existing group succeeds.
pub async fn update_group(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name)): Path<(String, String)>,
    Json(req): Json<GroupRequest>,
) -> Result<Json<GroupResponse>, ApiError> {
    authorize(&auth, &username)?;
    req.validate()?;
    check_not_future("creation_date", req.creation_date)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;

    let name = req.normalized_name();
    if name != group.name
        && state
            .group_repository()
            .name_exists_for_owner(auth.member.id, &name)
            .await?
    {
        return Err(ApiError::field("name", UNIQUE_NAME_CODE, UNIQUE_NAME_MESSAGE));
    }

    let updated = state
        .group_repository()
        .update_group(group.id, &name, &req.description, req.creation_date)
        .await?;

    Ok(Json(group_response(&state, &username, updated).await?))
}

/// DELETE /api/v1/members/:username/groups/:group_name
///
/// Removes the group, its devices and their data.
pub async fn delete_group(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    authorize(&auth, &username)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;
    state.group_repository().delete_group(group.id).await?;

    tracing::info!(owner = %username, group = %group.name, "Device group deleted");
    Ok(StatusCode::NO_CONTENT)
}
