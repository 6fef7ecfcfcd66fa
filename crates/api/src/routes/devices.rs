//! Device CRUD endpoints.
//!
//! Routes live under .../groups/:group_name/devices. Device names are
//! stored lower-cased and are unique across ALL devices transitively
//! owned by the same member, not just within one group. The public UID
//! is derived once at registration and survives renames and moves.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::SessionAuth;
use crate::routes::{
    authorize, check_not_future, device_url, group_url, resolve_device, resolve_group,
};
use domain::models::device::{
    CreateDeviceRequest, UpdateDeviceRequest, UNIQUE_NAME_CODE, UNIQUE_NAME_MESSAGE,
};
use domain::uid::generate_device_uid;
use persistence::entities::DeviceEntity;

/// Device with a link back to its group.
#[derive(Debug, Serialize)]
pub struct DeviceResponse {
    pub url: String,
    pub uid: Uuid,
    pub name: String,
    pub is_active: bool,
    pub date_added: DateTime<Utc>,
    pub group: String,
}

fn device_response(
    state: &AppState,
    username: &str,
    group_name: &str,
    device: DeviceEntity,
) -> DeviceResponse {
    let base = &state.config.server.app_base_url;
    DeviceResponse {
        url: device_url(base, username, group_name, &device.uid),
        group: group_url(base, username, group_name),
        uid: device.uid,
        name: device.name,
        is_active: device.is_active,
        date_added: device.date_added,
    }
}

/// GET /api/v1/members/:username/groups/:group_name/devices
pub async fn list_devices(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name)): Path<(String, String)>,
) -> Result<Json<Vec<DeviceResponse>>, ApiError> {
    authorize(&auth, &username)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;
    let devices = state.device_repository().find_by_group(group.id).await?;

    Ok(Json(
        devices
            .into_iter()
            .map(|d| device_response(&state, &username, &group.name, d))
            .collect(),
    ))
}

/// POST /api/v1/members/:username/groups/:group_name/devices
///
/// The UID is derived from owner, group and device name at this moment
/// and stored; later renames or moves never change it.
pub async fn create_device(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name)): Path<(String, String)>,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<(StatusCode, Json<DeviceResponse>), ApiError> {
    authorize(&auth, &username)?;
    req.validate()?;
    check_not_future("date_added", req.date_added)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;

    let name = req.normalized_name();
    if state
        .device_repository()
        .name_exists_for_member(auth.member.id, &name)
        .await?
    {
        return Err(ApiError::field("name", UNIQUE_NAME_CODE, UNIQUE_NAME_MESSAGE));
    }

    let uid = generate_device_uid(&auth.member.username, &group.name, &name);
    let device = state
        .device_repository()
        .create_device(group.id, uid, &name, req.date_added)
        .await?;

    tracing::info!(owner = %username, group = %group.name, device = %device.name, uid = %device.uid, "Device registered");
    Ok((
        StatusCode::CREATED,
        Json(device_response(&state, &username, &group.name, device)),
    ))
}

/// GET /api/v1/members/:username/groups/:group_name/devices/:uid
pub async fn get_device(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name, uid)): Path<(String, String, String)>,
) -> Result<Json<DeviceResponse>, ApiError> {
    authorize(&auth, &username)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;
    let device = resolve_device(&state, group.id, &uid).await?;

    Ok(Json(device_response(&state, &username, &group.name, device)))
}

/// PUT /api/v1/members/:username/groups/:group_name/devices/:uid
///
/// Renames, activates/deactivates, and optionally moves the device into
/// another group of the same owner. The UID stays as registered.
pub async fn update_device(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name, uid)): Path<(String, String, String)>,
    Json(req): Json<UpdateDeviceRequest>,
) -> Result<Json<DeviceResponse>, ApiError> {
    authorize(&auth, &username)?;
    req.validate()?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;
    let device = resolve_device(&state, group.id, &uid).await?;

    let name = req.normalized_name();
    if name != device.name
        && state
            .device_repository()
            .name_exists_for_member(auth.member.id, &name)
            .await?
    {
        return Err(ApiError::field("name", UNIQUE_NAME_CODE, UNIQUE_NAME_MESSAGE));
    }

    // Moving only ever targets another group of the same owner; a group
    // name that does not resolve under this owner is a 404.
    let target_group = match &req.group {
        Some(target_name) => resolve_group(&state, auth.member.id, target_name).await?,
        None => group,
    };

    let is_active = req.is_active.unwrap_or(device.is_active);
    let updated = state
        .device_repository()
        .update_device(device.id, &name, target_group.id, is_active)
        .await?;

    Ok(Json(device_response(
        &state,
        &username,
        &target_group.name,
        updated,
    )))
}

/// DELETE /api/v1/members/:username/groups/:group_name/devices/:uid
///
/// Removes the device and its data rows.
pub async fn delete_device(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name, uid)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    authorize(&auth, &username)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;
    let device = resolve_device(&state, group.id, &uid).await?;
    state.device_repository().delete_device(device.id).await?;

    tracing::info!(owner = %username, group = %group.name, device = %device.name, "Device deleted");
    Ok(StatusCode::NO_CONTENT)
}
