//! Device data endpoints: JSON payload ingestion and history.
//!
//! The history listing is cursor-paginated, most recent first, ordered
//! by `(date DESC, id DESC)` so rows sharing the "never updated"
//! sentinel date still page deterministically.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::SessionAuth;
use crate::routes::{
    authorize, check_not_future, data_list_url, data_url, device_url, resolve_device,
    resolve_group,
};
use domain::ingest::{normalize_message, INVALID_JSON_CODE, INVALID_JSON_MESSAGE};
use domain::models::device_data::DeviceDataRequest;
use persistence::entities::DeviceDataEntity;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// One data row with links to itself and its device.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub id: i64,
    pub url: String,
    pub message: Value,
    pub date: DateTime<Utc>,
    pub device: String,
}

/// A page of a device's data history.
#[derive(Debug, Serialize)]
pub struct DataPageResponse {
    pub count: i64,
    pub next: Option<String>,
    pub results: Vec<DataResponse>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub cursor: Option<String>,
    pub page_size: Option<i64>,
}

fn data_response(
    state: &AppState,
    username: &str,
    group_name: &str,
    device_uid: &Uuid,
    data: DeviceDataEntity,
) -> DataResponse {
    let base = &state.config.server.app_base_url;
    DataResponse {
        url: data_url(base, username, group_name, device_uid, data.id),
        device: device_url(base, username, group_name, device_uid),
        id: data.id,
        message: data.message,
        date: data.date,
    }
}

/// Validates the inbound message and maps rejections to the
/// `invalid_json` field error.
fn accept_message(message: Value) -> Result<Value, ApiError> {
    normalize_message(message)
        .map_err(|_| ApiError::field("message", INVALID_JSON_CODE, INVALID_JSON_MESSAGE))
}

/// GET /api/v1/members/:username/groups/:group_name/devices/:uid/data
pub async fn list_data(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name, uid)): Path<(String, String, String)>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<DataPageResponse>, ApiError> {
    authorize(&auth, &username)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;
    let device = resolve_device(&state, group.id, &uid).await?;

    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let after = match &query.cursor {
        Some(cursor) => Some(
            shared::pagination::decode_cursor(cursor)
                .map_err(|_| ApiError::field("cursor", "invalid", "Invalid cursor."))?,
        ),
        None => None,
    };

    let mut rows = state
        .data_repository()
        .find_history(device.id, after, page_size)
        .await?;

    let has_more = rows.len() as i64 > page_size;
    rows.truncate(page_size as usize);

    let next = if has_more {
        rows.last().map(|last| {
            format!(
                "{}?cursor={}",
                data_list_url(
                    &state.config.server.app_base_url,
                    &username,
                    &group.name,
                    &device.uid
                ),
                shared::pagination::encode_cursor(last.date, last.id)
            )
        })
    } else {
        None
    };

    let count = state.data_repository().count_for_device(device.id).await?;

    Ok(Json(DataPageResponse {
        count,
        next,
        results: rows
            .into_iter()
            .map(|d| data_response(&state, &username, &group.name, &device.uid, d))
            .collect(),
    }))
}

/// POST /api/v1/members/:username/groups/:group_name/devices/:uid/data
///
/// An omitted `date` stores the "never updated" sentinel, not the
/// arrival time.
pub async fn create_data(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name, uid)): Path<(String, String, String)>,
    Json(req): Json<DeviceDataRequest>,
) -> Result<(StatusCode, Json<DataResponse>), ApiError> {
    authorize(&auth, &username)?;
    check_not_future("date", req.date)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;
    let device = resolve_device(&state, group.id, &uid).await?;

    let message = accept_message(req.message)?;
    let data = state
        .data_repository()
        .create_data(device.id, &message, req.date)
        .await?;

    tracing::debug!(device = %device.uid, data_id = data.id, "Data row stored");
    Ok((
        StatusCode::CREATED,
        Json(data_response(&state, &username, &group.name, &device.uid, data)),
    ))
}

/// GET /api/v1/members/:username/groups/:group_name/devices/:uid/data/:data_id
pub async fn get_data(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name, uid, data_id)): Path<(String, String, String, i64)>,
) -> Result<Json<DataResponse>, ApiError> {
    authorize(&auth, &username)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;
    let device = resolve_device(&state, group.id, &uid).await?;
    let data = state
        .data_repository()
        .find_by_device_and_id(device.id, data_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device data not found".into()))?;

    Ok(Json(data_response(
        &state,
        &username,
        &group.name,
        &device.uid,
        data,
    )))
}

/// PUT /api/v1/members/:username/groups/:group_name/devices/:uid/data/:data_id
///
/// Replaces the payload. An omitted `date` resets the row to the
/// "never updated" sentinel; the row id never changes.
pub async fn update_data(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name, uid, data_id)): Path<(String, String, String, i64)>,
    Json(req): Json<DeviceDataRequest>,
) -> Result<Json<DataResponse>, ApiError> {
    authorize(&auth, &username)?;
    check_not_future("date", req.date)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;
    let device = resolve_device(&state, group.id, &uid).await?;
    let existing = state
        .data_repository()
        .find_by_device_and_id(device.id, data_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device data not found".into()))?;

    let message = accept_message(req.message)?;
    let data = state
        .data_repository()
        .update_data(existing.id, &message, req.date)
        .await?;

    Ok(Json(data_response(
        &state,
        &username,
        &group.name,
        &device.uid,
        data,
    )))
}

/// DELETE /api/v1/members/:username/groups/:group_name/devices/:uid/data/:data_id
pub async fn delete_data(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((username, group_name, uid, data_id)): Path<(String, String, String, i64)>,
) -> Result<StatusCode, ApiError> {
    authorize(&auth, &username)?;

    let group = resolve_group(&state, auth.member.id, &group_name).await?;
    let device = resolve_device(&state, group.id, &uid).await?;
    let existing = state
        .data_repository()
        .find_by_device_and_id(device.id, data_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device data not found".into()))?;

    state.data_repository().delete_data(existing.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
