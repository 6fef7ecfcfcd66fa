//! Route handler modules.

pub mod accounts;
pub mod device_data;
pub mod devices;
pub mod groups;
pub mod health;
pub mod members;

use persistence::entities::{DeviceEntity, DeviceGroupEntity};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::SessionAuth;

/// Rejects requests whose path names a member other than the
/// authenticated one.
///
/// Ownership is checked before existence, so probing another member's
/// URLs yields 403 whether or not the resources exist.
pub(crate) fn authorize(auth: &SessionAuth, username: &str) -> Result<(), ApiError> {
    if auth.member.username != username {
        return Err(ApiError::PermissionDenied);
    }
    Ok(())
}

/// Resolves a group by owner and name, or 404.
pub(crate) async fn resolve_group(
    state: &AppState,
    owner_id: Uuid,
    group_name: &str,
) -> Result<DeviceGroupEntity, ApiError> {
    state
        .group_repository()
        .find_by_owner_and_name(owner_id, group_name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device group not found".into()))
}

/// Resolves a device by group and UID, or 404.
///
/// A UID that is not a UUID at all resolves the same as an unknown one.
pub(crate) async fn resolve_device(
    state: &AppState,
    group_id: Uuid,
    uid: &str,
) -> Result<DeviceEntity, ApiError> {
    let uid: Uuid = uid
        .parse()
        .map_err(|_| ApiError::NotFound("Device not found".into()))?;

    state
        .device_repository()
        .find_by_group_and_uid(group_id, uid)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device not found".into()))
}

/// Rejects an optional user-supplied timestamp lying in the future.
pub(crate) fn check_not_future(
    field: &str,
    date: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<(), ApiError> {
    if let Some(d) = date {
        if let Err(e) = shared::validation::validate_not_future(&d) {
            return Err(ApiError::field(
                field,
                e.code.to_string(),
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Date cannot be in the future".to_string()),
            ));
        }
    }
    Ok(())
}

/// Canonical URL of a member resource.
pub(crate) fn member_url(base: &str, username: &str) -> String {
    format!("{base}/api/v1/members/{username}")
}

/// Canonical URL of a member's group list.
pub(crate) fn group_list_url(base: &str, username: &str) -> String {
    format!("{base}/api/v1/members/{username}/groups")
}

/// Canonical URL of one device group.
pub(crate) fn group_url(base: &str, username: &str, group_name: &str) -> String {
    format!("{base}/api/v1/members/{username}/groups/{group_name}")
}

/// Canonical URL of one device.
pub(crate) fn device_url(base: &str, username: &str, group_name: &str, uid: &Uuid) -> String {
    format!("{base}/api/v1/members/{username}/groups/{group_name}/devices/{uid}")
}

/// Canonical URL of one device's data history.
pub(crate) fn data_list_url(base: &str, username: &str, group_name: &str, uid: &Uuid) -> String {
    format!("{base}/api/v1/members/{username}/groups/{group_name}/devices/{uid}/data")
}

/// Canonical URL of one data row.
pub(crate) fn data_url(
    base: &str,
    username: &str,
    group_name: &str,
    uid: &Uuid,
    data_id: i64,
) -> String {
    format!("{base}/api/v1/members/{username}/groups/{group_name}/devices/{uid}/data/{data_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_builders_compose() {
        let base = "http://localhost:8080";
        let uid = Uuid::nil();
        assert_eq!(
            member_url(base, "alice"),
            "http://localhost:8080/api/v1/members/alice"
        );
        assert_eq!(
            group_url(base, "alice", "home"),
            "http://localhost:8080/api/v1/members/alice/groups/home"
        );
        assert!(device_url(base, "alice", "home", &uid).ends_with(&format!("/devices/{uid}")));
        assert!(data_url(base, "alice", "home", &uid, 7).ends_with("/data/7"));
    }
}
