//! Device UID generation.
//!
//! A device's public identifier is a version-5 UUID computed from the
//! `{owner_username}-{group_name}-{device_name}` tuple against the X.500
//! namespace. The UID is computed once at device creation and is never
//! recomputed when the owner, group or device name changes later; it is a
//! stable identity, not a derived attribute.

use uuid::Uuid;

/// Computes the UID for a device from its ownership tuple.
///
/// Deterministic: identical inputs always produce the same UID, and any
/// change to one of the three components produces a different UID.
pub fn generate_device_uid(owner_username: &str, group_name: &str, device_name: &str) -> Uuid {
    let unique_name = format!("{}-{}-{}", owner_username, group_name, device_name);
    Uuid::new_v5(&Uuid::NAMESPACE_X500, unique_name.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_is_deterministic() {
        let a = generate_device_uid("first_member", "g1", "d1");
        let b = generate_device_uid("first_member", "g1", "d1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_uid_changes_with_any_component() {
        let base = generate_device_uid("first_member", "g1", "d1");
        assert_ne!(base, generate_device_uid("second_member", "g1", "d1"));
        assert_ne!(base, generate_device_uid("first_member", "g2", "d1"));
        assert_ne!(base, generate_device_uid("first_member", "g1", "d2"));
    }

    #[test]
    fn test_uid_is_version_5() {
        let uid = generate_device_uid("member", "group", "device");
        assert_eq!(uid.get_version_num(), 5);
    }

    #[test]
    fn test_uid_matches_x500_namespace_hash() {
        // The UID is exactly uuid5(NAMESPACE_X500, joined tuple)
        let uid = generate_device_uid("u", "g", "d");
        assert_eq!(uid, Uuid::new_v5(&Uuid::NAMESPACE_X500, b"u-g-d"));
    }

    #[test]
    fn test_uid_no_collisions_in_corpus() {
        let mut seen = std::collections::HashSet::new();
        for user in ["alice", "bob", "carol"] {
            for group in ["home", "office", "lab"] {
                for device in ["cam", "sensor", "robot"] {
                    assert!(seen.insert(generate_device_uid(user, group, device)));
                }
            }
        }
        assert_eq!(seen.len(), 27);
    }
}
