//! Permission-map invariants for the authorization decision core.

use uuid::Uuid;

use istudio_core::authz::{
    DecisionReason, Permission, Principal, Role, evaluate, has_permission, permissions_for_role,
};

const ALL_PERMISSIONS: [Permission; 4] = [
    Permission::Read,
    Permission::Write,
    Permission::Delete,
    Permission::Admin,
];

#[test]
fn test_unmapped_roles_get_read_only() {
    for role in ["superuser", "moderator", "Administrator", "", "ADMINX"] {
        for permission in ALL_PERMISSIONS {
            let expected = permission == Permission::Read;
            assert_eq!(
                has_permission(role, permission),
                expected,
                "role {role:?} permission {permission}"
            );
        }
    }
}

#[test]
fn test_mapped_pairs_equal_set_membership() {
    let cases = [
        ("admin", vec![true, true, true, true]),
        ("editor", vec![true, true, true, false]),
        ("user", vec![true, true, false, false]),
        ("guest", vec![true, false, false, false]),
    ];

    for (role, expected) in cases {
        for (permission, expected) in ALL_PERMISSIONS.iter().zip(expected) {
            assert_eq!(
                has_permission(role, *permission),
                expected,
                "role {role:?} permission {permission}"
            );
        }
    }
}

#[test]
fn test_role_lookup_is_case_insensitive() {
    assert!(has_permission("EDITOR", Permission::Delete));
    assert!(has_permission("Admin", Permission::Admin));
    assert!(!has_permission("GUEST", Permission::Write));
}

#[test]
fn test_every_role_has_a_non_empty_permission_set() {
    for role in [Role::Admin, Role::Editor, Role::User, Role::Guest] {
        assert!(!role.permissions().is_empty(), "role {role}");
    }
    assert!(!permissions_for_role("anything-else").is_empty());
}

#[test]
fn test_decision_ordering_no_session_first() {
    let decision = evaluate(None, true, Some(Permission::Admin));
    assert_eq!(decision.reason, DecisionReason::NoSession);
}

#[test]
fn test_decision_for_guest_write_and_admin_write() {
    let guest = Principal::new(Uuid::new_v4(), "guest");
    let decision = evaluate(Some(&guest), false, Some(Permission::Write));
    assert!(!decision.allowed);
    assert_eq!(decision.reason, DecisionReason::InsufficientPermission);

    let admin = Principal::new(Uuid::new_v4(), "admin");
    let decision = evaluate(Some(&admin), false, Some(Permission::Write));
    assert!(decision.allowed);
    assert_eq!(decision.reason, DecisionReason::Ok);
}

#[test]
fn test_override_applies_to_evaluation() {
    let limited = Principal::new(Uuid::new_v4(), "admin").with_override([Permission::Read]);
    // Still passes the role gate...
    assert!(evaluate(Some(&limited), true, None).allowed);
    // ...but the override set governs permission checks.
    let decision = evaluate(Some(&limited), false, Some(Permission::Write));
    assert_eq!(decision.reason, DecisionReason::InsufficientPermission);
}
