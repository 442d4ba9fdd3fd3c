// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_front_desk, create_test_manager};
use crate::{ApiError, AuthError, AuthorizationService, Role, authenticate_actor};

#[test]
fn test_authenticate_trims_id_and_parses_role() {
    let actor = authenticate_actor("  desk-7 ", "Front_Desk").unwrap();

    assert_eq!(actor.id, "desk-7");
    assert_eq!(actor.role, Role::FrontDesk);
}

#[test]
fn test_authenticate_rejects_blank_id() {
    let err = authenticate_actor("   ", "manager").unwrap_err();

    assert!(matches!(err, AuthError::AuthenticationFailed { .. }));
}

#[test]
fn test_authenticate_rejects_unknown_role() {
    let err = authenticate_actor("mgr-1", "owner").unwrap_err();

    assert!(matches!(err, AuthError::AuthenticationFailed { ref reason } if reason.contains("owner")));
}

#[test]
fn test_role_round_trips_through_display() {
    for role in [Role::Manager, Role::FrontDesk] {
        assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
    }
}

#[test]
fn test_audit_actor_carries_role_name() {
    let actor = create_test_front_desk().to_audit_actor();

    assert_eq!(actor.id, "desk-1");
    assert_eq!(actor.role, "front_desk");
}

#[test]
fn test_manager_passes_every_check() {
    let manager = create_test_manager();

    assert!(AuthorizationService::authorize_booking_action(&manager).is_ok());
    assert!(AuthorizationService::authorize_room_status(&manager).is_ok());
    assert!(AuthorizationService::authorize_manage_inventory(&manager).is_ok());
    assert!(AuthorizationService::authorize_reports(&manager).is_ok());
}

#[test]
fn test_front_desk_limited_to_operations() {
    let desk = create_test_front_desk();

    assert!(AuthorizationService::authorize_booking_action(&desk).is_ok());
    assert!(AuthorizationService::authorize_room_status(&desk).is_ok());

    let err = AuthorizationService::authorize_manage_inventory(&desk).unwrap_err();
    assert_eq!(
        err,
        AuthError::Unauthorized {
            action: String::from("manage_inventory"),
            required_role: String::from("manager"),
        }
    );

    let api_err: ApiError = AuthorizationService::authorize_reports(&desk)
        .unwrap_err()
        .into();
    assert_eq!(api_err.code(), "unauthorized");
}
