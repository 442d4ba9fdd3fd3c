// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use innkeep::CoreError;
use innkeep_domain::DomainError;
use innkeep_persistence::PersistenceError;
use time::macros::date;

use crate::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};

#[test]
fn test_parse_failures_become_invalid_input() {
    let err = translate_domain_error(DomainError::InvalidPaymentMethod {
        method: String::from("cheque"),
    });
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "method"));

    let err = translate_domain_error(DomainError::InvalidStayDates {
        check_in: date!(2026 - 04 - 13),
        check_out: date!(2026 - 04 - 10),
    });
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "check_out_date"));
    assert_eq!(err.code(), "invalid_input");

    let err = translate_domain_error(DomainError::AmountOverflow);
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "amount_cents"));
}

#[test]
fn test_rule_violations_keep_rule_name_as_code() {
    let err = translate_domain_error(DomainError::NoAvailability {
        room_id: 3,
        room_name: String::from("Suite"),
    });

    assert_eq!(err.code(), "no_availability");
    match err {
        ApiError::DomainRuleViolation { message, .. } => assert!(message.contains("Suite")),
        other => panic!("unexpected {other:?}"),
    }

    let err = translate_domain_error(DomainError::NoShowTooEarly {
        check_in: date!(2026 - 04 - 10),
        today: date!(2026 - 04 - 10),
    });
    assert_eq!(err.code(), "no_show_too_early");
}

#[test]
fn test_core_errors() {
    let err = translate_core_error(CoreError::DomainViolation(DomainError::PaymentRequired {
        payment_status: String::from("partial"),
    }));
    assert_eq!(err.code(), "payment_required");

    let err = translate_core_error(CoreError::MissingContext("assigned room"));
    assert!(matches!(err, ApiError::Internal { ref message } if message.contains("assigned room")));
}

#[test]
fn test_missing_rows_become_not_found() {
    let err = translate_persistence_error(PersistenceError::BookingNotFound(9));
    assert_eq!(
        err,
        ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: String::from("Booking 9 does not exist"),
        }
    );
    assert_eq!(
        translate_persistence_error(PersistenceError::RoomNotFound(4)).code(),
        "not_found"
    );
}

#[test]
fn test_lost_races_become_conflicts() {
    let err = translate_persistence_error(PersistenceError::ConcurrentModification {
        entity: String::from("booking"),
        id: 12,
    });
    assert!(matches!(err, ApiError::Conflict { ref message } if message.contains("reload")));

    let err = translate_persistence_error(PersistenceError::InventoryExhausted { room_id: 2 });
    assert_eq!(err.code(), "conflict");

    let err = translate_persistence_error(PersistenceError::InventoryAtCapacity { room_id: 2 });
    assert!(matches!(err, ApiError::Conflict { ref message } if message.contains("Room type 2")));
}

#[test]
fn test_database_failures_are_internal() {
    let err = translate_persistence_error(PersistenceError::QueryFailed(String::from("disk I/O")));

    assert_eq!(err.code(), "internal");
}
