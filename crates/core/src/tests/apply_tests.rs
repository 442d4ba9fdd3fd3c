// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_checked_in_context, create_test_actor, create_test_booking, create_test_cause,
    create_test_context, create_test_room, create_test_room_type,
};
use crate::{
    BookingCommand, BookingContext, CoreError, InventoryAdjustment, NotificationKind, TentativeLogAction,
    TransitionResult, apply_booking_command,
};
use innkeep_audit::AuditSubject;
use innkeep_domain::{BookingStatus, DomainError, PaymentMethod, PaymentStatus, RoomStatus};
use time::macros::{date, datetime};

fn apply(ctx: &BookingContext, command: BookingCommand) -> Result<TransitionResult, CoreError> {
    apply_booking_command(ctx, command, create_test_actor(), create_test_cause())
}

#[test]
fn test_confirm_holds_inventory_and_notifies() {
    let ctx = create_test_context(create_test_booking(BookingStatus::Pending));

    let result = apply(&ctx, BookingCommand::Confirm).unwrap();

    assert_eq!(result.new_booking.status, BookingStatus::Confirmed);
    assert_eq!(
        result.inventory,
        vec![InventoryAdjustment::Hold { room_id: 1 }]
    );
    let notification = result.notification.unwrap();
    assert_eq!(notification.kind, NotificationKind::BookingConfirmed);
    assert_eq!(notification.guest_email, "mere@example.com");
    assert_eq!(result.new_booking.updated_at, ctx.now);
}

#[test]
fn test_confirm_with_zero_availability_is_rejected() {
    let mut ctx = create_test_context(create_test_booking(BookingStatus::Pending));
    ctx.room_type = create_test_room_type(1, 0);

    let result = apply(&ctx, BookingCommand::Confirm);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::NoAvailability { .. }))
    ));
}

#[test]
fn test_confirm_auto_assigns_candidate_room() {
    let mut ctx = create_test_context(create_test_booking(BookingStatus::Pending));
    ctx.auto_assign_room = Some(create_test_room(3, 1, RoomStatus::Available));

    let result = apply(&ctx, BookingCommand::Confirm).unwrap();

    assert_eq!(result.new_booking.individual_room_id, Some(3));
    assert_eq!(result.auto_assigned_room.unwrap().room_number, "103");
    assert!(result.message.contains("room 103 assigned"));
    assert!(result.room_changes.is_empty());
}

#[test]
fn test_confirm_keeps_existing_assignment() {
    let mut booking = create_test_booking(BookingStatus::Pending);
    booking.individual_room_id = Some(2);
    let mut ctx = create_test_context(booking);
    ctx.auto_assign_room = Some(create_test_room(3, 1, RoomStatus::Available));

    let result = apply(&ctx, BookingCommand::Confirm).unwrap();

    assert_eq!(result.new_booking.individual_room_id, Some(2));
    assert!(result.auto_assigned_room.is_none());
}

#[test]
fn test_mark_tentative_sets_expiry() {
    let ctx = create_test_context(create_test_booking(BookingStatus::Pending));

    let result = apply(&ctx, BookingCommand::MarkTentative).unwrap();

    assert_eq!(result.new_booking.status, BookingStatus::Tentative);
    assert!(result.new_booking.is_tentative());
    assert_eq!(
        result.new_booking.tentative_expires_at,
        Some(datetime!(2026 - 04 - 02 09:00 UTC))
    );
    assert_eq!(
        result.inventory,
        vec![InventoryAdjustment::Hold { room_id: 1 }]
    );
    assert_eq!(
        result.tentative_log.unwrap().action,
        TentativeLogAction::Created
    );
    assert!(result.notification.is_none());
}

#[test]
fn test_mark_tentative_rejected_after_payment() {
    let mut ctx = create_test_context(create_test_booking(BookingStatus::Pending));
    ctx.payment_count = 1;
    ctx.paid_cents = 5_000;

    assert!(matches!(
        apply(&ctx, BookingCommand::MarkTentative),
        Err(CoreError::DomainViolation(
            DomainError::TentativeNotAllowed { .. }
        ))
    ));
}

#[test]
fn test_convert_tentative_does_not_touch_inventory() {
    let ctx = create_test_context(create_test_booking(BookingStatus::Tentative));

    let result = apply(&ctx, BookingCommand::ConvertTentative).unwrap();

    assert_eq!(result.new_booking.status, BookingStatus::Confirmed);
    assert!(result.new_booking.tentative_expires_at.is_none());
    assert!(result.inventory.is_empty());
    assert_eq!(
        result.notification.unwrap().kind,
        NotificationKind::TentativeConverted
    );
}

#[test]
fn test_expire_tentative_restores_inventory() {
    let mut ctx = create_test_context(create_test_booking(BookingStatus::Tentative));
    ctx.now = datetime!(2026 - 04 - 02 10:00 UTC);

    let result = apply(&ctx, BookingCommand::ExpireTentative).unwrap();

    assert_eq!(result.new_booking.status, BookingStatus::Cancelled);
    assert_eq!(
        result.inventory,
        vec![InventoryAdjustment::Release { room_id: 1 }]
    );
    assert_eq!(
        result.tentative_log.unwrap().action,
        TentativeLogAction::Expired
    );
    let cancellation = result.cancellation.unwrap();
    assert!(cancellation.inventory_restored);
    assert_eq!(cancellation.previous_status, BookingStatus::Tentative);
}

#[test]
fn test_expire_tentative_rejected_while_hold_active() {
    let ctx = create_test_context(create_test_booking(BookingStatus::Tentative));

    assert!(matches!(
        apply(&ctx, BookingCommand::ExpireTentative),
        Err(CoreError::DomainViolation(
            DomainError::TentativeHoldActive { .. }
        ))
    ));
}

#[test]
fn test_check_in_occupies_assigned_room() {
    let mut booking = create_test_booking(BookingStatus::Confirmed);
    booking.individual_room_id = Some(7);
    booking.payment_status = PaymentStatus::Paid;
    let mut ctx = create_test_context(booking);
    ctx.assigned_room = Some(create_test_room(7, 1, RoomStatus::Cleaning));
    ctx.today = date!(2026 - 04 - 10);

    let result = apply(&ctx, BookingCommand::CheckIn).unwrap();

    assert_eq!(result.new_booking.status, BookingStatus::CheckedIn);
    assert_eq!(result.room_changes.len(), 1);
    assert_eq!(result.room_changes[0].from, RoomStatus::Cleaning);
    assert_eq!(result.room_changes[0].to, RoomStatus::Occupied);
    assert!(result.inventory.is_empty());
}

#[test]
fn test_check_in_without_room_is_rejected() {
    let mut booking = create_test_booking(BookingStatus::Confirmed);
    booking.payment_status = PaymentStatus::Paid;
    let mut ctx = create_test_context(booking);
    ctx.today = date!(2026 - 04 - 10);

    assert!(matches!(
        apply(&ctx, BookingCommand::CheckIn),
        Err(CoreError::DomainViolation(DomainError::RoomNotAssigned { .. }))
    ));
}

#[test]
fn test_check_out_releases_inventory_and_cleans_room() {
    let ctx = create_checked_in_context();

    let result = apply(&ctx, BookingCommand::CheckOut).unwrap();

    assert_eq!(result.new_booking.status, BookingStatus::CheckedOut);
    assert_eq!(
        result.inventory,
        vec![InventoryAdjustment::Release { room_id: 1 }]
    );
    assert_eq!(result.room_changes[0].to, RoomStatus::Cleaning);
    assert_eq!(result.new_booking.individual_room_id, Some(7));
}

#[test]
fn test_cancel_check_in_frees_room_but_keeps_assignment() {
    let ctx = create_checked_in_context();

    let result = apply(&ctx, BookingCommand::CancelCheckIn).unwrap();

    assert_eq!(result.new_booking.status, BookingStatus::Confirmed);
    assert_eq!(result.new_booking.individual_room_id, Some(7));
    assert_eq!(result.room_changes[0].to, RoomStatus::Available);
    assert!(result.inventory.is_empty());
}

#[test]
fn test_cancel_confirmed_restores_inventory_and_releases_room() {
    let mut booking = create_test_booking(BookingStatus::Confirmed);
    booking.individual_room_id = Some(7);
    let mut ctx = create_test_context(booking);
    ctx.assigned_room = Some(create_test_room(7, 1, RoomStatus::Available));

    let result = apply(
        &ctx,
        BookingCommand::Cancel {
            reason: Some(String::from("  Guest changed plans ")),
        },
    )
    .unwrap();

    assert_eq!(result.new_booking.status, BookingStatus::Cancelled);
    assert!(result.new_booking.individual_room_id.is_none());
    assert_eq!(
        result.inventory,
        vec![InventoryAdjustment::Release { room_id: 1 }]
    );
    // An available room stays available
    assert!(result.room_changes.is_empty());
    let cancellation = result.cancellation.unwrap();
    assert_eq!(cancellation.reason, "Guest changed plans");
    assert_eq!(cancellation.released_room_id, Some(7));
    assert_eq!(
        result.notification.unwrap().kind,
        NotificationKind::BookingCancelled
    );
}

#[test]
fn test_cancel_pending_does_not_restore_inventory() {
    let ctx = create_test_context(create_test_booking(BookingStatus::Pending));

    let result = apply(&ctx, BookingCommand::Cancel { reason: None }).unwrap();

    assert!(result.inventory.is_empty());
    let cancellation = result.cancellation.unwrap();
    assert!(!cancellation.inventory_restored);
    assert_eq!(cancellation.reason, "Cancelled by staff");
}

#[test]
fn test_cancel_checked_in_sends_room_to_cleaning() {
    let ctx = create_checked_in_context();

    let result = apply(&ctx, BookingCommand::Cancel { reason: None }).unwrap();

    assert_eq!(result.room_changes[0].from, RoomStatus::Occupied);
    assert_eq!(result.room_changes[0].to, RoomStatus::Cleaning);
}

#[test]
fn test_cancel_tentative_logs_tentative_cancellation() {
    let ctx = create_test_context(create_test_booking(BookingStatus::Tentative));

    let result = apply(&ctx, BookingCommand::Cancel { reason: None }).unwrap();

    assert!(result.new_booking.tentative_expires_at.is_none());
    assert_eq!(
        result.tentative_log.unwrap().action,
        TentativeLogAction::Cancelled
    );
}

#[test]
fn test_cancel_terminal_is_rejected() {
    let ctx = create_test_context(create_test_booking(BookingStatus::CheckedOut));

    assert!(matches!(
        apply(&ctx, BookingCommand::Cancel { reason: None }),
        Err(CoreError::DomainViolation(DomainError::BookingTerminal { .. }))
    ));
}

#[test]
fn test_no_show_releases_confirmed_inventory() {
    let mut ctx = create_test_context(create_test_booking(BookingStatus::Confirmed));
    ctx.today = date!(2026 - 04 - 11);

    let result = apply(&ctx, BookingCommand::MarkNoShow).unwrap();

    assert_eq!(result.new_booking.status, BookingStatus::NoShow);
    assert_eq!(
        result.inventory,
        vec![InventoryAdjustment::Release { room_id: 1 }]
    );
}

#[test]
fn test_no_show_pending_holds_nothing_to_release() {
    let mut ctx = create_test_context(create_test_booking(BookingStatus::Pending));
    ctx.today = date!(2026 - 04 - 11);

    let result = apply(&ctx, BookingCommand::MarkNoShow).unwrap();

    assert!(result.inventory.is_empty());
}

#[test]
fn test_assign_room_requires_loaded_target() {
    let ctx = create_test_context(create_test_booking(BookingStatus::Confirmed));

    assert!(matches!(
        apply(
            &ctx,
            BookingCommand::AssignRoom {
                individual_room_id: 3
            }
        ),
        Err(CoreError::MissingContext(_))
    ));
}

#[test]
fn test_assign_room_for_checked_in_guest_moves_occupancy() {
    let mut ctx = create_checked_in_context();
    ctx.target_room = Some(create_test_room(8, 1, RoomStatus::Available));

    let result = apply(
        &ctx,
        BookingCommand::AssignRoom {
            individual_room_id: 8,
        },
    )
    .unwrap();

    assert_eq!(result.new_booking.individual_room_id, Some(8));
    assert_eq!(result.new_booking.status, BookingStatus::CheckedIn);
    let changes: Vec<(i64, RoomStatus)> = result
        .room_changes
        .iter()
        .map(|c| (c.individual_room_id, c.to))
        .collect();
    assert_eq!(
        changes,
        vec![(7, RoomStatus::Cleaning), (8, RoomStatus::Occupied)]
    );
}

#[test]
fn test_upgrade_moves_inventory_and_reprices() {
    let mut ctx = create_test_context(create_test_booking(BookingStatus::Confirmed));
    ctx.target_room_type = Some(create_test_room_type(2, 1));
    ctx.paid_cents = 45_000;

    let result = apply(
        &ctx,
        BookingCommand::UpgradeRoom {
            target_room_id: 2,
            individual_room_id: None,
            reprice: true,
        },
    )
    .unwrap();

    assert_eq!(result.new_booking.room_id, 2);
    assert_eq!(
        result.inventory,
        vec![
            InventoryAdjustment::Release { room_id: 1 },
            InventoryAdjustment::Hold { room_id: 2 }
        ]
    );
    assert_eq!(result.new_booking.total_amount_cents, 96_000);
    assert_eq!(result.new_booking.payment_status, PaymentStatus::Partial);
}

#[test]
fn test_upgrade_pending_moves_no_inventory() {
    let mut ctx = create_test_context(create_test_booking(BookingStatus::Pending));
    ctx.target_room_type = Some(create_test_room_type(2, 0));

    let result = apply(
        &ctx,
        BookingCommand::UpgradeRoom {
            target_room_id: 2,
            individual_room_id: None,
            reprice: false,
        },
    )
    .unwrap();

    assert!(result.inventory.is_empty());
    assert_eq!(result.new_booking.total_amount_cents, 45_000);
}

#[test]
fn test_record_payment_updates_payment_status() {
    let mut booking = create_test_booking(BookingStatus::Confirmed);
    booking.payment_status = PaymentStatus::Partial;
    let mut ctx = create_test_context(booking);
    ctx.paid_cents = 20_000;
    ctx.payment_count = 1;

    let result = apply(
        &ctx,
        BookingCommand::RecordPayment {
            amount_cents: 25_000,
            method: PaymentMethod::Card,
            transaction_reference: Some(String::from("ch_123")),
        },
    )
    .unwrap();

    assert_eq!(result.new_booking.payment_status, PaymentStatus::Paid);
    let payment = result.payment.unwrap();
    assert_eq!(payment.amount_cents, 25_000);
    assert_eq!(payment.recorded_by, "desk-1");
    assert_eq!(result.new_booking.status, BookingStatus::Confirmed);
}

#[test]
fn test_record_payment_rejects_amount_past_i64_range() {
    let mut ctx = create_test_context(create_test_booking(BookingStatus::Confirmed));
    ctx.paid_cents = 10_000;
    ctx.payment_count = 1;

    let err = apply(
        &ctx,
        BookingCommand::RecordPayment {
            amount_cents: i64::MAX,
            method: PaymentMethod::Card,
            transaction_reference: None,
        },
    )
    .unwrap_err();

    assert_eq!(err, CoreError::DomainViolation(DomainError::AmountOverflow));
}

#[test]
fn test_upgrade_reprice_rejects_price_past_i64_range() {
    let mut ctx = create_test_context(create_test_booking(BookingStatus::Confirmed));
    let mut target = create_test_room_type(2, 1);
    target.price_per_night_cents = i64::MAX / 2;
    ctx.target_room_type = Some(target);

    let err = apply(
        &ctx,
        BookingCommand::UpgradeRoom {
            target_room_id: 2,
            individual_room_id: None,
            reprice: true,
        },
    )
    .unwrap_err();

    assert_eq!(err, CoreError::DomainViolation(DomainError::AmountOverflow));
}

#[test]
fn test_payments_and_notes_allowed_on_terminal_bookings() {
    let ctx = create_test_context(create_test_booking(BookingStatus::CheckedOut));

    assert!(
        apply(
            &ctx,
            BookingCommand::RecordPayment {
                amount_cents: 1_000,
                method: PaymentMethod::Cash,
                transaction_reference: None,
            },
        )
        .is_ok()
    );

    let result = apply(
        &ctx,
        BookingCommand::UpdateNotes {
            notes: Some(String::from("Left umbrella in room")),
        },
    )
    .unwrap();
    assert_eq!(
        result.new_booking.notes.as_deref(),
        Some("Left umbrella in room")
    );
}

#[test]
fn test_every_transition_emits_booking_audit_event() {
    let ctx = create_test_context(create_test_booking(BookingStatus::Pending));

    let result = apply(&ctx, BookingCommand::Confirm).unwrap();

    assert_eq!(result.audit_event.subject, AuditSubject::Booking(11));
    assert_eq!(result.audit_event.action.name, "ConfirmBooking");
    assert!(result.audit_event.before.data.contains("status=pending"));
    assert!(result.audit_event.after.data.contains("status=confirmed"));
    assert_eq!(result.audit_event.actor.id, "desk-1");
}
