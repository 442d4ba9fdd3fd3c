// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::BookingCommand;
use crate::error::CoreError;
use crate::state::{
    BookingContext, CancellationRecord, InventoryAdjustment, NewPayment, Notification,
    NotificationKind, RoomStatusChange, TentativeLogAction, TentativeLogEntry, TransitionResult,
    booking_snapshot,
};
use innkeep_audit::{Action, Actor, AuditEvent, AuditSubject, Cause};
use innkeep_domain::{
    Booking, BookingStatus, IndividualRoom, PaymentStatus, RoomStatus, stay_price, sum_amounts,
    validate_cancel_check_in,
    validate_cancellation, validate_check_in, validate_check_out, validate_confirmation,
    validate_no_show, validate_payment_amount, validate_room_assignment, validate_room_upgrade,
    validate_tentative_conversion, validate_tentative_expiry, validate_tentative_transition,
};

/// Effects accumulated while applying one command.
struct Effects {
    booking: Booking,
    inventory: Vec<InventoryAdjustment>,
    room_changes: Vec<RoomStatusChange>,
    tentative_log: Option<TentativeLogEntry>,
    cancellation: Option<CancellationRecord>,
    payment: Option<NewPayment>,
    notification: Option<NotificationKind>,
    auto_assigned_room: Option<IndividualRoom>,
    message: String,
}

impl Effects {
    fn new(ctx: &BookingContext) -> Self {
        let mut booking = ctx.booking.clone();
        booking.updated_at = ctx.now;
        Self {
            booking,
            inventory: Vec::new(),
            room_changes: Vec::new(),
            tentative_log: None,
            cancellation: None,
            payment: None,
            notification: None,
            auto_assigned_room: None,
            message: String::new(),
        }
    }

    fn change_room(&mut self, room: &IndividualRoom, to: RoomStatus, reason: &str) {
        if room.status == to {
            return;
        }
        self.room_changes.push(RoomStatusChange {
            individual_room_id: room.individual_room_id,
            room_number: room.room_number.clone(),
            from: room.status,
            to,
            reason: format!("{reason} ({})", self.booking.reference),
        });
    }

    /// Clears the booking's room assignment.
    ///
    /// An occupied room goes to cleaning; any other status is left alone.
    fn release_room(&mut self, ctx: &BookingContext, reason: &str) -> Option<i64> {
        let released = self.booking.individual_room_id.take();
        if let Some(room) = assigned_room(ctx) {
            self.change_room(room, room.status.after_release(), reason);
        }
        released
    }

    fn restore_inventory_if_held(&mut self, previous: BookingStatus) -> bool {
        if previous.holds_inventory() {
            self.inventory.push(InventoryAdjustment::Release {
                room_id: self.booking.room_id,
            });
            return true;
        }
        false
    }
}

/// The assigned room, if the loaded row matches the booking's assignment.
fn assigned_room(ctx: &BookingContext) -> Option<&IndividualRoom> {
    let id = ctx.booking.individual_room_id?;
    ctx.assigned_room
        .as_ref()
        .filter(|room| room.individual_room_id == id)
}

fn target_room(
    ctx: &BookingContext,
    individual_room_id: i64,
) -> Result<&IndividualRoom, CoreError> {
    ctx.target_room
        .as_ref()
        .filter(|room| room.individual_room_id == individual_room_id)
        .ok_or(CoreError::MissingContext("target room"))
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Applies a booking command, producing the new booking, its side effects
/// and an audit event.
///
/// # Arguments
///
/// * `ctx` - The booking and the collaborators loaded for this command
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the command violates a domain rule or `ctx` lacks a
/// collaborator the command needs.
#[allow(clippy::too_many_lines)]
pub fn apply_booking_command(
    ctx: &BookingContext,
    command: BookingCommand,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let booking: &Booking = &ctx.booking;
    let reference: &str = booking.reference.as_str();
    let mut effects = Effects::new(ctx);
    let action_name = command.name();

    match command {
        BookingCommand::Confirm => {
            validate_confirmation(booking, &ctx.room_type)?;

            effects.booking.status = BookingStatus::Confirmed;
            effects.inventory.push(InventoryAdjustment::Hold {
                room_id: booking.room_id,
            });
            effects.notification = Some(NotificationKind::BookingConfirmed);
            effects.message = format!("Booking {reference} confirmed");

            let auto_room = ctx.auto_assign_room.as_ref().filter(|room| {
                booking.individual_room_id.is_none()
                    && validate_room_assignment(booking, room, &ctx.occupancies).is_ok()
            });
            if let Some(room) = auto_room {
                effects.booking.individual_room_id = Some(room.individual_room_id);
                effects.auto_assigned_room = Some(room.clone());
                effects.message = format!(
                    "Booking {reference} confirmed and room {} assigned",
                    room.room_number
                );
            }
        }
        BookingCommand::MarkTentative => {
            validate_tentative_transition(booking, &ctx.room_type, ctx.payment_count > 0)?;

            let expires_at = ctx.now + ctx.tentative_hold;
            effects.booking.status = BookingStatus::Tentative;
            effects.booking.tentative_expires_at = Some(expires_at);
            effects.inventory.push(InventoryAdjustment::Hold {
                room_id: booking.room_id,
            });
            effects.tentative_log = Some(TentativeLogEntry {
                action: TentativeLogAction::Created,
                expires_at: Some(expires_at),
            });
            effects.message = format!("Booking {reference} held tentatively until {expires_at}");
        }
        BookingCommand::ConvertTentative => {
            validate_tentative_conversion(booking, ctx.now)?;

            effects.booking.status = BookingStatus::Confirmed;
            effects.booking.tentative_expires_at = None;
            effects.tentative_log = Some(TentativeLogEntry {
                action: TentativeLogAction::Converted,
                expires_at: booking.tentative_expires_at,
            });
            effects.notification = Some(NotificationKind::TentativeConverted);
            effects.message = format!("Tentative booking {reference} converted to confirmed");
        }
        BookingCommand::ExpireTentative => {
            validate_tentative_expiry(booking, ctx.now)?;

            effects.booking.status = BookingStatus::Cancelled;
            effects.booking.tentative_expires_at = None;
            let inventory_restored = effects.restore_inventory_if_held(booking.status);
            let released_room_id = effects.release_room(ctx, "Tentative hold expired");
            effects.tentative_log = Some(TentativeLogEntry {
                action: TentativeLogAction::Expired,
                expires_at: booking.tentative_expires_at,
            });
            effects.cancellation = Some(CancellationRecord {
                reason: String::from("Tentative hold expired"),
                previous_status: booking.status,
                released_room_id,
                inventory_restored,
            });
            effects.notification = Some(NotificationKind::TentativeExpired);
            effects.message = format!("Tentative hold on booking {reference} expired");
        }
        BookingCommand::CheckIn => {
            let room = assigned_room(ctx);
            validate_check_in(booking, room, ctx.today)?;
            let room = room.ok_or(CoreError::MissingContext("assigned room"))?;

            effects.booking.status = BookingStatus::CheckedIn;
            effects.change_room(room, RoomStatus::Occupied, "Guest checked in");
            effects.message = format!(
                "Booking {reference} checked in to room {}",
                room.room_number
            );
        }
        BookingCommand::CheckOut => {
            validate_check_out(booking)?;

            effects.booking.status = BookingStatus::CheckedOut;
            effects.restore_inventory_if_held(booking.status);
            if let Some(room) = assigned_room(ctx) {
                effects.change_room(room, RoomStatus::Cleaning, "Guest checked out");
            }
            effects.message = format!("Booking {reference} checked out");
        }
        BookingCommand::CancelCheckIn => {
            validate_cancel_check_in(booking)?;

            effects.booking.status = BookingStatus::Confirmed;
            if let Some(room) = assigned_room(ctx) {
                effects.change_room(room, RoomStatus::Available, "Check-in undone");
            }
            effects.message = format!("Check-in of booking {reference} undone");
        }
        BookingCommand::MarkNoShow => {
            validate_no_show(booking, ctx.today)?;

            effects.booking.status = BookingStatus::NoShow;
            effects.restore_inventory_if_held(booking.status);
            effects.release_room(ctx, "Guest did not arrive");
            effects.message = format!("Booking {reference} marked as no-show");
        }
        BookingCommand::Cancel { reason } => {
            validate_cancellation(booking)?;

            let reason =
                normalize_text(reason).unwrap_or_else(|| String::from("Cancelled by staff"));
            effects.booking.status = BookingStatus::Cancelled;
            effects.booking.tentative_expires_at = None;
            if booking.status == BookingStatus::Tentative {
                effects.tentative_log = Some(TentativeLogEntry {
                    action: TentativeLogAction::Cancelled,
                    expires_at: booking.tentative_expires_at,
                });
            }
            let inventory_restored = effects.restore_inventory_if_held(booking.status);
            let released_room_id = effects.release_room(ctx, "Booking cancelled");
            effects.cancellation = Some(CancellationRecord {
                reason,
                previous_status: booking.status,
                released_room_id,
                inventory_restored,
            });
            effects.notification = Some(NotificationKind::BookingCancelled);
            effects.message = format!("Booking {reference} cancelled");
        }
        BookingCommand::AssignRoom { individual_room_id } => {
            let room = target_room(ctx, individual_room_id)?;
            validate_room_assignment(booking, room, &ctx.occupancies)?;

            if booking.status == BookingStatus::CheckedIn
                && booking.individual_room_id != Some(room.individual_room_id)
            {
                if let Some(old) = assigned_room(ctx) {
                    effects.change_room(old, RoomStatus::Cleaning, "Guest moved rooms");
                }
                effects.change_room(room, RoomStatus::Occupied, "Guest moved in");
            }
            effects.booking.individual_room_id = Some(room.individual_room_id);
            effects.message = format!(
                "Room {} assigned to booking {reference}",
                room.room_number
            );
        }
        BookingCommand::UpgradeRoom {
            target_room_id,
            individual_room_id,
            reprice,
        } => {
            let target_type = ctx
                .target_room_type
                .as_ref()
                .filter(|t| t.room_id == target_room_id)
                .ok_or(CoreError::MissingContext("target room type"))?;
            let room = individual_room_id
                .map(|id| target_room(ctx, id))
                .transpose()?;
            validate_room_upgrade(booking, target_type, room, &ctx.occupancies)?;

            if booking.status.holds_inventory() {
                effects.inventory.push(InventoryAdjustment::Release {
                    room_id: booking.room_id,
                });
                effects.inventory.push(InventoryAdjustment::Hold {
                    room_id: target_type.room_id,
                });
            }
            effects.booking.room_id = target_type.room_id;

            if reprice {
                let total = stay_price(target_type.price_per_night_cents, booking.nights())?;
                effects.booking.total_amount_cents = total;
                effects.booking.payment_status = PaymentStatus::from_totals(ctx.paid_cents, total);
            }

            if booking.status == BookingStatus::CheckedIn {
                if let Some(old) = assigned_room(ctx) {
                    effects.change_room(old, RoomStatus::Cleaning, "Guest upgraded");
                }
                if let Some(new_room) = room {
                    effects.change_room(new_room, RoomStatus::Occupied, "Guest upgraded");
                }
            }
            effects.booking.individual_room_id = room.map(|r| r.individual_room_id);
            effects.message = format!(
                "Booking {reference} moved from {} to {}",
                ctx.room_type.name, target_type.name
            );
        }
        BookingCommand::UpdateNotes { notes } => {
            effects.booking.notes = normalize_text(notes);
            effects.message = format!("Notes updated for booking {reference}");
        }
        BookingCommand::RecordPayment {
            amount_cents,
            method,
            transaction_reference,
        } => {
            validate_payment_amount(amount_cents)?;

            let paid_cents = sum_amounts([ctx.paid_cents, amount_cents])?;
            effects.booking.payment_status =
                PaymentStatus::from_totals(paid_cents, booking.total_amount_cents);
            effects.payment = Some(NewPayment {
                amount_cents,
                method,
                transaction_reference: normalize_text(transaction_reference),
                recorded_by: actor.id.clone(),
                paid_at: ctx.now,
            });
            effects.message = format!(
                "Payment recorded for booking {reference}; payment status is {}",
                effects.booking.payment_status
            );
        }
    }

    effects.booking.validate_tentative_consistency()?;

    let notification = effects.notification.map(|kind| Notification {
        kind,
        booking_reference: effects.booking.reference.clone(),
        guest_name: effects.booking.guest.name.clone(),
        guest_email: effects.booking.guest.email.clone(),
    });

    let action: Action = Action::new(String::from(action_name), Some(effects.message.clone()));
    let audit_event: AuditEvent = AuditEvent::new(
        AuditSubject::Booking(booking.booking_id),
        actor,
        cause,
        action,
        booking_snapshot(booking),
        booking_snapshot(&effects.booking),
    );

    Ok(TransitionResult {
        new_booking: effects.booking,
        inventory: effects.inventory,
        room_changes: effects.room_changes,
        tentative_log: effects.tentative_log,
        cancellation: effects.cancellation,
        payment: effects.payment,
        notification,
        auto_assigned_room: effects.auto_assigned_room,
        message: effects.message,
        audit_event,
    })
}
