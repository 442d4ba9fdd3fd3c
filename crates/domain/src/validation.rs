// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rule checks guarding each booking and inventory mutation.
//!
//! Every function here is pure: callers load the booking and its
//! collaborators, ask the matching validator, and only write when it
//! returns `Ok`.

use crate::booking_status::BookingStatus;
use crate::error::DomainError;
use crate::payment::PaymentStatus;
use crate::room_assignment::{RoomOccupancy, find_conflict};
use crate::room_status::RoomStatus;
use crate::types::{Booking, IndividualRoom, RoomType};
use time::{Date, OffsetDateTime};

/// Longest report range accepted, in days.
pub const MAX_REPORT_DAYS: i64 = 366;

/// Validates a status change against the booking lifecycle.
///
/// # Errors
///
/// Returns `DomainError::InvalidStatusTransition` if the lifecycle forbids it.
pub fn validate_booking_status_transition(
    booking: &Booking,
    new_status: BookingStatus,
) -> Result<(), DomainError> {
    booking.status.validate_transition(new_status)
}

fn require_status(
    booking: &Booking,
    expected: BookingStatus,
    target: BookingStatus,
) -> Result<(), DomainError> {
    if booking.status != expected {
        return Err(DomainError::InvalidStatusTransition {
            from: booking.status.as_str().to_string(),
            to: target.as_str().to_string(),
            reason: format!("booking must be {expected}"),
        });
    }
    Ok(())
}

fn require_not_terminal(booking: &Booking) -> Result<(), DomainError> {
    if booking.status.is_terminal() {
        return Err(DomainError::BookingTerminal {
            reference: booking.reference.clone(),
            status: booking.status.as_str().to_string(),
        });
    }
    Ok(())
}

fn require_availability(room_type: &RoomType) -> Result<(), DomainError> {
    if room_type.rooms_available == 0 {
        return Err(DomainError::NoAvailability {
            room_id: room_type.room_id,
            room_name: room_type.name.clone(),
        });
    }
    Ok(())
}

/// Validates confirming a pending booking.
///
/// # Errors
///
/// Returns an error if the booking is not pending or its room type has no
/// availability left.
pub fn validate_confirmation(booking: &Booking, room_type: &RoomType) -> Result<(), DomainError> {
    require_status(booking, BookingStatus::Pending, BookingStatus::Confirmed)?;
    require_availability(room_type)
}

/// Validates placing a pending booking on a tentative hold.
///
/// # Errors
///
/// Returns an error if:
/// - the booking has been confirmed at some point
/// - the booking is not pending
/// - a payment has already been recorded
/// - the room type has no availability left
pub fn validate_tentative_transition(
    booking: &Booking,
    room_type: &RoomType,
    has_payments: bool,
) -> Result<(), DomainError> {
    if booking.status.has_reached_confirmation() {
        return Err(DomainError::TentativeNotAllowed {
            reason: format!("booking is already {}", booking.status),
        });
    }
    require_status(booking, BookingStatus::Pending, BookingStatus::Tentative)?;
    if has_payments {
        return Err(DomainError::TentativeNotAllowed {
            reason: String::from("payments have already been recorded"),
        });
    }
    require_availability(room_type)
}

/// Validates converting a tentative hold into a confirmed booking.
///
/// # Errors
///
/// Returns an error if the booking is not tentative or the hold has expired.
pub fn validate_tentative_conversion(
    booking: &Booking,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    require_status(booking, BookingStatus::Tentative, BookingStatus::Confirmed)?;
    match booking.tentative_expires_at {
        Some(expires_at) if now >= expires_at => {
            Err(DomainError::TentativeHoldExpired { expires_at })
        }
        _ => Ok(()),
    }
}

/// Validates expiring a tentative hold.
///
/// A hold without an expiry timestamp is treated as already lapsed.
///
/// # Errors
///
/// Returns an error if the booking is not tentative or the hold is still
/// active.
pub fn validate_tentative_expiry(booking: &Booking, now: OffsetDateTime) -> Result<(), DomainError> {
    require_status(booking, BookingStatus::Tentative, BookingStatus::Cancelled)?;
    match booking.tentative_expires_at {
        Some(expires_at) if now < expires_at => Err(DomainError::TentativeHoldActive { expires_at }),
        _ => Ok(()),
    }
}

/// Validates checking a guest in.
///
/// # Errors
///
/// Returns an error if:
/// - the booking is not confirmed
/// - the booking is not fully paid
/// - no individual room is assigned, or the room is occupied or out of service
/// - `today` is outside `[check_in, check_out)`
pub fn validate_check_in(
    booking: &Booking,
    assigned_room: Option<&IndividualRoom>,
    today: Date,
) -> Result<(), DomainError> {
    require_status(booking, BookingStatus::Confirmed, BookingStatus::CheckedIn)?;

    if booking.payment_status != PaymentStatus::Paid {
        return Err(DomainError::PaymentRequired {
            payment_status: booking.payment_status.as_str().to_string(),
        });
    }

    let Some(room) = assigned_room else {
        return Err(DomainError::RoomNotAssigned {
            reference: booking.reference.clone(),
        });
    };
    if !room.status.accepts_check_in() {
        return Err(DomainError::RoomUnavailable {
            room_number: room.room_number.clone(),
            status: room.status.as_str().to_string(),
        });
    }

    if !booking.stay.contains(today) {
        return Err(DomainError::CheckInOutsideStay {
            today,
            check_in: booking.stay.check_in(),
            check_out: booking.stay.check_out(),
        });
    }
    Ok(())
}

/// Validates checking a guest out.
///
/// # Errors
///
/// Returns an error if the booking is not checked in.
pub fn validate_check_out(booking: &Booking) -> Result<(), DomainError> {
    require_status(booking, BookingStatus::CheckedIn, BookingStatus::CheckedOut)
}

/// Validates undoing a check-in.
///
/// # Errors
///
/// Returns an error if the booking is not checked in.
pub fn validate_cancel_check_in(booking: &Booking) -> Result<(), DomainError> {
    require_status(booking, BookingStatus::CheckedIn, BookingStatus::Confirmed)
}

/// Validates recording a no-show.
///
/// # Errors
///
/// Returns an error if the booking is not pending or confirmed, or the
/// arrival date has not yet passed.
pub fn validate_no_show(booking: &Booking, today: Date) -> Result<(), DomainError> {
    validate_booking_status_transition(booking, BookingStatus::NoShow)?;
    if today <= booking.stay.check_in() {
        return Err(DomainError::NoShowTooEarly {
            check_in: booking.stay.check_in(),
            today,
        });
    }
    Ok(())
}

/// Validates cancelling a booking.
///
/// # Errors
///
/// Returns `DomainError::BookingTerminal` if the booking already reached a
/// terminal state.
pub fn validate_cancellation(booking: &Booking) -> Result<(), DomainError> {
    require_not_terminal(booking)?;
    validate_booking_status_transition(booking, BookingStatus::Cancelled)
}

/// Checks that `room` can hold `booking`'s stay for room type `room_id`.
fn validate_room_for_stay(
    booking: &Booking,
    room_id: i64,
    room: &IndividualRoom,
    occupancies: &[RoomOccupancy],
) -> Result<(), DomainError> {
    if room.room_id != room_id {
        return Err(DomainError::RoomTypeMismatch {
            room_number: room.room_number.clone(),
            expected_room_id: room_id,
            actual_room_id: room.room_id,
        });
    }
    if !room.status.is_assignable() {
        return Err(DomainError::RoomUnavailable {
            room_number: room.room_number.clone(),
            status: room.status.as_str().to_string(),
        });
    }
    if let Some(conflict) = find_conflict(
        room.individual_room_id,
        &booking.stay,
        booking.booking_id,
        occupancies,
    ) {
        return Err(DomainError::RoomAlreadyBooked {
            room_number: room.room_number.clone(),
            conflicting_reference: conflict.reference.clone(),
        });
    }
    // An in-house guest moves into the room immediately
    if booking.status == BookingStatus::CheckedIn
        && room.individual_room_id != booking.individual_room_id.unwrap_or_default()
        && room.status == RoomStatus::Occupied
    {
        return Err(DomainError::RoomUnavailable {
            room_number: room.room_number.clone(),
            status: room.status.as_str().to_string(),
        });
    }
    Ok(())
}

/// Validates assigning an individual room to a booking.
///
/// # Errors
///
/// Returns an error if:
/// - the booking is terminal
/// - the room belongs to another room type
/// - the room is under maintenance or out of order
/// - another non-terminal booking holds the room for overlapping dates
/// - the booking is checked in and the room is occupied
pub fn validate_room_assignment(
    booking: &Booking,
    room: &IndividualRoom,
    occupancies: &[RoomOccupancy],
) -> Result<(), DomainError> {
    require_not_terminal(booking)?;
    validate_room_for_stay(booking, booking.room_id, room, occupancies)
}

/// Validates moving a booking to another room type.
///
/// # Errors
///
/// Returns an error if:
/// - the booking is terminal
/// - the target is the current room type, inactive, or too small for the party
/// - the booking holds inventory and the target has none left
/// - the booking is checked in and no target room is given
/// - the target room cannot hold the stay
pub fn validate_room_upgrade(
    booking: &Booking,
    target_type: &RoomType,
    target_room: Option<&IndividualRoom>,
    occupancies: &[RoomOccupancy],
) -> Result<(), DomainError> {
    require_not_terminal(booking)?;

    if target_type.room_id == booking.room_id {
        return Err(DomainError::SameRoomType {
            room_id: booking.room_id,
        });
    }
    if !target_type.is_active {
        return Err(DomainError::RoomTypeInactive {
            name: target_type.name.clone(),
        });
    }
    if booking.guests() > target_type.max_guests {
        return Err(DomainError::CapacityExceeded {
            guests: booking.guests(),
            max_guests: target_type.max_guests,
        });
    }
    if booking.status.holds_inventory() {
        require_availability(target_type)?;
    }

    match target_room {
        Some(room) => validate_room_for_stay(booking, target_type.room_id, room, occupancies),
        None if booking.status == BookingStatus::CheckedIn => Err(DomainError::RoomNotAssigned {
            reference: booking.reference.clone(),
        }),
        None => Ok(()),
    }
}

/// Validates a payment amount.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` unless the amount is positive.
pub const fn validate_payment_amount(amount_cents: i64) -> Result<(), DomainError> {
    if amount_cents <= 0 {
        return Err(DomainError::InvalidAmount { amount_cents });
    }
    Ok(())
}

/// Validates a manual housekeeping status change.
///
/// `occupant` is the checked-in booking currently assigned to the room, if any.
///
/// # Errors
///
/// Returns an error if the new status is `occupied` or the room is in use.
pub fn validate_room_status_change(
    room: &IndividualRoom,
    new_status: RoomStatus,
    occupant: Option<&Booking>,
) -> Result<(), DomainError> {
    if new_status == RoomStatus::Occupied {
        return Err(DomainError::ManualOccupancyNotAllowed {
            room_number: room.room_number.clone(),
        });
    }
    if let Some(booking) = occupant {
        return Err(DomainError::RoomInUse {
            room_number: room.room_number.clone(),
            reference: booking.reference.clone(),
        });
    }
    Ok(())
}

/// Validates room type attributes.
///
/// # Errors
///
/// Returns `DomainError::InvalidRoomType` if a field is out of range.
pub fn validate_room_type_fields(
    name: &str,
    price_per_night_cents: i64,
    max_guests: u32,
) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidRoomType(String::from(
            "Name cannot be empty",
        )));
    }
    if name.len() > 100 {
        return Err(DomainError::InvalidRoomType(String::from(
            "Name cannot exceed 100 characters",
        )));
    }
    if price_per_night_cents <= 0 {
        return Err(DomainError::InvalidRoomType(String::from(
            "Price per night must be greater than 0",
        )));
    }
    if max_guests == 0 {
        return Err(DomainError::InvalidRoomType(String::from(
            "Max guests must be at least 1",
        )));
    }
    Ok(())
}

/// Computes availability after changing a room type's total.
///
/// The availability shifts by the same delta as the total.
///
/// # Errors
///
/// Returns `DomainError::InventoryOutOfRange` if availability would become
/// negative.
pub fn validate_inventory_change(room_type: &RoomType, new_total: u32) -> Result<u32, DomainError> {
    let delta = i64::from(new_total) - i64::from(room_type.total_rooms);
    let available = i64::from(room_type.rooms_available) + delta;
    u32::try_from(available).map_err(|_| DomainError::InventoryOutOfRange {
        room_name: room_type.name.clone(),
        total_rooms: i64::from(new_total),
        rooms_available: available,
    })
}

/// Validates individual room attributes.
///
/// # Errors
///
/// Returns `DomainError::InvalidRoom` if the room number is empty or too long.
pub fn validate_room_fields(room_number: &str) -> Result<(), DomainError> {
    let trimmed = room_number.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidRoom(String::from(
            "Room number cannot be empty",
        )));
    }
    if trimmed.len() > 20 {
        return Err(DomainError::InvalidRoom(String::from(
            "Room number cannot exceed 20 characters",
        )));
    }
    Ok(())
}

/// Validates a report range `[start, end)`.
///
/// # Errors
///
/// Returns `DomainError::InvalidReportRange` if `end` is not after `start`
/// or the range spans more than [`MAX_REPORT_DAYS`].
pub fn validate_report_range(start: Date, end: Date) -> Result<(), DomainError> {
    if end <= start {
        return Err(DomainError::InvalidReportRange {
            reason: format!("end date {end} must be after start date {start}"),
        });
    }
    let days = (end - start).whole_days();
    if days > MAX_REPORT_DAYS {
        return Err(DomainError::InvalidReportRange {
            reason: format!("range of {days} days exceeds {MAX_REPORT_DAYS} days"),
        });
    }
    Ok(())
}
