// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Date, OffsetDateTime};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A booking status string could not be parsed.
    InvalidBookingStatus {
        /// The unrecognized status.
        status: String,
    },
    /// A room status string could not be parsed.
    InvalidRoomStatus {
        /// The unrecognized status.
        status: String,
    },
    /// A payment status string could not be parsed.
    InvalidPaymentStatus {
        /// The unrecognized status.
        status: String,
    },
    /// A payment method string could not be parsed.
    InvalidPaymentMethod {
        /// The unrecognized method.
        method: String,
    },
    /// A booking status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// The booking is in a terminal state and cannot change status.
    BookingTerminal {
        /// The booking reference.
        reference: String,
        /// The terminal status.
        status: String,
    },
    /// The room type has no rooms left to hold.
    NoAvailability {
        /// The room type identifier.
        room_id: i64,
        /// The room type name.
        room_name: String,
    },
    /// The booking cannot be placed on a tentative hold.
    TentativeNotAllowed {
        /// Why the hold was refused.
        reason: String,
    },
    /// The tentative hold has already lapsed.
    TentativeHoldExpired {
        /// When the hold expired.
        expires_at: OffsetDateTime,
    },
    /// The tentative hold is still active and cannot be expired yet.
    TentativeHoldActive {
        /// When the hold expires.
        expires_at: OffsetDateTime,
    },
    /// Check-in requires the booking to be fully paid.
    PaymentRequired {
        /// The current payment status.
        payment_status: String,
    },
    /// Check-in requires an individual room to be assigned.
    RoomNotAssigned {
        /// The booking reference.
        reference: String,
    },
    /// The individual room cannot take guests in its current status.
    RoomUnavailable {
        /// The room number.
        room_number: String,
        /// The room's current status.
        status: String,
    },
    /// The individual room belongs to a different room type.
    RoomTypeMismatch {
        /// The room number.
        room_number: String,
        /// The booking's room type.
        expected_room_id: i64,
        /// The room's actual type.
        actual_room_id: i64,
    },
    /// The individual room is already assigned to an overlapping stay.
    RoomAlreadyBooked {
        /// The room number.
        room_number: String,
        /// The reference of the conflicting booking.
        conflicting_reference: String,
    },
    /// The individual room is occupied by an in-house guest.
    RoomInUse {
        /// The room number.
        room_number: String,
        /// The reference of the checked-in booking.
        reference: String,
    },
    /// Rooms are only marked occupied through check-in.
    ManualOccupancyNotAllowed {
        /// The room number.
        room_number: String,
    },
    /// Check-in attempted outside the booked stay.
    CheckInOutsideStay {
        /// The hotel-local date of the attempt.
        today: Date,
        /// The booked arrival date.
        check_in: Date,
        /// The booked departure date.
        check_out: Date,
    },
    /// No-show may only be recorded once the arrival date has passed.
    NoShowTooEarly {
        /// The booked arrival date.
        check_in: Date,
        /// The hotel-local date of the attempt.
        today: Date,
    },
    /// Check-out date must be after check-in date.
    InvalidStayDates {
        /// The arrival date.
        check_in: Date,
        /// The departure date.
        check_out: Date,
    },
    /// A monetary amount is not acceptable.
    InvalidAmount {
        /// The rejected amount in minor units.
        amount_cents: i64,
    },
    /// A money calculation does not fit in the supported range.
    AmountOverflow,
    /// The party does not fit the room type.
    CapacityExceeded {
        /// Number of guests on the booking.
        guests: u32,
        /// Room type capacity.
        max_guests: u32,
    },
    /// An upgrade must target a different room type.
    SameRoomType {
        /// The room type identifier.
        room_id: i64,
    },
    /// The room type has been deactivated.
    RoomTypeInactive {
        /// The room type name.
        name: String,
    },
    /// Room type attributes are invalid.
    InvalidRoomType(String),
    /// Individual room attributes are invalid.
    InvalidRoom(String),
    /// Another individual room already uses this number.
    DuplicateRoomNumber {
        /// The duplicated room number.
        room_number: String,
    },
    /// An inventory change would push availability out of range.
    InventoryOutOfRange {
        /// The room type name.
        room_name: String,
        /// Total rooms of the type.
        total_rooms: i64,
        /// The availability the change would produce.
        rooms_available: i64,
    },
    /// A report range is invalid.
    InvalidReportRange {
        /// Description of the problem.
        reason: String,
    },
    /// A date could not be parsed.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBookingStatus { status } => {
                write!(f, "Invalid booking status: '{status}'")
            }
            Self::InvalidRoomStatus { status } => write!(f, "Invalid room status: '{status}'"),
            Self::InvalidPaymentStatus { status } => {
                write!(f, "Invalid payment status: '{status}'")
            }
            Self::InvalidPaymentMethod { method } => {
                write!(f, "Invalid payment method: '{method}'")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot change booking from '{from}' to '{to}': {reason}")
            }
            Self::BookingTerminal { reference, status } => {
                write!(f, "Booking {reference} is {status} and can no longer change")
            }
            Self::NoAvailability { room_name, .. } => {
                write!(f, "No '{room_name}' rooms are available")
            }
            Self::TentativeNotAllowed { reason } => {
                write!(f, "Booking cannot be made tentative: {reason}")
            }
            Self::TentativeHoldExpired { expires_at } => {
                write!(f, "Tentative hold expired at {expires_at}")
            }
            Self::TentativeHoldActive { expires_at } => {
                write!(f, "Tentative hold is active until {expires_at}")
            }
            Self::PaymentRequired { payment_status } => {
                write!(
                    f,
                    "Booking must be fully paid before check-in (payment status: {payment_status})"
                )
            }
            Self::RoomNotAssigned { reference } => {
                write!(f, "Booking {reference} has no room assigned")
            }
            Self::RoomUnavailable {
                room_number,
                status,
            } => {
                write!(f, "Room {room_number} is not usable while {status}")
            }
            Self::RoomTypeMismatch {
                room_number,
                expected_room_id,
                actual_room_id,
            } => {
                write!(
                    f,
                    "Room {room_number} belongs to room type {actual_room_id}, booking requires room type {expected_room_id}"
                )
            }
            Self::RoomAlreadyBooked {
                room_number,
                conflicting_reference,
            } => {
                write!(
                    f,
                    "Room {room_number} is already assigned to booking {conflicting_reference} for overlapping dates"
                )
            }
            Self::RoomInUse {
                room_number,
                reference,
            } => {
                write!(
                    f,
                    "Room {room_number} is occupied by checked-in booking {reference}"
                )
            }
            Self::ManualOccupancyNotAllowed { room_number } => {
                write!(
                    f,
                    "Room {room_number} can only become occupied through check-in"
                )
            }
            Self::CheckInOutsideStay {
                today,
                check_in,
                check_out,
            } => {
                write!(
                    f,
                    "Check-in on {today} is outside the booked stay {check_in} to {check_out}"
                )
            }
            Self::NoShowTooEarly { check_in, today } => {
                write!(
                    f,
                    "No-show cannot be recorded on {today}: arrival date {check_in} has not passed"
                )
            }
            Self::InvalidStayDates {
                check_in,
                check_out,
            } => {
                write!(
                    f,
                    "Check-out date {check_out} must be after check-in date {check_in}"
                )
            }
            Self::InvalidAmount { amount_cents } => {
                write!(f, "Invalid amount: {amount_cents}. Must be greater than 0")
            }
            Self::AmountOverflow => write!(f, "Amount exceeds the supported range"),
            Self::CapacityExceeded { guests, max_guests } => {
                write!(
                    f,
                    "Party of {guests} exceeds room capacity of {max_guests}"
                )
            }
            Self::SameRoomType { room_id } => {
                write!(f, "Booking is already in room type {room_id}")
            }
            Self::RoomTypeInactive { name } => write!(f, "Room type '{name}' is inactive"),
            Self::InvalidRoomType(msg) => write!(f, "Invalid room type: {msg}"),
            Self::InvalidRoom(msg) => write!(f, "Invalid room: {msg}"),
            Self::DuplicateRoomNumber { room_number } => {
                write!(f, "Room number {room_number} already exists")
            }
            Self::InventoryOutOfRange {
                room_name,
                total_rooms,
                rooms_available,
            } => {
                write!(
                    f,
                    "Room type '{room_name}' would have {rooms_available} of {total_rooms} rooms available"
                )
            }
            Self::InvalidReportRange { reason } => write!(f, "Invalid report range: {reason}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
