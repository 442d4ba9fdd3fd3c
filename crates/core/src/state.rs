// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use innkeep_audit::{AuditEvent, StateSnapshot};
use innkeep_domain::{
    Booking, BookingStatus, IndividualRoom, PaymentMethod, RoomOccupancy, RoomStatus, RoomType,
};
use time::{Date, Duration, OffsetDateTime};

/// Everything a booking transition may consult.
///
/// The caller loads these rows before applying a command. Fields a command
/// does not need may be left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingContext {
    pub booking: Booking,
    /// The booking's current room type.
    pub room_type: RoomType,
    /// The individual room currently assigned to the booking.
    pub assigned_room: Option<IndividualRoom>,
    /// The individual room selected by an assignment or upgrade.
    pub target_room: Option<IndividualRoom>,
    /// The room type selected by an upgrade.
    pub target_room_type: Option<RoomType>,
    /// The first assignment candidate when auto-assign on confirm is on.
    pub auto_assign_room: Option<IndividualRoom>,
    /// Non-terminal assignments that could conflict with the target room.
    pub occupancies: Vec<RoomOccupancy>,
    /// Sum of recorded payments.
    pub paid_cents: i64,
    pub payment_count: u32,
    /// Hotel-local date.
    pub today: Date,
    pub now: OffsetDateTime,
    /// How long a tentative hold lasts.
    pub tentative_hold: Duration,
}

impl BookingContext {
    /// Creates a context holding only the booking and its room type.
    #[must_use]
    pub const fn new(
        booking: Booking,
        room_type: RoomType,
        today: Date,
        now: OffsetDateTime,
        tentative_hold: Duration,
    ) -> Self {
        Self {
            booking,
            room_type,
            assigned_room: None,
            target_room: None,
            target_room_type: None,
            auto_assign_room: None,
            occupancies: Vec::new(),
            paid_cents: 0,
            payment_count: 0,
            today,
            now,
            tentative_hold,
        }
    }
}

/// A change of a room type's `rooms_available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryAdjustment {
    /// Take one unit; only valid while `rooms_available > 0`.
    Hold { room_id: i64 },
    /// Give one unit back.
    Release { room_id: i64 },
}

impl InventoryAdjustment {
    #[must_use]
    pub const fn room_id(&self) -> i64 {
        match self {
            Self::Hold { room_id } | Self::Release { room_id } => *room_id,
        }
    }
}

/// A housekeeping status change of an individual room.
///
/// `from` is the status that was read; the write only applies if the room
/// still carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomStatusChange {
    pub individual_room_id: i64,
    pub room_number: String,
    pub from: RoomStatus,
    pub to: RoomStatus,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TentativeLogAction {
    Created,
    Converted,
    Expired,
    Cancelled,
}

impl TentativeLogAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Converted => "converted",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TentativeLogEntry {
    pub action: TentativeLogAction,
    pub expires_at: Option<OffsetDateTime>,
}

/// Details written to the cancellation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationRecord {
    pub reason: String,
    pub previous_status: BookingStatus,
    pub released_room_id: Option<i64>,
    pub inventory_restored: bool,
}

/// A payment to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub transaction_reference: Option<String>,
    pub recorded_by: String,
    pub paid_at: OffsetDateTime,
}

/// Why the guest is being notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    BookingConfirmed,
    TentativeConverted,
    TentativeExpired,
    BookingCancelled,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BookingConfirmed => "booking_confirmed",
            Self::TentativeConverted => "tentative_converted",
            Self::TentativeExpired => "tentative_expired",
            Self::BookingCancelled => "booking_cancelled",
        }
    }
}

/// A guest notification to send after the transition commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub booking_reference: String,
    pub guest_name: String,
    pub guest_email: String,
}

/// The result of a successful booking transition.
///
/// Transitions are atomic: persistence applies every effect in one
/// database transaction or none of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The booking as it must be stored.
    pub new_booking: Booking,
    pub inventory: Vec<InventoryAdjustment>,
    pub room_changes: Vec<RoomStatusChange>,
    pub tentative_log: Option<TentativeLogEntry>,
    pub cancellation: Option<CancellationRecord>,
    pub payment: Option<NewPayment>,
    pub notification: Option<Notification>,
    /// The room assigned automatically on confirmation.
    pub auto_assigned_room: Option<IndividualRoom>,
    /// Operator-facing summary of what happened.
    pub message: String,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// Converts a booking to a snapshot for audit purposes.
#[must_use]
pub fn booking_snapshot(booking: &Booking) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},room_id={},individual_room_id={},payment_status={},total_amount_cents={}",
        booking.status,
        booking.room_id,
        booking
            .individual_room_id
            .map_or_else(|| String::from("none"), |id| id.to_string()),
        booking.payment_status,
        booking.total_amount_cents
    ))
}

#[must_use]
pub fn room_type_snapshot(room_type: &RoomType) -> StateSnapshot {
    StateSnapshot::new(format!(
        "name={},price_per_night_cents={},max_guests={},total_rooms={},rooms_available={},is_active={}",
        room_type.name,
        room_type.price_per_night_cents,
        room_type.max_guests,
        room_type.total_rooms,
        room_type.rooms_available,
        room_type.is_active
    ))
}

#[must_use]
pub fn room_snapshot(room: &IndividualRoom) -> StateSnapshot {
    StateSnapshot::new(format!(
        "room_number={},room_id={},status={}",
        room.room_number, room.room_id, room.status
    ))
}
