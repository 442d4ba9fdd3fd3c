// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to domain values.
//!
//! Dates are stored as `YYYY-MM-DD` text and timestamps as RFC 3339 UTC
//! text. Flags are stored as `0`/`1` integers.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

use innkeep_domain::{
    Booking, BookingStatus, GuestInfo, IndividualRoom, Payment, PaymentMethod, PaymentStatus,
    RoomStatus, RoomType, StayDates, parse_iso_date,
};

use crate::diesel_schema::{
    booking_timeline_logs, bookings, individual_rooms, payments, room_maintenance_log, rooms,
    tentative_booking_log,
};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub role: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// A stored audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub event_id: i64,
    pub event: innkeep_audit::AuditEvent,
    pub created_at: OffsetDateTime,
}

/// One entry of a booking's timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub log_id: i64,
    pub event_id: i64,
    pub action: String,
    pub from_status: BookingStatus,
    pub to_status: BookingStatus,
    pub actor_id: String,
    pub message: String,
    pub created_at: OffsetDateTime,
}

/// One entry of a booking's tentative hold history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TentativeLogRecord {
    pub log_id: i64,
    pub action: String,
    pub expires_at: Option<OffsetDateTime>,
    pub actor_id: String,
    pub created_at: OffsetDateTime,
}

/// One housekeeping status change of an individual room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceLogEntry {
    pub log_id: i64,
    pub individual_room_id: i64,
    pub from_status: RoomStatus,
    pub to_status: RoomStatus,
    pub reason: String,
    pub actor_id: String,
    pub created_at: OffsetDateTime,
}

/// A booking as inserted by the external booking flow or seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub reference: String,
    pub guest: GuestInfo,
    pub room_id: i64,
    pub stay: StayDates,
    pub adults: u32,
    pub children: u32,
    pub total_amount_cents: i64,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(value.to_offset(UtcOffset::UTC).format(&Rfc3339)?)
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Invalid timestamp '{value}': {e}"))
    })
}

pub(crate) fn parse_stored_date(value: &str) -> Result<Date, PersistenceError> {
    parse_iso_date(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

fn parse_stored<T, E>(value: &str) -> Result<T, PersistenceError>
where
    T: std::str::FromStr<Err = E>,
    E: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

pub(crate) fn to_count(value: i32, column: &str) -> Result<u32, PersistenceError> {
    value.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("{column} out of range: {value}"))
    })
}

pub(crate) fn to_column(value: u32, column: &str) -> Result<i32, PersistenceError> {
    value.to_i32().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("{column} out of range: {value}"))
    })
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = rooms)]
pub(crate) struct RoomTypeRow {
    room_id: i64,
    name: String,
    description: Option<String>,
    price_per_night_cents: i64,
    max_guests: i32,
    total_rooms: i32,
    rooms_available: i32,
    is_active: i32,
}

impl RoomTypeRow {
    pub(crate) fn into_domain(self) -> Result<RoomType, PersistenceError> {
        Ok(RoomType {
            room_id: self.room_id,
            name: self.name,
            description: self.description,
            price_per_night_cents: self.price_per_night_cents,
            max_guests: to_count(self.max_guests, "max_guests")?,
            total_rooms: to_count(self.total_rooms, "total_rooms")?,
            rooms_available: to_count(self.rooms_available, "rooms_available")?,
            is_active: self.is_active != 0,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = individual_rooms)]
pub(crate) struct IndividualRoomRow {
    individual_room_id: i64,
    room_id: i64,
    room_number: String,
    floor: Option<i32>,
    status: String,
    notes: Option<String>,
}

impl IndividualRoomRow {
    pub(crate) fn into_domain(self) -> Result<IndividualRoom, PersistenceError> {
        Ok(IndividualRoom {
            individual_room_id: self.individual_room_id,
            room_id: self.room_id,
            room_number: self.room_number,
            floor: self.floor,
            status: parse_stored::<RoomStatus, _>(&self.status)?,
            notes: self.notes,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = bookings)]
pub(crate) struct BookingRow {
    booking_id: i64,
    reference: String,
    guest_name: String,
    guest_email: String,
    guest_phone: Option<String>,
    guest_country: Option<String>,
    room_id: i64,
    individual_room_id: Option<i64>,
    check_in_date: String,
    check_out_date: String,
    adults: i32,
    children: i32,
    total_amount_cents: i64,
    status: String,
    is_tentative: i32,
    tentative_expires_at: Option<String>,
    payment_status: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl BookingRow {
    pub(crate) fn into_domain(self) -> Result<Booking, PersistenceError> {
        let stay = StayDates::new(
            parse_stored_date(&self.check_in_date)?,
            parse_stored_date(&self.check_out_date)?,
        )
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        let status = parse_stored::<BookingStatus, _>(&self.status)?;
        if (self.is_tentative != 0) != (status == BookingStatus::Tentative) {
            return Err(PersistenceError::ReconstructionError(format!(
                "Booking {} has is_tentative={} with status {status}",
                self.reference, self.is_tentative
            )));
        }

        Ok(Booking {
            booking_id: self.booking_id,
            reference: self.reference,
            guest: GuestInfo {
                name: self.guest_name,
                email: self.guest_email,
                phone: self.guest_phone,
                country: self.guest_country,
            },
            room_id: self.room_id,
            individual_room_id: self.individual_room_id,
            stay,
            adults: to_count(self.adults, "adults")?,
            children: to_count(self.children, "children")?,
            total_amount_cents: self.total_amount_cents,
            status,
            tentative_expires_at: self
                .tentative_expires_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            payment_status: parse_stored::<PaymentStatus, _>(&self.payment_status)?,
            notes: self.notes,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = payments)]
pub(crate) struct PaymentRow {
    payment_id: i64,
    booking_id: i64,
    amount_cents: i64,
    method: String,
    transaction_reference: Option<String>,
    recorded_by: String,
    paid_at: String,
}

impl PaymentRow {
    pub(crate) fn into_domain(self) -> Result<Payment, PersistenceError> {
        Ok(Payment {
            payment_id: self.payment_id,
            booking_id: self.booking_id,
            amount_cents: self.amount_cents,
            method: parse_stored::<PaymentMethod, _>(&self.method)?,
            transaction_reference: self.transaction_reference,
            recorded_by: self.recorded_by,
            paid_at: parse_timestamp(&self.paid_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = booking_timeline_logs)]
pub(crate) struct TimelineRow {
    log_id: i64,
    event_id: i64,
    action: String,
    from_status: String,
    to_status: String,
    actor_id: String,
    message: String,
    created_at: String,
}

impl TimelineRow {
    pub(crate) fn into_record(self) -> Result<TimelineEntry, PersistenceError> {
        Ok(TimelineEntry {
            log_id: self.log_id,
            event_id: self.event_id,
            action: self.action,
            from_status: parse_stored::<BookingStatus, _>(&self.from_status)?,
            to_status: parse_stored::<BookingStatus, _>(&self.to_status)?,
            actor_id: self.actor_id,
            message: self.message,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = tentative_booking_log)]
pub(crate) struct TentativeLogRow {
    log_id: i64,
    action: String,
    expires_at: Option<String>,
    actor_id: String,
    created_at: String,
}

impl TentativeLogRow {
    pub(crate) fn into_record(self) -> Result<TentativeLogRecord, PersistenceError> {
        Ok(TentativeLogRecord {
            log_id: self.log_id,
            action: self.action,
            expires_at: self.expires_at.as_deref().map(parse_timestamp).transpose()?,
            actor_id: self.actor_id,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = room_maintenance_log)]
pub(crate) struct MaintenanceLogRow {
    log_id: i64,
    individual_room_id: i64,
    from_status: String,
    to_status: String,
    reason: String,
    actor_id: String,
    created_at: String,
}

impl MaintenanceLogRow {
    pub(crate) fn into_record(self) -> Result<MaintenanceLogEntry, PersistenceError> {
        Ok(MaintenanceLogEntry {
            log_id: self.log_id,
            individual_room_id: self.individual_room_id,
            from_status: parse_stored::<RoomStatus, _>(&self.from_status)?,
            to_status: parse_stored::<RoomStatus, _>(&self.to_status)?,
            reason: self.reason,
            actor_id: self.actor_id,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}
