// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Room type and individual room mutations.
//!
//! Created entities have no database identifier yet: the audit subject of
//! a creation carries id `0` and persistence fills in the assigned id
//! before writing the event.

use crate::error::CoreError;
use crate::state::{RoomStatusChange, room_snapshot, room_type_snapshot};
use innkeep_audit::{Action, Actor, AuditEvent, AuditSubject, Cause, StateSnapshot};
use innkeep_domain::{
    Booking, DomainError, IndividualRoom, RoomStatus, RoomType, validate_inventory_change,
    validate_room_fields, validate_room_status_change, validate_room_type_fields,
};

/// Operator-supplied room type attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTypeDraft {
    pub name: String,
    pub description: Option<String>,
    pub price_per_night_cents: i64,
    pub max_guests: u32,
    pub total_rooms: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTypeCreation {
    /// The room type to insert; `room_id` is unassigned.
    pub room_type: RoomType,
    pub audit_event: AuditEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTypeTransition {
    pub previous: RoomType,
    pub new_room_type: RoomType,
    pub audit_event: AuditEvent,
}

/// Operator-supplied individual room attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDraft {
    pub room_id: i64,
    pub room_number: String,
    pub floor: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCreation {
    /// The room to insert; `individual_room_id` is unassigned.
    pub room: IndividualRoom,
    pub audit_event: AuditEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomStatusTransition {
    pub new_room: IndividualRoom,
    pub change: RoomStatusChange,
    pub audit_event: AuditEvent,
}

/// Validates and prepares a new room type.
///
/// A new room type starts with every room available.
///
/// # Errors
///
/// Returns an error if a field is invalid.
pub fn apply_create_room_type(
    draft: RoomTypeDraft,
    actor: Actor,
    cause: Cause,
) -> Result<RoomTypeCreation, CoreError> {
    let name = draft.name.trim().to_string();
    validate_room_type_fields(&name, draft.price_per_night_cents, draft.max_guests)?;

    let room_type = RoomType {
        room_id: 0,
        name,
        description: draft.description,
        price_per_night_cents: draft.price_per_night_cents,
        max_guests: draft.max_guests,
        total_rooms: draft.total_rooms,
        rooms_available: draft.total_rooms,
        is_active: draft.is_active,
    };

    let action: Action = Action::new(
        String::from("CreateRoomType"),
        Some(format!(
            "Created room type '{}' with {} rooms",
            room_type.name, room_type.total_rooms
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        AuditSubject::RoomType(0),
        actor,
        cause,
        action,
        StateSnapshot::new(String::from("none")),
        room_type_snapshot(&room_type),
    );

    Ok(RoomTypeCreation {
        room_type,
        audit_event,
    })
}

/// Applies new attributes to a room type.
///
/// Changing `total_rooms` shifts `rooms_available` by the same delta so
/// units held by bookings stay held.
///
/// # Errors
///
/// Returns an error if a field is invalid or availability would become
/// negative.
pub fn apply_update_room_type(
    current: &RoomType,
    draft: RoomTypeDraft,
    actor: Actor,
    cause: Cause,
) -> Result<RoomTypeTransition, CoreError> {
    let name = draft.name.trim().to_string();
    validate_room_type_fields(&name, draft.price_per_night_cents, draft.max_guests)?;
    let rooms_available = validate_inventory_change(current, draft.total_rooms)?;

    let new_room_type = RoomType {
        room_id: current.room_id,
        name,
        description: draft.description,
        price_per_night_cents: draft.price_per_night_cents,
        max_guests: draft.max_guests,
        total_rooms: draft.total_rooms,
        rooms_available,
        is_active: draft.is_active,
    };

    let action: Action = Action::new(
        String::from("UpdateRoomType"),
        Some(format!("Updated room type '{}'", new_room_type.name)),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        AuditSubject::RoomType(current.room_id),
        actor,
        cause,
        action,
        room_type_snapshot(current),
        room_type_snapshot(&new_room_type),
    );

    Ok(RoomTypeTransition {
        previous: current.clone(),
        new_room_type,
        audit_event,
    })
}

/// Validates and prepares a new individual room.
///
/// # Errors
///
/// Returns an error if the room number is invalid or already taken, or the
/// room type does not match the draft.
pub fn apply_create_room(
    draft: RoomDraft,
    room_type: &RoomType,
    number_taken: bool,
    actor: Actor,
    cause: Cause,
) -> Result<RoomCreation, CoreError> {
    let room_number = draft.room_number.trim().to_string();
    validate_room_fields(&room_number)?;
    if number_taken {
        return Err(CoreError::DomainViolation(
            DomainError::DuplicateRoomNumber { room_number },
        ));
    }
    if room_type.room_id != draft.room_id {
        return Err(CoreError::DomainViolation(DomainError::InvalidRoom(format!(
            "room type {} does not match the requested room type {}",
            room_type.room_id, draft.room_id
        ))));
    }

    let room = IndividualRoom {
        individual_room_id: 0,
        room_id: room_type.room_id,
        room_number,
        floor: draft.floor,
        status: RoomStatus::Available,
        notes: draft.notes,
    };

    let action: Action = Action::new(
        String::from("CreateRoom"),
        Some(format!(
            "Created room {} in room type '{}'",
            room.room_number, room_type.name
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        AuditSubject::IndividualRoom(0),
        actor,
        cause,
        action,
        StateSnapshot::new(String::from("none")),
        room_snapshot(&room),
    );

    Ok(RoomCreation { room, audit_event })
}

/// Changes an individual room's housekeeping status.
///
/// `occupant` is the checked-in booking assigned to the room, if any.
///
/// # Errors
///
/// Returns an error if the change would mark the room occupied or the room
/// is in use by an in-house guest.
pub fn apply_room_status_change(
    room: &IndividualRoom,
    new_status: RoomStatus,
    occupant: Option<&Booking>,
    reason: Option<String>,
    actor: Actor,
    cause: Cause,
) -> Result<RoomStatusTransition, CoreError> {
    validate_room_status_change(room, new_status, occupant)?;

    let mut new_room = room.clone();
    new_room.status = new_status;
    let reason = reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| format!("Status set to {new_status}"));

    let change = RoomStatusChange {
        individual_room_id: room.individual_room_id,
        room_number: room.room_number.clone(),
        from: room.status,
        to: new_status,
        reason: reason.clone(),
    };

    let action: Action = Action::new(
        String::from("SetRoomStatus"),
        Some(format!(
            "Room {} changed from {} to {new_status}: {reason}",
            room.room_number, room.status
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        AuditSubject::IndividualRoom(room.individual_room_id),
        actor,
        cause,
        action,
        room_snapshot(room),
        room_snapshot(&new_room),
    );

    Ok(RoomStatusTransition {
        new_room,
        change,
        audit_event,
    })
}
