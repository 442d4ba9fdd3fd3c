// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use innkeep::{
    RoomCreation, RoomDraft, RoomStatusTransition, RoomTypeCreation, RoomTypeDraft,
    RoomTypeTransition, apply_create_room, apply_create_room_type, apply_room_status_change,
    apply_update_room_type,
};
use innkeep_audit::{AuditSubject, Cause};
use innkeep_domain::{IndividualRoom, RoomStatus, RoomType};
use innkeep_persistence::{Persistence, RoomFilter};
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    CreateRoomRequest, ListRoomsQuery, MaintenanceLogInfo, MaintenanceLogResponse, RoomInfo,
    RoomResponse, RoomStatusRequest, RoomTypeInfo, RoomTypeRequest, RoomTypeResponse,
};
use crate::services::HotelServices;

fn draft_from_request(request: RoomTypeRequest) -> RoomTypeDraft {
    RoomTypeDraft {
        name: request.name,
        description: request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        price_per_night_cents: request.price_per_night_cents,
        max_guests: request.max_guests,
        total_rooms: request.total_rooms,
        is_active: request.is_active,
    }
}

fn ensure_unique_room_type_name(
    persistence: &mut Persistence,
    name: &str,
    excluding_room_id: Option<i64>,
) -> Result<(), ApiError> {
    let name = name.trim();
    if persistence
        .room_type_name_exists(name, excluding_room_id)
        .map_err(translate_persistence_error)?
    {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("unique_room_type_name"),
            message: format!("A room type named '{name}' already exists"),
        });
    }
    Ok(())
}

/// The id of the newest audit event recorded for `subject`.
fn latest_event_id(persistence: &mut Persistence, subject: AuditSubject) -> Result<i64, ApiError> {
    persistence
        .get_audit_events_for_subject(subject)
        .map_err(translate_persistence_error)?
        .iter()
        .map(|record| record.event_id)
        .max()
        .ok_or_else(|| ApiError::Internal {
            message: format!(
                "No audit event recorded for {} {}",
                subject.subject_type(),
                subject.subject_id()
            ),
        })
}

/// Lists every room type.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_room_types(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<RoomTypeInfo>, ApiError> {
    AuthorizationService::authorize_booking_action(authenticated_actor)?;
    let room_types: Vec<RoomType> = persistence
        .list_room_types()
        .map_err(translate_persistence_error)?;
    Ok(room_types.iter().map(RoomTypeInfo::from).collect())
}

/// Creates a room type with every room available.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `services` - Provides the clock
/// * `request` - The room type attributes
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - the actor is not a manager
/// - a field is invalid
/// - another room type already uses the name
pub fn create_room_type(
    persistence: &mut Persistence,
    services: &HotelServices,
    request: RoomTypeRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<RoomTypeResponse, ApiError> {
    AuthorizationService::authorize_manage_inventory(authenticated_actor)?;
    ensure_unique_room_type_name(persistence, &request.name, None)?;

    let creation: RoomTypeCreation = apply_create_room_type(
        draft_from_request(request),
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;
    let room_id: i64 = persistence
        .persist_room_type_creation(&creation, services.now())
        .map_err(translate_persistence_error)?;

    let mut room_type: RoomType = creation.room_type;
    room_type.room_id = room_id;
    let event_id = latest_event_id(persistence, AuditSubject::RoomType(room_id))?;

    Ok(RoomTypeResponse {
        room_type: RoomTypeInfo::from(&room_type),
        event_id,
    })
}

/// Updates a room type's attributes.
///
/// Changing `total_rooms` shifts `rooms_available` by the same amount, so
/// units already held by bookings stay held.
///
/// # Errors
///
/// Returns an error if:
/// - the actor is not a manager
/// - the room type does not exist
/// - a field is invalid or another room type uses the name
/// - shrinking would leave availability negative
/// - the room type changed since it was read
pub fn update_room_type(
    persistence: &mut Persistence,
    services: &HotelServices,
    room_id: i64,
    request: RoomTypeRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<RoomTypeResponse, ApiError> {
    AuthorizationService::authorize_manage_inventory(authenticated_actor)?;

    let current: RoomType = persistence
        .get_room_type(room_id)
        .map_err(translate_persistence_error)?;
    ensure_unique_room_type_name(persistence, &request.name, Some(room_id))?;

    let transition: RoomTypeTransition = apply_update_room_type(
        &current,
        draft_from_request(request),
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(|err| {
        warn!(room_id, error = %err, "Room type update rejected");
        translate_core_error(err)
    })?;
    let event_id: i64 = persistence
        .persist_room_type_update(&transition, services.now())
        .map_err(translate_persistence_error)?;

    Ok(RoomTypeResponse {
        room_type: RoomTypeInfo::from(&transition.new_room_type),
        event_id,
    })
}

/// Lists individual rooms, ordered by room number.
///
/// # Errors
///
/// Returns an error if the status filter is unknown or the database cannot
/// be queried.
pub fn list_rooms(
    persistence: &mut Persistence,
    query: &ListRoomsQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<RoomInfo>, ApiError> {
    AuthorizationService::authorize_room_status(authenticated_actor)?;

    let status: Option<RoomStatus> = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<RoomStatus>)
        .transpose()
        .map_err(translate_domain_error)?;
    let rooms: Vec<IndividualRoom> = persistence
        .list_individual_rooms(RoomFilter {
            room_id: query.room_id,
            status,
        })
        .map_err(translate_persistence_error)?;
    debug!(count = rooms.len(), "Listed rooms");

    Ok(rooms.iter().map(RoomInfo::from).collect())
}

/// Adds an individual room to a room type.
///
/// # Errors
///
/// Returns an error if:
/// - the actor is not a manager
/// - the room type does not exist
/// - the room number is blank or already taken
pub fn create_room(
    persistence: &mut Persistence,
    services: &HotelServices,
    request: CreateRoomRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<RoomResponse, ApiError> {
    AuthorizationService::authorize_manage_inventory(authenticated_actor)?;

    let room_type: RoomType = persistence
        .get_room_type(request.room_id)
        .map_err(translate_persistence_error)?;
    let number_taken: bool = persistence
        .room_number_exists(request.room_number.trim())
        .map_err(translate_persistence_error)?;

    let creation: RoomCreation = apply_create_room(
        RoomDraft {
            room_id: request.room_id,
            room_number: request.room_number,
            floor: request.floor,
            notes: request.notes,
        },
        &room_type,
        number_taken,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;
    let individual_room_id: i64 = persistence
        .persist_room_creation(&creation, services.now())
        .map_err(translate_persistence_error)?;

    let mut room: IndividualRoom = creation.room;
    room.individual_room_id = individual_room_id;
    let event_id = latest_event_id(
        persistence,
        AuditSubject::IndividualRoom(individual_room_id),
    )?;

    Ok(RoomResponse {
        room: RoomInfo::from(&room),
        event_id,
    })
}

/// Changes an individual room's housekeeping status.
///
/// # Errors
///
/// Returns an error if:
/// - the room does not exist or the status is unknown
/// - the status is `occupied` (only check-in occupies a room)
/// - a checked-in guest is in the room
/// - the room changed since it was read
pub fn set_room_status(
    persistence: &mut Persistence,
    services: &HotelServices,
    individual_room_id: i64,
    request: RoomStatusRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<RoomResponse, ApiError> {
    AuthorizationService::authorize_room_status(authenticated_actor)?;

    let new_status: RoomStatus = request
        .status
        .trim()
        .parse()
        .map_err(translate_domain_error)?;
    let room: IndividualRoom = persistence
        .get_individual_room(individual_room_id)
        .map_err(translate_persistence_error)?;
    let occupant = persistence
        .find_checked_in_occupant(individual_room_id)
        .map_err(translate_persistence_error)?;

    let transition: RoomStatusTransition = apply_room_status_change(
        &room,
        new_status,
        occupant.as_ref(),
        request.reason,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(|err| {
        warn!(individual_room_id, error = %err, "Room status change rejected");
        translate_core_error(err)
    })?;
    let event_id: i64 = persistence
        .persist_room_status_change(&transition, services.now())
        .map_err(translate_persistence_error)?;

    info!(
        individual_room_id,
        room_number = %room.room_number,
        from = %room.status,
        to = %new_status,
        "Room status changed"
    );

    Ok(RoomResponse {
        room: RoomInfo::from(&transition.new_room),
        event_id,
    })
}

/// Returns a room's housekeeping history, newest first.
///
/// # Errors
///
/// Returns an error if the room does not exist.
pub fn get_maintenance_log(
    persistence: &mut Persistence,
    individual_room_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MaintenanceLogResponse, ApiError> {
    AuthorizationService::authorize_room_status(authenticated_actor)?;

    let room: IndividualRoom = persistence
        .get_individual_room(individual_room_id)
        .map_err(translate_persistence_error)?;
    let entries = persistence
        .get_maintenance_log(individual_room_id)
        .map_err(translate_persistence_error)?;

    Ok(MaintenanceLogResponse {
        room: RoomInfo::from(&room),
        entries: entries
            .iter()
            .map(MaintenanceLogInfo::from_entry)
            .collect::<Result<_, _>>()?,
    })
}
