// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Room type and individual room mutations.
//!
//! Availability and room status writes are guarded so that a concurrent
//! change between read and write aborts the surrounding transaction
//! instead of overwriting it.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::OffsetDateTime;
use tracing::{info, warn};

use innkeep::{
    InventoryAdjustment, RoomCreation, RoomStatusChange, RoomStatusTransition, RoomTypeCreation,
    RoomTypeTransition,
};
use innkeep_audit::AuditSubject;
use innkeep_domain::{IndividualRoom, RoomType};

use crate::backend::PersistenceBackend;
use crate::data_models::{format_timestamp, to_column};
use crate::diesel_schema::{individual_rooms, room_maintenance_log, rooms};
use crate::error::PersistenceError;
use crate::mutations::audit::{persist_audit_event_mysql, persist_audit_event_sqlite};

backend_fn! {
/// Applies one availability adjustment to a room type.
///
/// A hold only succeeds while `rooms_available > 0`, so two concurrent
/// holds on the last unit cannot both succeed.
///
/// # Errors
///
/// Returns `PersistenceError::InventoryExhausted` if a hold finds no
/// availability left, or `PersistenceError::InventoryAtCapacity` if a
/// release finds every room already available.
pub fn apply_inventory_adjustment(
    conn: &mut _,
    adjustment: InventoryAdjustment,
) -> Result<(), PersistenceError> {
    match adjustment {
        InventoryAdjustment::Hold { room_id } => {
            let updated: usize = diesel::update(
                rooms::table
                    .filter(rooms::room_id.eq(room_id))
                    .filter(rooms::rooms_available.gt(0)),
            )
            .set(rooms::rooms_available.eq(rooms::rooms_available - 1))
            .execute(conn)?;
            if updated == 0 {
                warn!(room_id, "Room type has no availability left");
                return Err(PersistenceError::InventoryExhausted { room_id });
            }
        }
        InventoryAdjustment::Release { room_id } => {
            let updated: usize = diesel::update(
                rooms::table
                    .filter(rooms::room_id.eq(room_id))
                    .filter(rooms::rooms_available.lt(rooms::total_rooms)),
            )
            .set(rooms::rooms_available.eq(rooms::rooms_available + 1))
            .execute(conn)?;
            if updated == 0 {
                warn!(room_id, "Room type availability already at capacity");
                return Err(PersistenceError::InventoryAtCapacity { room_id });
            }
        }
    }
    Ok(())
}
}

backend_fn! {
/// Changes an individual room's status if it still has the status that
/// was read, and records the change in the maintenance log.
///
/// # Errors
///
/// Returns `PersistenceError::ConcurrentModification` if the room's status
/// changed since it was read.
pub fn apply_room_status_change(
    conn: &mut _,
    change: &RoomStatusChange,
    actor_id: &str,
    created_at: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        individual_rooms::table
            .filter(individual_rooms::individual_room_id.eq(change.individual_room_id))
            .filter(individual_rooms::status.eq(change.from.as_str())),
    )
    .set(individual_rooms::status.eq(change.to.as_str()))
    .execute(conn)?;
    if updated == 0 {
        warn!(
            individual_room_id = change.individual_room_id,
            expected = change.from.as_str(),
            "Room status changed concurrently"
        );
        return Err(PersistenceError::ConcurrentModification {
            entity: String::from("room"),
            id: change.individual_room_id,
        });
    }

    diesel::insert_into(room_maintenance_log::table)
        .values((
            room_maintenance_log::individual_room_id.eq(change.individual_room_id),
            room_maintenance_log::from_status.eq(change.from.as_str()),
            room_maintenance_log::to_status.eq(change.to.as_str()),
            room_maintenance_log::reason.eq(&change.reason),
            room_maintenance_log::actor_id.eq(actor_id),
            room_maintenance_log::created_at.eq(created_at),
        ))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Inserts a room type.
///
/// # Returns
///
/// The room type ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_room_type(conn: &mut _, room_type: &RoomType) -> Result<i64, PersistenceError> {
    diesel::insert_into(rooms::table)
        .values((
            rooms::name.eq(&room_type.name),
            rooms::description.eq(room_type.description.as_deref()),
            rooms::price_per_night_cents.eq(room_type.price_per_night_cents),
            rooms::max_guests.eq(to_column(room_type.max_guests, "max_guests")?),
            rooms::total_rooms.eq(to_column(room_type.total_rooms, "total_rooms")?),
            rooms::rooms_available.eq(to_column(room_type.rooms_available, "rooms_available")?),
            rooms::is_active.eq(i32::from(room_type.is_active)),
        ))
        .execute(conn)?;
    conn.get_last_insert_rowid()
}
}

backend_fn! {
/// Writes new room type attributes if the inventory counts are still the
/// ones that were read.
///
/// # Errors
///
/// Returns `PersistenceError::ConcurrentModification` if the room type's
/// inventory changed since it was read.
pub fn update_room_type(
    conn: &mut _,
    previous: &RoomType,
    next: &RoomType,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        rooms::table
            .filter(rooms::room_id.eq(previous.room_id))
            .filter(rooms::total_rooms.eq(to_column(previous.total_rooms, "total_rooms")?))
            .filter(
                rooms::rooms_available.eq(to_column(previous.rooms_available, "rooms_available")?),
            ),
    )
    .set((
        rooms::name.eq(&next.name),
        rooms::description.eq(next.description.as_deref()),
        rooms::price_per_night_cents.eq(next.price_per_night_cents),
        rooms::max_guests.eq(to_column(next.max_guests, "max_guests")?),
        rooms::total_rooms.eq(to_column(next.total_rooms, "total_rooms")?),
        rooms::rooms_available.eq(to_column(next.rooms_available, "rooms_available")?),
        rooms::is_active.eq(i32::from(next.is_active)),
    ))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::ConcurrentModification {
            entity: String::from("room type"),
            id: previous.room_id,
        });
    }
    Ok(())
}
}

backend_fn! {
/// Inserts an individual room.
///
/// # Returns
///
/// The individual room ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_individual_room(
    conn: &mut _,
    room: &IndividualRoom,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(individual_rooms::table)
        .values((
            individual_rooms::room_id.eq(room.room_id),
            individual_rooms::room_number.eq(&room.room_number),
            individual_rooms::floor.eq(room.floor),
            individual_rooms::status.eq(room.status.as_str()),
            individual_rooms::notes.eq(room.notes.as_deref()),
        ))
        .execute(conn)?;
    conn.get_last_insert_rowid()
}
}

/// Persists a new room type and its audit event - `SQLite` version.
///
/// # Returns
///
/// The room type ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence fails; nothing is written in that case.
pub fn persist_room_type_creation_sqlite(
    conn: &mut SqliteConnection,
    creation: &RoomTypeCreation,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(at)?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let room_id: i64 = insert_room_type_sqlite(conn, &creation.room_type)?;
        persist_audit_event_sqlite(
            conn,
            &creation.audit_event,
            AuditSubject::RoomType(room_id),
            &created_at,
        )?;
        info!(room_id, name = %creation.room_type.name, "Created room type");
        Ok(room_id)
    })
}

/// Persists a new room type and its audit event - `MySQL` version.
///
/// # Returns
///
/// The room type ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence fails; nothing is written in that case.
pub fn persist_room_type_creation_mysql(
    conn: &mut MysqlConnection,
    creation: &RoomTypeCreation,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(at)?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let room_id: i64 = insert_room_type_mysql(conn, &creation.room_type)?;
        persist_audit_event_mysql(
            conn,
            &creation.audit_event,
            AuditSubject::RoomType(room_id),
            &created_at,
        )?;
        info!(room_id, name = %creation.room_type.name, "Created room type");
        Ok(room_id)
    })
}

/// Persists a room type update and its audit event - `SQLite` version.
///
/// # Returns
///
/// The audit event ID.
///
/// # Errors
///
/// Returns an error if persistence fails; nothing is written in that case.
pub fn persist_room_type_update_sqlite(
    conn: &mut SqliteConnection,
    transition: &RoomTypeTransition,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(at)?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        update_room_type_sqlite(conn, &transition.previous, &transition.new_room_type)?;
        let event_id: i64 = persist_audit_event_sqlite(
            conn,
            &transition.audit_event,
            transition.audit_event.subject,
            &created_at,
        )?;
        info!(room_id = transition.previous.room_id, event_id, "Updated room type");
        Ok(event_id)
    })
}

/// Persists a room type update and its audit event - `MySQL` version.
///
/// # Returns
///
/// The audit event ID.
///
/// # Errors
///
/// Returns an error if persistence fails; nothing is written in that case.
pub fn persist_room_type_update_mysql(
    conn: &mut MysqlConnection,
    transition: &RoomTypeTransition,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(at)?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        update_room_type_mysql(conn, &transition.previous, &transition.new_room_type)?;
        let event_id: i64 = persist_audit_event_mysql(
            conn,
            &transition.audit_event,
            transition.audit_event.subject,
            &created_at,
        )?;
        info!(room_id = transition.previous.room_id, event_id, "Updated room type");
        Ok(event_id)
    })
}

/// Persists a new individual room and its audit event - `SQLite` version.
///
/// # Returns
///
/// The individual room ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence fails; nothing is written in that case.
pub fn persist_room_creation_sqlite(
    conn: &mut SqliteConnection,
    creation: &RoomCreation,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(at)?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let individual_room_id: i64 = insert_individual_room_sqlite(conn, &creation.room)?;
        persist_audit_event_sqlite(
            conn,
            &creation.audit_event,
            AuditSubject::IndividualRoom(individual_room_id),
            &created_at,
        )?;
        info!(individual_room_id, room_number = %creation.room.room_number, "Created room");
        Ok(individual_room_id)
    })
}

/// Persists a new individual room and its audit event - `MySQL` version.
///
/// # Returns
///
/// The individual room ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence fails; nothing is written in that case.
pub fn persist_room_creation_mysql(
    conn: &mut MysqlConnection,
    creation: &RoomCreation,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(at)?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let individual_room_id: i64 = insert_individual_room_mysql(conn, &creation.room)?;
        persist_audit_event_mysql(
            conn,
            &creation.audit_event,
            AuditSubject::IndividualRoom(individual_room_id),
            &created_at,
        )?;
        info!(individual_room_id, room_number = %creation.room.room_number, "Created room");
        Ok(individual_room_id)
    })
}

/// Persists a manual room status change - `SQLite` version.
///
/// # Returns
///
/// The audit event ID.
///
/// # Errors
///
/// Returns an error if persistence fails; nothing is written in that case.
pub fn persist_room_status_change_sqlite(
    conn: &mut SqliteConnection,
    transition: &RoomStatusTransition,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(at)?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        apply_room_status_change_sqlite(
            conn,
            &transition.change,
            &transition.audit_event.actor.id,
            &created_at,
        )?;
        let event_id: i64 = persist_audit_event_sqlite(
            conn,
            &transition.audit_event,
            transition.audit_event.subject,
            &created_at,
        )?;
        info!(
            individual_room_id = transition.change.individual_room_id,
            from = transition.change.from.as_str(),
            to = transition.change.to.as_str(),
            "Changed room status"
        );
        Ok(event_id)
    })
}

/// Persists a manual room status change - `MySQL` version.
///
/// # Returns
///
/// The audit event ID.
///
/// # Errors
///
/// Returns an error if persistence fails; nothing is written in that case.
pub fn persist_room_status_change_mysql(
    conn: &mut MysqlConnection,
    transition: &RoomStatusTransition,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(at)?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        apply_room_status_change_mysql(
            conn,
            &transition.change,
            &transition.audit_event.actor.id,
            &created_at,
        )?;
        let event_id: i64 = persist_audit_event_mysql(
            conn,
            &transition.audit_event,
            transition.audit_event.subject,
            &created_at,
        )?;
        info!(
            individual_room_id = transition.change.individual_room_id,
            from = transition.change.from.as_str(),
            to = transition.change.to.as_str(),
            "Changed room status"
        );
        Ok(event_id)
    })
}
