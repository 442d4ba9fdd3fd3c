// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Room type and individual room queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use innkeep_domain::{IndividualRoom, RoomStatus, RoomType};

use crate::data_models::{IndividualRoomRow, RoomTypeRow};
use crate::diesel_schema::{individual_rooms, rooms};
use crate::error::PersistenceError;

/// Filters for the individual room list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomFilter {
    pub room_id: Option<i64>,
    pub status: Option<RoomStatus>,
}

backend_fn! {
/// Retrieves a room type by ID.
///
/// # Errors
///
/// Returns `PersistenceError::RoomTypeNotFound` if no such room type exists.
pub fn get_room_type(conn: &mut _, room_id: i64) -> Result<RoomType, PersistenceError> {
    let result = rooms::table
        .filter(rooms::room_id.eq(room_id))
        .select(RoomTypeRow::as_select())
        .first::<RoomTypeRow>(conn);

    match result {
        Ok(row) => row.into_domain(),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::RoomTypeNotFound(room_id)),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists every room type ordered by name.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_room_types(conn: &mut _) -> Result<Vec<RoomType>, PersistenceError> {
    rooms::table
        .order(rooms::name.asc())
        .select(RoomTypeRow::as_select())
        .load::<RoomTypeRow>(conn)?
        .into_iter()
        .map(RoomTypeRow::into_domain)
        .collect()
}
}

backend_fn! {
/// Checks whether another room type already uses `name`.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn room_type_name_exists(
    conn: &mut _,
    name: &str,
    excluding_room_id: Option<i64>,
) -> Result<bool, PersistenceError> {
    let ids: Vec<i64> = rooms::table
        .filter(rooms::name.eq(name))
        .select(rooms::room_id)
        .load::<i64>(conn)?;
    Ok(ids.into_iter().any(|id| Some(id) != excluding_room_id))
}
}

backend_fn! {
/// Retrieves an individual room by ID.
///
/// # Errors
///
/// Returns `PersistenceError::RoomNotFound` if no such room exists.
pub fn get_individual_room(
    conn: &mut _,
    individual_room_id: i64,
) -> Result<IndividualRoom, PersistenceError> {
    debug!(individual_room_id, "Loading individual room");

    let result = individual_rooms::table
        .filter(individual_rooms::individual_room_id.eq(individual_room_id))
        .select(IndividualRoomRow::as_select())
        .first::<IndividualRoomRow>(conn);

    match result {
        Ok(row) => row.into_domain(),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::RoomNotFound(individual_room_id))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists individual rooms matching a filter.
///
/// Rooms are ordered by room number, shorter numbers first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_individual_rooms(
    conn: &mut _,
    filter: RoomFilter,
) -> Result<Vec<IndividualRoom>, PersistenceError> {
    let mut query = individual_rooms::table
        .select(IndividualRoomRow::as_select())
        .into_boxed();
    if let Some(room_id) = filter.room_id {
        query = query.filter(individual_rooms::room_id.eq(room_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(individual_rooms::status.eq(status.as_str()));
    }

    let mut rooms: Vec<IndividualRoom> = query
        .order(individual_rooms::individual_room_id.asc())
        .load::<IndividualRoomRow>(conn)?
        .into_iter()
        .map(IndividualRoomRow::into_domain)
        .collect::<Result<_, _>>()?;
    rooms.sort_by(|a, b| {
        (a.room_number.len(), &a.room_number).cmp(&(b.room_number.len(), &b.room_number))
    });
    Ok(rooms)
}
}

backend_fn! {
/// Checks whether an individual room with `room_number` exists.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn room_number_exists(conn: &mut _, room_number: &str) -> Result<bool, PersistenceError> {
    let count: i64 = individual_rooms::table
        .filter(individual_rooms::room_number.eq(room_number))
        .count()
        .get_result::<i64>(conn)?;
    Ok(count > 0)
}
}
