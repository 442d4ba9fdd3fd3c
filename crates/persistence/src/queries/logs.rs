// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Append-only log queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::{
    MaintenanceLogEntry, MaintenanceLogRow, TentativeLogRecord, TentativeLogRow, TimelineEntry,
    TimelineRow,
};
use crate::diesel_schema::{booking_timeline_logs, room_maintenance_log, tentative_booking_log};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a booking's timeline, oldest first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_booking_timeline(
    conn: &mut _,
    booking_id: i64,
) -> Result<Vec<TimelineEntry>, PersistenceError> {
    booking_timeline_logs::table
        .filter(booking_timeline_logs::booking_id.eq(booking_id))
        .order(booking_timeline_logs::log_id.asc())
        .select(TimelineRow::as_select())
        .load::<TimelineRow>(conn)?
        .into_iter()
        .map(TimelineRow::into_record)
        .collect()
}
}

backend_fn! {
/// Retrieves a booking's tentative hold history, oldest first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_tentative_log(
    conn: &mut _,
    booking_id: i64,
) -> Result<Vec<TentativeLogRecord>, PersistenceError> {
    tentative_booking_log::table
        .filter(tentative_booking_log::booking_id.eq(booking_id))
        .order(tentative_booking_log::log_id.asc())
        .select(TentativeLogRow::as_select())
        .load::<TentativeLogRow>(conn)?
        .into_iter()
        .map(TentativeLogRow::into_record)
        .collect()
}
}

backend_fn! {
/// Retrieves a room's status history, newest first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_maintenance_log(
    conn: &mut _,
    individual_room_id: i64,
) -> Result<Vec<MaintenanceLogEntry>, PersistenceError> {
    room_maintenance_log::table
        .filter(room_maintenance_log::individual_room_id.eq(individual_room_id))
        .order(room_maintenance_log::log_id.desc())
        .select(MaintenanceLogRow::as_select())
        .load::<MaintenanceLogRow>(conn)?
        .into_iter()
        .map(MaintenanceLogRow::into_record)
        .collect()
}
}

backend_fn! {
/// Counts the cancellation log rows written for a booking.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn count_cancellations(conn: &mut _, booking_id: i64) -> Result<i64, PersistenceError> {
    Ok(crate::diesel_schema::cancellation_log::table
        .filter(crate::diesel_schema::cancellation_log::booking_id.eq(booking_id))
        .count()
        .get_result::<i64>(conn)?)
}
}
