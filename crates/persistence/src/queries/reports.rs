// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Raw rows for the operational report.
//!
//! Aggregation happens in `innkeep_domain::build_report`; these queries
//! only select the rows a report range touches.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use innkeep_domain::{Booking, Payment, ReportRange, ReportRoomType, format_iso_date};

use crate::data_models::{BookingRow, PaymentRow, RoomTypeRow};
use crate::diesel_schema::{bookings, payments, rooms};
use crate::error::PersistenceError;

backend_fn! {
/// Loads every booking whose stay overlaps the range, in any status.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_report_bookings(
    conn: &mut _,
    range: &ReportRange,
) -> Result<Vec<Booking>, PersistenceError> {
    let bookings: Vec<Booking> = bookings::table
        .filter(bookings::check_in_date.lt(format_iso_date(range.end())))
        .filter(bookings::check_out_date.gt(format_iso_date(range.start())))
        .select(BookingRow::as_select())
        .load::<BookingRow>(conn)?
        .into_iter()
        .map(BookingRow::into_domain)
        .collect::<Result<_, _>>()?;

    debug!(count = bookings.len(), "Loaded report bookings");
    Ok(bookings)
}
}

backend_fn! {
/// Loads every room type with its inventory size.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_report_room_types(conn: &mut _) -> Result<Vec<ReportRoomType>, PersistenceError> {
    rooms::table
        .order(rooms::room_id.asc())
        .select(RoomTypeRow::as_select())
        .load::<RoomTypeRow>(conn)?
        .into_iter()
        .map(|row| {
            row.into_domain().map(|room_type| ReportRoomType {
                room_id: room_type.room_id,
                name: room_type.name,
                total_rooms: room_type.total_rooms,
            })
        })
        .collect()
}
}

backend_fn! {
/// Loads the payments made from the UTC day before the range starts up to
/// the UTC day after it ends.
///
/// A hotel-local date is never more than a day from the UTC date, so the
/// result holds every payment made on a local date inside the range. The
/// caller picks those out by local date.
///
/// `paid_at` is RFC 3339 UTC text, so comparing it against ISO dates
/// selects whole UTC days.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_report_payments(
    conn: &mut _,
    range: &ReportRange,
) -> Result<Vec<Payment>, PersistenceError> {
    let from = range.start().previous_day().unwrap_or(range.start());
    let until = range.end().next_day().unwrap_or(range.end());

    payments::table
        .filter(payments::paid_at.ge(format_iso_date(from)))
        .filter(payments::paid_at.lt(format_iso_date(until)))
        .order(payments::payment_id.asc())
        .select(PaymentRow::as_select())
        .load::<PaymentRow>(conn)?
        .into_iter()
        .map(PaymentRow::into_domain)
        .collect()
}
}
