// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking queries.
//!
//! All queries are generated in backend-specific monomorphic versions
//! (`_sqlite` and `_mysql` suffixes) using the `backend_fn!` macro.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::{Date, OffsetDateTime};
use tracing::debug;

use innkeep_domain::{
    Booking, BookingStatus, Payment, RoomOccupancy, StayDates, format_iso_date, sum_amounts,
};

use crate::data_models::{BookingRow, PaymentRow};
use crate::diesel_schema::{bookings, payments};
use crate::error::PersistenceError;

/// Bookings per page when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: u32 = 25;
/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Filters for the booking list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    /// Matched against reference, guest name and guest email.
    pub search: Option<String>,
    /// Earliest check-in date, inclusive.
    pub check_in_from: Option<Date>,
    /// Latest check-in date, inclusive.
    pub check_in_to: Option<Date>,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl BookingFilter {
    /// The page size clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        if self.per_page == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.per_page.min(MAX_PAGE_SIZE)
        }
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * i64::from(self.page_size())
    }

    /// The search text as a `LIKE` pattern, with `\`, `%` and `_` escaped
    /// so they match literally.
    fn search_pattern(&self) -> Option<String> {
        let text = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let mut pattern = String::with_capacity(text.len() + 2);
        pattern.push('%');
        for c in text.chars() {
            if matches!(c, LIKE_ESCAPE | '%' | '_') {
                pattern.push(LIKE_ESCAPE);
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }
}

/// One page of the booking list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPage {
    pub bookings: Vec<Booking>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Escape character for search patterns.
const LIKE_ESCAPE: char = '\\';

/// Statuses that can still hold an individual room.
const NON_TERMINAL: [&str; 4] = ["pending", "tentative", "confirmed", "checked-in"];

/// Applies a `BookingFilter` to a boxed booking query.
macro_rules! filter_bookings {
    ($query:expr, $filter:expr, $pattern:expr) => {{
        let mut query = $query;
        if let Some(status) = $filter.status {
            query = query.filter(bookings::status.eq(status.as_str()));
        }
        if let Some(pattern) = $pattern {
            query = query.filter(
                bookings::reference
                    .like(pattern.clone())
                    .escape(LIKE_ESCAPE)
                    .or(bookings::guest_name.like(pattern.clone()).escape(LIKE_ESCAPE))
                    .or(bookings::guest_email.like(pattern.clone()).escape(LIKE_ESCAPE)),
            );
        }
        if let Some(from) = $filter.check_in_from {
            query = query.filter(bookings::check_in_date.ge(format_iso_date(from)));
        }
        if let Some(to) = $filter.check_in_to {
            query = query.filter(bookings::check_in_date.le(format_iso_date(to)));
        }
        query
    }};
}

backend_fn! {
/// Retrieves a booking by ID.
///
/// # Errors
///
/// Returns `PersistenceError::BookingNotFound` if no such booking exists.
pub fn get_booking(conn: &mut _, booking_id: i64) -> Result<Booking, PersistenceError> {
    debug!(booking_id, "Loading booking");

    let result = bookings::table
        .filter(bookings::booking_id.eq(booking_id))
        .select(BookingRow::as_select())
        .first::<BookingRow>(conn);

    match result {
        Ok(row) => row.into_domain(),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::BookingNotFound(booking_id)),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists bookings matching a filter, newest check-in first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_bookings(
    conn: &mut _,
    filter: &BookingFilter,
) -> Result<BookingPage, PersistenceError> {
    let pattern: Option<String> = filter.search_pattern();

    let total: i64 = filter_bookings!(
        bookings::table.select(diesel::dsl::count_star()).into_boxed(),
        filter,
        pattern.as_ref()
    )
    .first::<i64>(conn)?;

    let rows: Vec<BookingRow> = filter_bookings!(
        bookings::table.select(BookingRow::as_select()).into_boxed(),
        filter,
        pattern.as_ref()
    )
    .order((bookings::check_in_date.desc(), bookings::booking_id.desc()))
    .limit(i64::from(filter.page_size()))
    .offset(filter.offset())
    .load::<BookingRow>(conn)?;

    let bookings: Vec<Booking> = rows
        .into_iter()
        .map(BookingRow::into_domain)
        .collect::<Result<_, _>>()?;

    debug!(total, returned = bookings.len(), "Listed bookings");

    Ok(BookingPage {
        bookings,
        total,
        page: filter.page.max(1),
        per_page: filter.page_size(),
    })
}
}

backend_fn! {
/// Lists every tentative booking.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_tentative_bookings(conn: &mut _) -> Result<Vec<Booking>, PersistenceError> {
    bookings::table
        .filter(bookings::status.eq(BookingStatus::Tentative.as_str()))
        .order(bookings::booking_id.asc())
        .select(BookingRow::as_select())
        .load::<BookingRow>(conn)?
        .into_iter()
        .map(BookingRow::into_domain)
        .collect()
}
}

/// Filters tentative bookings down to those whose hold has lapsed at `now`.
#[must_use]
pub fn lapsed_holds(bookings: Vec<Booking>, now: OffsetDateTime) -> Vec<Booking> {
    bookings
        .into_iter()
        .filter(|b| b.tentative_expires_at.is_none_or(|expires_at| now >= expires_at))
        .collect()
}

backend_fn! {
/// Lists the room assignments of non-terminal bookings whose stay
/// overlaps `stay`.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_occupancies(
    conn: &mut _,
    stay: &StayDates,
) -> Result<Vec<RoomOccupancy>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::individual_room_id.is_not_null())
        .filter(bookings::status.eq_any(NON_TERMINAL))
        .filter(bookings::check_in_date.lt(format_iso_date(stay.check_out())))
        .filter(bookings::check_out_date.gt(format_iso_date(stay.check_in())))
        .select(BookingRow::as_select())
        .load::<BookingRow>(conn)?;

    let mut occupancies: Vec<RoomOccupancy> = Vec::with_capacity(rows.len());
    for row in rows {
        let booking: Booking = row.into_domain()?;
        if let Some(individual_room_id) = booking.individual_room_id {
            occupancies.push(RoomOccupancy {
                individual_room_id,
                booking_id: booking.booking_id,
                reference: booking.reference,
                stay: booking.stay,
            });
        }
    }
    Ok(occupancies)
}
}

backend_fn! {
/// Finds the checked-in booking occupying an individual room.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn find_checked_in_occupant(
    conn: &mut _,
    individual_room_id: i64,
) -> Result<Option<Booking>, PersistenceError> {
    bookings::table
        .filter(bookings::individual_room_id.eq(individual_room_id))
        .filter(bookings::status.eq(BookingStatus::CheckedIn.as_str()))
        .select(BookingRow::as_select())
        .first::<BookingRow>(conn)
        .optional()?
        .map(BookingRow::into_domain)
        .transpose()
}
}

backend_fn! {
/// Lists the payments recorded against a booking, oldest first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_payments(conn: &mut _, booking_id: i64) -> Result<Vec<Payment>, PersistenceError> {
    payments::table
        .filter(payments::booking_id.eq(booking_id))
        .order(payments::payment_id.asc())
        .select(PaymentRow::as_select())
        .load::<PaymentRow>(conn)?
        .into_iter()
        .map(PaymentRow::into_domain)
        .collect()
}
}

backend_fn! {
/// Returns the sum and number of payments recorded against a booking.
///
/// # Errors
///
/// Returns an error if the database cannot be queried, or
/// `PersistenceError::ReconstructionError` if the payments do not sum to
/// an `i64`.
pub fn payment_totals(conn: &mut _, booking_id: i64) -> Result<(i64, u32), PersistenceError> {
    let amounts: Vec<i64> = payments::table
        .filter(payments::booking_id.eq(booking_id))
        .select(payments::amount_cents)
        .load::<i64>(conn)?;

    let count: u32 = u32::try_from(amounts.len()).map_err(|_| {
        PersistenceError::ReconstructionError(format!(
            "Booking {booking_id} has too many payments"
        ))
    })?;
    let paid_cents: i64 = sum_amounts(amounts).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Booking {booking_id} payments: {e}"))
    })?;
    Ok((paid_cents, count))
}
}
