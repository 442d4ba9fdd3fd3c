// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking mutations.
//!
//! A booking transition is written in one database transaction: the
//! guarded booking update, availability adjustments, room status changes,
//! the payment, the audit event and every log row either all commit or
//! none do.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info, warn};

use innkeep::{CancellationRecord, NewPayment, TentativeLogEntry, TransitionResult};
use innkeep_domain::{Booking, BookingStatus, PaymentStatus};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewBooking, format_timestamp, to_column};
use crate::diesel_schema::{
    booking_timeline_logs, bookings, cancellation_log, payments, tentative_booking_log,
};
use crate::error::PersistenceError;
use crate::mutations::audit::{persist_audit_event_mysql, persist_audit_event_sqlite};
use crate::mutations::inventory::{
    apply_inventory_adjustment_mysql, apply_inventory_adjustment_sqlite,
    apply_room_status_change_mysql, apply_room_status_change_sqlite,
};

/// Identifiers assigned while persisting a booking transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedTransition {
    pub event_id: i64,
    pub payment_id: Option<i64>,
}

backend_fn! {
/// Inserts a pending, unpaid booking.
///
/// # Returns
///
/// The booking ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_booking(conn: &mut _, booking: &NewBooking) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(booking.created_at)?;
    diesel::insert_into(bookings::table)
        .values((
            bookings::reference.eq(&booking.reference),
            bookings::guest_name.eq(&booking.guest.name),
            bookings::guest_email.eq(&booking.guest.email),
            bookings::guest_phone.eq(booking.guest.phone.as_deref()),
            bookings::guest_country.eq(booking.guest.country.as_deref()),
            bookings::room_id.eq(booking.room_id),
            bookings::check_in_date.eq(innkeep_domain::format_iso_date(booking.stay.check_in())),
            bookings::check_out_date.eq(innkeep_domain::format_iso_date(booking.stay.check_out())),
            bookings::nights.eq(to_column(booking.stay.nights(), "nights")?),
            bookings::adults.eq(to_column(booking.adults, "adults")?),
            bookings::children.eq(to_column(booking.children, "children")?),
            bookings::total_amount_cents.eq(booking.total_amount_cents),
            bookings::status.eq(BookingStatus::Pending.as_str()),
            bookings::is_tentative.eq(0),
            bookings::payment_status.eq(PaymentStatus::Unpaid.as_str()),
            bookings::notes.eq(booking.notes.as_deref()),
            bookings::created_at.eq(&created_at),
            bookings::updated_at.eq(&created_at),
        ))
        .execute(conn)?;

    let booking_id: i64 = conn.get_last_insert_rowid()?;
    debug!(booking_id, reference = %booking.reference, "Inserted booking");
    Ok(booking_id)
}
}

backend_fn! {
/// Writes the new booking row if the stored row still has the status and
/// `updated_at` that were read.
///
/// # Errors
///
/// Returns `PersistenceError::ConcurrentModification` if the booking changed
/// since it was read.
pub fn update_booking_guarded(
    conn: &mut _,
    previous: &Booking,
    next: &Booking,
) -> Result<(), PersistenceError> {
    let previous_updated_at: String = format_timestamp(previous.updated_at)?;
    let tentative_expires_at: Option<String> =
        next.tentative_expires_at.map(format_timestamp).transpose()?;

    let updated: usize = diesel::update(
        bookings::table
            .filter(bookings::booking_id.eq(previous.booking_id))
            .filter(bookings::status.eq(previous.status.as_str()))
            .filter(bookings::updated_at.eq(&previous_updated_at)),
    )
    .set((
        bookings::status.eq(next.status.as_str()),
        bookings::is_tentative.eq(i32::from(next.is_tentative())),
        bookings::tentative_expires_at.eq(tentative_expires_at),
        bookings::room_id.eq(next.room_id),
        bookings::individual_room_id.eq(next.individual_room_id),
        bookings::total_amount_cents.eq(next.total_amount_cents),
        bookings::payment_status.eq(next.payment_status.as_str()),
        bookings::notes.eq(next.notes.as_deref()),
        bookings::updated_at.eq(format_timestamp(next.updated_at)?),
    ))
    .execute(conn)?;

    if updated == 0 {
        warn!(
            booking_id = previous.booking_id,
            expected_status = previous.status.as_str(),
            "Booking changed concurrently"
        );
        return Err(PersistenceError::ConcurrentModification {
            entity: String::from("booking"),
            id: previous.booking_id,
        });
    }
    Ok(())
}
}

backend_fn! {
/// Inserts a payment row.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_payment(
    conn: &mut _,
    booking_id: i64,
    payment: &NewPayment,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(payments::table)
        .values((
            payments::booking_id.eq(booking_id),
            payments::amount_cents.eq(payment.amount_cents),
            payments::method.eq(payment.method.as_str()),
            payments::transaction_reference.eq(payment.transaction_reference.as_deref()),
            payments::recorded_by.eq(&payment.recorded_by),
            payments::paid_at.eq(format_timestamp(payment.paid_at)?),
        ))
        .execute(conn)?;
    conn.get_last_insert_rowid()
}
}

backend_fn! {
/// Appends a booking timeline entry for a persisted transition.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_timeline_entry(
    conn: &mut _,
    previous_status: BookingStatus,
    result: &TransitionResult,
    event_id: i64,
    created_at: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(booking_timeline_logs::table)
        .values((
            booking_timeline_logs::booking_id.eq(result.new_booking.booking_id),
            booking_timeline_logs::event_id.eq(event_id),
            booking_timeline_logs::action.eq(&result.audit_event.action.name),
            booking_timeline_logs::from_status.eq(previous_status.as_str()),
            booking_timeline_logs::to_status.eq(result.new_booking.status.as_str()),
            booking_timeline_logs::actor_id.eq(&result.audit_event.actor.id),
            booking_timeline_logs::message.eq(&result.message),
            booking_timeline_logs::created_at.eq(created_at),
        ))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Appends a tentative hold log entry.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_tentative_log(
    conn: &mut _,
    booking_id: i64,
    entry: &TentativeLogEntry,
    actor_id: &str,
    created_at: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(tentative_booking_log::table)
        .values((
            tentative_booking_log::booking_id.eq(booking_id),
            tentative_booking_log::action.eq(entry.action.as_str()),
            tentative_booking_log::expires_at
                .eq(entry.expires_at.map(format_timestamp).transpose()?),
            tentative_booking_log::actor_id.eq(actor_id),
            tentative_booking_log::created_at.eq(created_at),
        ))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Appends a cancellation log entry.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_cancellation_log(
    conn: &mut _,
    booking_id: i64,
    record: &CancellationRecord,
    actor_id: &str,
    created_at: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(cancellation_log::table)
        .values((
            cancellation_log::booking_id.eq(booking_id),
            cancellation_log::reason.eq(&record.reason),
            cancellation_log::previous_status.eq(record.previous_status.as_str()),
            cancellation_log::released_individual_room_id.eq(record.released_room_id),
            cancellation_log::inventory_restored.eq(i32::from(record.inventory_restored)),
            cancellation_log::actor_id.eq(actor_id),
            cancellation_log::created_at.eq(created_at),
        ))
        .execute(conn)?;
    Ok(())
}
}

/// Persists a booking transition - `SQLite` version.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `previous` - The booking as it was read before the command was applied
/// * `result` - The transition to persist
///
/// # Errors
///
/// Returns an error if any write fails or a guard detects a concurrent
/// change; nothing is written in that case.
pub fn persist_booking_transition_sqlite(
    conn: &mut SqliteConnection,
    previous: &Booking,
    result: &TransitionResult,
) -> Result<PersistedTransition, PersistenceError> {
    let created_at: String = format_timestamp(result.new_booking.updated_at)?;
    let actor_id: &str = result.audit_event.actor.id.as_str();
    let booking_id: i64 = previous.booking_id;

    let persisted = conn.transaction::<_, PersistenceError, _>(|conn| {
        update_booking_guarded_sqlite(conn, previous, &result.new_booking)?;
        for adjustment in &result.inventory {
            apply_inventory_adjustment_sqlite(conn, *adjustment)?;
        }
        for change in &result.room_changes {
            apply_room_status_change_sqlite(conn, change, actor_id, &created_at)?;
        }
        let payment_id: Option<i64> = match &result.payment {
            Some(payment) => Some(insert_payment_sqlite(conn, booking_id, payment)?),
            None => None,
        };
        let event_id: i64 = persist_audit_event_sqlite(
            conn,
            &result.audit_event,
            result.audit_event.subject,
            &created_at,
        )?;
        insert_timeline_entry_sqlite(conn, previous.status, result, event_id, &created_at)?;
        if let Some(entry) = &result.tentative_log {
            insert_tentative_log_sqlite(conn, booking_id, entry, actor_id, &created_at)?;
        }
        if let Some(record) = &result.cancellation {
            insert_cancellation_log_sqlite(conn, booking_id, record, actor_id, &created_at)?;
        }
        Ok(PersistedTransition {
            event_id,
            payment_id,
        })
    })?;

    info!(
        booking_id,
        event_id = persisted.event_id,
        action = %result.audit_event.action.name,
        from = previous.status.as_str(),
        to = result.new_booking.status.as_str(),
        "Persisted booking transition"
    );
    Ok(persisted)
}

/// Persists a booking transition - `MySQL` version.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `previous` - The booking as it was read before the command was applied
/// * `result` - The transition to persist
///
/// # Errors
///
/// Returns an error if any write fails or a guard detects a concurrent
/// change; nothing is written in that case.
pub fn persist_booking_transition_mysql(
    conn: &mut MysqlConnection,
    previous: &Booking,
    result: &TransitionResult,
) -> Result<PersistedTransition, PersistenceError> {
    let created_at: String = format_timestamp(result.new_booking.updated_at)?;
    let actor_id: &str = result.audit_event.actor.id.as_str();
    let booking_id: i64 = previous.booking_id;

    let persisted = conn.transaction::<_, PersistenceError, _>(|conn| {
        update_booking_guarded_mysql(conn, previous, &result.new_booking)?;
        for adjustment in &result.inventory {
            apply_inventory_adjustment_mysql(conn, *adjustment)?;
        }
        for change in &result.room_changes {
            apply_room_status_change_mysql(conn, change, actor_id, &created_at)?;
        }
        let payment_id: Option<i64> = match &result.payment {
            Some(payment) => Some(insert_payment_mysql(conn, booking_id, payment)?),
            None => None,
        };
        let event_id: i64 = persist_audit_event_mysql(
            conn,
            &result.audit_event,
            result.audit_event.subject,
            &created_at,
        )?;
        insert_timeline_entry_mysql(conn, previous.status, result, event_id, &created_at)?;
        if let Some(entry) = &result.tentative_log {
            insert_tentative_log_mysql(conn, booking_id, entry, actor_id, &created_at)?;
        }
        if let Some(record) = &result.cancellation {
            insert_cancellation_log_mysql(conn, booking_id, record, actor_id, &created_at)?;
        }
        Ok(PersistedTransition {
            event_id,
            payment_id,
        })
    })?;

    info!(
        booking_id,
        event_id = persisted.event_id,
        action = %result.audit_event.action.name,
        from = previous.status.as_str(),
        to = result.new_booking.status.as_str(),
        "Persisted booking transition"
    );
    Ok(persisted)
}
