// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Innkeep hotel back office.
//!
//! Bookings, room inventory, payments and every append-only log live in a
//! relational database accessed through Diesel.
//!
//! ## Database Backend Support
//!
//! - **`SQLite`** (default): development, unit tests and single-property
//!   deployments
//! - **`MariaDB`/`MySQL`**: compiled by default, validated via explicit
//!   opt-in tests (`cargo xtask test-mariadb`)
//!
//! Migrations live in `migrations/` (`SQLite`) and `migrations_mysql/`
//! (`MySQL`). Both must describe the same schema; `cargo xtask
//! verify-migrations` checks table and column parity.
//!
//! ## Write Semantics
//!
//! Every mutation runs in one database transaction. Booking updates are
//! guarded by the status and `updated_at` that were read, availability
//! holds by `rooms_available > 0`, and room status changes by the status
//! that was read. A guard that matches no row aborts the transaction.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

use innkeep::{
    RoomCreation, RoomStatusTransition, RoomTypeCreation, RoomTypeTransition, TransitionResult,
};
use innkeep_audit::AuditSubject;
use innkeep_domain::{
    Booking, IndividualRoom, Payment, ReportRange, ReportRoomType, RoomOccupancy, RoomType,
    StayDates,
};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates monomorphic backend-specific query/mutation functions.
///
/// From one function body this produces `<name>_sqlite` taking
/// `&mut SqliteConnection` and `<name>_mysql` taking `&mut MysqlConnection`.
/// Diesel needs concrete backend types at compile time, so the body is
/// duplicated rather than made generic. Dispatch happens only in the
/// `Persistence` adapter.
///
/// ```ignore
/// backend_fn! {
///     pub fn get_room_type(conn: &mut _, room_id: i64) -> Result<RoomType, PersistenceError> {
///         // Function body using conn - same for both backends
///     }
/// }
/// ```
macro_rules! backend_fn {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident (
            $conn:ident : &mut _
            $(, $param:ident : $param_ty:ty)* $(,)?
        ) -> $ret:ty
        $body:block
    ) => {
        pastey::paste! {
            $(#[$meta])*
            $vis fn [<$name _sqlite>] (
                $conn: &mut SqliteConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body

            $(#[$meta])*
            $vis fn [<$name _mysql>] (
                $conn: &mut MysqlConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body
        }
    };
}

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    AuditRecord, MaintenanceLogEntry, NewBooking, TentativeLogRecord, TimelineEntry,
    format_timestamp, parse_timestamp,
};
pub use error::PersistenceError;
pub use mutations::PersistedTransition;
pub use queries::{BookingFilter, BookingPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, RoomFilter};

use backend::PersistenceBackend;

/// Backend-specific database connection.
pub enum BackendConnection {
    Sqlite(SqliteConnection),
    Mysql(MysqlConnection),
}

/// Dispatches a call to the `_sqlite` or `_mysql` variant of a query or
/// mutation for the active connection.
macro_rules! dispatch {
    ($self:ident, $module:ident :: $name:ident ( $($arg:expr),* $(,)? )) => {
        pastey::paste! {
            match &mut $self.conn {
                BackendConnection::Sqlite(conn) => $module::[<$name _sqlite>](conn $(, $arg)*),
                BackendConnection::Mysql(conn) => $module::[<$name _mysql>](conn $(, $arg)*),
            }
        }
    };
}

/// Persistence adapter for bookings, inventory and audit data.
///
/// Backend selection happens once at construction time and is transparent
/// to callers.
pub struct Persistence {
    pub(crate) conn: BackendConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database, so tests are
    /// isolated from each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:innkeep_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a new persistence adapter with a `MySQL`/`MariaDB` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_mysql(database_url: &str) -> Result<Self, PersistenceError> {
        let mut conn: MysqlConnection = backend::mysql::initialize_database(database_url)?;
        backend::mysql::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Mysql(conn),
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.verify_foreign_key_enforcement(),
            BackendConnection::Mysql(conn) => conn.verify_foreign_key_enforcement(),
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Inserts a pending booking. Bookings are created by the public booking
    /// flow; this entry point serves seeding and tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_booking(&mut self, booking: &NewBooking) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::insert_booking(booking))
    }

    /// Persists a booking transition atomically.
    ///
    /// # Arguments
    ///
    /// * `previous` - The booking as loaded before the command was applied
    /// * `result` - The transition to persist
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ConcurrentModification`,
    /// `PersistenceError::InventoryExhausted` or
    /// `PersistenceError::InventoryAtCapacity` if a guard fails, or another
    /// error if a write fails. Nothing is written on error.
    pub fn persist_booking_transition(
        &mut self,
        previous: &Booking,
        result: &TransitionResult,
    ) -> Result<PersistedTransition, PersistenceError> {
        dispatch!(self, mutations::persist_booking_transition(previous, result))
    }

    /// Persists a new room type, returning its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn persist_room_type_creation(
        &mut self,
        creation: &RoomTypeCreation,
        at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::persist_room_type_creation(creation, at))
    }

    /// Persists a room type update, returning the audit event ID.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails or the inventory changed since
    /// it was read.
    pub fn persist_room_type_update(
        &mut self,
        transition: &RoomTypeTransition,
        at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::persist_room_type_update(transition, at))
    }

    /// Persists a new individual room, returning its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn persist_room_creation(
        &mut self,
        creation: &RoomCreation,
        at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::persist_room_creation(creation, at))
    }

    /// Persists a manual room status change, returning the audit event ID.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails or the room status changed
    /// since it was read.
    pub fn persist_room_status_change(
        &mut self,
        transition: &RoomStatusTransition,
        at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::persist_room_status_change(transition, at))
    }

    // ========================================================================
    // Booking Queries
    // ========================================================================

    /// Retrieves a booking by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::BookingNotFound` if it does not exist.
    pub fn get_booking(&mut self, booking_id: i64) -> Result<Booking, PersistenceError> {
        dispatch!(self, queries::get_booking(booking_id))
    }

    /// Lists bookings matching a filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_bookings(&mut self, filter: &BookingFilter) -> Result<BookingPage, PersistenceError> {
        dispatch!(self, queries::list_bookings(filter))
    }

    /// Lists tentative bookings whose hold has lapsed at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_lapsed_tentative_bookings(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<Vec<Booking>, PersistenceError> {
        let tentative: Vec<Booking> = dispatch!(self, queries::list_tentative_bookings())?;
        Ok(queries::lapsed_holds(tentative, now))
    }

    /// Lists room assignments of non-terminal bookings overlapping `stay`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_occupancies(
        &mut self,
        stay: &StayDates,
    ) -> Result<Vec<RoomOccupancy>, PersistenceError> {
        dispatch!(self, queries::list_occupancies(stay))
    }

    /// Finds the checked-in booking occupying an individual room.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn find_checked_in_occupant(
        &mut self,
        individual_room_id: i64,
    ) -> Result<Option<Booking>, PersistenceError> {
        dispatch!(self, queries::find_checked_in_occupant(individual_room_id))
    }

    /// Lists the payments recorded against a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_payments(&mut self, booking_id: i64) -> Result<Vec<Payment>, PersistenceError> {
        dispatch!(self, queries::list_payments(booking_id))
    }

    /// Returns the sum and count of a booking's payments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn payment_totals(&mut self, booking_id: i64) -> Result<(i64, u32), PersistenceError> {
        dispatch!(self, queries::payment_totals(booking_id))
    }

    // ========================================================================
    // Inventory Queries
    // ========================================================================

    /// Retrieves a room type by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RoomTypeNotFound` if it does not exist.
    pub fn get_room_type(&mut self, room_id: i64) -> Result<RoomType, PersistenceError> {
        dispatch!(self, queries::get_room_type(room_id))
    }

    /// Lists every room type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_room_types(&mut self) -> Result<Vec<RoomType>, PersistenceError> {
        dispatch!(self, queries::list_room_types())
    }

    /// Checks whether a room type other than `excluding_room_id` uses `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn room_type_name_exists(
        &mut self,
        name: &str,
        excluding_room_id: Option<i64>,
    ) -> Result<bool, PersistenceError> {
        dispatch!(self, queries::room_type_name_exists(name, excluding_room_id))
    }

    /// Retrieves an individual room by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RoomNotFound` if it does not exist.
    pub fn get_individual_room(
        &mut self,
        individual_room_id: i64,
    ) -> Result<IndividualRoom, PersistenceError> {
        dispatch!(self, queries::get_individual_room(individual_room_id))
    }

    /// Lists individual rooms matching a filter, ordered by room number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_individual_rooms(
        &mut self,
        filter: RoomFilter,
    ) -> Result<Vec<IndividualRoom>, PersistenceError> {
        dispatch!(self, queries::list_individual_rooms(filter))
    }

    /// Checks whether a room number is taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn room_number_exists(&mut self, room_number: &str) -> Result<bool, PersistenceError> {
        dispatch!(self, queries::room_number_exists(room_number))
    }

    // ========================================================================
    // Logs & Audit
    // ========================================================================

    /// Retrieves a booking's timeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn get_booking_timeline(
        &mut self,
        booking_id: i64,
    ) -> Result<Vec<TimelineEntry>, PersistenceError> {
        dispatch!(self, queries::get_booking_timeline(booking_id))
    }

    /// Retrieves a booking's tentative hold history.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn get_tentative_log(
        &mut self,
        booking_id: i64,
    ) -> Result<Vec<TentativeLogRecord>, PersistenceError> {
        dispatch!(self, queries::get_tentative_log(booking_id))
    }

    /// Retrieves an individual room's status history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn get_maintenance_log(
        &mut self,
        individual_room_id: i64,
    ) -> Result<Vec<MaintenanceLogEntry>, PersistenceError> {
        dispatch!(self, queries::get_maintenance_log(individual_room_id))
    }

    /// Counts the cancellation log rows of a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn count_cancellations(&mut self, booking_id: i64) -> Result<i64, PersistenceError> {
        dispatch!(self, queries::count_cancellations(booking_id))
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditRecord, PersistenceError> {
        dispatch!(self, queries::get_audit_event(event_id))
    }

    /// Retrieves every audit event recorded against a subject.
    ///
    /// # Errors
    ///
    /// Returns an error if events cannot be retrieved or deserialized.
    pub fn get_audit_events_for_subject(
        &mut self,
        subject: AuditSubject,
    ) -> Result<Vec<AuditRecord>, PersistenceError> {
        dispatch!(self, queries::get_audit_events_for_subject(subject))
    }

    // ========================================================================
    // Report Queries
    // ========================================================================

    /// Loads every booking whose stay overlaps the range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn get_report_bookings(
        &mut self,
        range: &ReportRange,
    ) -> Result<Vec<Booking>, PersistenceError> {
        dispatch!(self, queries::get_report_bookings(range))
    }

    /// Loads every room type's inventory size.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn get_report_room_types(&mut self) -> Result<Vec<ReportRoomType>, PersistenceError> {
        dispatch!(self, queries::get_report_room_types())
    }

    /// Loads the payments that may fall on a hotel-local date inside the
    /// range: those made from the UTC day before it to the UTC day after.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn get_report_payments(
        &mut self,
        range: &ReportRange,
    ) -> Result<Vec<Payment>, PersistenceError> {
        dispatch!(self, queries::get_report_payments(range))
    }
}
