// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schema-level checks across database backends.
//!
//! `SQLite` cases run with the normal suite. `MariaDB` cases are marked
//! `#[ignore]` and run through `cargo xtask test-mariadb`, which provides
//! `DATABASE_URL` and `INNKEEP_TEST_BACKEND=mariadb`. They fail fast when
//! that infrastructure is missing instead of silently passing.
//!
//! Business rules are covered by the `SQLite` suite; these tests only prove
//! that constraints, foreign keys and transactions behave the same on each
//! backend.

use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::{MysqlConnection, QueryableByName};
use std::env;

use crate::backend::mysql;
use crate::{BackendConnection, Persistence};

#[derive(QueryableByName)]
struct CountResult {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

const INSERT_ROOM_TYPE: &str = "INSERT INTO rooms
     (name, price_per_night_cents, max_guests, total_rooms, rooms_available, is_active)
     VALUES ('Validation Queen', 15000, 2, 2, 2, 1)";

fn sqlite_connection(persistence: &mut Persistence) -> &mut diesel::SqliteConnection {
    match &mut persistence.conn {
        BackendConnection::Sqlite(conn) => conn,
        BackendConnection::Mysql(_) => panic!("in-memory persistence must use SQLite"),
    }
}

#[test]
fn test_sqlite_foreign_keys_are_enforced() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence.verify_foreign_key_enforcement().unwrap();

    let result = diesel::sql_query(
        "INSERT INTO individual_rooms (room_id, room_number, status) VALUES (99999, '101', 'available')",
    )
    .execute(sqlite_connection(&mut persistence));

    assert!(
        result.is_err(),
        "A room of an unknown room type must violate the foreign key"
    );
}

#[test]
fn test_sqlite_availability_cannot_exceed_total() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = diesel::sql_query(
        "INSERT INTO rooms
         (name, price_per_night_cents, max_guests, total_rooms, rooms_available, is_active)
         VALUES ('Overbooked', 15000, 2, 2, 3, 1)",
    )
    .execute(sqlite_connection(&mut persistence));

    assert!(result.is_err(), "rooms_available > total_rooms must be refused");
}

#[test]
fn test_sqlite_tentative_flag_must_match_status() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let conn = sqlite_connection(&mut persistence);
    diesel::sql_query(INSERT_ROOM_TYPE).execute(conn).unwrap();

    let result = diesel::sql_query(
        "INSERT INTO bookings
         (reference, guest_name, guest_email, room_id, check_in_date, check_out_date, nights,
          adults, children, total_amount_cents, status, is_tentative, payment_status,
          created_at, updated_at)
         VALUES ('BK-X', 'Guest', 'guest@example.com', 1, '2026-04-10', '2026-04-12', 2,
                 2, 0, 30000, 'confirmed', 1, 'unpaid',
                 '2026-03-20T08:00:00Z', '2026-03-20T08:00:00Z')",
    )
    .execute(conn);

    assert!(
        result.is_err(),
        "A confirmed booking flagged tentative must be refused"
    );
}

/// Reads `DATABASE_URL`.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set, indicating missing infrastructure.
fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

/// # Panics
///
/// Panics if `INNKEEP_TEST_BACKEND` is not set to `mariadb`.
fn verify_mariadb_test_environment() {
    let backend = env::var("INNKEEP_TEST_BACKEND").expect(
        "INNKEEP_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(backend, "mariadb", "INNKEEP_TEST_BACKEND must be 'mariadb'");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_migrations_apply_cleanly() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = mysql::initialize_database(&url);
    assert!(
        result.is_ok(),
        "Failed to initialize MariaDB and run migrations: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_foreign_key_enforcement() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");
    mysql::verify_foreign_key_enforcement(&mut conn).expect("foreign_key_checks must be on");

    let result = diesel::sql_query(
        "INSERT INTO individual_rooms (room_id, room_number, status) VALUES (99999, 'FK-1', 'available')",
    )
    .execute(&mut conn);
    assert!(
        result.is_err(),
        "A room of an unknown room type must violate the foreign key"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_room_type_constraints() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");
    conn.begin_test_transaction()
        .expect("Failed to begin transaction");

    diesel::sql_query(INSERT_ROOM_TYPE)
        .execute(&mut conn)
        .expect("Failed to insert room type");

    let duplicate = diesel::sql_query(INSERT_ROOM_TYPE).execute(&mut conn);
    assert!(duplicate.is_err(), "Room type names must be unique");

    let overbooked = diesel::sql_query(
        "INSERT INTO rooms
         (name, price_per_night_cents, max_guests, total_rooms, rooms_available, is_active)
         VALUES ('Validation Overbooked', 15000, 2, 2, 3, 1)",
    )
    .execute(&mut conn);
    assert!(
        overbooked.is_err(),
        "rooms_available > total_rooms must be refused"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_transaction_rollback() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn: MysqlConnection =
        mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");
    conn.begin_test_transaction()
        .expect("Failed to begin transaction");

    diesel::sql_query(
        "INSERT INTO rooms
         (name, price_per_night_cents, max_guests, total_rooms, rooms_available, is_active)
         VALUES ('Validation Rollback', 15000, 2, 1, 1, 1)",
    )
    .execute(&mut conn)
    .expect("Failed to insert room type");

    let count: i64 = diesel::sql_query(
        "SELECT COUNT(*) AS count FROM rooms WHERE name = 'Validation Rollback'",
    )
    .get_result::<CountResult>(&mut conn)
    .map(|r| r.count)
    .expect("Failed to count room types");
    assert_eq!(count, 1, "Room type should exist within the transaction");

    drop(conn);

    let mut new_conn = mysql::initialize_database(&url).expect("Failed to reconnect to MariaDB");
    let count_after: i64 = diesel::sql_query(
        "SELECT COUNT(*) AS count FROM rooms WHERE name = 'Validation Rollback'",
    )
    .get_result::<CountResult>(&mut new_conn)
    .map(|r| r.count)
    .expect("Failed to count room types after rollback");
    assert_eq!(count_after, 0, "Room type must not survive the rollback");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_persistence_adapter_round_trip() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut persistence = Persistence::new_with_mysql(&url).expect("Failed to open MariaDB");
    let suffix = std::process::id();
    let room_type = super::seed_room_type(
        &mut persistence,
        &format!("Validation Suite {suffix}"),
        32_000,
        1,
    );
    let room = super::seed_room(&mut persistence, &room_type, &format!("V{suffix}"));

    assert_eq!(room.room_id, room_type.room_id);
    assert_eq!(
        persistence
            .get_room_type(room_type.room_id)
            .expect("Failed to load room type")
            .rooms_available,
        1
    );
}
