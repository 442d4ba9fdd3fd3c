// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! - `audit`: Audit event persistence
//! - `bookings`: Booking inserts and transactional booking transitions
//! - `inventory`: Room types, individual rooms and availability
//!
//! Orchestrating functions that open a transaction are written once per
//! backend; the statements they run are generated by `backend_fn!`.

pub mod audit;
pub mod bookings;
pub mod inventory;

pub use bookings::{
    PersistedTransition, insert_booking_mysql, insert_booking_sqlite,
    persist_booking_transition_mysql, persist_booking_transition_sqlite,
};
pub use inventory::{
    persist_room_creation_mysql, persist_room_creation_sqlite, persist_room_status_change_mysql,
    persist_room_status_change_sqlite, persist_room_type_creation_mysql,
    persist_room_type_creation_sqlite, persist_room_type_update_mysql,
    persist_room_type_update_sqlite,
};
