// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers.
//!
//! Each handler authorizes the actor, loads what the pure core needs,
//! applies the change and persists it. Handlers are synchronous; the server
//! calls them while holding the persistence lock.

mod bookings;
mod inventory;
mod reports;

pub use bookings::{
    expire_tentative_bookings, get_booking_detail, list_available_rooms, list_bookings,
    perform_booking_action, record_payment, sweep_tentative_holds, update_booking_notes,
};
pub use inventory::{
    create_room, create_room_type, get_maintenance_log, list_room_types, list_rooms,
    set_room_status, update_room_type,
};
pub use reports::get_report;
