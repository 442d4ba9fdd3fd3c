// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for the persistence layer.
//!
//! - `audit`: Audit event queries
//! - `bookings`: Booking list, detail, payments and room occupancy
//! - `inventory`: Room types and individual rooms
//! - `logs`: Timeline, tentative and maintenance logs
//! - `reports`: Rows consumed by report aggregation
//!
//! All query functions are generated in backend-specific monomorphic
//! versions (`_sqlite` and `_mysql` suffixes). The `Persistence` adapter in
//! `lib.rs` dispatches to the appropriate version.

pub mod audit;
pub mod bookings;
pub mod inventory;
pub mod logs;
pub mod reports;

pub use audit::{
    get_audit_event_mysql, get_audit_event_sqlite, get_audit_events_for_subject_mysql,
    get_audit_events_for_subject_sqlite,
};
pub use bookings::{
    BookingFilter, BookingPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, find_checked_in_occupant_mysql,
    find_checked_in_occupant_sqlite, get_booking_mysql, get_booking_sqlite, lapsed_holds,
    list_bookings_mysql, list_bookings_sqlite, list_occupancies_mysql, list_occupancies_sqlite,
    list_payments_mysql, list_payments_sqlite, list_tentative_bookings_mysql,
    list_tentative_bookings_sqlite, payment_totals_mysql, payment_totals_sqlite,
};
pub use inventory::{
    RoomFilter, get_individual_room_mysql, get_individual_room_sqlite, get_room_type_mysql,
    get_room_type_sqlite, list_individual_rooms_mysql, list_individual_rooms_sqlite,
    list_room_types_mysql, list_room_types_sqlite, room_number_exists_mysql,
    room_number_exists_sqlite, room_type_name_exists_mysql, room_type_name_exists_sqlite,
};
pub use logs::{
    count_cancellations_mysql, count_cancellations_sqlite, get_booking_timeline_mysql,
    get_booking_timeline_sqlite, get_maintenance_log_mysql, get_maintenance_log_sqlite,
    get_tentative_log_mysql, get_tentative_log_sqlite,
};
pub use reports::{
    get_report_bookings_mysql, get_report_bookings_sqlite, get_report_payments_mysql,
    get_report_payments_sqlite, get_report_room_types_mysql, get_report_room_types_sqlite,
};
