// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod booking_status;
mod error;
mod payment;
mod reporting;
mod room_assignment;
mod room_status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use booking_status::{BookingAction, BookingStatus};
pub use error::DomainError;
pub use payment::{PaymentMethod, PaymentStatus, stay_price, sum_amounts};
pub use reporting::{
    CountryCount, DailyOccupancy, Demographics, Report, ReportBooking, ReportRange,
    ReportRoomType, RoomTypeReport, StatusCount, build_report,
};
pub use room_assignment::{RoomOccupancy, find_conflict, select_available_rooms};
pub use room_status::RoomStatus;

// Re-export public types
pub use types::{
    Booking, GuestInfo, IndividualRoom, Payment, RoomType, StayDates, format_iso_date,
    parse_iso_date,
};
pub use validation::{
    MAX_REPORT_DAYS, validate_booking_status_transition, validate_cancel_check_in,
    validate_cancellation, validate_check_in, validate_check_out, validate_confirmation,
    validate_inventory_change, validate_no_show, validate_payment_amount, validate_report_range,
    validate_room_assignment, validate_room_fields, validate_room_status_change,
    validate_room_type_fields, validate_room_upgrade, validate_tentative_conversion,
    validate_tentative_expiry, validate_tentative_transition,
};
