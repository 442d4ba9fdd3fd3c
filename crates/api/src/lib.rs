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
#![allow(clippy::multiple_crate_versions)]

//! API boundary of the hotel admin backend.
//!
//! This crate sits between transport and the core: it authorizes actors,
//! translates requests into core commands, persists the results and maps
//! every lower-layer error into an [`ApiError`].

mod auth;
mod cancellation_log;
mod clock;
mod config;
mod error;
mod handlers;
mod notify;
mod request_response;
mod services;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_actor};
pub use cancellation_log::{CancellationLogEntry, CancellationLogError, append_entry};
pub use clock::{Clock, FixedClock, SystemClock, hotel_today};
pub use config::{ConfigError, HotelConfig, MAX_TENTATIVE_HOLD_HOURS, parse_timezone};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    create_room, create_room_type, expire_tentative_bookings, get_booking_detail,
    get_maintenance_log, get_report, list_available_rooms, list_bookings, list_room_types,
    list_rooms, perform_booking_action, record_payment, set_room_status, sweep_tentative_holds,
    update_booking_notes, update_room_type,
};
pub use notify::{LogNotifier, Notifier, NotifyError};
pub use request_response::{
    ApiResponse, AvailableRoomsQuery, AvailableRoomsResponse, BookingActionRequest,
    BookingActionResponse, BookingDetailResponse, BookingInfo, BookingListResponse,
    CountryCountInfo, CreateRoomRequest, DailyOccupancyInfo, DemographicsInfo, ListBookingsQuery,
    ListRoomsQuery, MaintenanceLogInfo, MaintenanceLogResponse, NotesRequest, PaymentInfo,
    PaymentRequest, ReportQuery, ReportResponse, RoomInfo, RoomResponse, RoomStatusRequest,
    RoomTypeInfo, RoomTypeReportInfo, RoomTypeRequest, RoomTypeResponse, StatusCountInfo,
    SweepFailure, SweepResponse, TentativeLogInfo, TimelineInfo, parse_payment_method,
};
pub use services::HotelServices;
