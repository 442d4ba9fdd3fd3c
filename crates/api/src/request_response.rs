// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as ISO `YYYY-MM-DD` strings and timestamps as RFC 3339 UTC
//! strings. Money is always in minor units (cents).

use innkeep::BookingCommand;
use innkeep_domain::{
    Booking, IndividualRoom, Payment, PaymentMethod, Report, RoomType, format_iso_date,
};
use innkeep_persistence::{
    MaintenanceLogEntry, TentativeLogRecord, TimelineEntry, format_timestamp,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ApiError, translate_persistence_error};

/// Envelope wrapping every successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

fn timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    format_timestamp(value).map_err(translate_persistence_error)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A booking lifecycle action.
///
/// Serialized with an `action` tag, e.g.
/// `{"action": "assign_room", "individual_room_id": 7}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BookingActionRequest {
    Confirm,
    MarkTentative,
    ConvertTentative,
    ExpireTentative,
    CheckIn,
    CheckOut,
    CancelCheckIn,
    MarkNoShow,
    Cancel {
        #[serde(default)]
        reason: Option<String>,
    },
    AssignRoom {
        individual_room_id: i64,
    },
    UpgradeRoom {
        target_room_id: i64,
        #[serde(default)]
        individual_room_id: Option<i64>,
        /// Recompute the total at the target room type's nightly price.
        #[serde(default)]
        reprice: bool,
    },
}

impl BookingActionRequest {
    #[must_use]
    pub fn into_command(self) -> BookingCommand {
        match self {
            Self::Confirm => BookingCommand::Confirm,
            Self::MarkTentative => BookingCommand::MarkTentative,
            Self::ConvertTentative => BookingCommand::ConvertTentative,
            Self::ExpireTentative => BookingCommand::ExpireTentative,
            Self::CheckIn => BookingCommand::CheckIn,
            Self::CheckOut => BookingCommand::CheckOut,
            Self::CancelCheckIn => BookingCommand::CancelCheckIn,
            Self::MarkNoShow => BookingCommand::MarkNoShow,
            Self::Cancel { reason } => BookingCommand::Cancel { reason },
            Self::AssignRoom { individual_room_id } => {
                BookingCommand::AssignRoom { individual_room_id }
            }
            Self::UpgradeRoom {
                target_room_id,
                individual_room_id,
                reprice,
            } => BookingCommand::UpgradeRoom {
                target_room_id,
                individual_room_id,
                reprice,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount_cents: i64,
    /// One of `cash`, `card`, `bank_transfer`, `online`, `other`.
    pub method: String,
    #[serde(default)]
    pub transaction_reference: Option<String>,
}

/// Query string of the booking list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<String>,
    /// Matched against reference, guest name and guest email.
    pub search: Option<String>,
    pub check_in_from: Option<String>,
    pub check_in_to: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

const fn default_active() -> bool {
    true
}

/// Attributes of a room type to create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTypeRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_per_night_cents: i64,
    pub max_guests: u32,
    pub total_rooms: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    /// The room type the room belongs to.
    pub room_id: i64,
    pub room_number: String,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStatusRequest {
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRoomsQuery {
    pub room_id: Option<i64>,
    pub status: Option<String>,
}

/// Query string of the assignment candidate list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableRoomsQuery {
    /// Room type to search instead of the booking's own, e.g. before an
    /// upgrade.
    pub room_id: Option<i64>,
}

/// A report range `[start, end)` as ISO dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    pub start: String,
    pub end: String,
}

// ---------------------------------------------------------------------------
// Entity views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInfo {
    pub booking_id: i64,
    pub reference: String,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub guest_country: Option<String>,
    pub room_id: i64,
    pub individual_room_id: Option<i64>,
    pub check_in_date: String,
    pub check_out_date: String,
    pub nights: u32,
    pub adults: u32,
    pub children: u32,
    pub total_amount_cents: i64,
    pub status: String,
    pub is_tentative: bool,
    pub tentative_expires_at: Option<String>,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl BookingInfo {
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn from_booking(booking: &Booking) -> Result<Self, ApiError> {
        Ok(Self {
            booking_id: booking.booking_id,
            reference: booking.reference.clone(),
            guest_name: booking.guest.name.clone(),
            guest_email: booking.guest.email.clone(),
            guest_phone: booking.guest.phone.clone(),
            guest_country: booking.guest.country.clone(),
            room_id: booking.room_id,
            individual_room_id: booking.individual_room_id,
            check_in_date: format_iso_date(booking.stay.check_in()),
            check_out_date: format_iso_date(booking.stay.check_out()),
            nights: booking.nights(),
            adults: booking.adults,
            children: booking.children,
            total_amount_cents: booking.total_amount_cents,
            status: booking.status.as_str().to_string(),
            is_tentative: booking.is_tentative(),
            tentative_expires_at: booking.tentative_expires_at.map(timestamp).transpose()?,
            payment_status: booking.payment_status.as_str().to_string(),
            notes: booking.notes.clone(),
            created_at: timestamp(booking.created_at)?,
            updated_at: timestamp(booking.updated_at)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTypeInfo {
    pub room_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_per_night_cents: i64,
    pub max_guests: u32,
    pub total_rooms: u32,
    pub rooms_available: u32,
    pub is_active: bool,
}

impl From<&RoomType> for RoomTypeInfo {
    fn from(room_type: &RoomType) -> Self {
        Self {
            room_id: room_type.room_id,
            name: room_type.name.clone(),
            description: room_type.description.clone(),
            price_per_night_cents: room_type.price_per_night_cents,
            max_guests: room_type.max_guests,
            total_rooms: room_type.total_rooms,
            rooms_available: room_type.rooms_available,
            is_active: room_type.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub individual_room_id: i64,
    pub room_id: i64,
    pub room_number: String,
    pub floor: Option<i32>,
    pub status: String,
    pub notes: Option<String>,
}

impl From<&IndividualRoom> for RoomInfo {
    fn from(room: &IndividualRoom) -> Self {
        Self {
            individual_room_id: room.individual_room_id,
            room_id: room.room_id,
            room_number: room.room_number.clone(),
            floor: room.floor,
            status: room.status.as_str().to_string(),
            notes: room.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub payment_id: i64,
    pub amount_cents: i64,
    pub method: String,
    pub transaction_reference: Option<String>,
    pub recorded_by: String,
    pub paid_at: String,
}

impl PaymentInfo {
    /// # Errors
    ///
    /// Returns an error if the payment timestamp cannot be formatted.
    pub fn from_payment(payment: &Payment) -> Result<Self, ApiError> {
        Ok(Self {
            payment_id: payment.payment_id,
            amount_cents: payment.amount_cents,
            method: payment.method.as_str().to_string(),
            transaction_reference: payment.transaction_reference.clone(),
            recorded_by: payment.recorded_by.clone(),
            paid_at: timestamp(payment.paid_at)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineInfo {
    pub event_id: i64,
    pub action: String,
    pub from_status: String,
    pub to_status: String,
    pub actor_id: String,
    pub message: String,
    pub created_at: String,
}

impl TimelineInfo {
    /// # Errors
    ///
    /// Returns an error if the entry timestamp cannot be formatted.
    pub fn from_entry(entry: &TimelineEntry) -> Result<Self, ApiError> {
        Ok(Self {
            event_id: entry.event_id,
            action: entry.action.clone(),
            from_status: entry.from_status.as_str().to_string(),
            to_status: entry.to_status.as_str().to_string(),
            actor_id: entry.actor_id.clone(),
            message: entry.message.clone(),
            created_at: timestamp(entry.created_at)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TentativeLogInfo {
    pub action: String,
    pub expires_at: Option<String>,
    pub actor_id: String,
    pub created_at: String,
}

impl TentativeLogInfo {
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn from_record(record: &TentativeLogRecord) -> Result<Self, ApiError> {
        Ok(Self {
            action: record.action.clone(),
            expires_at: record.expires_at.map(timestamp).transpose()?,
            actor_id: record.actor_id.clone(),
            created_at: timestamp(record.created_at)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceLogInfo {
    pub from_status: String,
    pub to_status: String,
    pub reason: String,
    pub actor_id: String,
    pub created_at: String,
}

impl MaintenanceLogInfo {
    /// # Errors
    ///
    /// Returns an error if the entry timestamp cannot be formatted.
    pub fn from_entry(entry: &MaintenanceLogEntry) -> Result<Self, ApiError> {
        Ok(Self {
            from_status: entry.from_status.as_str().to_string(),
            to_status: entry.to_status.as_str().to_string(),
            reason: entry.reason.clone(),
            actor_id: entry.actor_id.clone(),
            created_at: timestamp(entry.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingInfo>,
    /// Matching bookings across all pages.
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetailResponse {
    pub booking: BookingInfo,
    pub room_type: RoomTypeInfo,
    pub assigned_room: Option<RoomInfo>,
    pub payments: Vec<PaymentInfo>,
    pub amount_paid_cents: i64,
    pub balance_due_cents: i64,
    pub timeline: Vec<TimelineInfo>,
    pub tentative_log: Vec<TentativeLogInfo>,
    /// Actions the booking's current status offers.
    pub available_actions: Vec<String>,
}

/// Outcome of a booking action, notes edit or payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingActionResponse {
    pub booking: BookingInfo,
    pub message: String,
    pub event_id: i64,
    pub payment_id: Option<i64>,
    /// Best-effort follow-ups that failed after the change committed.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableRoomsResponse {
    pub booking_id: i64,
    pub room_id: i64,
    pub rooms: Vec<RoomInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepFailure {
    pub reference: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResponse {
    /// References of the bookings whose hold was expired.
    pub expired: Vec<String>,
    pub failed: Vec<SweepFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTypeResponse {
    pub room_type: RoomTypeInfo,
    pub event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomResponse {
    pub room: RoomInfo,
    pub event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceLogResponse {
    pub room: RoomInfo,
    /// Newest first.
    pub entries: Vec<MaintenanceLogInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCountInfo {
    pub status: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeReportInfo {
    pub room_id: i64,
    pub name: String,
    pub total_rooms: u32,
    pub bookings: u32,
    pub room_nights_sold: u32,
    pub revenue_cents: i64,
    pub adr_cents: i64,
    pub occupancy_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCountInfo {
    pub country: String,
    pub guests: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicsInfo {
    pub countries: Vec<CountryCountInfo>,
    pub average_party_size: f64,
    pub average_length_of_stay: f64,
    pub average_lead_time_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOccupancyInfo {
    pub date: String,
    pub rooms_sold: u32,
    pub occupancy_pct: f64,
}

/// Operational and financial KPIs for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub start: String,
    /// Exclusive.
    pub end: String,
    pub total_bookings: u32,
    pub status_counts: Vec<StatusCountInfo>,
    pub total_rooms: u32,
    pub available_room_nights: u32,
    pub room_nights_sold: u32,
    pub room_revenue_cents: i64,
    pub payments_received_cents: i64,
    pub payments_count: u32,
    pub occupancy_pct: f64,
    pub adr_cents: i64,
    pub revpar_cents: i64,
    pub cancellation_rate_pct: f64,
    pub no_show_rate_pct: f64,
    pub room_types: Vec<RoomTypeReportInfo>,
    pub demographics: DemographicsInfo,
    pub daily: Vec<DailyOccupancyInfo>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            start: format_iso_date(report.range.start()),
            end: format_iso_date(report.range.end()),
            total_bookings: report.total_bookings,
            status_counts: report
                .status_counts
                .into_iter()
                .map(|s| StatusCountInfo {
                    status: s.status.as_str().to_string(),
                    count: s.count,
                })
                .collect(),
            total_rooms: report.total_rooms,
            available_room_nights: report.available_room_nights,
            room_nights_sold: report.room_nights_sold,
            room_revenue_cents: report.room_revenue_cents,
            payments_received_cents: report.payments_received_cents,
            payments_count: report.payments_count,
            occupancy_pct: report.occupancy_pct,
            adr_cents: report.adr_cents,
            revpar_cents: report.revpar_cents,
            cancellation_rate_pct: report.cancellation_rate_pct,
            no_show_rate_pct: report.no_show_rate_pct,
            room_types: report
                .room_types
                .into_iter()
                .map(|t| RoomTypeReportInfo {
                    room_id: t.room_id,
                    name: t.name,
                    total_rooms: t.total_rooms,
                    bookings: t.bookings,
                    room_nights_sold: t.room_nights_sold,
                    revenue_cents: t.revenue_cents,
                    adr_cents: t.adr_cents,
                    occupancy_pct: t.occupancy_pct,
                })
                .collect(),
            demographics: DemographicsInfo {
                countries: report
                    .demographics
                    .countries
                    .into_iter()
                    .map(|c| CountryCountInfo {
                        country: c.country,
                        guests: c.guests,
                    })
                    .collect(),
                average_party_size: report.demographics.average_party_size,
                average_length_of_stay: report.demographics.average_length_of_stay,
                average_lead_time_days: report.demographics.average_lead_time_days,
            },
            daily: report
                .daily
                .into_iter()
                .map(|d| DailyOccupancyInfo {
                    date: format_iso_date(d.date),
                    rooms_sold: d.rooms_sold,
                    occupancy_pct: d.occupancy_pct,
                })
                .collect(),
        }
    }
}

/// Parses a payment method name.
///
/// # Errors
///
/// Returns an error if the method is not recognized.
pub fn parse_payment_method(method: &str) -> Result<PaymentMethod, ApiError> {
    method
        .trim()
        .to_lowercase()
        .parse::<PaymentMethod>()
        .map_err(crate::error::translate_domain_error)
}
