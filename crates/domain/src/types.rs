// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking_status::BookingStatus;
use crate::error::DomainError;
use crate::payment::{PaymentMethod, PaymentStatus};
use crate::room_status::RoomStatus;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses an ISO `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_iso_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value, ISO_DATE).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as ISO `YYYY-MM-DD`.
#[must_use]
pub fn format_iso_date(date: Date) -> String {
    // The format description only contains numeric components, so
    // formatting cannot fail for any representable date.
    date.format(ISO_DATE).unwrap_or_else(|_| date.to_string())
}

/// A half-open stay `[check_in, check_out)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StayDates {
    check_in: Date,
    check_out: Date,
}

impl StayDates {
    /// Creates a stay.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStayDates` unless `check_out` is after
    /// `check_in`.
    pub fn new(check_in: Date, check_out: Date) -> Result<Self, DomainError> {
        if check_out <= check_in {
            return Err(DomainError::InvalidStayDates {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    #[must_use]
    pub const fn check_in(&self) -> Date {
        self.check_in
    }

    #[must_use]
    pub const fn check_out(&self) -> Date {
        self.check_out
    }

    /// Number of nights in the stay. Always at least one.
    #[must_use]
    pub fn nights(&self) -> u32 {
        u32::try_from((self.check_out - self.check_in).whole_days()).unwrap_or(u32::MAX)
    }

    /// Returns true if a guest may be in-house on `date`.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.check_in <= date && date < self.check_out
    }

    /// Returns true if the two stays share at least one night.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Number of nights of this stay falling inside `[start, end)`.
    #[must_use]
    pub fn overlap_nights(&self, start: Date, end: Date) -> u32 {
        let from = self.check_in.max(start);
        let to = self.check_out.min(end);
        if to <= from {
            return 0;
        }
        u32::try_from((to - from).whole_days()).unwrap_or(0)
    }
}

/// A room type: an inventory pool of interchangeable rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomType {
    pub room_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_per_night_cents: i64,
    pub max_guests: u32,
    pub total_rooms: u32,
    /// Units not currently held by a tentative, confirmed or checked-in booking.
    pub rooms_available: u32,
    pub is_active: bool,
}

/// A concrete physical room belonging to a room type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualRoom {
    pub individual_room_id: i64,
    pub room_id: i64,
    pub room_number: String,
    pub floor: Option<i32>,
    pub status: RoomStatus,
    pub notes: Option<String>,
}

/// Contact details of the booking guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
}

/// A booking as loaded from storage.
///
/// `updated_at` doubles as the optimistic concurrency token: a mutation
/// only applies if the stored row still carries the value that was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub booking_id: i64,
    pub reference: String,
    pub guest: GuestInfo,
    /// The booked room type.
    pub room_id: i64,
    pub individual_room_id: Option<i64>,
    pub stay: StayDates,
    pub adults: u32,
    pub children: u32,
    pub total_amount_cents: i64,
    pub status: BookingStatus,
    pub tentative_expires_at: Option<OffsetDateTime>,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Booking {
    /// Mirrors the stored `is_tentative` flag.
    #[must_use]
    pub fn is_tentative(&self) -> bool {
        self.status == BookingStatus::Tentative
    }

    #[must_use]
    pub fn nights(&self) -> u32 {
        self.stay.nights()
    }

    #[must_use]
    pub const fn guests(&self) -> u32 {
        self.adults + self.children
    }

    /// Checks that the tentative flag and expiry agree with the status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` describing the mismatch.
    pub fn validate_tentative_consistency(&self) -> Result<(), DomainError> {
        if self.is_tentative() != self.tentative_expires_at.is_some() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status.as_str().to_string(),
                to: self.status.as_str().to_string(),
                reason: String::from("tentative expiry must be set exactly when tentative"),
            });
        }
        Ok(())
    }
}

/// A completed payment against a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub payment_id: i64,
    pub booking_id: i64,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub transaction_reference: Option<String>,
    pub recorded_by: String,
    pub paid_at: OffsetDateTime,
}
