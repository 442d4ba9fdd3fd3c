// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operational and financial report aggregation.
//!
//! The persistence layer loads every booking whose stay overlaps the
//! report range, the room types and the payments received in the range.
//! This module turns those rows into the report figures. Revenue is
//! prorated by the share of a stay's nights that falls inside the range.

use crate::booking_status::BookingStatus;
use crate::error::DomainError;
use crate::types::StayDates;
use crate::validation::validate_report_range;
use std::collections::HashMap;
use time::{Date, Duration};

/// A validated half-open report range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    start: Date,
    end: Date,
}

impl ReportRange {
    /// Creates a report range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReportRange` if the range is empty,
    /// reversed or too long.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        validate_report_range(start, end)?;
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Number of days (nights) in the range.
    #[must_use]
    pub fn days(&self) -> u32 {
        u32::try_from((self.end - self.start).whole_days()).unwrap_or(0)
    }

    /// Whether `date` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }

    /// Iterates the dates of the range.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        (0..i64::from(self.days())).map(|offset| self.start + Duration::days(offset))
    }
}

/// The booking fields a report needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBooking {
    pub room_id: i64,
    pub status: BookingStatus,
    pub stay: StayDates,
    pub adults: u32,
    pub children: u32,
    pub total_amount_cents: i64,
    pub country: Option<String>,
    /// Hotel-local date the booking was created.
    pub booked_on: Date,
}

/// The room type fields a report needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRoomType {
    pub room_id: i64,
    pub name: String,
    pub total_rooms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: BookingStatus,
    pub count: u32,
}

/// Per room type figures.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTypeReport {
    pub room_id: i64,
    pub name: String,
    pub total_rooms: u32,
    pub bookings: u32,
    pub room_nights_sold: u32,
    pub revenue_cents: i64,
    pub adr_cents: i64,
    pub occupancy_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCount {
    pub country: String,
    pub guests: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Demographics {
    /// Guests per country, most guests first.
    pub countries: Vec<CountryCount>,
    pub average_party_size: f64,
    pub average_length_of_stay: f64,
    pub average_lead_time_days: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyOccupancy {
    pub date: Date,
    pub rooms_sold: u32,
    pub occupancy_pct: f64,
}

/// The complete report for one range.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub range: ReportRange,
    pub total_bookings: u32,
    pub status_counts: Vec<StatusCount>,
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
    pub room_types: Vec<RoomTypeReport>,
    pub demographics: Demographics,
    pub daily: Vec<DailyOccupancy>,
}

/// Rounds a percentage to two decimals. Zero denominators yield zero.
fn percentage(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let pct = f64::from(numerator) * 100.0 / f64::from(denominator);
    (pct * 100.0).round() / 100.0
}

fn average(sum: u32, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (f64::from(sum) / f64::from(count) * 100.0).round() / 100.0
}

/// Integer division rounded half away from zero.
fn divide_rounded(numerator: i64, denominator: u32) -> i64 {
    if denominator == 0 {
        return 0;
    }
    let denominator = i64::from(denominator);
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

/// Revenue of `booking` attributable to `nights_in_range` of its nights.
fn prorated_revenue(booking: &ReportBooking, nights_in_range: u32) -> i64 {
    let nights = booking.stay.nights();
    if nights == 0 {
        return 0;
    }
    let share = i128::from(booking.total_amount_cents) * i128::from(nights_in_range)
        / i128::from(nights);
    i64::try_from(share).unwrap_or(i64::MAX)
}

fn build_demographics(sold: &[&ReportBooking]) -> Demographics {
    let mut by_country: HashMap<&str, u32> = HashMap::new();
    let mut party_total: u32 = 0;
    let mut nights_total: u32 = 0;
    let mut lead_total: u32 = 0;

    for booking in sold {
        let guests = booking.adults + booking.children;
        let country = booking.country.as_deref().unwrap_or("Unknown");
        *by_country.entry(country).or_default() += guests;
        party_total += guests;
        nights_total += booking.stay.nights();
        let lead = (booking.stay.check_in() - booking.booked_on).whole_days();
        lead_total += u32::try_from(lead).unwrap_or(0);
    }

    let mut countries: Vec<CountryCount> = by_country
        .into_iter()
        .map(|(country, guests)| CountryCount {
            country: country.to_string(),
            guests,
        })
        .collect();
    countries.sort_by(|a, b| b.guests.cmp(&a.guests).then_with(|| a.country.cmp(&b.country)));

    let count = u32::try_from(sold.len()).unwrap_or(u32::MAX);
    Demographics {
        countries,
        average_party_size: average(party_total, count),
        average_length_of_stay: average(nights_total, count),
        average_lead_time_days: average(lead_total, count),
    }
}

/// Builds the report for `range`.
///
/// `bookings` must contain the bookings whose stay overlaps the range;
/// rows outside it contribute nothing. `payments` are the amounts of the
/// payments received inside the range.
#[must_use]
pub fn build_report(
    range: ReportRange,
    bookings: &[ReportBooking],
    room_types: &[ReportRoomType],
    payments: &[i64],
) -> Report {
    let in_range: Vec<&ReportBooking> = bookings
        .iter()
        .filter(|b| b.stay.overlap_nights(range.start(), range.end()) > 0)
        .collect();
    let sold: Vec<&ReportBooking> = in_range
        .iter()
        .copied()
        .filter(|b| b.status.is_sold())
        .collect();

    let total_bookings = u32::try_from(in_range.len()).unwrap_or(u32::MAX);
    let status_counts: Vec<StatusCount> = BookingStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: u32::try_from(in_range.iter().filter(|b| b.status == status).count())
                .unwrap_or(u32::MAX),
        })
        .collect();
    let count_of = |status: BookingStatus| {
        status_counts
            .iter()
            .find(|c| c.status == status)
            .map_or(0, |c| c.count)
    };

    let days = range.days();
    let total_rooms: u32 = room_types.iter().map(|t| t.total_rooms).sum();
    let available_room_nights = total_rooms * days;

    let mut room_nights_sold: u32 = 0;
    let mut room_revenue_cents: i64 = 0;
    let mut per_type: HashMap<i64, (u32, u32, i64)> = HashMap::new();
    for booking in &sold {
        let nights = booking.stay.overlap_nights(range.start(), range.end());
        let revenue = prorated_revenue(booking, nights);
        room_nights_sold += nights;
        room_revenue_cents = room_revenue_cents.saturating_add(revenue);
        let entry = per_type.entry(booking.room_id).or_default();
        entry.0 += 1;
        entry.1 += nights;
        entry.2 = entry.2.saturating_add(revenue);
    }

    let room_type_reports: Vec<RoomTypeReport> = room_types
        .iter()
        .map(|t| {
            let (type_bookings, nights, revenue) =
                per_type.get(&t.room_id).copied().unwrap_or_default();
            RoomTypeReport {
                room_id: t.room_id,
                name: t.name.clone(),
                total_rooms: t.total_rooms,
                bookings: type_bookings,
                room_nights_sold: nights,
                revenue_cents: revenue,
                adr_cents: divide_rounded(revenue, nights),
                occupancy_pct: percentage(nights, t.total_rooms * days),
            }
        })
        .collect();

    let daily: Vec<DailyOccupancy> = range
        .dates()
        .map(|date| {
            let rooms_sold =
                u32::try_from(sold.iter().filter(|b| b.stay.contains(date)).count())
                    .unwrap_or(u32::MAX);
            DailyOccupancy {
                date,
                rooms_sold,
                occupancy_pct: percentage(rooms_sold, total_rooms),
            }
        })
        .collect();

    Report {
        range,
        total_bookings,
        total_rooms,
        available_room_nights,
        room_nights_sold,
        room_revenue_cents,
        payments_received_cents: payments
            .iter()
            .fold(0_i64, |acc, p| acc.saturating_add(*p)),
        payments_count: u32::try_from(payments.len()).unwrap_or(u32::MAX),
        occupancy_pct: percentage(room_nights_sold, available_room_nights),
        adr_cents: divide_rounded(room_revenue_cents, room_nights_sold),
        revpar_cents: divide_rounded(room_revenue_cents, available_room_nights),
        cancellation_rate_pct: percentage(count_of(BookingStatus::Cancelled), total_bookings),
        no_show_rate_pct: percentage(count_of(BookingStatus::NoShow), total_bookings),
        room_types: room_type_reports,
        demographics: build_demographics(&sold),
        daily,
        status_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn booking(
        room_id: i64,
        status: BookingStatus,
        check_in: Date,
        check_out: Date,
        total_amount_cents: i64,
    ) -> ReportBooking {
        ReportBooking {
            room_id,
            status,
            stay: StayDates::new(check_in, check_out).unwrap(),
            adults: 2,
            children: 0,
            total_amount_cents,
            country: Some(String::from("NZ")),
            booked_on: date!(2026 - 02 - 20),
        }
    }

    fn room_types() -> Vec<ReportRoomType> {
        vec![
            ReportRoomType {
                room_id: 1,
                name: String::from("Standard"),
                total_rooms: 4,
            },
            ReportRoomType {
                room_id: 2,
                name: String::from("Suite"),
                total_rooms: 1,
            },
        ]
    }

    #[test]
    fn test_kpis_on_fixture() {
        // 10 day range, 5 rooms => 50 available room nights
        let range = ReportRange::new(date!(2026 - 03 - 01), date!(2026 - 03 - 11)).unwrap();
        let bookings = vec![
            // 4 nights entirely inside, 10000 per night
            booking(
                1,
                BookingStatus::CheckedOut,
                date!(2026 - 03 - 02),
                date!(2026 - 03 - 06),
                40_000,
            ),
            // 4 nights, 2 inside the range
            booking(
                2,
                BookingStatus::Confirmed,
                date!(2026 - 03 - 09),
                date!(2026 - 03 - 13),
                100_000,
            ),
            booking(
                1,
                BookingStatus::Cancelled,
                date!(2026 - 03 - 03),
                date!(2026 - 03 - 04),
                10_000,
            ),
            booking(
                1,
                BookingStatus::NoShow,
                date!(2026 - 03 - 05),
                date!(2026 - 03 - 06),
                10_000,
            ),
        ];

        let report = build_report(range, &bookings, &room_types(), &[40_000, 25_000]);

        assert_eq!(report.total_bookings, 4);
        assert_eq!(report.total_rooms, 5);
        assert_eq!(report.available_room_nights, 50);
        assert_eq!(report.room_nights_sold, 6);
        assert_eq!(report.room_revenue_cents, 90_000);
        assert_eq!(report.adr_cents, 15_000);
        assert_eq!(report.revpar_cents, 1_800);
        assert!((report.occupancy_pct - 12.0).abs() < f64::EPSILON);
        assert!((report.cancellation_rate_pct - 25.0).abs() < f64::EPSILON);
        assert!((report.no_show_rate_pct - 25.0).abs() < f64::EPSILON);
        assert_eq!(report.payments_received_cents, 65_000);
        assert_eq!(report.payments_count, 2);

        let suite = report.room_types.iter().find(|t| t.room_id == 2).unwrap();
        assert_eq!(suite.room_nights_sold, 2);
        assert_eq!(suite.revenue_cents, 50_000);
        assert_eq!(suite.adr_cents, 25_000);
        assert!((suite.occupancy_pct - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_occupancy_series() {
        let range = ReportRange::new(date!(2026 - 03 - 01), date!(2026 - 03 - 04)).unwrap();
        let bookings = vec![booking(
            1,
            BookingStatus::Confirmed,
            date!(2026 - 03 - 02),
            date!(2026 - 03 - 03),
            10_000,
        )];
        let report = build_report(range, &bookings, &room_types(), &[]);
        let sold: Vec<u32> = report.daily.iter().map(|d| d.rooms_sold).collect();
        assert_eq!(sold, vec![0, 1, 0]);
        assert!((report.daily[1].occupancy_pct - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_status_breakdown_lists_every_status() {
        let range = ReportRange::new(date!(2026 - 03 - 01), date!(2026 - 03 - 02)).unwrap();
        let report = build_report(range, &[], &room_types(), &[]);
        assert_eq!(report.status_counts.len(), BookingStatus::ALL.len());
        assert_eq!(report.total_bookings, 0);
        assert_eq!(report.adr_cents, 0);
        assert!(report.occupancy_pct.abs() < f64::EPSILON);
    }

    #[test]
    fn test_demographics() {
        let range = ReportRange::new(date!(2026 - 03 - 01), date!(2026 - 03 - 31)).unwrap();
        let mut first = booking(
            1,
            BookingStatus::Confirmed,
            date!(2026 - 03 - 02),
            date!(2026 - 03 - 04),
            20_000,
        );
        first.country = Some(String::from("AU"));
        first.adults = 3;
        let second = booking(
            1,
            BookingStatus::Confirmed,
            date!(2026 - 03 - 10),
            date!(2026 - 03 - 14),
            40_000,
        );
        let report = build_report(range, &[first, second], &room_types(), &[]);
        let demo = &report.demographics;
        assert_eq!(demo.countries[0].country, "AU");
        assert_eq!(demo.countries[0].guests, 3);
        assert!((demo.average_party_size - 2.5).abs() < f64::EPSILON);
        assert!((demo.average_length_of_stay - 3.0).abs() < f64::EPSILON);
        // Lead times of 10 and 18 days
        assert!((demo.average_lead_time_days - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_range_rejects_long_and_reversed_ranges() {
        assert!(ReportRange::new(date!(2026 - 03 - 02), date!(2026 - 03 - 01)).is_err());
        assert!(ReportRange::new(date!(2026 - 03 - 01), date!(2026 - 03 - 01)).is_err());
        assert!(ReportRange::new(date!(2026 - 01 - 01), date!(2027 - 01 - 02)).is_ok());
        assert!(ReportRange::new(date!(2026 - 01 - 01), date!(2027 - 01 - 03)).is_err());
    }
}
