// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use innkeep_domain::{GuestInfo, StayDates};
use innkeep_persistence::{NewBooking, Persistence};
use std::sync::Arc;
use time::macros::{date, datetime};

use super::helpers::{
    act, arrival_day_services, create_test_front_desk, create_test_manager, pay_in_full,
    seed_april_booking, seed_room_type,
};
use crate::{
    ApiError, BookingActionRequest, FixedClock, HotelConfig, HotelServices, LogNotifier,
    ReportQuery, get_report,
};

fn april() -> ReportQuery {
    ReportQuery {
        start: String::from("2026-04-01"),
        end: String::from("2026-05-01"),
    }
}

#[test]
fn test_report_requires_manager() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let (services, _) = arrival_day_services();

    let err = get_report(&mut persistence, &services, &april(), &create_test_front_desk())
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn test_report_rejects_empty_or_malformed_range() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (services, _) = arrival_day_services();

    let err = get_report(
        &mut persistence,
        &services,
        &ReportQuery {
            start: String::from("2026-04-10"),
            end: String::from("2026-04-10"),
        },
        &create_test_manager(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "range"));

    let err = get_report(
        &mut persistence,
        &services,
        &ReportQuery {
            start: String::from("April 1st"),
            end: String::from("2026-05-01"),
        },
        &create_test_manager(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { .. }));
}

#[test]
fn test_empty_hotel_reports_zeroes() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (services, _) = arrival_day_services();

    let report = get_report(&mut persistence, &services, &april(), &create_test_manager()).unwrap();

    assert_eq!(report.total_bookings, 0);
    assert_eq!(report.available_room_nights, 0);
    assert_eq!(report.adr_cents, 0);
    assert_eq!(report.revpar_cents, 0);
    assert!(report.occupancy_pct.abs() < f64::EPSILON);
    assert_eq!(report.daily.len(), 30);
}

#[test]
fn test_report_kpis_for_one_paid_stay() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (services, _) = arrival_day_services();
    let standard = seed_room_type(&mut persistence, &services, "Standard", 10_000, 2);
    let stay = seed_april_booking(&mut persistence, "BK-1", &standard);
    let cancelled = seed_april_booking(&mut persistence, "BK-2", &standard);
    act(
        &mut persistence,
        &services,
        stay.booking_id,
        BookingActionRequest::Confirm,
    )
    .unwrap();
    pay_in_full(&mut persistence, &services, &stay);
    act(
        &mut persistence,
        &services,
        cancelled.booking_id,
        BookingActionRequest::Cancel { reason: None },
    )
    .unwrap();

    let report = get_report(&mut persistence, &services, &april(), &create_test_manager()).unwrap();

    assert_eq!(report.start, "2026-04-01");
    assert_eq!(report.end, "2026-05-01");
    assert_eq!(report.total_bookings, 2);
    assert_eq!(report.total_rooms, 2);
    assert_eq!(report.available_room_nights, 60);
    assert_eq!(report.room_nights_sold, 3);
    assert_eq!(report.room_revenue_cents, 30_000);
    assert_eq!(report.adr_cents, 10_000);
    assert_eq!(report.revpar_cents, 500);
    assert!((report.occupancy_pct - 5.0).abs() < 1e-9);
    assert!((report.cancellation_rate_pct - 50.0).abs() < 1e-9);
    assert_eq!(report.payments_received_cents, 30_000);
    assert_eq!(report.payments_count, 1);

    assert_eq!(report.room_types.len(), 1);
    assert_eq!(report.room_types[0].name, "Standard");
    assert_eq!(report.room_types[0].room_nights_sold, 3);

    let busy_days = report.daily.iter().filter(|d| d.rooms_sold == 1).count();
    assert_eq!(busy_days, 3);
    assert_eq!(report.demographics.countries[0].country, "NZ");
}

#[test]
fn test_report_dates_follow_hotel_timezone() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    // 2026-04-30 13:00 UTC is 01:00 on 1 May in Auckland.
    let services = HotelServices::new(
        HotelConfig {
            timezone: chrono_tz::Pacific::Auckland,
            ..HotelConfig::default()
        },
        Arc::new(FixedClock(datetime!(2026 - 04 - 30 13:00 UTC))),
        Arc::new(LogNotifier),
    );
    let standard = seed_room_type(&mut persistence, &services, "Standard", 10_000, 2);

    // Booked at 01:00 on 1 April Auckland time, still 31 March in UTC.
    let booking_id = persistence
        .insert_booking(&NewBooking {
            reference: String::from("BK-1"),
            guest: GuestInfo {
                name: String::from("Aroha Ngata"),
                email: String::from("aroha@example.com"),
                phone: None,
                country: Some(String::from("NZ")),
            },
            room_id: standard.room_id,
            stay: StayDates::new(date!(2026 - 04 - 10), date!(2026 - 04 - 13)).unwrap(),
            adults: 2,
            children: 0,
            total_amount_cents: 30_000,
            notes: None,
            created_at: datetime!(2026 - 03 - 31 12:00 UTC),
        })
        .unwrap();
    let booking = persistence.get_booking(booking_id).unwrap();
    act(&mut persistence, &services, booking_id, BookingActionRequest::Confirm).unwrap();
    pay_in_full(&mut persistence, &services, &booking);

    let report = get_report(&mut persistence, &services, &april(), &create_test_manager()).unwrap();
    assert!((report.demographics.average_lead_time_days - 9.0).abs() < 1e-9);
    assert_eq!(report.payments_received_cents, 0);
    assert_eq!(report.payments_count, 0);

    let may = ReportQuery {
        start: String::from("2026-05-01"),
        end: String::from("2026-06-01"),
    };
    let report = get_report(&mut persistence, &services, &may, &create_test_manager()).unwrap();
    assert_eq!(report.payments_received_cents, 30_000);
    assert_eq!(report.payments_count, 1);
}
