// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use innkeep::BookingCommand;
use innkeep_domain::{BookingStatus, PaymentMethod, ReportRange, StayDates};
use time::macros::{date, datetime};

use super::{load_context, run_command, seed_april_booking, seed_booking, seed_room, seed_room_type};
use crate::{
    BookingFilter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Persistence, PersistenceError,
    format_timestamp, parse_timestamp,
};

#[test]
fn test_page_size_is_clamped() {
    let default = BookingFilter::default();
    assert_eq!(default.page_size(), DEFAULT_PAGE_SIZE);
    assert_eq!(default.offset(), 0);

    let huge = BookingFilter {
        per_page: 500,
        ..BookingFilter::default()
    };
    assert_eq!(huge.page_size(), MAX_PAGE_SIZE);

    let third = BookingFilter {
        page: 3,
        per_page: 10,
        ..BookingFilter::default()
    };
    assert_eq!(third.offset(), 20);
}

#[test]
fn test_booking_list_filters_and_paginates() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let queen = seed_room_type(&mut persistence, "Standard Queen", 15_000, 10);
    for day in 1..=5_u8 {
        seed_booking(
            &mut persistence,
            &format!("BK-70{day:02}"),
            &queen,
            date!(2026 - 05 - 01).replace_day(day).unwrap(),
            date!(2026 - 05 - 10),
        );
    }
    let confirmed = seed_april_booking(&mut persistence, "BK-7100", &queen);
    let ctx = load_context(&mut persistence, confirmed.booking_id, datetime!(2026 - 04 - 01 09:00 UTC));
    run_command(&mut persistence, &ctx, BookingCommand::Confirm).unwrap();

    let first_page = persistence
        .list_bookings(&BookingFilter {
            page: 1,
            per_page: 4,
            ..BookingFilter::default()
        })
        .unwrap();
    assert_eq!(first_page.total, 6);
    assert_eq!(first_page.bookings.len(), 4);
    assert_eq!(first_page.bookings[0].reference, "BK-7005");

    let second_page = persistence
        .list_bookings(&BookingFilter {
            page: 2,
            per_page: 4,
            ..BookingFilter::default()
        })
        .unwrap();
    assert_eq!(second_page.bookings.len(), 2);
    assert_eq!(second_page.bookings[1].reference, "BK-7100");

    let by_status = persistence
        .list_bookings(&BookingFilter {
            status: Some(BookingStatus::Confirmed),
            ..BookingFilter::default()
        })
        .unwrap();
    assert_eq!(by_status.total, 1);

    let by_email = persistence
        .list_bookings(&BookingFilter {
            search: Some(String::from("bk-7003@")),
            ..BookingFilter::default()
        })
        .unwrap();
    assert_eq!(by_email.total, 1);
    assert_eq!(by_email.bookings[0].reference, "BK-7003");

    let literal_percent = persistence
        .list_bookings(&BookingFilter {
            search: Some(String::from("%")),
            ..BookingFilter::default()
        })
        .unwrap();
    assert_eq!(literal_percent.total, 0);

    let by_dates = persistence
        .list_bookings(&BookingFilter {
            check_in_from: Some(date!(2026 - 05 - 02)),
            check_in_to: Some(date!(2026 - 05 - 03)),
            ..BookingFilter::default()
        })
        .unwrap();
    assert_eq!(by_dates.total, 2);
}

#[test]
fn test_booking_search_matches_underscores_literally() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let queen = seed_room_type(&mut persistence, "Standard Queen", 15_000, 10);
    seed_april_booking(&mut persistence, "BK_42", &queen);
    seed_april_booking(&mut persistence, "BKX42", &queen);
    seed_april_booking(&mut persistence, "BK-99", &queen);

    let search = |persistence: &mut Persistence, text: &str| {
        persistence
            .list_bookings(&BookingFilter {
                search: Some(text.to_string()),
                ..BookingFilter::default()
            })
            .unwrap()
    };

    let by_email = search(&mut persistence, "bk_42@example.com");
    assert_eq!(by_email.total, 1);
    assert_eq!(by_email.bookings[0].reference, "BK_42");

    let by_reference = search(&mut persistence, "BK_42");
    assert_eq!(by_reference.total, 1);
    assert_eq!(by_reference.bookings[0].reference, "BK_42");

    assert_eq!(search(&mut persistence, "bk-99").total, 1);
    assert_eq!(search(&mut persistence, "BK\\42").total, 0);
}

#[test]
fn test_occupancies_cover_only_overlapping_assignments() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let queen = seed_room_type(&mut persistence, "Standard Queen", 15_000, 4);
    let room = seed_room(&mut persistence, &queen, "101");
    let booking = seed_april_booking(&mut persistence, "BK-8001", &queen);

    let mut ctx = load_context(&mut persistence, booking.booking_id, datetime!(2026 - 04 - 01 09:00 UTC));
    ctx.auto_assign_room = Some(room.clone());
    run_command(&mut persistence, &ctx, BookingCommand::Confirm).unwrap();

    let overlapping = StayDates::new(date!(2026 - 04 - 12), date!(2026 - 04 - 14)).unwrap();
    let occupancies = persistence.list_occupancies(&overlapping).unwrap();
    assert_eq!(occupancies.len(), 1);
    assert_eq!(occupancies[0].individual_room_id, room.individual_room_id);
    assert_eq!(occupancies[0].reference, "BK-8001");

    // Checking in on the day the previous guest leaves is not a conflict.
    let back_to_back = StayDates::new(date!(2026 - 04 - 13), date!(2026 - 04 - 15)).unwrap();
    assert!(persistence.list_occupancies(&back_to_back).unwrap().is_empty());
}

#[test]
fn test_report_rows_follow_the_range() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let queen = seed_room_type(&mut persistence, "Standard Queen", 15_000, 4);
    let april = seed_april_booking(&mut persistence, "BK-9001", &queen);
    seed_booking(
        &mut persistence,
        "BK-9002",
        &queen,
        date!(2026 - 06 - 01),
        date!(2026 - 06 - 03),
    );

    let ctx = load_context(&mut persistence, april.booking_id, datetime!(2026 - 04 - 02 10:00 UTC));
    run_command(
        &mut persistence,
        &ctx,
        BookingCommand::RecordPayment {
            amount_cents: 20_000,
            method: PaymentMethod::Cash,
            transaction_reference: None,
        },
    )
    .unwrap();

    let range = ReportRange::new(date!(2026 - 04 - 01), date!(2026 - 04 - 15)).unwrap();
    let bookings = persistence.get_report_bookings(&range).unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].reference, "BK-9001");
    assert_eq!(bookings[0].created_at, datetime!(2026 - 03 - 20 08:00 UTC));
    let payments = persistence.get_report_payments(&range).unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount_cents, 20_000);
    assert_eq!(payments[0].paid_at, datetime!(2026 - 04 - 02 10:00 UTC));

    // The window reaches one UTC day past each end of the range.
    let next_day = ReportRange::new(date!(2026 - 04 - 03), date!(2026 - 04 - 15)).unwrap();
    assert_eq!(persistence.get_report_payments(&next_day).unwrap().len(), 1);
    let day_before = ReportRange::new(date!(2026 - 03 - 25), date!(2026 - 04 - 02)).unwrap();
    assert_eq!(persistence.get_report_payments(&day_before).unwrap().len(), 1);

    let later = ReportRange::new(date!(2026 - 04 - 04), date!(2026 - 04 - 15)).unwrap();
    assert!(persistence.get_report_payments(&later).unwrap().is_empty());
    let earlier = ReportRange::new(date!(2026 - 03 - 25), date!(2026 - 04 - 01)).unwrap();
    assert!(persistence.get_report_payments(&earlier).unwrap().is_empty());

    let room_types = persistence.get_report_room_types().unwrap();
    assert_eq!(room_types.len(), 1);
    assert_eq!(room_types[0].total_rooms, 4);
}

#[test]
fn test_missing_booking_is_reported() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(matches!(
        persistence.get_booking(999),
        Err(PersistenceError::BookingNotFound(999))
    ));
    assert!(matches!(
        persistence.get_individual_room(42),
        Err(PersistenceError::RoomNotFound(42))
    ));
}

#[test]
fn test_timestamps_are_stored_as_utc() {
    let stored = format_timestamp(datetime!(2026 - 04 - 01 21:00 +12:00)).unwrap();
    assert_eq!(stored, "2026-04-01T09:00:00Z");
    assert_eq!(
        parse_timestamp(&stored).unwrap(),
        datetime!(2026 - 04 - 01 09:00 UTC)
    );
    assert!(parse_timestamp("yesterday").is_err());
}
