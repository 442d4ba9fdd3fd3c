// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::fixtures::create_test_booking;
use crate::{BookingStatus, DomainError, StayDates, format_iso_date, parse_iso_date};
use time::macros::date;

#[test]
fn test_stay_requires_check_out_after_check_in() {
    let result = StayDates::new(date!(2026 - 03 - 10), date!(2026 - 03 - 10));
    assert!(matches!(result, Err(DomainError::InvalidStayDates { .. })));
}

#[test]
fn test_stay_nights_and_membership() {
    let stay = StayDates::new(date!(2026 - 02 - 27), date!(2026 - 03 - 02)).unwrap();
    assert_eq!(stay.nights(), 3);
    assert!(stay.contains(date!(2026 - 02 - 27)));
    assert!(stay.contains(date!(2026 - 03 - 01)));
    assert!(!stay.contains(date!(2026 - 03 - 02)));
}

#[test]
fn test_overlap_nights_clips_to_range() {
    let stay = StayDates::new(date!(2026 - 03 - 09), date!(2026 - 03 - 13)).unwrap();
    assert_eq!(
        stay.overlap_nights(date!(2026 - 03 - 01), date!(2026 - 03 - 11)),
        2
    );
    assert_eq!(
        stay.overlap_nights(date!(2026 - 03 - 13), date!(2026 - 03 - 20)),
        0
    );
}

#[test]
fn test_iso_date_round_trip() {
    let parsed = parse_iso_date("2026-03-10").unwrap();
    assert_eq!(parsed, date!(2026 - 03 - 10));
    assert_eq!(format_iso_date(parsed), "2026-03-10");
    assert!(matches!(
        parse_iso_date("10/03/2026"),
        Err(DomainError::DateParseError { .. })
    ));
}

#[test]
fn test_tentative_flag_tracks_status() {
    let booking = create_test_booking(BookingStatus::Tentative);
    assert!(booking.is_tentative());
    assert!(booking.validate_tentative_consistency().is_ok());

    let mut confirmed = create_test_booking(BookingStatus::Confirmed);
    assert!(!confirmed.is_tentative());
    confirmed.tentative_expires_at = booking.tentative_expires_at;
    assert!(confirmed.validate_tentative_consistency().is_err());
}
