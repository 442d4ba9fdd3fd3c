// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wall-clock access and the hotel-local calendar date.
//!
//! Date guards (check-in window, no-show) compare against the date at the
//! hotel, not the UTC date, so a late-evening check-in on the west coast is
//! still "today".

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use time::{Date, Month, OffsetDateTime};

use crate::error::ApiError;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// The operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

fn clock_error(now: OffsetDateTime, detail: &str) -> ApiError {
    ApiError::Internal {
        message: format!("Cannot derive hotel date from {now}: {detail}"),
    }
}

/// Returns the calendar date at the hotel for the instant `now`.
///
/// # Errors
///
/// Returns an error if the instant is outside the range chrono can
/// represent.
pub fn hotel_today(now: OffsetDateTime, tz: Tz) -> Result<Date, ApiError> {
    let utc = DateTime::from_timestamp(now.unix_timestamp(), now.nanosecond())
        .ok_or_else(|| clock_error(now, "timestamp out of range"))?;
    let local = utc.with_timezone(&tz).date_naive();

    let month: Month = u8::try_from(local.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| clock_error(now, "invalid month"))?;
    let day: u8 = u8::try_from(local.day()).map_err(|e| clock_error(now, &e.to_string()))?;

    Date::from_calendar_date(local.year(), month, day).map_err(|e| clock_error(now, &e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_hotel_today_in_utc() {
        let today = hotel_today(datetime!(2026-04-10 23:30 UTC), Tz::UTC).unwrap();
        assert_eq!(today, date!(2026 - 04 - 10));
    }

    #[test]
    fn test_hotel_today_behind_utc() {
        // 03:00 UTC is still the previous evening in Los Angeles
        let today = hotel_today(
            datetime!(2026-04-11 03:00 UTC),
            chrono_tz::America::Los_Angeles,
        )
        .unwrap();
        assert_eq!(today, date!(2026 - 04 - 10));
    }

    #[test]
    fn test_hotel_today_ahead_of_utc() {
        let today = hotel_today(datetime!(2026-04-10 13:00 UTC), chrono_tz::Pacific::Auckland)
            .unwrap();
        assert_eq!(today, date!(2026 - 04 - 11));
    }

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = FixedClock(datetime!(2026-04-10 12:00 UTC));
        assert_eq!(clock.now(), clock.now());
    }
}
