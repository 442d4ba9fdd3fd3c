// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Hotel operating settings.

use chrono_tz::Tz;
use std::path::PathBuf;
use thiserror::Error;
use time::Duration;

/// Longest tentative hold an operator may configure.
pub const MAX_TENTATIVE_HOLD_HOURS: u32 = 24 * 14;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown timezone '{0}', expected an IANA name such as 'Europe/London'")]
    UnknownTimezone(String),
    #[error("tentative hold must be between 1 and {max} hours, got {hours}")]
    InvalidTentativeHold { hours: u32, max: u32 },
    #[error("cancellation log path '{0}' has no file name")]
    InvalidCancellationLogPath(PathBuf),
}

/// Settings the booking handlers consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelConfig {
    /// Timezone the hotel's calendar runs in.
    pub timezone: Tz,
    pub tentative_hold_hours: u32,
    /// Assign the first free individual room when a booking is confirmed.
    pub auto_assign_on_confirm: bool,
    /// JSON-lines file receiving one record per cancellation.
    pub cancellation_log_path: Option<PathBuf>,
}

impl Default for HotelConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            tentative_hold_hours: 24,
            auto_assign_on_confirm: true,
            cancellation_log_path: None,
        }
    }
}

impl HotelConfig {
    /// Builds a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the timezone is unknown, the hold length is out
    /// of range or the cancellation log path names a directory.
    pub fn new(
        timezone: &str,
        tentative_hold_hours: u32,
        auto_assign_on_confirm: bool,
        cancellation_log_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let timezone = parse_timezone(timezone)?;
        if tentative_hold_hours == 0 || tentative_hold_hours > MAX_TENTATIVE_HOLD_HOURS {
            return Err(ConfigError::InvalidTentativeHold {
                hours: tentative_hold_hours,
                max: MAX_TENTATIVE_HOLD_HOURS,
            });
        }
        if let Some(path) = cancellation_log_path
            .as_ref()
            .filter(|path| path.file_name().is_none())
        {
            return Err(ConfigError::InvalidCancellationLogPath(path.clone()));
        }

        Ok(Self {
            timezone,
            tentative_hold_hours,
            auto_assign_on_confirm,
            cancellation_log_path,
        })
    }

    #[must_use]
    pub fn tentative_hold(&self) -> Duration {
        Duration::hours(i64::from(self.tentative_hold_hours))
    }
}

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns an error if chrono-tz does not know the name.
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = HotelConfig::new("Europe/London", 48, false, None).unwrap();
        assert_eq!(config.timezone, chrono_tz::Europe::London);
        assert_eq!(config.tentative_hold(), Duration::hours(48));
        assert!(!config.auto_assign_on_confirm);
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let err = HotelConfig::new("Mars/Olympus_Mons", 24, true, None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownTimezone(String::from("Mars/Olympus_Mons"))
        );
    }

    #[test]
    fn test_hold_hours_bounds() {
        assert!(matches!(
            HotelConfig::new("UTC", 0, true, None),
            Err(ConfigError::InvalidTentativeHold { hours: 0, .. })
        ));
        assert!(HotelConfig::new("UTC", MAX_TENTATIVE_HOLD_HOURS, true, None).is_ok());
        assert!(HotelConfig::new("UTC", MAX_TENTATIVE_HOLD_HOURS + 1, true, None).is_err());
    }

    #[test]
    fn test_cancellation_log_path_needs_file_name() {
        let err = HotelConfig::new("UTC", 24, true, Some(PathBuf::from("/"))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCancellationLogPath(_)));
    }
}
