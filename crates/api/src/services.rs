// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;
use time::{Date, OffsetDateTime};

use crate::clock::{Clock, SystemClock, hotel_today};
use crate::config::HotelConfig;
use crate::error::ApiError;
use crate::notify::{LogNotifier, Notifier};

/// Collaborators the booking handlers need besides the database.
#[derive(Clone)]
pub struct HotelServices {
    pub config: HotelConfig,
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn Notifier>,
}

impl HotelServices {
    #[must_use]
    pub fn new(config: HotelConfig, clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            clock,
            notifier,
        }
    }

    /// Services backed by the system clock and the logging notifier.
    #[must_use]
    pub fn with_defaults(config: HotelConfig) -> Self {
        Self::new(config, Arc::new(SystemClock), Arc::new(LogNotifier))
    }

    #[must_use]
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    /// The hotel-local date at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the instant cannot be converted.
    pub fn today(&self, now: OffsetDateTime) -> Result<Date, ApiError> {
        hotel_today(now, self.config.timezone)
    }

    /// The hotel-local calendar date of an earlier or later instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the instant cannot be converted.
    pub fn local_date(&self, at: OffsetDateTime) -> Result<Date, ApiError> {
        hotel_today(at, self.config.timezone)
    }
}
