// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Housekeeping status of an individual room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Cleaning,
    Maintenance,
    OutOfOrder,
}

impl RoomStatus {
    pub const ALL: [Self; 5] = [
        Self::Available,
        Self::Occupied,
        Self::Cleaning,
        Self::Maintenance,
        Self::OutOfOrder,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Cleaning => "cleaning",
            Self::Maintenance => "maintenance",
            Self::OutOfOrder => "out_of_order",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "cleaning" => Ok(Self::Cleaning),
            "maintenance" => Ok(Self::Maintenance),
            "out_of_order" => Ok(Self::OutOfOrder),
            _ => Err(DomainError::InvalidRoomStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if the room may be assigned to a booking.
    ///
    /// Rooms being cleaned or currently occupied can still be assigned to
    /// a future stay; only rooms taken out of service are excluded.
    #[must_use]
    pub const fn is_assignable(&self) -> bool {
        !matches!(self, Self::Maintenance | Self::OutOfOrder)
    }

    /// Returns true if a guest can be checked into the room right now.
    #[must_use]
    pub const fn accepts_check_in(&self) -> bool {
        matches!(self, Self::Available | Self::Cleaning)
    }

    /// The status a room takes when its booking is released.
    #[must_use]
    pub const fn after_release(self) -> Self {
        match self {
            Self::Occupied => Self::Cleaning,
            other => other,
        }
    }
}

impl FromStr for RoomStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
