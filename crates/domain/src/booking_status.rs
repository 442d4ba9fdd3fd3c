// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking status lifecycle.
//!
//! A booking moves from `pending` towards one of the terminal states
//! `checked-out`, `cancelled` or `no-show`. The `tentative` side-state is a
//! provisional hold that either converts to `confirmed` or expires into
//! `cancelled`. Only operator actions move a booking; the tentative sweep is
//! itself an operator-configured action.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    /// Received but not yet confirmed by the hotel.
    Pending,
    /// Provisionally held until an expiry timestamp.
    Tentative,
    /// Confirmed by the hotel.
    Confirmed,
    /// The guest is in-house.
    CheckedIn,
    /// The guest has departed.
    CheckedOut,
    /// Cancelled by the hotel or by hold expiry.
    Cancelled,
    /// The guest never arrived.
    NoShow,
}

impl BookingStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Tentative,
        Self::Confirmed,
        Self::CheckedIn,
        Self::CheckedOut,
        Self::Cancelled,
        Self::NoShow,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Tentative => "tentative",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked-in",
            Self::CheckedOut => "checked-out",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "tentative" => Ok(Self::Tentative),
            "confirmed" => Ok(Self::Confirmed),
            "checked-in" => Ok(Self::CheckedIn),
            "checked-out" => Ok(Self::CheckedOut),
            "cancelled" => Ok(Self::Cancelled),
            "no-show" => Ok(Self::NoShow),
            _ => Err(DomainError::InvalidBookingStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if the booking can no longer change status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled | Self::NoShow)
    }

    /// Returns true if a booking in this status consumes one unit of its
    /// room type's availability.
    #[must_use]
    pub const fn holds_inventory(&self) -> bool {
        matches!(self, Self::Tentative | Self::Confirmed | Self::CheckedIn)
    }

    /// Returns true once the booking has been confirmed at some point.
    ///
    /// A booking in one of these states can never become tentative again.
    #[must_use]
    pub const fn has_reached_confirmation(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn | Self::CheckedOut)
    }

    /// Returns true if the status counts as sold for room-night reporting.
    #[must_use]
    pub const fn is_sold(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn | Self::CheckedOut)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid = match self {
            Self::Pending => matches!(
                new_status,
                Self::Confirmed | Self::Tentative | Self::NoShow | Self::Cancelled
            ),
            Self::Tentative => matches!(new_status, Self::Confirmed | Self::Cancelled),
            Self::Confirmed => matches!(
                new_status,
                Self::CheckedIn | Self::NoShow | Self::Cancelled
            ),
            // Undoing a check-in returns the booking to confirmed
            Self::CheckedIn => matches!(
                new_status,
                Self::CheckedOut | Self::Confirmed | Self::Cancelled
            ),
            Self::CheckedOut | Self::Cancelled | Self::NoShow => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by booking lifecycle".to_string(),
            })
        }
    }

    /// Returns the operator actions offered for a booking in this status.
    #[must_use]
    pub fn available_actions(&self) -> Vec<BookingAction> {
        match self {
            Self::Pending => vec![
                BookingAction::Confirm,
                BookingAction::MarkTentative,
                BookingAction::MarkNoShow,
                BookingAction::Cancel,
                BookingAction::AssignRoom,
                BookingAction::UpgradeRoom,
            ],
            Self::Tentative => vec![
                BookingAction::ConvertTentative,
                BookingAction::ExpireTentative,
                BookingAction::Cancel,
                BookingAction::AssignRoom,
                BookingAction::UpgradeRoom,
            ],
            Self::Confirmed => vec![
                BookingAction::CheckIn,
                BookingAction::MarkNoShow,
                BookingAction::Cancel,
                BookingAction::AssignRoom,
                BookingAction::UpgradeRoom,
            ],
            Self::CheckedIn => vec![
                BookingAction::CheckOut,
                BookingAction::CancelCheckIn,
                BookingAction::Cancel,
                BookingAction::AssignRoom,
                BookingAction::UpgradeRoom,
            ],
            Self::CheckedOut | Self::Cancelled | Self::NoShow => Vec::new(),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An operator action on a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    Confirm,
    MarkTentative,
    ConvertTentative,
    ExpireTentative,
    CheckIn,
    CheckOut,
    CancelCheckIn,
    MarkNoShow,
    Cancel,
    AssignRoom,
    UpgradeRoom,
}

impl BookingAction {
    /// Returns the wire name of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::MarkTentative => "mark_tentative",
            Self::ConvertTentative => "convert_tentative",
            Self::ExpireTentative => "expire_tentative",
            Self::CheckIn => "check_in",
            Self::CheckOut => "check_out",
            Self::CancelCheckIn => "cancel_check_in",
            Self::MarkNoShow => "mark_no_show",
            Self::Cancel => "cancel",
            Self::AssignRoom => "assign_room",
            Self::UpgradeRoom => "upgrade_room",
        }
    }
}

impl std::fmt::Display for BookingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
