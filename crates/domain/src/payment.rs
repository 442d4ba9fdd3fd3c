// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment status and payment method types.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Denormalized payment state carried on a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }

    /// Derives the payment status from the amount paid so far.
    ///
    /// A booking with a zero total and no payments is unpaid.
    #[must_use]
    pub const fn from_totals(paid_cents: i64, total_cents: i64) -> Self {
        if paid_cents > 0 && paid_cents >= total_cents {
            Self::Paid
        } else if paid_cents > 0 {
            Self::Partial
        } else {
            Self::Unpaid
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            _ => Err(DomainError::InvalidPaymentStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Adds up amounts in minor units.
///
/// # Errors
///
/// Returns `DomainError::AmountOverflow` if the sum does not fit in an `i64`.
pub fn sum_amounts<I>(amounts: I) -> Result<i64, DomainError>
where
    I: IntoIterator<Item = i64>,
{
    amounts
        .into_iter()
        .try_fold(0_i64, i64::checked_add)
        .ok_or(DomainError::AmountOverflow)
}

/// The price of a stay of `nights` at a nightly rate.
///
/// # Errors
///
/// Returns `DomainError::AmountOverflow` if the price does not fit in an `i64`.
pub fn stay_price(price_per_night_cents: i64, nights: u32) -> Result<i64, DomainError> {
    price_per_night_cents
        .checked_mul(i64::from(nights))
        .ok_or(DomainError::AmountOverflow)
}

/// How a payment was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Online,
    Other,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::Online => "online",
            Self::Other => "other",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "bank_transfer" => Ok(Self::BankTransfer),
            "online" => Ok(Self::Online),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidPaymentMethod {
                method: s.to_string(),
            }),
        }
    }
}
