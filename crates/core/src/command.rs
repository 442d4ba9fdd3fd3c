// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use innkeep_domain::{BookingAction, PaymentMethod};

/// A command represents operator or system intent as data only.
///
/// Commands are the only way to request booking state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingCommand {
    /// Confirm a pending booking.
    Confirm,
    /// Place a pending booking on a tentative hold.
    MarkTentative,
    /// Convert a tentative hold into a confirmed booking.
    ConvertTentative,
    /// Expire a lapsed tentative hold.
    ExpireTentative,
    CheckIn,
    CheckOut,
    /// Undo a check-in, returning the booking to confirmed.
    CancelCheckIn,
    MarkNoShow,
    Cancel {
        /// Free-text reason recorded in the cancellation log.
        reason: Option<String>,
    },
    /// Assign the individual room supplied in the transition context.
    AssignRoom {
        individual_room_id: i64,
    },
    /// Move the booking to another room type.
    UpgradeRoom {
        /// The target room type.
        target_room_id: i64,
        /// The individual room of the target type to assign, if any.
        individual_room_id: Option<i64>,
        /// Recompute the total as target price times nights.
        reprice: bool,
    },
    UpdateNotes {
        notes: Option<String>,
    },
    RecordPayment {
        amount_cents: i64,
        method: PaymentMethod,
        transaction_reference: Option<String>,
    },
}

impl BookingCommand {
    /// The audit action name of the command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Confirm => "ConfirmBooking",
            Self::MarkTentative => "MarkTentative",
            Self::ConvertTentative => "ConvertTentative",
            Self::ExpireTentative => "ExpireTentative",
            Self::CheckIn => "CheckIn",
            Self::CheckOut => "CheckOut",
            Self::CancelCheckIn => "CancelCheckIn",
            Self::MarkNoShow => "MarkNoShow",
            Self::Cancel { .. } => "CancelBooking",
            Self::AssignRoom { .. } => "AssignRoom",
            Self::UpgradeRoom { .. } => "UpgradeRoom",
            Self::UpdateNotes { .. } => "UpdateNotes",
            Self::RecordPayment { .. } => "RecordPayment",
        }
    }

    /// The lifecycle action this command performs, if it is one.
    ///
    /// Notes and payments are allowed in every status and are not
    /// lifecycle actions.
    #[must_use]
    pub const fn action(&self) -> Option<BookingAction> {
        match self {
            Self::Confirm => Some(BookingAction::Confirm),
            Self::MarkTentative => Some(BookingAction::MarkTentative),
            Self::ConvertTentative => Some(BookingAction::ConvertTentative),
            Self::ExpireTentative => Some(BookingAction::ExpireTentative),
            Self::CheckIn => Some(BookingAction::CheckIn),
            Self::CheckOut => Some(BookingAction::CheckOut),
            Self::CancelCheckIn => Some(BookingAction::CancelCheckIn),
            Self::MarkNoShow => Some(BookingAction::MarkNoShow),
            Self::Cancel { .. } => Some(BookingAction::Cancel),
            Self::AssignRoom { .. } => Some(BookingAction::AssignRoom),
            Self::UpgradeRoom { .. } => Some(BookingAction::UpgradeRoom),
            Self::UpdateNotes { .. } | Self::RecordPayment { .. } => None,
        }
    }
}
