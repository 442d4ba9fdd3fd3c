// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod inventory;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply_booking_command;
pub use command::BookingCommand;
pub use error::CoreError;
pub use inventory::{
    RoomCreation, RoomDraft, RoomStatusTransition, RoomTypeCreation, RoomTypeDraft,
    RoomTypeTransition, apply_create_room, apply_create_room_type, apply_room_status_change,
    apply_update_room_type,
};
pub use state::{
    BookingContext, CancellationRecord, InventoryAdjustment, NewPayment, Notification,
    NotificationKind, RoomStatusChange, TentativeLogAction, TentativeLogEntry, TransitionResult,
    booking_snapshot, room_snapshot, room_type_snapshot,
};
