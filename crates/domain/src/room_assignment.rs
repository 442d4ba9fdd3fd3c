// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Selection of individual rooms for a stay.
//!
//! An individual room can serve a stay when it belongs to the booked room
//! type, is not out of service, and no other non-terminal booking holding
//! that room overlaps the stay.

use crate::types::{IndividualRoom, StayDates};

/// A stay already assigned to an individual room by a non-terminal booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOccupancy {
    pub individual_room_id: i64,
    pub booking_id: i64,
    pub reference: String,
    pub stay: StayDates,
}

/// Finds an existing assignment on `individual_room_id` overlapping `stay`.
///
/// Assignments belonging to `booking_id` itself are ignored so a booking
/// can be reassigned to the room it already holds.
#[must_use]
pub fn find_conflict<'a>(
    individual_room_id: i64,
    stay: &StayDates,
    booking_id: i64,
    occupancies: &'a [RoomOccupancy],
) -> Option<&'a RoomOccupancy> {
    occupancies.iter().find(|o| {
        o.individual_room_id == individual_room_id
            && o.booking_id != booking_id
            && o.stay.overlaps(stay)
    })
}

/// Orders room numbers so that "9" sorts before "10".
fn room_number_key(room: &IndividualRoom) -> (usize, &str) {
    (room.room_number.len(), room.room_number.as_str())
}

/// Returns the rooms of `room_id` that can serve `stay`, ordered by room
/// number.
#[must_use]
pub fn select_available_rooms(
    rooms: &[IndividualRoom],
    room_id: i64,
    stay: &StayDates,
    booking_id: i64,
    occupancies: &[RoomOccupancy],
) -> Vec<IndividualRoom> {
    let mut candidates: Vec<IndividualRoom> = rooms
        .iter()
        .filter(|r| r.room_id == room_id && r.status.is_assignable())
        .filter(|r| find_conflict(r.individual_room_id, stay, booking_id, occupancies).is_none())
        .cloned()
        .collect();
    candidates.sort_by(|a, b| room_number_key(a).cmp(&room_number_key(b)));
    candidates
}
