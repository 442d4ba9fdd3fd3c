// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod backend_validation_tests;
mod query_tests;

use innkeep::{
    BookingCommand, BookingContext, RoomDraft, RoomTypeDraft, apply_booking_command,
    apply_create_room, apply_create_room_type,
};
use innkeep_audit::{Actor, Cause};
use innkeep_domain::{Booking, GuestInfo, IndividualRoom, RoomType, StayDates};
use time::macros::{date, datetime};
use time::{Date, Duration, OffsetDateTime};

use crate::{NewBooking, PersistedTransition, Persistence, PersistenceError};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("desk-1"), String::from("front_desk"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-789"), String::from("Front desk request"))
}

/// When fixtures are created.
pub const SEEDED_AT: OffsetDateTime = datetime!(2026 - 03 - 20 08:00 UTC);

pub fn seed_room_type(
    persistence: &mut Persistence,
    name: &str,
    price_per_night_cents: i64,
    total_rooms: u32,
) -> RoomType {
    let draft = RoomTypeDraft {
        name: name.to_string(),
        description: None,
        price_per_night_cents,
        max_guests: 2,
        total_rooms,
        is_active: true,
    };
    let creation = apply_create_room_type(draft, create_test_actor(), create_test_cause()).unwrap();
    let room_id = persistence
        .persist_room_type_creation(&creation, SEEDED_AT)
        .unwrap();
    persistence.get_room_type(room_id).unwrap()
}

pub fn seed_room(
    persistence: &mut Persistence,
    room_type: &RoomType,
    room_number: &str,
) -> IndividualRoom {
    let draft = RoomDraft {
        room_id: room_type.room_id,
        room_number: room_number.to_string(),
        floor: Some(1),
        notes: None,
    };
    let creation = apply_create_room(
        draft,
        room_type,
        false,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let id = persistence.persist_room_creation(&creation, SEEDED_AT).unwrap();
    persistence.get_individual_room(id).unwrap()
}

pub fn seed_booking(
    persistence: &mut Persistence,
    reference: &str,
    room_type: &RoomType,
    check_in: Date,
    check_out: Date,
) -> Booking {
    let stay = StayDates::new(check_in, check_out).unwrap();
    let booking = NewBooking {
        reference: reference.to_string(),
        guest: GuestInfo {
            name: format!("Guest {reference}"),
            email: format!("{}@example.com", reference.to_lowercase()),
            phone: None,
            country: Some(String::from("NZ")),
        },
        room_id: room_type.room_id,
        stay,
        adults: 2,
        children: 0,
        total_amount_cents: room_type.price_per_night_cents * i64::from(stay.nights()),
        notes: None,
        created_at: SEEDED_AT,
    };
    let booking_id = persistence.insert_booking(&booking).unwrap();
    persistence.get_booking(booking_id).unwrap()
}

/// A booking for the nights of 2026-04-10 to 2026-04-13.
pub fn seed_april_booking(
    persistence: &mut Persistence,
    reference: &str,
    room_type: &RoomType,
) -> Booking {
    seed_booking(
        persistence,
        reference,
        room_type,
        date!(2026 - 04 - 10),
        date!(2026 - 04 - 13),
    )
}

/// Loads everything a transition of `booking_id` consults at `now`.
pub fn load_context(
    persistence: &mut Persistence,
    booking_id: i64,
    now: OffsetDateTime,
) -> BookingContext {
    let booking = persistence.get_booking(booking_id).unwrap();
    let room_type = persistence.get_room_type(booking.room_id).unwrap();
    let occupancies = persistence.list_occupancies(&booking.stay).unwrap();
    let (paid_cents, payment_count) = persistence.payment_totals(booking_id).unwrap();
    let assigned_room = booking
        .individual_room_id
        .map(|id| persistence.get_individual_room(id).unwrap());

    let mut ctx = BookingContext::new(booking, room_type, now.date(), now, Duration::hours(24));
    ctx.assigned_room = assigned_room;
    ctx.occupancies = occupancies;
    ctx.paid_cents = paid_cents;
    ctx.payment_count = payment_count;
    ctx
}

/// Applies a command to a loaded context and persists the result.
pub fn run_command(
    persistence: &mut Persistence,
    ctx: &BookingContext,
    command: BookingCommand,
) -> Result<PersistedTransition, PersistenceError> {
    let result =
        apply_booking_command(ctx, command, create_test_actor(), create_test_cause()).unwrap();
    persistence.persist_booking_transition(&ctx.booking, &result)
}
