// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::BookingContext;
use innkeep_audit::{Actor, Cause};
use innkeep_domain::{
    Booking, BookingStatus, GuestInfo, IndividualRoom, PaymentStatus, RoomStatus, RoomType,
    StayDates,
};
use time::Duration;
use time::macros::{date, datetime};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("desk-1"), String::from("front_desk"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Front desk request"))
}

pub fn create_test_room_type(room_id: i64, rooms_available: u32) -> RoomType {
    RoomType {
        room_id,
        name: if room_id == 1 {
            String::from("Standard Queen")
        } else {
            String::from("Harbour Suite")
        },
        description: None,
        price_per_night_cents: if room_id == 1 { 15_000 } else { 32_000 },
        max_guests: if room_id == 1 { 2 } else { 4 },
        total_rooms: 4,
        rooms_available,
        is_active: true,
    }
}

pub fn create_test_room(
    individual_room_id: i64,
    room_id: i64,
    status: RoomStatus,
) -> IndividualRoom {
    IndividualRoom {
        individual_room_id,
        room_id,
        room_number: format!("{room_id}0{individual_room_id}"),
        floor: Some(i32::try_from(room_id).unwrap()),
        status,
        notes: None,
    }
}

/// A three-night stay from 2026-04-10 to 2026-04-13 in room type 1.
pub fn create_test_booking(status: BookingStatus) -> Booking {
    Booking {
        booking_id: 11,
        reference: String::from("BK-20260410-011"),
        guest: GuestInfo {
            name: String::from("Mere Tawhiri"),
            email: String::from("mere@example.com"),
            phone: Some(String::from("+64 21 555 0101")),
            country: Some(String::from("NZ")),
        },
        room_id: 1,
        individual_room_id: None,
        stay: StayDates::new(date!(2026 - 04 - 10), date!(2026 - 04 - 13)).unwrap(),
        adults: 2,
        children: 0,
        total_amount_cents: 45_000,
        status,
        tentative_expires_at: (status == BookingStatus::Tentative)
            .then_some(datetime!(2026 - 04 - 02 10:00 UTC)),
        payment_status: PaymentStatus::Unpaid,
        notes: None,
        created_at: datetime!(2026 - 03 - 20 08:00 UTC),
        updated_at: datetime!(2026 - 03 - 20 08:00 UTC),
    }
}

/// A context at 2026-04-01 09:00 UTC with two rooms available.
pub fn create_test_context(booking: Booking) -> BookingContext {
    BookingContext::new(
        booking,
        create_test_room_type(1, 2),
        date!(2026 - 04 - 01),
        datetime!(2026 - 04 - 01 09:00 UTC),
        Duration::hours(24),
    )
}

/// A checked-in context on 2026-04-10 with room 7 occupied by the guest.
pub fn create_checked_in_context() -> BookingContext {
    let mut booking = create_test_booking(BookingStatus::CheckedIn);
    booking.individual_room_id = Some(7);
    booking.payment_status = PaymentStatus::Paid;
    let mut ctx = create_test_context(booking);
    ctx.assigned_room = Some(create_test_room(7, 1, RoomStatus::Occupied));
    ctx.today = date!(2026 - 04 - 10);
    ctx.now = datetime!(2026 - 04 - 10 15:00 UTC);
    ctx.paid_cents = 45_000;
    ctx.payment_count = 1;
    ctx
}
