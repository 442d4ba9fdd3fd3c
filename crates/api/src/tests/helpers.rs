// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use innkeep::Notification;
use innkeep_audit::Cause;
use innkeep_domain::{Booking, GuestInfo, StayDates};
use innkeep_persistence::{NewBooking, Persistence};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

use crate::{
    AuthenticatedActor, BookingActionRequest, BookingActionResponse, CreateRoomRequest,
    FixedClock, HotelConfig, HotelServices, Notifier, NotifyError, PaymentRequest, Role,
    RoomInfo, RoomTypeInfo, RoomTypeRequest, create_room, create_room_type,
    perform_booking_action, record_payment,
};

/// Arrival day of the April fixture bookings, mid-afternoon at the hotel.
pub const ARRIVAL_DAY: OffsetDateTime = datetime!(2026 - 04 - 10 15:00 UTC);

pub fn create_test_manager() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("mgr-1"), Role::Manager)
}

pub fn create_test_front_desk() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("desk-1"), Role::FrontDesk)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

/// Keeps every notification it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.kind.as_str())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Refuses every notification.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery(String::from("mail relay unreachable")))
    }
}

pub fn services_at(now: OffsetDateTime, notifier: Arc<dyn Notifier>) -> HotelServices {
    HotelServices::new(HotelConfig::default(), Arc::new(FixedClock(now)), notifier)
}

/// Services on arrival day with a recording notifier.
pub fn arrival_day_services() -> (HotelServices, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let services = services_at(ARRIVAL_DAY, notifier.clone());
    (services, notifier)
}

/// A file path under the temp directory unique to this test run.
pub fn unique_log_path(label: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "innkeep-{label}-{}-{n}.jsonl",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

pub fn seed_room_type(
    persistence: &mut Persistence,
    services: &HotelServices,
    name: &str,
    price_per_night_cents: i64,
    total_rooms: u32,
) -> RoomTypeInfo {
    create_room_type(
        persistence,
        services,
        RoomTypeRequest {
            name: name.to_string(),
            description: None,
            price_per_night_cents,
            max_guests: 2,
            total_rooms,
            is_active: true,
        },
        &create_test_manager(),
        create_test_cause(),
    )
    .unwrap()
    .room_type
}

pub fn seed_room(
    persistence: &mut Persistence,
    services: &HotelServices,
    room_type: &RoomTypeInfo,
    room_number: &str,
) -> RoomInfo {
    create_room(
        persistence,
        services,
        CreateRoomRequest {
            room_id: room_type.room_id,
            room_number: room_number.to_string(),
            floor: Some(1),
            notes: None,
        },
        &create_test_manager(),
        create_test_cause(),
    )
    .unwrap()
    .room
}

pub fn seed_booking(
    persistence: &mut Persistence,
    reference: &str,
    room_type: &RoomTypeInfo,
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
        created_at: datetime!(2026 - 03 - 20 08:00 UTC),
    };
    let booking_id = persistence.insert_booking(&booking).unwrap();
    persistence.get_booking(booking_id).unwrap()
}

/// A booking for the nights of 2026-04-10 to 2026-04-13.
pub fn seed_april_booking(
    persistence: &mut Persistence,
    reference: &str,
    room_type: &RoomTypeInfo,
) -> Booking {
    seed_booking(
        persistence,
        reference,
        room_type,
        date!(2026 - 04 - 10),
        date!(2026 - 04 - 13),
    )
}

pub fn act(
    persistence: &mut Persistence,
    services: &HotelServices,
    booking_id: i64,
    request: BookingActionRequest,
) -> Result<BookingActionResponse, crate::ApiError> {
    perform_booking_action(
        persistence,
        services,
        booking_id,
        request,
        &create_test_front_desk(),
        create_test_cause(),
    )
}

pub fn pay_in_full(persistence: &mut Persistence, services: &HotelServices, booking: &Booking) {
    record_payment(
        persistence,
        services,
        booking.booking_id,
        PaymentRequest {
            amount_cents: booking.total_amount_cents,
            method: String::from("card"),
            transaction_reference: None,
        },
        &create_test_front_desk(),
        create_test_cause(),
    )
    .unwrap();
}
