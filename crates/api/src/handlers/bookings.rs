// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use innkeep::{BookingCommand, BookingContext, TransitionResult, apply_booking_command};
use innkeep_audit::{Actor, Cause};
use innkeep_domain::{
    Booking, BookingStatus, DomainError, IndividualRoom, Payment, parse_iso_date,
    select_available_rooms, sum_amounts,
};
use innkeep_persistence::{BookingFilter, BookingPage, PersistedTransition, Persistence, RoomFilter};
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::cancellation_log::{CancellationLogEntry, append_entry};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AvailableRoomsQuery, AvailableRoomsResponse, BookingActionRequest, BookingActionResponse,
    BookingDetailResponse, BookingInfo, BookingListResponse, ListBookingsQuery, NotesRequest,
    PaymentInfo, PaymentRequest, RoomInfo, RoomTypeInfo, SweepFailure, SweepResponse,
    TentativeLogInfo, TimelineInfo, parse_payment_method,
};
use crate::services::HotelServices;

fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<Date>, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            parse_iso_date(v).map_err(|e| ApiError::InvalidInput {
                field: field.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}

/// Lists bookings matching the query, newest check-in first.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `query` - Filters and pagination
/// * `authenticated_actor` - The authenticated actor performing this action
///
/// # Errors
///
/// Returns an error if a filter value is malformed or the database cannot
/// be queried.
pub fn list_bookings(
    persistence: &mut Persistence,
    query: &ListBookingsQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BookingListResponse, ApiError> {
    AuthorizationService::authorize_booking_action(authenticated_actor)?;

    let status: Option<BookingStatus> = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<BookingStatus>)
        .transpose()
        .map_err(translate_domain_error)?;

    let filter = BookingFilter {
        status,
        search: query.search.clone(),
        check_in_from: parse_optional_date("check_in_from", query.check_in_from.as_deref())?,
        check_in_to: parse_optional_date("check_in_to", query.check_in_to.as_deref())?,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(0),
    };

    let page: BookingPage = persistence
        .list_bookings(&filter)
        .map_err(translate_persistence_error)?;
    debug!(
        total = page.total,
        page = page.page,
        returned = page.bookings.len(),
        "Listed bookings"
    );

    Ok(BookingListResponse {
        bookings: page
            .bookings
            .iter()
            .map(BookingInfo::from_booking)
            .collect::<Result<_, _>>()?,
        total: page.total,
        page: page.page,
        per_page: page.per_page,
    })
}

/// Returns a booking with its room type, room, payments and history.
///
/// # Errors
///
/// Returns an error if the booking does not exist or the database cannot
/// be queried.
pub fn get_booking_detail(
    persistence: &mut Persistence,
    booking_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BookingDetailResponse, ApiError> {
    AuthorizationService::authorize_booking_action(authenticated_actor)?;

    let booking: Booking = persistence
        .get_booking(booking_id)
        .map_err(translate_persistence_error)?;
    let room_type = persistence
        .get_room_type(booking.room_id)
        .map_err(translate_persistence_error)?;
    let assigned_room: Option<IndividualRoom> = booking
        .individual_room_id
        .map(|id| persistence.get_individual_room(id))
        .transpose()
        .map_err(translate_persistence_error)?;
    let payments: Vec<Payment> = persistence
        .list_payments(booking_id)
        .map_err(translate_persistence_error)?;
    let timeline = persistence
        .get_booking_timeline(booking_id)
        .map_err(translate_persistence_error)?;
    let tentative_log = persistence
        .get_tentative_log(booking_id)
        .map_err(translate_persistence_error)?;

    let amount_paid_cents: i64 =
        sum_amounts(payments.iter().map(|p| p.amount_cents)).map_err(translate_domain_error)?;

    Ok(BookingDetailResponse {
        booking: BookingInfo::from_booking(&booking)?,
        room_type: RoomTypeInfo::from(&room_type),
        assigned_room: assigned_room.as_ref().map(RoomInfo::from),
        payments: payments
            .iter()
            .map(PaymentInfo::from_payment)
            .collect::<Result<_, _>>()?,
        amount_paid_cents,
        balance_due_cents: booking
            .total_amount_cents
            .saturating_sub(amount_paid_cents)
            .max(0),
        timeline: timeline
            .iter()
            .map(TimelineInfo::from_entry)
            .collect::<Result<_, _>>()?,
        tentative_log: tentative_log
            .iter()
            .map(TentativeLogInfo::from_record)
            .collect::<Result<_, _>>()?,
        available_actions: booking
            .status
            .available_actions()
            .iter()
            .map(|a| a.as_str().to_string())
            .collect(),
    })
}

/// Lists the individual rooms a booking could be assigned to.
///
/// Candidates are free for the whole stay, not under maintenance or out of
/// order, and ordered by room number.
///
/// # Errors
///
/// Returns an error if the booking or room type does not exist or the
/// booking is already closed.
pub fn list_available_rooms(
    persistence: &mut Persistence,
    booking_id: i64,
    query: AvailableRoomsQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AvailableRoomsResponse, ApiError> {
    AuthorizationService::authorize_booking_action(authenticated_actor)?;

    let booking: Booking = persistence
        .get_booking(booking_id)
        .map_err(translate_persistence_error)?;
    if booking.status.is_terminal() {
        return Err(translate_domain_error(DomainError::BookingTerminal {
            reference: booking.reference,
            status: booking.status.as_str().to_string(),
        }));
    }

    let room_id = query.room_id.unwrap_or(booking.room_id);
    // Validates the room type exists
    persistence
        .get_room_type(room_id)
        .map_err(translate_persistence_error)?;

    let rooms = persistence
        .list_individual_rooms(RoomFilter {
            room_id: Some(room_id),
            status: None,
        })
        .map_err(translate_persistence_error)?;
    let occupancies = persistence
        .list_occupancies(&booking.stay)
        .map_err(translate_persistence_error)?;
    let candidates = select_available_rooms(
        &rooms,
        room_id,
        &booking.stay,
        booking.booking_id,
        &occupancies,
    );

    Ok(AvailableRoomsResponse {
        booking_id,
        room_id,
        rooms: candidates.iter().map(RoomInfo::from).collect(),
    })
}

/// Applies a lifecycle action to a booking.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `services` - Configuration, clock and notifier
/// * `booking_id` - The booking to change
/// * `request` - The action and its parameters
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - the booking, target room or target room type does not exist
/// - the action violates a lifecycle rule
/// - the booking changed since it was read
pub fn perform_booking_action(
    persistence: &mut Persistence,
    services: &HotelServices,
    booking_id: i64,
    request: BookingActionRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<BookingActionResponse, ApiError> {
    AuthorizationService::authorize_booking_action(authenticated_actor)?;
    run_booking_command(
        persistence,
        services,
        booking_id,
        request.into_command(),
        authenticated_actor.to_audit_actor(),
        cause,
    )
}

/// Replaces a booking's internal notes. Allowed in every status.
///
/// # Errors
///
/// Returns an error if the booking does not exist or changed since it was
/// read.
pub fn update_booking_notes(
    persistence: &mut Persistence,
    services: &HotelServices,
    booking_id: i64,
    request: NotesRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<BookingActionResponse, ApiError> {
    AuthorizationService::authorize_booking_action(authenticated_actor)?;
    run_booking_command(
        persistence,
        services,
        booking_id,
        BookingCommand::UpdateNotes {
            notes: request.notes,
        },
        authenticated_actor.to_audit_actor(),
        cause,
    )
}

/// Records a payment and recomputes the booking's payment status.
///
/// # Errors
///
/// Returns an error if the method is unknown, the amount is not positive or
/// the booking does not exist.
pub fn record_payment(
    persistence: &mut Persistence,
    services: &HotelServices,
    booking_id: i64,
    request: PaymentRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<BookingActionResponse, ApiError> {
    AuthorizationService::authorize_booking_action(authenticated_actor)?;
    let method = parse_payment_method(&request.method)?;
    run_booking_command(
        persistence,
        services,
        booking_id,
        BookingCommand::RecordPayment {
            amount_cents: request.amount_cents,
            method,
            transaction_reference: request.transaction_reference,
        },
        authenticated_actor.to_audit_actor(),
        cause,
    )
}

/// Expires every tentative hold that has lapsed, on an operator's request.
///
/// # Errors
///
/// Returns an error if the lapsed holds cannot be listed. Failures on
/// individual bookings are reported in the response instead.
pub fn expire_tentative_bookings(
    persistence: &mut Persistence,
    services: &HotelServices,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
) -> Result<SweepResponse, ApiError> {
    AuthorizationService::authorize_booking_action(authenticated_actor)?;
    sweep_tentative_holds(
        persistence,
        services,
        &authenticated_actor.to_audit_actor(),
        cause,
    )
}

/// Expires every tentative hold that has lapsed at the services' clock.
///
/// Each booking is expired in its own transaction; one failure does not
/// stop the sweep.
///
/// # Errors
///
/// Returns an error if the lapsed holds cannot be listed.
pub fn sweep_tentative_holds(
    persistence: &mut Persistence,
    services: &HotelServices,
    actor: &Actor,
    cause: &Cause,
) -> Result<SweepResponse, ApiError> {
    let lapsed: Vec<Booking> = persistence
        .list_lapsed_tentative_bookings(services.now())
        .map_err(translate_persistence_error)?;

    let mut response = SweepResponse::default();
    for booking in lapsed {
        match run_booking_command(
            persistence,
            services,
            booking.booking_id,
            BookingCommand::ExpireTentative,
            actor.clone(),
            cause.clone(),
        ) {
            Ok(_) => response.expired.push(booking.reference),
            Err(err) => {
                warn!(
                    booking_id = booking.booking_id,
                    reference = %booking.reference,
                    error = %err,
                    "Failed to expire tentative hold"
                );
                response.failed.push(SweepFailure {
                    reference: booking.reference,
                    message: err.to_string(),
                });
            }
        }
    }

    if !response.expired.is_empty() || !response.failed.is_empty() {
        info!(
            expired = response.expired.len(),
            failed = response.failed.len(),
            "Tentative hold sweep finished"
        );
    }
    Ok(response)
}

/// Loads the booking and every collaborator `command` consults.
fn load_context(
    persistence: &mut Persistence,
    services: &HotelServices,
    booking_id: i64,
    command: &BookingCommand,
) -> Result<BookingContext, ApiError> {
    let booking: Booking = persistence
        .get_booking(booking_id)
        .map_err(translate_persistence_error)?;
    let room_type = persistence
        .get_room_type(booking.room_id)
        .map_err(translate_persistence_error)?;
    let now: OffsetDateTime = services.now();
    let today: Date = services.today(now)?;

    let mut ctx = BookingContext::new(
        booking,
        room_type,
        today,
        now,
        services.config.tentative_hold(),
    );

    if let Some(id) = ctx.booking.individual_room_id {
        ctx.assigned_room = Some(
            persistence
                .get_individual_room(id)
                .map_err(translate_persistence_error)?,
        );
    }
    let (paid_cents, payment_count) = persistence
        .payment_totals(booking_id)
        .map_err(translate_persistence_error)?;
    ctx.paid_cents = paid_cents;
    ctx.payment_count = payment_count;

    match command {
        BookingCommand::AssignRoom { individual_room_id } => {
            ctx.target_room = Some(
                persistence
                    .get_individual_room(*individual_room_id)
                    .map_err(translate_persistence_error)?,
            );
            ctx.occupancies = persistence
                .list_occupancies(&ctx.booking.stay)
                .map_err(translate_persistence_error)?;
        }
        BookingCommand::UpgradeRoom {
            target_room_id,
            individual_room_id,
            ..
        } => {
            ctx.target_room_type = Some(
                persistence
                    .get_room_type(*target_room_id)
                    .map_err(translate_persistence_error)?,
            );
            if let Some(id) = individual_room_id {
                ctx.target_room = Some(
                    persistence
                        .get_individual_room(*id)
                        .map_err(translate_persistence_error)?,
                );
            }
            ctx.occupancies = persistence
                .list_occupancies(&ctx.booking.stay)
                .map_err(translate_persistence_error)?;
        }
        BookingCommand::Confirm
            if services.config.auto_assign_on_confirm
                && ctx.booking.individual_room_id.is_none() =>
        {
            ctx.occupancies = persistence
                .list_occupancies(&ctx.booking.stay)
                .map_err(translate_persistence_error)?;
            let rooms = persistence
                .list_individual_rooms(RoomFilter {
                    room_id: Some(ctx.booking.room_id),
                    status: None,
                })
                .map_err(translate_persistence_error)?;
            ctx.auto_assign_room = select_available_rooms(
                &rooms,
                ctx.booking.room_id,
                &ctx.booking.stay,
                ctx.booking.booking_id,
                &ctx.occupancies,
            )
            .into_iter()
            .next();
        }
        _ => {}
    }

    Ok(ctx)
}

fn run_booking_command(
    persistence: &mut Persistence,
    services: &HotelServices,
    booking_id: i64,
    command: BookingCommand,
    actor: Actor,
    cause: Cause,
) -> Result<BookingActionResponse, ApiError> {
    let ctx: BookingContext = load_context(persistence, services, booking_id, &command)?;
    let action: &'static str = command.name();

    let result: TransitionResult =
        apply_booking_command(&ctx, command, actor, cause).map_err(|err| {
            warn!(
                booking_id,
                reference = %ctx.booking.reference,
                action,
                error = %err,
                "Booking action rejected"
            );
            translate_core_error(err)
        })?;

    let persisted: PersistedTransition = persistence
        .persist_booking_transition(&ctx.booking, &result)
        .map_err(|err| {
            warn!(booking_id, action, error = %err, "Booking transition not persisted");
            translate_persistence_error(err)
        })?;

    info!(
        booking_id,
        reference = %result.new_booking.reference,
        action,
        from = %ctx.booking.status,
        to = %result.new_booking.status,
        event_id = persisted.event_id,
        "Booking transition committed"
    );

    let warnings: Vec<String> = run_after_commit(services, &result, ctx.now);
    let message: String = if warnings.is_empty() {
        result.message.clone()
    } else {
        format!("{} (with warnings: {})", result.message, warnings.join("; "))
    };

    Ok(BookingActionResponse {
        booking: BookingInfo::from_booking(&result.new_booking)?,
        message,
        event_id: persisted.event_id,
        payment_id: persisted.payment_id,
        warnings,
    })
}

/// Sends the guest notification and appends the cancellation file log.
///
/// Both run after the transaction committed; failures are returned as
/// warnings and never undo the booking change.
fn run_after_commit(
    services: &HotelServices,
    result: &TransitionResult,
    now: OffsetDateTime,
) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();

    if let Some(notification) = &result.notification {
        if let Err(err) = services.notifier.notify(notification) {
            warn!(
                reference = %notification.booking_reference,
                kind = notification.kind.as_str(),
                error = %err,
                "Guest notification failed"
            );
            warnings.push(format!("Guest notification failed: {err}"));
        }
    }

    if let (Some(record), Some(path)) = (
        &result.cancellation,
        &services.config.cancellation_log_path,
    ) {
        let written = CancellationLogEntry::new(
            &result.new_booking,
            record,
            &result.audit_event.actor.id,
            now,
        )
        .and_then(|entry| append_entry(path, &entry));
        if let Err(err) = written {
            warn!(
                reference = %result.new_booking.reference,
                error = %err,
                "Cancellation log write failed"
            );
            warnings.push(format!("Cancellation log write failed: {err}"));
        }
    }

    warnings
}
