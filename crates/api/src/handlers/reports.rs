// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use innkeep_domain::{Booking, Report, ReportBooking, ReportRange, build_report, parse_iso_date};
use innkeep_persistence::Persistence;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{ReportQuery, ReportResponse};
use crate::services::HotelServices;

fn report_booking(services: &HotelServices, booking: Booking) -> Result<ReportBooking, ApiError> {
    Ok(ReportBooking {
        room_id: booking.room_id,
        status: booking.status,
        stay: booking.stay,
        adults: booking.adults,
        children: booking.children,
        total_amount_cents: booking.total_amount_cents,
        booked_on: services.local_date(booking.created_at)?,
        country: booking.guest.country,
    })
}

/// Computes the operational and financial report for `[start, end)`.
///
/// Every figure is computed from the current rows on each request.
/// Booking and payment dates are taken in the hotel's timezone.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `services` - Supplies the hotel timezone
/// * `query` - The range as ISO dates, end exclusive
/// * `authenticated_actor` - The authenticated actor performing this action
///
/// # Errors
///
/// Returns an error if:
/// - the actor is not a manager
/// - a date is malformed
/// - `end` is not after `start` or the range is longer than a year
pub fn get_report(
    persistence: &mut Persistence,
    services: &HotelServices,
    query: &ReportQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ReportResponse, ApiError> {
    AuthorizationService::authorize_reports(authenticated_actor)?;

    let start = parse_iso_date(query.start.trim()).map_err(translate_domain_error)?;
    let end = parse_iso_date(query.end.trim()).map_err(translate_domain_error)?;
    let range: ReportRange = ReportRange::new(start, end).map_err(translate_domain_error)?;

    let bookings: Vec<ReportBooking> = persistence
        .get_report_bookings(&range)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|booking| report_booking(services, booking))
        .collect::<Result<_, _>>()?;
    let room_types = persistence
        .get_report_room_types()
        .map_err(translate_persistence_error)?;

    let mut payments: Vec<i64> = Vec::new();
    for payment in persistence
        .get_report_payments(&range)
        .map_err(translate_persistence_error)?
    {
        if range.contains(services.local_date(payment.paid_at)?) {
            payments.push(payment.amount_cents);
        }
    }

    let report: Report = build_report(range, &bookings, &room_types, &payments);
    info!(
        start = %query.start,
        end = %query.end,
        bookings = report.total_bookings,
        room_nights_sold = report.room_nights_sold,
        "Report generated"
    );

    Ok(ReportResponse::from(report))
}
