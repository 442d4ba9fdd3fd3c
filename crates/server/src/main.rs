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
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod actor;
mod extract;
mod sweeper;

use axum::{
    Json, Router,
    extract::State as AxumState,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use innkeep_api::{
    ApiError, ApiResponse, AvailableRoomsQuery, AvailableRoomsResponse, BookingActionRequest,
    BookingActionResponse, BookingDetailResponse, BookingListResponse, CreateRoomRequest,
    HotelConfig, HotelServices, ListBookingsQuery, ListRoomsQuery, MaintenanceLogResponse,
    NotesRequest, PaymentRequest, ReportQuery, ReportResponse, RoomInfo, RoomResponse,
    RoomStatusRequest, RoomTypeInfo, RoomTypeRequest, RoomTypeResponse, SweepResponse,
    create_room, create_room_type, expire_tentative_bookings, get_booking_detail,
    get_maintenance_log, get_report, list_available_rooms, list_bookings, list_room_types,
    list_rooms, perform_booking_action, record_payment, set_room_status, update_booking_notes,
    update_room_type,
};
use innkeep_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::actor::StaffActor;
use crate::extract::{JsonBody, PathParam, QueryParams};

/// Innkeep Server - HTTP admin backend for a small hotel
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "INNKEEP_DATABASE")]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[arg(long, env = "INNKEEP_MYSQL_URL")]
    mysql_url: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "INNKEEP_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, env = "INNKEEP_PORT", default_value_t = 3000)]
    port: u16,

    /// IANA timezone of the hotel, used for date guards
    #[arg(long, env = "INNKEEP_TIMEZONE", default_value = "UTC")]
    timezone: String,

    /// How long a tentative hold lasts, in hours
    #[arg(long, env = "INNKEEP_TENTATIVE_HOLD_HOURS", default_value_t = 24)]
    tentative_hold_hours: u32,

    /// Do not assign an individual room when a booking is confirmed
    #[arg(long, env = "INNKEEP_NO_AUTO_ASSIGN")]
    no_auto_assign: bool,

    /// Append cancellations to this JSON-lines file
    #[arg(long, env = "INNKEEP_CANCELLATION_LOG")]
    cancellation_log: Option<PathBuf>,

    /// Seconds between tentative hold sweeps; 0 disables the sweeper
    #[arg(long, env = "INNKEEP_SWEEP_INTERVAL_SECS", default_value_t = 300)]
    sweep_interval_secs: u64,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex so one request at a time
/// reads and writes the database.
#[derive(Clone)]
pub struct AppState {
    pub persistence: Arc<Mutex<Persistence>>,
    pub services: HotelServices,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Always false.
    success: bool,
    message: String,
    /// Machine-readable error code.
    code: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
pub struct HttpError {
    status: StatusCode,
    message: String,
    code: String,
}

impl HttpError {
    fn unauthenticated(message: String) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message,
            code: String::from("authentication_failed"),
        }
    }

    /// A request whose body, path or query string could not be read.
    fn malformed_request(status: StatusCode, message: String) -> Self {
        if status.is_server_error() {
            error!(error = %message, "Request extraction failed");
        } else {
            warn!(error = %message, "Malformed request");
        }
        Self {
            status,
            message,
            code: String::from("invalid_input"),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            success: false,
            message: self.message,
            code: self.code,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let code = err.code().to_string();
        let status = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { message } => {
                error!(error = %message, "Internal error");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from("An internal error occurred; please try again"),
                    code,
                };
            }
        };
        if status != StatusCode::NOT_FOUND {
            warn!(code = %code, error = %err, "Request rejected");
        }
        Self {
            status,
            message: err.to_string(),
            code,
        }
    }
}

type ApiJson<T> = Result<Json<ApiResponse<T>>, HttpError>;

#[allow(clippy::unused_async)]
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for GET `/bookings`.
async fn handle_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, _): StaffActor,
    QueryParams(query): QueryParams<ListBookingsQuery>,
) -> ApiJson<BookingListResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = list_bookings(&mut persistence, &query, &actor)?;
    drop(persistence);

    let message = format!("{} bookings found", response.total);
    Ok(Json(ApiResponse::ok(message, response)))
}

/// Handler for GET `/bookings/{id}`.
async fn handle_get_booking(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, _): StaffActor,
    PathParam(booking_id): PathParam<i64>,
) -> ApiJson<BookingDetailResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = get_booking_detail(&mut persistence, booking_id, &actor)?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        format!("Booking {}", response.booking.reference),
        response,
    )))
}

/// Handler for POST `/bookings/{id}/actions`.
async fn handle_booking_action(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, cause): StaffActor,
    PathParam(booking_id): PathParam<i64>,
    JsonBody(request): JsonBody<BookingActionRequest>,
) -> ApiJson<BookingActionResponse> {
    info!(
        actor_id = %actor.id,
        booking_id,
        action = ?request,
        "Handling booking action"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response = perform_booking_action(
        &mut persistence,
        &app_state.services,
        booking_id,
        request,
        &actor,
        cause,
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(response.message.clone(), response)))
}

/// Handler for POST `/bookings/{id}/notes`.
async fn handle_update_notes(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, cause): StaffActor,
    PathParam(booking_id): PathParam<i64>,
    JsonBody(request): JsonBody<NotesRequest>,
) -> ApiJson<BookingActionResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = update_booking_notes(
        &mut persistence,
        &app_state.services,
        booking_id,
        request,
        &actor,
        cause,
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(response.message.clone(), response)))
}

/// Handler for POST `/bookings/{id}/payments`.
async fn handle_record_payment(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, cause): StaffActor,
    PathParam(booking_id): PathParam<i64>,
    JsonBody(request): JsonBody<PaymentRequest>,
) -> ApiJson<BookingActionResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = record_payment(
        &mut persistence,
        &app_state.services,
        booking_id,
        request,
        &actor,
        cause,
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(response.message.clone(), response)))
}

/// Handler for GET `/bookings/{id}/available_rooms`.
async fn handle_available_rooms(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, _): StaffActor,
    PathParam(booking_id): PathParam<i64>,
    QueryParams(query): QueryParams<AvailableRoomsQuery>,
) -> ApiJson<AvailableRoomsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = list_available_rooms(&mut persistence, booking_id, query, &actor)?;
    drop(persistence);

    let message = format!("{} rooms available", response.rooms.len());
    Ok(Json(ApiResponse::ok(message, response)))
}

/// Handler for POST `/tentative/expire`.
async fn handle_expire_tentative(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, cause): StaffActor,
) -> ApiJson<SweepResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response =
        expire_tentative_bookings(&mut persistence, &app_state.services, &actor, &cause)?;
    drop(persistence);

    let message = format!("{} tentative holds expired", response.expired.len());
    Ok(Json(ApiResponse::ok(message, response)))
}

/// Handler for GET `/room_types`.
async fn handle_list_room_types(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, _): StaffActor,
) -> ApiJson<Vec<RoomTypeInfo>> {
    let mut persistence = app_state.persistence.lock().await;
    let room_types = list_room_types(&mut persistence, &actor)?;
    drop(persistence);

    let message = format!("{} room types", room_types.len());
    Ok(Json(ApiResponse::ok(message, room_types)))
}

/// Handler for POST `/room_types`.
async fn handle_create_room_type(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, cause): StaffActor,
    JsonBody(request): JsonBody<RoomTypeRequest>,
) -> ApiJson<RoomTypeResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = create_room_type(
        &mut persistence,
        &app_state.services,
        request,
        &actor,
        cause,
    )?;
    drop(persistence);

    info!(
        room_id = response.room_type.room_id,
        event_id = response.event_id,
        "Created room type"
    );
    let message = format!("Created room type '{}'", response.room_type.name);
    Ok(Json(ApiResponse::ok(message, response)))
}

/// Handler for PUT `/room_types/{id}`.
async fn handle_update_room_type(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, cause): StaffActor,
    PathParam(room_id): PathParam<i64>,
    JsonBody(request): JsonBody<RoomTypeRequest>,
) -> ApiJson<RoomTypeResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = update_room_type(
        &mut persistence,
        &app_state.services,
        room_id,
        request,
        &actor,
        cause,
    )?;
    drop(persistence);

    info!(room_id, event_id = response.event_id, "Updated room type");
    let message = format!("Updated room type '{}'", response.room_type.name);
    Ok(Json(ApiResponse::ok(message, response)))
}

/// Handler for GET `/rooms`.
async fn handle_list_rooms(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, _): StaffActor,
    QueryParams(query): QueryParams<ListRoomsQuery>,
) -> ApiJson<Vec<RoomInfo>> {
    let mut persistence = app_state.persistence.lock().await;
    let rooms = list_rooms(&mut persistence, &query, &actor)?;
    drop(persistence);

    let message = format!("{} rooms", rooms.len());
    Ok(Json(ApiResponse::ok(message, rooms)))
}

/// Handler for POST `/rooms`.
async fn handle_create_room(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, cause): StaffActor,
    JsonBody(request): JsonBody<CreateRoomRequest>,
) -> ApiJson<RoomResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = create_room(
        &mut persistence,
        &app_state.services,
        request,
        &actor,
        cause,
    )?;
    drop(persistence);

    info!(
        individual_room_id = response.room.individual_room_id,
        room_number = %response.room.room_number,
        "Created room"
    );
    let message = format!("Created room {}", response.room.room_number);
    Ok(Json(ApiResponse::ok(message, response)))
}

/// Handler for POST `/rooms/{id}/status`.
async fn handle_set_room_status(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, cause): StaffActor,
    PathParam(individual_room_id): PathParam<i64>,
    JsonBody(request): JsonBody<RoomStatusRequest>,
) -> ApiJson<RoomResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = set_room_status(
        &mut persistence,
        &app_state.services,
        individual_room_id,
        request,
        &actor,
        cause,
    )?;
    drop(persistence);

    let message = format!(
        "Room {} is now {}",
        response.room.room_number, response.room.status
    );
    Ok(Json(ApiResponse::ok(message, response)))
}

/// Handler for GET `/rooms/{id}/maintenance_log`.
async fn handle_maintenance_log(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, _): StaffActor,
    PathParam(individual_room_id): PathParam<i64>,
) -> ApiJson<MaintenanceLogResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = get_maintenance_log(&mut persistence, individual_room_id, &actor)?;
    drop(persistence);

    let message = format!("{} log entries", response.entries.len());
    Ok(Json(ApiResponse::ok(message, response)))
}

/// Handler for GET `/reports`.
async fn handle_report(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(actor, _): StaffActor,
    QueryParams(query): QueryParams<ReportQuery>,
) -> ApiJson<ReportResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = get_report(&mut persistence, &app_state.services, &query, &actor)?;
    drop(persistence);

    let message = format!("Report for {} to {}", response.start, response.end);
    Ok(Json(ApiResponse::ok(message, response)))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/bookings", get(handle_list_bookings))
        .route("/bookings/{id}", get(handle_get_booking))
        .route("/bookings/{id}/actions", post(handle_booking_action))
        .route("/bookings/{id}/notes", post(handle_update_notes))
        .route("/bookings/{id}/payments", post(handle_record_payment))
        .route("/bookings/{id}/available_rooms", get(handle_available_rooms))
        .route("/tentative/expire", post(handle_expire_tentative))
        .route(
            "/room_types",
            get(handle_list_room_types).post(handle_create_room_type),
        )
        .route("/room_types/{id}", put(handle_update_room_type))
        .route("/rooms", get(handle_list_rooms).post(handle_create_room))
        .route("/rooms/{id}/status", post(handle_set_room_status))
        .route("/rooms/{id}/maintenance_log", get(handle_maintenance_log))
        .route("/reports", get(handle_report))
        .with_state(app_state)
}

fn open_persistence(args: &Args) -> Result<Persistence, Box<dyn std::error::Error>> {
    let persistence = if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        Persistence::new_with_mysql(url)?
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    Ok(persistence)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Innkeep Server");

    let config: HotelConfig = HotelConfig::new(
        &args.timezone,
        args.tentative_hold_hours,
        !args.no_auto_assign,
        args.cancellation_log.clone(),
    )?;
    info!(
        timezone = %config.timezone,
        tentative_hold_hours = config.tentative_hold_hours,
        auto_assign_on_confirm = config.auto_assign_on_confirm,
        cancellation_log = ?config.cancellation_log_path,
        "Hotel configuration loaded"
    );

    let persistence: Persistence = open_persistence(&args)?;
    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        services: HotelServices::with_defaults(config),
    };

    let sweeper = (args.sweep_interval_secs > 0).then(|| {
        sweeper::spawn_sweeper(
            app_state.clone(),
            Duration::from_secs(args.sweep_interval_secs),
        )
    });

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    info!("Server stopped");
    Ok(())
}
