// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use innkeep::CoreError;
use innkeep_domain::DomainError;
use innkeep_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The data changed underneath the request.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// A stable machine-readable code for the error kind.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::AuthenticationFailed { .. } => "authentication_failed",
            Self::Unauthorized { .. } => "unauthorized",
            Self::DomainRuleViolation { rule, .. } => rule.as_str(),
            Self::InvalidInput { .. } => "invalid_input",
            Self::ResourceNotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Internal { .. } => "internal",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

fn rule(rule: &str, message: String) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message,
    }
}

fn invalid(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// Lifecycle and inventory rule breaches become rule violations tagged with
/// a stable rule name; malformed values become invalid input.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidBookingStatus { .. } => invalid("status", message),
        DomainError::InvalidRoomStatus { .. } => invalid("room_status", message),
        DomainError::InvalidPaymentStatus { .. } => invalid("payment_status", message),
        DomainError::InvalidPaymentMethod { .. } => invalid("method", message),
        DomainError::InvalidStatusTransition { .. } => rule("status_transition", message),
        DomainError::BookingTerminal { .. } => rule("booking_terminal", message),
        DomainError::NoAvailability { .. } => rule("no_availability", message),
        DomainError::TentativeNotAllowed { .. } => rule("tentative_not_allowed", message),
        DomainError::TentativeHoldExpired { .. } => rule("tentative_hold_expired", message),
        DomainError::TentativeHoldActive { .. } => rule("tentative_hold_active", message),
        DomainError::PaymentRequired { .. } => rule("payment_required", message),
        DomainError::RoomNotAssigned { .. } => rule("room_not_assigned", message),
        DomainError::RoomUnavailable { .. } => rule("room_unavailable", message),
        DomainError::RoomTypeMismatch { .. } => rule("room_type_mismatch", message),
        DomainError::RoomAlreadyBooked { .. } => rule("room_already_booked", message),
        DomainError::RoomInUse { .. } => rule("room_in_use", message),
        DomainError::ManualOccupancyNotAllowed { .. } => {
            rule("manual_occupancy_not_allowed", message)
        }
        DomainError::CheckInOutsideStay { .. } => rule("check_in_outside_stay", message),
        DomainError::NoShowTooEarly { .. } => rule("no_show_too_early", message),
        DomainError::InvalidStayDates { .. } => invalid("check_out_date", message),
        DomainError::InvalidAmount { .. } | DomainError::AmountOverflow => {
            invalid("amount_cents", message)
        }
        DomainError::CapacityExceeded { .. } => rule("capacity_exceeded", message),
        DomainError::SameRoomType { .. } => rule("same_room_type", message),
        DomainError::RoomTypeInactive { .. } => rule("room_type_inactive", message),
        DomainError::InvalidRoomType(msg) => invalid("room_type", msg),
        DomainError::InvalidRoom(msg) => invalid("room", msg),
        DomainError::DuplicateRoomNumber { .. } => rule("unique_room_number", message),
        DomainError::InventoryOutOfRange { .. } => rule("inventory_out_of_range", message),
        DomainError::InvalidReportRange { .. } => invalid("range", message),
        DomainError::DateParseError { .. } => invalid("date", message),
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::MissingContext(what) => ApiError::Internal {
            message: format!("Transition context incomplete: {what}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Lost optimistic-concurrency races surface as conflicts so the operator
/// can reload and retry.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::BookingNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("Booking {id} does not exist"),
        },
        PersistenceError::RoomTypeNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Room type"),
            message: format!("Room type {id} does not exist"),
        },
        PersistenceError::RoomNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Room"),
            message: format!("Room {id} does not exist"),
        },
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        PersistenceError::ConcurrentModification { .. }
        | PersistenceError::InventoryExhausted { .. }
        | PersistenceError::InventoryAtCapacity { .. } => ApiError::Conflict {
            message: err.to_string(),
        },
        _ => ApiError::Internal {
            message: err.to_string(),
        },
    }
}
