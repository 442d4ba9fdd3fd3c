// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor identity and role-based authorization.
//!
//! Login and session handling live outside this backend. Callers present an
//! actor id and role that an upstream gateway has already vouched for.

use innkeep_audit::Actor;
use std::str::FromStr;

use crate::error::AuthError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Hotel manager: may do everything, including inventory management
    /// and reporting.
    Manager,
    /// Front desk staff.
    ///
    /// Front desk may:
    /// - run booking lifecycle actions
    /// - edit booking notes and record payments
    /// - change individual room housekeeping status
    FrontDesk,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::FrontDesk => "front_desk",
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manager" => Ok(Self::Manager),
            "front_desk" => Ok(Self::FrontDesk),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role '{s}'. Must be 'manager' or 'front_desk'"),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role.as_str().to_string())
    }
}

/// Builds an actor from the identity an upstream gateway supplied.
///
/// # Arguments
///
/// * `actor_id` - The operator identifier
/// * `role` - The role name, `manager` or `front_desk`
///
/// # Errors
///
/// Returns an error if the id is blank or the role is unknown.
pub fn authenticate_actor(actor_id: &str, role: &str) -> Result<AuthenticatedActor, AuthError> {
    let id = actor_id.trim();
    if id.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    let role: Role = role.parse()?;
    Ok(AuthenticatedActor::new(id.to_string(), role))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Booking lifecycle actions, notes and payments are open to every
    /// staff role.
    ///
    /// # Errors
    ///
    /// Never fails today; kept fallible so handlers treat every check alike.
    pub const fn authorize_booking_action(_actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Ok(())
    }

    /// Housekeeping status changes are open to every staff role.
    ///
    /// # Errors
    ///
    /// Never fails today.
    pub const fn authorize_room_status(_actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Ok(())
    }

    /// Checks if an actor may create or edit room types and rooms.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a manager.
    pub fn authorize_manage_inventory(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_manager(actor, "manage_inventory")
    }

    /// Checks if an actor may read reports.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a manager.
    pub fn authorize_reports(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_manager(actor, "view_reports")
    }

    fn require_manager(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Manager => Ok(()),
            Role::FrontDesk => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: Role::Manager.as_str().to_string(),
            }),
        }
    }
}
