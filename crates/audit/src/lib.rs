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
    clippy::all
)]

/// The staff member or process performing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The actor's role (e.g., "manager", "`front_desk`", "system").
    pub role: String,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(id: String, role: String) -> Self {
        Self { id, role }
    }

    /// The actor used by scheduled background work such as the tentative
    /// expiry sweep.
    #[must_use]
    pub fn system() -> Self {
        Self::new(String::from("system"), String::from("system"))
    }
}

/// Why a state change was initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// What was performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`ConfirmBooking`").
    pub name: String,
    /// Optional human readable details.
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// The entity an audit event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditSubject {
    Booking(i64),
    RoomType(i64),
    IndividualRoom(i64),
}

impl AuditSubject {
    /// The stored subject type name.
    #[must_use]
    pub const fn subject_type(&self) -> &'static str {
        match self {
            Self::Booking(_) => "booking",
            Self::RoomType(_) => "room_type",
            Self::IndividualRoom(_) => "individual_room",
        }
    }

    #[must_use]
    pub const fn subject_id(&self) -> i64 {
        match self {
            Self::Booking(id) | Self::RoomType(id) | Self::IndividualRoom(id) => *id,
        }
    }

    /// Rebuilds a subject from its stored parts.
    #[must_use]
    pub fn from_parts(subject_type: &str, subject_id: i64) -> Option<Self> {
        match subject_type {
            "booking" => Some(Self::Booking(subject_id)),
            "room_type" => Some(Self::RoomType(subject_id)),
            "individual_room" => Some(Self::IndividualRoom(subject_id)),
            _ => None,
        }
    }
}

/// A snapshot of the relevant state, as `key=value` pairs joined by commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable record of one successful mutation.
///
/// Every successful state change produces exactly one audit event
/// capturing who, why, what, and the state before and after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub subject: AuditSubject,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `subject` - The entity that changed
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        subject: AuditSubject,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            subject,
            actor,
            cause,
            action,
            before,
            after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_event() -> AuditEvent {
        AuditEvent::new(
            AuditSubject::Booking(42),
            Actor::new(String::from("desk-7"), String::from("front_desk")),
            Cause::new(String::from("req-1"), String::from("Guest phoned ahead")),
            Action::new(String::from("ConfirmBooking"), None),
            StateSnapshot::new(String::from("status=pending")),
            StateSnapshot::new(String::from("status=confirmed")),
        )
    }

    #[test]
    fn test_audit_event_creation_keeps_all_fields() {
        let event: AuditEvent = create_test_event();

        assert_eq!(event.subject, AuditSubject::Booking(42));
        assert_eq!(event.actor.id, "desk-7");
        assert_eq!(event.actor.role, "front_desk");
        assert_eq!(event.cause.description, "Guest phoned ahead");
        assert_eq!(event.action.name, "ConfirmBooking");
        assert_eq!(event.before.data, "status=pending");
        assert_eq!(event.after.data, "status=confirmed");
    }

    #[test]
    fn test_audit_event_equality() {
        assert_eq!(create_test_event(), create_test_event());

        let mut other: AuditEvent = create_test_event();
        other.subject = AuditSubject::Booking(43);
        assert_ne!(create_test_event(), other);
    }

    #[test]
    fn test_subject_round_trip() {
        for subject in [
            AuditSubject::Booking(1),
            AuditSubject::RoomType(2),
            AuditSubject::IndividualRoom(3),
        ] {
            assert_eq!(
                AuditSubject::from_parts(subject.subject_type(), subject.subject_id()),
                Some(subject)
            );
        }
        assert_eq!(AuditSubject::from_parts("guest", 1), None);
    }

    #[test]
    fn test_system_actor() {
        let actor: Actor = Actor::system();
        assert_eq!(actor.id, "system");
        assert_eq!(actor.role, "system");
    }
}
