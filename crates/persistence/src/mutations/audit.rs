// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use innkeep_audit::{AuditEvent, AuditSubject};

use crate::backend::PersistenceBackend;
use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::diesel_schema;
use crate::error::PersistenceError;

backend_fn! {
/// Persists an audit event.
///
/// `subject` replaces the event's own subject; creations pass the
/// identifier the database just assigned.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `event` - The audit event to persist
/// * `subject` - The subject to record the event against
/// * `created_at` - RFC 3339 timestamp of the mutation
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn persist_audit_event(
    conn: &mut _,
    event: &AuditEvent,
    subject: AuditSubject,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    let actor_data: ActorData = ActorData {
        id: event.actor.id.clone(),
        role: event.actor.role.clone(),
    };
    let cause_data: CauseData = CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    };
    let action_data: ActionData = ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    };
    let before_data: StateSnapshotData = StateSnapshotData {
        data: event.before.data.clone(),
    };
    let after_data: StateSnapshotData = StateSnapshotData {
        data: event.after.data.clone(),
    };

    diesel::insert_into(diesel_schema::audit_events::table)
        .values((
            diesel_schema::audit_events::subject_type.eq(subject.subject_type()),
            diesel_schema::audit_events::subject_id.eq(subject.subject_id()),
            diesel_schema::audit_events::actor_json.eq(serde_json::to_string(&actor_data)?),
            diesel_schema::audit_events::cause_json.eq(serde_json::to_string(&cause_data)?),
            diesel_schema::audit_events::action_json.eq(serde_json::to_string(&action_data)?),
            diesel_schema::audit_events::before_snapshot_json
                .eq(serde_json::to_string(&before_data)?),
            diesel_schema::audit_events::after_snapshot_json
                .eq(serde_json::to_string(&after_data)?),
            diesel_schema::audit_events::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;
    debug!(event_id, subject = subject.subject_type(), "Persisted audit event");

    Ok(event_id)
}
}
