// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use innkeep_audit::{Action, Actor, AuditEvent, AuditSubject, Cause, StateSnapshot};

use crate::data_models::{
    ActionData, ActorData, AuditRecord, CauseData, StateSnapshotData, parse_timestamp,
};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    subject_type: String,
    subject_id: i64,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    created_at: String,
}

fn reconstruct(row: AuditEventRow) -> Result<AuditRecord, PersistenceError> {
    let subject = AuditSubject::from_parts(&row.subject_type, row.subject_id).ok_or_else(|| {
        PersistenceError::ReconstructionError(format!(
            "Unknown audit subject type '{}'",
            row.subject_type
        ))
    })?;
    let actor_data: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
    let action_data: ActionData = serde_json::from_str(&row.action_json)?;
    let before_data: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after_data: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

    Ok(AuditRecord {
        event_id: row.event_id,
        event: AuditEvent::new(
            subject,
            Actor::new(actor_data.id, actor_data.role),
            Cause::new(cause_data.id, cause_data.description),
            Action::new(action_data.name, action_data.details),
            StateSnapshot::new(before_data.data),
            StateSnapshot::new(after_data.data),
        ),
        created_at: parse_timestamp(&row.created_at)?,
    })
}

backend_fn! {
/// Retrieves an audit event by ID.
///
/// # Errors
///
/// Returns an error if the event does not exist or cannot be deserialized.
pub fn get_audit_event(conn: &mut _, event_id: i64) -> Result<AuditRecord, PersistenceError> {
    let result = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first::<AuditEventRow>(conn);

    match result {
        Ok(row) => reconstruct(row),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "Audit event {event_id}"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves every audit event recorded against a subject, oldest first.
///
/// # Errors
///
/// Returns an error if the events cannot be retrieved or deserialized.
pub fn get_audit_events_for_subject(
    conn: &mut _,
    subject: AuditSubject,
) -> Result<Vec<AuditRecord>, PersistenceError> {
    audit_events::table
        .filter(audit_events::subject_type.eq(subject.subject_type()))
        .filter(audit_events::subject_id.eq(subject.subject_id()))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load::<AuditEventRow>(conn)?
        .into_iter()
        .map(reconstruct)
        .collect()
}
}
