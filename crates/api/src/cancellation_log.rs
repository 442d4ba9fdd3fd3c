// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Append-only JSON-lines file of booking cancellations.
//!
//! The database keeps its own `cancellation_log` table; this file is an
//! operator-facing copy that night audit tooling can tail.

use innkeep::CancellationRecord;
use innkeep_domain::Booking;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Error)]
pub enum CancellationLogError {
    #[error("cannot open cancellation log {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write cancellation log {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot encode cancellation entry: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("cannot format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// One line of the cancellation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationLogEntry {
    pub logged_at: String,
    pub booking_id: i64,
    pub reference: String,
    pub guest_name: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub previous_status: String,
    pub reason: String,
    pub released_room_id: Option<i64>,
    pub inventory_restored: bool,
    pub actor_id: String,
}

impl CancellationLogEntry {
    /// Builds the entry for a committed cancellation.
    ///
    /// # Errors
    ///
    /// Returns an error if `at` cannot be rendered as RFC 3339.
    pub fn new(
        booking: &Booking,
        record: &CancellationRecord,
        actor_id: &str,
        at: OffsetDateTime,
    ) -> Result<Self, CancellationLogError> {
        Ok(Self {
            logged_at: at.format(&Rfc3339)?,
            booking_id: booking.booking_id,
            reference: booking.reference.clone(),
            guest_name: booking.guest.name.clone(),
            check_in_date: innkeep_domain::format_iso_date(booking.stay.check_in()),
            check_out_date: innkeep_domain::format_iso_date(booking.stay.check_out()),
            previous_status: record.previous_status.as_str().to_string(),
            reason: record.reason.clone(),
            released_room_id: record.released_room_id,
            inventory_restored: record.inventory_restored,
            actor_id: actor_id.to_string(),
        })
    }
}

/// Appends `entry` as one JSON line, creating the file if needed.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or written.
pub fn append_entry(path: &Path, entry: &CancellationLogEntry) -> Result<(), CancellationLogError> {
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| CancellationLogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    file.write_all(line.as_bytes())
        .map_err(|source| CancellationLogError::Write {
            path: path.to_path_buf(),
            source,
        })
}
