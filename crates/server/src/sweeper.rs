// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Background expiry of lapsed tentative holds.

use innkeep_api::{SweepResponse, sweep_tentative_holds};
use innkeep_audit::{Actor, Cause};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::AppState;

/// Runs one sweep under the persistence lock.
pub async fn sweep_once(app_state: &AppState) -> Option<SweepResponse> {
    let cause = Cause::new(
        String::from("tentative-sweeper"),
        String::from("Scheduled tentative hold expiry"),
    );
    let mut persistence = app_state.persistence.lock().await;
    match sweep_tentative_holds(
        &mut persistence,
        &app_state.services,
        &Actor::system(),
        &cause,
    ) {
        Ok(response) => Some(response),
        Err(err) => {
            error!(error = %err, "Tentative hold sweep failed");
            None
        }
    }
}

/// Spawns the sweeper loop.
///
/// The first sweep runs one full `period` after startup.
pub fn spawn_sweeper(app_state: AppState, period: Duration) -> JoinHandle<()> {
    info!(period_secs = period.as_secs(), "Starting tentative hold sweeper");
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Some(response) = sweep_once(&app_state).await {
                debug!(
                    expired = response.expired.len(),
                    failed = response.failed.len(),
                    "Sweeper tick"
                );
            }
        }
    })
}
