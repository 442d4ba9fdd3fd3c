// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff identity extraction for the server.
//!
//! Every staff endpoint takes a [`StaffActor`], which reads the acting
//! staff member from request headers and derives the audit cause from the
//! request line.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use innkeep_api::{AuthenticatedActor, authenticate_actor};
use innkeep_audit::Cause;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The authenticated staff member and the cause recorded with their
/// changes.
///
/// # Errors
///
/// Extraction fails with HTTP 401 if either identity header is missing,
/// is not valid text, or names an unknown role.
pub struct StaffActor(pub AuthenticatedActor, pub Cause);

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, HttpError> {
    let value = headers.get(name).ok_or_else(|| {
        debug!(header = name, "Missing actor header");
        HttpError::unauthenticated(format!("Missing {name} header"))
    })?;
    value.to_str().map_err(|_| {
        warn!(header = name, "Actor header is not valid text");
        HttpError::unauthenticated(format!("Invalid {name} header"))
    })
}

impl FromRequestParts<AppState> for StaffActor {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor_id = header_text(&parts.headers, ACTOR_ID_HEADER)?;
        let role = header_text(&parts.headers, ACTOR_ROLE_HEADER)?;
        let actor: AuthenticatedActor = authenticate_actor(actor_id, role).map_err(|e| {
            warn!(error = %e, "Actor authentication failed");
            HttpError::unauthenticated(e.to_string())
        })?;

        let request_line = format!("{} {}", parts.method, parts.uri.path());
        let cause_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map_or_else(|| request_line.clone(), str::to_string);

        debug!(actor_id = %actor.id, role = %actor.role, cause = %cause_id, "Actor identified");
        Ok(Self(actor, Cause::new(cause_id, request_line)))
    }
}
