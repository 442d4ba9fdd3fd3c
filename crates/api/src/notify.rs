// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guest notifications sent after a booking transition commits.

use innkeep::Notification;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("guest {email} has no usable address")]
    MissingAddress { email: String },
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Delivers guest notifications.
///
/// Delivery is best-effort: the booking change has already been committed
/// when this is called.
pub trait Notifier: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the notification could not be handed off.
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes notifications to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        if !notification.guest_email.contains('@') {
            return Err(NotifyError::MissingAddress {
                email: notification.guest_email.clone(),
            });
        }
        info!(
            kind = notification.kind.as_str(),
            reference = %notification.booking_reference,
            guest = %notification.guest_name,
            email = %notification.guest_email,
            "Guest notification queued"
        );
        Ok(())
    }
}
