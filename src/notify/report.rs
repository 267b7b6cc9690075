//! Reports about interpolation runs.

use crate::interpolate::{FieldSummary, InterpolateError};
use crate::notify::error::NotifyResult;
use crate::notify::message::Message;
use crate::notify::notifier::Notifier;
use log::{error, info};

/// Send a summary of a finished field to `to`.
pub fn report_field<N: Notifier>(
    notifier: &N,
    to: &str,
    method: &str,
    summary: &FieldSummary,
) -> NotifyResult<()> {
    let subject = format!("Interpolation finished ({method})");
    let body = format!("The {method} interpolation completed.\n\n{summary}\n");
    dispatch(notifier, Message::new(to, subject, body)?)
}

/// Send a failure notice for an interpolation error to `to`.
pub fn report_failure<N: Notifier>(
    notifier: &N,
    to: &str,
    method: &str,
    err: &InterpolateError,
) -> NotifyResult<()> {
    let subject = format!("Interpolation failed ({method})");
    let body = format!("The {method} interpolation did not complete.\n\nError: {err}\n");
    dispatch(notifier, Message::new(to, subject, body)?)
}

fn dispatch<N: Notifier>(notifier: &N, message: Message) -> NotifyResult<()> {
    match notifier.send(&message) {
        Ok(()) => {
            info!("notification sent to {}", message.to);
            Ok(())
        }
        Err(e) => {
            error!("notification to {} failed: {e}", message.to);
            Err(e)
        }
    }
}
