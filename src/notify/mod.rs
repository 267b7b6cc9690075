//! Notifications about interpolation runs.
//!
//! Connection settings are an explicit [`NotifierConfig`] value, read from the
//! environment once if wanted. Delivery goes through the [`Notifier`] trait;
//! [`LogNotifier`] and [`RecordingNotifier`] are the in-process
//! implementations. Mail transport is left to callers.

mod config;
mod error;
mod message;
mod notifier;
mod report;

pub use config::{ENV_ADDRESS, ENV_HOST, ENV_PASSWORD, ENV_PORT, NotifierConfig};
pub use error::{NotifyError, NotifyResult};
pub use message::Message;
pub use notifier::{LogNotifier, Notifier, RecordingNotifier};
pub use report::{report_failure, report_field};
