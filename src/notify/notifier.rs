//! Notifier trait and the in-process implementations.

use crate::notify::config::NotifierConfig;
use crate::notify::error::{NotifyError, NotifyResult};
use crate::notify::message::Message;
use log::info;
use std::sync::Mutex;

/// Something that can deliver a [`Message`].
pub trait Notifier {
    fn send(&self, message: &Message) -> NotifyResult<()>;
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn send(&self, message: &Message) -> NotifyResult<()> {
        (**self).send(message)
    }
}

/// Writes messages to the log at `info` level.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    sender: Option<String>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sender(sender: impl Into<String>) -> Self {
        Self {
            sender: Some(sender.into()),
        }
    }

    /// Log as the sender named in `config`.
    pub fn from_config(config: &NotifierConfig) -> Self {
        Self::with_sender(config.sender.clone())
    }
}

impl Notifier for LogNotifier {
    fn send(&self, message: &Message) -> NotifyResult<()> {
        message.validate()?;
        let from = self.sender.as_deref().unwrap_or("gridr");
        info!(
            "notification from {from} to {}: {}\n{}",
            message.to, message.subject, message.body
        );
        Ok(())
    }
}

/// Keeps every delivered message in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Message>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, message: &Message) -> NotifyResult<()> {
        message.validate()?;
        let mut sent = self.sent.lock().map_err(|e| NotifyError::Delivery {
            to: message.to.clone(),
            reason: e.to_string(),
        })?;
        sent.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        let first = Message::new("a@example.org", "one", "").unwrap();
        let second = Message::new("b@example.org", "two", "").unwrap();
        notifier.send(&first).unwrap();
        (&notifier).send(&second).unwrap();
        assert_eq!(notifier.messages(), vec![first, second]);
    }

    #[test]
    fn test_invalid_message_is_not_recorded() {
        let notifier = RecordingNotifier::new();
        let bad = Message {
            to: "nobody".to_string(),
            subject: "s".to_string(),
            body: String::new(),
        };
        assert!(notifier.send(&bad).is_err());
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_log_notifier_accepts_valid_message() {
        let config = NotifierConfig::new("smtp.example.org", 465, "alerts@example.org", "pw");
        let notifier = LogNotifier::from_config(&config);
        let m = Message::new("ops@example.org", "hello", "body").unwrap();
        assert!(notifier.send(&m).is_ok());
    }

    /// Stand-in for a mail relay built on the full connection settings.
    struct RelayNotifier {
        config: NotifierConfig,
        attempts: Mutex<Vec<String>>,
    }

    impl Notifier for RelayNotifier {
        fn send(&self, message: &Message) -> NotifyResult<()> {
            message.validate()?;
            let NotifierConfig { host, port, username, password, sender } = &self.config;
            if password.is_empty() {
                return Err(NotifyError::Delivery {
                    to: message.to.clone(),
                    reason: format!("no credentials for {username}"),
                });
            }
            if let Ok(mut attempts) = self.attempts.lock() {
                attempts.push(format!("{sender} -> {} via {username}@{host}:{port}", message.to));
            }
            Ok(())
        }
    }

    #[test]
    fn test_external_transport_reads_connection_settings() {
        let config = NotifierConfig::new("smtp.example.org", 587, "bot@example.org", "pw")
            .with_sender("alerts@example.org");
        let relay = RelayNotifier {
            config: config.clone(),
            attempts: Mutex::new(Vec::new()),
        };
        let m = Message::new("ops@example.org", "done", "").unwrap();
        relay.send(&m).unwrap();
        assert_eq!(
            relay.attempts.lock().unwrap().as_slice(),
            ["alerts@example.org -> ops@example.org via bot@example.org@smtp.example.org:587"]
        );

        let locked_out = RelayNotifier {
            config: NotifierConfig::new("smtp.example.org", 587, "bot@example.org", ""),
            attempts: Mutex::new(Vec::new()),
        };
        assert!(matches!(locked_out.send(&m), Err(NotifyError::Delivery { .. })));
    }
}
