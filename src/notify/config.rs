//! Notifier connection settings.

use crate::notify::error::{NotifyError, NotifyResult};
use std::fmt;

/// Environment variable holding the mail server host.
pub const ENV_HOST: &str = "EMAIL_HOST";
/// Environment variable holding the mail server port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable holding the account address, also used as sender.
pub const ENV_ADDRESS: &str = "EMAIL_ADDRESS";
/// Environment variable holding the account password.
pub const ENV_PASSWORD: &str = "EMAIL_PASSWORD";

/// Connection settings for a mail notifier.
///
/// Passed explicitly to whatever sends the message; nothing here is global.
/// gridr itself ships no mail transport: [`LogNotifier`] reads only `sender`.
/// The server and credential fields are validated here and carried unchanged
/// for a caller-supplied [`Notifier`] that talks to a real mail server.
///
/// [`LogNotifier`]: crate::notify::LogNotifier
/// [`Notifier`]: crate::notify::Notifier
#[derive(Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Mail server host, for an external transport.
    pub host: String,
    /// Mail server port, for an external transport.
    pub port: u16,
    /// Login name, for an external transport.
    pub username: String,
    /// Login secret, for an external transport. Redacted in `Debug`.
    pub password: String,
    /// From address used by every notifier.
    pub sender: String,
}

impl NotifierConfig {
    /// Settings for `username` on `host:port`; the sender defaults to the username.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let username = username.into();
        Self {
            host: host.into(),
            port,
            sender: username.clone(),
            username,
            password: password.into(),
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Read `EMAIL_HOST`, `PORT`, `EMAIL_ADDRESS` and `EMAIL_PASSWORD` once.
    pub fn from_env() -> NotifyResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> NotifyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |variable: &'static str| {
            lookup(variable)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| NotifyError::Config {
                    variable,
                    reason: "not set".to_string(),
                })
        };

        let host = require(ENV_HOST)?;
        let port_text = require(ENV_PORT)?;
        let port = port_text.parse::<u16>().map_err(|e| NotifyError::Config {
            variable: ENV_PORT,
            reason: format!("'{port_text}' is not a port number: {e}"),
        })?;
        let username = require(ENV_ADDRESS)?;
        let password = require(ENV_PASSWORD)?;

        Ok(Self::new(host, port, username, password))
    }
}

impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sender", &self.sender)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_lookup() {
        let vars = env(&[
            ("EMAIL_HOST", "smtp.example.org"),
            ("PORT", "465"),
            ("EMAIL_ADDRESS", "alerts@example.org"),
            ("EMAIL_PASSWORD", "hunter2"),
        ]);
        let config = NotifierConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.host, "smtp.example.org");
        assert_eq!(config.port, 465);
        assert_eq!(config.username, "alerts@example.org");
        assert_eq!(config.password, "hunter2");
        assert_eq!(config.sender, "alerts@example.org");
    }

    #[test]
    fn test_missing_variable() {
        let vars = env(&[("EMAIL_HOST", "smtp.example.org"), ("PORT", "465")]);
        let err = NotifierConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert_eq!(
            err,
            NotifyError::Config {
                variable: ENV_ADDRESS,
                reason: "not set".to_string()
            }
        );
    }

    #[test]
    fn test_bad_port() {
        let vars = env(&[
            ("EMAIL_HOST", "smtp.example.org"),
            ("PORT", "smtp"),
            ("EMAIL_ADDRESS", "a@example.org"),
            ("EMAIL_PASSWORD", "x"),
        ]);
        let err = NotifierConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, NotifyError::Config { variable: "PORT", .. }));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = NotifierConfig::new("h", 25, "u@example.org", "secret");
        assert!(!format!("{config:?}").contains("secret"));
    }
}
