//! Plain-text notification messages.

use crate::notify::error::{NotifyError, NotifyResult};

/// A plain-text message to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Message {
    /// Build and validate a message.
    ///
    /// The recipient must look like `local@domain` and the subject must not be
    /// blank.
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> NotifyResult<Self> {
        let message = Self {
            to: to.into().trim().to_string(),
            subject: subject.into(),
            body: body.into(),
        };
        message.validate()?;
        Ok(message)
    }

    pub fn validate(&self) -> NotifyResult<()> {
        if !looks_like_address(&self.to) {
            return Err(NotifyError::InvalidMessage(format!(
                "'{}' is not an email address",
                self.to
            )));
        }
        if self.subject.trim().is_empty() {
            return Err(NotifyError::InvalidMessage("empty subject".to_string()));
        }
        // Header injection.
        if self.subject.contains(['\r', '\n']) {
            return Err(NotifyError::InvalidMessage(
                "subject must be a single line".to_string(),
            ));
        }
        Ok(())
    }
}

fn looks_like_address(addr: &str) -> bool {
    match addr.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !addr.contains(char::is_whitespace)
        }
        None => false,
    }
}
