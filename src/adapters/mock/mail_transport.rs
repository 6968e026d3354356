use crate::domain::notification::EmailMessage;
use crate::ports::{MailTransport as MailTransportTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Mock implementation of MailTransport
///
/// Records every message instead of delivering it.
/// Can be switched into a failing mode to simulate an unreachable mail server.
pub struct MailTransport {
    sent: Mutex<Vec<EmailMessage>>,
    failing: AtomicBool,
}

impl MailTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent send fail
    pub fn fail_deliveries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Messages accepted so far, in send order
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MailTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailTransportTrait for MailTransport {
    /// Record the message, or fail when switched into failing mode
    async fn send(&self, email: &EmailMessage) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(format!("mail server refused message to {}", email.to).into());
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
