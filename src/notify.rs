//! Outbound notification plumbing. Delivery transport is a collaborator
//! concern; the service only enqueues `Notification`s on a bounded channel and
//! a background dispatcher task drains it. Approval must never block on (or
//! fail because of) a slow transport, which is why the queue is bounded and
//! senders give up after a timeout.

use tokio::sync::mpsc;

pub const APPROVAL_SUBJECT: &str = "Welcome to Charity App";
pub const APPROVAL_BODY: &str =
    "Congratulations your request to register charity has been approved.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn approval(to: impl Into<String>) -> Self {
        Notification {
            to: to.into(),
            subject: APPROVAL_SUBJECT.to_string(),
            body: APPROVAL_BODY.to_string(),
        }
    }
}

pub fn channel(capacity: usize) -> (mpsc::Sender<Notification>, mpsc::Receiver<Notification>) {
    mpsc::channel(capacity)
}

/// Drains the notification queue. The real mail transport sits behind this
/// boundary; here each message is handed to the log so delivery is observable
/// without an SMTP dependency.
pub async fn run_dispatcher(mut rx: mpsc::Receiver<Notification>) {
    while let Some(mail) = rx.recv().await {
        log::info!(
            "Dispatching notification to {}: {} - {}",
            mail.to,
            mail.subject,
            mail.body
        );
    }
    log::debug!("Notification dispatcher stopped");
}
