//! Notification queue
//!
//! Handlers enqueue notifications and return immediately. A single
//! dispatcher task drains the queue and delivers each message through
//! SES. Delivery failures are logged and never surfaced to the request
//! that produced them.

use tokio::sync::mpsc;

use crate::email::EmailService;

/// A queued outbound notification
#[derive(Debug, Clone)]
pub enum Notification {
    VerifyEmail {
        to: String,
        name: String,
        code: String,
    },
    PartnerApproved {
        to: String,
        name: String,
    },
    PartnerRejected {
        to: String,
        name: String,
    },
}

impl Notification {
    fn kind(&self) -> &'static str {
        match self {
            Self::VerifyEmail { .. } => "verify_email",
            Self::PartnerApproved { .. } => "partner_approved",
            Self::PartnerRejected { .. } => "partner_rejected",
        }
    }
}

/// Cloneable handle to the notification queue
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Spawn the dispatcher task and return the queue handle
    pub fn spawn(email: EmailService) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
        tokio::spawn(async move {
            while let Some(notification) = rx.recv().await {
                let kind = notification.kind();
                if let Err(e) = deliver(&email, notification).await {
                    tracing::warn!(kind = kind, error = %e, "Notification delivery failed");
                }
            }
        });
        Self { tx }
    }

    /// Enqueue a notification. A closed queue is logged, not propagated.
    pub fn dispatch(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::warn!("Notification queue is closed, dropping message");
        }
    }

    /// Queue handle backed by a plain channel, for tests that only
    /// need to observe what was enqueued.
    #[cfg(test)]
    pub fn for_test() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

async fn deliver(
    email: &EmailService,
    notification: Notification,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match notification {
        Notification::VerifyEmail { to, name, code } => {
            email.send_verification_code(&to, &name, &code).await
        }
        Notification::PartnerApproved { to, name } => email.send_partner_approved(&to, &name).await,
        Notification::PartnerRejected { to, name } => email.send_partner_rejected(&to, &name).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dispatch_enqueues() {
        let (notifier, mut rx) = Notifier::for_test();
        notifier.dispatch(Notification::VerifyEmail {
            to: "a@example.com".into(),
            name: "Ana".into(),
            code: "123456".into(),
        });
        let got = rx.recv().await.unwrap();
        assert_eq!(got.kind(), "verify_email");
    }

    #[tokio::test]
    async fn test_dispatch_after_receiver_dropped_is_silent() {
        let (notifier, rx) = Notifier::for_test();
        drop(rx);
        notifier.dispatch(Notification::PartnerApproved {
            to: "a@example.com".into(),
            name: "Ana".into(),
        });
    }
}
