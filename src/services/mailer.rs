//! Best-effort outbound mail via an HTTP relay.
//!
//! Delivery failures are logged and never propagate into the triggering
//! workflow. When no relay endpoint is configured the mailer is a no-op.

use serde::Serialize;
use tracing::{info, warn};

/// One outbound message.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// HTTP mail relay client.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    relay_url: Option<String>,
}

impl Mailer {
    /// Create a mailer; `relay_url: None` disables delivery.
    pub fn new(relay_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url,
        }
    }

    /// Whether a relay endpoint is configured.
    pub fn is_enabled(&self) -> bool {
        self.relay_url.is_some()
    }

    /// Send a message, best-effort. Returns whether delivery was attempted
    /// and accepted; failures are logged, never returned.
    pub async fn send(&self, mail: OutboundMail) -> bool {
        let Some(ref url) = self.relay_url else {
            return false;
        };

        match self.client.post(url).json(&mail).send().await {
            Ok(response) if response.status().is_success() => {
                info!(to = %mail.to, subject = %mail.subject, "Mail relayed");
                true
            }
            Ok(response) => {
                warn!(
                    to = %mail.to,
                    status = %response.status(),
                    "Mail relay rejected message"
                );
                false
            }
            Err(e) => {
                warn!(to = %mail.to, error = %e, "Mail relay unreachable");
                false
            }
        }
    }
}
