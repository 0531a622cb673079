// src/notify/mod.rs
pub mod twilio;

use std::io::Write;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::RunError;
use crate::listings::{Film, Show};
use crate::report::Console;

pub use twilio::{TwilioCredentials, TwilioTransport};

/// Title suffix the feed appends to Unlimited Screenings; dropped in SMS bodies.
const UNLIMITED_SUFFIX: &str = " : Unlimited Screening";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmsReceipt {
    pub sid: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// The provider answered but refused the message.
    #[error("rejected by SMS provider (HTTP {status}): {message}")]
    Rejected {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("SMS request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("SMS transport is not configured: {0}")]
    NotConfigured(String),
}

/// Delivers one SMS. Implementations must not retry; the caller aborts on error.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn send_sms(&self, from: &str, to: &str, body: &str)
        -> Result<SmsReceipt, TransportError>;
}

/// Strip the Unlimited Screening suffix from a title for display.
pub fn sms_title(title: &str) -> String {
    title.replacen(UNLIMITED_SUFFIX, "", 1)
}

/// `"<title> on <date> @ <time>: <url>"`
pub fn compose_message(film: &Film, show: &Show) -> Result<String, RunError> {
    let (date, time) = show.display_date_time()?;
    Ok(format!(
        "{} on {} @ {}: {}",
        sms_title(&film.title),
        date,
        time,
        show.url
    ))
}

/// Sends one message per show per recipient, strictly in order.
pub struct Notifier<'a, T: ?Sized> {
    transport: &'a T,
    from: &'a str,
    recipients: &'a [String],
    suppressed: bool,
    verbose: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Bodies composed, one per show.
    pub messages: Vec<String>,
    /// Transport calls that succeeded.
    pub sent: usize,
}

impl<'a, T: NotificationTransport + ?Sized> Notifier<'a, T> {
    pub fn new(transport: &'a T, from: &'a str, recipients: &'a [String]) -> Self {
        Self {
            transport,
            from,
            recipients,
            suppressed: false,
            verbose: false,
        }
    }

    /// Compose every message but never call the transport.
    pub fn with_suppressed(mut self, suppressed: bool) -> Self {
        self.suppressed = suppressed;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The first bad show time or failed send ends the dispatch with an error;
    /// messages already delivered stay delivered.
    pub async fn notify<W: Write>(
        &self,
        films: &[Film],
        console: &mut Console<W>,
    ) -> Result<DispatchSummary, RunError> {
        let mut summary = DispatchSummary::default();

        for film in films {
            for show in &film.shows {
                let message = compose_message(film, show)?;
                if self.verbose {
                    console.line(&message);
                }

                if !self.suppressed {
                    for to in self.recipients {
                        let receipt = self
                            .transport
                            .send_sms(self.from, to, &message)
                            .await
                            .map_err(|source| {
                                tracing::warn!(to = %to, error = %source, "sms send failed");
                                RunError::Transport {
                                    to: to.clone(),
                                    source,
                                }
                            })?;
                        tracing::debug!(to = %to, sid = ?receipt.sid, status = ?receipt.status, "sms sent");
                        if self.verbose {
                            console.line(format!("SMS response: {receipt:?}"));
                        }
                        summary.sent += 1;
                    }
                }

                summary.messages.push(message);
            }
        }

        Ok(summary)
    }
}
