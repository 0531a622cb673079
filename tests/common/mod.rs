// tests/common/mod.rs
// Test doubles shared by the pipeline integration tests.
#![allow(dead_code)]

use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use unliminotify::config::Settings;
use unliminotify::notify::{NotificationTransport, SmsReceipt, TransportError};
use unliminotify::{Cinema, Film, Listings, Show};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub from: String,
    pub to: String,
    pub body: String,
}

/// Records every send; optionally rejects one recipient.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<SentSms>>,
    pub reject: Option<String>,
}

impl RecordingTransport {
    pub fn rejecting(to: &str) -> Self {
        Self {
            reject: Some(to.to_string()),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send_sms(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<SmsReceipt, TransportError> {
        if self.reject.as_deref() == Some(to) {
            return Err(TransportError::Rejected {
                status: 400,
                code: Some(21211),
                message: "The 'To' number is not a valid phone number.".into(),
            });
        }
        self.sent.lock().push(SentSms {
            from: from.into(),
            to: to.into(),
            body: body.into(),
        });
        Ok(SmsReceipt {
            sid: Some(format!("SM{}", self.sent.lock().len())),
            status: Some("queued".into()),
        })
    }
}

pub fn unlimited_film(title: &str, shows: &[(&str, &str)]) -> Film {
    Film::new(
        title,
        shows.iter().map(|(url, time)| Show::new(*url, *time)).collect(),
    )
}

/// One cinema (id=1) with a regular film and the `X : Unlimited Screening` group.
pub fn listings() -> Listings {
    Listings {
        cinemas: vec![
            Cinema {
                id: 7,
                name: "Elsewhere".into(),
                films: vec![unlimited_film(
                    "Other : Unlimited Screening",
                    &[("o1", "2018-03-07T19:00:00")],
                )],
            },
            Cinema {
                id: 1,
                name: "Aberdeen - Queens Links".into(),
                films: vec![
                    unlimited_film("Big Film", &[("b1", "2018-03-05T17:00:00")]),
                    unlimited_film(
                        "X : Unlimited Screening",
                        &[("u1", "2018-03-05T20:30:00"), ("u2", "2018-03-06T18:00:00")],
                    ),
                ],
            },
        ],
    }
}

pub fn settings(ledger: &Path, numbers: &[&str]) -> Settings {
    let mut s = Settings::default();
    s.cinema_id = 1;
    s.notifications_file = ledger.to_path_buf();
    s.sms_numbers = numbers.iter().map(|n| n.to_string()).collect();
    s.twilio.from = "+447700900000".into();
    s
}

pub fn ledger_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
