// src/notify/twilio.rs
use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{NotificationTransport, SmsReceipt, TransportError};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TwilioCredentials {
    /// Sender number, e.g. `+447700900000`.
    pub from: String,
    pub account_sid: String,
    pub auth_token: String,
}

impl TwilioCredentials {
    pub fn is_complete(&self) -> bool {
        !self.from.trim().is_empty()
            && !self.account_sid.trim().is_empty()
            && !self.auth_token.trim().is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
struct MessageResponse {
    sid: Option<String>,
    status: Option<String>,
}

/// Body Twilio sends back with a non-2xx status.
#[derive(Debug, Deserialize)]
struct TwilioException {
    code: Option<i64>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct TwilioTransport {
    account_sid: String,
    auth_token: String,
    /// Incomplete credentials only fail once a message actually has to go out.
    configured: bool,
    client: Client,
}

impl TwilioTransport {
    pub fn new(creds: &TwilioCredentials) -> Self {
        Self {
            account_sid: creds.account_sid.clone(),
            auth_token: creds.auth_token.clone(),
            configured: creds.is_complete(),
            client: Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{TWILIO_API_BASE}/Accounts/{}/Messages.json",
            self.account_sid
        )
    }
}

/// Turn a non-success response into a rejection, keeping Twilio's own
/// code/message when the body carries them.
fn rejection(status: u16, body: &str) -> TransportError {
    match serde_json::from_str::<TwilioException>(body) {
        Ok(TwilioException { code, message }) => TransportError::Rejected {
            status,
            code,
            message: message.unwrap_or_else(|| body.trim().to_string()),
        },
        Err(_) => TransportError::Rejected {
            status,
            code: None,
            message: body.trim().to_string(),
        },
    }
}

/// A 2xx means the message was accepted; an odd body only costs the receipt.
fn receipt(body: &str) -> SmsReceipt {
    match serde_json::from_str::<MessageResponse>(body) {
        Ok(MessageResponse { sid, status }) => SmsReceipt { sid, status },
        Err(e) => {
            tracing::debug!(error = %e, body = %body, "unparseable twilio message response");
            SmsReceipt::default()
        }
    }
}

#[async_trait]
impl NotificationTransport for TwilioTransport {
    async fn send_sms(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<SmsReceipt, TransportError> {
        if !self.configured || from.trim().is_empty() {
            return Err(TransportError::NotConfigured(
                "set TWILIO_FROM, TWILIO_SID and TWILIO_TOKEN".to_string(),
            ));
        }

        let mut form: HashMap<&str, &str> = HashMap::new();
        form.insert("From", from);
        form.insert("To", to);
        form.insert("Body", body);

        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(rejection(status.as_u16(), &text));
        }

        Ok(receipt(&text))
    }
}
