use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_MAIL_ENDPOINT: &str = "https://nine1mail.onrender.com/api/send-newsletter-all";

/// What gets handed to the mail service.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewsletterMail {
    pub subject: String,
    pub content: String,
}

/// A single delivery attempt against some mail backend.
///
/// On success returns the service's response fields, which are merged into
/// the delivery result.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &NewsletterMail) -> Result<Map<String, Value>>;
    fn name(&self) -> &'static str;
}

/// Posts `{ subject, content }` as JSON to the newsletter mail service.
#[derive(Clone)]
pub struct HttpMailTransport {
    endpoint: String,
    client: Client,
    timeout: Duration,
}

impl HttpMailTransport {
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        Self {
            endpoint,
            client: Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, mail: &NewsletterMail) -> Result<Map<String, Value>> {
        let rsp = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(mail)
            .send()
            .await
            .context("mail service request failed")?;

        let status = rsp.status();
        let body = rsp.text().await.context("reading mail service response")?;
        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| anyhow!("malformed mail service response (status {status}): {e}"))?;

        if !status.is_success() {
            let reason = parsed
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            bail!(
                "Mail server responded with status {}: {}",
                status.as_u16(),
                reason
            );
        }

        match parsed {
            Value::Object(fields) => Ok(fields),
            other => bail!("malformed mail service response: expected a JSON object, got {other}"),
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
