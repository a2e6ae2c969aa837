//! # Delivery dispatcher
//! Hands the finished newsletter to a mail backend with bounded retries.

pub mod mail;
pub mod retry;
pub mod smtp;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use metrics::counter;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::PipelineError;
use mail::{MailTransport, NewsletterMail};
use retry::RetryPolicy;

/// Successful delivery: the winning attempt plus the mail service's own fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryResult {
    pub attempt: u32,
    pub status: &'static str,
    pub response: Map<String, Value>,
}

impl DeliveryResult {
    /// One flat object. Keys the mail service sends back override `attempt`/`status`.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("attempt".into(), Value::from(self.attempt));
        out.insert("status".into(), Value::from(self.status));
        out.extend(self.response.clone());
        out
    }
}

impl Serialize for DeliveryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

/// `What's Trending in AI: M/D/YYYY`.
pub fn subject_for(date: NaiveDate) -> String {
    format!("What's Trending in AI: {}", date.format("%-m/%-d/%Y"))
}

pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
    policy: RetryPolicy,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub async fn dispatch(&self, content: &str) -> Result<DeliveryResult, PipelineError> {
        let mail = NewsletterMail {
            subject: subject_for(Local::now().date_naive()),
            content: content.to_string(),
        };
        self.dispatch_mail(&mail).await
    }

    /// Try up to `max_attempts` times, waiting per the policy in between.
    pub async fn dispatch_mail(&self, mail: &NewsletterMail) -> Result<DeliveryResult, PipelineError> {
        let max = self.policy.max_attempts;
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            tracing::info!(attempt, max, transport = self.transport.name(), "sending newsletter");
            counter!("delivery_attempts_total").increment(1);

            match self.transport.send(mail).await {
                Ok(response) => {
                    tracing::info!(attempt, "newsletter sent");
                    return Ok(DeliveryResult {
                        attempt,
                        status: "success",
                        response,
                    });
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "delivery attempt failed");
                    if attempt >= max {
                        tracing::error!(attempts = attempt, "all delivery attempts failed");
                        counter!("delivery_failures_total").increment(1);
                        return Err(PipelineError::Delivery {
                            attempts: attempt,
                            message: format!("{e:#}"),
                        });
                    }
                    let delay = self.policy.delay_after(attempt);
                    tracing::info!(delay_ms = delay.as_millis() as u64, "waiting before retry");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
