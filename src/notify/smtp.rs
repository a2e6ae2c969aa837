use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};
use serde_json::{Map, Value};

use super::mail::{MailTransport, NewsletterMail};
use crate::config::SmtpConfig;

/// Sends the newsletter as a single HTML email over SMTP.
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailTransport {
    pub fn new(cfg: &SmtpConfig) -> Result<Self> {
        let creds = Credentials::new(cfg.user.clone(), cfg.pass.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)
            .with_context(|| format!("invalid SMTP_HOST {}", cfg.host))?
            .credentials(creds)
            .build();

        let from = cfg.from.parse().context("invalid MAIL_FROM")?;
        let to = cfg.to.parse().context("invalid MAIL_TO")?;
        Ok(Self { mailer, from, to })
    }

    fn build_message(&self, mail: &NewsletterMail) -> Result<Message> {
        build_html_message(self.from.clone(), self.to.clone(), mail)
    }
}

fn build_html_message(from: Mailbox, to: Mailbox, mail: &NewsletterMail) -> Result<Message> {
    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(mail.content.clone())
        .context("build email")
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: &NewsletterMail) -> Result<Map<String, Value>> {
        let msg = self.build_message(mail)?;
        let resp = self.mailer.send(msg).await.context("send email")?;

        let mut fields = Map::new();
        fields.insert("transport".into(), Value::from("smtp"));
        fields.insert("recipient".into(), Value::from(self.to.email.to_string()));
        fields.insert("code".into(), Value::from(resp.code().to_string()));
        Ok(fields)
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
