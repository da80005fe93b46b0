use anyhow::Context;
use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};
use serde::Deserialize;
use std::time::Duration;

use super::{ChangeEvent, Notifier};
use crate::error::{Result, WatchError};

const SINK_NAME: &str = "email";

/// SMTP settings. With `username` and `password` the mail goes through a
/// STARTTLS relay (port 587 unless `port` says otherwise). Without them it goes
/// out over a plain, unauthenticated connection (port 25 by default). Setting
/// only one of the two is a config error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SmtpSettings {
    pub server: String,
    #[serde(default)]
    pub port: Option<u16>,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub username: Option<String>,
    /// "ENV" means: read from SMTP_PASS
    #[serde(default)]
    pub password: Option<String>,
}

pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    pub fn new(settings: &SmtpSettings, timeout: Duration) -> anyhow::Result<Self> {
        let builder = match (&settings.username, &settings.password) {
            (Some(user), Some(pass)) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)
                    .with_context(|| format!("invalid SMTP server {}", settings.server))?
                    .credentials(Credentials::new(user.clone(), pass.clone()))
            }
            (None, None) => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.server)
            }
            _ => anyhow::bail!("SMTP username and password must be set together"),
        };
        let builder = match settings.port {
            Some(port) => builder.port(port),
            None => builder,
        };
        let mailer = builder.timeout(Some(timeout)).build();

        let from = settings
            .from
            .parse::<Mailbox>()
            .with_context(|| format!("invalid from address {}", settings.from))?;
        let to = settings
            .to
            .parse::<Mailbox>()
            .with_context(|| format!("invalid to address {}", settings.to))?;

        Ok(Self { mailer, from, to })
    }

    fn build_message(&self, ev: &ChangeEvent) -> Result<Message> {
        let subject = format!("Stock alert: {} at {}", ev.product, ev.store);
        let body = format!("{}\nObserved: {}\n", ev.message(), ev.observed_at.to_rfc3339());

        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| WatchError::delivery(SINK_NAME, format!("build email: {e}")))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        SINK_NAME
    }

    async fn notify(&self, ev: &ChangeEvent) -> Result<()> {
        let msg = self.build_message(ev)?;
        self.mailer
            .send(msg)
            .await
            .map_err(|e| WatchError::delivery(SINK_NAME, format!("send email: {e}")))?;
        Ok(())
    }
}
