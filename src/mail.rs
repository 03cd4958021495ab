//! Digest delivery over SMTP.
//!
//! [`Mailer`] is the "send a message" capability; [`SmtpMailer`] implements
//! it with `lettre`'s async relay transport (implicit TLS, port 465) using
//! the account's own credentials. Any failure here is fatal for the run.

use crate::error::SendError;
use lettre::message::{Mailbox, Message, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, instrument};

pub trait Mailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), SendError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Authenticate as `username` against `host`; mail is sent from
    /// `sender_name <username>`.
    pub fn new(
        host: &str,
        username: &str,
        password: &str,
        sender_name: &str,
    ) -> Result<Self, SendError> {
        let from = sender_mailbox(sender_name, username)?;
        let creds = Credentials::new(username.to_string(), password.to_string());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .credentials(creds)
            .build();
        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    #[instrument(level = "info", skip(self, html_body))]
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), SendError> {
        let msg = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        self.transport.send(msg).await?;
        info!(%to, bytes = html_body.len(), "Digest sent");
        Ok(())
    }
}

fn sender_mailbox(sender_name: &str, username: &str) -> Result<Mailbox, SendError> {
    let address = username.parse::<Address>()?;
    let name = Some(sender_name.trim().to_string()).filter(|n| !n.is_empty());
    Ok(Mailbox::new(name, address))
}
