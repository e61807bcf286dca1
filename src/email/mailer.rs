//! SMTP delivery.
//!
//! Two connection modes: internal relays on port 25 go out unencrypted and
//! usually unauthenticated, anything else (typically 587) negotiates
//! STARTTLS. The envelope sender may differ from the `From:` header so that
//! a service account can send on behalf of a display address.

use std::time::Duration;

use lettre::address::Envelope;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use log::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::types::Recipients;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Mailer {
    config: Config,
}

impl Mailer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<SmtpTransport> {
        let server = self.config.smtp_server.as_str();
        let mut builder = if self.config.smtp_port == 25 {
            SmtpTransport::builder_dangerous(server)
        } else {
            SmtpTransport::starttls_relay(server)?
        };
        builder = builder.port(self.config.smtp_port).timeout(Some(SMTP_TIMEOUT));

        if let Some(password) = &self.config.sender_password {
            builder = builder.credentials(Credentials::new(
                self.config.sender_email.clone(),
                password.clone(),
            ));
        }

        Ok(builder.build())
    }

    /// Address used in the SMTP `MAIL FROM`, independent of the header.
    fn envelope_sender(&self) -> &str {
        self.config
            .envelope_sender
            .as_deref()
            .unwrap_or(&self.config.sender_email)
    }

    /// Deliver `message` to every unique TO/CC address.
    pub fn send(&self, message: &Message, recipients: &Recipients) -> Result<()> {
        let from: Address = self.envelope_sender().parse()?;
        let to: Vec<Address> = recipients
            .all_unique()
            .iter()
            .map(|a| a.parse())
            .collect::<std::result::Result<_, _>>()?;
        let envelope = Envelope::new(Some(from), to)?;

        debug!(
            "SMTP {}:{} envelope-from {}",
            self.config.smtp_server,
            self.config.smtp_port,
            self.envelope_sender()
        );
        self.transport()?.send_raw(&envelope, &message.formatted())?;
        info!(
            "email delivered to {} recipient(s)",
            recipients.all_unique().len()
        );
        Ok(())
    }

    /// Open and close a connection, verifying reachability and credentials.
    pub fn test_connection(&self) -> Result<bool> {
        Ok(self.transport()?.test_connection()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_sender_falls_back_to_header_from() {
        let config = Config::default();
        let mailer = Mailer::new(config.clone());
        assert_eq!(mailer.envelope_sender(), config.sender_email);
    }

    #[test]
    fn test_envelope_sender_override() {
        let mut config = Config::default();
        config.envelope_sender = Some("relay@example.com".to_string());
        let mailer = Mailer::new(config);
        assert_eq!(mailer.envelope_sender(), "relay@example.com");
    }
}
