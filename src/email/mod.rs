//! Incident notification emails: rendering and SMTP delivery.

pub mod mailer;
pub mod message;

pub use mailer::Mailer;
