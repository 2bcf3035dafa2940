//! Outbound mail delivery through the MailerSend HTTP API.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use courier_config::MailCredentials;

use super::SERVICES_TARGET;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A message addressed to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub message: String,
    /// Recipient display name.
    pub to_name: String,
    /// Recipient address.
    pub to_email: String,
}

/// Errors raised while delivering mail.
#[derive(Debug, Error)]
pub enum MailError {
    /// No API key or sender domain is configured.
    #[error("mail delivery is not configured")]
    NotConfigured,
    /// The HTTP client could not be built.
    #[error("failed to build mail client: {0}")]
    Client(#[source] reqwest::Error),
    /// The request could not be sent or its response read.
    #[error("mail request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The provider answered with a non-success status.
    #[error("mail provider rejected the message with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body as returned by the provider.
        body: String,
    },
}

/// Delivers [`Mail`].
pub trait MailSender: Send + Sync {
    /// Sends `mail`, blocking until the provider accepts or rejects it.
    ///
    /// # Errors
    ///
    /// Returns [`MailError`] when delivery fails.
    fn send(&self, mail: &Mail) -> Result<(), MailError>;
}

/// Sender installed when mail credentials are absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredMailSender;

impl MailSender for UnconfiguredMailSender {
    fn send(&self, _mail: &Mail) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    from: Address<'a>,
    to: [Address<'a>; 1],
    subject: &'a str,
    text: &'a str,
}

/// [`MailSender`] that posts to MailerSend's `v1/email` endpoint.
#[derive(Debug, Clone)]
pub struct MailerSendClient {
    client: Client,
    endpoint: String,
    api_key: String,
    from_email: String,
    from_name: String,
}

impl MailerSendClient {
    /// Builds a client from configured credentials. The sender address is
    /// `noreply@<domain>`.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Client`] when the HTTP client cannot be built.
    pub fn new(credentials: MailCredentials<'_>) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(MailError::Client)?;
        Ok(Self {
            client,
            endpoint: credentials.api_url.to_owned(),
            api_key: credentials.api_key.to_owned(),
            from_email: format!("noreply@{}", credentials.domain),
            from_name: credentials.sender_name.to_owned(),
        })
    }
}

impl MailSender for MailerSendClient {
    fn send(&self, mail: &Mail) -> Result<(), MailError> {
        let payload = EmailRequest {
            from: Address {
                email: &self.from_email,
                name: &self.from_name,
            },
            to: [Address {
                email: &mail.to_email,
                name: &mail.to_name,
            }],
            subject: &mail.subject,
            text: &mail.message,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .map_err(MailError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().map_err(MailError::Transport)?;
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        info!(
            target: SERVICES_TARGET,
            to = %mail.to_email,
            accepted = status == StatusCode::ACCEPTED,
            "mail handed to provider"
        );
        Ok(())
    }
}
