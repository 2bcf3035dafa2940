//! Collaborators invoked by command decoders.
//!
//! Each concern sits behind a trait so the dispatcher can be exercised with
//! test doubles; [`Services::from_config`] wires the production adapters.

mod mail;
mod morse;
mod storage;

use std::sync::Arc;

use tracing::warn;

use courier_config::Config;

pub use self::mail::{Mail, MailError, MailSender, MailerSendClient, UnconfiguredMailSender};
pub use self::morse::{InternationalMorse, MorseCodec};
pub use self::storage::{DirectoryStore, FileStore, StorageError};

pub(crate) const SERVICES_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::services");

/// Shared handles to the collaborators used by the dispatcher.
#[derive(Clone)]
pub struct Services {
    /// Morse converter.
    pub morse: Arc<dyn MorseCodec>,
    /// File storage.
    pub files: Arc<dyn FileStore>,
    /// Mail delivery.
    pub mail: Arc<dyn MailSender>,
}

impl Services {
    /// Bundles explicit collaborators.
    #[must_use]
    pub fn new(
        morse: Arc<dyn MorseCodec>,
        files: Arc<dyn FileStore>,
        mail: Arc<dyn MailSender>,
    ) -> Self {
        Self { morse, files, mail }
    }

    /// Builds the production collaborators described by `config`.
    ///
    /// Mail falls back to [`UnconfiguredMailSender`] when credentials are
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Client`] when the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let mail: Arc<dyn MailSender> = match config.mail_credentials() {
            Some(credentials) => Arc::new(MailerSendClient::new(credentials)?),
            None => {
                warn!(
                    target: SERVICES_TARGET,
                    "mail credentials not configured; mail requests will fail"
                );
                Arc::new(UnconfiguredMailSender)
            }
        };
        Ok(Self::new(
            Arc::new(InternationalMorse::new()),
            Arc::new(DirectoryStore::new(config.files_dir.clone())),
            mail,
        ))
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("Services").finish_non_exhaustive()
    }
}
