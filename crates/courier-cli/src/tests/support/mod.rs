//! Shared doubles for the CLI test suites.

mod fake_daemon;

use std::ffi::OsString;

use courier_config::Config;

use crate::config::ConfigLoader;
use crate::errors::AppError;

pub(in crate::tests) use fake_daemon::FakeDaemon;

/// Loader returning a fixed configuration regardless of arguments.
pub(in crate::tests) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(in crate::tests) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Splits a command line on whitespace, trimming surrounding quotes.
pub(in crate::tests) fn build_args(command: &str) -> Vec<OsString> {
    std::iter::once(OsString::from("courier"))
        .chain(
            command
                .split_whitespace()
                .map(|token| OsString::from(token.trim_matches('"'))),
        )
        .collect()
}
