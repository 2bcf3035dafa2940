//! BDD test world: holds the loader, reporter and bootstrap outcome for step functions.

use std::cell::RefCell;
use std::sync::Arc;

use crate::bootstrap::{BootstrapError, ConfigLoader, Daemon, bootstrap_with};
use crate::dispatch::DispatchError;

use super::config_loader::{FailingConfigLoader, TestConfigLoader};
use super::reporter::RecordingHealthReporter;

/// Scenario world shared across BDD steps.
pub struct TestWorld {
    loader: Box<dyn ConfigLoader>,
    pub reporter: Arc<RecordingHealthReporter>,
    daemon: Option<Daemon>,
    bootstrap_error: Option<BootstrapError>,
    reply: Option<Result<String, DispatchError>>,
}

impl TestWorld {
    /// Builds a world with a successful configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loader: Box::new(TestConfigLoader::new()),
            reporter: Arc::new(RecordingHealthReporter::default()),
            daemon: None,
            bootstrap_error: None,
            reply: None,
        }
    }

    /// Installs a loader that always fails.
    pub fn use_failing_loader(&mut self) {
        self.loader = Box::new(FailingConfigLoader);
        self.reset_results();
    }

    /// Installs a loader that succeeds.
    pub fn use_successful_loader(&mut self) {
        self.loader = Box::new(TestConfigLoader::new());
        self.reset_results();
    }

    /// Runs the bootstrap sequence once.
    pub fn bootstrap(&mut self) {
        if self.daemon.is_some() || self.bootstrap_error.is_some() {
            return;
        }

        match bootstrap_with(&*self.loader, self.reporter.clone()) {
            Ok(daemon) => self.daemon = Some(daemon),
            Err(error) => self.bootstrap_error = Some(error),
        }
    }

    /// Sends `request` through the bootstrapped daemon's dispatcher.
    pub fn dispatch(&mut self, request: &str) {
        let Some(daemon) = self.daemon.as_ref() else {
            return;
        };
        self.reply = Some(daemon.dispatcher().dispatch(request));
    }

    /// Returns whether bootstrap produced an error.
    #[must_use]
    pub fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }

    /// Returns true when the daemon handle is available.
    #[must_use]
    pub fn daemon_started(&self) -> bool {
        self.daemon.is_some()
    }

    /// Returns the last dispatch result, if any.
    #[must_use]
    pub fn reply(&self) -> Option<&Result<String, DispatchError>> {
        self.reply.as_ref()
    }

    fn reset_results(&mut self) {
        self.daemon = None;
        self.bootstrap_error = None;
        self.reply = None;
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Default test world fixture.
#[must_use]
pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}
