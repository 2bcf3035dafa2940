//! Structured telemetry initialisation for the daemon.
//!
//! Logs go to stderr with UTC timestamps, filtered by `Config::log_filter`.
//! JSON records are flattened so request fields such as `connection` and
//! `header` sit beside the message; the compact format is meant for a
//! terminal.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::fmt::{self, time::UtcTime};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

use courier_config::{Config, DEFAULT_LOG_FILTER, LogFormat};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter '{directive}': {reason}")]
    Filter {
        /// Directive as configured.
        directive: String,
        /// Parser message.
        reason: String,
    },
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on first use.
///
/// Later calls leave the installed subscriber in place, so bootstrapping more
/// than one daemon in a process (as the tests do) is harmless.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an unparsable filter and
/// [`TelemetryError::Subscriber`] when another subscriber is already set.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| {
            let filter = log_filter(config.log_filter())?;
            tracing::subscriber::set_global_default(subscriber(filter, config.log_format()))
                .map_err(TelemetryError::Subscriber)
        })
        .map(|_| TelemetryHandle)
}

/// Parses `directive`, using the default filter when it is blank.
fn log_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    let directive = match directive.trim() {
        "" => DEFAULT_LOG_FILTER,
        trimmed => trimmed,
    };
    EnvFilter::builder()
        .parse(directive)
        .map_err(|error| TelemetryError::Filter {
            directive: directive.to_owned(),
            reason: error.to_string(),
        })
}

fn subscriber(filter: EnvFilter, format: LogFormat) -> Box<dyn Subscriber + Send + Sync> {
    let registry = Registry::default().with(filter);
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(UtcTime::rfc_3339())
        .with_target(true);
    match format {
        LogFormat::Json => Box::new(
            registry.with(
                layer
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_span_list(false),
            ),
        ),
        LogFormat::Compact => Box::new(
            registry.with(layer.compact().with_ansi(io::stderr().is_terminal())),
        ),
    }
}
