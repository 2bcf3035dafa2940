//! The courier daemon.
//!
//! `courierd` listens on a stream endpoint (TCP or Unix socket) and a datagram
//! endpoint (UDP), reads one request per connection or datagram, and answers
//! with one line of text. Requests use the `header`/`body` text format read by
//! [`courier_wire`]; the header selects a command:
//!
//! | header | effect |
//! |---|---|
//! | `morse` | converts `message` to Morse code or back to text |
//! | `addfile` | writes `content` to `filename` in the files directory |
//! | `removefile` | deletes `filename` from the files directory |
//! | `mail` | sends `subject` and `message` to the `to` recipient |
//!
//! The bootstrap sequence loads configuration, initialises structured
//! telemetry and wires the collaborators in [`services`]; the lifecycle is
//! reported through a [`HealthReporter`].

mod bootstrap;
pub mod dispatch;
mod health;
mod process;
pub mod services;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use dispatch::{DispatchError, Dispatcher, RequestLimits};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{LaunchError, run_daemon};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
