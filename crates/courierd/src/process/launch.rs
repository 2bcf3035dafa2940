//! Supervises daemon launch sequencing and runtime orchestration.

use std::sync::Arc;

use tracing::info;

use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::dispatch::Dispatcher;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::transport::{DatagramListener, ListenerHandle, StreamListener};

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Collaborators required to launch the daemon runtime.
pub(crate) struct LaunchPlan<L, S> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    pub(crate) shutdown: S,
}

/// Runs the daemon in the foreground using the production collaborators.
///
/// # Errors
///
/// Returns [`LaunchError`] when bootstrap fails, a listener cannot be bound
/// or started, or signal handlers cannot be installed.
pub fn run_daemon() -> Result<(), LaunchError> {
    run_daemon_with(LaunchPlan {
        loader: SystemConfigLoader,
        reporter: Arc::new(StructuredHealthReporter::new()),
        shutdown: SystemShutdownSignal::new(),
    })
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_daemon_with<L, S>(plan: LaunchPlan<L, S>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
{
    let LaunchPlan {
        loader,
        reporter,
        shutdown,
    } = plan;

    info!(target: PROCESS_TARGET, "starting daemon runtime");
    let daemon = bootstrap_with(&loader, Arc::clone(&reporter))?;
    let config = daemon.config();
    let stream = StreamListener::bind(config.stream_socket())?;
    let datagram = DatagramListener::bind(config.datagram_socket())?;
    let dispatcher: Arc<Dispatcher> = Arc::new(daemon.dispatcher());

    let stream_endpoint = stream.endpoint().clone();
    let datagram_endpoint = datagram.endpoint().clone();
    let workers = config.worker_threads();
    let stream_handle = stream.start(Arc::<Dispatcher>::clone(&dispatcher), workers)?;
    reporter.listener_ready(&stream_endpoint);
    let datagram_handle = datagram.start(dispatcher, workers)?;
    reporter.listener_ready(&datagram_endpoint);

    let waited = shutdown.wait();
    stop(stream_handle)?;
    reporter.listener_stopped(&stream_endpoint);
    stop(datagram_handle)?;
    reporter.listener_stopped(&datagram_endpoint);
    waited?;

    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}

fn stop(handle: ListenerHandle) -> Result<(), LaunchError> {
    handle.shutdown();
    handle.join()?;
    Ok(())
}
