//! Poll loop shared by the stream and datagram listeners.
//!
//! A listener thread repeatedly asks its [`Intake`] for the next request and
//! hands it to the listener's [`WorkerPool`]. Requests arriving while the pool
//! is saturated are dropped: a stream connection is closed unanswered and a
//! datagram is discarded. Stopping the loop drains the pool before the
//! listener thread exits.

use std::io;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use courier_config::SocketEndpoint;

use super::pool::{Job, WorkerPool};
use super::{LISTENER_TARGET, ListenerError};

const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Source of requests for one listener.
pub(super) trait Intake: Send + 'static {
    /// Transport name used in log records.
    const KIND: &'static str;

    /// Endpoint served by this intake.
    fn endpoint(&self) -> &SocketEndpoint;

    /// Waits briefly for the next request and wraps its handling in a job.
    ///
    /// `Ok(None)` means nothing arrived within the poll interval.
    fn next_job(&mut self) -> io::Result<Option<Job>>;

    /// Releases endpoint resources once the loop has stopped.
    fn close(&mut self) {}
}

/// Runs `intake` on a background thread served by `workers` pool threads.
pub(super) fn spawn<I: Intake>(mut intake: I, workers: usize) -> ListenerHandle {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    let handle = thread::spawn(move || {
        let pool = WorkerPool::new(workers);
        poll(&mut intake, &flag, &pool);
        drop(pool);
        intake.close();
        info!(
            target: LISTENER_TARGET,
            kind = I::KIND,
            endpoint = %intake.endpoint(),
            "listener stopped"
        );
    });
    ListenerHandle {
        shutdown,
        handle: Some(handle),
    }
}

fn poll<I: Intake>(intake: &mut I, shutdown: &AtomicBool, pool: &WorkerPool) {
    info!(
        target: LISTENER_TARGET,
        kind = I::KIND,
        endpoint = %intake.endpoint(),
        "listener active"
    );
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.load(Ordering::SeqCst) {
        match intake.next_job() {
            Ok(Some(job)) => {
                last_error = None;
                if pool.try_submit(job).is_err() {
                    warn!(
                        target: LISTENER_TARGET,
                        kind = I::KIND,
                        "workers saturated, request dropped"
                    );
                }
            }
            Ok(None) => {}
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: LISTENER_TARGET,
                        kind = I::KIND,
                        error = %error,
                        "listener poll failed"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
}

/// Handle to a running listener. Dropping it requests shutdown.
pub(crate) struct ListenerHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ListenerHandle {
    /// Asks the poll loop to stop after its current wait.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Waits for the listener thread, including in-flight requests.
    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        self.handle
            .take()
            .map_or(Ok(()), |handle| {
                handle.join().map_err(|_| ListenerError::ThreadPanic)
            })
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
