//! Bounded worker pool shared by the listener threads.
//!
//! Each listener owns one pool. Jobs queue in a backlog a few times larger
//! than the worker count; once the backlog is full, submissions are refused
//! and the listener drops the request.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::debug;

use super::LISTENER_TARGET;

/// Queued jobs allowed per worker before submissions are refused.
const BACKLOG_PER_WORKER: usize = 4;

/// Unit of work run by a pool worker.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Returned when every worker is busy and the backlog is full.
#[derive(Debug)]
pub(crate) struct Saturated;

/// Fixed set of threads draining a bounded job queue.
pub(crate) struct WorkerPool {
    sender: Option<SyncSender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `size` workers; zero is raised to one.
    pub(crate) fn new(size: usize) -> Self {
        let size = size.max(1);
        let (sender, receiver) = mpsc::sync_channel::<Job>(size * BACKLOG_PER_WORKER);
        let receiver = Arc::new(Mutex::new(receiver));
        let workers = (0..size)
            .map(|_| {
                let receiver = Arc::clone(&receiver);
                thread::spawn(move || work(&receiver))
            })
            .collect();
        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Queues `job` without blocking.
    pub(crate) fn try_submit(&self, job: Job) -> Result<(), Saturated> {
        let Some(sender) = self.sender.as_ref() else {
            return Err(Saturated);
        };
        match sender.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => Err(Saturated),
        }
    }
}

impl Drop for WorkerPool {
    /// Closes the queue and waits for queued and running jobs to finish.
    fn drop(&mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                debug!(target: LISTENER_TARGET, "pool worker panicked");
            }
        }
    }
}

fn work(receiver: &Mutex<Receiver<Job>>) {
    loop {
        let next = match receiver.lock() {
            Ok(guard) => guard.recv(),
            Err(_) => return,
        };
        match next {
            Ok(job) => job(),
            Err(_) => return,
        }
    }
}
