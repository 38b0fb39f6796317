//! Owner thread task queue
//!
//! Allows any thread to hand work to the owner thread and wait for the result.
//! Tasks are processed each frame by the host hook, or continuously by a
//! dedicated worker thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{JoinHandle, ThreadId};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;

/// A task to execute on the owner thread
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Capacity of the task queue
const QUEUE_CAPACITY: usize = 1024;

/// How often a waiting caller re-checks whether the queue was closed
const CLOSE_POLL: Duration = Duration::from_millis(50);

/// Errors from handing work to the owner thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The queue is at capacity (only for non-blocking posts)
    #[error("Owner thread queue is full")]
    Full,

    /// The owner thread stopped before running the task
    #[error("Owner thread is shut down")]
    Closed,
}

/// Handle to the single thread allowed to touch the client
pub struct MainThread {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
    owner: ThreadId,
    closed: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl MainThread {
    /// Bind the owner to the calling thread
    ///
    /// The host must call [`process_queued_tasks`](Self::process_queued_tasks)
    /// from this thread (usually once per frame).
    pub fn bind_current() -> Arc<Self> {
        let (sender, receiver) = bounded(QUEUE_CAPACITY);
        let owner = std::thread::current().id();
        tracing::info!("Owner thread bound: {:?}", owner);
        Arc::new(Self {
            sender,
            receiver,
            owner,
            closed: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        })
    }

    /// Spawn a dedicated owner thread that runs tasks as they arrive
    pub fn spawn(name: &str) -> std::io::Result<Arc<Self>> {
        let (sender, receiver) = bounded::<Task>(QUEUE_CAPACITY);
        let closed = Arc::new(AtomicBool::new(false));

        let worker_rx = receiver.clone();
        let worker_closed = Arc::clone(&closed);
        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Ok(task) = worker_rx.recv() {
                    if worker_closed.load(Ordering::Acquire) {
                        break;
                    }
                    task();
                }
                // Dropping pending tasks wakes their callers with `Closed`
                let dropped = worker_rx.try_iter().count();
                if dropped > 0 {
                    tracing::debug!("Dropped {} pending tasks on shutdown", dropped);
                }
            })?;

        let owner = handle.thread().id();
        tracing::info!("Owner thread '{}' spawned: {:?}", name, owner);

        Ok(Arc::new(Self {
            sender,
            receiver,
            owner,
            closed,
            worker: Mutex::new(Some(handle)),
        }))
    }

    /// Check if the calling thread is the owner
    pub fn is_owner_thread(&self) -> bool {
        std::thread::current().id() == self.owner
    }

    /// Check if the queue was closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Run `f` on the owner thread and wait for its result
    ///
    /// Runs inline when called from the owner thread itself.
    pub fn invoke<F, R>(&self, f: F) -> Result<R, DispatchError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_owner_thread() {
            return Ok(f());
        }
        if self.is_closed() {
            return Err(DispatchError::Closed);
        }

        let (reply_tx, reply_rx) = bounded(1);
        let task: Task = Box::new(move || {
            let _ = reply_tx.send(f());
        });

        self.sender.send(task).map_err(|_| DispatchError::Closed)?;

        loop {
            match reply_rx.recv_timeout(CLOSE_POLL) {
                Ok(value) => return Ok(value),
                Err(RecvTimeoutError::Disconnected) => return Err(DispatchError::Closed),
                Err(RecvTimeoutError::Timeout) if self.is_closed() => {
                    // Closed while queued: the task will never run
                    return Err(DispatchError::Closed);
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }

    /// Queue a task without waiting for it
    #[tracing::instrument(skip_all)]
    pub fn post<F>(&self, task: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_closed() {
            return Err(DispatchError::Closed);
        }
        match self.sender.try_send(Box::new(task)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Task queue full, dropping task");
                Err(DispatchError::Full)
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("Task queue disconnected");
                Err(DispatchError::Closed)
            }
        }
    }

    /// Process all queued tasks
    ///
    /// Called from the host's frame hook on the owner thread.
    /// Returns the number of tasks processed.
    #[tracing::instrument(skip_all)]
    pub fn process_queued_tasks(&self) -> usize {
        if !self.is_owner_thread() {
            tracing::warn!("process_queued_tasks called off the owner thread");
            return 0;
        }

        let mut count = 0;

        // Process up to QUEUE_CAPACITY tasks per frame
        while let Ok(task) = self.receiver.try_recv() {
            task();
            count += 1;

            if count >= QUEUE_CAPACITY {
                break;
            }
        }

        count
    }

    /// Check how many tasks are currently queued
    pub fn queued_task_count(&self) -> usize {
        self.receiver.len()
    }

    /// Stop accepting tasks and join the dedicated worker, if any
    ///
    /// Pending tasks are dropped; their callers get [`DispatchError::Closed`].
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        // Wake the worker so it observes the flag
        let _ = self.sender.try_send(Box::new(|| {}));

        if let Some(handle) = self.worker.lock().take() {
            if handle.thread().id() == std::thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                tracing::error!("Owner thread panicked");
            }
        }

        let dropped = self.receiver.try_iter().count();
        if dropped > 0 {
            tracing::debug!("Dropped {} pending tasks on close", dropped);
        }
        tracing::info!("Owner thread closed");
    }
}

impl Drop for MainThread {
    fn drop(&mut self) {
        self.close();
    }
}
