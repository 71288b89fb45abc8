//! # Execution Contexts
//!
//! A capability that accepts a unit of work and guarantees it runs in some
//! chosen context: inline on the calling path, or queued for a designated
//! context that drains work in FIFO order.

use tokio::sync::mpsc;

/// A unit of deliverable work.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Runs work in the context this executor stands for.
///
/// Posting always succeeds in enqueuing; queue failures are the platform's
/// concern, not modeled here.
pub trait Executor: Send + Sync + 'static {
    fn post(&self, work: Work);
}

/// Runs work synchronously on the calling path.
#[derive(Clone, Copy, Debug, Default)]
pub struct Immediate;

impl Immediate {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for Immediate {
    fn post(&self, work: Work) {
        work();
    }
}

/// Queues work for a designated context and returns immediately.
///
/// Work posted through one `Deferred` runs in FIFO order relative to other
/// work on the same queue.
#[derive(Clone)]
pub struct Deferred {
    tx: mpsc::UnboundedSender<Work>,
}

impl Deferred {
    /// Create an executor plus the queue its designated context drains.
    pub fn channel() -> (Self, WorkQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, WorkQueue { rx })
    }

    /// Create an executor whose queue is drained by a dedicated background
    /// task. Must be called within a tokio runtime.
    pub fn spawn() -> Self {
        let (executor, queue) = Self::channel();
        tokio::spawn(queue.run());
        executor
    }
}

impl Executor for Deferred {
    fn post(&self, work: Work) {
        // a torn-down queue silently discards late work
        let _ = self.tx.send(work);
    }
}

/// Receiving end of a deferred executor, owned by the designated context.
pub struct WorkQueue {
    rx: mpsc::UnboundedReceiver<Work>,
}

impl WorkQueue {
    /// Run every unit of work queued so far, in order. Returns how many ran.
    pub fn drain(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(work) = self.rx.try_recv() {
            work();
            ran += 1;
        }
        ran
    }

    /// Drain work until every executor handle is dropped.
    pub async fn run(mut self) {
        while let Some(work) = self.rx.recv().await {
            work();
        }
    }
}
