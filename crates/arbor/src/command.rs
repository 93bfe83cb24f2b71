//! Background work that produces messages.
//!
//! A [`Command`] runs off the render thread and delivers at most one message
//! back to the program. Blocking closures run on the executor's blocking
//! pool; futures run on its async workers. Failures are the command's own
//! business: a command that can fail should deliver a message describing
//! the failure.

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tracing::debug;

/// A shared flag that asks a command's delivery to be dropped.
///
/// Cancellation is not cooperative: the work itself keeps running, but its
/// message is discarded if the flag is set before it is delivered.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// A handle that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the associated command.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Has the command been cancelled?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The delivery channel handed to a blocking command.
pub struct Deliver<M> {
    /// Sends a message to the program.
    send: Arc<dyn Fn(M) + Send + Sync>,
    /// Cancellation flag for the command, if any.
    cancel: Option<CancelHandle>,
}

impl<M> Deliver<M> {
    /// Wrap a send function.
    pub(crate) fn new(send: impl Fn(M) + Send + Sync + 'static, cancel: Option<CancelHandle>) -> Self {
        Self {
            send: Arc::new(send),
            cancel,
        }
    }

    /// Has the command been cancelled?
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelHandle::is_cancelled)
    }

    /// Deliver the command's message. Returns false, dropping the message,
    /// if the command was cancelled.
    pub fn send(self, message: M) -> bool {
        if self.is_cancelled() {
            debug!("dropping message from cancelled command");
            return false;
        }
        (self.send)(message);
        true
    }
}

/// The body of a command.
pub(crate) enum Work<M> {
    /// A closure for the blocking pool.
    Blocking(Box<dyn FnOnce(Deliver<M>) + Send>),
    /// A future for the async workers.
    Future(Pin<Box<dyn Future<Output = M> + Send>>),
}

/// A unit of background work that delivers at most one message.
pub struct Command<M> {
    /// What to run.
    pub(crate) work: Work<M>,
    /// Cancellation flag.
    pub(crate) cancel: Option<CancelHandle>,
}

impl<M: Send + 'static> Command<M> {
    /// Deliver a message without doing any work.
    pub fn message(message: M) -> Self {
        Self::perform(async move { message })
    }

    /// Run a blocking closure on the background pool. The closure delivers
    /// its result through [`Deliver::send`], or not at all.
    pub fn blocking(f: impl FnOnce(Deliver<M>) + Send + 'static) -> Self {
        Self {
            work: Work::Blocking(Box::new(f)),
            cancel: None,
        }
    }

    /// Run a future on the async workers and deliver its output.
    pub fn perform(fut: impl Future<Output = M> + Send + 'static) -> Self {
        Self {
            work: Work::Future(Box::pin(fut)),
            cancel: None,
        }
    }

    /// Attach an existing cancellation handle.
    pub fn with_cancel(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    /// Attach a fresh cancellation handle and return it.
    pub fn cancellable(self) -> (Self, CancelHandle) {
        let handle = CancelHandle::new();
        (self.with_cancel(handle.clone()), handle)
    }

    /// Convert the delivered message.
    pub fn map<N: Send + 'static>(self, f: impl Fn(M) -> N + Send + Sync + 'static) -> Command<N> {
        let work = match self.work {
            Work::Blocking(g) => Work::Blocking(Box::new(move |d: Deliver<N>| {
                let Deliver { send, cancel } = d;
                g(Deliver::new(move |m| send(f(m)), cancel));
            })),
            Work::Future(fut) => Work::Future(Box::pin(async move { f(fut.await) })),
        };
        Command {
            work,
            cancel: self.cancel,
        }
    }
}

impl<M> fmt::Debug for Command<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.work {
            Work::Blocking(_) => "blocking",
            Work::Future(_) => "future",
        };
        f.debug_struct("Command")
            .field("kind", &kind)
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn collector() -> (Arc<Mutex<Vec<u32>>>, Deliver<u32>) {
        let got = Arc::new(Mutex::new(vec![]));
        let sink = got.clone();
        let d = Deliver::new(move |m| sink.lock().unwrap().push(m), None);
        (got, d)
    }

    #[test]
    fn deliver_respects_cancel() {
        let (got, d) = collector();
        assert!(d.send(1));
        let handle = CancelHandle::new();
        let sink = got.clone();
        let d = Deliver::new(move |m| sink.lock().unwrap().push(m), Some(handle.clone()));
        handle.cancel();
        assert!(!d.send(2));
        assert_eq!(*got.lock().unwrap(), vec![1]);
    }

    #[test]
    fn map_blocking() {
        let cmd = Command::blocking(|d: Deliver<u32>| {
            d.send(20);
        })
        .map(|n| n + 1);
        let (got, d) = collector();
        let Work::Blocking(f) = cmd.work else {
            panic!("expected blocking work");
        };
        f(d);
        assert_eq!(*got.lock().unwrap(), vec![21]);
    }

    #[test]
    fn cancellable_shares_flag() {
        let (cmd, handle) = Command::message(1u32).cancellable();
        handle.cancel();
        assert!(cmd.cancel.as_ref().is_some_and(CancelHandle::is_cancelled));
    }
}
