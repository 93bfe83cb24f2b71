use tokio::{
    runtime::{Builder, Runtime},
    sync::mpsc::{UnboundedReceiver, UnboundedSender, error::TryRecvError, unbounded_channel},
};
use tracing::{trace, warn};

use crate::{
    command::{CancelHandle, Command, Deliver, Work},
    error::{Error, Result},
};

/// Runs commands off the render thread and collects their messages.
pub(crate) struct Executor<M> {
    /// Worker pool. Taken on drop.
    rt: Option<Runtime>,
    /// Message sender handed to every command.
    tx: UnboundedSender<M>,
    /// Message receiver drained by the program loop.
    rx: UnboundedReceiver<M>,
}

impl<M: Send + 'static> Executor<M> {
    /// A pool with `workers` async threads.
    pub(crate) fn new(workers: usize) -> Result<Self> {
        let rt = Builder::new_multi_thread()
            .worker_threads(workers.max(1))
            .thread_name("arbor-worker")
            .enable_time()
            .build()
            .map_err(|e| Error::Command(e.to_string()))?;
        let (tx, rx) = unbounded_channel();
        Ok(Self {
            rt: Some(rt),
            tx,
            rx,
        })
    }

    /// A delivery handle for one command.
    fn deliver(&self, cmd_cancel: Option<CancelHandle>) -> Deliver<M> {
        let tx = self.tx.clone();
        Deliver::new(
            move |m| {
                if tx.send(m).is_err() {
                    warn!("program loop gone, dropping command message");
                }
            },
            cmd_cancel,
        )
    }

    /// Start a command.
    pub(crate) fn spawn(&self, cmd: Command<M>) {
        let Some(rt) = &self.rt else {
            return;
        };
        let deliver = self.deliver(cmd.cancel);
        match cmd.work {
            Work::Blocking(f) => {
                trace!("spawning blocking command");
                drop(rt.spawn_blocking(move || f(deliver)));
            }
            Work::Future(fut) => {
                trace!("spawning future command");
                drop(rt.spawn(async move {
                    deliver.send(fut.await);
                }));
            }
        }
    }

    /// Every message delivered so far, in arrival order.
    pub(crate) fn drain(&mut self) -> Vec<M> {
        let mut out = vec![];
        loop {
            match self.rx.try_recv() {
                Ok(m) => out.push(m),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

impl<M> Drop for Executor<M> {
    fn drop(&mut self) {
        if let Some(rt) = self.rt.take() {
            rt.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        thread,
        time::{Duration, Instant},
    };

    use super::*;

    fn wait_for(ex: &mut Executor<u32>, n: usize) -> Vec<u32> {
        let start = Instant::now();
        let mut got = vec![];
        while got.len() < n && start.elapsed() < Duration::from_secs(5) {
            got.extend(ex.drain());
            thread::sleep(Duration::from_millis(1));
        }
        got
    }

    #[test]
    fn runs_both_kinds() {
        let mut ex = Executor::new(1).unwrap();
        ex.spawn(Command::blocking(|d| {
            d.send(1);
        }));
        ex.spawn(Command::perform(async { 2 }));
        ex.spawn(Command::message(3));
        let mut got = wait_for(&mut ex, 3);
        got.sort_unstable();
        assert_eq!(got, vec![1, 2, 3]);
    }

    #[test]
    fn cancelled_commands_deliver_nothing() {
        let mut ex = Executor::new(1).unwrap();
        let (cmd, handle) = Command::blocking(|d| {
            thread::sleep(Duration::from_millis(20));
            d.send(1);
        })
        .cancellable();
        ex.spawn(cmd);
        handle.cancel();
        ex.spawn(Command::message(2));
        thread::sleep(Duration::from_millis(60));
        assert_eq!(wait_for(&mut ex, 1), vec![2]);
    }
}
