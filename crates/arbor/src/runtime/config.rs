use std::time::Duration;

use crate::event::key::Key;

/// Options for the program loop.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// How long the first input poll of an iteration may block.
    pub poll_timeout: Duration,
    /// Minimum interval between `Tick` events.
    pub tick_rate: Duration,
    /// Most input events read per iteration.
    pub max_events: usize,
    /// A key that ends the program with [`Exit::Quit`](super::Exit::Quit).
    pub quit_key: Option<Key>,
    /// A key that ends the program with
    /// [`Exit::Interrupted`](super::Exit::Interrupted).
    pub interrupt_key: Key,
    /// Deliver captured log lines to the view as `Log` events.
    pub log_events: bool,
    /// Async worker threads for background commands.
    pub workers: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(15),
            tick_rate: Duration::from_millis(50),
            max_events: 64,
            quit_key: None,
            interrupt_key: Key::ctrl('c'),
            log_events: false,
            workers: 2,
        }
    }
}

impl RuntimeConfig {
    /// Set the poll timeout.
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Set the tick rate.
    pub fn tick_rate(mut self, rate: Duration) -> Self {
        self.tick_rate = rate;
        self
    }

    /// Set the per-iteration input limit.
    pub fn max_events(mut self, n: usize) -> Self {
        self.max_events = n.max(1);
        self
    }

    /// Set a quit key.
    pub fn quit_key(mut self, key: impl Into<Key>) -> Self {
        self.quit_key = Some(key.into());
        self
    }

    /// Set the interrupt key.
    pub fn interrupt_key(mut self, key: impl Into<Key>) -> Self {
        self.interrupt_key = key.into();
        self
    }

    /// Deliver log lines to the view.
    pub fn log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }

    /// Set the number of async workers.
    pub fn workers(mut self, n: usize) -> Self {
        self.workers = n.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let c = RuntimeConfig::default()
            .quit_key('q')
            .max_events(0)
            .tick_rate(Duration::from_millis(5));
        assert_eq!(c.quit_key, Some(Key::from('q')));
        assert_eq!(c.max_events, 1);
        assert_eq!(c.interrupt_key, Key::ctrl('c'));
        assert_eq!(c.poll_timeout, Duration::from_millis(15));
    }
}
