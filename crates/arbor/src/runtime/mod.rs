//! The program loop.
//!
//! A [`Runtime`] owns a [`Program`] and drives it against a
//! [`Backend`]: background commands feed messages into a channel, input is
//! polled with a short timeout, events go to the current view tree, messages
//! go to `update`, and a new frame is rendered whenever the model changed, the
//! terminal was resized, or a view asked for a redraw.

use std::{
    fmt, mem,
    time::{Duration, Instant},
};

use tracing::{debug, error, trace};

use crate::{
    backend::{Backend, Session},
    buffer::Buffer,
    command::Command,
    error::Result,
    event::Event,
    geom::Expanse,
    log::LogSink,
    view::View,
};

/// Runtime options.
mod config;
/// The background command pool.
mod executor;

pub use config::RuntimeConfig;
use executor::Executor;

/// A closure run after the terminal has been restored.
pub type AfterQuit = Box<dyn FnOnce() -> anyhow::Result<()> + Send>;

/// The result of a single `update` call.
pub enum Update<Model, M> {
    /// Nothing changed. The current view stays on screen.
    NoChange,
    /// A new model, plus commands to start in the background.
    Update(Model, Vec<Command<M>>),
    /// Stop the program.
    Quit,
    /// Stop the program, restore the terminal, then run the closure.
    QuitAndRun(AfterQuit),
}

impl<Model, M> Update<Model, M> {
    /// A new model with no commands.
    pub fn model(model: Model) -> Self {
        Self::Update(model, vec![])
    }

    /// A new model with a single command.
    pub fn with_command(model: Model, cmd: Command<M>) -> Self {
        Self::Update(model, vec![cmd])
    }

    /// Stop the program and run `f` once the terminal is restored.
    pub fn quit_and_run(f: impl FnOnce() -> anyhow::Result<()> + Send + 'static) -> Self {
        Self::QuitAndRun(Box::new(f))
    }
}

impl<Model, M> fmt::Debug for Update<Model, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChange => f.write_str("NoChange"),
            Self::Update(_, cmds) => write!(f, "Update({} commands)", cmds.len()),
            Self::Quit => f.write_str("Quit"),
            Self::QuitAndRun(_) => f.write_str("QuitAndRun"),
        }
    }
}

/// Why the program loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The program asked to stop, or the quit key was pressed.
    Quit,
    /// The interrupt key was pressed.
    Interrupted,
}

impl Exit {
    /// Conventional process exit code.
    pub fn code(self) -> i32 {
        match self {
            Self::Quit => 0,
            Self::Interrupted => 130,
        }
    }
}

/// An application: a model, the messages that change it, and a view of it.
pub trait Program {
    /// Application state.
    type Model;
    /// Things that can happen to the model.
    type Message: Send + 'static;

    /// The starting model, plus commands to start immediately.
    fn initial(&self) -> (Self::Model, Vec<Command<Self::Message>>);

    /// Apply a message.
    fn update(&self, model: &Self::Model, msg: Self::Message)
    -> Update<Self::Model, Self::Message>;

    /// Describe the screen for a model at the given terminal size.
    fn view(&self, model: &Self::Model, size: Expanse) -> View<Self::Message>;
}

/// Drives a [`Program`].
pub struct Runtime<P: Program> {
    /// The application.
    program: P,
    /// Loop options.
    config: RuntimeConfig,
    /// Captured log lines.
    logs: LogSink,
}

/// Live state for one run of the loop.
struct Frame<P: Program> {
    /// Current model.
    model: P::Model,
    /// View tree for the current model.
    view: View<P::Message>,
    /// Most recently rendered buffer.
    buf: Buffer,
    /// Current terminal size.
    size: Expanse,
}

/// The outcome of one input poll.
enum Polled {
    /// Input to deliver.
    Events {
        /// Events in arrival order.
        events: Vec<Event>,
        /// A resize was among them.
        resized: bool,
    },
    /// A quit or interrupt key was pressed.
    Stop(Exit),
}

/// What the loop decided after processing messages.
enum Step {
    /// Keep going.
    Continue {
        /// The model changed.
        dirty: bool,
    },
    /// Stop.
    Stop(Exit, Option<AfterQuit>),
}

impl<P: Program> Runtime<P> {
    /// A runtime with default options.
    pub fn new(program: P) -> Self {
        Self {
            program,
            config: RuntimeConfig::default(),
            logs: LogSink::new(),
        }
    }

    /// Replace the options.
    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing log sink.
    pub fn with_logs(mut self, logs: LogSink) -> Self {
        self.logs = logs;
        self
    }

    /// The log sink owned by this runtime.
    pub fn logs(&self) -> &LogSink {
        &self.logs
    }

    /// Run until the program quits or is interrupted.
    ///
    /// The terminal is restored on every exit path. Captured log lines are
    /// flushed to stderr afterwards, and a `QuitAndRun` closure runs last.
    pub fn run<B: Backend>(self, backend: &mut B) -> Result<Exit> {
        let mut session = Session::new(backend)?;
        let mut executor = Executor::new(self.config.workers)?;
        let result = self.run_loop(&mut session, &mut executor);
        drop(executor);
        let finished = session.finish();
        self.logs.flush_to_stderr()?;
        let (exit, after) = result?;
        finished?;
        debug!(?exit, "program loop finished");
        if let Some(f) = after {
            f()?;
        }
        Ok(exit)
    }

    /// Set up the first frame, then iterate until told to stop.
    fn run_loop<B: Backend>(
        &self,
        session: &mut Session<'_, B>,
        executor: &mut Executor<P::Message>,
    ) -> Result<(Exit, Option<AfterQuit>)> {
        let (model, mut pending) = self.program.initial();
        let size = session.backend().size()?;
        debug!(?size, "starting program loop");
        let view = self.program.view(&model, size);
        let mut frame = Frame::<P> {
            model,
            view,
            buf: Buffer::new(size),
            size,
        };
        frame.view.render_root(&mut frame.buf)?;
        session.backend().present(frame.buf.grid())?;

        let mut last_tick = Instant::now();
        let mut log_cursor = self.logs.len();
        loop {
            for cmd in pending.drain(..) {
                executor.spawn(cmd);
            }
            let mut messages = executor.drain();

            let (mut events, resized) = match self.poll(session, &mut frame, messages.is_empty())? {
                Polled::Events { events, resized } => (events, resized),
                Polled::Stop(exit) => return Ok((exit, None)),
            };

            let elapsed = last_tick.elapsed();
            if elapsed >= self.config.tick_rate {
                events.push(Event::Tick(elapsed));
                last_tick = Instant::now();
            }
            if self.config.log_events {
                let lines = self.logs.since(log_cursor);
                log_cursor += lines.len();
                events.extend(lines.into_iter().map(Event::Log));
            }

            let mut redraw = false;
            for ev in &events {
                let out = frame.view.handle_event(ev, &mut frame.buf);
                redraw |= out.events.iter().any(Event::is_redraw);
                messages.extend(out.messages);
            }

            let dirty = match self.apply(&mut frame, messages, &mut pending) {
                Step::Continue { dirty } => dirty,
                Step::Stop(exit, after) => return Ok((exit, after)),
            };

            if dirty || resized {
                frame.view = self.program.view(&frame.model, frame.size);
            }
            if dirty || resized || redraw {
                trace!(dirty, resized, redraw, "rendering frame");
                let prev = mem::replace(&mut frame.buf, Buffer::new(Expanse::default()));
                frame.buf = prev.next_frame(frame.size);
                frame.view.render_root(&mut frame.buf)?;
                session.backend().present(frame.buf.grid())?;
            }
        }
    }

    /// Read up to `max_events` input events, stopping early on a quit or
    /// interrupt key.
    fn poll<B: Backend>(
        &self,
        session: &mut Session<'_, B>,
        frame: &mut Frame<P>,
        idle: bool,
    ) -> Result<Polled> {
        let mut events = vec![];
        let mut resized = false;
        for i in 0..self.config.max_events {
            let timeout = if i == 0 && idle {
                self.config.poll_timeout
            } else {
                Duration::ZERO
            };
            let ev = match session.backend().poll_event(timeout) {
                Ok(Some(ev)) => ev,
                Ok(None) => break,
                Err(e) => {
                    error!("backend read failed: {e}");
                    return Err(e);
                }
            };
            match &ev {
                Event::Key(k) if k.matches(&self.config.interrupt_key) => {
                    debug!("interrupted");
                    return Ok(Polled::Stop(Exit::Interrupted));
                }
                Event::Key(k) if self.config.quit_key.is_some_and(|q| k.matches(&q)) => {
                    debug!("quit key");
                    return Ok(Polled::Stop(Exit::Quit));
                }
                Event::Resize(s) => {
                    frame.size = *s;
                    resized = true;
                }
                Event::Ignore => continue,
                _ => {}
            }
            trace!(?ev, "input");
            events.push(ev);
        }
        Ok(Polled::Events { events, resized })
    }

    /// Run `update` for each message in order.
    fn apply(
        &self,
        frame: &mut Frame<P>,
        messages: Vec<P::Message>,
        pending: &mut Vec<Command<P::Message>>,
    ) -> Step {
        let mut dirty = false;
        for msg in messages {
            match self.program.update(&frame.model, msg) {
                Update::NoChange => {}
                Update::Update(model, cmds) => {
                    frame.model = model;
                    pending.extend(cmds);
                    dirty = true;
                }
                Update::Quit => return Step::Stop(Exit::Quit, None),
                Update::QuitAndRun(f) => return Step::Stop(Exit::Quit, Some(f)),
            }
        }
        Step::Continue { dirty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::test::TestBackend,
        event::key::{Key, KeyCode},
        view::text,
    };

    /// Counts key presses, quits on 'q'.
    struct Counter;

    #[derive(Debug, Clone)]
    enum Msg {
        Inc,
        Quit,
    }

    impl Program for Counter {
        type Model = u32;
        type Message = Msg;

        fn initial(&self) -> (u32, Vec<Command<Msg>>) {
            (0, vec![])
        }

        fn update(&self, model: &u32, msg: Msg) -> Update<u32, Msg> {
            match msg {
                Msg::Inc => Update::model(model + 1),
                Msg::Quit => Update::Quit,
            }
        }

        fn view(&self, model: &u32, _size: Expanse) -> View<Msg> {
            text(format!("n={model}"))
                .on_key('+', Msg::Inc)
                .on_key('q', Msg::Quit)
        }
    }

    #[test]
    fn quits_after_update() {
        let mut be = TestBackend::new((6, 1))
            .events([Event::Key(Key::from('+')), Event::Key(Key::from('+'))])
            .idle(1)
            .events([Event::Key(Key::from('q'))])
            .idle(1);
        let exit = Runtime::new(Counter).run(&mut be).unwrap();
        assert_eq!(exit, Exit::Quit);
        assert_eq!(exit.code(), 0);
        assert!(be.teardown);
        let last = be.last_frame().unwrap();
        assert_eq!(last.lines()[0], "n=2   ");
    }

    #[test]
    fn interrupt() {
        let mut be = TestBackend::new((6, 1)).events([Event::Key(Key::ctrl('c'))]);
        let exit = Runtime::new(Counter).run(&mut be).unwrap();
        assert_eq!(exit, Exit::Interrupted);
        assert_eq!(exit.code(), 130);
    }

    #[test]
    fn quit_key() {
        let mut be = TestBackend::new((6, 1)).events([Event::Key(KeyCode::Esc.into())]);
        let exit = Runtime::new(Counter)
            .with_config(RuntimeConfig::default().quit_key(KeyCode::Esc))
            .run(&mut be)
            .unwrap();
        assert_eq!(exit, Exit::Quit);
        assert_eq!(be.frames().lock().unwrap().len(), 1);
    }

    #[test]
    fn exhausted_script_is_an_error() {
        let mut be = TestBackend::new((6, 1)).events([Event::Key(Key::from('+'))]);
        assert!(Runtime::new(Counter).run(&mut be).is_err());
        assert!(be.teardown);
    }
}
