//! The program loop against a scripted backend.

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use arbor::{
        Error, TermBuf,
        backend::{Backend, test::TestBackend},
        log::LogSink,
        prelude::*,
    };

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Msg {
        Loaded(u32),
        Log(String),
        Tick,
        Fail,
        Quit,
    }

    type Seen = Arc<Mutex<Vec<Msg>>>;

    /// Quits on the first message it receives, recording it after teardown.
    struct FirstMessage {
        commands: Mutex<Vec<Command<Msg>>>,
        seen: Seen,
    }

    impl FirstMessage {
        fn new(commands: Vec<Command<Msg>>) -> (Self, Seen) {
            let seen = Seen::default();
            let app = Self {
                commands: Mutex::new(commands),
                seen: seen.clone(),
            };
            (app, seen)
        }
    }

    impl Program for FirstMessage {
        type Model = ();
        type Message = Msg;

        fn initial(&self) -> ((), Vec<Command<Msg>>) {
            ((), self.commands.lock().unwrap().drain(..).collect())
        }

        fn update(&self, _model: &(), msg: Msg) -> Update<(), Msg> {
            let seen = self.seen.clone();
            match msg {
                Msg::Quit => Update::Quit,
                Msg::Fail => Update::quit_and_run(|| Err(anyhow::anyhow!("after quit"))),
                msg => Update::quit_and_run(move || {
                    seen.lock().unwrap().push(msg);
                    Ok(())
                }),
            }
        }

        fn view(&self, _model: &(), size: Expanse) -> View<Msg> {
            text(format!("{}x{}", size.w, size.h))
                .on_log(|l| Msg::Log(l.to_string()))
                .on_key('q', Msg::Quit)
                .on_key('f', Msg::Fail)
        }
    }

    fn idle_backend() -> TestBackend {
        TestBackend::new((5, 1)).idle(400)
    }

    #[test]
    fn blocking_command_delivers() {
        let (app, seen) = FirstMessage::new(vec![Command::blocking(|d| {
            d.send(Msg::Loaded(42));
        })]);
        let mut be = idle_backend();
        let exit = Runtime::new(app).run(&mut be).unwrap();
        assert_eq!(exit, Exit::Quit);
        assert!(be.setup && be.teardown);
        assert_eq!(*seen.lock().unwrap(), vec![Msg::Loaded(42)]);
    }

    #[test]
    fn future_command_delivers() {
        let (app, seen) = FirstMessage::new(vec![Command::perform(async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Msg::Loaded(7)
        })]);
        let exit = Runtime::new(app).run(&mut idle_backend()).unwrap();
        assert_eq!(exit, Exit::Quit);
        assert_eq!(*seen.lock().unwrap(), vec![Msg::Loaded(7)]);
    }

    #[test]
    fn cancelled_command_is_dropped() {
        let (cmd, handle) = Command::blocking(|d| {
            d.send(Msg::Loaded(1));
        })
        .cancellable();
        handle.cancel();
        let (app, seen) = FirstMessage::new(vec![cmd]);
        let mut be = TestBackend::new((5, 1))
            .idle(5)
            .events([Event::Key(Key::from('q'))])
            .idle(1);
        assert_eq!(Runtime::new(app).run(&mut be).unwrap(), Exit::Quit);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn ticks_reach_the_view() {
        struct Ticker;
        impl Program for Ticker {
            type Model = ();
            type Message = Msg;
            fn initial(&self) -> ((), Vec<Command<Msg>>) {
                ((), vec![])
            }
            fn update(&self, _model: &(), msg: Msg) -> Update<(), Msg> {
                assert_eq!(msg, Msg::Tick);
                Update::Quit
            }
            fn view(&self, _model: &(), _size: Expanse) -> View<Msg> {
                text("t").on_tick(|_| Msg::Tick)
            }
        }
        let config = RuntimeConfig::default().tick_rate(Duration::from_millis(1));
        let exit = Runtime::new(Ticker)
            .with_config(config)
            .run(&mut idle_backend())
            .unwrap();
        assert_eq!(exit, Exit::Quit);
    }

    #[test]
    fn log_lines_become_events() {
        let logs = LogSink::new();
        let sink = logs.clone();
        let (app, seen) = FirstMessage::new(vec![Command::blocking(move |_d| {
            sink.push("from worker");
        })]);
        let exit = Runtime::new(app)
            .with_logs(logs)
            .with_config(RuntimeConfig::default().log_events(true))
            .run(&mut idle_backend())
            .unwrap();
        assert_eq!(exit, Exit::Quit);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Msg::Log("from worker".into())]
        );
    }

    #[test]
    fn resize_rebuilds_the_view() {
        let (app, _) = FirstMessage::new(vec![]);
        let mut be = TestBackend::new((5, 1))
            .events([Event::Resize(Expanse::new(4, 2))])
            .idle(1)
            .events([Event::Key(Key::from('q'))])
            .idle(1);
        Runtime::new(app).run(&mut be).unwrap();
        let frame = be.last_frame().unwrap();
        assert_eq!(frame.size(), Expanse::new(4, 2));
        assert_eq!(frame.lines(), vec!["4x2 ", "    "]);
    }

    #[test]
    fn quit_and_run_errors_propagate() {
        let (app, _) = FirstMessage::new(vec![]);
        let mut be = TestBackend::new((5, 1))
            .events([Event::Key(Key::from('f'))])
            .idle(1);
        let err = Runtime::new(app).run(&mut be).unwrap_err();
        assert!(matches!(err, Error::App(_)));
        assert!(be.teardown);
    }

    /// Calls made to `update` and `view`.
    #[derive(Default)]
    struct Counts {
        updates: AtomicUsize,
        views: AtomicUsize,
    }

    /// Counts up on '+', quits on 'q', and records every call.
    struct Counted(Arc<Counts>);

    impl Program for Counted {
        type Model = u32;
        type Message = Msg;

        fn initial(&self) -> (u32, Vec<Command<Msg>>) {
            (0, vec![])
        }

        fn update(&self, model: &u32, msg: Msg) -> Update<u32, Msg> {
            self.0.updates.fetch_add(1, Ordering::SeqCst);
            match msg {
                Msg::Quit => Update::Quit,
                _ => Update::model(model + 1),
            }
        }

        fn view(&self, model: &u32, _size: Expanse) -> View<Msg> {
            self.0.views.fetch_add(1, Ordering::SeqCst);
            text(model.to_string())
                .on_key('+', Msg::Tick)
                .on_key('q', Msg::Quit)
        }
    }

    fn counted_run(keys: [char; 2]) -> (Arc<Counts>, TestBackend) {
        let counts = Arc::new(Counts::default());
        let mut be = TestBackend::new((3, 1))
            .events(keys.map(|c| Event::Key(Key::from(c))))
            .idle(1);
        let exit = Runtime::new(Counted(counts.clone())).run(&mut be).unwrap();
        assert_eq!(exit, Exit::Quit);
        (counts, be)
    }

    #[test]
    fn quit_drops_the_rest_of_the_batch() {
        // Both keys arrive in one poll; the quit is handled first.
        let (app, be) = counted_run(['q', '+']);
        assert_eq!(app.updates.load(Ordering::SeqCst), 1);
        assert_eq!(app.views.load(Ordering::SeqCst), 1);
        assert_eq!(be.frames().lock().unwrap().len(), 1);
    }

    #[test]
    fn no_view_after_quit() {
        // The increment is applied, but the loop stops before rebuilding.
        let (app, be) = counted_run(['+', 'q']);
        assert_eq!(app.updates.load(Ordering::SeqCst), 2);
        assert_eq!(app.views.load(Ordering::SeqCst), 1);
        assert_eq!(be.frames().lock().unwrap().len(), 1);
        assert!(be.teardown);
    }

    /// A backend whose setup always fails.
    #[derive(Default)]
    struct Broken {
        torn_down: bool,
    }

    impl Backend for Broken {
        fn size(&mut self) -> arbor::Result<Expanse> {
            Ok(Expanse::new(1, 1))
        }
        fn setup(&mut self) -> arbor::Result<()> {
            Err(Error::Backend("no tty".into()))
        }
        fn teardown(&mut self) -> arbor::Result<()> {
            self.torn_down = true;
            Ok(())
        }
        fn poll_event(&mut self, _timeout: Duration) -> arbor::Result<Option<Event>> {
            panic!("loop must not start");
        }
        fn present(&mut self, _grid: &TermBuf) -> arbor::Result<()> {
            panic!("loop must not start");
        }
    }

    #[test]
    fn setup_failure_aborts_before_the_loop() {
        let (app, _) = FirstMessage::new(vec![]);
        let mut be = Broken::default();
        let err = Runtime::new(app).run(&mut be).unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
        assert!(be.torn_down);
    }
}
