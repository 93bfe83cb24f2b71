//! A counter with clickable buttons, a background delayed increment, a
//! spinner and a log pane.

use std::{process, thread, time::Duration};

use arbor::{
    backend::crossterm::{CrosstermBackend, CrosstermOptions},
    error::Result,
    prelude::*,
};
use clap::Parser;
use tracing::{Level, info};

/// CLI flags for the counter example.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Capture debug logs and show them in a pane.
    #[clap(short, long)]
    logs: bool,

    /// Delay for the background increment, in milliseconds.
    #[clap(short, long, default_value_t = 800)]
    delay: u64,

    /// Disable mouse capture.
    #[clap(long)]
    no_mouse: bool,
}

/// Counter state.
#[derive(Debug, Clone, Default)]
struct Model {
    /// Current value.
    count: i64,
    /// Delayed increments still running.
    pending: usize,
    /// Recent log lines.
    log: Vec<String>,
}

/// Things that change the counter.
#[derive(Debug, Clone)]
enum Msg {
    /// Add one.
    Inc,
    /// Subtract one.
    Dec,
    /// Start a delayed increment.
    Later,
    /// A delayed increment finished.
    Arrived,
    /// A captured log line.
    Log(String),
    /// Leave.
    Quit,
}

/// The counter program.
struct Counter {
    /// Delay for background increments.
    delay: Duration,
    /// Show the log pane.
    show_logs: bool,
}

impl Program for Counter {
    type Model = Model;
    type Message = Msg;

    fn initial(&self) -> (Model, Vec<Command<Msg>>) {
        (Model::default(), vec![])
    }

    fn update(&self, model: &Model, msg: Msg) -> Update<Model, Msg> {
        let mut next = model.clone();
        match msg {
            Msg::Inc => next.count += 1,
            Msg::Dec => next.count -= 1,
            Msg::Later => {
                next.pending += 1;
                let delay = self.delay;
                info!("starting delayed increment");
                return Update::with_command(
                    next,
                    Command::blocking(move |d| {
                        thread::sleep(delay);
                        d.send(Msg::Arrived);
                    }),
                );
            }
            Msg::Arrived => {
                next.pending = next.pending.saturating_sub(1);
                next.count += 1;
                info!(count = next.count, "delayed increment arrived");
            }
            Msg::Log(line) => {
                next.log.push(line);
                let excess = next.log.len().saturating_sub(50);
                next.log.drain(..excess);
            }
            Msg::Quit => return Update::Quit,
        }
        Update::model(next)
    }

    fn view(&self, model: &Model, size: Expanse) -> View<Msg> {
        let button = |label: &str, msg: Msg| {
            View::from(Boxed::new(text(label).center()))
                .width(label.len() as u32 + 4)
                .on_click(msg)
        };
        let busy: View<Msg> = if model.pending > 0 {
            row([spinner(), text(format!(" {} pending", model.pending))])
        } else {
            text("idle")
        };
        let counter = column([
            Text::new(format!("count: {}", model.count)).bold().into(),
            row([
                button("-", Msg::Dec),
                space().width(1u32),
                button("+", Msg::Inc),
                space().width(1u32),
                button("later", Msg::Later),
            ])
            .height(3u32),
            busy,
            Text::new("+/- to count, l for later, q to quit").wrap().into(),
        ])
        .padding(1u32);

        let mut body = vec![View::from(Boxed::new(counter).title("counter")).flex(1)];
        if self.show_logs {
            let lines = model.log.iter().map(|l| text(l.as_str()));
            body.push(
                View::from(Boxed::new(scroll(column(lines))).title("log"))
                    .height(Dimension::Percent(40)),
            );
        }
        let help = Expanse::new(30.min(size.w), 5.min(size.h));
        let at = Point::new(size.w.saturating_sub(help.w + 2), 1);
        let about = Window::new("about", help, Text::new("drag me by the title").wrap().into());
        zstack([column(body), View::from(about.at(at)).key("about")])
            .on_key('+', Msg::Inc)
            .on_key('-', Msg::Dec)
            .on_key('l', Msg::Later)
            .on_key('q', Msg::Quit)
            .on_log(|l| Msg::Log(l.to_string()))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let app = Counter {
        delay: Duration::from_millis(args.delay),
        show_logs: args.logs,
    };
    let runtime = Runtime::new(app).with_config(
        RuntimeConfig::default()
            .quit_key(KeyCode::Esc)
            .log_events(args.logs),
    );
    if args.logs {
        runtime.logs().install(Level::DEBUG)?;
    }
    let mut backend = CrosstermBackend::new(CrosstermOptions {
        mouse: !args.no_mouse,
        ..CrosstermOptions::default()
    });
    let exit = runtime.run(&mut backend)?;
    process::exit(exit.code());
}
