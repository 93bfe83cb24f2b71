use std::{
    io::{self, Stderr, Write},
    panic::{self, PanicHookInfo},
    time::Duration,
};

use color_backtrace::{BacktracePrinter, default_output_stream};
use crossterm::{
    self, ExecutableCommand, QueueableCommand, cursor as ccursor, event as cevent, style, terminal,
};

use super::{Backend, RenderBackend};
use crate::{
    buffer::TermBuf,
    error::{Error, Result},
    event::{Event, key, mouse},
    geom::{Expanse, Point},
    style::{Color, Style},
};

/// A stored panic hook.
type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Translate an arbor color into a crossterm color.
fn translate_color(c: Color) -> style::Color {
    match c {
        Color::Reset => style::Color::Reset,
        Color::Black => style::Color::Black,
        Color::DarkGrey => style::Color::DarkGrey,
        Color::Red => style::Color::Red,
        Color::DarkRed => style::Color::DarkRed,
        Color::Green => style::Color::Green,
        Color::DarkGreen => style::Color::DarkGreen,
        Color::Yellow => style::Color::Yellow,
        Color::DarkYellow => style::Color::DarkYellow,
        Color::Blue => style::Color::Blue,
        Color::DarkBlue => style::Color::DarkBlue,
        Color::Magenta => style::Color::Magenta,
        Color::DarkMagenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::Cyan,
        Color::DarkCyan => style::Color::DarkCyan,
        Color::White => style::Color::White,
        Color::Grey => style::Color::Grey,
        Color::Rgb { r, g, b } => style::Color::Rgb { r, g, b },
        Color::AnsiValue(a) => style::Color::AnsiValue(a),
    }
}

/// Map IO results into arbor errors.
fn translate_result<T>(e: io::Result<T>) -> Result<T> {
    e.map_err(|e| Error::Backend(e.to_string()))
}

/// Translate crossterm key modifiers into arbor modifiers.
fn translate_key_modifiers(mods: cevent::KeyModifiers) -> key::Mods {
    key::Mods {
        shift: mods.contains(cevent::KeyModifiers::SHIFT),
        ctrl: mods.contains(cevent::KeyModifiers::CONTROL),
        alt: mods.contains(cevent::KeyModifiers::ALT),
    }
}

/// Translate a crossterm mouse button into an arbor button.
fn translate_button(b: cevent::MouseButton) -> mouse::Button {
    match b {
        cevent::MouseButton::Left => mouse::Button::Left,
        cevent::MouseButton::Right => mouse::Button::Right,
        cevent::MouseButton::Middle => mouse::Button::Middle,
    }
}

/// Translate a crossterm key code. Keys arbor has no name for become `Null`.
fn translate_key_code(code: cevent::KeyCode) -> key::KeyCode {
    match code {
        cevent::KeyCode::Backspace => key::KeyCode::Backspace,
        cevent::KeyCode::Enter => key::KeyCode::Enter,
        cevent::KeyCode::Left => key::KeyCode::Left,
        cevent::KeyCode::Right => key::KeyCode::Right,
        cevent::KeyCode::Up => key::KeyCode::Up,
        cevent::KeyCode::Down => key::KeyCode::Down,
        cevent::KeyCode::Home => key::KeyCode::Home,
        cevent::KeyCode::End => key::KeyCode::End,
        cevent::KeyCode::PageUp => key::KeyCode::PageUp,
        cevent::KeyCode::PageDown => key::KeyCode::PageDown,
        cevent::KeyCode::Tab => key::KeyCode::Tab,
        cevent::KeyCode::Delete => key::KeyCode::Delete,
        cevent::KeyCode::F(x) => key::KeyCode::F(x),
        cevent::KeyCode::Char(c) => key::KeyCode::Char(c),
        cevent::KeyCode::Esc => key::KeyCode::Esc,
        _ => key::KeyCode::Null,
    }
}

/// Translate a crossterm event into an arbor event.
fn translate_event(e: cevent::Event) -> Event {
    match e {
        cevent::Event::Key(k) if k.kind == cevent::KeyEventKind::Release => Event::Ignore,
        cevent::Event::Key(k) if k.code == cevent::KeyCode::BackTab => Event::Key(key::Key::new(
            translate_key_modifiers(k.modifiers).union(key::Mods::SHIFT),
            key::KeyCode::Tab,
        )),
        cevent::Event::Key(k) => Event::Key(key::Key::new(
            translate_key_modifiers(k.modifiers),
            translate_key_code(k.code),
        )),
        cevent::Event::Mouse(m) => {
            let mut button = mouse::Button::None;
            let action = match m.kind {
                cevent::MouseEventKind::Down(b) => {
                    button = translate_button(b);
                    mouse::Action::Down
                }
                cevent::MouseEventKind::Up(b) => {
                    button = translate_button(b);
                    mouse::Action::Up
                }
                cevent::MouseEventKind::Drag(b) => {
                    button = translate_button(b);
                    mouse::Action::Drag
                }
                cevent::MouseEventKind::Moved => mouse::Action::Moved,
                cevent::MouseEventKind::ScrollDown => mouse::Action::ScrollDown,
                cevent::MouseEventKind::ScrollUp => mouse::Action::ScrollUp,
                cevent::MouseEventKind::ScrollLeft => mouse::Action::ScrollLeft,
                cevent::MouseEventKind::ScrollRight => mouse::Action::ScrollRight,
            };
            Event::Mouse(mouse::MouseEvent {
                button,
                action,
                location: Point {
                    x: m.column.into(),
                    y: m.row.into(),
                },
                modifiers: translate_key_modifiers(m.modifiers),
            })
        }
        cevent::Event::Resize(x, y) => Event::Resize(Expanse::new(x.into(), y.into())),
        cevent::Event::FocusGained | cevent::Event::FocusLost | cevent::Event::Paste(_) => {
            Event::Ignore
        }
    }
}

/// Options for the crossterm backend.
#[derive(Debug, Clone, Copy)]
pub struct CrosstermOptions {
    /// Install a panic hook that restores the terminal before printing a backtrace.
    pub install_panic_hook: bool,
    /// Capture mouse input.
    pub mouse: bool,
}

impl Default for CrosstermOptions {
    fn default() -> Self {
        Self {
            install_panic_hook: true,
            mouse: true,
        }
    }
}

/// A backend drawing to stderr through crossterm, in the alternate screen.
pub struct CrosstermBackend {
    /// Stderr handle used for all output.
    fp: Stderr,
    /// The last presented frame, for diffing.
    prev: Option<TermBuf>,
    /// Options.
    options: CrosstermOptions,
    /// The panic hook in place before setup.
    previous_hook: Option<PanicHook>,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new(CrosstermOptions::default())
    }
}

impl CrosstermBackend {
    /// A backend with the given options.
    pub fn new(options: CrosstermOptions) -> Self {
        Self {
            fp: io::stderr(),
            prev: None,
            options,
            previous_hook: None,
        }
    }

    /// Enter alternate screen and raw mode.
    fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.fp.execute(terminal::EnterAlternateScreen)?;
        if self.options.mouse {
            self.fp.execute(cevent::EnableMouseCapture)?;
        }
        self.fp.execute(ccursor::Hide)?;
        Ok(())
    }

    /// Leave alternate screen and restore terminal state.
    fn exit(&mut self) -> io::Result<()> {
        self.fp.execute(terminal::LeaveAlternateScreen)?;
        if self.options.mouse {
            self.fp.execute(cevent::DisableMouseCapture)?;
        }
        self.fp.execute(ccursor::Show)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Apply a style to subsequent output.
    fn apply_style(&mut self, s: &Style) -> io::Result<()> {
        // Reset clears everything, so colors are set after it.
        self.fp
            .queue(style::SetAttribute(style::Attribute::Reset))?;
        self.fp
            .queue(style::SetForegroundColor(translate_color(s.fg)))?;
        self.fp
            .queue(style::SetBackgroundColor(translate_color(s.bg)))?;

        if s.attrs.bold {
            self.fp.queue(style::SetAttribute(style::Attribute::Bold))?;
        }
        if s.attrs.crossedout {
            self.fp
                .queue(style::SetAttribute(style::Attribute::CrossedOut))?;
        }
        if s.attrs.dim {
            self.fp.queue(style::SetAttribute(style::Attribute::Dim))?;
        }
        if s.attrs.italic {
            self.fp
                .queue(style::SetAttribute(style::Attribute::Italic))?;
        }
        if s.attrs.reverse {
            self.fp
                .queue(style::SetAttribute(style::Attribute::Reverse))?;
        }
        if s.attrs.underline {
            self.fp
                .queue(style::SetAttribute(style::Attribute::Underlined))?;
        }
        Ok(())
    }

    /// Write text at a position.
    fn write_text(&mut self, loc: Point, txt: &str) -> io::Result<()> {
        self.fp.queue(ccursor::MoveTo(loc.x as u16, loc.y as u16))?;
        self.fp.queue(style::Print(txt))?;
        Ok(())
    }

    /// Replace the panic hook with one that restores the terminal first.
    fn install_panic_hook(&mut self) {
        let mouse = self.options.mouse;
        self.previous_hook = Some(panic::take_hook());
        panic::set_hook(Box::new(move |pi| {
            let mut stderr = io::stderr();
            drop(crossterm::execute!(stderr, terminal::LeaveAlternateScreen, ccursor::Show));
            if mouse {
                drop(crossterm::execute!(stderr, cevent::DisableMouseCapture));
            }
            drop(terminal::disable_raw_mode());
            drop(BacktracePrinter::new().print_panic_info(pi, &mut default_output_stream()));
        }));
    }
}

impl RenderBackend for CrosstermBackend {
    fn style(&mut self, s: &Style) -> Result<()> {
        translate_result(self.apply_style(s))
    }

    fn text(&mut self, loc: Point, txt: &str) -> Result<()> {
        translate_result(self.write_text(loc, txt))
    }

    fn flush(&mut self) -> Result<()> {
        translate_result(self.fp.flush())
    }
}

impl Backend for CrosstermBackend {
    fn size(&mut self) -> Result<Expanse> {
        let (w, h) = translate_result(terminal::size())?;
        Ok(Expanse::new(w.into(), h.into()))
    }

    fn setup(&mut self) -> Result<()> {
        if self.options.install_panic_hook {
            self.install_panic_hook();
        }
        self.prev = None;
        translate_result(self.enter())
    }

    fn teardown(&mut self) -> Result<()> {
        if let Some(hook) = self.previous_hook.take() {
            panic::set_hook(hook);
        }
        self.prev = None;
        translate_result(self.exit())
    }

    fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if !translate_result(cevent::poll(timeout))? {
            return Ok(None);
        }
        match cevent::read() {
            Ok(e) => Ok(Some(translate_event(e))),
            Err(e) => {
                tracing::error!("crossterm event read error: {e}");
                Err(Error::Backend(e.to_string()))
            }
        }
    }

    fn present(&mut self, grid: &TermBuf) -> Result<()> {
        let prev = self.prev.take();
        match &prev {
            Some(p) => grid.diff(p, self)?,
            None => grid.render(self)?,
        }
        self.prev = Some(grid.clone());
        Ok(())
    }
}
