//! Views and the combinator engine.
//!
//! A [`View`] is an immutable description of a node: how big it wants to be,
//! how it draws itself and how it reacts to events. Views are rebuilt from
//! the model every frame, so they hold no state. Nodes that need continuity
//! (scroll offsets, animation frames, press highlights) keep it in the
//! buffer's store under their key path.
//!
//! Every frame follows the same protocol:
//!
//! 1. Parents call `measure` on children top-down as they need it.
//! 2. Parents compute each child's [`Viewport`] and call `render`.
//! 3. Events are delivered with the same key scopes as rendering. Each node
//!    returns an [`Outcome`]: messages for the program and the events it
//!    forwards. An event that is not forwarded is consumed.
//!
//! List combinators deliver events in reverse render order, so the last
//! rendered (topmost) child gets first refusal. Mouse claims are
//! first-come, so combinators that claim a region do so after rendering
//! their children unless documented otherwise.

use std::{fmt, mem, time::Duration};

use self::handlers::Trigger;
use crate::{
    buffer::{Buffer, Viewport},
    error::Result,
    event::{Event, key::Key},
    geom::Expanse,
    key::ViewKey,
    layout::{Align, DesiredSize, Dimension, Edges},
};

/// Bordered container.
mod boxed;
/// Wrapping flow layout.
mod flow;
/// Row and column grid.
mod grid;
/// Event handler wrappers.
mod handlers;
/// Size, padding, alignment and mapping modifiers.
mod modifiers;
/// Scrolling viewport.
mod scroll;
/// Cyclic-frame animation.
mod spinner;
/// Row and column stacks.
mod stack;
/// Leaf nodes.
mod text;
/// Floating window.
mod window;
/// Overlays.
mod zstack;

pub use self::{
    boxed::{BoxGlyphs, Boxed, DOUBLE, ROUND, SINGLE, SINGLE_THICK, boxed},
    flow::{Flow, flow},
    grid::{Grid, grid},
    handlers::{OnClick, OnEvent, OnKey},
    modifiers::{Aligned, Flexed, Mapped, MinMax, Padded, SizeHint},
    scroll::{Scroll, scroll},
    spinner::{Spinner, spinner},
    stack::{Stack, column, row},
    text::{Fill, Space, Text, fill, space, text},
    window::{Window, window},
    zstack::{ZStack, zstack},
};

/// The behaviour of a node in a view tree.
pub trait Node<M> {
    /// The node's natural size within `available`. Must not exceed it.
    fn measure(&self, available: Expanse) -> Expanse;

    /// Declarative size hints, resolved by the parent at render time.
    fn desired(&self) -> DesiredSize {
        DesiredSize::default()
    }

    /// Weight for a share of leftover space in list combinators.
    fn flex(&self) -> Option<u32> {
        None
    }

    /// Draw into the buffer. Coordinates are local to `vp`, which is already
    /// active on the buffer.
    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()>;

    /// React to an event. The default forwards it unchanged.
    fn handle_event(&self, event: &Event, _buf: &mut Buffer) -> Outcome<M> {
        Outcome::pass(event.clone())
    }
}

/// The result of delivering an event to a node: messages for the program,
/// and the events the node forwards. An empty event list means the event
/// was consumed.
#[derive(Debug)]
pub struct Outcome<M> {
    /// Messages produced.
    pub messages: Vec<M>,
    /// Events forwarded to the next receiver.
    pub events: Vec<Event>,
}

impl<M> Default for Outcome<M> {
    fn default() -> Self {
        Self {
            messages: vec![],
            events: vec![],
        }
    }
}

impl<M> Outcome<M> {
    /// Forward an event unchanged.
    pub fn pass(event: Event) -> Self {
        Self {
            messages: vec![],
            events: vec![event],
        }
    }

    /// Consume the event.
    pub fn consume() -> Self {
        Self::default()
    }

    /// Consume the event and emit a message.
    pub fn emit(message: M) -> Self {
        Self {
            messages: vec![message],
            events: vec![],
        }
    }

    /// Add a message.
    pub fn with_message(mut self, message: M) -> Self {
        self.messages.push(message);
        self
    }

    /// Forward an additional event.
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Ask the runtime to re-render without rebuilding the view.
    pub fn redraw(self) -> Self {
        if self.events.iter().any(Event::is_redraw) {
            self
        } else {
            self.with_event(Event::Redraw)
        }
    }

    /// Was the original event consumed? Redraw requests do not count as
    /// forwarding.
    pub fn is_consumed(&self) -> bool {
        self.events.iter().all(Event::is_redraw)
    }

    /// Append another outcome's messages and events.
    pub fn extend(&mut self, other: Self) {
        self.messages.extend(other.messages);
        self.events.extend(other.events);
    }

    /// Convert the messages.
    pub fn map<N>(self, f: impl Fn(M) -> N) -> Outcome<N> {
        Outcome {
            messages: self.messages.into_iter().map(f).collect(),
            events: self.events,
        }
    }
}

/// A node in a view tree, with its key and an optional debug label.
pub struct View<M> {
    /// The node.
    node: Box<dyn Node<M>>,
    /// The node's key.
    key: ViewKey,
    /// Debug label.
    label: Option<String>,
}

impl<M: 'static> View<M> {
    /// Wrap a node.
    pub fn new(node: impl Node<M> + 'static) -> Self {
        Self {
            node: Box::new(node),
            key: ViewKey::None,
            label: None,
        }
    }

    /// The view's key.
    pub fn view_key(&self) -> &ViewKey {
        &self.key
    }

    /// The view's debug label.
    pub fn debug_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Natural size within `available`, clamped to it.
    pub fn measure(&self, available: Expanse) -> Expanse {
        self.node.measure(available).min(available)
    }

    /// Size hints.
    pub fn desired(&self) -> DesiredSize {
        self.node.desired()
    }

    /// Flex weight.
    pub fn flex_weight(&self) -> Option<u32> {
        self.node.flex()
    }

    /// Render into a viewport under this view's key.
    pub fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        self.render_keyed(&ViewKey::None, vp, buf)
    }

    /// Render as the root of a frame, filling the screen.
    pub fn render_root(&self, buf: &mut Buffer) -> Result<()> {
        self.render(Viewport::screen(buf.size()), buf)
    }

    /// Render under this view's key, or `fallback` if the view has none.
    pub fn render_keyed(&self, fallback: &ViewKey, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let key = self.scope_key(fallback);
        buf.scope(key, |b| b.push(vp, |b| self.node.render(vp, b)))
    }

    /// Deliver an event under this view's key.
    pub fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        self.handle_event_keyed(&ViewKey::None, event, buf)
    }

    /// Deliver an event under this view's key, or `fallback` if the view has
    /// none.
    pub fn handle_event_keyed(
        &self,
        fallback: &ViewKey,
        event: &Event,
        buf: &mut Buffer,
    ) -> Outcome<M> {
        let key = self.scope_key(fallback);
        buf.scope(key, |b| self.node.handle_event(event, b))
    }

    /// The key this view renders under.
    fn scope_key<'a>(&'a self, fallback: &'a ViewKey) -> &'a ViewKey {
        if self.key.is_none() {
            fallback
        } else {
            &self.key
        }
    }

    /// Give the view a named key, stable under reordering of its siblings.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = ViewKey::Key(key.into());
        self
    }

    /// Give the view a global identifier. Its state follows it anywhere in
    /// the tree.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.key = ViewKey::Id(id.into());
        self
    }

    /// Attach a debug label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Wrap this view in another node. The wrapper takes over the key and
    /// label, so they survive further chaining.
    pub(crate) fn wrap<N: Node<M> + 'static>(mut self, f: impl FnOnce(Self) -> N) -> Self {
        let key = mem::take(&mut self.key);
        let label = self.label.take();
        Self {
            node: Box::new(f(self)),
            key,
            label,
        }
    }

    /// Set the width hint.
    pub fn width(self, width: impl Into<Dimension>) -> Self {
        let hints = DesiredSize {
            width: Some(width.into()),
            height: None,
        };
        self.wrap(|v| SizeHint::new(v, hints))
    }

    /// Set the height hint.
    pub fn height(self, height: impl Into<Dimension>) -> Self {
        let hints = DesiredSize {
            width: None,
            height: Some(height.into()),
        };
        self.wrap(|v| SizeHint::new(v, hints))
    }

    /// Set both size hints.
    pub fn size(self, width: impl Into<Dimension>, height: impl Into<Dimension>) -> Self {
        let hints = DesiredSize {
            width: Some(width.into()),
            height: Some(height.into()),
        };
        self.wrap(|v| SizeHint::new(v, hints))
    }

    /// Never measure smaller than `min`, space permitting.
    pub fn min_size(self, min: Expanse) -> Self {
        self.wrap(|v| MinMax::new(v, Some(min), None))
    }

    /// Never measure or render larger than `max`.
    pub fn max_size(self, max: Expanse) -> Self {
        self.wrap(|v| MinMax::new(v, None, Some(max)))
    }

    /// Inset the view.
    pub fn padding(self, edges: impl Into<Edges>) -> Self {
        let edges = edges.into();
        self.wrap(|v| Padded::new(v, edges))
    }

    /// Take a weighted share of leftover space in a stack.
    pub fn flex(self, weight: u32) -> Self {
        self.wrap(|v| Flexed::new(v, weight))
    }

    /// Take all offered space and place the view within it.
    pub fn align(self, h: Align, v: Align) -> Self {
        self.wrap(|inner| Aligned::new(inner, h, v))
    }

    /// Center the view in the offered space.
    pub fn center(self) -> Self {
        self.align(Align::Center, Align::Center)
    }

    /// Emit `msg` when `key` is pressed.
    pub fn on_key(self, key: impl Into<Key>, msg: M) -> Self
    where
        M: Clone,
    {
        let key = key.into();
        self.wrap(|v| OnKey::new(v, key, msg))
    }

    /// Map key presses to messages. Keys that produce a message are consumed.
    pub fn on_keys(self, f: impl Fn(Key) -> Option<M> + 'static) -> Self {
        self.wrap(|v| {
            OnEvent::new(
                v,
                move |e| match e {
                    Event::Key(k) => f(*k),
                    _ => None,
                },
                true,
            )
        })
    }

    /// Emit `msg` when the view is clicked: pressed and released over it.
    pub fn on_click(self, msg: M) -> Self
    where
        M: Clone,
    {
        self.wrap(|v| OnClick::new(v, msg, Trigger::Release))
    }

    /// Emit `msg` as soon as the left button goes down over the view.
    pub fn on_press(self, msg: M) -> Self
    where
        M: Clone,
    {
        self.wrap(|v| OnClick::new(v, msg, Trigger::Press))
    }

    /// Emit a message on every tick. The tick is forwarded.
    pub fn on_tick(self, f: impl Fn(Duration) -> M + 'static) -> Self {
        self.wrap(|v| {
            OnEvent::new(
                v,
                move |e| match e {
                    Event::Tick(dt) => Some(f(*dt)),
                    _ => None,
                },
                false,
            )
        })
    }

    /// Emit a message when the terminal is resized. The event is forwarded.
    pub fn on_resize(self, f: impl Fn(Expanse) -> M + 'static) -> Self {
        self.wrap(|v| {
            OnEvent::new(
                v,
                move |e| match e {
                    Event::Resize(size) => Some(f(*size)),
                    _ => None,
                },
                false,
            )
        })
    }

    /// Emit a message for each captured log line. The event is forwarded.
    pub fn on_log(self, f: impl Fn(&str) -> M + 'static) -> Self {
        self.wrap(|v| {
            OnEvent::new(
                v,
                move |e| match e {
                    Event::Log(line) => Some(f(line)),
                    _ => None,
                },
                false,
            )
        })
    }

    /// Map any event the view forwards to a message. Events that produce a
    /// message are consumed.
    pub fn on_event(self, f: impl Fn(&Event) -> Option<M> + 'static) -> Self {
        self.wrap(|v| OnEvent::new(v, f, true))
    }

    /// Convert this view's messages.
    pub fn map<N: 'static>(mut self, f: impl Fn(M) -> N + 'static) -> View<N> {
        let key = mem::take(&mut self.key);
        let label = self.label.take();
        View {
            node: Box::new(Mapped::new(self, f)),
            key,
            label,
        }
    }
}

impl<M> fmt::Debug for View<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("key", &self.key)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Deliver an event to a list of keyed children, last child first. Events a
/// child forwards go to the next child; delivery stops once nothing is
/// forwarded. Redraw requests are collected, not passed along.
pub(crate) fn deliver<'a, M: 'static>(
    children: impl DoubleEndedIterator<Item = (ViewKey, &'a View<M>)>,
    event: &Event,
    buf: &mut Buffer,
) -> Outcome<M> {
    let mut out = Outcome::pass(event.clone());
    let mut redraw = false;
    for (key, child) in children.rev() {
        for e in mem::take(&mut out.events) {
            let mut res = child.handle_event_keyed(&key, &e, buf);
            redraw |= res.events.iter().any(Event::is_redraw);
            res.events.retain(|e| !e.is_redraw());
            out.extend(res);
        }
        if out.events.is_empty() {
            break;
        }
    }
    if redraw { out.redraw() } else { out }
}

/// Children of a list combinator paired with their fallback index keys.
pub(crate) fn indexed<M>(
    children: &[View<M>],
) -> impl DoubleEndedIterator<Item = (ViewKey, &View<M>)> {
    children
        .iter()
        .enumerate()
        .map(|(i, c)| (ViewKey::Index(i), c))
}
