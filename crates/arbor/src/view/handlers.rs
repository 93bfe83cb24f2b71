//! Event handler wrappers. The wrapped view always sees an event first; a
//! handler only reacts to what the wrapped view forwards.

use super::{Node, Outcome, View};
use crate::{
    buffer::{Buffer, Viewport},
    error::Result,
    event::{
        Event,
        key::Key,
        mouse::{Action, Button, MouseEvent},
    },
    geom::Expanse,
    key::ViewKey,
    layout::DesiredSize,
    style::Attr,
};

/// Name under which click handlers scope their claim and pressed state.
const CLICK_SCOPE: &str = "OnClick";

/// Run the wrapped view, then offer each forwarded event to `f`. Events `f`
/// does not take are forwarded on.
fn after_inner<M: 'static>(
    inner: &View<M>,
    event: &Event,
    buf: &mut Buffer,
    mut f: impl FnMut(&Event, &mut Buffer, &mut Outcome<M>) -> bool,
) -> Outcome<M> {
    let first = inner.handle_event(event, buf);
    let mut out = Outcome {
        messages: first.messages,
        events: vec![],
    };
    for e in first.events {
        if !f(&e, buf, &mut out) {
            out.events.push(e);
        }
    }
    out
}

/// Emits a message when a key binding is pressed, consuming the key.
pub struct OnKey<M> {
    /// Wrapped view.
    inner: View<M>,
    /// The binding, matched after normalization.
    binding: Key,
    /// Message to emit.
    msg: M,
}

impl<M> OnKey<M> {
    /// Bind `binding` to `msg` on `inner`.
    pub fn new(inner: View<M>, binding: Key, msg: M) -> Self {
        Self {
            inner,
            binding,
            msg,
        }
    }
}

impl<M: Clone + 'static> Node<M> for OnKey<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        self.inner.measure(available)
    }

    fn desired(&self) -> DesiredSize {
        self.inner.desired()
    }

    fn flex(&self) -> Option<u32> {
        self.inner.flex_weight()
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        self.inner.render(vp, buf)
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        after_inner(&self.inner, event, buf, |e, _, out| match e {
            Event::Key(k) if k.matches(&self.binding) => {
                out.messages.push(self.msg.clone());
                true
            }
            _ => false,
        })
    }
}

/// A general event hook. `f` may produce a message for any event the
/// wrapped view forwards. When `consume` is set an event that produced a
/// message stops here; otherwise it is forwarded as well.
pub struct OnEvent<M> {
    /// Wrapped view.
    inner: View<M>,
    /// The hook.
    f: Box<dyn Fn(&Event) -> Option<M>>,
    /// Consume events that produce a message?
    consume: bool,
}

impl<M> OnEvent<M> {
    /// Hook `f` onto `inner`.
    pub fn new(inner: View<M>, f: impl Fn(&Event) -> Option<M> + 'static, consume: bool) -> Self {
        Self {
            inner,
            f: Box::new(f),
            consume,
        }
    }
}

impl<M: 'static> Node<M> for OnEvent<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        self.inner.measure(available)
    }

    fn desired(&self) -> DesiredSize {
        self.inner.desired()
    }

    fn flex(&self) -> Option<u32> {
        self.inner.flex_weight()
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        self.inner.render(vp, buf)
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        after_inner(&self.inner, event, buf, |e, _, out| match (self.f)(e) {
            Some(m) => {
                out.messages.push(m);
                self.consume
            }
            None => false,
        })
    }
}

/// When a click handler fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    /// On button release over the region, after a press there.
    Release,
    /// On button press.
    Press,
}

/// Makes the wrapped view's area clickable with the left button. The region
/// is shown in reverse video while pressed.
///
/// The claim is made after the wrapped view renders, so clickable children
/// inside it take priority.
pub struct OnClick<M> {
    /// Wrapped view.
    inner: View<M>,
    /// Message to emit.
    msg: M,
    /// When to emit.
    trigger: Trigger,
}

impl<M> OnClick<M> {
    /// Make `inner` clickable.
    pub(crate) fn new(inner: View<M>, msg: M, trigger: Trigger) -> Self {
        Self {
            inner,
            msg,
            trigger,
        }
    }

    /// React to a mouse event addressed to this handler's scope. Returns
    /// whether the event was taken.
    fn mouse(&self, m: &MouseEvent, buf: &mut Buffer, out: &mut Outcome<M>) -> bool
    where
        M: Clone,
    {
        let key = buf.key();
        let owned = m.button == Button::Left && buf.check_mouse(&key, m);
        let pressed = buf.retrieve::<bool>().unwrap_or(false);
        match m.action {
            Action::Down if owned => {
                buf.store(true);
                if self.trigger == Trigger::Press {
                    out.messages.push(self.msg.clone());
                }
                push_redraw(out);
                true
            }
            Action::Drag if pressed => true,
            Action::Up if pressed => {
                buf.store(false);
                if owned && self.trigger == Trigger::Release {
                    out.messages.push(self.msg.clone());
                }
                push_redraw(out);
                owned
            }
            _ => false,
        }
    }
}

/// Request a redraw once.
fn push_redraw<M>(out: &mut Outcome<M>) {
    if !out.events.iter().any(Event::is_redraw) {
        out.events.push(Event::Redraw);
    }
}

impl<M: Clone + 'static> Node<M> for OnClick<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        self.inner.measure(available)
    }

    fn desired(&self) -> DesiredSize {
        self.inner.desired()
    }

    fn flex(&self) -> Option<u32> {
        self.inner.flex_weight()
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let mask = buf.mask();
        self.inner.render(vp, buf)?;
        buf.scope(&ViewKey::name(CLICK_SCOPE), |b| {
            let key = b.key();
            b.claim_mouse(&key, vp.local(), mask, &[Button::Left]);
            if b.retrieve::<bool>().unwrap_or(false) {
                b.store(true);
                b.restyle(vp.local(), mask, |s| *s = s.with_attr(Attr::Reverse));
            }
        });
        Ok(())
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        after_inner(&self.inner, event, buf, |e, buf, out| match e {
            Event::Mouse(m) => buf.scope(&ViewKey::name(CLICK_SCOPE), |b| self.mouse(m, b, out)),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        buf,
        geom::Point,
        style::Style,
        testing::BufTest,
        view::{text, zstack},
    };

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Msg {
        Inc,
        Inner,
        Clicked(&'static str),
        Tick(Duration),
    }

    fn frame(view: &View<Msg>, prev: Buffer) -> Buffer {
        let mut b = prev.next_frame(Expanse::new(6, 2));
        view.render_root(&mut b).unwrap();
        b
    }

    #[test]
    fn key_binding_consumes() {
        let v = text("x").on_key('+', Msg::Inc);
        let mut b = frame(&v, Buffer::new(Expanse::new(6, 2)));

        let out = v.handle_event(&Event::Key(Key::from('+')), &mut b);
        assert_eq!(out.messages, vec![Msg::Inc]);
        assert!(out.is_consumed());

        let out = v.handle_event(&Event::Key(Key::from('-')), &mut b);
        assert!(out.messages.is_empty());
        assert_eq!(out.events, vec![Event::Key(Key::from('-'))]);
    }

    #[test]
    fn inner_binding_wins() {
        let v = text("x").on_key('a', Msg::Inner).on_key('a', Msg::Inc);
        let mut b = frame(&v, Buffer::new(Expanse::new(6, 2)));
        let out = v.handle_event(&Event::Key(Key::from('a')), &mut b);
        assert_eq!(out.messages, vec![Msg::Inner]);
    }

    #[test]
    fn tick_hook_passes_through() {
        let v = text("x").on_tick(Msg::Tick);
        let mut b = frame(&v, Buffer::new(Expanse::new(6, 2)));
        let t = Event::Tick(Duration::from_millis(5));
        let out = v.handle_event(&t, &mut b);
        assert_eq!(out.messages, vec![Msg::Tick(Duration::from_millis(5))]);
        assert_eq!(out.events, vec![t]);
    }

    #[test]
    fn click_fires_on_release_and_highlights() {
        let v = text("ok").on_click(Msg::Clicked("ok"));
        let mut b = frame(&v, Buffer::new(Expanse::new(6, 2)));

        let out = v.handle_event(&MouseEvent::down(Point::new(1, 0)).into(), &mut b);
        assert!(out.messages.is_empty());
        assert_eq!(out.events, vec![Event::Redraw]);

        let mut b = frame(&v, b);
        let style = BufTest::new(b.grid()).style_of("ok").unwrap();
        assert!(style.attrs.reverse);

        let out = v.handle_event(&MouseEvent::up(Point::new(1, 0)).into(), &mut b);
        assert_eq!(out.messages, vec![Msg::Clicked("ok")]);

        let b = frame(&v, b);
        assert_eq!(BufTest::new(b.grid()).style_of("ok"), Some(Style::default()));
    }

    #[test]
    fn release_elsewhere_cancels() {
        let v = text("ok").on_click(Msg::Inc).max_size(Expanse::new(2, 1));
        let mut b = frame(&v, Buffer::new(Expanse::new(6, 2)));
        v.handle_event(&MouseEvent::down(Point::new(0, 0)).into(), &mut b);
        let out = v.handle_event(&MouseEvent::up(Point::new(0, 1)).into(), &mut b);
        assert!(out.messages.is_empty());
    }

    #[test]
    fn press_fires_on_down() {
        let v = text("go").on_press(Msg::Inc);
        let mut b = frame(&v, Buffer::new(Expanse::new(6, 2)));
        let out = v.handle_event(&MouseEvent::down(Point::new(0, 0)).into(), &mut b);
        assert_eq!(out.messages, vec![Msg::Inc]);
    }

    #[test]
    fn top_layer_wins_click() {
        let v = zstack(vec![
            text("bottom").on_click(Msg::Clicked("bottom")),
            text("top").on_click(Msg::Clicked("top")),
        ]);
        let mut b = frame(&v, Buffer::new(Expanse::new(6, 2)));
        BufTest::new(b.grid()).assert_matches(buf!["toptom" "XXXXXX"]);
        v.handle_event(&MouseEvent::down(Point::new(1, 0)).into(), &mut b);
        let out = v.handle_event(&MouseEvent::up(Point::new(1, 0)).into(), &mut b);
        assert_eq!(out.messages, vec![Msg::Clicked("top")]);
    }
}
