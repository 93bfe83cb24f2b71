use super::{Node, Outcome, View};
use crate::{
    buffer::{Buffer, Viewport},
    error::Result,
    event::{
        Event,
        mouse::{Action, Button, MouseEvent},
    },
    geom::{Expanse, Frame, Point, PointI32, Rect},
    key::ViewKey,
    style::Style,
    text,
    view::{DOUBLE, SINGLE},
};

/// Scope name for window state.
const SCOPE: &str = "Window";

/// Scope name for the title bar claim, under the window scope.
const TITLE: &str = "Title";

/// Window position and drag tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    /// Top-left corner, local to the window's area.
    pos: PointI32,
    /// Screen location of the last drag step, while dragging.
    drag: Option<Point>,
}

/// A floating, titled box at a stored position within its area. Dragging
/// the title bar with the left button moves it. Takes all offered space;
/// mouse presses on the window body stop at the window, so overlays placed
/// over other views shield them.
pub struct Window<M> {
    /// Content.
    content: View<M>,
    /// Title.
    title: String,
    /// Outer size, including the border.
    size: Expanse,
    /// Position before the first drag.
    initial: Point,
    /// Border style.
    style: Style,
}

impl<M: 'static> Window<M> {
    /// A window of `size` around `content`.
    pub fn new(title: impl Into<String>, size: Expanse, content: View<M>) -> Self {
        Self {
            content,
            title: title.into(),
            size,
            initial: Point::zero(),
            style: Style::default(),
        }
    }

    /// Set the position before the window is first dragged.
    pub fn at(mut self, pos: Point) -> Self {
        self.initial = pos;
        self
    }

    /// Set the border style.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// React to a mouse event within the window scope.
    fn mouse(m: &MouseEvent, buf: &mut Buffer, out: &mut Outcome<M>) -> bool {
        let body = buf.key();
        let title = body.append(&ViewKey::name(TITLE));
        let Some(mut place) = buf.retrieve::<Placement>() else {
            return false;
        };
        match (m.action, place.drag) {
            (Action::Down, _) if m.button == Button::Left && buf.check_mouse(&title, m) => {
                place.drag = Some(m.location);
            }
            (Action::Drag, Some(last)) => {
                place.pos = place.pos + PointI32::from(m.location) - PointI32::from(last);
                place.drag = Some(m.location);
            }
            (Action::Up, Some(_)) => place.drag = None,
            _ => return buf.check_mouse(&body, m),
        }
        buf.store(place);
        if !out.events.iter().any(Event::is_redraw) {
            out.events.push(Event::Redraw);
        }
        true
    }
}

impl<M: 'static> Node<M> for Window<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        available
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let area = vp.size();
        let size = self.size.min(area);
        let mask = buf.mask();
        let mut place = buf
            .scope(&ViewKey::name(SCOPE), |b| b.retrieve::<Placement>())
            .unwrap_or(Placement {
                pos: PointI32::from(self.initial),
                drag: None,
            });
        let max_x = i64::from(area.w - size.w);
        let max_y = i64::from(area.h - size.h);
        let x = i64::from(place.pos.x).clamp(0, max_x) as u32;
        let y = i64::from(place.pos.y).clamp(0, max_y) as u32;
        place.pos = PointI32::from(Point::new(x, y));

        let outer = Rect::new(x, y, size.w, size.h);
        let wvp = vp.child(outer);
        let frame = Frame::new(wvp.local(), 1);
        let inner = frame.inner();
        buf.push(wvp, |b| b.fill(inner, ' ', Style::default()));
        if !inner.is_zero() {
            self.content.render(wvp.child(inner), buf)?;
        }

        buf.scope(&ViewKey::name(SCOPE), |b| {
            b.push(wvp, |b| {
                let body = b.key();
                let title = body.append(&ViewKey::name(TITLE));
                b.claim_mouse(&title, frame.top, mask, &[Button::Left]);
                b.claim_mouse(&body, wvp.local(), mask, &[Button::Left, Button::None]);
                b.store(place);

                let glyphs = if place.drag.is_some() { DOUBLE } else { SINGLE };
                glyphs.draw(b, self.style, frame);
                let room = frame.top.w as usize;
                if room >= 3 {
                    let t = format!(" {} ", text::truncate(&self.title, room - 2));
                    b.text(frame.top.tl, &t, self.style);
                }
            });
        });
        Ok(())
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        let first = self.content.handle_event(event, buf);
        let mut out = Outcome {
            messages: first.messages,
            events: vec![],
        };
        for e in first.events {
            let taken = match &e {
                Event::Mouse(m) => buf.scope(&ViewKey::name(SCOPE), |b| Self::mouse(m, b, &mut out)),
                _ => false,
            };
            if !taken {
                out.events.push(e);
            }
        }
        out
    }
}

impl<M: 'static> From<Window<M>> for View<M> {
    fn from(w: Window<M>) -> Self {
        Self::new(w)
    }
}

/// A draggable window.
pub fn window<M: 'static>(title: impl Into<String>, size: Expanse, content: View<M>) -> View<M> {
    Window::new(title, size, content).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        buf,
        testing::BufTest,
        view::{fill, text, zstack},
    };

    fn frame(view: &View<u8>, prev: Buffer) -> Buffer {
        let mut b = prev.next_frame(Expanse::new(8, 4));
        view.render_root(&mut b).unwrap();
        b
    }

    fn demo() -> View<u8> {
        zstack([
            fill('.', Style::default()).on_click(1),
            window("w", Expanse::new(5, 3), text("ab").on_click(2)),
        ])
    }

    #[test]
    fn draws_over_background() {
        let b = frame(&demo(), Buffer::new(Expanse::new(8, 4)));
        BufTest::new(b.grid()).assert_matches(buf![
            "┌ w ┐..."
            "│ab │..."
            "└───┘..."
            "........"
        ]);
    }

    #[test]
    fn drag_moves_and_clamps() {
        let v = demo();
        let mut b = frame(&v, Buffer::new(Expanse::new(8, 4)));
        let out = v.handle_event(&MouseEvent::down(Point::new(1, 0)).into(), &mut b);
        assert_eq!(out.events, vec![Event::Redraw]);
        v.handle_event(&MouseEvent::drag(Point::new(3, 1)).into(), &mut b);
        v.handle_event(&MouseEvent::up(Point::new(3, 1)).into(), &mut b);
        let mut b = frame(&v, b);
        BufTest::new(b.grid()).assert_matches(buf![
            "........"
            "..┌ w ┐."
            "..│ab │."
            "..└───┘."
        ]);

        v.handle_event(&MouseEvent::down(Point::new(3, 1)).into(), &mut b);
        v.handle_event(&MouseEvent::drag(Point::new(7, 3)).into(), &mut b);
        let b = frame(&v, b);
        BufTest::new(b.grid()).assert_matches(buf![
            "........"
            "...╔ w ╗"
            "...║ab ║"
            "...╚═══╝"
        ]);
    }

    #[test]
    fn body_shields_background() {
        let v = demo();
        let mut b = frame(&v, Buffer::new(Expanse::new(8, 4)));
        let out = v.handle_event(&MouseEvent::down(Point::new(0, 1)).into(), &mut b);
        assert!(out.events.is_empty());
        let out = v.handle_event(&MouseEvent::up(Point::new(0, 1)).into(), &mut b);
        assert!(out.messages.is_empty());

        v.handle_event(&MouseEvent::down(Point::new(1, 1)).into(), &mut b);
        let out = v.handle_event(&MouseEvent::up(Point::new(1, 1)).into(), &mut b);
        assert_eq!(out.messages, vec![2]);

        v.handle_event(&MouseEvent::down(Point::new(6, 3)).into(), &mut b);
        let out = v.handle_event(&MouseEvent::up(Point::new(6, 3)).into(), &mut b);
        assert_eq!(out.messages, vec![1]);
    }
}
