use super::key::Mods;
use crate::geom::Point;

/// A mouse button. Events that carry no button (motion, wheel) use `None`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Button {
    /// Left button.
    Left,
    /// Right button.
    Right,
    /// Middle button.
    Middle,
    /// No button.
    None,
}

/// A mouse action.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Action {
    /// Button pressed.
    Down,
    /// Button released.
    Up,
    /// Motion with a button held.
    Drag,
    /// Motion with no button held.
    Moved,
    /// Wheel down.
    ScrollDown,
    /// Wheel up.
    ScrollUp,
    /// Wheel left.
    ScrollLeft,
    /// Wheel right.
    ScrollRight,
}

impl Action {
    /// Is this a wheel action?
    pub fn is_scroll(&self) -> bool {
        matches!(
            self,
            Self::ScrollDown | Self::ScrollUp | Self::ScrollLeft | Self::ScrollRight
        )
    }
}

/// A mouse event at an absolute screen location.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MouseEvent {
    /// The action.
    pub action: Action,
    /// The button involved.
    pub button: Button,
    /// Modifier state.
    pub modifiers: Mods,
    /// Absolute screen location.
    pub location: Point,
}

impl MouseEvent {
    /// Construct an unmodified mouse event.
    pub fn new(action: Action, button: Button, location: impl Into<Point>) -> Self {
        Self {
            action,
            button,
            modifiers: Mods::default(),
            location: location.into(),
        }
    }

    /// A left-button press.
    pub fn down(location: impl Into<Point>) -> Self {
        Self::new(Action::Down, Button::Left, location)
    }

    /// A left-button release.
    pub fn up(location: impl Into<Point>) -> Self {
        Self::new(Action::Up, Button::Left, location)
    }

    /// A left-button drag.
    pub fn drag(location: impl Into<Point>) -> Self {
        Self::new(Action::Drag, Button::Left, location)
    }

    /// A wheel action.
    pub fn wheel(action: Action, location: impl Into<Point>) -> Self {
        Self::new(action, Button::None, location)
    }
}
