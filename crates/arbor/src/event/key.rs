//! Keystrokes and the modifiers held with them.

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
}

impl Mods {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    /// Shift alone.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    /// Control alone.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
    /// Alt alone.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// Modifiers held in either set.
    pub fn union(self, other: Self) -> Self {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
        }
    }
}

/// Logical key codes.
#[derive(Debug, PartialEq, Hash, Eq, Clone, Copy)]
pub enum KeyCode {
    /// Backspace.
    Backspace,
    /// Enter or return.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Tab. Shift-tab arrives as this with the shift modifier.
    Tab,
    /// Delete.
    Delete,
    /// Escape.
    Esc,
    /// A function key: `F(1)` is F1.
    F(u8),
    /// A character.
    Char(char),
    /// A key with no name here.
    Null,
}

/// A keystroke along with modifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Modifier state.
    pub mods: Mods,
    /// Key code.
    pub key: KeyCode,
}

impl Key {
    /// A key with the given modifiers.
    pub fn new(mods: Mods, key: impl Into<KeyCode>) -> Self {
        Self {
            mods,
            key: key.into(),
        }
    }

    /// A control-modified character, e.g. `Key::ctrl('c')`.
    pub fn ctrl(c: char) -> Self {
        Self::new(Mods::CTRL, c)
    }

    /// The form used to compare against bindings. Terminals report a
    /// shifted letter as shift plus the letter, while bindings name the
    /// uppercase letter alone. Shift is dropped from characters and the
    /// character is uppercased; enter and space keep their shift.
    pub fn normalize(&self) -> Self {
        match self.key {
            KeyCode::Char(c) if self.mods.shift && c != ' ' => Self {
                mods: Mods {
                    shift: false,
                    ..self.mods
                },
                key: KeyCode::Char(c.to_ascii_uppercase()),
            },
            _ => *self,
        }
    }

    /// Does this key match a binding after normalizing both sides?
    pub fn matches(&self, binding: &Self) -> bool {
        self.normalize() == binding.normalize()
    }
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::new(Mods::NONE, c)
    }
}

impl From<KeyCode> for Key {
    fn from(c: KeyCode) -> Self {
        Self::new(Mods::NONE, c)
    }
}
