//! Keyboard input channel and the viewer's key map

use crate::hub::EventHub;
use crate::viewer::Direction;

/// A key as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Escape.
    Escape,
    /// Space bar.
    Space,
    /// Any printable character.
    Char(char),
}

impl Key {
    /// Parse a DOM-style key name (`ArrowRight`, `Escape`, `a`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Escape" | "Esc" => Key::Escape,
            " " | "Space" => Key::Space,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Key-down event delivered on the global keyboard channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key pressed.
    pub key: Key,
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self { key }
    }
}

/// Global keyboard channel shared by everything mounted in a window.
pub type KeyboardHub = EventHub<KeyEvent>;

/// The two directional keys a viewer reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    /// Key mapped to `Direction::Next`.
    pub next: Key,
    /// Key mapped to `Direction::Previous`.
    pub previous: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next: Key::ArrowRight,
            previous: Key::ArrowLeft,
        }
    }
}

impl KeyBindings {
    /// Direction bound to `key`, if any.
    pub fn direction(&self, key: Key) -> Option<Direction> {
        if key == self.next {
            Some(Direction::Next)
        } else if key == self.previous {
            Some(Direction::Previous)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.direction(Key::ArrowRight), Some(Direction::Next));
        assert_eq!(bindings.direction(Key::ArrowLeft), Some(Direction::Previous));
        assert_eq!(bindings.direction(Key::ArrowUp), None);
        assert_eq!(bindings.direction(Key::Char('n')), None);
    }

    #[test]
    fn test_custom_bindings() {
        let bindings = KeyBindings {
            next: Key::Char('j'),
            previous: Key::Char('k'),
        };
        assert_eq!(bindings.direction(Key::Char('j')), Some(Direction::Next));
        assert_eq!(bindings.direction(Key::ArrowRight), None);
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("ArrowRight"), Some(Key::ArrowRight));
        assert_eq!(Key::from_name("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_name("q"), Some(Key::Char('q')));
        assert_eq!(Key::from_name("Shift"), None);
    }
}
