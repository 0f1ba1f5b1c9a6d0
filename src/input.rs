//! Input snapshot consumed by the simulation each tick.

use std::collections::HashSet;

use crossterm::event::KeyCode;

/// The fixed set of keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    A,
    Right,
    D,
    Space,
    W,
    Escape,
}

impl Key {
    /// Map a terminal key code onto the game key set.  Letters are
    /// case-insensitive.
    pub fn from_key_code(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Esc => Some(Key::Escape),
            KeyCode::Char(' ') => Some(Key::Space),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::A),
            KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::D),
            KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::W),
            _ => None,
        }
    }
}

/// Pointer state.  Collected by the host but not read by the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    pub pressed: bool,
}

#[derive(Clone, Debug, Default)]
pub struct InputSnapshot {
    pressed: HashSet<Key>,
    pointer: Pointer,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(keys: &[Key]) -> Self {
        Self {
            pressed: keys.iter().copied().collect(),
            pointer: Pointer::default(),
        }
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn left(&self) -> bool {
        self.is_pressed(Key::Left) || self.is_pressed(Key::A)
    }

    pub fn right(&self) -> bool {
        self.is_pressed(Key::Right) || self.is_pressed(Key::D)
    }

    pub fn fire(&self) -> bool {
        self.is_pressed(Key::Space) || self.is_pressed(Key::W)
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.pointer.x = x;
        self.pointer.y = y;
    }

    pub fn set_pointer_pressed(&mut self, pressed: bool) {
        self.pointer.pressed = pressed;
    }
}
