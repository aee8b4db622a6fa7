use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// Logical keys the core polls. The host maps physical devices onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Jump,
    /// Primary pointer button (place in the editor).
    PointerPrimary,
    /// Secondary pointer button (erase in the editor).
    PointerSecondary,
}

/// Poll-style view of the input devices for the current frame.
pub trait InputSnapshot {
    /// Key went down this frame.
    fn pressed(&self, key: Key) -> bool;

    /// Key is currently held (including the frame it was pressed).
    fn held(&self, key: Key) -> bool;

    /// Pointer position in world space, if a pointer is present.
    fn pointer_world(&self) -> Option<Vec2>;
}

/// A plain snapshot built by the host each frame (or by tests).
#[derive(Debug, Clone, Default)]
pub struct KeyboardSnapshot {
    pressed: HashSet<Key>,
    held: HashSet<Key>,
    pointer: Option<Vec2>,
}

impl KeyboardSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key as held; `pressed_now` also flags it as newly pressed.
    pub fn with_key(mut self, key: Key, pressed_now: bool) -> Self {
        self.held.insert(key);
        if pressed_now {
            self.pressed.insert(key);
        }
        self
    }

    pub fn with_pointer(mut self, pos: Vec2) -> Self {
        self.pointer = Some(pos);
        self
    }

    /// Carry held keys into the next frame, clearing the pressed edge.
    pub fn next_frame(&mut self) {
        self.pressed.clear();
    }

    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
        self.pressed.remove(&key);
    }

    pub fn set_pointer(&mut self, pos: Option<Vec2>) {
        self.pointer = pos;
    }
}

impl InputSnapshot for KeyboardSnapshot {
    fn pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn pointer_world(&self) -> Option<Vec2> {
        self.pointer
    }
}
