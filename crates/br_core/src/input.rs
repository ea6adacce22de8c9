//! Keyboard state plus a queue of discrete pointer presses.
//!
//! - **Keys** are edge tracked: a press reports `is_just_pressed` until
//!   `end_frame()`, and auto-repeat while held does not press again.
//!
//! - **Pointer presses** are not polled. Each press is queued with the
//!   coordinate it happened at and handed out exactly once by
//!   `drain_pointer_downs()`, so a tap is delivered to the active scene as a
//!   single hit-test event no matter how many frames it stays down.

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    Enter,
    Left,
    Right,
    F3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// A press at a viewport coordinate (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    pub x: f32,
    pub y: f32,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    pointer_downs: VecDeque<PointerDown>,

    pub mouse_position: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            mouse_held: HashSet::new(),
            pointer_downs: VecDeque::new(),
            mouse_position: (0.0, 0.0),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Only the primary button produces a pointer press; it is queued at the
    /// last known cursor position.
    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) && btn == MouseBtn::Left {
            self.pointer_downs.push_back(PointerDown {
                x: self.mouse_position.0 as f32,
                y: self.mouse_position.1 as f32,
            });
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        self.mouse_held.remove(&btn);
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Hands out queued presses in arrival order.
    pub fn drain_pointer_downs(&mut self) -> impl Iterator<Item = PointerDown> + '_ {
        self.pointer_downs.drain(..)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
