//! Input event queue
//!
//! Raw key, pointer and touch events are queued as they arrive and drained
//! once per frame. Jump is edge-triggered: a key that is already held does
//! not jump again on auto-repeat.

use std::collections::{HashMap, VecDeque};

/// Key codes (`KeyboardEvent.code`) that jump
pub const JUMP_KEYS: [&str; 3] = ["Space", "KeyW", "ArrowUp"];

/// Raw event from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    PointerDown,
    TouchStart,
    /// Focus lost; every key counts as released
    Blur,
}

/// Game action derived from input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Jump,
}

/// Pending input plus the pressed-key map
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<InputEvent>,
    pressed: HashMap<String, bool>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    pub fn is_pressed(&self, code: &str) -> bool {
        self.pressed.get(code).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Consume queued events in arrival order, producing actions
    pub fn drain(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Some(event) = self.pending.pop_front() {
            match event {
                InputEvent::KeyDown(code) => {
                    let was_down = self.pressed.insert(code.clone(), true).unwrap_or(false);
                    if !was_down && JUMP_KEYS.contains(&code.as_str()) {
                        actions.push(Action::Jump);
                    }
                }
                InputEvent::KeyUp(code) => {
                    self.pressed.insert(code, false);
                }
                InputEvent::PointerDown | InputEvent::TouchStart => actions.push(Action::Jump),
                InputEvent::Blur => self.pressed.clear(),
            }
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_down(code: &str) -> InputEvent {
        InputEvent::KeyDown(code.to_string())
    }

    #[test]
    fn test_jump_sources() {
        let mut queue = InputQueue::new();
        queue.push(key_down("Space"));
        queue.push(InputEvent::PointerDown);
        queue.push(InputEvent::TouchStart);
        queue.push(key_down("KeyA"));
        assert_eq!(queue.drain(), vec![Action::Jump; 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_auto_repeat_does_not_jump() {
        let mut queue = InputQueue::new();
        queue.push(key_down("ArrowUp"));
        queue.push(key_down("ArrowUp"));
        assert_eq!(queue.drain().len(), 1);
        assert!(queue.is_pressed("ArrowUp"));

        queue.push(InputEvent::KeyUp("ArrowUp".into()));
        queue.push(key_down("ArrowUp"));
        assert_eq!(queue.drain().len(), 1);
    }

    #[test]
    fn test_blur_releases_keys() {
        let mut queue = InputQueue::new();
        queue.push(key_down("KeyW"));
        queue.push(InputEvent::Blur);
        queue.drain();
        assert!(!queue.is_pressed("KeyW"));
    }
}
