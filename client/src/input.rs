//! Held-key tracking for the fixed movement action set.

use std::collections::HashSet;

use shared::MotionIntent;

/// Physical keys the movement actions can bind to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// Logical movement actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveForward,
    MoveBackward,
    RotateLeft,
    RotateRight,
}

/// Binds each action to one or more physical keys.
#[derive(Clone, Debug)]
pub struct InputMap {
    bindings: Vec<(InputAction, KeyCode)>,
}

impl InputMap {
    /// A map with no bindings at all.
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Adds a binding. An action may hold any number of keys.
    pub fn insert(&mut self, action: InputAction, key: KeyCode) {
        self.bindings.push((action, key));
    }

    fn keys_for(&self, action: InputAction) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |(a, _)| *a == action)
            .map(|(_, k)| *k)
    }
}

impl Default for InputMap {
    /// WASD plus the arrow keys.
    fn default() -> Self {
        let mut map = Self::empty();
        map.insert(InputAction::MoveForward, KeyCode::KeyW);
        map.insert(InputAction::MoveForward, KeyCode::ArrowUp);
        map.insert(InputAction::MoveBackward, KeyCode::KeyS);
        map.insert(InputAction::MoveBackward, KeyCode::ArrowDown);
        map.insert(InputAction::RotateLeft, KeyCode::KeyA);
        map.insert(InputAction::RotateLeft, KeyCode::ArrowLeft);
        map.insert(InputAction::RotateRight, KeyCode::KeyD);
        map.insert(InputAction::RotateRight, KeyCode::ArrowRight);
        map
    }
}

/// Tracks which keys are currently held and answers per-action queries.
///
/// Pure state: set on raw key-down, cleared on key-up, no debouncing and no
/// repeat suppression. The host window forwards events; nothing here blocks
/// or fails.
#[derive(Clone, Debug, Default)]
pub struct InputSampler {
    map: InputMap,
    held: HashSet<KeyCode>,
}

impl InputSampler {
    pub fn new(map: InputMap) -> Self {
        Self {
            map,
            held: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: KeyCode) {
        self.held.insert(key);
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Is any key bound to `action` currently held?
    pub fn pressed(&self, action: InputAction) -> bool {
        self.map.keys_for(action).any(|key| self.held.contains(&key))
    }

    /// Projects the four movement actions into this tick's motion intent.
    pub fn intent(&self) -> MotionIntent {
        MotionIntent {
            forward: self.pressed(InputAction::MoveForward),
            backward: self.pressed(InputAction::MoveBackward),
            turn_left: self.pressed(InputAction::RotateLeft),
            turn_right: self.pressed(InputAction::RotateRight),
        }
    }
}
