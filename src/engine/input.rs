//! Keyboard Input
//!
//! Logical keys as delivered by the host window. The engine never reads
//! the keyboard itself; the host hands over the set of currently pressed
//! keys once per frame and it is passed verbatim to every InputAware entity.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A logical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Space bar
    Space,
    /// Enter / return
    Enter,
    /// Escape
    Escape,
    /// Function key 1 (default debug toggle)
    F1,
    /// Any printable character
    Char(char),
}

/// Set of keys held down this frame.
///
/// Backed by a `BTreeSet` so iteration order is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    pressed: BTreeSet<Key>,
}

impl KeySet {
    /// Nothing pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key as pressed. Returns false if it already was.
    pub fn press(&mut self, key: Key) -> bool {
        self.pressed.insert(key)
    }

    /// Mark a key as released. Returns false if it was not pressed.
    pub fn release(&mut self, key: Key) -> bool {
        self.pressed.remove(&key)
    }

    /// Is `key` currently held?
    #[inline]
    pub fn contains(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// True if no key is held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    /// Number of held keys.
    pub fn len(&self) -> usize {
        self.pressed.len()
    }

    /// Held keys in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        self.pressed.iter().copied()
    }

    /// True if `key` is held here but was not held in `previous`.
    pub fn newly_pressed(&self, previous: &KeySet, key: Key) -> bool {
        self.contains(key) && !previous.contains(key)
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self {
            pressed: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut keys = KeySet::new();
        assert!(keys.is_empty());

        assert!(keys.press(Key::Left));
        assert!(!keys.press(Key::Left));
        assert!(keys.contains(Key::Left));
        assert_eq!(keys.len(), 1);

        assert!(keys.release(Key::Left));
        assert!(!keys.release(Key::Left));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_iteration_is_sorted() {
        let keys: KeySet = [Key::F1, Key::Left, Key::Char('a'), Key::Down]
            .into_iter()
            .collect();
        let order: Vec<Key> = keys.iter().collect();
        assert_eq!(order, vec![Key::Left, Key::Down, Key::F1, Key::Char('a')]);
    }

    #[test]
    fn test_newly_pressed_edge() {
        let before: KeySet = [Key::Up].into_iter().collect();
        let after: KeySet = [Key::Up, Key::F1].into_iter().collect();
        assert!(after.newly_pressed(&before, Key::F1));
        assert!(!after.newly_pressed(&before, Key::Up));
        assert!(!before.newly_pressed(&after, Key::F1));
    }
}
