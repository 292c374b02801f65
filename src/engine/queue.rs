//! Pending Registrations
//!
//! Entities waiting to join the live set. The registry drains its queue at
//! the start of every update, so anything pushed mid-frame (for example by
//! a collision handler holding a clone of the queue) becomes visible on the
//! next frame, never the current one.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::entity::{same_entity, shared, Entity, EntityRef, Shared};

/// Clonable handle to a shared list of pending entities.
#[derive(Clone, Default)]
pub struct EntityQueue {
    inner: Rc<RefCell<Vec<EntityRef>>>,
}

impl EntityQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an entity. Returns false if the same entity is already queued.
    pub fn push(&self, entity: EntityRef) -> bool {
        let mut pending = self.inner.borrow_mut();
        if pending.iter().any(|queued| same_entity(queued, &entity)) {
            return false;
        }
        pending.push(entity);
        true
    }

    /// Wrap, enqueue and return a typed handle to `entity`.
    pub fn push_entity<E: Entity + 'static>(&self, entity: E) -> Shared<E> {
        let handle = shared(entity);
        let entity_ref: EntityRef = handle.clone();
        self.push(entity_ref);
        handle
    }

    /// Is `entity` waiting in this queue?
    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.inner.borrow().iter().any(|queued| same_entity(queued, entity))
    }

    /// Take everything queued so far, leaving the queue empty.
    pub fn drain(&self) -> Vec<EntityRef> {
        std::mem::take(&mut *self.inner.borrow_mut())
    }

    /// Number of queued entities.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Discard everything queued.
    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}

impl std::fmt::Debug for EntityQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityQueue").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Position, Size};
    use crate::engine::entity::Body;

    struct Marker(Body);

    impl Entity for Marker {
        fn body(&self) -> &Body {
            &self.0
        }

        fn body_mut(&mut self) -> &mut Body {
            &mut self.0
        }
    }

    fn marker() -> Marker {
        Marker(Body::new(Position::ORIGIN, Size::new(1.0, 1.0)))
    }

    #[test]
    fn test_push_deduplicates() {
        let queue = EntityQueue::new();
        let handle = queue.push_entity(marker());
        let entity: EntityRef = handle;
        assert!(!queue.push(entity.clone()));
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(&entity));
    }

    #[test]
    fn test_clones_share_storage() {
        let queue = EntityQueue::new();
        let other = queue.clone();
        other.push_entity(marker());
        assert_eq!(queue.len(), 1);

        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert!(other.is_empty());
        assert!(queue.drain().is_empty());
    }
}
