//! Collision Resolution
//!
//! Two phases, both run against a snapshot of bounds taken when the
//! collision step starts:
//!
//! 1. **Candidates**: a [`BroadPhase`] proposes pairs worth testing. The
//!    default [`PairwiseScan`] proposes every pair (O(n²), fine for tens of
//!    actors); a spatial index can be swapped in without touching the rest.
//! 2. **Contacts**: candidates are kept if their boxes strictly overlap, and
//!    each participant gets its own impact side.
//!
//! Dispatch then notifies both participants of each contact, skipping any
//! pair in which an entity was already marked removed by an earlier handler.

use crate::core::geometry::Bounds;
use crate::engine::events::{CollisionSide, FrameEvent, FrameReport, Hook};
use crate::engine::registry::Slot;
use crate::error::HookError;

/// Snapshot of one collidable entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    /// Index of the entity in the live set
    pub slot: usize,
    /// Bounds at the start of the collision step
    pub bounds: Bounds,
}

/// Overlapping pair with independently computed impact sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    /// Live-set index of the first participant
    pub first: usize,
    /// Live-set index of the second participant
    pub second: usize,
    /// Side of `first` that was struck
    pub first_side: CollisionSide,
    /// Side of `second` that was struck
    pub second_side: CollisionSide,
}

// =============================================================================
// BROAD PHASE
// =============================================================================

/// Proposes candidate pairs, as indices into the collider snapshot.
///
/// Implementations must emit each unordered pair at most once, with the
/// smaller index first, in a deterministic order.
pub trait BroadPhase {
    /// Fill `out` with candidate pairs.
    fn candidate_pairs(&mut self, colliders: &[Collider], out: &mut Vec<(usize, usize)>);
}

/// Every unordered pair `(i, j)` with `i < j`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairwiseScan;

impl BroadPhase for PairwiseScan {
    fn candidate_pairs(&mut self, colliders: &[Collider], out: &mut Vec<(usize, usize)>) {
        for i in 0..colliders.len() {
            for j in (i + 1)..colliders.len() {
                out.push((i, j));
            }
        }
    }
}

// =============================================================================
// NARROW PHASE
// =============================================================================

/// Side of `struck` that `other` hit.
///
/// Measures how far `other` has pushed past each face of `struck` and picks
/// the shallowest one. Ties resolve Top, Bottom, Left, Right.
pub fn impact_side(struck: &Bounds, other: &Bounds) -> CollisionSide {
    let depths = [
        (CollisionSide::Top, other.bottom() - struck.top()),
        (CollisionSide::Bottom, struck.bottom() - other.top()),
        (CollisionSide::Left, other.right() - struck.left()),
        (CollisionSide::Right, struck.right() - other.left()),
    ];

    let mut best = depths[0];
    for candidate in &depths[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best.0
}

/// Collision resolver with a pluggable broad phase.
pub struct CollisionResolver {
    broad_phase: Box<dyn BroadPhase>,
    candidates: Vec<(usize, usize)>,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(Box::new(PairwiseScan))
    }
}

impl CollisionResolver {
    /// Resolver using the given broad phase.
    pub fn new(broad_phase: Box<dyn BroadPhase>) -> Self {
        Self {
            broad_phase,
            candidates: Vec::new(),
        }
    }

    /// Replace the broad phase.
    pub fn set_broad_phase(&mut self, broad_phase: Box<dyn BroadPhase>) {
        self.broad_phase = broad_phase;
    }

    /// All overlapping pairs in the snapshot, in candidate order.
    pub fn contacts(&mut self, colliders: &[Collider]) -> Vec<Contact> {
        self.candidates.clear();
        self.broad_phase.candidate_pairs(colliders, &mut self.candidates);

        self.candidates
            .iter()
            .filter_map(|&(i, j)| {
                let a = colliders.get(i)?;
                let b = colliders.get(j)?;
                if !a.bounds.intersects(&b.bounds) {
                    return None;
                }
                Some(Contact {
                    first: a.slot,
                    second: b.slot,
                    first_side: impact_side(&a.bounds, &b.bounds),
                    second_side: impact_side(&b.bounds, &a.bounds),
                })
            })
            .collect()
    }

    /// Notify both participants of every contact.
    ///
    /// A contact is skipped when either participant is already removed, so
    /// nothing is delivered to or about an entity once a handler has marked
    /// it. Within one contact both sides are told, first then second.
    pub(crate) fn dispatch(&self, slots: &[Slot], contacts: &[Contact], report: &mut FrameReport) {
        for contact in contacts {
            let (Some(first), Some(second)) = (slots.get(contact.first), slots.get(contact.second))
            else {
                continue;
            };

            if !is_live(first, report) || !is_live(second, report) {
                continue;
            }

            #[cfg(feature = "debug-tracing")]
            tracing::trace!(first = %first.id, second = %second.id, "collision");

            notify(first, second, contact.first_side, report);
            notify(second, first, contact.second_side, report);
        }
    }
}

impl std::fmt::Debug for CollisionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionResolver").finish_non_exhaustive()
    }
}

/// False once marked removed. A borrow conflict is reported as a fault
/// and the entity sits out the rest of the collision step.
fn is_live(slot: &Slot, report: &mut FrameReport) -> bool {
    match slot.entity.try_borrow() {
        Ok(entity) => !entity.is_removed(),
        Err(_) => {
            report.fault(slot.id, Hook::Collision, HookError::msg("entity borrowed during collision"));
            false
        }
    }
}

fn notify(struck: &Slot, other: &Slot, side: CollisionSide, report: &mut FrameReport) {
    let borrowed = (struck.entity.try_borrow_mut(), other.entity.try_borrow());
    let (Ok(mut target), Ok(source)) = borrowed else {
        report.fault(struck.id, Hook::Collision, HookError::msg("entity borrowed during collision"));
        return;
    };

    report.push(FrameEvent::Collision {
        entity: struck.id,
        other: other.id,
        side,
    });
    if let Err(err) = target.on_collision(&*source, side) {
        report.fault(struck.id, Hook::Collision, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Position, Size};
    use crate::engine::entity::{shared, Body, Entity, EntityId, EntityRef};

    fn collider(slot: usize, x: f64, y: f64, w: f64, h: f64) -> Collider {
        Collider {
            slot,
            bounds: Bounds::new(x, y, w, h),
        }
    }

    #[test]
    fn test_impact_side_from_each_direction() {
        let struck = Bounds::new(10.0, 10.0, 10.0, 10.0);

        // Other pokes in from above
        assert_eq!(impact_side(&struck, &Bounds::new(12.0, 2.0, 6.0, 10.0)), CollisionSide::Top);
        // From below
        assert_eq!(impact_side(&struck, &Bounds::new(12.0, 18.0, 6.0, 10.0)), CollisionSide::Bottom);
        // From the left
        assert_eq!(impact_side(&struck, &Bounds::new(2.0, 12.0, 10.0, 6.0)), CollisionSide::Left);
        // From the right
        assert_eq!(impact_side(&struck, &Bounds::new(18.0, 12.0, 10.0, 6.0)), CollisionSide::Right);
    }

    #[test]
    fn test_impact_sides_computed_per_participant() {
        let small = Bounds::new(0.0, 0.0, 4.0, 4.0);
        let wide = Bounds::new(3.0, -10.0, 40.0, 30.0);

        assert_eq!(impact_side(&small, &wide), CollisionSide::Right);
        assert_eq!(impact_side(&wide, &small), CollisionSide::Left);
    }

    #[test]
    fn test_impact_side_tie_prefers_top() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(impact_side(&a, &a), CollisionSide::Top);
    }

    #[test]
    fn test_pairwise_scan_emits_each_pair_once() {
        let colliders: Vec<Collider> = (0..4).map(|i| collider(i, 0.0, 0.0, 1.0, 1.0)).collect();
        let mut out = Vec::new();
        PairwiseScan.candidate_pairs(&colliders, &mut out);
        assert_eq!(out, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_contacts_only_for_overlaps() {
        let colliders = vec![
            collider(0, 0.0, 0.0, 10.0, 10.0),
            collider(3, 5.0, 0.0, 10.0, 10.0),
            collider(7, 100.0, 100.0, 10.0, 10.0),
        ];
        let contacts = CollisionResolver::default().contacts(&colliders);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].first, 0);
        assert_eq!(contacts[0].second, 3);
        assert_eq!(contacts[0].first_side, CollisionSide::Right);
        assert_eq!(contacts[0].second_side, CollisionSide::Left);
    }

    struct OnlyFirstPair;

    impl BroadPhase for OnlyFirstPair {
        fn candidate_pairs(&mut self, colliders: &[Collider], out: &mut Vec<(usize, usize)>) {
            if colliders.len() >= 2 {
                out.push((0, 1));
            }
        }
    }

    #[test]
    fn test_custom_broad_phase_limits_candidates() {
        let colliders = vec![
            collider(0, 0.0, 0.0, 10.0, 10.0),
            collider(1, 5.0, 0.0, 10.0, 10.0),
            collider(2, 5.0, 5.0, 10.0, 10.0),
        ];
        let mut resolver = CollisionResolver::new(Box::new(OnlyFirstPair));
        assert_eq!(resolver.contacts(&colliders).len(), 1);

        resolver.set_broad_phase(Box::new(PairwiseScan));
        assert_eq!(resolver.contacts(&colliders).len(), 3);
    }

    struct Block(Body);

    impl Entity for Block {
        fn body(&self) -> &Body {
            &self.0
        }

        fn body_mut(&mut self) -> &mut Body {
            &mut self.0
        }
    }

    fn slot(id: u64, x: f64) -> Slot {
        let entity: EntityRef = shared(Block(Body::new(Position::new(x, 0.0), Size::new(10.0, 10.0))));
        Slot {
            id: EntityId(id),
            entity,
        }
    }

    #[test]
    fn test_dispatch_reports_borrowed_participant() {
        let slots = vec![slot(1, 0.0), slot(2, 5.0)];
        let contact = Contact {
            first: 0,
            second: 1,
            first_side: CollisionSide::Right,
            second_side: CollisionSide::Left,
        };
        let mut report = FrameReport::new(1, 0);

        let guard = slots[1].entity.borrow_mut();
        CollisionResolver::default().dispatch(&slots, &[contact], &mut report);
        drop(guard);

        assert_eq!(report.stats.faults, 1);
        assert!(matches!(
            report.events.as_slice(),
            [FrameEvent::HookFault { entity: EntityId(2), hook: Hook::Collision, .. }]
        ));
    }

    #[test]
    fn test_dispatch_notifies_both_sides() {
        let slots = vec![slot(1, 0.0), slot(2, 5.0)];
        let contacts = CollisionResolver::default().contacts(&[
            Collider { slot: 0, bounds: Bounds::new(0.0, 0.0, 10.0, 10.0) },
            Collider { slot: 1, bounds: Bounds::new(5.0, 0.0, 10.0, 10.0) },
        ]);
        let mut report = FrameReport::new(1, 0);
        CollisionResolver::default().dispatch(&slots, &contacts, &mut report);

        assert_eq!(report.collisions_of(EntityId(1)).collect::<Vec<_>>(), vec![(EntityId(2), CollisionSide::Right)]);
        assert_eq!(report.collisions_of(EntityId(2)).collect::<Vec<_>>(), vec![(EntityId(1), CollisionSide::Left)]);
    }
}
