//! Boundary Monitor
//!
//! Reports when an entity's bounds are entirely past one edge of the
//! play-field. Touching or straddling an edge does not count.
//!
//! Checks run LEFT, RIGHT, TOP, BOTTOM and the first match wins, so an
//! entity off a corner is reported on its horizontal edge.
//!
//! The monitor never removes anything. Notification is edge-triggered per
//! entity: it fires when the reported border changes to a new one and stays
//! quiet while the entity remains past the same edge.

use crate::core::geometry::{Bounds, PlayField};
use crate::engine::entity::Body;
use crate::engine::events::SceneBorder;

/// Which edge `bounds` lies entirely beyond, if any.
pub fn crossing(bounds: &Bounds, field: &PlayField) -> Option<SceneBorder> {
    if bounds.right() < 0.0 {
        Some(SceneBorder::Left)
    } else if bounds.left() > field.width {
        Some(SceneBorder::Right)
    } else if bounds.bottom() < 0.0 {
        Some(SceneBorder::Top)
    } else if bounds.top() > field.height {
        Some(SceneBorder::Bottom)
    } else {
        None
    }
}

/// Boundary checks against one play-field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryMonitor {
    field: PlayField,
}

impl BoundaryMonitor {
    /// Monitor for `field`.
    pub fn new(field: PlayField) -> Self {
        Self { field }
    }

    /// The monitored play-field.
    pub fn field(&self) -> PlayField {
        self.field
    }

    /// Stateless check of a bounding box.
    pub fn check(&self, bounds: &Bounds) -> Option<SceneBorder> {
        crossing(bounds, &self.field)
    }

    /// Check a body and return the border to notify, if the crossing is new.
    pub(crate) fn observe(&self, body: &mut Body) -> Option<SceneBorder> {
        let current = self.check(&body.bounds());
        let previous = body.replace_crossing(current);
        match current {
            Some(border) if previous != Some(border) => Some(border),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Position, Size};
    use proptest::prelude::*;

    const FIELD: PlayField = PlayField::new(40.0, 40.0);

    fn at(x: f64, y: f64) -> Bounds {
        Bounds::new(x, y, 2.0, 2.0)
    }

    #[test]
    fn test_centered_entity_crosses_nothing() {
        assert_eq!(crossing(&at(20.0, 20.0), &FIELD), None);
    }

    #[test]
    fn test_each_border() {
        assert_eq!(crossing(&at(-20.0, 20.0), &FIELD), Some(SceneBorder::Left));
        assert_eq!(crossing(&at(60.0, 20.0), &FIELD), Some(SceneBorder::Right));
        assert_eq!(crossing(&at(20.0, -20.0), &FIELD), Some(SceneBorder::Top));
        assert_eq!(crossing(&at(20.0, 60.0), &FIELD), Some(SceneBorder::Bottom));
    }

    #[test]
    fn test_straddling_edge_is_not_a_crossing() {
        assert_eq!(crossing(&at(-1.0, 20.0), &FIELD), None);
        assert_eq!(crossing(&at(-2.0, 20.0), &FIELD), None);
        assert_eq!(crossing(&at(40.0, 20.0), &FIELD), None);
        assert_eq!(crossing(&at(20.0, -2.0), &FIELD), None);
        assert_eq!(crossing(&at(20.0, 40.0), &FIELD), None);
    }

    #[test]
    fn test_diagonal_prefers_horizontal() {
        assert_eq!(crossing(&at(-20.0, -20.0), &FIELD), Some(SceneBorder::Left));
        assert_eq!(crossing(&at(60.0, 60.0), &FIELD), Some(SceneBorder::Right));
    }

    #[test]
    fn test_observe_is_edge_triggered() {
        let monitor = BoundaryMonitor::new(FIELD);
        let mut body = Body::new(Position::new(20.0, -20.0), Size::new(2.0, 2.0));

        assert_eq!(monitor.observe(&mut body), Some(SceneBorder::Top));
        assert_eq!(monitor.observe(&mut body), None);

        body.set_position(Position::new(20.0, 20.0));
        assert_eq!(monitor.observe(&mut body), None);

        body.set_position(Position::new(20.0, -20.0));
        assert_eq!(monitor.observe(&mut body), Some(SceneBorder::Top));

        body.set_position(Position::new(-20.0, -20.0));
        assert_eq!(monitor.observe(&mut body), Some(SceneBorder::Left));
    }

    proptest! {
        #[test]
        fn prop_inside_field_never_crosses(x in 0.0f64..38.0, y in 0.0f64..38.0) {
            prop_assert_eq!(crossing(&at(x, y), &FIELD), None);
        }
    }
}
