//! Geometry shared by the two-pointer recognizers

use glam::Vec2;

use crate::input::{InputState, PointerId};

/// Snapshot of the line between exactly two pointers
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PairGeometry {
    /// Pointer ids, lowest first
    pub ids: [PointerId; 2],
    pub center: Vec2,
    pub distance: f32,
    /// Orientation of the line from the first to the second pointer, degrees
    pub angle: f32,
}

impl PairGeometry {
    /// Geometry of the active pair, `None` unless exactly two pointers are down
    pub fn from_state(state: &InputState) -> Option<Self> {
        let [(a_id, a), (b_id, b)] = state.pointer_pair()?;
        let line = b - a;
        Some(Self {
            ids: [a_id, b_id],
            center: (a + b) * 0.5,
            distance: line.length(),
            angle: line.y.atan2(line.x).to_degrees(),
        })
    }
}

/// Wrap an angle difference into [-180, 180)
pub(crate) fn wrap_degrees(delta: f32) -> f32 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}
