//! Collision detection for the arcade loop
//!
//! Everything that collides is either a circle (hazards) or an axis-aligned
//! box (the player, projectiles), so one circle-vs-rect test covers all pairs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Closest point inside the rectangle to `point`
    #[inline]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max())
    }
}

/// Circle vs axis-aligned rectangle overlap.
///
/// Clamps the circle centre onto the rectangle and compares the squared
/// distance against the squared radius. Touching edges do not count.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    center.distance_squared(closest) < radius * radius
}

/// Unit direction from `from` toward `to`.
///
/// When the two points coincide there is no direction to normalise; aim
/// straight up (negative y in screen space).
pub fn aim_direction(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    if delta.length_squared() <= f32::EPSILON {
        return Vec2::NEG_Y;
    }
    delta.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player_box() -> Rect {
        Rect::new(Vec2::new(100.0, 200.0), Vec2::new(80.0, 50.0))
    }

    #[test]
    fn test_circle_inside_rect() {
        assert!(circle_rect_overlap(Vec2::new(140.0, 225.0), 5.0, &player_box()));
    }

    #[test]
    fn test_circle_above_rect() {
        let rect = player_box();
        // 19 px above the top edge with radius 20 overlaps, 21 px does not
        assert!(circle_rect_overlap(Vec2::new(140.0, 181.0), 20.0, &rect));
        assert!(!circle_rect_overlap(Vec2::new(140.0, 179.0), 20.0, &rect));
    }

    #[test]
    fn test_circle_exactly_touching_is_miss() {
        let rect = player_box();
        assert!(!circle_rect_overlap(Vec2::new(140.0, 180.0), 20.0, &rect));
    }

    #[test]
    fn test_circle_near_corner() {
        let rect = player_box();
        // Diagonal from the top-left corner: distance sqrt(200) ~ 14.1
        assert!(circle_rect_overlap(Vec2::new(90.0, 190.0), 15.0, &rect));
        assert!(!circle_rect_overlap(Vec2::new(90.0, 190.0), 14.0, &rect));
    }

    #[test]
    fn test_aim_direction_normalized() {
        let dir = aim_direction(Vec2::new(0.0, 0.0), Vec2::new(3.0, -4.0));
        assert!((dir - Vec2::new(0.6, -0.8)).length() < 1e-6);
    }

    #[test]
    fn test_aim_direction_degenerate_points_up() {
        let p = Vec2::new(50.0, 50.0);
        assert_eq!(aim_direction(p, p), Vec2::NEG_Y);
    }

    proptest! {
        #[test]
        fn prop_aim_direction_is_unit(
            fx in -2000.0f32..2000.0, fy in -2000.0f32..2000.0,
            tx in -2000.0f32..2000.0, ty in -2000.0f32..2000.0,
        ) {
            let dir = aim_direction(Vec2::new(fx, fy), Vec2::new(tx, ty));
            prop_assert!(dir.is_finite());
            prop_assert!((dir.length() - 1.0).abs() < 1e-3);
        }

        #[test]
        fn prop_center_inside_rect_always_overlaps(
            x in 0.0f32..80.0, y in 0.0f32..50.0, r in 0.1f32..40.0,
        ) {
            let rect = Rect::new(Vec2::ZERO, Vec2::new(80.0, 50.0));
            prop_assert!(circle_rect_overlap(Vec2::new(x, y), r, &rect));
        }
    }
}
