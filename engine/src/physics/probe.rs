//! Bounding-box edge probing
//!
//! Each of the four edges of the character's bounding box fires a fan of
//! short parallel rays in its outward direction. An edge is "colliding"
//! when any ray reports a hit closer than the detection threshold, and
//! "inside" when any such hit is at zero distance (the character overlaps
//! the geometry).
//!
//! The endpoints of each fan are pulled in by a buffer on the adjoining
//! axis so rays fired from a side edge cannot clip the floor plane at the
//! corners.
//!
//! Probing is a pure function of position, bounds and world: probing twice
//! with the same arguments yields the same [`CollisionState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::physics::collision::{ColliderWorld, LayerMask};

// ============================================================================
// BOUNDS AND DIRECTIONS
// ============================================================================

/// Axis-aligned character bounds in local space, centered on the
/// controller's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner relative to the character position.
    pub min: Vec2,
    /// Maximum corner relative to the character position.
    pub max: Vec2,
}

impl Bounds {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Width and height of the box.
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Center offset relative to the character position.
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// True when the box has positive extent on both axes.
    pub fn is_valid(&self) -> bool {
        self.min.x < self.max.x && self.min.y < self.max.y
    }
}

/// The four probing directions, one per bounding-box edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// All four directions, in ray-range array order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Outward normal of the edge this direction probes from.
    pub fn normal(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

// ============================================================================
// RAY RANGES
// ============================================================================

/// The span of one probing edge: the two buffer-inset endpoints plus the
/// outward cast direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayRange {
    pub start: Vec2,
    pub end: Vec2,
    pub dir: Vec2,
}

impl RayRange {
    pub fn new(start: Vec2, end: Vec2, dir: Vec2) -> Self {
        Self { start, end, dir }
    }

    /// Evenly spaced sample points along the edge: `count` points at
    /// `t = i / count`, so the start endpoint is included and the end
    /// endpoint is never sampled.
    pub fn sample_points(&self, count: u32) -> impl Iterator<Item = Vec2> + '_ {
        let step = 1.0 / count as f32;
        (0..count).map(move |i| self.start.lerp(self.end, i as f32 * step))
    }
}

// ============================================================================
// COLLISION RESULTS
// ============================================================================

/// Result of probing one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionInfo {
    /// At least one ray hit within the detection threshold.
    pub colliding: bool,
    /// At least one detecting ray started inside the geometry.
    pub inside: bool,
}

/// Per-edge probe results for all four directions of the bounding box.
///
/// One unified structure rather than four loose fields, so consumers can
/// iterate or index by [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionState {
    pub up: CollisionInfo,
    pub down: CollisionInfo,
    pub left: CollisionInfo,
    pub right: CollisionInfo,
}

impl CollisionState {
    /// The probe result for one direction.
    pub fn get(&self, dir: Direction) -> CollisionInfo {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// True if any edge is colliding.
    pub fn any_colliding(&self) -> bool {
        Direction::ALL.iter().any(|&d| self.get(d).colliding)
    }
}

// ============================================================================
// PROBE
// ============================================================================

/// Edge-probing configuration: a plain bundle of the four ray tunables.
///
/// Cheap to build from the controller config every tick, so it can never
/// drift out of sync with a runtime tuning change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionProbe {
    /// Rays per edge.
    pub detector_count: u32,
    /// Length of each detection ray.
    pub detection_ray_length: f32,
    /// Hits closer than this count as a collision.
    pub detection_threshold: f32,
    /// Endpoint inset on the adjoining axis.
    pub ray_buffer: f32,
}

impl CollisionProbe {
    pub fn new(
        detector_count: u32,
        detection_ray_length: f32,
        detection_threshold: f32,
        ray_buffer: f32,
    ) -> Self {
        debug_assert!(detector_count >= 1, "probe needs at least one detector per edge");
        Self {
            detector_count,
            detection_ray_length,
            detection_threshold,
            ray_buffer,
        }
    }

    /// The four probing edges for a character at `position`, in
    /// [`Direction::ALL`] order.
    ///
    /// Up/down edges are inset by the ray buffer on X; left/right edges on
    /// Y. Without the inset, a side-edge corner ray grazing the floor
    /// would register as a wall contact.
    pub fn ray_ranges(&self, position: Vec2, bounds: &Bounds) -> [RayRange; 4] {
        let min = position + bounds.min;
        let max = position + bounds.max;
        let b = self.ray_buffer;

        [
            RayRange::new(
                Vec2::new(min.x + b, max.y),
                Vec2::new(max.x - b, max.y),
                Vec2::Y,
            ),
            RayRange::new(
                Vec2::new(min.x + b, min.y),
                Vec2::new(max.x - b, min.y),
                Vec2::NEG_Y,
            ),
            RayRange::new(
                Vec2::new(min.x, min.y + b),
                Vec2::new(min.x, max.y - b),
                Vec2::NEG_X,
            ),
            RayRange::new(
                Vec2::new(max.x, min.y + b),
                Vec2::new(max.x, max.y - b),
                Vec2::X,
            ),
        ]
    }

    /// Probe all four edges against the world.
    pub fn probe(
        &self,
        world: &ColliderWorld,
        position: Vec2,
        bounds: &Bounds,
        mask: LayerMask,
    ) -> CollisionState {
        let ranges = self.ray_ranges(position, bounds);
        CollisionState {
            up: self.run_detection(world, &ranges[Direction::Up as usize], mask),
            down: self.run_detection(world, &ranges[Direction::Down as usize], mask),
            left: self.run_detection(world, &ranges[Direction::Left as usize], mask),
            right: self.run_detection(world, &ranges[Direction::Right as usize], mask),
        }
    }

    fn run_detection(&self, world: &ColliderWorld, range: &RayRange, mask: LayerMask) -> CollisionInfo {
        let mut colliding = false;
        let mut inside = false;

        for point in range.sample_points(self.detector_count) {
            if let Some(hit) = world.ray_cast(point, range.dir, self.detection_ray_length, mask) {
                if hit.distance < self.detection_threshold {
                    colliding = true;
                    if hit.distance <= 0.0 {
                        inside = true;
                    }
                }
            }
        }

        CollisionInfo { colliding, inside }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> CollisionProbe {
        CollisionProbe::new(3, 0.3, 0.01, 0.1)
    }

    fn bounds() -> Bounds {
        Bounds::new(Vec2::new(-0.5, -1.0), Vec2::new(0.5, 1.0))
    }

    #[test]
    fn test_ray_ranges_are_buffer_inset() {
        let ranges = probe().ray_ranges(Vec2::ZERO, &bounds());

        let down = ranges[Direction::Down as usize];
        assert_eq!(down.start, Vec2::new(-0.4, -1.0));
        assert_eq!(down.end, Vec2::new(0.4, -1.0));
        assert_eq!(down.dir, Vec2::NEG_Y);

        let right = ranges[Direction::Right as usize];
        assert_eq!(right.start, Vec2::new(0.5, -0.9));
        assert_eq!(right.end, Vec2::new(0.5, 0.9));
        assert_eq!(right.dir, Vec2::X);
    }

    #[test]
    fn test_sample_points_exclude_end() {
        let range = RayRange::new(Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::NEG_Y);
        let points: Vec<Vec2> = range.sample_points(3).collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], Vec2::ZERO);
        assert!((points[1].x - 1.0).abs() < 1e-5);
        assert!((points[2].x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_grounded_within_threshold() {
        let mut world = ColliderWorld::new();
        world.add_ground(Vec2::new(-50.0, -10.0), Vec2::new(50.0, 0.0));

        // Feet 5mm above the ground: colliding, not inside.
        let state = probe().probe(&world, Vec2::new(0.0, 1.005), &bounds(), LayerMask::GROUND);
        assert!(state.down.colliding);
        assert!(!state.down.inside);
        assert!(!state.up.colliding);
        assert!(!state.left.colliding);
        assert!(!state.right.colliding);
    }

    #[test]
    fn test_hovering_above_threshold_is_airborne() {
        let mut world = ColliderWorld::new();
        world.add_ground(Vec2::new(-50.0, -10.0), Vec2::new(50.0, 0.0));

        // Feet 5cm up: within ray length but beyond the threshold.
        let state = probe().probe(&world, Vec2::new(0.0, 1.05), &bounds(), LayerMask::GROUND);
        assert!(!state.down.colliding);
    }

    #[test]
    fn test_penetration_reports_inside() {
        let mut world = ColliderWorld::new();
        world.add_ground(Vec2::new(-50.0, -10.0), Vec2::new(50.0, 0.0));

        // Feet 5mm below the surface.
        let state = probe().probe(&world, Vec2::new(0.0, 0.995), &bounds(), LayerMask::GROUND);
        assert!(state.down.colliding);
        assert!(state.down.inside);
    }

    #[test]
    fn test_ray_buffer_keeps_side_edges_off_the_floor() {
        let mut world = ColliderWorld::new();
        world.add_ground(Vec2::new(-50.0, -10.0), Vec2::new(50.0, 0.0));

        // Slight floor penetration: the bottom corners of the side edges sit
        // below the surface, but the buffer inset lifts the side rays clear.
        let state = probe().probe(&world, Vec2::new(0.0, 0.995), &bounds(), LayerMask::GROUND);
        assert!(!state.left.colliding);
        assert!(!state.right.colliding);
    }

    #[test]
    fn test_wall_overlap_reports_inside() {
        let mut world = ColliderWorld::new();
        world.add_ground(Vec2::new(0.3, -10.0), Vec2::new(2.0, 10.0));

        let state = probe().probe(&world, Vec2::ZERO, &bounds(), LayerMask::GROUND);
        assert!(state.right.colliding);
        assert!(state.right.inside);
        assert!(!state.left.colliding);
        assert!(!state.up.colliding);
        assert!(!state.down.colliding);
    }

    #[test]
    fn test_empty_world_is_all_clear() {
        let world = ColliderWorld::new();
        let state = probe().probe(&world, Vec2::ZERO, &bounds(), LayerMask::GROUND);
        assert_eq!(state, CollisionState::default());
    }

    #[test]
    fn test_probe_is_idempotent() {
        let mut world = ColliderWorld::new();
        world.add_ground(Vec2::new(-50.0, -10.0), Vec2::new(50.0, 0.0));

        let p = probe();
        let a = p.probe(&world, Vec2::new(0.0, 1.005), &bounds(), LayerMask::GROUND);
        let b = p.probe(&world, Vec2::new(0.0, 1.005), &bounds(), LayerMask::GROUND);
        assert_eq!(a, b);
    }
}
