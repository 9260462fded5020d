//! Collision detection substrate
//!
//! Ray casting against static axis-aligned colliders. The slab method is
//! used for ray-AABB intersection: entry and exit times are computed per
//! axis and intersected.
//!
//! A [`ColliderWorld`] is the level geometry a character probes against:
//! a flat set of [`StaticCollider`]s carrying a [`LayerMask`] and a
//! trigger flag. Queries skip triggers and non-matching layers; a query
//! that hits nothing is a normal outcome, not an error.
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec2;
//! use rayrunner_engine::physics::collision::{ColliderWorld, LayerMask};
//!
//! let mut world = ColliderWorld::new();
//! world.add_ground(Vec2::new(-50.0, -10.0), Vec2::new(50.0, 0.0));
//!
//! if let Some(hit) = world.ray_cast(Vec2::new(0.0, 1.0), Vec2::NEG_Y, 2.0, LayerMask::GROUND) {
//!     println!("ground {} below", hit.distance);
//! }
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

// ============================================================================
// LAYERS
// ============================================================================

/// Bit set of collision layers.
///
/// Colliders declare the layers they belong to; queries declare the layers
/// they are interested in. A collider is considered when the two masks
/// share at least one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Empty mask: matches nothing.
    pub const NONE: LayerMask = LayerMask(0);
    /// The walkable-geometry layer the character probes against.
    pub const GROUND: LayerMask = LayerMask(1 << 0);
    /// Full mask: matches every layer.
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// True if the two masks share at least one layer bit.
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::GROUND
    }
}

// ============================================================================
// RAY-AABB INTERSECTION
// ============================================================================

/// Information about a ray hit against a static collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point. Zero when the origin
    /// started inside the collider.
    pub distance: f32,
    /// World-space position of the hit.
    pub point: Vec2,
    /// Outward surface normal at the hit point.
    pub normal: Vec2,
}

/// Ray-AABB intersection test using the slab method.
///
/// Entry and exit times are computed for the X and Y slabs and intersected.
/// An origin already inside the box reports a hit at distance `0.0`, which
/// is how edge probes classify overlap. A box entirely behind the origin
/// reports `None`.
///
/// # Arguments
///
/// * `origin` - Starting point of the ray
/// * `dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the box
/// * `aabb_max` - Maximum corner of the box
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the entry point (t >= 0)
/// * `None` - No intersection in front of the origin
pub fn ray_aabb_intersect(origin: Vec2, dir: Vec2, aabb_min: Vec2, aabb_max: Vec2) -> Option<f32> {
    // Inverse direction with near-zero guards, so axis-parallel rays fall
    // out of the min/max folding instead of dividing by zero.
    let inv_dir = Vec2::new(
        if dir.x.abs() > 1e-10 {
            1.0 / dir.x
        } else {
            f32::MAX * dir.x.signum()
        },
        if dir.y.abs() > 1e-10 {
            1.0 / dir.y
        } else {
            f32::MAX * dir.y.signum()
        },
    );

    // X slab.
    let t1 = (aabb_min.x - origin.x) * inv_dir.x;
    let t2 = (aabb_max.x - origin.x) * inv_dir.x;
    let mut t_min = t1.min(t2);
    let mut t_max = t1.max(t2);

    // Y slab.
    let t3 = (aabb_min.y - origin.y) * inv_dir.y;
    let t4 = (aabb_max.y - origin.y) * inv_dir.y;
    t_min = t_min.max(t3.min(t4));
    t_max = t_max.min(t3.max(t4));

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 {
            Some(t_min)
        } else {
            // Origin is inside the box: overlap, zero distance.
            Some(0.0)
        }
    } else {
        None
    }
}

/// Outward surface normal for a point on (or in) an AABB.
///
/// Picks the face whose normalized local coordinate is largest, so points
/// slightly off the surface still resolve to the nearest face.
pub fn aabb_surface_normal(point: Vec2, aabb_min: Vec2, aabb_max: Vec2) -> Vec2 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = (aabb_max - aabb_min) * 0.5;
    let local = point - center;

    let normalized = Vec2::new(local.x / half_extents.x, local.y / half_extents.y);

    if normalized.x.abs() >= normalized.y.abs() {
        Vec2::new(normalized.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, normalized.y.signum())
    }
}

// ============================================================================
// STATIC COLLIDERS
// ============================================================================

/// One axis-aligned box of level geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCollider {
    /// Minimum corner in world space.
    pub min: Vec2,
    /// Maximum corner in world space.
    pub max: Vec2,
    /// Layers this collider belongs to.
    pub layers: LayerMask,
    /// Trigger volumes overlap without blocking and are skipped by all
    /// ray queries.
    pub is_trigger: bool,
}

impl StaticCollider {
    /// Create a solid collider on the given layers.
    pub fn solid(min: Vec2, max: Vec2, layers: LayerMask) -> Self {
        Self {
            min,
            max,
            layers,
            is_trigger: false,
        }
    }

    /// Create a trigger volume on the given layers.
    pub fn trigger(min: Vec2, max: Vec2, layers: LayerMask) -> Self {
        Self {
            min,
            max,
            layers,
            is_trigger: true,
        }
    }

    /// True if `point` lies inside or on the boundary of this collider.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

// ============================================================================
// COLLIDER WORLD
// ============================================================================

/// The static level geometry a character is simulated against.
///
/// Storage is a flat list and queries are brute force over it: levels for
/// this controller are tens of boxes, far below the point where a spatial
/// index would pay for itself.
#[derive(Debug, Clone, Default)]
pub struct ColliderWorld {
    colliders: Vec<StaticCollider>,
}

impl ColliderWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world from an existing collider list.
    pub fn from_colliders(colliders: Vec<StaticCollider>) -> Self {
        Self { colliders }
    }

    /// Add a collider.
    pub fn add(&mut self, collider: StaticCollider) {
        self.colliders.push(collider);
    }

    /// Add a solid box on the ground layer. Convenience for level building.
    pub fn add_ground(&mut self, min: Vec2, max: Vec2) {
        self.add(StaticCollider::solid(min, max, LayerMask::GROUND));
    }

    /// Number of colliders in the world.
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// True if the world contains no colliders.
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Remove all colliders.
    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    /// Iterate over all colliders.
    pub fn iter(&self) -> impl Iterator<Item = &StaticCollider> {
        self.colliders.iter()
    }

    /// Cast a ray and return the closest hit.
    ///
    /// Triggers and colliders whose layers do not intersect `mask` are
    /// skipped. Hits at exactly `max_dist` are excluded.
    ///
    /// # Arguments
    ///
    /// * `origin` - Ray starting position
    /// * `dir` - Ray direction (should be normalized)
    /// * `max_dist` - Maximum distance to check
    /// * `mask` - Layers the query is interested in
    pub fn ray_cast(&self, origin: Vec2, dir: Vec2, max_dist: f32, mask: LayerMask) -> Option<RayHit> {
        let mut closest: Option<RayHit> = None;
        let mut closest_dist = max_dist;

        for collider in &self.colliders {
            if collider.is_trigger || !collider.layers.intersects(mask) {
                continue;
            }

            if let Some(t) = ray_aabb_intersect(origin, dir, collider.min, collider.max) {
                if t < closest_dist {
                    let point = origin + dir * t;
                    closest = Some(RayHit {
                        distance: t,
                        point,
                        normal: aabb_surface_normal(point, collider.min, collider.max),
                    });
                    closest_dist = t;
                }
            }
        }

        closest
    }

    /// True if the ray hits anything. Faster than [`ray_cast`](Self::ray_cast)
    /// when the hit itself is not needed.
    pub fn ray_test(&self, origin: Vec2, dir: Vec2, max_dist: f32, mask: LayerMask) -> bool {
        self.colliders.iter().any(|c| {
            !c.is_trigger
                && c.layers.intersects(mask)
                && ray_aabb_intersect(origin, dir, c.min, c.max).is_some_and(|t| t < max_dist)
        })
    }
}
