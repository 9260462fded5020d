//! Physics module
//!
//! Custom collision detection for the character controller. Built from
//! scratch without an external physics library: static axis-aligned
//! colliders, slab-method ray casting, and per-edge ray-fan probing.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//!
//! # Submodules
//!
//! - [`types`] - Core math types (Vec2) and scalar helpers
//! - [`collision`] - Static colliders, layers, and ray casting
//! - [`probe`] - Bounding-box edge probing

pub mod collision;
pub mod probe;
pub mod types;

// Re-export commonly used types at the physics module level
pub use collision::{
    ColliderWorld, LayerMask, RayHit, StaticCollider, aabb_surface_normal, ray_aabb_intersect,
};
pub use probe::{Bounds, CollisionInfo, CollisionProbe, CollisionState, Direction, RayRange};
pub use types::{Vec2, inverse_lerp, lerp, move_towards};
