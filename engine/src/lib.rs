//! Rayrunner Engine Library
//!
//! A 2D platformer character controller built on a custom kinematic
//! movement model. No external physics library: collision detection is
//! done with fans of short rays cast from each edge of the character's
//! bounding box against a set of static axis-aligned colliders.
//!
//! The controller implements the full platformer feel kit: per-tick
//! acceleration and linear decay, coyote time, jump buffering, variable
//! jump height via early release, and apex-tuned fall speed.
//!
//! # Modules
//!
//! - [`input`] - Platform-agnostic input sampling (axis + jump edges)
//! - [`physics`] - Ray casting substrate and bounding-box edge probing
//! - [`player`] - The motion solver and the player controller facade
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec2;
//! use rayrunner_engine::{ColliderWorld, ControlKey, ControllerConfig, PlayerController};
//!
//! // A level: one deep ground slab.
//! let mut world = ColliderWorld::new();
//! world.add_ground(Vec2::new(-50.0, -10.0), Vec2::new(50.0, 0.0));
//!
//! let mut player = PlayerController::new(ControllerConfig::default(), Vec2::new(0.0, 1.0));
//!
//! // Each fixed tick:
//! player.input_mut().handle_key(ControlKey::MoveRight, true);
//! player.tick(&world, 1.0 / 60.0);
//! let position = player.position();
//! ```

pub mod input;
pub mod physics;
pub mod player;

// Re-export commonly used types at crate level for convenience
pub use input::{ButtonState, ControlKey, FrameInput, InputSampler};
pub use physics::{
    Bounds, ColliderWorld, CollisionInfo, CollisionProbe, CollisionState, Direction, LayerMask,
    RayHit, RayRange, StaticCollider,
};
pub use player::{
    ControllerConfig, ControllerEvent, ControllerObserver, MotionState, ObserverHandle,
    PlayerController,
};
