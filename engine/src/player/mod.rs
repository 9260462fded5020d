//! Player Module
//!
//! The character controller proper: configuration, the motion solver
//! state machine, the controller facade, and the observer surface.
//!
//! # Components
//!
//! - [`PlayerController`] - The per-tick pipeline facade (probe, solve,
//!   integrate) with published state and events
//! - [`MotionSolver`] / [`MotionState`] - The walk / apex / gravity / jump
//!   state machine and its persistent memory
//! - [`ControllerConfig`] - All tunables, with validation and JSON
//!   persistence
//! - [`ControllerObserver`] - Subscription surface for presentation
//!   layers (animation, particles, audio)

pub mod config;
pub mod controller;
pub mod events;
pub mod motion;

pub use config::{ConfigError, ConfigFileError, ControllerConfig};
pub use controller::{MAX_TICK_DT, MIN_TICK_DT, PlayerController};
pub use events::{ControllerEvent, ControllerObserver, ObserverHandle};
pub use motion::{MotionSolver, MotionState};
