//! Input Module
//!
//! Platform-agnostic input handling for the character controller. This
//! module is decoupled from any specific windowing system: the host maps
//! its own device events onto [`ControlKey`]s (or an analog axis) and the
//! sampler turns them into immutable per-tick snapshots.
//!
//! # Example
//!
//! ```ignore
//! use rayrunner_engine::input::{ControlKey, InputSampler};
//!
//! let mut sampler = InputSampler::new();
//!
//! // As device events arrive:
//! sampler.handle_key(ControlKey::MoveRight, true);
//! sampler.handle_key(ControlKey::Jump, true);
//!
//! // Once per tick:
//! let input = sampler.sample();
//! assert!(input.jump_down);
//! ```

pub mod buttons;
pub mod sampler;

// Re-export commonly used types at module level
pub use buttons::{ButtonState, ControlKey};
pub use sampler::{FrameInput, InputSampler};
