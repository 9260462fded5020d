//! Motion solver
//!
//! The per-tick state machine that turns an input snapshot and the edge
//! probe results into new horizontal and vertical speeds. The governing
//! branches: grounded, airborne rising, airborne falling, the coyote
//! window after walking off a ledge, and a pending buffered jump.
//!
//! Each tick the controller runs the four phases in a fixed order:
//!
//! 1. walk (horizontal accel/decay + wall overrides)
//! 2. jump apex tracking (affects fall speed, so before gravity)
//! 3. gravity (vertical accel + terminal clamp)
//! 4. jump decision (may override vertical; ceiling correction)
//!
//! The solver owns the controller's entire persistent memory, a single
//! [`MotionState`] rewritten every tick.

use tracing::debug;

use crate::input::sampler::FrameInput;
use crate::physics::probe::CollisionState;
use crate::physics::types::{inverse_lerp, lerp, move_towards};
use crate::player::config::ControllerConfig;

// ============================================================================
// STATE
// ============================================================================

/// Persistent movement state, created once and rewritten every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    /// Resolved horizontal speed in m/s. Always within the move clamp.
    pub horizontal_speed: f32,
    /// Resolved vertical speed in m/s. Never below the fall clamp except
    /// on the tick a jump impulse overrides it.
    pub vertical_speed: f32,
    /// 0 while grounded, ramps to 1 at the peak of a jump.
    pub apex_point: f32,
    /// Current fall acceleration, retuned every airborne tick from the
    /// apex point.
    pub fall_speed: f32,
    /// The current jump was cut short by releasing the button.
    pub ended_jump_early: bool,
    /// A ledge jump is still available. Armed on landing, consumed by
    /// jumping.
    pub coyote_usable: bool,
    /// Timestamp of the moment ground contact was lost. `f32::MIN` means
    /// invalidated (a jump consumed it).
    pub time_left_grounded: f32,
    /// Timestamp of the most recent jump press. Single slot: a rapid
    /// double-tap before landing keeps only the later press.
    pub last_jump_pressed: f32,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            horizontal_speed: 0.0,
            vertical_speed: 0.0,
            apex_point: 0.0,
            fall_speed: 0.0,
            ended_jump_early: true,
            coyote_usable: false,
            time_left_grounded: f32::MIN,
            last_jump_pressed: f32::MIN,
        }
    }
}

// ============================================================================
// SOLVER
// ============================================================================

/// Runs the walk / apex / gravity / jump phases over a [`MotionState`].
#[derive(Debug, Clone, Default)]
pub struct MotionSolver {
    state: MotionState,
}

impl MotionSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the persistent state.
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Mutable access for the controller's bookkeeping (grounding
    /// timestamps, buffered press recording).
    pub fn state_mut(&mut self) -> &mut MotionState {
        &mut self.state
    }

    /// Phase 1: horizontal movement.
    ///
    /// Held input accelerates per tick toward the input direction, clamped
    /// to the move clamp, then earns the apex bonus (the reward for
    /// steering at the top of a jump; the apex point here is last tick's,
    /// since apex tracking runs after walk). No input decays linearly to a
    /// stop. Wall contact overrides everything: overlap forces an escape
    /// push away from the wall, mere contact in the direction of travel
    /// zeroes the speed.
    pub fn calculate_walk(
        &mut self,
        input: &FrameInput,
        collisions: &CollisionState,
        config: &ControllerConfig,
    ) {
        let state = &mut self.state;

        if input.x != 0.0 {
            state.horizontal_speed += input.x * config.acceleration;
            state.horizontal_speed =
                state.horizontal_speed.clamp(-config.move_clamp, config.move_clamp);

            let apex_bonus = input.x.signum() * config.apex_bonus * state.apex_point;
            state.horizontal_speed = (state.horizontal_speed + apex_bonus)
                .clamp(-config.move_clamp, config.move_clamp);
        } else {
            state.horizontal_speed =
                move_towards(state.horizontal_speed, 0.0, config.de_acceleration);
        }

        // Escape walls
        if collisions.right.inside {
            state.horizontal_speed = -config.obstacle_escape_speed;
        } else if collisions.left.inside {
            state.horizontal_speed = config.obstacle_escape_speed;
        } else if (state.horizontal_speed > 0.0 && collisions.right.colliding)
            || (state.horizontal_speed < 0.0 && collisions.left.colliding)
        {
            // Don't walk through walls
            state.horizontal_speed = 0.0;
        }
    }

    /// Phase 2: apex tracking.
    ///
    /// While airborne the apex point ramps from 0 to 1 as the vertical
    /// velocity magnitude shrinks below the apex threshold, and the fall
    /// acceleration is retuned between its min and max accordingly. Uses
    /// the derived velocity (last tick's actual position delta), not the
    /// resolved speed.
    pub fn calculate_jump_apex(
        &mut self,
        collisions: &CollisionState,
        vertical_velocity: f32,
        config: &ControllerConfig,
    ) {
        if !collisions.down.colliding {
            // Gets stronger the closer to the top of the jump
            self.state.apex_point =
                inverse_lerp(config.jump_apex_threshold, 0.0, vertical_velocity.abs());
            self.state.fall_speed =
                lerp(config.min_fall_speed, config.max_fall_speed, self.state.apex_point);
        } else {
            self.state.apex_point = 0.0;
        }
    }

    /// Phase 3: gravity.
    ///
    /// Grounded: zero the vertical speed, or push upward out of the floor
    /// when overlapping it. Airborne: accelerate downward at the current
    /// fall speed, clamped at the terminal fall speed.
    pub fn calculate_gravity(
        &mut self,
        collisions: &CollisionState,
        config: &ControllerConfig,
        dt: f32,
    ) {
        let state = &mut self.state;

        if collisions.down.colliding {
            if collisions.down.inside {
                // Move out of the ground
                state.vertical_speed = config.obstacle_escape_speed;
            } else {
                state.vertical_speed = 0.0;
            }
        } else {
            state.vertical_speed -= state.fall_speed * dt;

            if state.vertical_speed < config.fall_clamp {
                state.vertical_speed = config.fall_clamp;
            }
        }
    }

    /// Phase 4: jump decision, early release, and ceiling correction.
    ///
    /// A jump triggers on a press while grounded or within the coyote
    /// window, or on landing with a banked buffered press. The impulse
    /// replaces the vertical speed outright. Releasing the button on the
    /// way up zeroes the vertical speed once per jump. Ceiling contact
    /// clamps upward speed; ceiling overlap forces a downward escape.
    ///
    /// Returns `true` on the tick a jump impulse was applied.
    pub fn calculate_jump(
        &mut self,
        input: &FrameInput,
        collisions: &CollisionState,
        config: &ControllerConfig,
        now: f32,
        vertical_velocity: f32,
    ) -> bool {
        let grounded = collisions.down.colliding;

        let jumped = if (input.jump_down && (grounded || self.can_use_coyote(grounded, config, now)))
            || self.has_buffered_jump(grounded, config, now)
        {
            self.state.vertical_speed = config.jump_height;
            self.state.ended_jump_early = false;
            self.state.coyote_usable = false;
            self.state.time_left_grounded = f32::MIN;
            debug!(time = now, grounded, "jump impulse applied");
            true
        } else {
            false
        };

        // End the jump early if the button was released on the way up
        if !grounded && input.jump_up && !self.state.ended_jump_early && vertical_velocity > 0.0 {
            self.state.vertical_speed = 0.0;
            self.state.ended_jump_early = true;
            debug!(time = now, "jump ended early");
        }

        if collisions.up.colliding {
            if self.state.vertical_speed > 0.0 {
                self.state.vertical_speed = 0.0;
            }
            if collisions.up.inside {
                self.state.vertical_speed = -config.obstacle_escape_speed;
            }
        }

        jumped
    }

    /// A ledge jump is allowed while the coyote flag is armed, the
    /// character is airborne, and the coyote window since leaving the
    /// ground has not elapsed.
    fn can_use_coyote(&self, grounded: bool, config: &ControllerConfig, now: f32) -> bool {
        self.state.coyote_usable
            && !grounded
            && self.state.time_left_grounded + config.coyote_time_threshold > now
    }

    /// A banked jump press fires on landing while still within the buffer
    /// window.
    fn has_buffered_jump(&self, grounded: bool, config: &ControllerConfig, now: f32) -> bool {
        grounded && self.state.last_jump_pressed + config.jump_buffer > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::probe::CollisionInfo;

    const COLLIDING: CollisionInfo = CollisionInfo {
        colliding: true,
        inside: false,
    };
    const INSIDE: CollisionInfo = CollisionInfo {
        colliding: true,
        inside: true,
    };

    fn grounded_state() -> CollisionState {
        CollisionState {
            down: COLLIDING,
            ..Default::default()
        }
    }

    fn airborne_state() -> CollisionState {
        CollisionState::default()
    }

    fn input_x(x: f32) -> FrameInput {
        FrameInput {
            x,
            ..FrameInput::NEUTRAL
        }
    }

    #[test]
    fn test_walk_clamps_to_move_clamp() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();

        for _ in 0..10 {
            solver.calculate_walk(&input_x(1.0), &airborne_state(), &config);
            assert!(solver.state().horizontal_speed.abs() <= config.move_clamp);
        }
        assert_eq!(solver.state().horizontal_speed, config.move_clamp);
    }

    #[test]
    fn test_walk_decay_is_monotonic_and_linear() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();
        solver.state_mut().horizontal_speed = 2.0;

        let mut prev: f32 = 2.0;
        let mut steps = 0;
        while solver.state().horizontal_speed != 0.0 {
            solver.calculate_walk(&FrameInput::NEUTRAL, &airborne_state(), &config);
            let speed = solver.state().horizontal_speed;
            assert!(speed.abs() <= prev.abs(), "decay must never speed up");
            prev = speed;
            steps += 1;
            assert!(steps < 100, "decay must terminate");
        }
        // 2.0 / 0.3 per tick
        assert_eq!(steps, 7);
    }

    #[test]
    fn test_wall_contact_blocks_travel_direction_only() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();

        let mut collisions = grounded_state();
        collisions.right = COLLIDING;

        solver.calculate_walk(&input_x(1.0), &collisions, &config);
        assert_eq!(solver.state().horizontal_speed, 0.0);

        // Moving away from the wall is unaffected.
        solver.calculate_walk(&input_x(-1.0), &collisions, &config);
        assert!(solver.state().horizontal_speed < 0.0);
    }

    #[test]
    fn test_wall_overlap_forces_escape_speed() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();

        let mut collisions = airborne_state();
        collisions.right = INSIDE;
        solver.calculate_walk(&input_x(1.0), &collisions, &config);
        assert_eq!(solver.state().horizontal_speed, -config.obstacle_escape_speed);

        let mut collisions = airborne_state();
        collisions.left = INSIDE;
        solver.calculate_walk(&input_x(-1.0), &collisions, &config);
        assert_eq!(solver.state().horizontal_speed, config.obstacle_escape_speed);
    }

    #[test]
    fn test_apex_point_zero_when_grounded() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();
        solver.state_mut().apex_point = 0.7;

        solver.calculate_jump_apex(&grounded_state(), 0.0, &config);
        assert_eq!(solver.state().apex_point, 0.0);
    }

    #[test]
    fn test_apex_point_peaks_at_zero_velocity() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();

        solver.calculate_jump_apex(&airborne_state(), 0.0, &config);
        assert_eq!(solver.state().apex_point, 1.0);
        assert_eq!(solver.state().fall_speed, config.max_fall_speed);

        solver.calculate_jump_apex(&airborne_state(), 30.0, &config);
        assert_eq!(solver.state().apex_point, 0.0);
        assert_eq!(solver.state().fall_speed, config.min_fall_speed);

        solver.calculate_jump_apex(&airborne_state(), -5.0, &config);
        assert_eq!(solver.state().apex_point, 0.5);
        assert_eq!(solver.state().fall_speed, 100.0);
    }

    #[test]
    fn test_gravity_clamps_at_terminal_speed() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();
        solver.state_mut().fall_speed = config.max_fall_speed;

        for _ in 0..100 {
            solver.calculate_gravity(&airborne_state(), &config, 0.016);
            assert!(solver.state().vertical_speed >= config.fall_clamp);
        }
        assert_eq!(solver.state().vertical_speed, config.fall_clamp);
    }

    #[test]
    fn test_gravity_snaps_to_zero_on_ground() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();
        solver.state_mut().vertical_speed = -12.0;

        solver.calculate_gravity(&grounded_state(), &config, 0.016);
        assert_eq!(solver.state().vertical_speed, 0.0);
    }

    #[test]
    fn test_gravity_escapes_when_inside_ground() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();

        let mut collisions = CollisionState::default();
        collisions.down = INSIDE;
        solver.calculate_gravity(&collisions, &config, 0.016);
        assert_eq!(solver.state().vertical_speed, config.obstacle_escape_speed);
    }

    #[test]
    fn test_grounded_jump_applies_impulse() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();

        let input = FrameInput {
            jump_down: true,
            jump_held: true,
            ..FrameInput::NEUTRAL
        };
        let jumped = solver.calculate_jump(&input, &grounded_state(), &config, 1.0, 0.0);
        assert!(jumped);
        assert_eq!(solver.state().vertical_speed, config.jump_height);
        assert!(!solver.state().ended_jump_early);
        assert!(!solver.state().coyote_usable);
        assert_eq!(solver.state().time_left_grounded, f32::MIN);
    }

    #[test]
    fn test_airborne_press_without_coyote_does_not_jump() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();

        let input = FrameInput {
            jump_down: true,
            jump_held: true,
            ..FrameInput::NEUTRAL
        };
        let jumped = solver.calculate_jump(&input, &airborne_state(), &config, 1.0, -3.0);
        assert!(!jumped);
        assert_eq!(solver.state().vertical_speed, 0.0);
    }

    #[test]
    fn test_coyote_window_gates_on_time() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();
        solver.state_mut().coyote_usable = true;
        solver.state_mut().time_left_grounded = 1.0;

        let input = FrameInput {
            jump_down: true,
            jump_held: true,
            ..FrameInput::NEUTRAL
        };

        // Within the window.
        assert!(solver.calculate_jump(&input, &airborne_state(), &config, 1.05, -2.0));

        // Reset and try after the window.
        let mut solver = MotionSolver::new();
        solver.state_mut().coyote_usable = true;
        solver.state_mut().time_left_grounded = 1.0;
        assert!(!solver.calculate_jump(&input, &airborne_state(), &config, 1.15, -2.0));
    }

    #[test]
    fn test_buffered_jump_fires_on_landing_only_within_window() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();
        solver.state_mut().last_jump_pressed = 1.0;

        // Landed at 1.05: within the buffer, no press this tick.
        assert!(solver.calculate_jump(&FrameInput::NEUTRAL, &grounded_state(), &config, 1.05, -4.0));

        let mut solver = MotionSolver::new();
        solver.state_mut().last_jump_pressed = 1.0;
        assert!(!solver.calculate_jump(&FrameInput::NEUTRAL, &grounded_state(), &config, 1.15, -4.0));
    }

    #[test]
    fn test_early_release_zeroes_upward_speed_once() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();
        solver.state_mut().vertical_speed = 20.0;
        solver.state_mut().ended_jump_early = false;

        let release = FrameInput {
            jump_up: true,
            ..FrameInput::NEUTRAL
        };
        solver.calculate_jump(&release, &airborne_state(), &config, 1.0, 20.0);
        assert_eq!(solver.state().vertical_speed, 0.0);
        assert!(solver.state().ended_jump_early);

        // A second release does nothing further.
        solver.state_mut().vertical_speed = 5.0;
        solver.calculate_jump(&release, &airborne_state(), &config, 1.1, 5.0);
        assert_eq!(solver.state().vertical_speed, 5.0);
    }

    #[test]
    fn test_ceiling_contact_clamps_upward_speed() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();
        solver.state_mut().vertical_speed = 12.0;

        let mut collisions = airborne_state();
        collisions.up = COLLIDING;
        solver.calculate_jump(&FrameInput::NEUTRAL, &collisions, &config, 1.0, 12.0);
        assert_eq!(solver.state().vertical_speed, 0.0);
    }

    #[test]
    fn test_ceiling_overlap_forces_downward_escape() {
        let config = ControllerConfig::default();
        let mut solver = MotionSolver::new();
        solver.state_mut().vertical_speed = 12.0;

        let mut collisions = airborne_state();
        collisions.up = INSIDE;
        solver.calculate_jump(&FrameInput::NEUTRAL, &collisions, &config, 1.0, 12.0);
        assert_eq!(solver.state().vertical_speed, -config.obstacle_escape_speed);
    }
}
