//! Player controller facade
//!
//! Owns the whole per-character pipeline and runs it once per fixed tick:
//!
//! 1. derive the published velocity from the last position delta
//! 2. sample input
//! 3. probe the bounding-box edges and track grounding transitions
//! 4. solve motion (walk, apex, gravity, jump)
//! 5. integrate the resolved speeds into the position
//! 6. deliver queued events to observers
//!
//! Integration is purely additive: collision avoidance happens by zeroing
//! speed components in the solver before this step, never by sweeping the
//! displacement. A fast enough character can therefore pass through thin
//! geometry in one tick; that is an accepted tradeoff of the ray-probe
//! model.

use glam::Vec2;
use tracing::{debug, trace};

use crate::input::sampler::{FrameInput, InputSampler};
use crate::physics::collision::ColliderWorld;
use crate::physics::probe::{CollisionState, RayRange};
use crate::player::config::ControllerConfig;
use crate::player::events::{ControllerEvent, ControllerObserver, ObserverHandle, ObserverSet};
use crate::player::motion::{MotionSolver, MotionState};

/// Shortest tick the controller will simulate, in seconds.
pub const MIN_TICK_DT: f32 = 0.0001;

/// Longest tick the controller will simulate, in seconds. Longer frame
/// times are clamped so a hitch cannot launch the character.
pub const MAX_TICK_DT: f32 = 0.1;

/// The character controller: input sampling, edge probing, motion solving
/// and integration behind one `tick` call.
///
/// One instance per actor; instances share nothing. The world is borrowed
/// per tick, so many controllers can be simulated against the same level.
#[derive(Debug)]
pub struct PlayerController {
    config: ControllerConfig,
    sampler: InputSampler,
    solver: MotionSolver,
    collisions: CollisionState,

    position: Vec2,
    last_position: Vec2,
    velocity: Vec2,
    frame_input: FrameInput,
    time: f32,

    jumped_this_frame: bool,
    landing_this_frame: bool,

    pending_events: Vec<ControllerEvent>,
    observers: ObserverSet,
}

impl PlayerController {
    /// Create a controller at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails validation; a degenerate configuration is
    /// a programming error and must not reach the simulation.
    pub fn new(config: ControllerConfig, position: Vec2) -> Self {
        config.assert_valid();
        Self {
            config,
            sampler: InputSampler::new(),
            solver: MotionSolver::new(),
            collisions: CollisionState::default(),
            position,
            last_position: position,
            velocity: Vec2::ZERO,
            frame_input: FrameInput::NEUTRAL,
            time: 0.0,
            jumped_this_frame: false,
            landing_this_frame: false,
            pending_events: Vec::new(),
            observers: ObserverSet::new(),
        }
    }

    /// Advance the simulation by one tick of `dt` seconds against the
    /// given level geometry.
    pub fn tick(&mut self, world: &ColliderWorld, dt: f32) {
        let dt = dt.clamp(MIN_TICK_DT, MAX_TICK_DT);
        self.time += dt;
        let now = self.time;

        // The published velocity is the position delta the previous tick
        // actually produced, not the resolved speeds.
        self.velocity = (self.position - self.last_position) / dt;
        self.last_position = self.position;

        self.frame_input = self.sampler.sample();
        if self.frame_input.jump_down {
            self.solver.state_mut().last_jump_pressed = now;
        }

        self.run_collision_checks(world, now);

        self.solver
            .calculate_walk(&self.frame_input, &self.collisions, &self.config);
        // Affects fall speed, so apex runs before gravity.
        self.solver
            .calculate_jump_apex(&self.collisions, self.velocity.y, &self.config);
        self.solver
            .calculate_gravity(&self.collisions, &self.config, dt);
        self.jumped_this_frame = self.solver.calculate_jump(
            &self.frame_input,
            &self.collisions,
            &self.config,
            now,
            self.velocity.y,
        );
        if self.jumped_this_frame {
            self.pending_events.push(ControllerEvent::Jumped);
        }

        let state = self.solver.state();
        self.position += Vec2::new(state.horizontal_speed, state.vertical_speed) * dt;

        let events = std::mem::take(&mut self.pending_events);
        self.observers.dispatch(&events);
    }

    /// Probe the edges and track down-edge transitions.
    ///
    /// The coyote clock starts the tick contact is first lost, and the
    /// coyote flag re-arms the tick contact is first made. Both fire on
    /// the transition only: re-arming continuously while grounded would
    /// let the coyote window never expire.
    fn run_collision_checks(&mut self, world: &ColliderWorld, now: f32) {
        let probe = self.config.probe();
        let next = probe.probe(
            world,
            self.position,
            &self.config.character_bounds,
            self.config.ground_mask,
        );

        let was_grounded = self.collisions.down.colliding;
        let grounded = next.down.colliding;
        self.landing_this_frame = false;

        if was_grounded && !grounded {
            self.solver.state_mut().time_left_grounded = now;
            self.pending_events.push(ControllerEvent::GroundedChanged {
                grounded: false,
                impact_speed: 0.0,
            });
            trace!(time = now, "left ground");
        } else if !was_grounded && grounded {
            self.solver.state_mut().coyote_usable = true;
            self.landing_this_frame = true;
            let impact_speed = self.solver.state().vertical_speed.abs();
            self.pending_events.push(ControllerEvent::GroundedChanged {
                grounded: true,
                impact_speed,
            });
            debug!(time = now, impact_speed, "landed");
        }

        self.collisions = next;
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// The input sampler, for feeding device state between ticks.
    pub fn input_mut(&mut self) -> &mut InputSampler {
        &mut self.sampler
    }

    // ------------------------------------------------------------------
    // Published state
    // ------------------------------------------------------------------

    /// Position delta per second over the previous tick.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// The input snapshot the current tick consumed.
    pub fn frame_input(&self) -> FrameInput {
        self.frame_input
    }

    /// The resolved per-axis speeds about to be integrated, before any
    /// position change. Useful for animation blending.
    pub fn raw_movement(&self) -> Vec2 {
        let state = self.solver.state();
        Vec2::new(state.horizontal_speed, state.vertical_speed)
    }

    /// True only on the tick a jump impulse was applied.
    pub fn jumped_this_frame(&self) -> bool {
        self.jumped_this_frame
    }

    /// True only on the tick ground contact was re-acquired.
    pub fn landing_this_frame(&self) -> bool {
        self.landing_this_frame
    }

    /// Current down-edge contact state.
    pub fn grounded(&self) -> bool {
        self.collisions.down.colliding
    }

    /// Current world position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleport. Also resets the velocity derivation so the next tick
    /// does not see the jump in position as motion.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.last_position = position;
    }

    /// Seconds of simulated time accumulated so far.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// The most recent edge probe results.
    pub fn collisions(&self) -> &CollisionState {
        &self.collisions
    }

    /// The persistent motion state, for diagnostics and tests.
    pub fn motion_state(&self) -> &MotionState {
        self.solver.state()
    }

    /// The probing edges at the current position, for debug overlays.
    pub fn ray_ranges(&self) -> [RayRange; 4] {
        self.config
            .probe()
            .ray_ranges(self.position, &self.config.character_bounds)
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// The active configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Replace the configuration at runtime.
    ///
    /// # Panics
    ///
    /// Panics if the new configuration fails validation.
    pub fn set_config(&mut self, config: ControllerConfig) {
        config.assert_valid();
        self.config = config;
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Subscribe an observer to the controller's events.
    pub fn subscribe(&mut self, observer: Box<dyn ControllerObserver>) -> ObserverHandle {
        self.observers.subscribe(observer)
    }

    /// Unsubscribe an observer, returning it to the caller.
    pub fn unsubscribe(&mut self, handle: ObserverHandle) -> Option<Box<dyn ControllerObserver>> {
        self.observers.unsubscribe(handle)
    }

    /// Number of subscribed observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
