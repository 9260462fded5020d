//! Controller Sandbox - Headless Simulation
//!
//! Run with: `cargo run --bin controller_sandbox`
//!
//! Drives one character through a scripted input tape on a small test
//! level and logs controller state and events. Useful for eyeballing the
//! jump feel numbers (coyote window, buffer, apex bonus) after a tuning
//! change, without wiring up a renderer.
//!
//! Usage:
//!   cargo run --bin controller_sandbox -- [--ticks 600] [--hz 100] [--config tuning.json]
//!
//! The tape: run right, hop onto the platform, cut the second jump short,
//! then keep running until the far wall stops the character.

use std::env;
use std::path::PathBuf;

use glam::Vec2;
use rayrunner_engine::{
    ColliderWorld, ControlKey, ControllerConfig, ControllerObserver, PlayerController,
};
use tracing::info;

struct SandboxArgs {
    ticks: u32,
    hz: u32,
    config: Option<PathBuf>,
}

fn parse_args() -> SandboxArgs {
    let mut parsed = SandboxArgs {
        ticks: 600,
        hz: 100,
        config: None,
    };
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--ticks" if i + 1 < args.len() => {
                parsed.ticks = args[i + 1].parse().unwrap_or(600);
                i += 2;
            }
            "--hz" if i + 1 < args.len() => {
                parsed.hz = args[i + 1].parse().unwrap_or(100);
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                parsed.config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            other => {
                eprintln!("unknown argument: {other}");
                i += 1;
            }
        }
    }
    parsed
}

/// Logs every controller event as it is delivered.
struct EventLogger;

impl ControllerObserver for EventLogger {
    fn on_jumped(&mut self) {
        info!("event: jumped");
    }

    fn on_grounded_changed(&mut self, grounded: bool, impact_speed: f32) {
        info!(grounded, impact_speed, "event: grounded changed");
    }
}

/// Floor, a platform to hop onto, and a wall that ends the run.
fn build_level() -> ColliderWorld {
    let mut world = ColliderWorld::new();
    world.add_ground(Vec2::new(-50.0, -10.0), Vec2::new(50.0, 0.0));
    world.add_ground(Vec2::new(9.0, 0.0), Vec2::new(16.0, 1.5));
    world.add_ground(Vec2::new(20.0, 0.0), Vec2::new(22.0, 12.0));
    world
}

/// The scripted input tape, keyed by simulation time.
fn apply_tape(controller: &mut PlayerController, time: f32, dt: f32) {
    let input = controller.input_mut();

    // Run right the whole way.
    if time < dt * 1.5 {
        input.handle_key(ControlKey::MoveRight, true);
    }

    // First hop, toward the platform. Held long enough for full height.
    if at(time, 0.50, dt) {
        input.handle_key(ControlKey::Jump, true);
    }
    if at(time, 0.80, dt) {
        input.handle_key(ControlKey::Jump, false);
    }

    // Second hop, cut short to show the variable jump height.
    if at(time, 1.60, dt) {
        input.handle_key(ControlKey::Jump, true);
    }
    if at(time, 1.67, dt) {
        input.handle_key(ControlKey::Jump, false);
    }
}

/// True on the single tick containing `mark`.
fn at(time: f32, mark: f32, dt: f32) -> bool {
    time >= mark && time < mark + dt
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args();
    let dt = 1.0 / args.hz as f32;

    let config = match &args.config {
        Some(path) => match ControllerConfig::load_json(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("failed to load {}: {err}", path.display());
                std::process::exit(1);
            }
        },
        None => ControllerConfig::default(),
    };

    let world = build_level();
    let mut controller = PlayerController::new(config, Vec2::new(0.0, 1.005));
    controller.subscribe(Box::new(EventLogger));

    info!(ticks = args.ticks, hz = args.hz, "sandbox start");

    let report_every = (args.hz / 4).max(1);
    for tick in 0..args.ticks {
        let time = controller.time();
        apply_tape(&mut controller, time, dt);
        controller.tick(&world, dt);

        if tick % report_every == 0 {
            let position = controller.position();
            let movement = controller.raw_movement();
            info!(
                time = controller.time(),
                x = position.x,
                y = position.y,
                speed_x = movement.x,
                speed_y = movement.y,
                grounded = controller.grounded(),
                "tick"
            );
        }
    }

    let position = controller.position();
    info!(
        x = position.x,
        y = position.y,
        grounded = controller.grounded(),
        "sandbox done"
    );
}
