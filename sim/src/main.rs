//! Headless driver: runs one character through a scripted level at a fixed tick rate.

mod logging;
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use controller::{
    CameraBasis, CapsuleSpec, ControllerSettings, EdgeDetector, InputLatch, LocomotionController,
    PhysicsWorld, Vec3,
};

use scenario::{SPAWN_HEIGHT, Scenario};

/// Longest frame the accumulator accepts, so a stall cannot trigger a burst of ticks.
const MAX_FRAME_DELTA: f32 = 0.1;

/// Run the character controller against a scripted scenario
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML settings file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Scenario::Flat)]
    scenario: Scenario,

    /// Simulated duration in seconds
    #[arg(long, default_value_t = 6.0)]
    seconds: f32,

    /// Fixed physics rate
    #[arg(long, default_value_t = 50.0)]
    tick_hz: f32,

    /// Variable input sampling rate
    #[arg(long, default_value_t = 144.0)]
    frame_hz: f32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    if !(args.tick_hz > 0.0 && args.frame_hz > 0.0 && args.seconds >= 0.0) {
        bail!("rates must be positive and the duration non-negative");
    }

    let settings = match &args.config {
        Some(path) => ControllerSettings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => ControllerSettings::default(),
    };

    run(&args, settings)
}

fn run(args: &Args, settings: ControllerSettings) -> Result<()> {
    let mut world = PhysicsWorld::build(args.scenario.statics());
    let mut rig = world.spawn_character(
        Vec3::new(0.0, SPAWN_HEIGHT, 0.0),
        CapsuleSpec::default(),
        settings.material.clone(),
    );
    let mut edges = EdgeDetector::new(settings.input.sprint_hold_threshold);
    let mut latch = InputLatch::new();
    let mut controller = LocomotionController::new(settings);
    let camera = CameraBasis::looking_at(Vec3::new(0.0, 3.0, 6.0), Vec3::new(0.0, 1.0, 0.0));

    let fixed_dt = 1.0 / args.tick_hz;
    let frame_dt = (1.0 / args.frame_hz).min(MAX_FRAME_DELTA);
    let log_every = (args.tick_hz.round() as u64).max(1);

    log::info!(
        "scenario {:?}: {}s at {} Hz (frames at {} Hz)",
        args.scenario,
        args.seconds,
        args.tick_hz,
        args.frame_hz
    );

    let mut clock = 0.0_f32;
    let mut accumulator = 0.0_f32;
    let mut ticks = 0_u64;
    let mut cursor_locked = false;
    let mut jumps = 0_u32;
    let mut dashes = 0_u32;
    let mut steps = 0_u32;

    while clock < args.seconds {
        clock += frame_dt;
        let snapshot = edges.sample(&args.scenario.input_at(clock), frame_dt);
        if snapshot.cursor_lock_pressed {
            cursor_locked = !cursor_locked;
            log::info!("cursor {}", if cursor_locked { "locked" } else { "released" });
        }
        latch.push(snapshot);

        accumulator += frame_dt;
        while accumulator >= fixed_dt {
            accumulator -= fixed_dt;
            let input = latch.take();

            let report = {
                let (mut body, scene) = world
                    .character(&mut rig)
                    .context("character body missing from the world")?;
                controller.fixed_update(&mut body, &scene, &input, &camera, fixed_dt)
            };
            world.step(&mut rig, fixed_dt);

            let normals = world.contact_normals(&rig);
            if normals.is_empty() {
                controller.on_contact_end();
            } else {
                controller.on_contact_stay(&normals);
            }

            if let Some(kind) = report.jump {
                jumps += 1;
                log::info!("t={:.2} {kind:?} jump", controller.time());
            }
            if report.dashed {
                dashes += 1;
                log::info!("t={:.2} dash", controller.time());
            }
            if report.stepped_up() {
                steps += 1;
                log::info!("t={:.2} stepped up", controller.time());
            }

            ticks += 1;
            if ticks % log_every == 0 {
                let position = world.position(&rig).unwrap_or_default();
                let velocity = world.velocity(&rig).unwrap_or_default();
                log::info!(
                    "t={:.2} pos=({:.2}, {:.2}, {:.2}) speed={:.2} vy={:.2} grounded={} wall={} material={:?} friction={:.2}",
                    controller.time(),
                    position.x,
                    position.y,
                    position.z,
                    velocity.xz().norm(),
                    velocity.y,
                    report.ground.is_grounded,
                    report.on_wall,
                    report.material,
                    world.friction(&rig).unwrap_or_default(),
                );
            }
        }
    }

    let position = world.position(&rig).unwrap_or_default();
    log::info!(
        "done after {ticks} ticks: {jumps} jump(s), {dashes} dash(es), {steps} step-up(s), final position ({:.2}, {:.2}, {:.2})",
        position.x,
        position.y,
        position.z
    );
    Ok(())
}
