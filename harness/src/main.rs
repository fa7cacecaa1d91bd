//! Headless locomotion harness.
//!
//! Builds a small Rapier level (ground plane plus a block with a ledge), then drives a
//! `PlayerController` through a scripted input timeline at a fixed tick:
//!
//! - walk forward into the block
//! - jump, grab the ledge on the way down
//! - shimmy right along the ledge, then idle
//!
//! ```bash
//! RUST_LOG=debug cargo run -p harness -- --frames 240 --hz 60
//! cargo run -p harness -- --settings locomotion.toml
//! ```

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use locomotion::{
    ArmIk, AnimatorParams, CapsuleSpec, ColliderShapeDef, Collaborators, Hand,
    IS_ABOVE_GROUND_PARAM, LocomotionSettings, LocomotionStateId, MovementIntent, PlanarCamera,
    PlayerController, RapierMover, RapierQueryWorld, SPEED_PARAM, Surface, TARGET_FRAME_RATE, Vec3,
    WorldStaticDef,
};
use nalgebra::vector;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "harness")]
#[command(about = "Drive the locomotion controller through a scripted level")]
struct Args {
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Simulation rate (frames per second).
    #[arg(long, default_value_t = TARGET_FRAME_RATE)]
    hz: f32,

    /// Optional TOML settings file; defaults are used otherwise.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log a summary line every N frames.
    #[arg(long, default_value_t = 10)]
    log_every: u32,
}

/// Scripted input for one frame.
struct FrameScript {
    intent: MovementIntent,
    jump: bool,
}

fn script(frame: u32) -> FrameScript {
    let intent = match frame {
        0..120 => MovementIntent::new(0.0, 1.0),
        150..200 => MovementIntent::new(1.0, 0.0),
        _ => MovementIntent::default(),
    };
    FrameScript {
        intent,
        jump: frame == 45,
    }
}

fn build_level() -> RapierQueryWorld {
    RapierQueryWorld::build(vec![
        WorldStaticDef::new(
            1,
            vector![0.0, 0.0, 0.0],
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
            Surface::Ground,
        ),
        // Top at y = 2.6, climbable face at z = -3.
        WorldStaticDef::new(
            2,
            vector![0.0, 1.3, -4.0],
            ColliderShapeDef::Cuboid {
                half_extents: vector![2.0, 1.3, 1.0],
            },
            Surface::Ground,
        ),
        // Decorative pillar: blocks movement, never grabbed.
        WorldStaticDef::new(
            3,
            vector![4.0, 1.0, -1.0],
            ColliderShapeDef::CylinderY {
                radius: 0.4,
                half_height: 1.0,
            },
            Surface::Prop,
        ),
    ])
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<LocomotionSettings> {
    match path {
        Some(path) => LocomotionSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(LocomotionSettings::default()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    if !(args.hz.is_finite() && args.hz > 0.0) {
        bail!("--hz must be a positive number, got {}", args.hz);
    }
    let dt = 1.0 / args.hz;
    let log_every = args.log_every.max(1);

    let settings = load_settings(args.settings.as_ref())?;
    let capsule: CapsuleSpec = settings.capsule;
    let world = build_level();

    let mut controller = PlayerController::new(settings).context("invalid settings")?;
    let camera = PlanarCamera::default();
    let mut mover = RapierMover::new(&world, capsule);
    let mut animator = AnimatorParams::default();
    let mut ik = ArmIk::new(
        &settings.ik,
        Vec3::new(-0.25, 1.0, 0.0),
        Vec3::new(0.25, 1.0, 0.0),
    );

    log::info!(
        "running {} frames at {} Hz (dt={dt:.4})",
        args.frames,
        args.hz
    );

    let mut last_state = controller.state();
    for frame in 0..args.frames {
        let input = script(frame);
        controller.set_movement_intent(input.intent);
        if input.jump {
            controller.jump(1.0);
        }

        let mut rig = Collaborators {
            scene: &world,
            camera: &camera,
            mover: &mut mover,
            animator: &mut animator,
            ik: &mut ik,
        };
        controller.update(dt, &mut rig);

        let transform = *controller.transform();
        if controller.state() == LocomotionStateId::Hanging {
            // Reach both hands toward the wall from their hang-pose targets.
            for (hand, local) in [
                (Hand::Left, settings.ik.left_hang_target),
                (Hand::Right, settings.ik.right_hang_target),
            ] {
                let origin = transform.position + transform.rotation * local;
                ik.hand_grab(hand, &world, origin, transform.forward());
            }
        }

        let state = controller.state();
        if state != last_state {
            log::info!(
                "frame {frame}: {last_state:?} -> {state:?} at {:?}",
                transform.position
            );
            last_state = state;
        }

        if frame % log_every == 0 {
            let facts = controller.facts();
            log::info!(
                "frame {frame:>4} {state:?} pos=({:.2}, {:.2}, {:.2}) vf={:.2} airborne={} \
                 speed={:.2} above_ground={:?} ik={:.0}",
                transform.position.x,
                transform.position.y,
                transform.position.z,
                facts.vertical_force,
                facts.is_airborne,
                animator.float(SPEED_PARAM).unwrap_or(0.0),
                animator.bool(IS_ABOVE_GROUND_PARAM),
                ik.weight(),
            );
        }
    }

    let transform = controller.transform();
    log::info!(
        "finished in {:?} at {:?} (left hand {:?}, right hand {:?})",
        controller.state(),
        transform.position,
        ik.target(Hand::Left),
        ik.target(Hand::Right),
    );

    Ok(())
}
