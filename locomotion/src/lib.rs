pub mod airborne;
pub mod capability;
pub mod constants;
pub mod controller;
pub mod ik;
pub mod rapier_world;
pub mod sensor;
pub mod settings;
pub mod state;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use airborne::{AirborneTask, TaskStatus};
pub use capability::{
    AnimationSink, AnimatorParams, CameraBasis, Collaborators, IkRig, KinematicMover,
    PlanarCamera, ProbeHit, SceneQuery,
};
pub use constants::{
    DIST_EPS, HANG_SPEED_PARAM, HEADING_EPS, IS_ABOVE_GROUND_PARAM, IS_HANGING_PARAM,
    SPEED_PARAM, TARGET_FRAME_RATE,
};
pub use controller::PlayerController;
pub use ik::{ArmIk, ArmTarget, Hand};
pub use rapier_world::{ColliderShapeDef, RapierMover, RapierQueryWorld, Surface, WorldStaticDef};
pub use sensor::{EnvironmentSensor, LedgeGeometry};
pub use settings::{AirborneForces, LocomotionSettings, SettingsError};
pub use state::{FrameInput, LocomotionStateMachine};
pub use types::{
    AirborneMode, CapsuleSpec, CharacterFacts, CharacterTransform, LocomotionContext,
    LocomotionStateId, MovementIntent, Quat, Vec2, Vec3,
};
pub use utils::{look_rotation, rotate_towards, shimmy_tangent, yaw_from_xz};
