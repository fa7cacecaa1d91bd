/*!
Core locomotion types and math aliases shared by the controller modules.

This module contains no algorithms. It defines the data exchanged between:
- the orchestrator (`controller`), which owns the character context
- the locomotion states (walking, hanging) and the airborne task
- the environment sensor and the collaborator capabilities

Conventions
- Units are meters and seconds.
- +Y is up. A rotation's forward is `rotation * -Z` and its right is `rotation * +X`.
- A character's `position` is its feet; the capsule center sits `half_height + radius` above.
*/

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::airborne::AirborneTask;
use crate::sensor::LedgeGeometry;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// Capsule specification for the character volume.
///
/// half_height is the half-length of the cylinder section (aligned with +Y),
/// so the total capsule height is 2*half_height + 2*radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub half_height: f32,
}

impl CapsuleSpec {
    /// Full standing height (meters).
    #[inline]
    pub fn height(&self) -> f32 {
        2.0 * (self.half_height + self.radius)
    }

    /// Height of the capsule center above the feet.
    #[inline]
    pub fn center_height(&self) -> f32 {
        self.half_height + self.radius
    }
}

impl Default for CapsuleSpec {
    fn default() -> Self {
        Self {
            radius: 0.3,
            half_height: 0.7,
        }
    }
}

/// World-space placement of the character: feet position plus yaw/orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl CharacterTransform {
    #[inline]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Unit forward direction (`rotation * -Z`).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::z()
    }

    /// Unit right direction (`rotation * +X`).
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::x()
    }
}

impl Default for CharacterTransform {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Quat::identity())
    }
}

/// Per-frame movement intent from the input collaborator.
///
/// - `x` is the lateral axis (right positive), `y` the forward axis.
/// - Each axis is clamped into [-1, 1] on construction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MovementIntent(Vec2);

impl MovementIntent {
    pub fn new(x: f32, y: f32) -> Self {
        let clamp = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Self(Vec2::new(clamp(x), clamp(y)))
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.0.y
    }

    #[inline]
    pub fn as_vec(&self) -> Vec2 {
        self.0
    }
}

impl From<Vec2> for MovementIntent {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// The closed set of state-machine states.
///
/// Airborne is not listed: jumping and falling run as a task layered on top of `Walking`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LocomotionStateId {
    #[default]
    Walking,
    Hanging,
}

/// Which integration branch the airborne task runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AirborneMode {
    Jumping,
    Falling,
}

/// Facts owned by the orchestrator, mutated only by it and by the airborne task, and read by
/// the active state within the same frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CharacterFacts {
    pub is_airborne: bool,
    pub is_jumping: bool,
    pub is_hanging: bool,
    /// Vertical velocity-equivalent used by the jump/fall integration (m/s).
    /// Zero unless an airborne task is active.
    pub vertical_force: f32,
}

/// Shared per-character context passed by reference into the states.
///
/// Write order within a frame: sensor checks, then flag/task updates, then the state update.
#[derive(Clone, Debug, Default)]
pub struct LocomotionContext {
    pub facts: CharacterFacts,
    /// Vertical-only displacement contribution published by the airborne task.
    pub jump_vector: Vec3,
    pub transform: CharacterTransform,
    /// Recorded id of the active state.
    pub state: LocomotionStateId,
    /// Geometry of the last ledge grab, if any.
    pub ledge: Option<LedgeGeometry>,
    pub(crate) airborne: Option<AirborneTask>,
}

impl LocomotionContext {
    pub fn new(transform: CharacterTransform) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }

    /// Is a jump/fall task currently in flight?
    #[inline]
    pub fn airborne_task(&self) -> Option<&AirborneTask> {
        self.airborne.as_ref()
    }

    /// Drop any in-flight airborne task without letting it complete, clearing every fact it owns.
    pub(crate) fn cancel_airborne(&mut self) {
        if let Some(task) = self.airborne.take() {
            log::debug!("airborne task cancelled (mode={:?})", task.mode());
        }
        self.jump_vector = Vec3::zeros();
        self.facts.vertical_force = 0.0;
        self.facts.is_jumping = false;
        self.facts.is_airborne = false;
    }
}
