/*!
Locomotion tuning and probe geometry.

These settings centralize every tunable used by the controller: speeds, jump/fall forces,
ground/ledge/shimmy probe geometry, ledge snap offsets and the arm IK hang pose. They are
read once at startup (TOML or `Default`) and never mutated while the controller runs.

Notes
- Distances are in meters, time in seconds, angles in degrees.
- `downward_force` is a per-frame decrement (see `TARGET_FRAME_RATE`), not per-second.
- `falling_force` is the terminal fall speed. `upward_force` may not exceed it, otherwise the
  vertical force could leave the `[-falling_force, falling_force]` band.
*/

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CapsuleSpec, Vec3};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Downward volume probe used for the grounded check.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundProbeSettings {
    /// Sphere radius (meters).
    pub radius: f32,
    /// Cast distance from the capsule center (meters).
    pub distance: f32,
}

impl Default for GroundProbeSettings {
    fn default() -> Self {
        Self {
            radius: 0.3,
            distance: 0.9,
        }
    }
}

/// Ledge detection probes and the grab snap applied on a double hit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgeSettings {
    /// How far ahead of the feet the vertical (ledge top) ray starts.
    pub forward_reach: f32,
    /// Length of the downward ledge-top ray, cast from head height.
    pub vertical_ray_length: f32,
    /// Drop below head height for the horizontal (ledge face) ray.
    pub chest_drop: f32,
    /// Length of the forward ledge-face ray.
    pub horizontal_ray_length: f32,
    /// Horizontal snap offset from the face hit point along the dominant normal axis.
    pub horizontal_grab_offset: f32,
    /// Feet end up this far below the ledge top.
    pub vertical_grab_offset: f32,
}

impl Default for LedgeSettings {
    fn default() -> Self {
        Self {
            forward_reach: 1.0,
            vertical_ray_length: 0.5,
            chest_drop: 0.5,
            horizontal_ray_length: 0.8,
            horizontal_grab_offset: 0.2,
            vertical_grab_offset: 2.3,
        }
    }
}

/// Shimmy continuation probe and hang movement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimmySettings {
    /// Lateral offset of the probe origin in the direction of the shimmy.
    pub lateral_offset: f32,
    /// Height of the probe origin above the feet.
    pub vertical_offset: f32,
    /// Length of the forward probe.
    pub ray_length: f32,
    /// Lateral speed while hanging (m/s).
    pub hang_speed: f32,
}

impl Default for ShimmySettings {
    fn default() -> Self {
        Self {
            lateral_offset: 0.5,
            vertical_offset: 2.2,
            ray_length: 1.0,
            hang_speed: 0.33,
        }
    }
}

/// Arm IK hang pose (character-local targets) and hand grab probe.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IkSettings {
    pub left_hang_target: Vec3,
    pub right_hang_target: Vec3,
    /// Grab points are pushed this far along +Z from the hand ray hit.
    pub hand_grab_offset: f32,
    pub hand_ray_length: f32,
}

impl Default for IkSettings {
    fn default() -> Self {
        Self {
            left_hang_target: Vec3::new(-0.364, 1.283, 0.249),
            right_hang_target: Vec3::new(0.297, 1.283, 0.257),
            hand_grab_offset: 0.15,
            hand_ray_length: 1.0,
        }
    }
}

/// Every tunable of the locomotion controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionSettings {
    pub capsule: CapsuleSpec,
    /// Planar walking speed at full stick (m/s).
    pub normal_speed: f32,
    /// Heading turn rate (degrees per second).
    pub rotation_speed_deg: f32,
    /// Initial vertical force of a jump.
    pub upward_force: f32,
    /// Per-frame vertical force decrement while airborne after lift-off.
    pub downward_force: f32,
    /// Terminal fall speed; the vertical force never drops below `-falling_force`.
    pub falling_force: f32,
    pub ground_probe: GroundProbeSettings,
    pub ledge: LedgeSettings,
    pub shimmy: ShimmySettings,
    pub ik: IkSettings,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            capsule: CapsuleSpec::default(),
            normal_speed: 4.0,
            rotation_speed_deg: 720.0,
            upward_force: 6.0,
            downward_force: 0.25,
            falling_force: 10.0,
            ground_probe: GroundProbeSettings::default(),
            ledge: LedgeSettings::default(),
            shimmy: ShimmySettings::default(),
            ik: IkSettings::default(),
        }
    }
}

impl LocomotionSettings {
    /// Parse settings from TOML. Missing fields fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check that every value is usable by the controller.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.capsule.radius.is_finite() && self.capsule.radius > 0.0) {
            return Err(invalid("capsule.radius", "must be positive"));
        }
        if !(self.capsule.half_height.is_finite() && self.capsule.half_height >= 0.0) {
            return Err(invalid("capsule.half_height", "must be non-negative"));
        }

        let magnitudes: [(&'static str, f32); 19] = [
            ("normal_speed", self.normal_speed),
            ("rotation_speed_deg", self.rotation_speed_deg),
            ("upward_force", self.upward_force),
            ("downward_force", self.downward_force),
            ("falling_force", self.falling_force),
            ("ground_probe.radius", self.ground_probe.radius),
            ("ground_probe.distance", self.ground_probe.distance),
            ("ledge.forward_reach", self.ledge.forward_reach),
            ("ledge.vertical_ray_length", self.ledge.vertical_ray_length),
            ("ledge.chest_drop", self.ledge.chest_drop),
            ("ledge.horizontal_ray_length", self.ledge.horizontal_ray_length),
            ("ledge.horizontal_grab_offset", self.ledge.horizontal_grab_offset),
            ("ledge.vertical_grab_offset", self.ledge.vertical_grab_offset),
            ("shimmy.lateral_offset", self.shimmy.lateral_offset),
            ("shimmy.vertical_offset", self.shimmy.vertical_offset),
            ("shimmy.ray_length", self.shimmy.ray_length),
            ("shimmy.hang_speed", self.shimmy.hang_speed),
            ("ik.hand_grab_offset", self.ik.hand_grab_offset),
            ("ik.hand_ray_length", self.ik.hand_ray_length),
        ];
        for (field, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be a finite, non-negative number"));
            }
        }

        for (field, target) in [
            ("ik.left_hang_target", self.ik.left_hang_target),
            ("ik.right_hang_target", self.ik.right_hang_target),
        ] {
            if target.iter().any(|c| !c.is_finite()) {
                return Err(invalid(field, "must be finite"));
            }
        }

        if self.upward_force > self.falling_force {
            return Err(invalid("upward_force", "may not exceed falling_force"));
        }

        Ok(())
    }

    /// Forces driving the airborne task.
    #[inline]
    pub fn airborne_forces(&self) -> AirborneForces {
        AirborneForces {
            upward: self.upward_force,
            downward: self.downward_force,
            falling: self.falling_force,
        }
    }
}

/// The subset of settings the jump/fall integration reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AirborneForces {
    pub upward: f32,
    pub downward: f32,
    pub falling: f32,
}

fn invalid(field: &'static str, reason: &'static str) -> SettingsError {
    SettingsError::Invalid { field, reason }
}
