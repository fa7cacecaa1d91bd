//! Environment sensing: ground, ledge and shimmy-edge probes.
//!
//! The sensor is stateless. It turns the probe geometry from [`LocomotionSettings`] into
//! [`SceneQuery`] casts and interprets the results as booleans or [`LedgeGeometry`]. A miss is
//! never an error: it is the signal (fall, no grab, stop at the ledge end).

use crate::{
    capability::{ProbeHit, SceneQuery},
    settings::{GroundProbeSettings, LedgeSettings, LocomotionSettings, ShimmySettings},
    types::{CapsuleSpec, CharacterTransform, Vec3},
    utils::{dominant_axis_offset, look_rotation, planar},
};

/// Geometry of a detected ledge (recomputed on every probe).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgeGeometry {
    /// Height of the walkable ledge top.
    pub top_height: f32,
    /// Impact point on the ledge's forward face.
    pub face_point: Vec3,
    /// Outward surface normal of the face.
    pub normal: Vec3,
}

impl LedgeGeometry {
    /// Where the character hangs from this ledge, facing the wall.
    ///
    /// - Horizontal: face hit point pushed `horizontal_grab_offset` along the dominant X/Z
    ///   axis of the normal, signed like the normal.
    /// - Vertical: `vertical_grab_offset` below the ledge top.
    /// - Facing: the inverse of the normal. Keeps `current` rotation if the normal is vertical.
    pub fn grab_transform(
        &self,
        ledge: &LedgeSettings,
        current: &CharacterTransform,
    ) -> CharacterTransform {
        let offset = dominant_axis_offset(self.normal, ledge.horizontal_grab_offset);
        let position = Vec3::new(
            self.face_point.x + offset.x,
            self.top_height - ledge.vertical_grab_offset,
            self.face_point.z + offset.z,
        );
        let rotation = look_rotation(-self.normal).unwrap_or(current.rotation);
        CharacterTransform::new(position, rotation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvironmentSensor {
    capsule: CapsuleSpec,
    ground: GroundProbeSettings,
    ledge: LedgeSettings,
    shimmy: ShimmySettings,
}

impl EnvironmentSensor {
    pub fn new(settings: &LocomotionSettings) -> Self {
        Self {
            capsule: settings.capsule,
            ground: settings.ground_probe,
            ledge: settings.ledge,
            shimmy: settings.shimmy,
        }
    }

    /// Downward sphere sweep from the capsule center against ground.
    pub fn is_grounded(&self, scene: &dyn SceneQuery, at: &CharacterTransform) -> bool {
        let center = at.position + Vec3::y() * self.capsule.center_height();
        scene
            .cast_sphere(center, self.ground.radius, -Vec3::y(), self.ground.distance)
            .is_some()
    }

    /// Ledge double probe.
    ///
    /// - Vertical ray: from head height, `forward_reach` ahead, straight down (ledge top).
    /// - Horizontal ray: from `chest_drop` below head height, straight ahead (ledge face).
    ///
    /// Both must hit.
    pub fn probe_ledge(
        &self,
        scene: &dyn SceneQuery,
        at: &CharacterTransform,
    ) -> Option<LedgeGeometry> {
        let height = self.capsule.height();
        let forward = at.forward();

        let vertical_origin = at.position + Vec3::y() * height + forward * self.ledge.forward_reach;
        let top = scene.cast_ray(
            vertical_origin,
            -Vec3::y(),
            self.ledge.vertical_ray_length,
        )?;

        let horizontal_origin = at.position + Vec3::y() * (height - self.ledge.chest_drop);
        let face = scene.cast_ray(
            horizontal_origin,
            forward,
            self.ledge.horizontal_ray_length,
        )?;

        Some(LedgeGeometry {
            top_height: top.point.y,
            face_point: face.point,
            normal: face.normal,
        })
    }

    /// Shimmy continuation probe while hanging.
    ///
    /// The origin sits `vertical_offset` above the hang point and `lateral_offset` toward the
    /// shimmy direction (`lateral` in {-1, 0, 1}); the ray is cast along the character forward
    /// against the ledge face. A hit means the ledge continues that way.
    pub fn probe_shimmy(
        &self,
        scene: &dyn SceneQuery,
        at: &CharacterTransform,
        lateral: f32,
    ) -> Option<ProbeHit> {
        let right = planar(at.right());
        let origin = at.position
            + Vec3::y() * self.shimmy.vertical_offset
            + right * (lateral * self.shimmy.lateral_offset);
        scene.cast_ray(origin, at.forward(), self.shimmy.ray_length)
    }
}
