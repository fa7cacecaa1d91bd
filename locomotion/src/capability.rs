//! Collaborator capabilities consumed by the controller.
//!
//! The controller never talks to a physics engine, animator, IK rig or camera directly. Each is
//! a small trait; hosts implement them (see `rapier_world` for the Rapier-backed scene and mover,
//! `ik` for the arm rig) and lend them to the controller once per frame via [`Collaborators`].

use std::collections::HashMap;

use crate::types::{Quat, Vec3};
use crate::utils::planar;

/// A hit returned by a scene ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeHit {
    /// World-space impact point.
    pub point: Vec3,
    /// World-space surface normal at the impact point.
    pub normal: Vec3,
    /// Distance travelled along the (unit) cast direction.
    pub distance: f32,
}

/// Scene queries against the "ground" classification.
pub trait SceneQuery {
    /// Cast a ray from `origin` along `dir` up to `max_dist`.
    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<ProbeHit>;

    /// Sweep a sphere of `radius` from `origin` along `dir` up to `max_dist`.
    ///
    /// Returns the distance travelled before contact.
    fn cast_sphere(&self, origin: Vec3, radius: f32, dir: Vec3, max_dist: f32) -> Option<f32>;
}

/// Camera basis projected onto the horizontal plane.
pub trait CameraBasis {
    fn forward_on_plane(&self) -> Vec3;
    fn right_on_plane(&self) -> Vec3;
}

/// A camera rotation (forward `-Z`, right `+X`).
impl CameraBasis for Quat {
    fn forward_on_plane(&self) -> Vec3 {
        planar(self * -Vec3::z())
    }

    fn right_on_plane(&self) -> Vec3 {
        planar(self * Vec3::x())
    }
}

/// Orbit-style camera described by its yaw only (radians about +Y).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlanarCamera {
    pub yaw: f32,
}

impl CameraBasis for PlanarCamera {
    fn forward_on_plane(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    fn right_on_plane(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }
}

/// Collision-resolving character mover.
pub trait KinematicMover {
    /// Try to move the character standing at `position` (feet) by `displacement`.
    ///
    /// Returns the translation actually applied; it may be clamped by collisions.
    fn move_character(&mut self, position: Vec3, displacement: Vec3, dt: f32) -> Vec3;
}

/// Animation parameter sink.
pub trait AnimationSink {
    fn set_float(&mut self, name: &'static str, value: f32);
    fn set_bool(&mut self, name: &'static str, value: bool);
}

/// Arm IK capability used while hanging.
pub trait IkRig {
    /// 0 disables the rig, 1 fully applies it.
    fn set_blend_weight(&mut self, weight: f32);
    fn switch_targets_to_hang_pose(&mut self);
    fn reset_targets(&mut self);
}

/// Animation parameters recorded by name.
///
/// Hosts can read these back each frame and forward them to their animation system.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimatorParams {
    floats: HashMap<&'static str, f32>,
    bools: HashMap<&'static str, bool>,
}

impl AnimatorParams {
    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.bools.get(name).copied()
    }
}

impl AnimationSink for AnimatorParams {
    fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
    }

    fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }
}

/// Capabilities lent to the controller for one frame.
pub struct Collaborators<'a> {
    pub scene: &'a dyn SceneQuery,
    pub camera: &'a dyn CameraBasis,
    pub mover: &'a mut dyn KinematicMover,
    pub animator: &'a mut dyn AnimationSink,
    pub ik: &'a mut dyn IkRig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).norm() < 1.0e-5
    }

    #[test]
    fn planar_camera_matches_rotation_basis() {
        for yaw in [0.0, FRAC_PI_2, 1.0, -2.5] {
            let cam = PlanarCamera { yaw };
            let rot = Quat::from_axis_angle(&Vec3::y_axis(), yaw);
            assert!(approx(cam.forward_on_plane(), rot.forward_on_plane()));
            assert!(approx(cam.right_on_plane(), rot.right_on_plane()));
        }
    }

    #[test]
    fn pitched_camera_basis_is_flattened() {
        let pitch = Quat::from_axis_angle(&Vec3::x_axis(), -0.6);
        let forward = pitch.forward_on_plane();
        assert_eq!(forward.y, 0.0);
        assert!(forward.z < 0.0);
    }

    #[test]
    fn animator_params_keep_last_value() {
        let mut params = AnimatorParams::default();
        params.set_float("Speed", 0.5);
        params.set_float("Speed", 1.0);
        params.set_bool("IsHanging", true);

        assert_eq!(params.float("Speed"), Some(1.0));
        assert_eq!(params.bool("IsHanging"), Some(true));
        assert_eq!(params.bool("IsAboveGround"), None);
    }
}
