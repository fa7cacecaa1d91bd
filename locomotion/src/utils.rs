use std::f32::consts::FRAC_PI_2;

use crate::{
    DIST_EPS,
    types::{Quat, Vec2, Vec3},
};

/// Yaw (radians about +Y) that turns the rotation forward (`-Z`) toward the planar direction `xz`.
///
/// Returns `None` if the planar direction is too small to define a heading.
pub fn yaw_from_xz(xz: Vec2) -> Option<f32> {
    if xz.norm_squared() > DIST_EPS * DIST_EPS {
        return Some((-xz[0]).atan2(-xz[1]));
    }

    None
}

/// Drop the vertical component of `v`.
#[inline]
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Planar unit vector, or `None` when `v` has no horizontal extent.
#[inline]
pub fn planar_unit(v: Vec3) -> Option<Vec3> {
    planar(v).try_normalize(DIST_EPS)
}

/// Yaw-only rotation whose forward faces the planar direction of `forward`.
pub fn look_rotation(forward: Vec3) -> Option<Quat> {
    let yaw = yaw_from_xz(Vec2::new(forward.x, forward.z))?;
    Some(Quat::from_axis_angle(&Vec3::y_axis(), yaw))
}

/// Rotate `from` toward `to` by at most `max_radians`, along the shortest arc.
///
/// Reaches `to` exactly when the remaining angle is within the step.
pub fn rotate_towards(from: Quat, to: Quat, max_radians: f32) -> Quat {
    let max_radians = max_radians.max(0.0);
    let angle = from.angle_to(&to);
    if angle <= max_radians || angle <= DIST_EPS {
        return to;
    }

    let t = max_radians / angle;
    // Opposite headings have no unique arc; turn about up.
    from.try_slerp(&to, t, DIST_EPS)
        .unwrap_or_else(|| Quat::from_axis_angle(&Vec3::y_axis(), max_radians) * from)
}

/// Round an analog axis to a discrete step in {-1, 0, 1}. Halves round to even, so ±0.5 is 0.
#[inline]
pub fn round_axis(value: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    value.round_ties_even().clamp(-1.0, 1.0)
}

/// Sign that treats zero as zero (unlike `f32::signum`).
#[inline]
pub fn sign_or_zero(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Offset of `magnitude` along whichever horizontal axis (X or Z) dominates `normal`, signed
/// like that component.
pub fn dominant_axis_offset(normal: Vec3, magnitude: f32) -> Vec3 {
    if normal.x.abs() >= normal.z.abs() {
        Vec3::new(magnitude * sign_or_zero(normal.x), 0.0, 0.0)
    } else {
        Vec3::new(0.0, 0.0, magnitude * sign_or_zero(normal.z))
    }
}

/// Direction along a ledge face, derived from the face's outward normal.
///
/// The planar normal is turned a quarter turn about up, which points to the character's
/// right while it faces the wall. Returns zero for a degenerate (vertical) normal.
pub fn shimmy_tangent(face_normal: Vec3) -> Vec3 {
    let Some(n) = planar_unit(face_normal) else {
        return Vec3::zeros();
    };
    Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2) * n
}
