//! Arm IK rig used while hanging.
//!
//! The rig only tracks targets and a blend weight; solving the chain is the host's job. Targets
//! are either local to the character (rest and hang pose) or world-space grab points found by a
//! hand ray.

use crate::{
    capability::{IkRig, SceneQuery},
    settings::IkSettings,
    types::Vec3,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

/// Where one arm is reaching.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArmTarget {
    /// Neutral local target the arm had before any hang.
    Rest(Vec3),
    /// Configured local hang-pose target.
    HangPose(Vec3),
    /// World-space grab point on the ledge.
    Grab(Vec3),
}

impl ArmTarget {
    #[inline]
    pub fn position(&self) -> Vec3 {
        match *self {
            ArmTarget::Rest(p) | ArmTarget::HangPose(p) | ArmTarget::Grab(p) => p,
        }
    }

    #[inline]
    pub fn is_hang_pose(&self) -> bool {
        matches!(self, ArmTarget::HangPose(_))
    }
}

#[derive(Clone, Debug)]
pub struct ArmIk {
    settings: IkSettings,
    left_rest: Vec3,
    right_rest: Vec3,
    left: ArmTarget,
    right: ArmTarget,
    weight: f32,
}

impl ArmIk {
    /// `left_rest`/`right_rest` are the local targets the arms hold when not hanging.
    pub fn new(settings: &IkSettings, left_rest: Vec3, right_rest: Vec3) -> Self {
        Self {
            settings: *settings,
            left_rest,
            right_rest,
            left: ArmTarget::Rest(left_rest),
            right: ArmTarget::Rest(right_rest),
            weight: 0.0,
        }
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn target(&self, hand: Hand) -> ArmTarget {
        match hand {
            Hand::Left => self.left,
            Hand::Right => self.right,
        }
    }

    fn target_mut(&mut self, hand: Hand) -> &mut ArmTarget {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    /// Put one hand back on its configured hang-pose target.
    pub fn set_default_hang_target(&mut self, hand: Hand) {
        let local = match hand {
            Hand::Left => self.settings.left_hang_target,
            Hand::Right => self.settings.right_hang_target,
        };
        *self.target_mut(hand) = ArmTarget::HangPose(local);
    }

    /// Reach for the ledge from a hand bone.
    ///
    /// Casts along `bone_forward` for `hand_ray_length`. On a hit the target becomes the hit
    /// point pushed `hand_grab_offset` along +Z; on a miss the target is left alone.
    pub fn hand_grab(
        &mut self,
        hand: Hand,
        scene: &dyn SceneQuery,
        bone_origin: Vec3,
        bone_forward: Vec3,
    ) -> bool {
        let Some(dir) = bone_forward.try_normalize(crate::DIST_EPS) else {
            return false;
        };
        let Some(hit) = scene.cast_ray(bone_origin, dir, self.settings.hand_ray_length) else {
            return false;
        };

        let grab = hit.point + Vec3::z() * self.settings.hand_grab_offset;
        *self.target_mut(hand) = ArmTarget::Grab(grab);
        log::trace!("{hand:?} hand grab at {grab:?}");
        true
    }
}

impl IkRig for ArmIk {
    fn set_blend_weight(&mut self, weight: f32) {
        self.weight = weight.clamp(0.0, 1.0);
        if self.weight == 0.0 {
            self.reset_targets();
        }
    }

    fn switch_targets_to_hang_pose(&mut self) {
        self.set_default_hang_target(Hand::Left);
        self.set_default_hang_target(Hand::Right);
    }

    fn reset_targets(&mut self) {
        self.left = ArmTarget::Rest(self.left_rest);
        self.right = ArmTarget::Rest(self.right_rest);
    }
}
