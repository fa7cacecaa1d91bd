use super::{FrameInput, LocomotionState};
use crate::{
    HANG_SPEED_PARAM, IS_HANGING_PARAM,
    capability::Collaborators,
    sensor::EnvironmentSensor,
    settings::LocomotionSettings,
    types::{LocomotionContext, Vec3},
    utils::{round_axis, shimmy_tangent},
};

/// Attached to a ledge.
///
/// Lateral input is rounded to {-1, 0, 1}. The character moves along the ledge tangent at
/// `hang_speed` only while the shimmy probe keeps hitting the face; the mover is bypassed.
#[derive(Clone, Debug)]
pub struct HangingState {
    sensor: EnvironmentSensor,
    hang_speed: f32,
    ledge_normal: Vec3,
}

impl HangingState {
    pub fn new(settings: &LocomotionSettings) -> Self {
        Self {
            sensor: EnvironmentSensor::new(settings),
            hang_speed: settings.shimmy.hang_speed,
            ledge_normal: Vec3::z(),
        }
    }

    /// Outward normal of the ledge face the character is attached to.
    #[inline]
    pub fn ledge_normal(&self) -> Vec3 {
        self.ledge_normal
    }
}

impl LocomotionState for HangingState {
    fn enter(&mut self, ctx: &mut LocomotionContext, rig: &mut Collaborators<'_>) {
        rig.animator.set_bool(IS_HANGING_PARAM, true);
        ctx.facts.is_hanging = true;
        rig.ik.switch_targets_to_hang_pose();
        rig.ik.set_blend_weight(1.0);

        self.ledge_normal = match ctx.ledge {
            Some(ledge) => ledge.normal,
            None => -ctx.transform.forward(),
        };
    }

    fn update(
        &mut self,
        input: FrameInput,
        ctx: &mut LocomotionContext,
        rig: &mut Collaborators<'_>,
    ) {
        let lateral = round_axis(input.intent.x());
        let hit = self.sensor.probe_shimmy(rig.scene, &ctx.transform, lateral);
        if let Some(hit) = hit {
            self.ledge_normal = hit.normal;
        }

        rig.animator.set_float(HANG_SPEED_PARAM, lateral);

        let speed = if hit.is_some() { self.hang_speed } else { 0.0 };
        let step = shimmy_tangent(self.ledge_normal) * (lateral * speed * input.dt);
        ctx.transform.position += step;
    }

    fn exit(&mut self, ctx: &mut LocomotionContext, rig: &mut Collaborators<'_>) {
        rig.animator.set_bool(IS_HANGING_PARAM, false);
        ctx.facts.is_hanging = false;
        rig.ik.set_blend_weight(0.0);
        rig.ik.reset_targets();
    }
}
