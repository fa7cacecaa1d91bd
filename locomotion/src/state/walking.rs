use super::{FrameInput, LocomotionState};
use crate::{
    HEADING_EPS, SPEED_PARAM,
    capability::Collaborators,
    settings::LocomotionSettings,
    types::{LocomotionContext, Vec3},
    utils::{look_rotation, planar_unit, rotate_towards},
};

/// Grounded (and airborne-layered) walking.
///
/// Each frame:
/// - Desired planar direction = camera forward * intent.y + camera right * intent.x.
/// - Displacement = `(normal_speed * direction + jump_vector) * dt`, resolved by the mover.
/// - Heading turns toward the direction at `rotation_speed_deg`; the very first heading is
///   taken instantly.
#[derive(Clone, Debug)]
pub struct WalkingState {
    normal_speed: f32,
    rotation_speed_deg: f32,
    direction: Vec3,
    has_heading: bool,
}

impl WalkingState {
    pub fn new(settings: &LocomotionSettings) -> Self {
        Self {
            normal_speed: settings.normal_speed,
            rotation_speed_deg: settings.rotation_speed_deg,
            direction: Vec3::zeros(),
            has_heading: false,
        }
    }

    /// Desired planar direction computed by the last update.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    fn update_rotation(&mut self, ctx: &mut LocomotionContext, dt: f32) {
        let Some(target) = look_rotation(self.direction) else {
            return;
        };

        if !self.has_heading {
            ctx.transform.rotation = target;
            self.has_heading = true;
            return;
        }

        let max_step = self.rotation_speed_deg.to_radians() * dt;
        ctx.transform.rotation = rotate_towards(ctx.transform.rotation, target, max_step);
    }
}

impl LocomotionState for WalkingState {
    fn enter(&mut self, ctx: &mut LocomotionContext, _rig: &mut Collaborators<'_>) {
        ctx.facts.is_hanging = false;
    }

    fn update(
        &mut self,
        input: FrameInput,
        ctx: &mut LocomotionContext,
        rig: &mut Collaborators<'_>,
    ) {
        let forward = planar_unit(rig.camera.forward_on_plane()).unwrap_or_else(Vec3::zeros);
        let right = planar_unit(rig.camera.right_on_plane()).unwrap_or_else(Vec3::zeros);
        self.direction = forward * input.intent.y() + right * input.intent.x();

        rig.animator.set_float(SPEED_PARAM, self.direction.norm());

        let displacement = (self.direction * self.normal_speed + ctx.jump_vector) * input.dt;
        let applied = rig
            .mover
            .move_character(ctx.transform.position, displacement, input.dt);
        ctx.transform.position += applied;

        if self.direction.norm_squared() > HEADING_EPS * HEADING_EPS {
            self.update_rotation(ctx, input.dt);
        }
    }

    fn exit(&mut self, _ctx: &mut LocomotionContext, _rig: &mut Collaborators<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::PlanarCamera;
    use crate::test_support::TestRig;
    use crate::types::{MovementIntent, Quat};
    use std::f32::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 60.0;

    fn input(x: f32, y: f32) -> FrameInput {
        FrameInput {
            intent: MovementIntent::new(x, y),
            dt: DT,
        }
    }

    #[test]
    fn forward_intent_moves_at_normal_speed() {
        let settings = LocomotionSettings::default();
        let mut rig = TestRig::new(&settings);
        let mut ctx = LocomotionContext::default();
        let mut walking = WalkingState::new(&settings);

        walking.update(input(0.0, 1.0), &mut ctx, &mut rig.frame());

        let moved = rig.mover.moves[0];
        assert!((moved.norm() - settings.normal_speed * DT).abs() < 1.0e-6);
        assert!((moved - Vec3::new(0.0, 0.0, -settings.normal_speed * DT)).norm() < 1.0e-6);
        assert!(ctx.transform.rotation.angle_to(&Quat::identity()) < 1.0e-6);
        assert_eq!(rig.animator.float(SPEED_PARAM), Some(1.0));
    }

    #[test]
    fn jump_vector_is_composed_into_displacement() {
        let settings = LocomotionSettings::default();
        let mut rig = TestRig::new(&settings);
        let mut ctx = LocomotionContext::default();
        ctx.jump_vector = Vec3::new(0.0, 6.0, 0.0);
        let mut walking = WalkingState::new(&settings);

        walking.update(input(0.0, 0.0), &mut ctx, &mut rig.frame());

        assert!((rig.mover.moves[0] - Vec3::new(0.0, 6.0 * DT, 0.0)).norm() < 1.0e-6);
        assert!((ctx.transform.position.y - 6.0 * DT).abs() < 1.0e-6);
        assert_eq!(rig.animator.float(SPEED_PARAM), Some(0.0));
    }

    #[test]
    fn movement_is_camera_relative() {
        let settings = LocomotionSettings::default();
        let mut rig = TestRig::new(&settings);
        rig.camera = PlanarCamera { yaw: FRAC_PI_2 };
        let mut ctx = LocomotionContext::default();
        let mut walking = WalkingState::new(&settings);

        walking.update(input(0.0, 1.0), &mut ctx, &mut rig.frame());

        // Camera turned a quarter left: its forward is -X.
        assert!((walking.direction() - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1.0e-5);
        assert!((ctx.transform.forward() - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1.0e-5);
    }

    #[test]
    fn heading_turns_at_rotation_speed_after_first_frame() {
        let settings = LocomotionSettings::default();
        let mut rig = TestRig::new(&settings);
        let mut ctx = LocomotionContext::default();
        let mut walking = WalkingState::new(&settings);

        walking.update(input(0.0, 1.0), &mut ctx, &mut rig.frame());
        walking.update(input(1.0, 0.0), &mut ctx, &mut rig.frame());

        let expected = settings.rotation_speed_deg.to_radians() * DT;
        let turned = ctx.transform.rotation.angle_to(&Quat::identity());
        assert!((turned - expected).abs() < 1.0e-4, "turned={turned}");
    }

    #[test]
    fn zero_intent_keeps_heading() {
        let settings = LocomotionSettings::default();
        let mut rig = TestRig::new(&settings);
        let mut ctx = LocomotionContext::default();
        let start = Quat::from_axis_angle(&Vec3::y_axis(), 0.7);
        ctx.transform.rotation = start;
        let mut walking = WalkingState::new(&settings);

        walking.update(input(0.0, 0.0), &mut ctx, &mut rig.frame());
        assert_eq!(ctx.transform.rotation, start);
    }

    #[test]
    fn enter_and_exit_are_idempotent() {
        let settings = LocomotionSettings::default();
        let mut rig = TestRig::new(&settings);
        let mut ctx = LocomotionContext::default();
        ctx.jump_vector = Vec3::new(0.0, -2.0, 0.0);
        ctx.facts.is_hanging = true;
        let mut walking = WalkingState::new(&settings);

        walking.update(input(0.5, 0.0), &mut ctx, &mut rig.frame());
        let speed = rig.animator.float(SPEED_PARAM);

        for _ in 0..3 {
            walking.enter(&mut ctx, &mut rig.frame());
            walking.exit(&mut ctx, &mut rig.frame());
        }
        walking.enter(&mut ctx, &mut rig.frame());

        assert!(!ctx.facts.is_hanging);
        assert_eq!(ctx.jump_vector, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(rig.animator.float(SPEED_PARAM), speed);
    }
}
