use super::{FrameInput, HangingState, LocomotionState, WalkingState};
use crate::{
    capability::Collaborators,
    settings::LocomotionSettings,
    types::{LocomotionContext, LocomotionStateId},
};

/// Owns one instance of every state and dispatches to the active one.
///
/// Starts in `Walking` without running its `enter`.
#[derive(Clone, Debug)]
pub struct LocomotionStateMachine {
    walking: WalkingState,
    hanging: HangingState,
    current: LocomotionStateId,
}

impl LocomotionStateMachine {
    pub fn new(settings: &LocomotionSettings) -> Self {
        Self {
            walking: WalkingState::new(settings),
            hanging: HangingState::new(settings),
            current: LocomotionStateId::Walking,
        }
    }

    #[inline]
    pub fn current(&self) -> LocomotionStateId {
        self.current
    }

    #[inline]
    pub fn walking(&self) -> &WalkingState {
        &self.walking
    }

    #[inline]
    pub fn hanging(&self) -> &HangingState {
        &self.hanging
    }

    fn state_mut(&mut self, id: LocomotionStateId) -> &mut dyn LocomotionState {
        match id {
            LocomotionStateId::Walking => &mut self.walking,
            LocomotionStateId::Hanging => &mut self.hanging,
        }
    }

    /// Exit the active state, record `target` in the context, then enter it.
    ///
    /// Entering `Hanging` drops any in-flight airborne task first. Re-entering the active
    /// state runs exit then enter again.
    pub fn change_state(
        &mut self,
        target: LocomotionStateId,
        ctx: &mut LocomotionContext,
        rig: &mut Collaborators<'_>,
    ) {
        if target == LocomotionStateId::Hanging && ctx.airborne.is_some() {
            ctx.cancel_airborne();
        }

        let from = self.current;
        self.state_mut(from).exit(ctx, rig);
        self.current = target;
        ctx.state = target;
        self.state_mut(target).enter(ctx, rig);

        log::debug!("locomotion state {from:?} -> {target:?}");
    }

    /// Run the active state's per-frame update.
    pub fn update(
        &mut self,
        input: FrameInput,
        ctx: &mut LocomotionContext,
        rig: &mut Collaborators<'_>,
    ) {
        let current = self.current;
        self.state_mut(current).update(input, ctx, rig);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IS_HANGING_PARAM;
    use crate::airborne::AirborneTask;
    use crate::types::{AirborneMode, MovementIntent, Vec3};
    use crate::test_support::TestRig;

    #[test]
    fn starts_walking_without_enter() {
        let settings = LocomotionSettings::default();
        let machine = LocomotionStateMachine::new(&settings);
        assert_eq!(machine.current(), LocomotionStateId::Walking);
    }

    #[test]
    fn transition_runs_exit_then_enter() {
        let settings = LocomotionSettings::default();
        let mut rig = TestRig::new(&settings);
        let mut ctx = LocomotionContext::default();
        let mut machine = LocomotionStateMachine::new(&settings);

        machine.change_state(LocomotionStateId::Hanging, &mut ctx, &mut rig.frame());
        assert_eq!(machine.current(), LocomotionStateId::Hanging);
        assert_eq!(ctx.state, LocomotionStateId::Hanging);
        assert!(ctx.facts.is_hanging);
        assert_eq!(rig.ik.weight(), 1.0);

        machine.change_state(LocomotionStateId::Walking, &mut ctx, &mut rig.frame());
        assert_eq!(ctx.state, LocomotionStateId::Walking);
        assert!(!ctx.facts.is_hanging);
        assert_eq!(rig.animator.bool(IS_HANGING_PARAM), Some(false));
        assert_eq!(rig.ik.weight(), 0.0);
    }

    #[test]
    fn entering_hanging_cancels_airborne_task() {
        let settings = LocomotionSettings::default();
        let mut rig = TestRig::new(&settings);
        let mut ctx = LocomotionContext::default();
        ctx.facts.is_jumping = true;
        ctx.airborne = Some(AirborneTask::start(
            AirborneMode::Jumping,
            &mut ctx.facts,
            &mut ctx.jump_vector,
            settings.airborne_forces(),
        ));
        let mut machine = LocomotionStateMachine::new(&settings);

        machine.change_state(LocomotionStateId::Hanging, &mut ctx, &mut rig.frame());

        assert!(ctx.airborne_task().is_none());
        assert_eq!(ctx.jump_vector, Vec3::zeros());
        assert_eq!(ctx.facts.vertical_force, 0.0);
        assert!(!ctx.facts.is_jumping);
    }

    #[test]
    fn update_dispatches_to_active_state() {
        let settings = LocomotionSettings::default();
        let mut rig = TestRig::new(&settings);
        let mut ctx = LocomotionContext::default();
        let mut machine = LocomotionStateMachine::new(&settings);
        let input = FrameInput {
            intent: MovementIntent::new(0.0, 1.0),
            dt: 0.1,
        };

        machine.update(input, &mut ctx, &mut rig.frame());
        assert_eq!(rig.mover.moves.len(), 1);

        machine.change_state(LocomotionStateId::Hanging, &mut ctx, &mut rig.frame());
        machine.update(input, &mut ctx, &mut rig.frame());
        // Hanging bypasses the mover.
        assert_eq!(rig.mover.moves.len(), 1);
    }
}
