/*!
Per-character locomotion orchestrator.

`PlayerController` owns the character context and the state machine. Each `update` runs one
frame in a fixed order:

1. Sensor checks (skipped while hanging): the ledge check once vertical force is negative,
   then the ground check, which writes `is_airborne` and the above-ground animation flag.
2. Advance the in-flight airborne task, if any.
3. Start a task: a fall when airborne with nothing running, otherwise a pending jump when
   grounded. A task is not advanced in the frame it starts.
4. Update the active state.

Input arrives through `set_movement_intent` and `jump` between frames. Collaborators are lent
per frame; the controller keeps no references to them.
*/

use crate::{
    IS_ABOVE_GROUND_PARAM, IS_HANGING_PARAM,
    airborne::{AirborneTask, TaskStatus},
    capability::Collaborators,
    sensor::EnvironmentSensor,
    settings::{LocomotionSettings, SettingsError},
    state::{FrameInput, LocomotionStateMachine},
    types::{
        AirborneMode, CharacterFacts, CharacterTransform, LocomotionContext, LocomotionStateId,
        MovementIntent, Vec3,
    },
};

#[derive(Clone, Debug)]
pub struct PlayerController {
    settings: LocomotionSettings,
    sensor: EnvironmentSensor,
    machine: LocomotionStateMachine,
    ctx: LocomotionContext,
    intent: MovementIntent,
    jump_requested: bool,
}

impl PlayerController {
    /// Build a controller from validated settings.
    ///
    /// Settings built in code go through the same checks as `from_toml_str`.
    pub fn new(settings: LocomotionSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            sensor: EnvironmentSensor::new(&settings),
            machine: LocomotionStateMachine::new(&settings),
            ctx: LocomotionContext::default(),
            intent: MovementIntent::default(),
            jump_requested: false,
            settings,
        })
    }

    /// Movement input callback; the latest intent is used by every following frame.
    pub fn set_movement_intent(&mut self, intent: MovementIntent) {
        self.intent = intent;
    }

    /// Jump input callback. A full press (1) requests a jump on the next `update`.
    pub fn jump(&mut self, trigger: f32) {
        if trigger >= 1.0 {
            self.jump_requested = true;
        }
    }

    /// Teleport the character.
    pub fn place(&mut self, transform: CharacterTransform) {
        self.ctx.transform = transform;
    }

    #[inline]
    pub fn settings(&self) -> &LocomotionSettings {
        &self.settings
    }

    #[inline]
    pub fn facts(&self) -> CharacterFacts {
        self.ctx.facts
    }

    #[inline]
    pub fn jump_vector(&self) -> Vec3 {
        self.ctx.jump_vector
    }

    #[inline]
    pub fn state(&self) -> LocomotionStateId {
        self.ctx.state
    }

    #[inline]
    pub fn transform(&self) -> &CharacterTransform {
        &self.ctx.transform
    }

    #[inline]
    pub fn context(&self) -> &LocomotionContext {
        &self.ctx
    }

    #[inline]
    pub fn machine(&self) -> &LocomotionStateMachine {
        &self.machine
    }

    #[inline]
    pub fn is_airborne_task_running(&self) -> bool {
        self.ctx.airborne.is_some()
    }

    /// Run one frame.
    pub fn update(&mut self, dt: f32, rig: &mut Collaborators<'_>) {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("skipping locomotion frame with invalid dt={dt}");
            return;
        }

        if self.ctx.state != LocomotionStateId::Hanging {
            if self.ctx.facts.vertical_force < 0.0 {
                self.ledge_check(rig);
            }
            if self.ctx.state != LocomotionStateId::Hanging {
                self.fall_check(rig);
            }
        }

        self.advance_airborne();
        self.start_airborne(rig);

        let input = FrameInput {
            intent: self.intent,
            dt,
        };
        self.machine.update(input, &mut self.ctx, rig);

        log::trace!(
            "frame: state={:?} pos={:?} facts={:?}",
            self.ctx.state,
            self.ctx.transform.position,
            self.ctx.facts
        );
    }

    /// Grab a ledge ahead if both ledge probes hit.
    fn ledge_check(&mut self, rig: &mut Collaborators<'_>) {
        let Some(ledge) = self.sensor.probe_ledge(rig.scene, &self.ctx.transform) else {
            return;
        };

        self.ctx.transform = ledge.grab_transform(&self.settings.ledge, &self.ctx.transform);
        self.ctx.ledge = Some(ledge);
        log::debug!(
            "ledge grab: top={} normal={:?} snapped to {:?}",
            ledge.top_height,
            ledge.normal,
            self.ctx.transform.position
        );
        self.machine
            .change_state(LocomotionStateId::Hanging, &mut self.ctx, rig);
    }

    fn fall_check(&mut self, rig: &mut Collaborators<'_>) {
        let grounded = self.sensor.is_grounded(rig.scene, &self.ctx.transform);
        self.ctx.facts.is_airborne = !grounded;
        rig.animator
            .set_bool(IS_ABOVE_GROUND_PARAM, self.ctx.facts.is_airborne);
    }

    fn advance_airborne(&mut self) {
        let forces = self.settings.airborne_forces();
        let LocomotionContext {
            facts,
            jump_vector,
            airborne,
            ..
        } = &mut self.ctx;

        let done = airborne
            .as_mut()
            .is_some_and(|task| task.advance(facts, jump_vector, forces) == TaskStatus::Done);
        if done {
            *airborne = None;
        }
    }

    fn start_airborne(&mut self, rig: &mut Collaborators<'_>) {
        let jump_requested = std::mem::take(&mut self.jump_requested);
        if self.ctx.airborne.is_some() {
            if jump_requested {
                log::debug!("jump ignored: airborne task already running");
            }
            return;
        }

        let facts = self.ctx.facts;
        if self.ctx.state != LocomotionStateId::Hanging && facts.is_airborne && !facts.is_jumping
        {
            self.begin_airborne(AirborneMode::Falling, rig);
            if jump_requested {
                log::debug!("jump ignored: character is falling");
            }
        } else if jump_requested {
            if facts.is_airborne {
                log::debug!("jump ignored: character is airborne");
            } else {
                self.begin_airborne(AirborneMode::Jumping, rig);
            }
        }
    }

    fn begin_airborne(&mut self, mode: AirborneMode, rig: &mut Collaborators<'_>) {
        if self.ctx.state != LocomotionStateId::Walking {
            self.machine
                .change_state(LocomotionStateId::Walking, &mut self.ctx, rig);
        }

        self.ctx.facts.is_jumping = mode == AirborneMode::Jumping;
        self.ctx.facts.is_hanging = false;
        rig.animator.set_bool(IS_HANGING_PARAM, false);
        rig.animator.set_bool(IS_ABOVE_GROUND_PARAM, true);

        let task = AirborneTask::start(
            mode,
            &mut self.ctx.facts,
            &mut self.ctx.jump_vector,
            self.settings.airborne_forces(),
        );
        self.ctx.airborne = Some(task);
    }
}
