//! Frame-suspended jump/fall task.
//!
//! The task is a tiny explicit state machine resumed once per frame by the orchestrator via
//! [`AirborneTask::advance`]. It never decides grounded/airborne itself: it reads
//! `CharacterFacts::is_airborne` (written by the orchestrator's ground check earlier in the same
//! frame) as its suspension condition, and its only outputs are the vertical force and the
//! published jump vector.
//!
//! Lifecycle
//! - [`AirborneTask::start`] runs the work before the first suspension point.
//! - `advance` resumes it; `Done` means it already zeroed the jump vector and cleared `is_jumping`.
//! - A ledge grab drops the task outright (`LocomotionContext::cancel_airborne`).

use crate::{
    settings::AirborneForces,
    types::{AirborneMode, CharacterFacts, Vec3},
};

/// Continuation status returned by [`AirborneTask::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Jump impulse published; waiting for the ground check to report lift-off.
    AwaitingLiftoff,
    /// Off the ground after a jump: decay the vertical force each frame.
    Ascending,
    /// Off the ground without a jump: hold terminal fall speed.
    Falling,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AirborneTask {
    mode: AirborneMode,
    phase: Phase,
}

impl AirborneTask {
    /// Start a task, running it up to its first suspension point.
    ///
    /// - Jumping: vertical force = `+upward`.
    /// - Falling: vertical force = `-falling`.
    pub fn start(
        mode: AirborneMode,
        facts: &mut CharacterFacts,
        jump_vector: &mut Vec3,
        forces: AirborneForces,
    ) -> Self {
        let phase = match mode {
            AirborneMode::Jumping => {
                facts.vertical_force = forces.upward;
                Phase::AwaitingLiftoff
            }
            AirborneMode::Falling => {
                facts.vertical_force = -forces.falling;
                Phase::Falling
            }
        };
        *jump_vector = Vec3::new(0.0, facts.vertical_force, 0.0);
        log::debug!(
            "airborne task started (mode={mode:?}, vertical_force={})",
            facts.vertical_force
        );

        Self { mode, phase }
    }

    #[inline]
    pub fn mode(&self) -> AirborneMode {
        self.mode
    }

    /// Resume for one frame.
    pub fn advance(
        &mut self,
        facts: &mut CharacterFacts,
        jump_vector: &mut Vec3,
        forces: AirborneForces,
    ) -> TaskStatus {
        match self.phase {
            Phase::AwaitingLiftoff => {
                if !facts.is_airborne {
                    return TaskStatus::Running;
                }
                self.phase = Phase::Ascending;
                Self::decay(facts, forces);
            }
            Phase::Ascending => {
                if !facts.is_airborne {
                    return Self::finish(facts, jump_vector);
                }
                Self::decay(facts, forces);
            }
            Phase::Falling => {
                if !facts.is_airborne {
                    return Self::finish(facts, jump_vector);
                }
                facts.vertical_force = -forces.falling;
            }
        }

        *jump_vector = Vec3::new(0.0, facts.vertical_force, 0.0);
        log::trace!(
            "airborne task {:?}: vertical_force={}",
            self.phase,
            facts.vertical_force
        );
        TaskStatus::Running
    }

    fn decay(facts: &mut CharacterFacts, forces: AirborneForces) {
        facts.vertical_force = (facts.vertical_force - forces.downward).max(-forces.falling);
    }

    fn finish(facts: &mut CharacterFacts, jump_vector: &mut Vec3) -> TaskStatus {
        *jump_vector = Vec3::zeros();
        facts.vertical_force = 0.0;
        facts.is_jumping = false;
        log::debug!("airborne task finished");
        TaskStatus::Done
    }
}
