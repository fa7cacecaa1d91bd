/*!
Locomotion states and the state machine that owns them.

- walking: camera-relative planar movement composed with the airborne jump vector
- hanging: ledge attachment and shimmy along the ledge tangent
- machine: closed state table, transitions (exit old / enter new) and per-frame dispatch

States read the shared [`LocomotionContext`] and write their output through the
[`Collaborators`] lent for the frame.
*/

mod hanging;
mod machine;
mod walking;

pub use hanging::HangingState;
pub use machine::LocomotionStateMachine;
pub use walking::WalkingState;

use crate::{
    capability::Collaborators,
    types::{LocomotionContext, MovementIntent},
};

/// Per-frame input handed to the active state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub intent: MovementIntent,
    /// Frame delta time (seconds).
    pub dt: f32,
}

/// Behavior of one state-machine state.
pub trait LocomotionState {
    fn enter(&mut self, ctx: &mut LocomotionContext, rig: &mut Collaborators<'_>);
    fn update(
        &mut self,
        input: FrameInput,
        ctx: &mut LocomotionContext,
        rig: &mut Collaborators<'_>,
    );
    fn exit(&mut self, ctx: &mut LocomotionContext, rig: &mut Collaborators<'_>);
}
