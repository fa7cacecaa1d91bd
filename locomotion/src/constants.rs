/// Animation float parameter: planar walking speed (magnitude of the desired direction).
pub const SPEED_PARAM: &str = "Speed";

/// Animation float parameter: discrete shimmy input while hanging (-1, 0 or 1).
pub const HANG_SPEED_PARAM: &str = "HangSpeed";

/// Animation bool parameter: the character is off the ground (jumping or falling).
pub const IS_ABOVE_GROUND_PARAM: &str = "IsAboveGround";

/// Animation bool parameter: the character is attached to a ledge.
pub const IS_HANGING_PARAM: &str = "IsHanging";

/// Target simulation rate the default tuning was authored against (frames per second).
///
/// `downward_force` is a per-frame decrement, so jump arcs scale with the tick rate.
pub const TARGET_FRAME_RATE: f32 = 60.0;

/// Practical small distance for comparisons (meters).
/// Use for normalization guards and equality checks in world space.
pub const DIST_EPS: f32 = 1.0e-6;

/// Minimum planar direction length considered "moving" for heading updates.
pub const HEADING_EPS: f32 = 1.0e-4;
