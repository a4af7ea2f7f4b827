//! Local avatar motion: held-key intent to one bounded planar step.
//!
//! Runs once per simulation tick, tied to the render loop rather than a
//! fixed-rate timer, so speeds are expressed per tick. The step is pure and
//! deterministic; input sampling and publishing live with the caller.

use nalgebra::Vector3;

use crate::Transform;
use crate::constants::{MOVE_SPEED, ROTATION_SPEED, WORLD_BOUND};

/// Tuning for the motion step.
#[derive(Clone, Copy, Debug)]
pub struct MotionConfig {
    /// Meters per tick.
    pub move_speed: f32,
    /// Radians per tick.
    pub rotation_speed: f32,
    /// Half-extent of the walkable plane; X and Z clamp to +/- this value.
    pub world_bound: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            rotation_speed: ROTATION_SPEED,
            world_bound: WORLD_BOUND,
        }
    }
}

/// Which movement actions are engaged this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionIntent {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl MotionIntent {
    /// True if any action is engaged.
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.turn_left || self.turn_right
    }
}

/// Advances `transform` by one tick of held-key motion.
///
/// Behavior:
/// - Turn keys adjust yaw by `rotation_speed` first; they contribute nothing
///   to the translation intent.
/// - Forward/backward build a planar intent along -Z/+Z, normalized, rotated
///   by the (already updated) yaw, and scaled by `move_speed`.
/// - X and Z clamp independently to the world bound; Y is untouched.
///
/// Returns `moved` = whether any action was engaged this tick. The flag
/// follows the keys, not the displacement: a rotation-only tick or a step
/// fully absorbed by the clamp still counts as movement for publishing.
pub fn step(transform: &mut Transform, intent: MotionIntent, config: &MotionConfig) -> bool {
    if intent.turn_left {
        transform.yaw += config.rotation_speed;
    }
    if intent.turn_right {
        transform.yaw -= config.rotation_speed;
    }

    let mut direction = Vector3::zeros();
    if intent.forward {
        direction.z -= 1.0;
    }
    if intent.backward {
        direction.z += 1.0;
    }

    if direction.norm_squared() > 0.0 {
        let step = transform.rotate_by_yaw(direction.normalize()) * config.move_speed;
        transform.position += step;
        transform.position.x = transform
            .position
            .x
            .clamp(-config.world_bound, config.world_bound);
        transform.position.z = transform
            .position
            .z
            .clamp(-config.world_bound, config.world_bound);
    }

    intent.any()
}
