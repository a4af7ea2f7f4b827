//! Deterministic avatar math shared across the presence stack: the transform
//! value type, exponential smoothing, the per-tick motion step, and the
//! tuning constants. No I/O lives here.

pub mod constants;
pub mod motion;
pub mod transform;

pub use constants::{
    CAMERA_OFFSET, CAMERA_SMOOTHING, MOVE_SPEED, PRESENCE_PUBLISH_INTERVAL, ROTATION_SPEED,
    SMOOTHING_FACTOR, SPAWN_POSITION, WORLD_BOUND,
};
pub use motion::{MotionConfig, MotionIntent};
pub use transform::Transform;
