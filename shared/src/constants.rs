use std::time::Duration;

/// Planar movement speed of the local avatar, meters per simulation tick.
pub const MOVE_SPEED: f32 = 0.1;

/// Yaw rate of the local avatar, radians per simulation tick.
pub const ROTATION_SPEED: f32 = 0.05;

/// Half-extent of the walkable plane in meters.
///
/// The motion step clamps X and Z to `[-WORLD_BOUND, WORLD_BOUND]`
/// independently. Y is never clamped here.
pub const WORLD_BOUND: f32 = 14.0;

/// How frequently, at most, the local transform is pushed to the presence store.
pub const PRESENCE_PUBLISH_INTERVAL: Duration = Duration::from_millis(100);

/// Fraction of the remaining gap a displayed transform covers per render tick.
///
/// Exponential decay: after k ticks the residual gap is `(1 - factor)^k` of
/// the original. Per-tick rather than elapsed-time-scaled, so convergence
/// speed tracks the frame rate.
pub const SMOOTHING_FACTOR: f32 = 0.1;

/// Where a freshly spawned avatar stands, world space `(x, y, z)`.
pub const SPAWN_POSITION: [f32; 3] = [0.0, 0.0, 5.0];

/// Camera offset from the avatar before yaw rotation, `(x, y, z)`.
pub const CAMERA_OFFSET: [f32; 3] = [0.0, 5.0, 10.0];

/// Fraction of the remaining gap the camera covers per render tick.
pub const CAMERA_SMOOTHING: f32 = 0.1;

/// Angular rate of the idle head bob, radians per second of scene time.
pub const IDLE_FLOAT_RATE: f32 = 2.0;

/// Amplitude of the idle head bob, meters.
pub const IDLE_FLOAT_AMPLITUDE: f32 = 0.05;
