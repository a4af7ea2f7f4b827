//! Per-tick smoothing of displayed transforms toward their targets.
//!
//! Runs once per render tick for every roster entry, independent of snapshot
//! arrival cadence. Smoothing masks the discrete, irregularly-timed updates
//! so remote motion reads as continuous.

use shared::constants::SMOOTHING_FACTOR;

use crate::registry::RemoteAvatarRegistry;

/// Advances every displayed transform a fixed fraction of its remaining gap.
///
/// Each position axis and yaw follow
/// `displayed += (target - displayed) * SMOOTHING_FACTOR`: exponential decay
/// with no overshoot, no velocity estimation, and no extrapolation between
/// snapshots. A snapshot k ticks old retains `(1 - factor)^k` of its original
/// error.
pub fn interpolate(registry: &mut RemoteAvatarRegistry) {
    interpolate_with(registry, SMOOTHING_FACTOR);
}

/// [`interpolate`] with an explicit smoothing factor.
pub fn interpolate_with(registry: &mut RemoteAvatarRegistry, factor: f32) {
    for avatar in registry.iter_mut() {
        let target = avatar.target;
        avatar.displayed.step_toward(&target, factor);
    }
}
