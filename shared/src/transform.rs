use nalgebra::{UnitQuaternion, Vector3};

use crate::constants::SPAWN_POSITION;

/// World-space placement of one avatar: a position plus a yaw about +Y.
///
/// Value type, copied freely. Yaw is unbounded in either direction;
/// trigonometric consumers wrap it implicitly, so no normalization happens
/// here or on the wire.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub yaw: f32,
}

impl Transform {
    pub fn new(position: Vector3<f32>, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Placement of a freshly spawned avatar.
    pub fn spawn() -> Self {
        Self::new(Vector3::from(SPAWN_POSITION), 0.0)
    }

    /// Rotates a direction by this transform's yaw about +Y.
    #[inline]
    pub fn rotate_by_yaw(&self, direction: Vector3<f32>) -> Vector3<f32> {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.yaw) * direction
    }

    /// The direction this avatar is facing. At yaw 0 that is -Z.
    #[inline]
    pub fn forward(&self) -> Vector3<f32> {
        self.rotate_by_yaw(Vector3::new(0.0, 0.0, -1.0))
    }

    /// Moves position (per axis) and yaw a fraction of the way toward `target`.
    ///
    /// One step of exponential decay: the gap shrinks to `1 - factor` of
    /// itself per call and reaches zero only in the limit. Yaw is smoothed in
    /// raw radians; snapshots carry it unnormalized, so both sides see the
    /// same scale.
    pub fn step_toward(&mut self, target: &Transform, factor: f32) {
        self.position += (target.position - self.position) * factor;
        self.yaw += (target.yaw - self.yaw) * factor;
    }

    /// Straight-line distance to another transform's position.
    #[inline]
    pub fn distance_to(&self, other: &Transform) -> f32 {
        (other.position - self.position).norm()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vector3::zeros(), 0.0)
    }
}
