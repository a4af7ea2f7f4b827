//! Third-person camera placement derived from the local avatar.

use nalgebra::Vector3;
use shared::Transform;
use shared::constants::{CAMERA_OFFSET, CAMERA_SMOOTHING};

/// Where the camera sits and what it looks at, world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vector3<f32>,
    pub look_at: Vector3<f32>,
}

/// Trails the local avatar from a fixed offset rotated by the avatar's yaw,
/// so the camera stays behind whichever way the avatar faces.
#[derive(Clone, Debug)]
pub struct CameraFollower {
    pose: CameraPose,
}

impl CameraFollower {
    /// Starts directly at the follow anchor, no initial glide.
    pub fn new(avatar: &Transform) -> Self {
        Self {
            pose: CameraPose {
                position: Self::anchor(avatar),
                look_at: avatar.position,
            },
        }
    }

    /// One follow step: lerp toward the anchor behind the avatar, pin the
    /// look-at on the avatar itself.
    pub fn follow(&mut self, avatar: &Transform) {
        let anchor = Self::anchor(avatar);
        self.pose.position += (anchor - self.pose.position) * CAMERA_SMOOTHING;
        self.pose.look_at = avatar.position;
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    fn anchor(avatar: &Transform) -> Vector3<f32> {
        avatar.position + avatar.rotate_by_yaw(Vector3::from(CAMERA_OFFSET))
    }
}
