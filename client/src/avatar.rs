//! Renderer-facing description of one avatar.
//!
//! There is no local/remote type hierarchy: both roles flatten into the same
//! capability-parameterized descriptor and the renderer draws whatever it is
//! handed.

use shared::Transform;
use shared::constants::{IDLE_FLOAT_AMPLITUDE, IDLE_FLOAT_RATE};

use crate::registry::RemoteAvatar;

/// Body color of the locally-controlled avatar.
pub const LOCAL_AVATAR_COLOR: &str = "#00D9FF";

/// Body color for remote users whose profile carries none.
pub const REMOTE_AVATAR_FALLBACK_COLOR: &str = "#FF6B6B";

/// Name badge for remote users whose profile carries no username.
pub const ANONYMOUS_USERNAME: &str = "Anonymous";

/// Everything the renderer needs to draw one avatar.
#[derive(Clone, Debug, PartialEq)]
pub struct AvatarVisual {
    pub transform: Transform,
    /// Hex color for body, head and glow.
    pub color: String,
    /// Name badge text; `None` renders no badge.
    pub label: Option<String>,
    /// Whether the head gets the idle bob (see [`idle_float_offset`]).
    pub idle_float: bool,
}

/// Descriptor for the locally-controlled avatar.
pub fn local_visual(transform: &Transform) -> AvatarVisual {
    AvatarVisual {
        transform: *transform,
        color: LOCAL_AVATAR_COLOR.to_owned(),
        label: None,
        idle_float: true,
    }
}

/// Descriptor for one remote avatar, drawn at its displayed (smoothed)
/// transform rather than the raw snapshot target.
pub fn remote_visual(avatar: &RemoteAvatar) -> AvatarVisual {
    AvatarVisual {
        transform: avatar.displayed,
        color: avatar
            .color
            .clone()
            .unwrap_or_else(|| REMOTE_AVATAR_FALLBACK_COLOR.to_owned()),
        label: Some(
            avatar
                .username
                .clone()
                .unwrap_or_else(|| ANONYMOUS_USERNAME.to_owned()),
        ),
        idle_float: false,
    }
}

/// Vertical head offset of the idle bob, `elapsed` seconds into the scene.
#[inline]
pub fn idle_float_offset(elapsed_secs: f32) -> f32 {
    (elapsed_secs * IDLE_FLOAT_RATE).sin() * IDLE_FLOAT_AMPLITUDE
}
