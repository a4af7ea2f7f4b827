//! Presence synchronization and interpolation for a shared 3D scene.
//!
//! Each participant runs one [`SceneSession`]: it samples held keys, steps
//! the local avatar across the bounded ground plane, publishes the resulting
//! transform to the shared presence store at a throttled rate, ingests the
//! scene's change feed into a roster of remote avatars, and smooths every
//! displayed transform toward its latest snapshot so irregular, latent
//! updates read as continuous motion.
//!
//! The store and the profile directory are boundary traits
//! ([`PresenceStore`], [`ProfileDirectory`]); rendering belongs to the host,
//! fed by [`AvatarVisual`] descriptors and the [`CameraPose`].

pub mod avatar;
pub mod camera;
pub mod input;
pub mod interpolate;
pub mod publisher;
pub mod registry;
pub mod session;
pub mod store;
pub mod subscriber;

#[cfg(test)]
mod testutil;

pub use avatar::{AvatarVisual, idle_float_offset, local_visual, remote_visual};
pub use camera::{CameraFollower, CameraPose};
pub use input::{InputAction, InputMap, InputSampler, KeyCode};
pub use publisher::PresencePublisher;
pub use registry::{PresenceEvent, RemoteAvatar, RemoteAvatarRegistry};
pub use session::{SceneSession, SessionError};
pub use store::{
    PresenceRow, PresenceStore, Profile, ProfileDirectory, RowChange, SceneId, StoreError,
    Subscription, UserId, subscription_channel,
};
pub use subscriber::PresenceSubscriber;
