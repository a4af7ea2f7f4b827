//! The scene-scoped presence session.
//!
//! One object owns every moving part for the duration of a scene visit:
//! created on entry, destroyed on exit, no process-wide state. The host's
//! render loop drives it with raw key events and one `tick` per frame, and
//! reads back the local transform, the camera pose and the avatar draw list.

use std::time::Instant;

use log::{debug, info, warn};
use shared::motion::{self, MotionConfig};
use shared::Transform;
use thiserror::Error;

use crate::avatar::{self, AvatarVisual};
use crate::camera::{CameraFollower, CameraPose};
use crate::input::{InputSampler, KeyCode};
use crate::interpolate;
use crate::publisher::PresencePublisher;
use crate::registry::{RemoteAvatar, RemoteAvatarRegistry};
use crate::store::{PresenceStore, ProfileDirectory, SceneId, StoreError, UserId};
use crate::subscriber::PresenceSubscriber;

/// Fatal failures while entering a scene.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The change feed could not be opened. There is no reconnect; entering
    /// the scene again is the retry.
    #[error("failed to open the presence subscription")]
    Subscribe(#[source] StoreError),
}

/// One user's live participation in one scene.
pub struct SceneSession<S: PresenceStore, P: ProfileDirectory> {
    store: S,
    input: InputSampler,
    local: Transform,
    motion_config: MotionConfig,
    publisher: PresencePublisher,
    subscriber: PresenceSubscriber<P>,
    registry: RemoteAvatarRegistry,
    camera: CameraFollower,
}

impl<S: PresenceStore, P: ProfileDirectory> SceneSession<S, P> {
    /// Enters `scene_id` as `user_id`, spawning at the default placement.
    ///
    /// Behavior:
    /// - Publishes the join announcement. Failure is logged and absorbed;
    ///   the next moving tick re-publishes.
    /// - Opens the scene's change feed. This is the only fatal step.
    /// - Bootstraps the roster from the current scene rows. Failure is
    ///   logged and absorbed; live events repopulate.
    pub fn enter(
        store: S,
        profiles: P,
        user_id: UserId,
        scene_id: SceneId,
    ) -> Result<Self, SessionError> {
        let local = Transform::spawn();

        let mut publisher = PresencePublisher::new(user_id.clone(), scene_id.clone());
        if let Err(err) = publisher.announce(&store, &local, Instant::now()) {
            warn!("join announcement failed for {user_id} in {scene_id}: {err}");
        }

        let mut subscriber =
            PresenceSubscriber::open(&store, profiles, scene_id.clone(), user_id.clone())
                .map_err(SessionError::Subscribe)?;

        let mut registry = RemoteAvatarRegistry::new();
        for event in subscriber.bootstrap(&store) {
            registry.apply(event);
        }
        info!(
            "entered scene {scene_id} as {user_id}, {} remote avatars present",
            registry.len()
        );

        Ok(Self {
            camera: CameraFollower::new(&local),
            store,
            input: InputSampler::default(),
            local,
            motion_config: MotionConfig::default(),
            publisher,
            subscriber,
            registry,
        })
    }

    /// Raw key-down from the host window.
    pub fn key_down(&mut self, key: KeyCode) {
        self.input.key_down(key);
    }

    /// Raw key-up from the host window.
    pub fn key_up(&mut self, key: KeyCode) {
        self.input.key_up(key);
    }

    /// One cooperative turn of the whole subsystem, driven by the render
    /// loop.
    ///
    /// Order matters: local motion feeds the publisher, then the inbound
    /// feed drains into the registry before the displayed transforms take
    /// their interpolation step, so this frame already smooths toward the
    /// newest snapshots. Collaborator failures are logged, never raised.
    pub fn tick(&mut self, now: Instant) {
        let moved = motion::step(&mut self.local, self.input.intent(), &self.motion_config);
        if let Err(err) = self
            .publisher
            .try_publish(&self.store, moved, &self.local, now)
        {
            warn!("presence publish failed: {err}");
        }

        for event in self.subscriber.poll() {
            self.registry.apply(event);
        }
        interpolate::interpolate(&mut self.registry);

        self.camera.follow(&self.local);
    }

    /// The local avatar's current transform.
    pub fn local_transform(&self) -> &Transform {
        &self.local
    }

    /// Camera placement for this frame.
    pub fn camera(&self) -> &CameraPose {
        self.camera.pose()
    }

    /// Every currently-known remote avatar.
    pub fn remote_avatars(&self) -> impl Iterator<Item = &RemoteAvatar> {
        self.registry.iter()
    }

    /// How many remote users the roster currently holds.
    pub fn remote_count(&self) -> usize {
        self.registry.len()
    }

    /// Draw list for the renderer: the local avatar first, then every
    /// remote at its smoothed transform.
    pub fn visuals(&self) -> Vec<AvatarVisual> {
        let mut visuals = Vec::with_capacity(1 + self.registry.len());
        visuals.push(avatar::local_visual(&self.local));
        visuals.extend(self.registry.iter().map(avatar::remote_visual));
        visuals
    }

    /// Leaves the scene. Equivalent to dropping the session.
    pub fn leave(self) {}
}

impl<S: PresenceStore, P: ProfileDirectory> Drop for SceneSession<S, P> {
    /// Scene exit: the subscription closes with the subscriber, and the own
    /// presence row goes away best-effort. A failed delete leaves a stale
    /// row for the store to supersede or garbage-collect; teardown never
    /// blocks on it.
    fn drop(&mut self) {
        if let Err(err) = self.publisher.withdraw(&self.store) {
            debug!("presence row cleanup failed: {err}");
        }
    }
}
