//! Rate-limited publication of the local avatar's transform.

use std::time::{Duration, Instant};

use shared::Transform;
use shared::constants::PRESENCE_PUBLISH_INTERVAL;

use crate::store::{PresenceRow, PresenceStore, SceneId, StoreError, UserId};

/// Leaky-bucket publisher: at most one upsert per interval, no queueing.
///
/// Skipped ticks are dropped, never deferred or batched. The next tick's
/// transform supersedes them, so staleness is bounded by the interval rather
/// than by a backlog.
#[derive(Debug)]
pub struct PresencePublisher {
    user_id: UserId,
    scene_id: SceneId,
    min_interval: Duration,
    last_published_at: Option<Instant>,
}

impl PresencePublisher {
    pub fn new(user_id: UserId, scene_id: SceneId) -> Self {
        Self::with_interval(user_id, scene_id, PRESENCE_PUBLISH_INTERVAL)
    }

    pub fn with_interval(user_id: UserId, scene_id: SceneId, min_interval: Duration) -> Self {
        Self {
            user_id,
            scene_id,
            min_interval,
            last_published_at: None,
        }
    }

    /// Unconditional join announcement on scene entry; starts the throttle
    /// window.
    pub fn announce(
        &mut self,
        store: &impl PresenceStore,
        transform: &Transform,
        now: Instant,
    ) -> Result<(), StoreError> {
        self.push(store, transform)?;
        self.last_published_at = Some(now);
        Ok(())
    }

    /// Publishes iff the avatar moved this tick and the window has elapsed.
    ///
    /// Returns whether a publish happened. A failed upsert leaves
    /// `last_published_at` untouched, so every following eligible tick
    /// re-attempts until one lands.
    pub fn try_publish(
        &mut self,
        store: &impl PresenceStore,
        moved: bool,
        transform: &Transform,
        now: Instant,
    ) -> Result<bool, StoreError> {
        if !moved {
            return Ok(false);
        }
        if let Some(last) = self.last_published_at {
            if now.duration_since(last) <= self.min_interval {
                return Ok(false);
            }
        }

        self.push(store, transform)?;
        self.last_published_at = Some(now);
        Ok(true)
    }

    /// Best-effort removal of the own row on scene exit.
    ///
    /// Failure leaves a stale row behind for the store to supersede or
    /// garbage-collect; nothing here retries.
    pub fn withdraw(&self, store: &impl PresenceStore) -> Result<(), StoreError> {
        store.delete_presence(&self.user_id, &self.scene_id)
    }

    fn push(&self, store: &impl PresenceStore, transform: &Transform) -> Result<(), StoreError> {
        store.upsert_presence(PresenceRow::from_transform(
            self.user_id.clone(),
            self.scene_id.clone(),
            transform,
        ))
    }
}
