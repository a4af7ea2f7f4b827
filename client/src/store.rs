//! Boundary contract for the shared presence medium and the profile
//! directory.
//!
//! The store is row-oriented: at most one live snapshot per `(user, scene)`
//! pair, upsert semantics on that composite key, and per-scene change
//! notifications. Everything the sync core knows about the backend is
//! expressed here; concrete adapters live with the host.

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};
use shared::Transform;
use thiserror::Error;

/// Opaque identity of one signed-in user, issued by the auth layer.
pub type UserId = String;

/// Opaque identity of one scene.
pub type SceneId = String;

/// Errors surfaced by the presence store or the profile directory.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend received the request and refused it.
    #[error("presence store rejected the request: {0}")]
    Rejected(String),
    /// The backend could not be reached.
    #[error("presence store unavailable: {0}")]
    Unavailable(String),
}

/// One live snapshot row: the latest published transform for one user in one
/// scene. Field names double as the store's column names.
///
/// Always a full transform, never a delta. The store keeps only the latest
/// row per key, so last-writer-wins is the whole consistency model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresenceRow {
    pub user_id: UserId,
    pub scene_id: SceneId,
    pub position_x: f32,
    pub position_y: f32,
    pub position_z: f32,
    pub rotation_y: f32,
    /// Wall-clock Unix milliseconds at publish time. Store metadata only;
    /// the sync logic never reads it back.
    pub last_updated: u64,
}

impl PresenceRow {
    /// Builds the row for `transform`, stamped with the current wall clock.
    pub fn from_transform(user_id: UserId, scene_id: SceneId, transform: &Transform) -> Self {
        Self {
            user_id,
            scene_id,
            position_x: transform.position.x,
            position_y: transform.position.y,
            position_z: transform.position.z,
            rotation_y: transform.yaw,
            last_updated: unix_millis(),
        }
    }

    /// The transform carried by this row.
    pub fn transform(&self) -> Transform {
        Transform::new(
            nalgebra::Vector3::new(self.position_x, self.position_y, self.position_z),
            self.rotation_y,
        )
    }
}

/// Display metadata for one user. Both fields are nullable in the store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: Option<String>,
    pub avatar_color: Option<String>,
}

/// A raw change notification from the store, scoped to one scene.
#[derive(Clone, Debug)]
pub enum RowChange {
    Inserted(PresenceRow),
    Updated(PresenceRow),
    /// Only the key of the removed row survives deletion.
    Deleted { user_id: UserId, scene_id: SceneId },
}

/// Receiving end of one scene's change feed.
///
/// Dropping the subscription closes it: the sending side observes the
/// disconnect and stops delivering, so a torn-down session can never be
/// mutated by late notifications.
pub struct Subscription {
    receiver: Receiver<RowChange>,
}

impl Subscription {
    pub fn new(receiver: Receiver<RowChange>) -> Self {
        Self { receiver }
    }

    /// Everything delivered since the last drain, in delivery order, without
    /// blocking.
    pub fn drain(&self) -> impl Iterator<Item = RowChange> + '_ {
        self.receiver.try_iter()
    }
}

/// Builds a connected `(sender, subscription)` pair for store adapters.
pub fn subscription_channel() -> (Sender<RowChange>, Subscription) {
    let (sender, receiver) = unbounded();
    (sender, Subscription::new(receiver))
}

/// The shared presence medium.
pub trait PresenceStore {
    /// Inserts or replaces the row keyed by `(row.user_id, row.scene_id)`.
    fn upsert_presence(&self, row: PresenceRow) -> Result<(), StoreError>;

    /// Removes the row for `(user_id, scene_id)` if it exists.
    fn delete_presence(&self, user_id: &UserId, scene_id: &SceneId) -> Result<(), StoreError>;

    /// All current rows in `scene_id`, excluding `exclude_user`.
    fn scene_presence(
        &self,
        scene_id: &SceneId,
        exclude_user: &UserId,
    ) -> Result<Vec<PresenceRow>, StoreError>;

    /// Opens a change feed for `scene_id`.
    ///
    /// The feed must deliver changes to a single row in commit order; no
    /// ordering is promised across rows.
    fn subscribe(&self, scene_id: &SceneId) -> Result<Subscription, StoreError>;
}

/// Lookup of display metadata by user.
pub trait ProfileDirectory {
    /// `Ok(None)` when the user has no profile row.
    fn profile(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError>;
}

// Hosts usually keep one store client and hand shared handles to whoever
// needs them.
impl<S: PresenceStore> PresenceStore for Rc<S> {
    fn upsert_presence(&self, row: PresenceRow) -> Result<(), StoreError> {
        (**self).upsert_presence(row)
    }

    fn delete_presence(&self, user_id: &UserId, scene_id: &SceneId) -> Result<(), StoreError> {
        (**self).delete_presence(user_id, scene_id)
    }

    fn scene_presence(
        &self,
        scene_id: &SceneId,
        exclude_user: &UserId,
    ) -> Result<Vec<PresenceRow>, StoreError> {
        (**self).scene_presence(scene_id, exclude_user)
    }

    fn subscribe(&self, scene_id: &SceneId) -> Result<Subscription, StoreError> {
        (**self).subscribe(scene_id)
    }
}

impl<P: ProfileDirectory> ProfileDirectory for Rc<P> {
    fn profile(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError> {
        (**self).profile(user_id)
    }
}

pub(crate) fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
