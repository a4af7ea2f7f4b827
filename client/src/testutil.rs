//! In-memory store and profile fixtures for exercising the sync core.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crossbeam_channel::Sender;

use crate::store::{
    PresenceRow, PresenceStore, Profile, ProfileDirectory, RowChange, SceneId, StoreError,
    Subscription, UserId, subscription_channel,
};

/// Single-process presence store with the same observable contract as the
/// real backend: upsert by `(user, scene)`, per-scene change feeds in commit
/// order, and switchable failure injection.
#[derive(Default)]
pub struct MemoryStore {
    rows: RefCell<HashMap<(UserId, SceneId), PresenceRow>>,
    feeds: RefCell<Vec<(SceneId, Sender<RowChange>)>>,
    /// When set, upserts and deletes fail.
    pub fail_writes: Cell<bool>,
    /// When set, `scene_presence` fails.
    pub fail_queries: Cell<bool>,
    /// When set, `subscribe` fails.
    pub fail_subscribe: Cell<bool>,
    /// Total successful upserts observed.
    pub upserts: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct row access for assertions.
    pub fn row(&self, user_id: &str, scene_id: &str) -> Option<PresenceRow> {
        self.rows
            .borrow()
            .get(&(user_id.to_owned(), scene_id.to_owned()))
            .cloned()
    }

    fn notify(&self, scene_id: &SceneId, change: RowChange) {
        // Closed feeds (dropped receivers) fall out of the list here.
        self.feeds
            .borrow_mut()
            .retain(|(scene, sender)| scene != scene_id || sender.send(change.clone()).is_ok());
    }
}

impl PresenceStore for MemoryStore {
    fn upsert_presence(&self, row: PresenceRow) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }

        self.upserts.set(self.upserts.get() + 1);
        let scene_id = row.scene_id.clone();
        let previous = self
            .rows
            .borrow_mut()
            .insert((row.user_id.clone(), row.scene_id.clone()), row.clone());

        let change = if previous.is_some() {
            RowChange::Updated(row)
        } else {
            RowChange::Inserted(row)
        };
        self.notify(&scene_id, change);
        Ok(())
    }

    fn delete_presence(&self, user_id: &UserId, scene_id: &SceneId) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }

        let removed = self
            .rows
            .borrow_mut()
            .remove(&(user_id.clone(), scene_id.clone()));
        if removed.is_some() {
            self.notify(
                scene_id,
                RowChange::Deleted {
                    user_id: user_id.clone(),
                    scene_id: scene_id.clone(),
                },
            );
        }
        Ok(())
    }

    fn scene_presence(
        &self,
        scene_id: &SceneId,
        exclude_user: &UserId,
    ) -> Result<Vec<PresenceRow>, StoreError> {
        if self.fail_queries.get() {
            return Err(StoreError::Unavailable("injected query failure".into()));
        }

        Ok(self
            .rows
            .borrow()
            .values()
            .filter(|row| &row.scene_id == scene_id && &row.user_id != exclude_user)
            .cloned()
            .collect())
    }

    fn subscribe(&self, scene_id: &SceneId) -> Result<Subscription, StoreError> {
        if self.fail_subscribe.get() {
            return Err(StoreError::Unavailable("injected subscribe failure".into()));
        }

        let (sender, subscription) = subscription_channel();
        self.feeds.borrow_mut().push((scene_id.clone(), sender));
        Ok(subscription)
    }
}

/// Fixed profile directory with lookup counting and failure injection.
#[derive(Default)]
pub struct StaticProfiles {
    profiles: HashMap<UserId, Profile>,
    /// When set, every lookup fails.
    pub fail: Cell<bool>,
    /// Total lookups attempted.
    pub lookups: Cell<usize>,
}

impl StaticProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, user_id: &str, username: &str, color: &str) -> Self {
        self.profiles.insert(
            user_id.to_owned(),
            Profile {
                username: Some(username.to_owned()),
                avatar_color: Some(color.to_owned()),
            },
        );
        self
    }
}

impl ProfileDirectory for StaticProfiles {
    fn profile(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError> {
        self.lookups.set(self.lookups.get() + 1);
        if self.fail.get() {
            return Err(StoreError::Unavailable("injected lookup failure".into()));
        }
        Ok(self.profiles.get(user_id).cloned())
    }
}
