//! Translation of raw store notifications into typed presence events.

use std::collections::HashMap;

use log::warn;

use crate::registry::PresenceEvent;
use crate::store::{
    PresenceRow, PresenceStore, Profile, ProfileDirectory, RowChange, SceneId, StoreError,
    Subscription, UserId,
};

/// Scene-scoped consumer of the store's change feed.
///
/// Owns the subscription handle and a per-user profile cache. Lookups are
/// cached after the first attempt, failed ones included: a user whose profile
/// could not be fetched simply renders without a name badge and is never
/// retried.
pub struct PresenceSubscriber<P: ProfileDirectory> {
    scene_id: SceneId,
    local_user: UserId,
    subscription: Subscription,
    profiles: P,
    profile_cache: HashMap<UserId, Profile>,
}

impl<P: ProfileDirectory> PresenceSubscriber<P> {
    /// Opens the change feed for `scene_id`.
    ///
    /// There is no reconnect in this design: if opening fails, or the feed
    /// later drops, recovery is an explicit scene re-entry.
    pub fn open(
        store: &impl PresenceStore,
        profiles: P,
        scene_id: SceneId,
        local_user: UserId,
    ) -> Result<Self, StoreError> {
        let subscription = store.subscribe(&scene_id)?;
        Ok(Self {
            scene_id,
            local_user,
            subscription,
            profiles,
            profile_cache: HashMap::new(),
        })
    }

    /// Seeds the roster with everyone already present in the scene.
    ///
    /// A failed query is non-fatal and self-healing: the roster starts empty
    /// and later live events populate it.
    pub fn bootstrap(&mut self, store: &impl PresenceStore) -> Vec<PresenceEvent> {
        let rows = match store.scene_presence(&self.scene_id, &self.local_user) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(
                    "presence bootstrap failed for scene {}: {err}",
                    self.scene_id
                );
                return Vec::new();
            }
        };

        rows.into_iter().map(|row| self.upsert_event(row)).collect()
    }

    /// Drains every notification delivered since the last poll, in delivery
    /// order.
    ///
    /// Inserts and updates echoing the local user are dropped here, so the
    /// roster never contains the local avatar. No reordering happens: if the
    /// channel delivers a stale row after a newer one, the stale transform
    /// wins until the next in-order event corrects it.
    pub fn poll(&mut self) -> Vec<PresenceEvent> {
        let changes: Vec<RowChange> = self.subscription.drain().collect();
        let mut events = Vec::with_capacity(changes.len());

        for change in changes {
            match change {
                RowChange::Inserted(row) | RowChange::Updated(row) => {
                    if row.user_id == self.local_user {
                        continue;
                    }
                    events.push(self.upsert_event(row));
                }
                RowChange::Deleted { user_id, .. } => {
                    events.push(PresenceEvent::Remove { user_id });
                }
            }
        }

        events
    }

    fn upsert_event(&mut self, row: PresenceRow) -> PresenceEvent {
        let profile = self.lookup_profile(&row.user_id);
        let username = profile.username.clone();
        let color = profile.avatar_color.clone();

        PresenceEvent::Upsert {
            transform: row.transform(),
            user_id: row.user_id,
            username,
            color,
        }
    }

    fn lookup_profile(&mut self, user_id: &UserId) -> &Profile {
        if !self.profile_cache.contains_key(user_id) {
            let profile = match self.profiles.profile(user_id) {
                Ok(Some(profile)) => profile,
                Ok(None) => Profile::default(),
                Err(err) => {
                    warn!("profile lookup failed for {user_id}: {err}");
                    Profile::default()
                }
            };
            self.profile_cache.insert(user_id.clone(), profile);
        }

        &self.profile_cache[user_id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MemoryStore, StaticProfiles};
    use nalgebra::Vector3;
    use shared::Transform;

    fn row(user_id: &str, x: f32, z: f32) -> PresenceRow {
        PresenceRow::from_transform(
            user_id.to_owned(),
            "classroom".to_owned(),
            &Transform::new(Vector3::new(x, 0.0, z), 0.0),
        )
    }

    fn open(
        store: &MemoryStore,
        profiles: StaticProfiles,
    ) -> PresenceSubscriber<StaticProfiles> {
        PresenceSubscriber::open(store, profiles, "classroom".to_owned(), "u1".to_owned())
            .expect("feed opens")
    }

    #[test]
    fn bootstrap_seeds_everyone_but_the_local_user() {
        let store = MemoryStore::new();
        store.upsert_presence(row("u1", 0.0, 0.0)).unwrap();
        store.upsert_presence(row("u2", 3.0, 4.0)).unwrap();
        store.upsert_presence(row("u3", -1.0, 2.0)).unwrap();

        let profiles = StaticProfiles::new().with("u2", "ada", "#112233");
        let mut subscriber = open(&store, profiles);
        let events = subscriber.bootstrap(&store);

        assert_eq!(events.len(), 2);
        let named: Vec<_> = events
            .iter()
            .map(|event| match event {
                PresenceEvent::Upsert {
                    user_id, username, ..
                } => (user_id.clone(), username.clone()),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert!(named.contains(&("u2".to_owned(), Some("ada".to_owned()))));
        assert!(named.contains(&("u3".to_owned(), None)));
    }

    #[test]
    fn bootstrap_failure_is_non_fatal_and_live_events_still_arrive() {
        let store = MemoryStore::new();
        let mut subscriber = open(&store, StaticProfiles::new());

        store.fail_queries.set(true);
        assert!(subscriber.bootstrap(&store).is_empty());

        // The feed was opened before the query failed; live traffic flows.
        store.upsert_presence(row("u2", 1.0, 1.0)).unwrap();
        let events = subscriber.poll();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            PresenceEvent::Upsert { user_id, .. } if user_id == "u2"
        ));
    }

    #[test]
    fn inserts_and_updates_become_upserts_with_profile_metadata() {
        let store = MemoryStore::new();
        let profiles = StaticProfiles::new().with("u2", "ada", "#112233");
        let mut subscriber = open(&store, profiles);

        store.upsert_presence(row("u2", 3.0, 4.0)).unwrap();
        store.upsert_presence(row("u2", 5.0, 4.0)).unwrap();

        let events = subscriber.poll();
        assert_eq!(events.len(), 2);
        for event in &events {
            match event {
                PresenceEvent::Upsert {
                    username, color, ..
                } => {
                    assert_eq!(username.as_deref(), Some("ada"));
                    assert_eq!(color.as_deref(), Some("#112233"));
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
    }

    #[test]
    fn local_echoes_are_filtered_out() {
        let store = MemoryStore::new();
        let mut subscriber = open(&store, StaticProfiles::new());

        store.upsert_presence(row("u1", 1.0, 0.0)).unwrap();
        store.upsert_presence(row("u2", 2.0, 0.0)).unwrap();
        store.upsert_presence(row("u1", 3.0, 0.0)).unwrap();

        let events = subscriber.poll();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            PresenceEvent::Upsert { user_id, .. } if user_id == "u2"
        ));
    }

    #[test]
    fn deletes_become_removals_in_delivery_order() {
        let store = MemoryStore::new();
        let mut subscriber = open(&store, StaticProfiles::new());

        store.upsert_presence(row("u2", 1.0, 0.0)).unwrap();
        store
            .delete_presence(&"u2".to_owned(), &"classroom".to_owned())
            .unwrap();

        let events = subscriber.poll();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], PresenceEvent::Upsert { .. }));
        assert!(matches!(
            &events[1],
            PresenceEvent::Remove { user_id } if user_id == "u2"
        ));
    }

    #[test]
    fn profile_lookups_are_cached_including_failures() {
        let store = MemoryStore::new();
        let profiles = std::rc::Rc::new(StaticProfiles::new().with("u2", "ada", "#112233"));
        let mut subscriber = PresenceSubscriber::open(
            &store,
            std::rc::Rc::clone(&profiles),
            "classroom".to_owned(),
            "u1".to_owned(),
        )
        .expect("feed opens");

        profiles.fail.set(true);
        store.upsert_presence(row("u2", 1.0, 0.0)).unwrap();
        let events = subscriber.poll();
        assert!(matches!(
            &events[0],
            PresenceEvent::Upsert { username: None, color: None, .. }
        ));
        assert_eq!(profiles.lookups.get(), 1);

        // The directory recovered, but the failed lookup stays cached: the
        // user keeps rendering without a badge.
        profiles.fail.set(false);
        store.upsert_presence(row("u2", 2.0, 0.0)).unwrap();
        let events = subscriber.poll();
        assert!(matches!(
            &events[0],
            PresenceEvent::Upsert { username: None, .. }
        ));
        assert_eq!(profiles.lookups.get(), 1);
    }

    #[test]
    fn poll_without_traffic_is_empty() {
        let store = MemoryStore::new();
        let mut subscriber = open(&store, StaticProfiles::new());
        assert!(subscriber.poll().is_empty());
    }
}
