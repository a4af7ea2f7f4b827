//! The in-memory roster of every other user currently present in the scene.

use std::collections::HashMap;

use shared::Transform;

use crate::store::UserId;

/// Typed presence event, produced by the subscriber and consumed here.
#[derive(Clone, Debug)]
pub enum PresenceEvent {
    /// A remote user appeared or moved. Carries the full latest snapshot and
    /// whatever display metadata resolved for them.
    Upsert {
        user_id: UserId,
        transform: Transform,
        username: Option<String>,
        color: Option<String>,
    },
    /// A remote user left the scene.
    Remove { user_id: UserId },
}

/// Last-known state for one remote user.
#[derive(Clone, Debug)]
pub struct RemoteAvatar {
    pub user_id: UserId,
    pub username: Option<String>,
    pub color: Option<String>,
    /// Latest snapshot received from the store.
    pub target: Transform,
    /// What the renderer shows; chases `target` one interpolation step at a
    /// time.
    pub displayed: Transform,
}

/// Reducer over [`PresenceEvent`]s, keyed by user.
///
/// Written only from drained subscriber events, read every render tick by the
/// interpolation step. At most one entry exists per user at any time.
#[derive(Debug, Default)]
pub struct RemoteAvatarRegistry {
    avatars: HashMap<UserId, RemoteAvatar>,
}

impl RemoteAvatarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event.
    ///
    /// Behavior:
    /// - Upsert for an unseen user inserts the entry with
    ///   `displayed == target`, so a newcomer never glides in from the origin.
    /// - Upsert for a known user replaces `target` and the display metadata
    ///   wholesale and leaves `displayed` wherever interpolation last put it.
    /// - Remove deletes the entry; an unknown user is a no-op.
    pub fn apply(&mut self, event: PresenceEvent) {
        match event {
            PresenceEvent::Upsert {
                user_id,
                transform,
                username,
                color,
            } => match self.avatars.get_mut(&user_id) {
                Some(avatar) => {
                    avatar.target = transform;
                    avatar.username = username;
                    avatar.color = color;
                }
                None => {
                    self.avatars.insert(
                        user_id.clone(),
                        RemoteAvatar {
                            user_id,
                            username,
                            color,
                            target: transform,
                            displayed: transform,
                        },
                    );
                }
            },
            PresenceEvent::Remove { user_id } => {
                self.avatars.remove(&user_id);
            }
        }
    }

    pub fn get(&self, user_id: &UserId) -> Option<&RemoteAvatar> {
        self.avatars.get(user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RemoteAvatar> {
        self.avatars.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut RemoteAvatar> {
        self.avatars.values_mut()
    }

    pub fn len(&self) -> usize {
        self.avatars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.avatars.is_empty()
    }
}
