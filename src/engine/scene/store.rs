use serde::Serialize;
use slotmap::{SlotMap, new_key_type};

use crate::engine::camera::CameraPose;
use crate::engine::scene::{CameraStateTable, SceneKey};

new_key_type! {
    /// Handle returned by `CameraStore::subscribe`; pass it to `unsubscribe` on teardown.
    pub struct SubscriptionId;
}

/// Snapshot of the store. Scene key and pose always belong together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraStoreState {
    pub current: SceneKey,
    pub previous: Option<SceneKey>,
    pub pose: CameraPose,
}

type Subscriber = Box<dyn FnMut(&CameraStoreState)>;

/// Holds the active scene and its resolved pose.
///
/// Contract:
/// - `set_scene` is the only mutation path.
/// - Setting the current scene again is a no-op (no lookup, no notification).
/// - Subscribers run synchronously, after the new state is fully in place.
pub struct CameraStore {
    table: CameraStateTable,
    state: CameraStoreState,
    subscribers: SlotMap<SubscriptionId, Subscriber>,
    notifications: u64,
}

impl CameraStore {
    /// Start in the table's default scene.
    pub fn new(table: CameraStateTable) -> Self {
        let current = table.default_scene();
        let pose = table.resolve(current);
        Self {
            table,
            state: CameraStoreState {
                current,
                previous: None,
                pose,
            },
            subscribers: SlotMap::with_key(),
            notifications: 0,
        }
    }

    pub fn state(&self) -> CameraStoreState {
        self.state
    }

    pub fn current(&self) -> SceneKey {
        self.state.current
    }

    pub fn pose(&self) -> &CameraPose {
        &self.state.pose
    }

    pub fn table(&self) -> &CameraStateTable {
        &self.table
    }

    /// Total number of subscriber notifications sent so far.
    pub fn notifications(&self) -> u64 {
        self.notifications
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&CameraStoreState) + 'static) -> SubscriptionId {
        self.subscribers.insert(Box::new(callback))
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    /// Transition to `key`. Returns true if the scene changed.
    pub fn set_scene(&mut self, key: SceneKey) -> bool {
        if key == self.state.current {
            return false;
        }

        let next = CameraStoreState {
            current: key,
            previous: Some(self.state.current),
            pose: self.table.resolve(key),
        };
        self.state = next;

        log::info!(
            "scene {} -> {}",
            next.previous.map(SceneKey::name).unwrap_or("-"),
            next.current
        );

        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&next);
            self.notifications += 1;
        }

        true
    }
}

impl std::fmt::Debug for CameraStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .field("notifications", &self.notifications)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn store() -> CameraStore {
        CameraStore::new(CameraStateTable::default())
    }

    #[test]
    fn starts_in_default_scene_without_previous() {
        let s = store();
        assert_eq!(s.current(), SceneKey::Home);
        assert_eq!(s.state().previous, None);
        assert_eq!(*s.pose(), s.table().resolve(SceneKey::Home));
    }

    #[test]
    fn set_scene_tracks_previous_and_pose() {
        let mut s = store();

        assert!(s.set_scene(SceneKey::Stairs));
        assert_eq!(s.current(), SceneKey::Stairs);
        assert_eq!(s.state().previous, Some(SceneKey::Home));
        assert_eq!(*s.pose(), s.table().resolve(SceneKey::Stairs));

        assert!(s.set_scene(SceneKey::Hoop));
        assert_eq!(s.state().previous, Some(SceneKey::Stairs));
    }

    #[test]
    fn setting_current_scene_is_a_no_op() {
        let mut s = store();
        let seen = Rc::new(RefCell::new(0u32));
        let seen_cb = Rc::clone(&seen);
        s.subscribe(move |_| *seen_cb.borrow_mut() += 1);

        assert!(!s.set_scene(SceneKey::Home));
        assert_eq!(s.notifications(), 0);
        assert_eq!(*seen.borrow(), 0);
        assert_eq!(s.state().previous, None);
    }

    #[test]
    fn subscribers_see_consistent_state() {
        let mut s = store();
        let table = s.table().clone();
        let seen: Rc<RefCell<Vec<CameraStoreState>>> = Rc::default();
        let seen_cb = Rc::clone(&seen);
        s.subscribe(move |state| seen_cb.borrow_mut().push(*state));

        s.set_scene(SceneKey::Projects);
        s.set_scene(SceneKey::Menu);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        for state in seen.iter() {
            assert_eq!(state.pose, table.resolve(state.current));
        }
        assert_eq!(seen[1].previous, Some(SceneKey::Projects));
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut s = store();
        let seen = Rc::new(RefCell::new(0u32));
        let seen_cb = Rc::clone(&seen);
        let id = s.subscribe(move |_| *seen_cb.borrow_mut() += 1);

        s.set_scene(SceneKey::Arcade);
        assert!(s.unsubscribe(id));
        assert!(!s.unsubscribe(id));
        s.set_scene(SceneKey::Home);

        assert_eq!(*seen.borrow(), 1);
        assert_eq!(s.subscriber_count(), 0);
    }
}
