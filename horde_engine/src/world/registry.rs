/// Entity storage shared by World and FrameContext.
///
/// Holds the slot map, the live list (visitation order) and the two
/// deferred queues. All structural requests go through here; they are
/// resolved by World at fixed points in the frame.

use slotmap::SlotMap;
use super::entity::{Body, Entity, EntityKey, EntityState};

pub(crate) struct EntityRecord {
    pub(crate) body: Body,
    pub(crate) state: EntityState,
    /// Taken out while one of its hooks runs
    pub(crate) behavior: Option<Box<dyn Entity>>,
}

#[derive(Default)]
pub(crate) struct Registry {
    pub(crate) entities: SlotMap<EntityKey, EntityRecord>,
    pub(crate) live: Vec<EntityKey>,
    pub(crate) pending_spawns: Vec<EntityKey>,
    pub(crate) pending_kills: Vec<EntityKey>,
}

impl Registry {
    /// Store a new entity in `Pending` state and queue its activation.
    pub(crate) fn spawn(&mut self, body: Body, behavior: Box<dyn Entity>) -> EntityKey {
        let key = self.entities.insert(EntityRecord {
            body,
            state: EntityState::Pending,
            behavior: Some(behavior),
        });
        self.pending_spawns.push(key);
        key
    }

    /// Queue a kill. Unknown and already-dead keys are ignored; duplicates are harmless.
    pub(crate) fn kill(&mut self, key: EntityKey) {
        if self.state(key) != EntityState::Dead {
            self.pending_kills.push(key);
        }
    }

    pub(crate) fn state(&self, key: EntityKey) -> EntityState {
        self.entities
            .get(key)
            .map(|record| record.state)
            .unwrap_or(EntityState::Dead)
    }

    pub(crate) fn body(&self, key: EntityKey) -> Option<&Body> {
        self.entities.get(key).map(|record| &record.body)
    }

    pub(crate) fn body_mut(&mut self, key: EntityKey) -> Option<&mut Body> {
        self.entities.get_mut(key).map(|record| &mut record.body)
    }

    /// Live entities in visitation order.
    pub(crate) fn iter_live(&self) -> impl Iterator<Item = (EntityKey, &Body)> + '_ {
        self.live
            .iter()
            .filter_map(move |&key| self.entities.get(key).map(|record| (key, &record.body)))
    }
}
