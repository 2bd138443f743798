//! Entity and fixture handles.
//!
//! Every game entity owns exactly one body, so an [`EntityId`] doubles as the
//! body handle. Fixtures are addressed by [`FixtureId`]: the owning entity
//! plus the fixture's position in its body.
//!
//! Handles are weak. A handle held across ticks (a ladder link, a contact
//! remembered from last step) is validated against the [`EntityAllocator`]
//! before use; a recycled slot carries a newer generation and the stale handle
//! simply stops resolving.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// Slot index plus the generation the slot had when the handle was issued.
///
/// Ordering is by slot index first, so sorted contact sets follow spawn
/// order of the slots they touch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

// ---------------------------------------------------------------------------
// FixtureId
// ---------------------------------------------------------------------------

/// Handle to one fixture: owning entity plus index into that entity's body.
///
/// Ordering is `(entity, index)`, which gives contact pairs a stable
/// canonical order independent of the order the overlap detector found them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FixtureId {
    /// The entity whose body owns the fixture.
    pub entity: EntityId,
    /// Position of the fixture in the body's fixture list.
    pub index: u16,
}

impl FixtureId {
    #[inline]
    pub fn new(entity: EntityId, index: u16) -> Self {
        Self { entity, index }
    }

    /// `true` if both fixtures hang off the same entity.
    #[inline]
    pub fn same_entity(self, other: FixtureId) -> bool {
        self.entity == other.entity
    }
}

impl fmt::Debug for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixture({})", self)
    }
}

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.entity, self.index)
    }
}

// ---------------------------------------------------------------------------
// EntityAllocator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct SlotState {
    generation: u32,
    live: bool,
}

/// Hands out [`EntityId`]s and tracks which are still live.
///
/// Released slots queue up and are reused oldest first, so a slot freed this
/// step is not handed straight back out while last step's contacts may still
/// name it.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    slots: Vec<SlotState>,
    free: VecDeque<u32>,
    live: usize,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> EntityId {
        self.live += 1;
        match self.free.pop_front() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.live = true;
                EntityId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(SlotState {
                    generation: 0,
                    live: true,
                });
                EntityId::new(index, 0)
            }
        }
    }

    /// Retire `id` and bump its slot's generation.
    ///
    /// Returns `false` if the handle was already stale or never allocated.
    pub fn release(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let slot = &mut self.slots[id.index as usize];
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push_back(id.index);
        self.live -= 1;
        true
    }

    /// `true` if `id` names a live entity with a current generation.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.live && slot.generation == id.generation)
    }

    /// Number of live entities.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_slots_are_sequential() {
        let mut alloc = EntityAllocator::new();
        let ids: Vec<EntityId> = (0..16).map(|_| alloc.allocate()).collect();
        assert!(ids.iter().enumerate().all(|(i, id)| id.index() == i as u32));
        assert!(ids.iter().all(|id| id.generation() == 0));
        assert_eq!(alloc.live_count(), 16);
    }

    #[test]
    fn recycled_slot_gets_new_generation() {
        let mut alloc = EntityAllocator::new();
        let first = alloc.allocate();
        let second = alloc.allocate();
        assert!(alloc.release(first));
        assert!(alloc.release(second));

        // Oldest release comes back first.
        let reused = alloc.allocate();
        assert_eq!(reused, EntityId::new(first.index(), 1));
        assert!(!alloc.is_alive(first));
        assert!(alloc.is_alive(reused));
        assert!(!alloc.release(first));
        assert_eq!(alloc.live_count(), 1);
    }

    #[test]
    fn unknown_handles_are_not_alive() {
        let alloc = EntityAllocator::new();
        assert!(!alloc.is_alive(EntityId::new(3, 0)));
    }

    #[test]
    fn fixture_ids_order_by_entity_then_index() {
        let a = FixtureId::new(EntityId::new(1, 0), 3);
        let b = FixtureId::new(EntityId::new(2, 0), 0);
        let c = FixtureId::new(EntityId::new(1, 0), 4);
        assert!(a < b);
        assert!(a < c);
        assert!(a.same_entity(c));
        assert!(!a.same_entity(b));
    }

    #[test]
    fn display_formats() {
        let id = EntityId::new(42, 7);
        assert_eq!(id.to_string(), "42v7");
        assert_eq!(format!("{id:?}"), "Entity(42v7)");
        assert_eq!(FixtureId::new(id, 2).to_string(), "42v7#2");
    }
}
