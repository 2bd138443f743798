//! The entity table: one slot per entity holding its body and behavior.

use tracing::debug;

use crate::body::Body;
use crate::capability::{AsAny, GameEntity};
use crate::entity::{EntityAllocator, EntityId, FixtureId};
use crate::fixture::FixtureRef;
use crate::geometry::Shape;
use crate::WorldError;

// ---------------------------------------------------------------------------
// EntitySlot
// ---------------------------------------------------------------------------

/// A live entity: its id, body, and gameplay behavior.
pub struct EntitySlot {
    pub id: EntityId,
    pub body: Body,
    pub entity: Box<dyn GameEntity>,
}

impl EntitySlot {
    /// View of one of this slot's fixtures.
    pub fn fixture_ref(&self, index: u16) -> Option<FixtureRef<'_>> {
        self.body
            .fixture(index)
            .map(|f| FixtureRef::new(FixtureId::new(self.id, index), f, &self.body))
    }
}

impl std::fmt::Debug for EntitySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntitySlot")
            .field("id", &self.id)
            .field("kind", &self.entity.kind())
            .field("body", &self.body)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Owns every entity and its body.
///
/// Slots are indexed by [`EntityId::index`]. Cross-entity links held by
/// bodies (ladder, cart, sense justifications) are plain ids; despawning an
/// entity clears every such link that names it.
#[derive(Default)]
pub struct World {
    allocator: EntityAllocator,
    slots: Vec<Option<EntitySlot>>,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entity_count", &self.len())
            .finish()
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // -- entity lifecycle ---------------------------------------------------

    /// Spawn an entity with its body.
    ///
    /// Fails with [`WorldError::InvalidShape`] if any fixture shape is
    /// degenerate (negative extent, non-finite coordinates, a polygon with
    /// fewer than three vertices).
    pub fn spawn(&mut self, body: Body, entity: impl GameEntity) -> Result<EntityId, WorldError> {
        self.spawn_boxed(body, Box::new(entity))
    }

    pub fn spawn_boxed(&mut self, mut body: Body, entity: Box<dyn GameEntity>) -> Result<EntityId, WorldError> {
        for (index, fixture) in body.fixtures.iter().enumerate() {
            if let Some(reason) = shape_defect(&fixture.shape) {
                return Err(WorldError::InvalidShape {
                    fixture_index: index as u16,
                    reason,
                });
            }
        }
        body.sync_fixtures();
        body.record_prior_position();

        let id = self.allocator.allocate();
        let idx = id.index() as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        debug!(entity = %id, kind = entity.kind(), fixtures = body.fixtures.len(), "spawned");
        self.slots[idx] = Some(EntitySlot { id, body, entity });
        Ok(id)
    }

    /// Remove an entity and purge every reference other bodies hold to it.
    pub fn despawn(&mut self, id: EntityId) -> Result<EntitySlot, WorldError> {
        if !self.allocator.is_alive(id) {
            return Err(WorldError::StaleEntity { entity: id });
        }
        let slot = self.slots[id.index() as usize]
            .take()
            .ok_or(WorldError::StaleEntity { entity: id })?;
        self.allocator.release(id);

        for other in self.slots.iter_mut().flatten() {
            let body = &mut other.body;
            body.senses.purge_entity(id);
            if body.ladder == Some(id) {
                body.ladder = None;
            }
            if body.cart == Some(id) {
                body.cart = None;
            }
        }
        debug!(entity = %id, kind = slot.entity.kind(), "despawned");
        Ok(slot)
    }

    #[inline]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.allocator.live_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -- access ---------------------------------------------------------------

    pub fn slot(&self, id: EntityId) -> Option<&EntitySlot> {
        if !self.allocator.is_alive(id) {
            return None;
        }
        self.slots.get(id.index() as usize)?.as_ref()
    }

    pub fn slot_mut(&mut self, id: EntityId) -> Option<&mut EntitySlot> {
        if !self.allocator.is_alive(id) {
            return None;
        }
        self.slots.get_mut(id.index() as usize)?.as_mut()
    }

    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.slot(id).map(|s| &s.body)
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.slot_mut(id).map(|s| &mut s.body)
    }

    pub fn entity(&self, id: EntityId) -> Option<&dyn GameEntity> {
        self.slot(id).map(|s| &*s.entity)
    }

    /// Borrow an entity as its concrete type.
    pub fn entity_as<T: GameEntity>(&self, id: EntityId) -> Option<&T> {
        let entity: &dyn GameEntity = &*self.slot(id)?.entity;
        AsAny::as_any(entity).downcast_ref::<T>()
    }

    pub fn entity_as_mut<T: GameEntity>(&mut self, id: EntityId) -> Option<&mut T> {
        let entity: &mut dyn GameEntity = &mut *self.slot_mut(id)?.entity;
        AsAny::as_any_mut(entity).downcast_mut::<T>()
    }

    /// Resolve a fixture handle.
    pub fn fixture(&self, id: FixtureId) -> Result<FixtureRef<'_>, WorldError> {
        let slot = self
            .slot(id.entity)
            .ok_or(WorldError::StaleEntity { entity: id.entity })?;
        slot.fixture_ref(id.index)
            .ok_or(WorldError::UnknownFixture { fixture: id })
    }

    /// Mutable access to two distinct entities at once.
    pub fn pair_mut(
        &mut self,
        a: EntityId,
        b: EntityId,
    ) -> Result<(&mut EntitySlot, &mut EntitySlot), WorldError> {
        if a.index() == b.index() {
            return Err(WorldError::SameEntity { entity: a });
        }
        for id in [a, b] {
            if !self.allocator.is_alive(id) {
                return Err(WorldError::StaleEntity { entity: id });
            }
        }
        let (ia, ib) = (a.index() as usize, b.index() as usize);
        let (lo, hi) = (ia.min(ib), ia.max(ib));
        let (left, right) = self.slots.split_at_mut(hi);
        match (left[lo].as_mut(), right[0].as_mut()) {
            (Some(low), Some(high)) => Ok(if ia < ib { (low, high) } else { (high, low) }),
            _ => Err(WorldError::StaleEntity { entity: a }),
        }
    }

    // -- iteration ------------------------------------------------------------

    /// Live slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySlot> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EntitySlot> {
        self.slots.iter_mut().flatten()
    }

    /// Live entity ids in index order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|s| s.id).collect()
    }
}

fn shape_defect(shape: &Shape) -> Option<&'static str> {
    let bounds = shape.bounding_rect();
    let finite = [bounds.x, bounds.y, bounds.width, bounds.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return Some("non-finite coordinates");
    }
    match shape {
        Shape::Rect(r) if r.width < 0.0 || r.height < 0.0 => Some("negative extent"),
        Shape::Circle(c) if c.radius < 0.0 => Some("negative radius"),
        Shape::Polygon(p) if p.vertices.len() < 3 => Some("polygon needs at least three vertices"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
