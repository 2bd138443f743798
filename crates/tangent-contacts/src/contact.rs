//! Contact pairs and the listener seam the driver dispatches through.

use std::fmt;

use serde::{Deserialize, Serialize};
use tangent_world::entity::{EntityId, FixtureId};
use tangent_world::tags::ProcessState;
use tangent_world::world::World;

use crate::ContactError;

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// An unordered pair of fixtures, stored in canonical `(lower, higher)`
/// order so the same overlap always produces the same key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub fixture_a: FixtureId,
    pub fixture_b: FixtureId,
}

impl Contact {
    pub fn new(a: FixtureId, b: FixtureId) -> Self {
        if a <= b {
            Self { fixture_a: a, fixture_b: b }
        } else {
            Self { fixture_a: b, fixture_b: a }
        }
    }

    /// Both fixtures belong to one entity.
    #[inline]
    pub fn is_self_contact(&self) -> bool {
        self.fixture_a.same_entity(self.fixture_b)
    }

    pub fn involves(&self, entity: EntityId) -> bool {
        self.fixture_a.entity == entity || self.fixture_b.entity == entity
    }

    /// The fixture across from `fixture`, if `fixture` is part of the pair.
    pub fn other(&self, fixture: FixtureId) -> Option<FixtureId> {
        if fixture == self.fixture_a {
            Some(self.fixture_b)
        } else if fixture == self.fixture_b {
            Some(self.fixture_a)
        } else {
            None
        }
    }
}

impl fmt::Debug for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Contact({} <-> {})", self.fixture_a, self.fixture_b)
    }
}

// ---------------------------------------------------------------------------
// ContactListener
// ---------------------------------------------------------------------------

/// Receives classified contacts from [`WorldSystem`](crate::system::WorldSystem).
pub trait ContactListener {
    fn begin_contact(&mut self, world: &mut World, contact: &Contact, dt: f32) -> Result<(), ContactError>;

    fn continue_contact(&mut self, world: &mut World, contact: &Contact, dt: f32) -> Result<(), ContactError>;

    fn end_contact(&mut self, world: &mut World, contact: &Contact, dt: f32) -> Result<(), ContactError>;

    /// Route to the callback for `state`.
    fn dispatch(
        &mut self,
        state: ProcessState,
        world: &mut World,
        contact: &Contact,
        dt: f32,
    ) -> Result<(), ContactError> {
        match state {
            ProcessState::Begin => self.begin_contact(world, contact, dt),
            ProcessState::Continue => self.continue_contact(world, contact, dt),
            ProcessState::End => self.end_contact(world, contact, dt),
        }
    }

    /// Entities the listener wants removed once the step's dispatch is done.
    fn drain_destroy_queue(&mut self) -> Vec<EntityId> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(entity: u32, index: u16) -> FixtureId {
        FixtureId::new(EntityId::new(entity, 0), index)
    }

    #[test]
    fn pair_is_canonical() {
        let forward = Contact::new(fx(1, 0), fx(2, 3));
        let backward = Contact::new(fx(2, 3), fx(1, 0));
        assert_eq!(forward, backward);
        assert_eq!(forward.fixture_a, fx(1, 0));
    }

    #[test]
    fn other_side_lookup() {
        let contact = Contact::new(fx(4, 1), fx(2, 0));
        assert_eq!(contact.other(fx(4, 1)), Some(fx(2, 0)));
        assert_eq!(contact.other(fx(9, 0)), None);
        assert!(contact.involves(EntityId::new(4, 0)));
        assert!(!contact.is_self_contact());
        assert!(Contact::new(fx(3, 0), fx(3, 1)).is_self_contact());
    }
}
