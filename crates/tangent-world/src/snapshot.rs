//! Serializable view of body state, used for determinism checks and
//! debugging dumps.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::geometry::{Rect, Vec2};
use crate::sense::BodySense;
use crate::tags::Direction;
use crate::world::World;
use crate::WorldError;

/// Observable state of one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub entity: EntityId,
    pub kind: String,
    pub bounds: Rect,
    pub velocity: Vec2,
    pub gravity_scalar: f32,
    pub direction: Direction,
    /// Asserted senses in declaration order.
    pub senses: Vec<BodySense>,
    pub ladder: Option<EntityId>,
    pub cart: Option<EntityId>,
}

/// Every live body, in entity index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub bodies: Vec<BodySnapshot>,
}

impl WorldSnapshot {
    pub fn capture(world: &World) -> Self {
        let bodies = world
            .iter()
            .map(|slot| BodySnapshot {
                entity: slot.id,
                kind: slot.entity.kind().to_owned(),
                bounds: slot.body.bounds,
                velocity: slot.body.physics.velocity,
                gravity_scalar: slot.body.physics.gravity_scalar,
                direction: slot.body.direction,
                senses: slot.body.senses.active().iter().collect(),
                ladder: slot.body.ladder,
                cart: slot.body.cart,
            })
            .collect();
        Self { bodies }
    }

    pub fn body(&self, entity: EntityId) -> Option<&BodySnapshot> {
        self.bodies.iter().find(|b| b.entity == entity)
    }

    pub fn to_json(&self) -> Result<String, WorldError> {
        serde_json::to_string(self).map_err(|e| WorldError::Serialization {
            details: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::capability::GameEntity;
    use crate::entity::FixtureId;

    struct Dummy;

    impl GameEntity for Dummy {
        fn kind(&self) -> &'static str {
            "dummy"
        }
    }

    #[test]
    fn capture_lists_senses_and_links() {
        let mut world = World::new();
        let a = world.spawn(Body::default(), Dummy).unwrap();
        let b = world.spawn(Body::default(), Dummy).unwrap();
        let body = world.body_mut(a).unwrap();
        body.senses.justify(BodySense::InWater, FixtureId::new(a, 0), FixtureId::new(b, 0));
        body.cart = Some(b);

        let snapshot = WorldSnapshot::capture(&world);
        assert_eq!(snapshot.bodies.len(), 2);
        let sa = snapshot.body(a).unwrap();
        assert_eq!(sa.senses, vec![BodySense::InWater]);
        assert_eq!(sa.cart, Some(b));
        assert_eq!(sa.kind, "dummy");

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("InWater"));
    }
}
