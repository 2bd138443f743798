//! Gameplay entity capabilities.
//!
//! Contact rules talk to entities only through these traits. A
//! [`GameEntity`] opts into a rule family by returning `Some(self)` from the
//! matching `as_*` accessor; the default `None` means the entity does not
//! have that capability. Whether a missing capability is a soft mismatch or
//! a configuration error is decided by the rule that asks.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::entity::{EntityId, FixtureId};
use crate::fixture::FixtureRef;
use crate::geometry::{Shape, Vec2};
use crate::tags::{ProcessState, Side};

/// Downcasting support for boxed entities.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// What the player's jump button does right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JumpAction {
    #[default]
    Jump,
    Swim,
    AirDash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SplashKind {
    #[default]
    Water,
    Sand,
    Toxic,
}

// ---------------------------------------------------------------------------
// GameEntity
// ---------------------------------------------------------------------------

/// An entity in the world. Every entity owns exactly one body, stored next
/// to it in the [`World`](crate::world::World).
pub trait GameEntity: AsAny {
    /// Short name for logs.
    fn kind(&self) -> &'static str {
        "entity"
    }

    fn as_damager(&mut self) -> Option<&mut dyn Damager> {
        None
    }

    fn as_damageable(&mut self) -> Option<&mut dyn Damageable> {
        None
    }

    fn as_block(&mut self) -> Option<&mut dyn Block> {
        None
    }

    fn as_projectile(&mut self) -> Option<&mut dyn Projectile> {
        None
    }

    fn as_item(&mut self) -> Option<&mut dyn Item> {
        None
    }

    fn as_teleporter(&mut self) -> Option<&mut dyn Teleporter> {
        None
    }

    fn as_ownable(&mut self) -> Option<&mut dyn Ownable> {
        None
    }

    fn as_player(&mut self) -> Option<&mut dyn Player> {
        None
    }

    fn as_water(&mut self) -> Option<&mut dyn Water> {
        None
    }

    fn as_gate(&mut self) -> Option<&mut dyn Gate> {
        None
    }

    fn as_laser(&mut self) -> Option<&mut dyn Laser> {
        None
    }

    /// Already dying entities ignore death fixtures.
    fn is_dying(&self) -> bool {
        false
    }

    fn killed_by_death_fixture(&self) -> bool {
        true
    }

    /// Entities that cannot take damage but should still vanish on a death
    /// fixture (pickups, for instance).
    fn destroy_on_death(&self) -> bool {
        false
    }

    fn hit_by_block(&mut self, _state: ProcessState, _block: FixtureRef<'_>) {}

    fn hit_by_body(&mut self, _state: ProcessState, _other: FixtureRef<'_>) {}

    fn hit_by_player(&mut self, _player: EntityId) {}
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

pub trait Damager {
    fn can_damage(&self, _target: &dyn Damageable) -> bool {
        true
    }

    /// Damage dealt per accepted hit.
    fn damage(&self) -> u32 {
        1
    }

    fn on_damage_inflicted_to(&mut self, _target: EntityId) {}
}

pub trait Damageable {
    fn can_be_damaged_by(&self, damager: &dyn Damager) -> bool;

    /// Returns `true` if the hit was accepted.
    fn take_damage_from(&mut self, damager: &dyn Damager) -> bool;

    fn invincible(&self) -> bool {
        false
    }

    fn deplete_health(&mut self);
}

/// Solid terrain. Receives notifications about what touched it.
pub trait Block {
    fn hit_by_feet(&mut self, _state: ProcessState, _feet: FixtureRef<'_>) {}

    fn hit_by_head(&mut self, _state: ProcessState, _head: FixtureRef<'_>) {}

    fn hit_by_side(&mut self, _side: FixtureRef<'_>) {}

    fn hit_by_body(&mut self, _body: FixtureRef<'_>) {}

    fn hit_by_projectile(&mut self, _projectile: FixtureRef<'_>) {}
}

/// Per-target reactions of a projectile. `own` is the projectile fixture's
/// shape at the moment of contact.
pub trait Projectile {
    fn hit_block(&mut self, _own: &Shape, _block: FixtureRef<'_>) {}

    fn hit_body(&mut self, _own: &Shape, _body: FixtureRef<'_>) {}

    fn hit_shield(&mut self, _own: &Shape, _shield: FixtureRef<'_>) {}

    fn hit_water(&mut self, _own: &Shape, _water: FixtureRef<'_>) {}

    fn hit_sand(&mut self, _own: &Shape, _sand: FixtureRef<'_>) {}

    fn hit_projectile(&mut self, _own: &Shape, _other: FixtureRef<'_>) {}
}

pub trait Item {
    fn contact_with_player(&mut self, player_id: EntityId, player: &mut dyn Player);
}

pub trait Teleporter {
    fn should_teleport(&self, _target: EntityId) -> bool {
        true
    }

    fn teleport(&mut self, target: EntityId, body: &mut Body);
}

/// Something that can be ridden or held by another entity.
pub trait Ownable {
    fn owner(&self) -> Option<EntityId>;

    fn set_owner(&mut self, owner: Option<EntityId>);
}

pub trait Player {
    fn jump_action(&self) -> JumpAction;

    fn set_jump_action(&mut self, action: JumpAction);

    fn is_wall_sliding(&self) -> bool {
        false
    }

    fn is_facing(&self, side: Side) -> bool;

    fn can_make_land_sound(&self) -> bool;

    fn set_can_make_land_sound(&mut self, can: bool);
}

pub trait Water {
    fn should_splash(&self, _listener: FixtureRef<'_>) -> bool {
        true
    }

    fn splash_kind(&self) -> SplashKind {
        SplashKind::Water
    }

    fn makes_splash_sound(&self) -> bool {
        true
    }
}

pub trait Gate {
    fn is_triggerable(&self) -> bool;

    fn trigger(&mut self);
}

pub trait Laser {
    fn is_ignoring(&self, _entity: EntityId) -> bool {
        false
    }

    /// Record where the beam crosses `fixture`.
    fn add_intersection(&mut self, point: Vec2, fixture: FixtureId);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
