//! Tangent World -- geometry, fixtures, bodies, and sense state for a 2D
//! side-scroller.
//!
//! This crate is the data model the contact resolution engine in
//! `tangent-contacts` operates on. Every gameplay entity lives in a
//! [`World`](world::World) slot together with its [`Body`](body::Body); the
//! body owns typed [`Fixture`](fixture::Fixture)s and the
//! [`BodySenses`](sense::BodySenses) that contact rules assert and release.
//!
//! # Quick Start
//!
//! ```
//! use tangent_world::prelude::*;
//!
//! struct Crate;
//! impl GameEntity for Crate {}
//!
//! let mut world = World::new();
//! let body = Body::new(BodyType::Dynamic, Rect::new(0.0, 0.0, 16.0, 16.0))
//!     .with_fixture(Fixture::new(FixtureType::Body, Rect::new(0.0, 0.0, 16.0, 16.0)));
//! let id = world.spawn(body, Crate).unwrap();
//!
//! assert!(!world.body(id).unwrap().is_sensing(BodySense::FeetOnGround));
//! ```

#![deny(unsafe_code)]

pub mod body;
pub mod capability;
pub mod entity;
pub mod fixture;
pub mod geometry;
pub mod sense;
pub mod snapshot;
pub mod tags;
pub mod velocity;
pub mod world;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The entity does not exist (stale generation or never allocated).
    #[error("entity {entity:?} does not exist (stale or never allocated)")]
    StaleEntity { entity: entity::EntityId },

    /// The entity exists but has no fixture at that index.
    #[error("fixture {fixture:?} does not exist")]
    UnknownFixture { fixture: entity::FixtureId },

    /// Two handles to the same entity were requested mutably at once.
    #[error("entity {entity:?} requested twice in one mutable pair")]
    SameEntity { entity: entity::EntityId },

    /// A fixture shape cannot take part in overlap tests.
    #[error("fixture {fixture_index} has an invalid shape: {reason}")]
    InvalidShape {
        fixture_index: u16,
        reason: &'static str,
    },

    /// Snapshot serialization failed.
    #[error("failed to serialize snapshot: {details}")]
    Serialization { details: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::body::{Body, PhysicsData};
    pub use crate::capability::{
        AsAny, Block, Damageable, Damager, GameEntity, Gate, Item, JumpAction, Laser, Ownable,
        Player, Projectile, SplashKind, Teleporter, Water,
    };
    pub use crate::entity::{EntityAllocator, EntityId, FixtureId};
    pub use crate::fixture::{Fixture, FixtureRef};
    pub use crate::geometry::{Anchor, Circle, Line, Polygon, Rect, Shape, Vec2};
    pub use crate::sense::{BodySense, BodySenses, Justification};
    pub use crate::snapshot::{BodySnapshot, WorldSnapshot};
    pub use crate::tags::{
        BodyLabel, BodyType, Direction, FixtureLabel, FixtureType, ProcessState, Side, Tag, TagSet,
    };
    pub use crate::velocity::{alterate, AxisAlteration, VelocityAlteration};
    pub use crate::world::{EntitySlot, World};
    pub use crate::WorldError;
}
