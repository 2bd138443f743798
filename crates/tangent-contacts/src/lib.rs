//! Tangent Contacts -- gameplay contact resolution for a 2D side-scroller.
//!
//! Sits between raw overlap detection and gameplay behavior. Every step the
//! [`WorldSystem`](system::WorldSystem) integrates bodies, finds overlapping
//! fixture pairs that pass the [`ContactFilter`](filter::ContactFilter),
//! classifies them into begin/continue/end against the previous step, and
//! hands each to a [`ContactListener`](contact::ContactListener). The default
//! listener, [`ContactResolver`](resolver::ContactResolver), runs a
//! first-match rule table over the pair's fixture types and mutates body
//! senses, velocity, and position, or calls into entity capabilities.
//!
//! # Quick Start
//!
//! ```
//! use tangent_contacts::prelude::*;
//! use tangent_world::prelude::*;
//!
//! struct Ground;
//! impl Block for Ground {}
//! impl GameEntity for Ground {
//!     fn as_block(&mut self) -> Option<&mut dyn Block> { Some(self) }
//! }
//!
//! struct Hero;
//! impl GameEntity for Hero {}
//!
//! let mut world = World::new();
//! let ground = Body::new(BodyType::Static, Rect::new(0.0, 0.0, 64.0, 32.0))
//!     .with_fixture(Fixture::new(FixtureType::Block, Rect::new(0.0, 0.0, 64.0, 32.0)));
//! world.spawn(ground, Ground).unwrap();
//!
//! let mut hero = Body::new(BodyType::Dynamic, Rect::new(8.0, 30.0, 16.0, 24.0))
//!     .with_fixture(
//!         Fixture::new(FixtureType::Feet, Rect::new(0.0, 0.0, 12.0, 4.0))
//!             .with_offset(Vec2::new(0.0, -11.0)),
//!     );
//! hero.physics.gravity_on = false;
//! let hero = world.spawn(hero, Hero).unwrap();
//!
//! let mut system = WorldSystem::new(ContactConfig::default()).unwrap();
//! system.step(&mut world).unwrap();
//!
//! assert!(world.body(hero).unwrap().is_sensing(BodySense::FeetOnGround));
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod contact;
pub mod effects;
pub mod filter;
pub mod resolver;
pub mod rules;
pub mod system;

use tangent_world::entity::EntityId;
use tangent_world::tags::FixtureType;
use tangent_world::WorldError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by contact resolution.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    /// A rule needs the entity behind a fixture to have a capability it
    /// lacks. This is a scene setup error: the fixture type promises
    /// behavior the entity does not implement.
    #[error("entity {entity:?} owns a {fixture_type:?} fixture but does not implement {capability}")]
    MissingCapability {
        entity: EntityId,
        fixture_type: FixtureType,
        capability: &'static str,
    },

    /// Configuration could not be parsed or failed validation.
    #[error("invalid contact configuration: {details}")]
    Config { details: String },

    #[error(transparent)]
    World(#[from] WorldError),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::ContactConfig;
    pub use crate::contact::{Contact, ContactListener};
    pub use crate::effects::{EffectQueue, EffectRequest, SoundCue};
    pub use crate::filter::ContactFilter;
    pub use crate::resolver::ContactResolver;
    pub use crate::rules::{classify, MatchedRule, RuleKind};
    pub use crate::system::{OverlapDetector, ShapeOverlap, StepReport, WorldSystem};
    pub use crate::ContactError;
}
