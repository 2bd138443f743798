//! The gameplay contact resolver.
//!
//! [`ContactResolver`] classifies each contact against the rule table and
//! runs the matching handler for the contact's phase. Handlers are grouped
//! by family:
//!
//! - `terrain`: blocks, ice, sand, gates
//! - `hazards`: consumers, damage, death, projectiles, lasers
//! - `fields`: bouncers, forces, gravity zones, water, ladders
//! - `special`: players, items, carts, teleporters
//!
//! Every handler receives the two fixtures as [`Endpoint`]s oriented the way
//! its rule names them, and is a no-op for phases its family does not use.

mod fields;
mod hazards;
mod special;
mod terrain;

use tracing::{debug, trace};

use tangent_world::body::Body;
use tangent_world::capability::GameEntity;
use tangent_world::entity::{EntityId, FixtureId};
use tangent_world::fixture::{Fixture, FixtureRef};
use tangent_world::sense::BodySense;
use tangent_world::tags::{FixtureType, ProcessState};
use tangent_world::world::{EntitySlot, World};
use tangent_world::WorldError;

use crate::config::ContactConfig;
use crate::contact::{Contact, ContactListener};
use crate::effects::{EffectQueue, EffectRequest};
use crate::rules::{self, MatchedRule, RuleKind};
use crate::ContactError;

type DebugFilter = Box<dyn Fn(&Contact) -> bool>;

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// One side of a contact: the fixture, its body, and its entity, borrowed
/// mutably and disjointly from the other side.
pub(crate) struct Endpoint<'w> {
    pub id: FixtureId,
    pub body: &'w mut Body,
    pub entity: &'w mut dyn GameEntity,
}

impl<'w> Endpoint<'w> {
    /// Borrow both sides of a matched contact. The fixture indices are
    /// checked here so the accessors below can index directly.
    fn pair(
        world: &'w mut World,
        first: FixtureId,
        second: FixtureId,
    ) -> Result<(Endpoint<'w>, Endpoint<'w>), WorldError> {
        let (a, b) = world.pair_mut(first.entity, second.entity)?;
        let EntitySlot { body: body_a, entity: entity_a, .. } = a;
        let EntitySlot { body: body_b, entity: entity_b, .. } = b;
        if body_a.fixture(first.index).is_none() {
            return Err(WorldError::UnknownFixture { fixture: first });
        }
        if body_b.fixture(second.index).is_none() {
            return Err(WorldError::UnknownFixture { fixture: second });
        }
        Ok((
            Endpoint {
                id: first,
                body: body_a,
                entity: &mut **entity_a,
            },
            Endpoint {
                id: second,
                body: body_b,
                entity: &mut **entity_b,
            },
        ))
    }

    #[inline]
    pub fn fixture(&self) -> &Fixture {
        &self.body.fixtures[self.id.index as usize]
    }

    #[inline]
    pub fn fixture_mut(&mut self) -> &mut Fixture {
        &mut self.body.fixtures[self.id.index as usize]
    }

    #[inline]
    pub fn fixture_type(&self) -> FixtureType {
        self.fixture().fixture_type
    }

    /// Read-only view handed to callbacks and capabilities.
    #[inline]
    pub fn view(&self) -> FixtureRef<'_> {
        FixtureRef::new(self.id, self.fixture(), &*self.body)
    }

    #[inline]
    pub fn justify(&mut self, sense: BodySense, other: FixtureId) -> bool {
        self.body.senses.justify(sense, self.id, other)
    }

    #[inline]
    pub fn release(&mut self, sense: BodySense, other: FixtureId) -> bool {
        self.body.senses.release(sense, self.id, other)
    }

    #[inline]
    pub fn is_sensing(&self, sense: BodySense) -> bool {
        self.body.is_sensing(sense)
    }

    /// Error for a rule that needs `capability` on this endpoint's entity.
    pub fn missing(&self, capability: &'static str) -> ContactError {
        ContactError::MissingCapability {
            entity: self.id.entity,
            fixture_type: self.fixture_type(),
            capability,
        }
    }
}

// ---------------------------------------------------------------------------
// ContactResolver
// ---------------------------------------------------------------------------

/// Default [`ContactListener`]: the gameplay rule table.
pub struct ContactResolver {
    config: ContactConfig,
    effects: EffectQueue,
    destroy_queue: Vec<EntityId>,
    debug_filter: Option<DebugFilter>,
}

impl ContactResolver {
    pub fn new(config: ContactConfig) -> Self {
        Self {
            config,
            effects: EffectQueue::new(),
            destroy_queue: Vec::new(),
            debug_filter: None,
        }
    }

    /// Log matched contacts at debug level when `filter` accepts them.
    /// Without a filter they are logged at trace level.
    pub fn with_debug_filter(mut self, filter: impl Fn(&Contact) -> bool + 'static) -> Self {
        self.debug_filter = Some(Box::new(filter));
        self
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    pub fn effects(&self) -> &EffectQueue {
        &self.effects
    }

    /// Take every effect raised since the last drain.
    pub fn drain_effects(&mut self) -> Vec<EffectRequest> {
        self.effects.drain()
    }

    /// Entities queued for destruction that have not been drained yet.
    pub fn pending_destroy(&self) -> &[EntityId] {
        &self.destroy_queue
    }

    pub(crate) fn queue_destroy(&mut self, entity: EntityId) {
        if !self.destroy_queue.contains(&entity) {
            self.destroy_queue.push(entity);
        }
    }

    /// Resolve one contact for one phase.
    ///
    /// Self-contacts and pairs no rule matches are ignored. A contact whose
    /// fixtures no longer resolve (despawned mid-step) is skipped.
    pub fn resolve(
        &mut self,
        world: &mut World,
        contact: &Contact,
        state: ProcessState,
        dt: f32,
    ) -> Result<(), ContactError> {
        if contact.is_self_contact() {
            return Ok(());
        }
        let types = world
            .fixture(contact.fixture_a)
            .and_then(|a| Ok((a.fixture_type(), world.fixture(contact.fixture_b)?.fixture_type())));
        let (type_a, type_b) = match types {
            Ok(types) => types,
            Err(e) => {
                debug!(contact = ?contact, error = %e, "skipping stale contact");
                return Ok(());
            }
        };
        let Some(matched) = rules::classify((contact.fixture_a, type_a), (contact.fixture_b, type_b)) else {
            trace!(contact = ?contact, ?type_a, ?type_b, "no rule for contact");
            return Ok(());
        };
        self.log_match(contact, &matched, state);

        let (x, y) = Endpoint::pair(world, matched.first, matched.second)?;
        match matched.kind {
            RuleKind::Consumer => self.consumer(x, y, state),
            RuleKind::Damage => self.damage(x, y, state),
            RuleKind::Death => self.death(x, y, state),
            RuleKind::BlockBody => self.block_body(x, y, state),
            RuleKind::BodyBody => self.body_body(x, y, state),
            RuleKind::BlockSide => self.block_side(x, y, state),
            RuleKind::Gate => self.gate(x, y, state),
            RuleKind::SideIce => self.side_ice(x, y, state),
            RuleKind::FeetBlock => self.feet_block(x, y, state),
            RuleKind::FeetIce => self.feet_ice(x, y, state),
            RuleKind::FeetSand => self.feet_sand(x, y, state),
            RuleKind::Bouncer => self.bouncer(x, y, state, dt),
            RuleKind::HeadBlock => self.head_block(x, y, state),
            RuleKind::Water => self.water(x, y, state),
            RuleKind::HeadLadder => self.ladder(x, y, state, BodySense::HeadTouchingLadder),
            RuleKind::FeetLadder => self.ladder(x, y, state, BodySense::FeetTouchingLadder),
            RuleKind::BodyForce => self.force(x, y, state, dt),
            RuleKind::GravityChange => self.gravity_change(x, y, state),
            RuleKind::BodyPlayer => self.body_player(x, y, state),
            RuleKind::Projectile => self.projectile(x, y, state),
            RuleKind::PlayerItem => self.player_item(x, y, state),
            RuleKind::FeetCart => self.feet_cart(x, y, state),
            RuleKind::Teleporter => self.teleporter(x, y, state),
            RuleKind::LaserBlock => self.laser_block(x, y, state),
        }
    }

    fn log_match(&self, contact: &Contact, matched: &MatchedRule, state: ProcessState) {
        match &self.debug_filter {
            Some(filter) if filter(contact) => debug!(
                rule = ?matched.kind,
                phase = ?state,
                first = %matched.first,
                second = %matched.second,
                "contact"
            ),
            Some(_) => {}
            None => trace!(
                rule = ?matched.kind,
                phase = ?state,
                first = %matched.first,
                second = %matched.second,
                "contact"
            ),
        }
    }
}

impl ContactListener for ContactResolver {
    fn begin_contact(&mut self, world: &mut World, contact: &Contact, dt: f32) -> Result<(), ContactError> {
        self.resolve(world, contact, ProcessState::Begin, dt)
    }

    fn continue_contact(&mut self, world: &mut World, contact: &Contact, dt: f32) -> Result<(), ContactError> {
        self.resolve(world, contact, ProcessState::Continue, dt)
    }

    fn end_contact(&mut self, world: &mut World, contact: &Contact, dt: f32) -> Result<(), ContactError> {
        self.resolve(world, contact, ProcessState::End, dt)
    }

    fn drain_destroy_queue(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.destroy_queue)
    }
}

impl std::fmt::Debug for ContactResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactResolver")
            .field("config", &self.config)
            .field("pending_effects", &self.effects.len())
            .field("pending_destroy", &self.destroy_queue.len())
            .field("debug_filter", &self.debug_filter.is_some())
            .finish()
    }
}
