//! Fixtures: typed, shaped contact surfaces owned by a body.
//!
//! Per-instance behavior that a game would otherwise hang off a string-keyed
//! property map is carried as explicit optional fields. An absent callback
//! or label means "this rule does not apply", never an error.

use std::fmt;

use crate::body::Body;
use crate::entity::{EntityId, FixtureId};
use crate::geometry::{Shape, Vec2};
use crate::tags::{Direction, FixtureLabel, FixtureType, ProcessState, Side, TagSet};
use crate::velocity::VelocityAlteration;

/// Called with the contact phase and the other fixture.
pub type Consumer = Box<dyn FnMut(ProcessState, FixtureRef<'_>)>;

/// Unary contact predicate, called with the other fixture.
pub type ContactPredicate = Box<dyn Fn(FixtureRef<'_>) -> bool>;

/// Produces a velocity alteration for the other fixture's body.
pub type AlterationFn = Box<dyn FnMut(FixtureRef<'_>, f32, ProcessState) -> VelocityAlteration>;

pub type Runnable = Box<dyn FnMut()>;

/// Read-only view of a fixture together with its id and owning body.
#[derive(Clone, Copy)]
pub struct FixtureRef<'a> {
    pub id: FixtureId,
    pub fixture: &'a Fixture,
    pub body: &'a Body,
}

impl<'a> FixtureRef<'a> {
    pub fn new(id: FixtureId, fixture: &'a Fixture, body: &'a Body) -> Self {
        Self { id, fixture, body }
    }

    #[inline]
    pub fn entity(&self) -> EntityId {
        self.id.entity
    }

    #[inline]
    pub fn fixture_type(&self) -> FixtureType {
        self.fixture.fixture_type
    }

    #[inline]
    pub fn shape(&self) -> &'a Shape {
        &self.fixture.shape
    }
}

impl fmt::Debug for FixtureRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureRef")
            .field("id", &self.id)
            .field("fixture_type", &self.fixture.fixture_type)
            .finish()
    }
}

/// A typed collision surface.
///
/// Attached fixtures follow their body: after every integration step the
/// shape is re-centered on the body center plus `offset`. Detached fixtures
/// keep whatever world position they were given.
pub struct Fixture {
    pub fixture_type: FixtureType,
    pub shape: Shape,
    pub offset: Vec2,
    pub attached: bool,
    pub active: bool,
    pub labels: TagSet<FixtureLabel>,
    /// Which flank of the body a SIDE fixture covers.
    pub side: Option<Side>,

    pub consumer: Option<Consumer>,
    /// Authoritative filter for CUSTOM fixtures; on FEET fixtures, restricts
    /// which blocks count as ground.
    pub predicate: Option<ContactPredicate>,
    pub velocity_alteration: Option<AlterationFn>,
    pub runnable: Option<Runnable>,

    pub death_listener: bool,
    /// A DEATH fixture marked instant ignores target invincibility.
    pub instant_death: bool,
    pub stick_to_block: bool,
    pub receive_force: bool,
    pub splash: bool,
    pub gravity_changeable: bool,
    pub gravity_rotatable: bool,

    /// Gravity scalar a GRAVITY_CHANGE zone applies.
    pub gravity: Option<f32>,
    /// Up-direction a GRAVITY_CHANGE zone applies.
    pub direction: Option<Direction>,
}

impl Fixture {
    pub fn new(fixture_type: FixtureType, shape: impl Into<Shape>) -> Self {
        Self {
            fixture_type,
            shape: shape.into(),
            offset: Vec2::ZERO,
            attached: true,
            active: true,
            labels: TagSet::empty(),
            side: None,
            consumer: None,
            predicate: None,
            velocity_alteration: None,
            runnable: None,
            death_listener: true,
            instant_death: false,
            stick_to_block: true,
            receive_force: true,
            splash: true,
            gravity_changeable: true,
            gravity_rotatable: true,
            gravity: None,
            direction: None,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_label(mut self, label: FixtureLabel) -> Self {
        self.labels.insert(label);
        self
    }

    /// Keep the shape where it is instead of following the body.
    pub fn detached(mut self) -> Self {
        self.attached = false;
        self
    }

    pub fn with_consumer(mut self, consumer: impl FnMut(ProcessState, FixtureRef<'_>) + 'static) -> Self {
        self.consumer = Some(Box::new(consumer));
        self
    }

    pub fn with_predicate(mut self, predicate: impl Fn(FixtureRef<'_>) -> bool + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn with_velocity_alteration(
        mut self,
        alteration: impl FnMut(FixtureRef<'_>, f32, ProcessState) -> VelocityAlteration + 'static,
    ) -> Self {
        self.velocity_alteration = Some(Box::new(alteration));
        self
    }

    pub fn with_runnable(mut self, runnable: impl FnMut() + 'static) -> Self {
        self.runnable = Some(Box::new(runnable));
        self
    }

    pub fn with_gravity(mut self, scalar: f32) -> Self {
        self.gravity = Some(scalar);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn instant(mut self) -> Self {
        self.instant_death = true;
        self
    }

    #[inline]
    pub fn has_label(&self, label: FixtureLabel) -> bool {
        self.labels.contains(label)
    }

    /// Run the runnable callback if one is registered.
    pub fn run(&mut self) {
        if let Some(runnable) = self.runnable.as_mut() {
            runnable();
        }
    }
}

impl fmt::Debug for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixture")
            .field("fixture_type", &self.fixture_type)
            .field("shape", &self.shape)
            .field("active", &self.active)
            .field("labels", &self.labels)
            .field("side", &self.side)
            .field("consumer", &self.consumer.is_some())
            .field("predicate", &self.predicate.is_some())
            .field("velocity_alteration", &self.velocity_alteration.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn defaults_match_open_property_semantics() {
        let f = Fixture::new(FixtureType::Feet, Rect::new(0.0, 0.0, 4.0, 4.0));
        assert!(f.active && f.attached);
        assert!(f.death_listener && f.stick_to_block && f.receive_force && f.splash);
        assert!(f.gravity_changeable && f.gravity_rotatable);
        assert!(!f.instant_death);
        assert!(f.consumer.is_none() && f.predicate.is_none());
        assert_eq!(f.gravity, None);
    }

    #[test]
    fn run_without_runnable_is_noop() {
        let mut f = Fixture::new(FixtureType::Bouncer, Rect::new(0.0, 0.0, 1.0, 1.0));
        f.run();

        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let mut f = f.with_runnable(move || counter.set(counter.get() + 1));
        f.run();
        f.run();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn predicate_sees_other_fixture() {
        let custom = Fixture::new(FixtureType::Custom, Rect::new(0.0, 0.0, 1.0, 1.0))
            .with_predicate(|other| other.fixture_type() == FixtureType::Item);
        let item = Fixture::new(FixtureType::Item, Rect::new(0.0, 0.0, 1.0, 1.0));
        let body = Body::default();
        let id = FixtureId::new(EntityId::new(1, 0), 0);
        let pred = custom.predicate.as_ref().map(|p| p(FixtureRef::new(id, &item, &body)));
        assert_eq!(pred, Some(true));
    }
}
