//! Fixed-step world driver.
//!
//! [`WorldSystem`] advances a [`World`] in fixed steps. Each step:
//!
//! 1. Every body records its prior position, integrates, and re-syncs its
//!    attached fixtures.
//! 2. Active fixture pairs that pass the [`ContactFilter`] are overlap-tested
//!    by the [`OverlapDetector`].
//! 3. The overlapping set is diffed against the previous step's: new pairs
//!    begin, surviving pairs continue, vanished pairs end. Contacts are
//!    dispatched in sorted order, ends last.
//! 4. Entities the listener queued for destruction are despawned.
//!
//! Given the same world and the same inputs, the sequence of
//! [`WorldSystem::state_hash`] values is identical across runs.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{trace, warn};

use tangent_world::entity::{EntityId, FixtureId};
use tangent_world::geometry::Shape;
use tangent_world::snapshot::WorldSnapshot;
use tangent_world::tags::FixtureType;
use tangent_world::world::World;
use tangent_world::WorldError;

use crate::config::ContactConfig;
use crate::contact::{Contact, ContactListener};
use crate::filter::ContactFilter;
use crate::resolver::ContactResolver;
use crate::ContactError;

// ---------------------------------------------------------------------------
// OverlapDetector
// ---------------------------------------------------------------------------

/// Narrow-phase overlap test between two fixture shapes.
pub trait OverlapDetector {
    fn overlaps(&mut self, a: &Shape, b: &Shape) -> bool;
}

/// The default detector: [`Shape::overlaps`], backed by parry for the
/// pairings it does not test directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeOverlap;

impl OverlapDetector for ShapeOverlap {
    #[inline]
    fn overlaps(&mut self, a: &Shape, b: &Shape) -> bool {
        a.overlaps(b)
    }
}

impl<F> OverlapDetector for F
where
    F: FnMut(&Shape, &Shape) -> bool,
{
    fn overlaps(&mut self, a: &Shape, b: &Shape) -> bool {
        self(a, b)
    }
}

// ---------------------------------------------------------------------------
// StepReport
// ---------------------------------------------------------------------------

/// What happened during one step.
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub begun: usize,
    pub continued: usize,
    pub ended: usize,
    /// Entities despawned at the end of the step, in despawn order.
    pub despawned: Vec<EntityId>,
    /// Wall-clock time for the step.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// WorldSystem
// ---------------------------------------------------------------------------

pub struct WorldSystem<L = ContactResolver, D = ShapeOverlap> {
    config: ContactConfig,
    listener: L,
    detector: D,
    filter: ContactFilter,
    /// Pairs overlapping at the end of the last step.
    contacts: BTreeSet<Contact>,
    accumulator: f32,
    step_count: u64,
}

impl WorldSystem<ContactResolver, ShapeOverlap> {
    /// A driver with the default resolver and overlap detector.
    pub fn new(config: ContactConfig) -> Result<Self, ContactError> {
        let config = config.validated()?;
        let resolver = ContactResolver::new(config.clone());
        Self::with_parts(config, resolver, ShapeOverlap)
    }
}

impl<L: ContactListener, D: OverlapDetector> WorldSystem<L, D> {
    pub fn with_parts(config: ContactConfig, listener: L, detector: D) -> Result<Self, ContactError> {
        Ok(Self {
            config: config.validated()?,
            listener,
            detector,
            filter: ContactFilter::new(),
            contacts: BTreeSet::new(),
            accumulator: 0.0,
            step_count: 0,
        })
    }

    // -- accessors ------------------------------------------------------------

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Number of steps taken so far.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Pairs that overlapped at the end of the last step, in sorted order.
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    // -- stepping -------------------------------------------------------------

    /// Feed `delta` seconds of real time and take as many fixed steps as fit,
    /// up to `max_steps_per_update`. Returns the number of steps taken.
    pub fn update(&mut self, world: &mut World, delta: f32) -> Result<u32, ContactError> {
        if !(delta > 0.0 && delta.is_finite()) {
            return Ok(0);
        }
        self.accumulator += delta;
        let mut steps = 0;
        while self.accumulator >= self.config.fixed_step {
            if steps == self.config.max_steps_per_update {
                warn!(
                    dropped_seconds = self.accumulator,
                    cap = self.config.max_steps_per_update,
                    "step cap reached, dropping leftover time"
                );
                self.accumulator = 0.0;
                break;
            }
            let outcome = self.step(world);
            self.accumulator -= self.config.fixed_step;
            steps += 1;
            outcome?;
        }
        Ok(steps)
    }

    /// Take exactly one fixed step.
    ///
    /// A listener error does not stop the step: every contact is still
    /// dispatched and recorded, so a host that keeps running never sees the
    /// same contact begin twice. The first error is returned once the step
    /// is committed.
    pub fn step(&mut self, world: &mut World) -> Result<StepReport, ContactError> {
        let started = Instant::now();
        let dt = self.config.fixed_step;
        let mut report = StepReport::default();
        let mut first_error = None;

        for slot in world.iter_mut() {
            slot.body.record_prior_position();
            slot.body.integrate(dt);
            slot.body.sync_fixtures();
        }

        let mut current = self.detect(world);

        for contact in &current {
            let outcome = if self.contacts.contains(contact) {
                report.continued += 1;
                self.listener.continue_contact(world, contact, dt)
            } else {
                report.begun += 1;
                self.listener.begin_contact(world, contact, dt)
            };
            if let Err(err) = outcome {
                first_error.get_or_insert(err);
            }
        }
        let ended: Vec<Contact> = self.contacts.difference(&current).copied().collect();
        for contact in &ended {
            report.ended += 1;
            if let Err(err) = self.listener.end_contact(world, contact, dt) {
                first_error.get_or_insert(err);
            }
        }

        for entity in self.listener.drain_destroy_queue() {
            if world.is_alive(entity) {
                if let Err(err) = world.despawn(entity) {
                    first_error.get_or_insert(err.into());
                    continue;
                }
                report.despawned.push(entity);
            }
        }
        if !report.despawned.is_empty() {
            current.retain(|c| !report.despawned.iter().any(|&e| c.involves(e)));
        }

        self.contacts = current;
        self.step_count += 1;
        report.elapsed = started.elapsed();
        trace!(
            step = self.step_count,
            begun = report.begun,
            continued = report.continued,
            ended = report.ended,
            despawned = report.despawned.len(),
            "world step"
        );
        match first_error {
            Some(err) => {
                warn!(step = self.step_count, error = %err, "listener error during step");
                Err(err)
            }
            None => Ok(report),
        }
    }

    /// Brute-force candidate search over every active fixture pair.
    fn detect(&mut self, world: &World) -> BTreeSet<Contact> {
        let fixtures: Vec<(FixtureId, FixtureType)> = world
            .iter()
            .flat_map(|slot| {
                slot.body
                    .fixtures
                    .iter()
                    .enumerate()
                    .filter(|(_, f)| f.active)
                    .map(move |(i, f)| (FixtureId::new(slot.id, i as u16), f.fixture_type))
            })
            .collect();

        let mut found = BTreeSet::new();
        for (i, &(a, type_a)) in fixtures.iter().enumerate() {
            for &(b, type_b) in &fixtures[i + 1..] {
                if a.same_entity(b) {
                    continue;
                }
                if !self.filter.should_proceed_filtering(type_a) && !self.filter.should_proceed_filtering(type_b) {
                    continue;
                }
                let (Ok(view_a), Ok(view_b)) = (world.fixture(a), world.fixture(b)) else {
                    continue;
                };
                if self.filter.filter(view_a, view_b) && self.detector.overlaps(view_a.shape(), view_b.shape()) {
                    found.insert(Contact::new(a, b));
                }
            }
        }
        found
    }

    // -- determinism ----------------------------------------------------------

    /// BLAKE3 hex digest of the world's body state, the step counter, and the
    /// live contact set.
    pub fn state_hash(&self, world: &World) -> Result<String, ContactError> {
        #[derive(Serialize)]
        struct HashableState<'a> {
            step_count: u64,
            fixed_step: f32,
            world: &'a WorldSnapshot,
            contacts: &'a BTreeSet<Contact>,
        }

        let snapshot = WorldSnapshot::capture(world);
        let hashable = HashableState {
            step_count: self.step_count,
            fixed_step: self.config.fixed_step,
            world: &snapshot,
            contacts: &self.contacts,
        };
        let json_bytes = serde_json::to_vec(&hashable).map_err(|e| WorldError::Serialization {
            details: e.to_string(),
        })?;
        Ok(blake3::hash(&json_bytes).to_hex().to_string())
    }
}

impl<L, D> std::fmt::Debug for WorldSystem<L, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldSystem")
            .field("config", &self.config)
            .field("contacts", &self.contacts.len())
            .field("accumulator", &self.accumulator)
            .field("step_count", &self.step_count)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tangent_world::prelude::*;

    struct Ground;
    impl Block for Ground {}
    impl GameEntity for Ground {
        fn as_block(&mut self) -> Option<&mut dyn Block> {
            Some(self)
        }
    }

    struct Walker;
    impl GameEntity for Walker {}

    fn scene() -> (World, EntityId) {
        let mut world = World::new();
        let ground = Body::new(BodyType::Static, Rect::new(0.0, 0.0, 100.0, 10.0))
            .with_fixture(Fixture::new(FixtureType::Block, Rect::new(0.0, 0.0, 100.0, 10.0)));
        world.spawn(ground, Ground).unwrap();
        let mut walker = Body::new(BodyType::Dynamic, Rect::new(10.0, 9.0, 10.0, 10.0))
            .with_fixture(
                Fixture::new(FixtureType::Feet, Rect::new(0.0, 0.0, 8.0, 2.0)).with_offset(Vec2::new(0.0, -4.0)),
            );
        walker.physics.gravity_on = false;
        let walker = world.spawn(walker, Walker).unwrap();
        (world, walker)
    }

    #[test]
    fn begin_then_continue_then_end() {
        let (mut world, walker) = scene();
        let mut system = WorldSystem::new(ContactConfig::default()).unwrap();

        let report = system.step(&mut world).unwrap();
        assert_eq!((report.begun, report.continued, report.ended), (1, 0, 0));
        let report = system.step(&mut world).unwrap();
        assert_eq!((report.begun, report.continued, report.ended), (0, 1, 0));
        assert!(world.body(walker).unwrap().is_sensing(BodySense::FeetOnGround));

        world.body_mut(walker).unwrap().translate(Vec2::new(0.0, 50.0));
        let report = system.step(&mut world).unwrap();
        assert_eq!((report.begun, report.continued, report.ended), (0, 0, 1));
        assert!(!world.body(walker).unwrap().is_sensing(BodySense::FeetOnGround));
        assert_eq!(system.contacts().count(), 0);
    }

    #[test]
    fn inactive_fixtures_are_not_detected() {
        let (mut world, walker) = scene();
        world.body_mut(walker).unwrap().fixtures[0].active = false;
        let mut system = WorldSystem::new(ContactConfig::default()).unwrap();
        let report = system.step(&mut world).unwrap();
        assert_eq!(report.begun, 0);
    }

    #[test]
    fn update_is_capped() {
        let (mut world, _) = scene();
        let config = ContactConfig {
            fixed_step: 0.01,
            max_steps_per_update: 3,
            ..Default::default()
        };
        let mut system = WorldSystem::new(config).unwrap();
        assert_eq!(system.update(&mut world, 1.0).unwrap(), 3);
        assert_eq!(system.step_count(), 3);
        // Leftover time was dropped, so a tiny delta takes no step.
        assert_eq!(system.update(&mut world, 0.001).unwrap(), 0);
        assert_eq!(system.update(&mut world, -1.0).unwrap(), 0);
    }

    #[test]
    fn custom_detector_is_consulted() {
        let (mut world, _) = scene();
        let mut calls = 0usize;
        let mut system = WorldSystem::with_parts(
            ContactConfig::default(),
            ContactResolver::new(ContactConfig::default()),
            |_: &Shape, _: &Shape| {
                calls += 1;
                false
            },
        )
        .unwrap();
        let report = system.step(&mut world).unwrap();
        assert_eq!(report.begun, 0);
        drop(system);
        assert_eq!(calls, 1);
    }

    /// Counts begins and fails every callback that touches `broken`.
    struct Flaky {
        broken: EntityId,
        begins: usize,
    }

    impl Flaky {
        fn check(&self, contact: &Contact) -> Result<(), ContactError> {
            if contact.involves(self.broken) {
                return Err(ContactError::MissingCapability {
                    entity: self.broken,
                    fixture_type: FixtureType::Block,
                    capability: "Block",
                });
            }
            Ok(())
        }
    }

    impl ContactListener for Flaky {
        fn begin_contact(&mut self, _: &mut World, contact: &Contact, _: f32) -> Result<(), ContactError> {
            self.check(contact)?;
            self.begins += 1;
            Ok(())
        }

        fn continue_contact(&mut self, _: &mut World, contact: &Contact, _: f32) -> Result<(), ContactError> {
            self.check(contact)
        }

        fn end_contact(&mut self, _: &mut World, contact: &Contact, _: f32) -> Result<(), ContactError> {
            self.check(contact)
        }
    }

    #[test]
    fn failing_contact_does_not_restart_its_neighbours() {
        let (mut world, _) = scene();
        // A second ground spawned after the first, so its contact sorts last.
        let broken = Body::new(BodyType::Static, Rect::new(15.0, 0.0, 10.0, 10.0))
            .with_fixture(Fixture::new(FixtureType::Block, Rect::new(0.0, 0.0, 10.0, 10.0)));
        let broken = world.spawn(broken, Walker).unwrap();

        let listener = Flaky { broken, begins: 0 };
        let mut system = WorldSystem::with_parts(ContactConfig::default(), listener, ShapeOverlap).unwrap();

        assert!(matches!(
            system.step(&mut world),
            Err(ContactError::MissingCapability { capability: "Block", .. })
        ));
        assert!(system.step(&mut world).is_err());
        assert_eq!(system.listener().begins, 1);
        assert_eq!(system.contacts().count(), 2);
        assert_eq!(system.step_count(), 2);
    }

    #[test]
    fn hash_changes_with_state() {
        let (mut world, walker) = scene();
        let mut system = WorldSystem::new(ContactConfig::default()).unwrap();
        let before = system.state_hash(&world).unwrap();
        assert_eq!(before.len(), 64);
        assert_eq!(before, system.state_hash(&world).unwrap());
        world.body_mut(walker).unwrap().physics.velocity = Vec2::new(1.0, 0.0);
        system.step(&mut world).unwrap();
        assert_ne!(before, system.state_hash(&world).unwrap());
    }
}
