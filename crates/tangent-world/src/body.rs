//! Bodies: the movable rectangle behind every game entity.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::fixture::Fixture;
use crate::geometry::{Anchor, Rect, Vec2};
use crate::sense::{BodySense, BodySenses};
use crate::tags::{BodyLabel, BodyType, Direction, FixtureType, TagSet};

// ---------------------------------------------------------------------------
// PhysicsData
// ---------------------------------------------------------------------------

/// Per-body kinematic state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsData {
    pub velocity: Vec2,
    /// Velocity added every step while `gravity_on`, before scaling.
    pub gravity: Vec2,
    pub gravity_on: bool,
    pub gravity_scalar: f32,
    /// Exponential decay rate per axis for the current step. Contact rules
    /// raise it (ice, sand); integration resets it to the default afterwards.
    pub friction_on_self: Vec2,
    pub default_friction_on_self: Vec2,
    pub apply_friction_x: bool,
    pub apply_friction_y: bool,
    /// Symmetric per-axis speed limit.
    pub velocity_clamp: Vec2,
    pub collision_on: bool,
}

impl Default for PhysicsData {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            gravity: Vec2::ZERO,
            gravity_on: true,
            gravity_scalar: 1.0,
            friction_on_self: Vec2::ZERO,
            default_friction_on_self: Vec2::ZERO,
            apply_friction_x: true,
            apply_friction_y: true,
            velocity_clamp: Vec2::new(f32::MAX, f32::MAX),
            collision_on: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// A body owns its fixtures and the sense state contact resolution writes.
#[derive(Debug)]
pub struct Body {
    pub body_type: BodyType,
    pub bounds: Rect,
    prior_position: Vec2,
    pub physics: PhysicsData,
    pub fixtures: Vec<Fixture>,
    pub senses: BodySenses,
    pub labels: TagSet<BodyLabel>,
    pub direction: Direction,

    /// Ladder currently touched by head or feet. Weak: the world clears it
    /// when the ladder entity is despawned.
    pub ladder: Option<EntityId>,
    /// Cart currently ridden.
    pub cart: Option<EntityId>,

    pub ice_friction_x: bool,
    pub ice_friction_y: bool,
    pub take_sand_friction: bool,
    /// Projectiles ignore this body's BLOCK fixtures and hit its shield.
    pub shielded: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self::new(BodyType::Dynamic, Rect::default())
    }
}

impl Body {
    pub fn new(body_type: BodyType, bounds: Rect) -> Self {
        Self {
            body_type,
            bounds,
            prior_position: bounds.position(),
            physics: PhysicsData::default(),
            fixtures: Vec::new(),
            senses: BodySenses::new(),
            labels: TagSet::empty(),
            direction: Direction::Up,
            ladder: None,
            cart: None,
            ice_friction_x: true,
            ice_friction_y: true,
            take_sand_friction: true,
            shielded: false,
        }
    }

    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        self.add_fixture(fixture);
        self
    }

    pub fn with_label(mut self, label: BodyLabel) -> Self {
        self.labels.insert(label);
        self
    }

    /// Add a fixture and return its index. Attached fixtures snap to the
    /// body immediately.
    pub fn add_fixture(&mut self, mut fixture: Fixture) -> u16 {
        if fixture.attached {
            fixture.shape.set_center(self.bounds.center() + fixture.offset);
        }
        self.fixtures.push(fixture);
        (self.fixtures.len() - 1) as u16
    }

    #[inline]
    pub fn fixture(&self, index: u16) -> Option<&Fixture> {
        self.fixtures.get(index as usize)
    }

    #[inline]
    pub fn fixture_mut(&mut self, index: u16) -> Option<&mut Fixture> {
        self.fixtures.get_mut(index as usize)
    }

    pub fn has_fixture_type(&self, fixture_type: FixtureType) -> bool {
        self.fixtures.iter().any(|f| f.fixture_type == fixture_type)
    }

    #[inline]
    pub fn has_label(&self, label: BodyLabel) -> bool {
        self.labels.contains(label)
    }

    #[inline]
    pub fn is_sensing(&self, sense: BodySense) -> bool {
        self.senses.is_sensing(sense)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.bounds.position()
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    #[inline]
    pub fn point(&self, anchor: Anchor) -> Vec2 {
        self.bounds.point(anchor)
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.bounds.set_center(center);
        self.sync_fixtures();
    }

    /// Move the body and its attached fixtures.
    pub fn translate(&mut self, delta: Vec2) {
        if delta.is_zero() {
            return;
        }
        self.bounds.translate(delta);
        self.sync_fixtures();
    }

    /// How far the body moved since [`Body::record_prior_position`].
    pub fn position_delta(&self) -> Vec2 {
        self.bounds.position() - self.prior_position
    }

    pub fn record_prior_position(&mut self) {
        self.prior_position = self.bounds.position();
    }

    /// Re-center attached fixtures on the body.
    pub fn sync_fixtures(&mut self) {
        let center = self.bounds.center();
        for fixture in self.fixtures.iter_mut().filter(|f| f.attached) {
            fixture.shape.set_center(center + fixture.offset);
        }
    }

    /// Advance one fixed step.
    ///
    /// Dynamic bodies decay velocity by friction, take gravity, clamp, and
    /// move. Static bodies only move by their velocity (moving platforms).
    /// Abstract bodies are never integrated.
    pub fn integrate(&mut self, dt: f32) {
        match self.body_type {
            BodyType::Abstract => return,
            BodyType::Static => {}
            BodyType::Dynamic => {
                let physics = &mut self.physics;
                if physics.apply_friction_x && physics.friction_on_self.x > 0.0 {
                    physics.velocity.x *= (-physics.friction_on_self.x * dt).exp();
                }
                if physics.apply_friction_y && physics.friction_on_self.y > 0.0 {
                    physics.velocity.y *= (-physics.friction_on_self.y * dt).exp();
                }
                if physics.gravity_on {
                    physics.velocity += physics.gravity * physics.gravity_scalar;
                }
                let clamp = physics.velocity_clamp;
                physics.velocity.x = physics.velocity.x.clamp(-clamp.x.abs(), clamp.x.abs());
                physics.velocity.y = physics.velocity.y.clamp(-clamp.y.abs(), clamp.y.abs());
            }
        }
        self.physics.friction_on_self = self.physics.default_friction_on_self;
        let step = self.physics.velocity * dt;
        self.bounds.translate(step);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
