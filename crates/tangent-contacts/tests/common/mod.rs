//! Shared scene entities for the integration tests.

#![allow(dead_code)]

use tangent_contacts::prelude::*;
use tangent_world::prelude::*;

pub const DT: f32 = 1.0 / 150.0;

pub fn fid(entity: EntityId, index: u16) -> FixtureId {
    FixtureId::new(entity, index)
}

/// A body with gravity off so only contact rules move it.
pub fn floating(body_type: BodyType, bounds: Rect, fixtures: Vec<Fixture>) -> Body {
    let mut body = Body::new(body_type, bounds);
    body.physics.gravity_on = false;
    for fixture in fixtures {
        body.add_fixture(fixture);
    }
    body
}

/// A fixture covering `bounds` exactly.
pub fn covering(fixture_type: FixtureType, bounds: Rect) -> Fixture {
    Fixture::new(fixture_type, bounds)
}

pub fn resolve(
    resolver: &mut ContactResolver,
    world: &mut World,
    a: FixtureId,
    b: FixtureId,
    state: ProcessState,
) -> Result<(), ContactError> {
    resolver.resolve(world, &Contact::new(a, b), state, DT)
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Any entity with no capabilities.
pub struct Prop;

impl GameEntity for Prop {}

#[derive(Default)]
pub struct Ground {
    pub feet_hits: Vec<ProcessState>,
    pub head_hits: Vec<ProcessState>,
    pub side_hits: usize,
    pub body_hits: usize,
    pub projectile_hits: usize,
}

impl Block for Ground {
    fn hit_by_feet(&mut self, state: ProcessState, _feet: FixtureRef<'_>) {
        self.feet_hits.push(state);
    }

    fn hit_by_head(&mut self, state: ProcessState, _head: FixtureRef<'_>) {
        self.head_hits.push(state);
    }

    fn hit_by_side(&mut self, _side: FixtureRef<'_>) {
        self.side_hits += 1;
    }

    fn hit_by_body(&mut self, _body: FixtureRef<'_>) {
        self.body_hits += 1;
    }

    fn hit_by_projectile(&mut self, _projectile: FixtureRef<'_>) {
        self.projectile_hits += 1;
    }
}

impl GameEntity for Ground {
    fn kind(&self) -> &'static str {
        "ground"
    }

    fn as_block(&mut self) -> Option<&mut dyn Block> {
        Some(self)
    }
}

pub struct Hero {
    pub jump: JumpAction,
    pub wall_sliding: bool,
    pub facing: Side,
    pub land_sound_ready: bool,
    pub health: u32,
    pub refuse_damage: bool,
    pub invincible: bool,
    pub block_hits: Vec<ProcessState>,
}

impl Hero {
    pub fn new() -> Self {
        Self {
            jump: JumpAction::Jump,
            wall_sliding: false,
            facing: Side::Right,
            land_sound_ready: true,
            health: 10,
            refuse_damage: false,
            invincible: false,
            block_hits: Vec::new(),
        }
    }
}

impl Player for Hero {
    fn jump_action(&self) -> JumpAction {
        self.jump
    }

    fn set_jump_action(&mut self, action: JumpAction) {
        self.jump = action;
    }

    fn is_wall_sliding(&self) -> bool {
        self.wall_sliding
    }

    fn is_facing(&self, side: Side) -> bool {
        self.facing == side
    }

    fn can_make_land_sound(&self) -> bool {
        self.land_sound_ready
    }

    fn set_can_make_land_sound(&mut self, can: bool) {
        self.land_sound_ready = can;
    }
}

impl Damageable for Hero {
    fn can_be_damaged_by(&self, _damager: &dyn Damager) -> bool {
        !self.refuse_damage
    }

    fn take_damage_from(&mut self, damager: &dyn Damager) -> bool {
        self.health = self.health.saturating_sub(damager.damage());
        true
    }

    fn invincible(&self) -> bool {
        self.invincible
    }

    fn deplete_health(&mut self) {
        self.health = 0;
    }
}

impl GameEntity for Hero {
    fn kind(&self) -> &'static str {
        "hero"
    }

    fn as_player(&mut self) -> Option<&mut dyn Player> {
        Some(self)
    }

    fn as_damageable(&mut self) -> Option<&mut dyn Damageable> {
        Some(self)
    }

    fn hit_by_block(&mut self, state: ProcessState, _block: FixtureRef<'_>) {
        self.block_hits.push(state);
    }
}

#[derive(Default)]
pub struct Spikes {
    pub inflicted: Vec<EntityId>,
}

impl Damager for Spikes {
    fn damage(&self) -> u32 {
        3
    }

    fn on_damage_inflicted_to(&mut self, target: EntityId) {
        self.inflicted.push(target);
    }
}

impl GameEntity for Spikes {
    fn as_damager(&mut self) -> Option<&mut dyn Damager> {
        Some(self)
    }
}

/// Breaks when it touches a death fixture.
pub struct Crate;

impl GameEntity for Crate {
    fn destroy_on_death(&self) -> bool {
        true
    }
}

pub struct Pool {
    pub kind: SplashKind,
}

impl Water for Pool {
    fn splash_kind(&self) -> SplashKind {
        self.kind
    }
}

impl GameEntity for Pool {
    fn as_water(&mut self) -> Option<&mut dyn Water> {
        Some(self)
    }
}
