//! Headless platformer scene -- a player rides a moving platform past a
//! ladder and through a pool, printing senses and effects as they change.
//!
//! Run with:
//!   RUST_LOG=tangent_contacts=debug cargo run --example headless_platformer -p tangent-contacts

use tangent_contacts::prelude::*;
use tangent_world::prelude::*;

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

struct Platform;

impl Block for Platform {}

impl GameEntity for Platform {
    fn kind(&self) -> &'static str {
        "platform"
    }

    fn as_block(&mut self) -> Option<&mut dyn Block> {
        Some(self)
    }
}

struct Scenery;

impl GameEntity for Scenery {
    fn kind(&self) -> &'static str {
        "scenery"
    }
}

struct Lake;

impl Water for Lake {}

impl GameEntity for Lake {
    fn kind(&self) -> &'static str {
        "lake"
    }

    fn as_water(&mut self) -> Option<&mut dyn Water> {
        Some(self)
    }
}

struct Rider {
    jump: JumpAction,
    land_sound_ready: bool,
}

impl Player for Rider {
    fn jump_action(&self) -> JumpAction {
        self.jump
    }

    fn set_jump_action(&mut self, action: JumpAction) {
        self.jump = action;
    }

    fn is_facing(&self, side: Side) -> bool {
        side == Side::Right
    }

    fn can_make_land_sound(&self) -> bool {
        self.land_sound_ready
    }

    fn set_can_make_land_sound(&mut self, can: bool) {
        self.land_sound_ready = can;
    }
}

impl GameEntity for Rider {
    fn kind(&self) -> &'static str {
        "rider"
    }

    fn as_player(&mut self) -> Option<&mut dyn Player> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// Scene setup
// ---------------------------------------------------------------------------

fn build_world() -> Result<(World, EntityId), anyhow::Error> {
    let mut world = World::new();

    let deck = Rect::new(0.0, 0.0, 48.0, 16.0);
    let mut platform = Body::new(BodyType::Static, deck).with_fixture(Fixture::new(FixtureType::Block, deck));
    platform.physics.velocity = Vec2::new(64.0, 0.0);
    world.spawn(platform, Platform)?;

    let ladder = Rect::new(120.0, 0.0, 16.0, 96.0);
    world.spawn(
        Body::new(BodyType::Abstract, ladder).with_fixture(Fixture::new(FixtureType::Ladder, ladder)),
        Scenery,
    )?;

    let pool = Rect::new(220.0, -8.0, 96.0, 48.0);
    world.spawn(
        Body::new(BodyType::Abstract, pool).with_fixture(Fixture::new(FixtureType::Water, pool)),
        Lake,
    )?;

    let bounds = Rect::new(16.0, 14.0, 16.0, 28.0);
    let mut rider = Body::new(BodyType::Dynamic, bounds)
        .with_fixture(Fixture::new(FixtureType::Feet, Rect::new(0.0, 0.0, 12.0, 4.0)).with_offset(Vec2::new(0.0, -12.0)))
        .with_fixture(Fixture::new(FixtureType::Head, Rect::new(0.0, 0.0, 12.0, 4.0)).with_offset(Vec2::new(0.0, 12.0)))
        .with_fixture(Fixture::new(FixtureType::WaterListener, bounds));
    rider.physics.gravity_on = false;
    let rider = world.spawn(
        rider,
        Rider {
            jump: JumpAction::AirDash,
            land_sound_ready: true,
        },
    )?;
    Ok((world, rider))
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let (mut world, rider) = build_world()?;
    let mut system = WorldSystem::new(ContactConfig::default())?;

    let mut last_senses = None;
    for frame in 0..300u32 {
        system.update(&mut world, 1.0 / 60.0)?;

        for effect in system.listener_mut().drain_effects() {
            println!("frame {frame:>3}: effect {effect:?} at {:?}", effect.position());
        }

        let Some(body) = world.body(rider) else {
            anyhow::bail!("rider vanished");
        };
        let senses = body.senses.active();
        if last_senses != Some(senses) {
            let jump = world.entity_as::<Rider>(rider).map(|r| r.jump);
            println!(
                "frame {frame:>3}: x={:>6.1} senses={senses:?} jump={jump:?}",
                body.position().x
            );
            last_senses = Some(senses);
        }
    }

    println!(
        "done after {} steps, state hash {}",
        system.step_count(),
        system.state_hash(&world)?
    );
    Ok(())
}
