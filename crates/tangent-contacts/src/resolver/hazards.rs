//! Things that hurt or consume: consumers, damage, death, projectiles,
//! lasers.

use tangent_world::capability::SplashKind;
use tangent_world::fixture::FixtureRef;
use tangent_world::geometry::Shape;
use tangent_world::tags::{FixtureLabel, FixtureType, ProcessState};

use super::{ContactResolver, Endpoint};
use crate::effects::EffectRequest;
use crate::ContactError;

impl ContactResolver {
    /// CONSUMER / anything: `x` is the consumer. Runs in every phase.
    pub(super) fn consumer(
        &mut self,
        mut x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        let other: FixtureRef<'_> = y.view();
        if let Some(consumer) = x.fixture_mut().consumer.as_mut() {
            consumer(state, other);
        }
        Ok(())
    }

    /// DAMAGER / DAMAGEABLE: damage needs consent from both sides.
    pub(super) fn damage(
        &mut self,
        x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state == ProcessState::End {
            return Ok(());
        }
        let Some(damager) = x.entity.as_damager() else {
            return Err(x.missing("Damager"));
        };
        let Some(damageable) = y.entity.as_damageable() else {
            return Err(y.missing("Damageable"));
        };
        if damageable.can_be_damaged_by(&*damager) && damager.can_damage(&*damageable) {
            damageable.take_damage_from(&*damager);
            damager.on_damage_inflicted_to(y.id.entity);
        }
        Ok(())
    }

    /// DEATH / {FEET, SIDE, HEAD, BODY}: `y` is the target.
    ///
    /// Damageable targets have their health depleted unless invincible (an
    /// instant death fixture ignores invincibility). Any target left
    /// undepleted that is destroyed on death is queued for despawn on begin.
    pub(super) fn death(
        &mut self,
        x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state == ProcessState::End {
            return Ok(());
        }
        if !y.fixture().death_listener || !y.entity.killed_by_death_fixture() || y.entity.is_dying() {
            return Ok(());
        }
        let instant = x.fixture().instant_death;
        let depleted = match y.entity.as_damageable() {
            Some(damageable) if instant || !damageable.invincible() => {
                damageable.deplete_health();
                true
            }
            _ => false,
        };
        if !depleted && state == ProcessState::Begin && y.entity.destroy_on_death() {
            self.queue_destroy(y.id.entity);
        }
        Ok(())
    }

    /// PROJECTILE / {BLOCK, BODY, SHIELD, WATER, SAND, PROJECTILE}: `x` is
    /// the projectile. Begin only.
    pub(super) fn projectile(
        &mut self,
        x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state != ProcessState::Begin || y.fixture().has_label(FixtureLabel::NoProjectileCollision) {
            return Ok(());
        }
        let target = y.fixture_type();
        if target == FixtureType::Block {
            if y.body.shielded {
                return Ok(());
            }
            if y.entity.as_block().is_none() {
                return Err(y.missing("Block"));
            }
        }
        if target == FixtureType::Projectile && y.entity.as_projectile().is_none() {
            return Err(y.missing("Projectile"));
        }

        let own = x.fixture().shape.clone();
        let Some(projectile) = x.entity.as_projectile() else {
            return Err(x.missing("Projectile"));
        };
        match target {
            FixtureType::Block => {
                projectile.hit_block(&own, y.view());
                if let Some(block) = y.entity.as_block() {
                    block.hit_by_projectile(x.view());
                }
            }
            FixtureType::Body => projectile.hit_body(&own, y.view()),
            FixtureType::Shield => projectile.hit_shield(&own, y.view()),
            FixtureType::Water => projectile.hit_water(&own, y.view()),
            FixtureType::Sand => {
                projectile.hit_sand(&own, y.view());
                let sand = y.fixture().shape.bounding_rect();
                let position = own
                    .bounding_rect()
                    .intersection(&sand)
                    .map_or_else(|| own.center(), |overlap| overlap.center());
                self.effects.push(EffectRequest::SpawnSplash {
                    kind: SplashKind::Sand,
                    position,
                    sound: false,
                });
            }
            FixtureType::Projectile => {
                projectile.hit_projectile(&own, y.view());
                let other_own = y.fixture().shape.clone();
                if let Some(other) = y.entity.as_projectile() {
                    other.hit_projectile(&other_own, x.view());
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// LASER / BLOCK: `x` is the laser. The laser collects the points where
    /// its beam crosses the block's bounds.
    pub(super) fn laser_block(
        &mut self,
        x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state == ProcessState::End || y.body.has_fixture_type(FixtureType::Shield) {
            return Ok(());
        }
        let Shape::Line(beam) = x.fixture().shape else {
            return Ok(());
        };
        if y.entity.as_block().is_none() {
            return Err(y.missing("Block"));
        }
        let Some(laser) = x.entity.as_laser() else {
            return Err(x.missing("Laser"));
        };
        if laser.is_ignoring(y.id.entity) {
            return Ok(());
        }
        for point in y.fixture().shape.bounding_rect().line_intersections(&beam) {
            laser.add_intersection(point, y.id);
        }
        Ok(())
    }
}
