//! Solid ground and surfaces: blocks, ice, sand, gates.

use tangent_world::body::Body;
use tangent_world::capability::{JumpAction, SplashKind};
use tangent_world::geometry::Anchor;
use tangent_world::sense::BodySense;
use tangent_world::tags::{BodyLabel, Direction, FixtureLabel, ProcessState, Side};

use super::{ContactResolver, Endpoint};
use crate::effects::{EffectRequest, SoundCue};
use crate::ContactError;

fn side_sense(side: Option<Side>, left: BodySense, right: BodySense) -> BodySense {
    match side {
        Some(Side::Left) => left,
        _ => right,
    }
}

/// A one-way platform only "lands" a body falling onto it.
fn block_makes_land_sound(feet_body: &Body, block_body: &Body) -> bool {
    if !block_body.has_label(BodyLabel::CollideDownOnly) {
        return true;
    }
    let v = feet_body.physics.velocity;
    match feet_body.direction {
        Direction::Up => v.y <= 0.0,
        Direction::Down => v.y >= 0.0,
        Direction::Left => v.x >= 0.0,
        Direction::Right => v.x <= 0.0,
    }
}

impl ContactResolver {
    /// BLOCK / BODY: `x` is the block.
    pub(super) fn block_body(
        &mut self,
        x: Endpoint<'_>,
        mut y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state != ProcessState::End && x.fixture().has_label(FixtureLabel::NoBodyTouchie) {
            return Ok(());
        }
        let Some(block) = x.entity.as_block() else {
            return Err(x.missing("Block"));
        };
        if state == ProcessState::Begin {
            block.hit_by_body(y.view());
        }
        y.entity.hit_by_block(state, x.view());
        match state {
            ProcessState::End => y.release(BodySense::BodyTouchingBlock, x.id),
            _ => y.justify(BodySense::BodyTouchingBlock, x.id),
        };
        Ok(())
    }

    pub(super) fn body_body(
        &mut self,
        x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        x.entity.hit_by_body(state, y.view());
        y.entity.hit_by_body(state, x.view());
        Ok(())
    }

    /// BLOCK / SIDE: `x` is the block.
    pub(super) fn block_side(
        &mut self,
        x: Endpoint<'_>,
        mut y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        let sense = side_sense(
            y.fixture().side,
            BodySense::SideTouchingBlockLeft,
            BodySense::SideTouchingBlockRight,
        );
        if state == ProcessState::End {
            y.release(sense, x.id);
            return Ok(());
        }
        if x.fixture().has_label(FixtureLabel::NoSideTouchie) || x.body.has_label(BodyLabel::NoSideTouchie) {
            return Ok(());
        }
        match state {
            ProcessState::Begin => {
                y.justify(sense, x.id);
                let Some(block) = x.entity.as_block() else {
                    return Err(x.missing("Block"));
                };
                block.hit_by_side(y.view());
                y.entity.hit_by_block(state, x.view());
            }
            _ => {
                if y.fixture().stick_to_block {
                    y.body.translate(x.body.position_delta());
                }
                y.justify(sense, x.id);
            }
        }
        Ok(())
    }

    /// {SIDE, FEET, HEAD} / GATE: `y` is the gate. Only the player opens
    /// gates.
    pub(super) fn gate(
        &mut self,
        x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state != ProcessState::Begin || x.entity.as_player().is_none() {
            return Ok(());
        }
        let Some(gate) = y.entity.as_gate() else {
            return Err(y.missing("Gate"));
        };
        if gate.is_triggerable() {
            gate.trigger();
        }
        Ok(())
    }

    /// SIDE / ICE: `x` is the side.
    pub(super) fn side_ice(
        &mut self,
        mut x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        let sense = side_sense(
            x.fixture().side,
            BodySense::SideTouchingIceLeft,
            BodySense::SideTouchingIceRight,
        );
        if state == ProcessState::End {
            x.release(sense, y.id);
            return Ok(());
        }
        let wall_sliding = x.entity.as_player().is_some_and(|p| p.is_wall_sliding());
        if x.body.ice_friction_y || wall_sliding {
            x.body.physics.friction_on_self.y = self.config.scaled_ice_friction();
        }
        x.justify(sense, y.id);
        Ok(())
    }

    /// FEET / BLOCK: `x` is the feet.
    pub(super) fn feet_block(
        &mut self,
        mut x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        // Whatever justified the sense on begin, end always takes it back.
        if state == ProcessState::End {
            x.release(BodySense::FeetOnGround, y.id);
        }
        if y.fixture().has_label(FixtureLabel::NoFeetTouchie) {
            return Ok(());
        }
        if let Some(predicate) = x.fixture().predicate.as_ref() {
            if !predicate(y.view()) {
                return Ok(());
            }
        }
        if y.entity.as_block().is_none() {
            return Err(y.missing("Block"));
        }

        if state == ProcessState::End {
            // Still standing on another block: the player stays grounded.
            let airborne = !x.body.is_sensing(BodySense::FeetOnGround);
            if let Some(player) = x.entity.as_player().filter(|_| airborne) {
                let action = if x.body.is_sensing(BodySense::InWater) {
                    JumpAction::Swim
                } else {
                    JumpAction::AirDash
                };
                player.set_jump_action(action);
                player.set_can_make_land_sound(true);
            }
        } else {
            if !y.body.physics.collision_on {
                x.release(BodySense::FeetOnGround, y.id);
                return Ok(());
            }
            if x.fixture().stick_to_block {
                x.body.translate(y.body.position_delta());
            }
            let lands_loudly = state == ProcessState::Begin && block_makes_land_sound(&*x.body, &*y.body);
            if let Some(player) = x.entity.as_player() {
                player.set_jump_action(JumpAction::Jump);
                if lands_loudly && player.can_make_land_sound() {
                    player.set_can_make_land_sound(false);
                    self.effects.push(EffectRequest::PlaySound {
                        cue: SoundCue::Land,
                        source: x.id.entity,
                    });
                }
            }
            x.justify(BodySense::FeetOnGround, y.id);
        }

        if let Some(block) = y.entity.as_block() {
            block.hit_by_feet(state, x.view());
        }
        x.entity.hit_by_block(state, y.view());
        Ok(())
    }

    /// FEET / ICE: `x` is the feet.
    pub(super) fn feet_ice(
        &mut self,
        mut x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        match state {
            ProcessState::Begin => {
                x.justify(BodySense::FeetOnIce, y.id);
                if x.body.ice_friction_x {
                    x.body.physics.friction_on_self.x = self.config.scaled_ice_friction();
                }
            }
            ProcessState::Continue => {
                // A grounded player pushing into the wall it faces keeps
                // normal friction.
                let grounded = x.body.is_sensing(BodySense::FeetOnGround);
                let wall_left = x.body.is_sensing(BodySense::SideTouchingBlockLeft);
                let wall_right = x.body.is_sensing(BodySense::SideTouchingBlockRight);
                let pinned = grounded
                    && x.entity.as_player().is_some_and(|p| {
                        (wall_left && p.is_facing(Side::Left)) || (wall_right && p.is_facing(Side::Right))
                    });
                if pinned {
                    return Ok(());
                }
                x.justify(BodySense::FeetOnIce, y.id);
                if x.body.ice_friction_x {
                    x.body.physics.friction_on_self.x = self.config.scaled_ice_friction();
                }
            }
            ProcessState::End => {
                x.release(BodySense::FeetOnIce, y.id);
                x.body.physics.friction_on_self = x.body.physics.default_friction_on_self;
            }
        }
        Ok(())
    }

    /// FEET / SAND: `x` is the feet.
    pub(super) fn feet_sand(
        &mut self,
        mut x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state == ProcessState::End {
            x.release(BodySense::FeetOnSand, y.id);
            x.body.physics.friction_on_self = x.body.physics.default_friction_on_self;
            return Ok(());
        }
        x.justify(BodySense::FeetOnSand, y.id);
        if x.body.take_sand_friction {
            let sand = self.config.scaled_sand_friction();
            x.body.physics.friction_on_self.x = sand;
            x.body.physics.friction_on_self.y = sand;
        }
        if state == ProcessState::Begin {
            let position = x.fixture().shape.bounding_rect().point(Anchor::BottomCenter);
            self.effects.push(EffectRequest::SpawnSplash {
                kind: SplashKind::Sand,
                position,
                sound: true,
            });
        }
        Ok(())
    }

    /// HEAD / BLOCK: `x` is the head.
    pub(super) fn head_block(
        &mut self,
        mut x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state != ProcessState::End && y.body.has_label(BodyLabel::CollideDownOnly) {
            return Ok(());
        }
        match state {
            ProcessState::Begin => {
                x.justify(BodySense::HeadTouchingBlock, y.id);
                x.body.physics.velocity.y = 0.0;
            }
            ProcessState::Continue => {
                x.justify(BodySense::HeadTouchingBlock, y.id);
            }
            ProcessState::End => {
                x.release(BodySense::HeadTouchingBlock, y.id);
            }
        }
        let Some(block) = y.entity.as_block() else {
            return Err(y.missing("Block"));
        };
        block.hit_by_head(state, x.view());
        x.entity.hit_by_block(state, y.view());
        Ok(())
    }
}
