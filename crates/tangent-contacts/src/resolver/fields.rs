//! Zones that push, pull, or hold a body: bouncers, forces, gravity
//! changers, water, ladders.

use tangent_world::capability::JumpAction;
use tangent_world::geometry::{Anchor, Vec2};
use tangent_world::sense::BodySense;
use tangent_world::tags::{Direction, ProcessState};
use tangent_world::velocity::alterate;

use super::{ContactResolver, Endpoint};
use crate::effects::EffectRequest;
use crate::ContactError;

/// The point of a HEAD fixture that must be on the ladder: its leading edge
/// along the body's up direction.
fn head_anchor(direction: Direction) -> Anchor {
    match direction {
        Direction::Up => Anchor::TopCenter,
        Direction::Down => Anchor::BottomCenter,
        Direction::Left => Anchor::CenterLeft,
        Direction::Right => Anchor::CenterRight,
    }
}

/// FEET use the opposite edge.
fn feet_anchor(direction: Direction) -> Anchor {
    match direction {
        Direction::Up => Anchor::BottomCenter,
        Direction::Down => Anchor::TopCenter,
        Direction::Left => Anchor::CenterRight,
        Direction::Right => Anchor::CenterLeft,
    }
}

/// The corner a body leads with when moving by `delta`.
fn leading_anchor(delta: Vec2) -> Anchor {
    use std::cmp::Ordering::*;
    let sign = |v: f32| v.partial_cmp(&0.0).unwrap_or(Equal);
    match (sign(delta.x), sign(delta.y)) {
        (Greater, Greater) => Anchor::TopRight,
        (Greater, Less) => Anchor::BottomRight,
        (Greater, Equal) => Anchor::CenterRight,
        (Less, Greater) => Anchor::TopLeft,
        (Less, Less) => Anchor::BottomLeft,
        (Less, Equal) => Anchor::CenterLeft,
        (Equal, Greater) => Anchor::TopCenter,
        (Equal, Less) => Anchor::BottomCenter,
        (Equal, Equal) => Anchor::Center,
    }
}

impl ContactResolver {
    /// BOUNCER / {FEET, HEAD, SIDE}: `x` is the bouncer. Begin only.
    pub(super) fn bouncer(
        &mut self,
        mut x: Endpoint<'_>,
        mut y: Endpoint<'_>,
        state: ProcessState,
        dt: f32,
    ) -> Result<(), ContactError> {
        if state != ProcessState::Begin {
            return Ok(());
        }
        let bounced = y.view();
        let Some(alteration) = x
            .fixture_mut()
            .velocity_alteration
            .as_mut()
            .map(|compute| compute(bounced, dt, state))
        else {
            return Ok(());
        };
        alterate(&mut *y.body, alteration);
        x.fixture_mut().run();
        y.fixture_mut().run();
        Ok(())
    }

    /// BODY / FORCE: `x` is the body. The alteration runs in every phase,
    /// including end, so fields can ramp out.
    pub(super) fn force(
        &mut self,
        mut x: Endpoint<'_>,
        mut y: Endpoint<'_>,
        state: ProcessState,
        dt: f32,
    ) -> Result<(), ContactError> {
        if state == ProcessState::End {
            x.release(BodySense::ForceApplied, y.id);
        }
        if !x.fixture().receive_force {
            return Ok(());
        }
        let pushed = x.view();
        let Some(alteration) = y
            .fixture_mut()
            .velocity_alteration
            .as_mut()
            .map(|compute| compute(pushed, dt, state))
        else {
            return Ok(());
        };
        alterate(&mut *x.body, alteration);
        if state != ProcessState::End {
            x.justify(BodySense::ForceApplied, y.id);
        }
        y.fixture_mut().run();
        Ok(())
    }

    /// BODY / GRAVITY_CHANGE: `x` is the body. The zone applies once the
    /// body's leading corner is inside it. Continue only keeps the
    /// direction in sync.
    pub(super) fn gravity_change(
        &mut self,
        x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state == ProcessState::End {
            return Ok(());
        }
        let lead = x
            .fixture()
            .shape
            .bounding_rect()
            .point(leading_anchor(x.body.position_delta()));
        let zone = y.fixture();
        if !zone.shape.contains(lead) {
            return Ok(());
        }
        let (changeable, rotatable) = (x.fixture().gravity_changeable, x.fixture().gravity_rotatable);
        if state == ProcessState::Begin && changeable {
            if let Some(scalar) = zone.gravity {
                x.body.physics.gravity_scalar = scalar;
            }
        }
        if rotatable {
            if let Some(direction) = zone.direction {
                x.body.direction = direction;
            }
        }
        Ok(())
    }

    /// WATER_LISTENER / WATER: `x` is the listener.
    ///
    /// A splash fires when the listener goes from dry to wet or wet to dry,
    /// never while moving between overlapping water bodies.
    pub(super) fn water(
        &mut self,
        mut x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        let Some(water) = y.entity.as_water() else {
            return Err(y.missing("Water"));
        };
        let was_in_water = x.is_sensing(BodySense::InWater);
        match state {
            ProcessState::Begin | ProcessState::Continue => x.justify(BodySense::InWater, y.id),
            ProcessState::End => x.release(BodySense::InWater, y.id),
        };
        let in_water = x.is_sensing(BodySense::InWater);

        if state != ProcessState::Continue && was_in_water != in_water {
            let splash = water.should_splash(x.view()) && x.fixture().splash;
            if splash {
                self.effects.push(EffectRequest::WaterSurfaceSplash {
                    listener_bounds: x.body.bounds,
                    water_bounds: y.body.bounds,
                    kind: water.splash_kind(),
                    sound: water.makes_splash_sound(),
                });
            }
        }

        let grounded = x.is_sensing(BodySense::FeetOnGround);
        let Some(player) = x.entity.as_player() else {
            return Ok(());
        };
        match state {
            ProcessState::Begin | ProcessState::Continue => {
                if !grounded && !player.is_wall_sliding() {
                    player.set_jump_action(JumpAction::Swim);
                }
                if state == ProcessState::Begin {
                    x.body.physics.gravity_scalar = self.config.water_gravity_scalar;
                    if !was_in_water {
                        let velocity = &mut x.body.physics.velocity;
                        if x.body.direction.is_vertical() {
                            velocity.y = 0.0;
                        } else {
                            velocity.x = 0.0;
                        }
                    }
                }
            }
            ProcessState::End => {
                if !in_water {
                    player.set_jump_action(JumpAction::AirDash);
                    x.body.physics.gravity_scalar = 1.0;
                }
            }
        }
        Ok(())
    }

    /// {HEAD, FEET} / LADDER: `x` is the climber fixture, `sense` says which.
    ///
    /// The ladder link on the body is only dropped once neither head nor
    /// feet touch a ladder.
    pub(super) fn ladder(
        &mut self,
        mut x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
        sense: BodySense,
    ) -> Result<(), ContactError> {
        if state == ProcessState::End {
            x.release(sense, y.id);
            let still_climbing = x.is_sensing(BodySense::HeadTouchingLadder)
                || x.is_sensing(BodySense::FeetTouchingLadder);
            if !still_climbing {
                x.body.ladder = None;
            }
            return Ok(());
        }
        let anchor = match sense {
            BodySense::HeadTouchingLadder => head_anchor(x.body.direction),
            _ => feet_anchor(x.body.direction),
        };
        let point = x.fixture().shape.bounding_rect().point(anchor);
        if y.fixture().shape.contains(point) {
            x.justify(sense, y.id);
            x.body.ladder = Some(y.id.entity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_corner_follows_travel() {
        assert_eq!(leading_anchor(Vec2::new(1.0, -2.0)), Anchor::BottomRight);
        assert_eq!(leading_anchor(Vec2::new(-1.0, 0.0)), Anchor::CenterLeft);
        assert_eq!(leading_anchor(Vec2::ZERO), Anchor::Center);
        assert_eq!(leading_anchor(Vec2::new(0.0, 3.0)), Anchor::TopCenter);
    }

    #[test]
    fn head_and_feet_use_opposite_edges() {
        for direction in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_ne!(head_anchor(direction), feet_anchor(direction));
        }
        assert_eq!(feet_anchor(Direction::Up), Anchor::BottomCenter);
    }
}
