//! Player-facing interactions: bodies bumping the player, item pickup,
//! carts, teleporters.

use tangent_world::sense::BodySense;
use tangent_world::tags::ProcessState;

use super::{ContactResolver, Endpoint};
use crate::ContactError;

impl ContactResolver {
    /// BODY / PLAYER: `x` is the body that got bumped.
    pub(super) fn body_player(
        &mut self,
        x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state == ProcessState::Begin {
            x.entity.hit_by_player(y.id.entity);
        }
        Ok(())
    }

    /// PLAYER / ITEM: pickup. Both capabilities are optional; without them
    /// nothing happens.
    pub(super) fn player_item(
        &mut self,
        x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state != ProcessState::Begin {
            return Ok(());
        }
        if let (Some(player), Some(item)) = (x.entity.as_player(), y.entity.as_item()) {
            item.contact_with_player(x.id.entity, player);
        }
        Ok(())
    }

    /// FEET / CART: `x` is the feet. Only the player rides carts.
    pub(super) fn feet_cart(
        &mut self,
        mut x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        if state == ProcessState::Continue {
            return Ok(());
        }
        let Some(cart) = y.entity.as_ownable() else {
            return Err(y.missing("Ownable"));
        };
        let rider = x.id.entity;
        let is_player = x.entity.as_player().is_some();
        match state {
            ProcessState::Begin => {
                if is_player {
                    cart.set_owner(Some(rider));
                    x.justify(BodySense::TouchingCart, y.id);
                    x.body.cart = Some(y.id.entity);
                }
            }
            _ => {
                if cart.owner() == Some(rider) {
                    cart.set_owner(None);
                }
                if is_player {
                    x.release(BodySense::TouchingCart, y.id);
                    if !x.is_sensing(BodySense::TouchingCart) {
                        x.body.cart = None;
                    }
                }
            }
        }
        Ok(())
    }

    /// TELEPORTER_LISTENER / TELEPORTER: `x` is the listener.
    pub(super) fn teleporter(
        &mut self,
        mut x: Endpoint<'_>,
        y: Endpoint<'_>,
        state: ProcessState,
    ) -> Result<(), ContactError> {
        let Some(teleporter) = y.entity.as_teleporter() else {
            return Err(y.missing("Teleporter"));
        };
        match state {
            ProcessState::Begin | ProcessState::Continue => {
                if state == ProcessState::Begin {
                    x.justify(BodySense::Teleporting, y.id);
                }
                if teleporter.should_teleport(x.id.entity) {
                    teleporter.teleport(x.id.entity, &mut *x.body);
                }
            }
            ProcessState::End => {
                x.release(BodySense::Teleporting, y.id);
            }
        }
        Ok(())
    }
}
