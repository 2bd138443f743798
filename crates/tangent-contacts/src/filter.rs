//! Contact eligibility filter.
//!
//! Runs before the narrow phase. A pair of fixtures is only overlap-tested
//! when one side's type is a key of the adjacency table (or CUSTOM), and only
//! resolved when [`ContactFilter::filter`] accepts it.

use tangent_world::fixture::FixtureRef;
use tangent_world::tags::{FixtureType, Tag};

use FixtureType::*;

/// Which fixture types each keyed type may contact. Stored once per
/// direction; lookups check both.
fn adjacency(fixture_type: FixtureType) -> Option<&'static [FixtureType]> {
    let allowed: &'static [FixtureType] = match fixture_type {
        Consumer => FixtureType::ALL,
        Player => &[Body, Item],
        Damageable => &[Damager],
        Body => &[Body, Block, Force, GravityChange],
        Death => &[Feet, Side, Head, Body],
        Water => &[WaterListener],
        Ladder => &[Head, Feet],
        Side => &[Ice, Gate, Block, Bouncer],
        Feet => &[Ice, Block, Bouncer, Sand, Cart],
        Head => &[Block, Bouncer],
        Projectile => &[Body, Block, Water, Shield, Sand, Projectile],
        Laser => &[Block],
        Teleporter => &[TeleporterListener],
        _ => return None,
    };
    Some(allowed)
}

/// Stateless filter over the static adjacency table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactFilter;

impl ContactFilter {
    pub fn new() -> Self {
        Self
    }

    /// Whether candidate contacts should be searched for starting from a
    /// fixture of this type.
    pub fn should_proceed_filtering(&self, fixture_type: FixtureType) -> bool {
        fixture_type == Custom || adjacency(fixture_type).is_some()
    }

    /// `true` iff the table lists the pair in either direction.
    pub fn table_allows(&self, a: FixtureType, b: FixtureType) -> bool {
        let listed = |key: FixtureType, other: FixtureType| {
            adjacency(key).is_some_and(|allowed| allowed.contains(&other))
        };
        listed(a, b) || listed(b, a)
    }

    /// Whether the pair is a real contact.
    ///
    /// Self-contacts never count. A CUSTOM fixture's predicate, called with
    /// the other fixture, is authoritative; a CUSTOM fixture without one
    /// contacts nothing.
    pub fn filter(&self, a: FixtureRef<'_>, b: FixtureRef<'_>) -> bool {
        if a.id == b.id || a.id.same_entity(b.id) {
            return false;
        }
        if a.fixture_type() == Custom {
            return a.fixture.predicate.as_ref().is_some_and(|p| p(b));
        }
        if b.fixture_type() == Custom {
            return b.fixture.predicate.as_ref().is_some_and(|p| p(a));
        }
        self.table_allows(a.fixture_type(), b.fixture_type())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
