//! The ordered rule table.
//!
//! Each rule names two fixture-type groups. A contact matches a rule when one
//! fixture's type is in the first group and the other's is in the second;
//! the first matching rule wins and its handler sees the fixtures oriented
//! as `(first, second)`. Groups are disjoint across rules apart from
//! CONSUMER, which is listed first so a consumer always sees its contacts.

use serde::{Deserialize, Serialize};
use tangent_world::entity::FixtureId;
use tangent_world::tags::{FixtureType, Tag};

use FixtureType::*;

/// Which handler a contact is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    Consumer,
    Damage,
    Death,
    BlockBody,
    BodyBody,
    BlockSide,
    Gate,
    SideIce,
    FeetBlock,
    FeetIce,
    FeetSand,
    Bouncer,
    HeadBlock,
    Water,
    HeadLadder,
    FeetLadder,
    BodyForce,
    GravityChange,
    BodyPlayer,
    Projectile,
    PlayerItem,
    FeetCart,
    Teleporter,
    LaserBlock,
}

struct Rule {
    first: &'static [FixtureType],
    second: &'static [FixtureType],
    kind: RuleKind,
}

const fn rule(first: &'static [FixtureType], second: &'static [FixtureType], kind: RuleKind) -> Rule {
    Rule { first, second, kind }
}

static RULES: &[Rule] = &[
    rule(&[Consumer], FixtureType::ALL, RuleKind::Consumer),
    rule(&[Damager], &[Damageable], RuleKind::Damage),
    rule(&[Death], &[Feet, Side, Head, Body], RuleKind::Death),
    rule(&[Block], &[Body], RuleKind::BlockBody),
    rule(&[Body], &[Body], RuleKind::BodyBody),
    rule(&[Block], &[Side], RuleKind::BlockSide),
    rule(&[Side, Feet, Head], &[Gate], RuleKind::Gate),
    rule(&[Side], &[Ice], RuleKind::SideIce),
    rule(&[Feet], &[Block], RuleKind::FeetBlock),
    rule(&[Feet], &[Ice], RuleKind::FeetIce),
    rule(&[Feet], &[Sand], RuleKind::FeetSand),
    rule(&[Bouncer], &[Feet, Head, Side], RuleKind::Bouncer),
    rule(&[Head], &[Block], RuleKind::HeadBlock),
    rule(&[WaterListener], &[Water], RuleKind::Water),
    rule(&[Head], &[Ladder], RuleKind::HeadLadder),
    rule(&[Feet], &[Ladder], RuleKind::FeetLadder),
    rule(&[Body], &[Force], RuleKind::BodyForce),
    rule(&[Body], &[GravityChange], RuleKind::GravityChange),
    rule(&[Body], &[Player], RuleKind::BodyPlayer),
    rule(
        &[Projectile],
        &[Block, Body, Shield, Water, Sand, Projectile],
        RuleKind::Projectile,
    ),
    rule(&[Player], &[Item], RuleKind::PlayerItem),
    rule(&[Feet], &[Cart], RuleKind::FeetCart),
    rule(&[TeleporterListener], &[Teleporter], RuleKind::Teleporter),
    rule(&[Laser], &[Block], RuleKind::LaserBlock),
];

/// A contact matched to its rule, with fixtures oriented for the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedRule {
    pub kind: RuleKind,
    pub first: FixtureId,
    pub second: FixtureId,
}

/// Find the first rule the pair matches. When both orientations match
/// (same-group pairs such as BODY/BODY), `a` comes first.
pub fn classify(
    a: (FixtureId, FixtureType),
    b: (FixtureId, FixtureType),
) -> Option<MatchedRule> {
    RULES.iter().find_map(|rule| {
        let fits = |x: FixtureType, y: FixtureType| rule.first.contains(&x) && rule.second.contains(&y);
        if fits(a.1, b.1) {
            Some(MatchedRule {
                kind: rule.kind,
                first: a.0,
                second: b.0,
            })
        } else if fits(b.1, a.1) {
            Some(MatchedRule {
                kind: rule.kind,
                first: b.0,
                second: a.0,
            })
        } else {
            None
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
