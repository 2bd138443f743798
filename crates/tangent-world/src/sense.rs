//! Per-body sense flags backed by explicit justification sets.
//!
//! A sense is asserted while at least one active contact justifies it. Each
//! justification names the pair of fixtures (`own`, `other`) whose contact
//! asserted the sense, so re-asserting from the same contact every continue
//! tick is idempotent and ending one contact leaves the sense standing while
//! another contact still holds it.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, FixtureId};
use crate::tags::{Tag, TagSet};

/// A named fact about a body's current contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodySense {
    InWater,
    FeetOnGround,
    FeetOnIce,
    FeetOnSand,
    HeadTouchingBlock,
    SideTouchingBlockLeft,
    SideTouchingBlockRight,
    SideTouchingIceLeft,
    SideTouchingIceRight,
    HeadTouchingLadder,
    FeetTouchingLadder,
    BodyTouchingBlock,
    TouchingCart,
    Teleporting,
    ForceApplied,
}

impl BodySense {
    pub const COUNT: usize = 15;
}

impl Tag for BodySense {
    const ALL: &'static [Self] = &[
        Self::InWater,
        Self::FeetOnGround,
        Self::FeetOnIce,
        Self::FeetOnSand,
        Self::HeadTouchingBlock,
        Self::SideTouchingBlockLeft,
        Self::SideTouchingBlockRight,
        Self::SideTouchingIceLeft,
        Self::SideTouchingIceRight,
        Self::HeadTouchingLadder,
        Self::FeetTouchingLadder,
        Self::BodyTouchingBlock,
        Self::TouchingCart,
        Self::Teleporting,
        Self::ForceApplied,
    ];

    #[inline]
    fn bit(self) -> u32 {
        self as u32
    }
}

/// The contact that keeps a sense asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Justification {
    /// Fixture on the sensing body.
    pub own: FixtureId,
    /// Fixture on the other side of the contact.
    pub other: FixtureId,
}

/// Sense state for one body.
#[derive(Debug, Clone, Default)]
pub struct BodySenses {
    active: TagSet<BodySense>,
    justifications: [Vec<Justification>; BodySense::COUNT],
}

impl BodySenses {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_sensing(&self, sense: BodySense) -> bool {
        self.active.contains(sense)
    }

    /// The currently asserted senses.
    pub fn active(&self) -> TagSet<BodySense> {
        self.active
    }

    /// Number of distinct contacts holding `sense`.
    pub fn justification_count(&self, sense: BodySense) -> usize {
        self.justifications[sense as usize].len()
    }

    /// Record that the contact (`own`, `other`) justifies `sense`.
    ///
    /// Returns `true` if the sense went from not asserted to asserted.
    pub fn justify(&mut self, sense: BodySense, own: FixtureId, other: FixtureId) -> bool {
        let entry = Justification { own, other };
        let list = &mut self.justifications[sense as usize];
        if !list.contains(&entry) {
            list.push(entry);
        }
        let newly = !self.active.contains(sense);
        self.active.insert(sense);
        newly
    }

    /// Drop the justification from (`own`, `other`).
    ///
    /// Returns `true` if that was the last one and the sense is now cleared.
    /// Releasing a justification that was never recorded is a no-op.
    pub fn release(&mut self, sense: BodySense, own: FixtureId, other: FixtureId) -> bool {
        let entry = Justification { own, other };
        let list = &mut self.justifications[sense as usize];
        list.retain(|j| *j != entry);
        if list.is_empty() && self.active.contains(sense) {
            self.active.remove(sense);
            return true;
        }
        false
    }

    /// Drop every justification naming a fixture of `entity`.
    ///
    /// Used when an entity is destroyed mid-contact and its end phase will
    /// never arrive.
    pub fn purge_entity(&mut self, entity: EntityId) {
        for sense in BodySense::ALL {
            let list = &mut self.justifications[*sense as usize];
            list.retain(|j| j.own.entity != entity && j.other.entity != entity);
            if list.is_empty() {
                self.active.remove(*sense);
            }
        }
    }

    /// Clear everything, e.g. when a body is reset for reuse.
    pub fn clear(&mut self) {
        self.active = TagSet::empty();
        self.justifications.iter_mut().for_each(Vec::clear);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
