//! Closed tag enumerations attached to fixtures and bodies.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TagSet
// ---------------------------------------------------------------------------

/// A closed enumeration small enough to live in a `u32` bitset.
pub trait Tag: Copy + fmt::Debug + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Bit position of this variant. Must be `< 32` and unique.
    fn bit(self) -> u32;
}

/// A set of tags backed by a single `u32`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagSet<T: Tag> {
    bits: u32,
    _marker: PhantomData<T>,
}

impl<T: Tag> TagSet<T> {
    pub const fn empty() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }

    pub fn of(tags: &[T]) -> Self {
        let mut set = Self::empty();
        for &tag in tags {
            set.insert(tag);
        }
        set
    }

    #[inline]
    pub fn insert(&mut self, tag: T) {
        self.bits |= 1 << tag.bit();
    }

    #[inline]
    pub fn remove(&mut self, tag: T) {
        self.bits &= !(1 << tag.bit());
    }

    #[inline]
    pub fn contains(&self, tag: T) -> bool {
        self.bits & (1 << tag.bit()) != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        T::ALL.iter().copied().filter(|t| self.contains(*t))
    }
}

impl<T: Tag> Default for TagSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Tag> fmt::Debug for TagSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

macro_rules! impl_tag {
    ($ty:ty, [$($variant:ident),+ $(,)?]) => {
        impl Tag for $ty {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[inline]
            fn bit(self) -> u32 {
                self as u32
            }
        }
    };
}

// ---------------------------------------------------------------------------
// FixtureType
// ---------------------------------------------------------------------------

/// What a fixture *is* for the purpose of contact resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FixtureType {
    Block,
    Player,
    Body,
    Feet,
    Head,
    Side,
    Item,
    Ice,
    Sand,
    Gate,
    Laser,
    Water,
    Force,
    Ladder,
    Shield,
    Bouncer,
    Consumer,
    /// Carries its own contact predicate instead of using the adjacency table.
    Custom,
    Death,
    Damager,
    Damageable,
    Projectile,
    WaterListener,
    GravityChange,
    Cart,
    Teleporter,
    TeleporterListener,
}

impl_tag!(
    FixtureType,
    [
        Block,
        Player,
        Body,
        Feet,
        Head,
        Side,
        Item,
        Ice,
        Sand,
        Gate,
        Laser,
        Water,
        Force,
        Ladder,
        Shield,
        Bouncer,
        Consumer,
        Custom,
        Death,
        Damager,
        Damageable,
        Projectile,
        WaterListener,
        GravityChange,
        Cart,
        Teleporter,
        TeleporterListener,
    ]
);

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Per-fixture exclusions from specific rule families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixtureLabel {
    NoSideTouchie,
    NoBodyTouchie,
    NoFeetTouchie,
    NoProjectileCollision,
}

impl_tag!(
    FixtureLabel,
    [NoSideTouchie, NoBodyTouchie, NoFeetTouchie, NoProjectileCollision]
);

/// Per-body exclusions from specific rule families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyLabel {
    /// One-way platform: solid only when landed on from above.
    CollideDownOnly,
    CollideUpOnly,
    NoSideTouchie,
    NoBodyTouchie,
}

impl_tag!(
    BodyLabel,
    [CollideDownOnly, CollideUpOnly, NoSideTouchie, NoBodyTouchie]
);

// ---------------------------------------------------------------------------
// Small enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BodyType {
    #[default]
    Dynamic,
    Static,
    /// Has bounds and fixtures but is never integrated.
    Abstract,
}

/// Which way "up" points for a body, i.e. the opposite of its gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }
}

/// Marks a SIDE fixture as the left or right flank of its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Contact phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessState {
    Begin,
    Continue,
    End,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
