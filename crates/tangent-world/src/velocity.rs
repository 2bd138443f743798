//! Velocity alteration protocol.
//!
//! Bouncers and force fields describe their effect on a body as a
//! [`VelocityAlteration`]: per axis, either replace the component, add to it,
//! or leave it alone. Sources never touch velocity directly, so several of
//! them can act on one body in the same tick with well-defined composition:
//! applications are sequential, and a `Set` discards everything applied to
//! that axis before it.

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::geometry::Vec2;

/// What to do with one velocity component.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AxisAlteration {
    #[default]
    None,
    Set(f32),
    Add(f32),
}

impl AxisAlteration {
    #[inline]
    pub fn apply(self, value: f32) -> f32 {
        match self {
            AxisAlteration::None => value,
            AxisAlteration::Set(v) => v,
            AxisAlteration::Add(d) => value + d,
        }
    }
}

/// Independent per-axis alteration of a velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VelocityAlteration {
    pub x: AxisAlteration,
    pub y: AxisAlteration,
}

impl VelocityAlteration {
    /// Leaves both axes untouched.
    pub const NONE: VelocityAlteration = VelocityAlteration {
        x: AxisAlteration::None,
        y: AxisAlteration::None,
    };

    pub const fn new(x: AxisAlteration, y: AxisAlteration) -> Self {
        Self { x, y }
    }

    pub const fn set(x: f32, y: f32) -> Self {
        Self::new(AxisAlteration::Set(x), AxisAlteration::Set(y))
    }

    pub const fn add(x: f32, y: f32) -> Self {
        Self::new(AxisAlteration::Add(x), AxisAlteration::Add(y))
    }

    pub const fn set_x(x: f32) -> Self {
        Self::new(AxisAlteration::Set(x), AxisAlteration::None)
    }

    pub const fn set_y(y: f32) -> Self {
        Self::new(AxisAlteration::None, AxisAlteration::Set(y))
    }

    pub const fn add_x(x: f32) -> Self {
        Self::new(AxisAlteration::Add(x), AxisAlteration::None)
    }

    pub const fn add_y(y: f32) -> Self {
        Self::new(AxisAlteration::None, AxisAlteration::Add(y))
    }

    pub fn is_noop(&self) -> bool {
        self.x == AxisAlteration::None && self.y == AxisAlteration::None
    }

    pub fn apply_to(&self, velocity: &mut Vec2) {
        velocity.x = self.x.apply(velocity.x);
        velocity.y = self.y.apply(velocity.y);
    }
}

/// Apply `alteration` to the body's velocity.
pub fn alterate(body: &mut Body, alteration: VelocityAlteration) {
    alteration.apply_to(&mut body.physics.velocity);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
