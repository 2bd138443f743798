//! Tunables for contact resolution and the fixed-step driver.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ContactError;

// ---------------------------------------------------------------------------
// ContactConfig
// ---------------------------------------------------------------------------

/// Configuration shared by [`ContactResolver`](crate::resolver::ContactResolver)
/// and [`WorldSystem`](crate::system::WorldSystem).
///
/// Friction coefficients are per meter and get scaled by `ppm` when a rule
/// applies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Pixels per meter. Must be positive and finite.
    pub ppm: f32,
    pub ice_friction: f32,
    pub sand_friction: f32,
    /// Player gravity scalar while submerged.
    pub water_gravity_scalar: f32,
    /// Fixed step in seconds. Must be positive and finite.
    pub fixed_step: f32,
    /// Upper bound on steps taken by one `update` call; leftover time is
    /// dropped.
    pub max_steps_per_update: u32,
}

impl Default for ContactConfig {
    /// 32 pixels per meter, 150 Hz.
    fn default() -> Self {
        Self {
            ppm: 32.0,
            ice_friction: 0.025,
            sand_friction: 1.15,
            water_gravity_scalar: 0.5,
            fixed_step: 1.0 / 150.0,
            max_steps_per_update: 5,
        }
    }
}

impl ContactConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ContactError> {
        let config: ContactConfig =
            serde_json::from_str(json).map_err(|e| ContactError::Config { details: e.to_string() })?;
        config.validated()
    }

    /// Reject values the simulation cannot run with. A zero step cap is
    /// raised to one.
    pub fn validated(mut self) -> Result<Self, ContactError> {
        if !(self.fixed_step > 0.0 && self.fixed_step.is_finite()) {
            return Err(ContactError::Config {
                details: format!("fixed_step must be positive and finite, got {}", self.fixed_step),
            });
        }
        if !(self.ppm > 0.0 && self.ppm.is_finite()) {
            return Err(ContactError::Config {
                details: format!("ppm must be positive and finite, got {}", self.ppm),
            });
        }
        if self.max_steps_per_update == 0 {
            warn!("max_steps_per_update was 0, clamping to 1");
            self.max_steps_per_update = 1;
        }
        Ok(self)
    }

    #[inline]
    pub fn scaled_ice_friction(&self) -> f32 {
        self.ice_friction * self.ppm
    }

    #[inline]
    pub fn scaled_sand_friction(&self) -> f32 {
        self.sand_friction * self.ppm
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
