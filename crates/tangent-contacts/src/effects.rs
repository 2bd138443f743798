//! Presentation requests raised by contact rules.
//!
//! Rules never play audio or spawn particles themselves. They push an
//! [`EffectRequest`] and the host drains the queue after each step.

use serde::{Deserialize, Serialize};
use tangent_world::capability::SplashKind;
use tangent_world::entity::EntityId;
use tangent_world::geometry::{Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player feet touched ground that makes a landing sound.
    Land,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectRequest {
    PlaySound { cue: SoundCue, source: EntityId },
    /// A splash at a fixed point (sand kicked up by feet or a projectile).
    SpawnSplash {
        kind: SplashKind,
        position: Vec2,
        sound: bool,
    },
    /// A splash on a water surface where a listener crossed it.
    WaterSurfaceSplash {
        listener_bounds: Rect,
        water_bounds: Rect,
        kind: SplashKind,
        sound: bool,
    },
}

impl EffectRequest {
    /// Where the effect should appear. Surface splashes sit on the water's
    /// top edge under the listener's center.
    pub fn position(&self) -> Option<Vec2> {
        match self {
            EffectRequest::PlaySound { .. } => None,
            EffectRequest::SpawnSplash { position, .. } => Some(*position),
            EffectRequest::WaterSurfaceSplash {
                listener_bounds,
                water_bounds,
                ..
            } => Some(Vec2::new(listener_bounds.center().x, water_bounds.top())),
        }
    }
}

/// FIFO of pending effect requests.
#[derive(Debug, Default)]
pub struct EffectQueue {
    requests: Vec<EffectRequest>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: EffectRequest) {
        self.requests.push(request);
    }

    /// Take every pending request in push order.
    pub fn drain(&mut self) -> Vec<EffectRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectRequest> {
        self.requests.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
