use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_INNER_RADIUS, HORIZON_EXPANSION, MAX_RESOLUTION_HINT, MIN_RESOLUTION_HINT,
};
use crate::vector::cosine_distance;

/// The resolution-falloff boundary: full detail inside the inner radius,
/// linear falloff to zero between inner and outer, nothing beyond.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Horizon {
    pub center: Vec<f32>,
    pub inner_radius: f32,
    pub outer_radius: f32,
}

impl Horizon {
    /// `outer` is floored at `inner` to keep the falloff well-formed.
    pub fn new(center: Vec<f32>, inner_radius: f32, outer_radius: f32) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius: outer_radius.max(inner_radius),
        }
    }

    /// Derive a horizon from a resolution hint. Higher hints shrink the
    /// inner radius: more landmarks render at full detail, each with less
    /// surrounding context. The hint is clamped so a degenerate request
    /// cannot collapse or explode the falloff band.
    pub fn for_hint(center: Vec<f32>, resolution_hint: f32) -> Self {
        let hint = resolution_hint.clamp(MIN_RESOLUTION_HINT, MAX_RESOLUTION_HINT);
        let inner = BASE_INNER_RADIUS / hint;
        Self::new(center, inner, inner * HORIZON_EXPANSION)
    }

    /// Resolution in [0, 1] at a cosine distance from the center.
    /// Monotonically non-increasing in distance.
    pub fn resolution_at(&self, distance: f32) -> f32 {
        if distance <= self.inner_radius {
            return 1.0;
        }
        if distance >= self.outer_radius {
            return 0.0;
        }
        (self.outer_radius - distance) / (self.outer_radius - self.inner_radius)
    }

    /// Resolution of an embedding, by its distance from the center.
    pub fn resolution_of(&self, embedding: &[f32]) -> f32 {
        self.resolution_at(cosine_distance(&self.center, embedding))
    }
}
