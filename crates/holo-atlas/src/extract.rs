//! Landmark extraction over the terrain index.
//!
//! Thin I/O shell around `holo_core::extract`: one bounded nearest-neighbor
//! query under a timeout, then pure clustering under the build deadline.

use std::sync::Arc;

use tokio::time::timeout;

use holo_core::{Attractor, ContextVector, Deadline};

use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::terrain::TerrainIndex;

/// Extraction result plus the raw terrain sample it came from. The sample
/// becomes the map's item table so foveation can render member content.
pub struct ExtractOutcome {
    pub landmarks: Vec<Attractor>,
    pub noise: Vec<ContextVector>,
    pub sample: Vec<ContextVector>,
}

pub struct LandmarkExtractor {
    terrain: Arc<dyn TerrainIndex>,
    config: AtlasConfig,
}

impl LandmarkExtractor {
    pub fn new(terrain: Arc<dyn TerrainIndex>, config: AtlasConfig) -> Self {
        Self { terrain, config }
    }

    /// Query terrain around `origin` and cluster the sample.
    ///
    /// A failed or timed-out terrain call is fatal for the build —
    /// landmarks cannot be fabricated from nothing. Zero returned items is
    /// a cold start, not an error: the empty result propagates to void
    /// computation downstream.
    pub async fn extract(
        &self,
        origin: &ContextVector,
        radius: f32,
        deadline: &Deadline,
    ) -> Result<ExtractOutcome> {
        let sample = timeout(
            self.config.io_timeout(),
            self.terrain
                .find_near(&origin.embedding, radius, self.config.terrain_limit),
        )
        .await
        .map_err(|_| AtlasError::TerrainUnavailable("query timed out".to_string()))?
        .map_err(|e| AtlasError::TerrainUnavailable(e.to_string()))?;

        if sample.is_empty() {
            tracing::debug!("cold start: terrain returned no items");
        }

        let extraction = holo_core::extract(&sample, &self.config.cluster_params(), deadline)
            .map_err(|_| AtlasError::BuildTimeout)?;

        tracing::debug!(
            landmarks = extraction.landmarks.len(),
            noise = extraction.noise.len(),
            sample = sample.len(),
            "landmark extraction complete"
        );

        Ok(ExtractOutcome {
            landmarks: extraction.landmarks,
            noise: extraction.noise,
            sample,
        })
    }
}
