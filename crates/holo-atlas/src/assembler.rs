//! Map assembly: orchestrates landmark extraction, desire-line building,
//! void grouping, and horizon derivation into one immutable snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use holo_core::{ContextVector, Deadline, Horizon, HoloMap, build_desire_lines, group_voids};

use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::extract::LandmarkExtractor;
use crate::terrain::{TerrainIndex, TraceLog};

pub struct MapAssembler {
    extractor: LandmarkExtractor,
    trace: Arc<dyn TraceLog>,
    config: AtlasConfig,
}

impl MapAssembler {
    pub fn new(
        terrain: Arc<dyn TerrainIndex>,
        trace: Arc<dyn TraceLog>,
        config: AtlasConfig,
    ) -> Self {
        Self {
            extractor: LandmarkExtractor::new(terrain, config.clone()),
            trace,
            config,
        }
    }

    /// Build a map around `origin` at the requested resolution.
    ///
    /// Terrain failure is fatal (`TerrainUnavailable`); trace failure
    /// degrades to an empty edge set, which forces exploration mode on
    /// every route through this map. A fired deadline or cancellation
    /// aborts with `BuildTimeout` — never a partial map.
    pub async fn assemble(
        &self,
        origin: &ContextVector,
        resolution_hint: f32,
        cancel: &CancellationToken,
    ) -> Result<HoloMap> {
        if cancel.is_cancelled() {
            return Err(AtlasError::BuildTimeout);
        }
        let deadline = Deadline::after(self.config.build_timeout());

        let extracted = self
            .extractor
            .extract(origin, self.config.search_radius, &deadline)
            .await?;

        if cancel.is_cancelled() {
            return Err(AtlasError::BuildTimeout);
        }

        // The trace window is a snapshot as of this call; appends landing
        // during the build never change its output.
        let steps = match timeout(
            self.config.io_timeout(),
            self.trace
                .recent(&self.config.subject, self.config.trace_window),
        )
        .await
        {
            Ok(Ok(records)) => records.iter().map(|r| r.step()).collect(),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "trace log unavailable; desire lines degraded to empty");
                Vec::new()
            }
            Err(_) => {
                tracing::warn!("trace log timed out; desire lines degraded to empty");
                Vec::new()
            }
        };

        let edges =
            build_desire_lines(&extracted.landmarks, &steps, self.config.membership_threshold);
        deadline.check().map_err(|_| AtlasError::BuildTimeout)?;
        if cancel.is_cancelled() {
            return Err(AtlasError::BuildTimeout);
        }

        let voids = group_voids(&extracted.noise, &self.config.void_params());
        let items: BTreeMap<_, _> = extracted.sample.into_iter().map(|p| (p.id, p)).collect();

        tracing::debug!(
            landmarks = extracted.landmarks.len(),
            edges = edges.len(),
            voids = voids.len(),
            "map assembled"
        );

        Ok(HoloMap {
            origin: origin.clone(),
            landmarks: extracted.landmarks,
            edges,
            voids,
            horizon: Horizon::for_hint(origin.embedding.clone(), resolution_hint),
            items,
        })
    }
}
