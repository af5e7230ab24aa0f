//! Foveated context injection: the top of the pipeline.
//!
//! One call builds (or re-uses) a map around the origin, optionally routes
//! toward a goal, and renders a budget-constrained payload. The injector
//! never mutates the budget — the caller decrements it by `tokens_used`
//! after the call.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use holo_core::{
    Budget, CharCost, Concept, ContextVector, CostModel, Deadline, HoloMap, NavigationPlan,
    OptimalContext, find_path, foveate,
};
use uuid::Uuid;

use crate::assembler::MapAssembler;
use crate::cache::MapCache;
use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::terrain::{TerrainIndex, TraceLog};

pub struct ContextInjector {
    assembler: MapAssembler,
    cache: MapCache,
    config: AtlasConfig,
    cost: Box<dyn CostModel + Send + Sync>,
}

impl ContextInjector {
    pub fn new(
        terrain: Arc<dyn TerrainIndex>,
        trace: Arc<dyn TraceLog>,
        config: AtlasConfig,
    ) -> Self {
        Self {
            assembler: MapAssembler::new(terrain, trace, config.clone()),
            cache: MapCache::new(config.cache_ttl()),
            config,
            cost: Box::new(CharCost),
        }
    }

    /// Swap the token-cost estimator.
    pub fn with_cost_model(mut self, cost: Box<dyn CostModel + Send + Sync>) -> Self {
        self.cost = cost;
        self
    }

    /// Render a foveated context payload around `origin` under `budget`.
    ///
    /// With a goal, the candidate landmarks are the navigation plan's
    /// waypoints; without one, the origin's nearest landmark plus every
    /// landmark sharing an edge with it. The returned value never spends
    /// more than `budget.remaining`; when nothing fits (including a zero
    /// budget or a landmark-free cold-start map) the result carries only
    /// the position marker.
    pub async fn inject(
        &self,
        origin: &ContextVector,
        goal: Option<&Concept>,
        budget: &Budget,
        cancel: &CancellationToken,
    ) -> Result<OptimalContext> {
        let map = self.map_for(origin, cancel).await?;

        let plan = match goal {
            Some(concept) => Some(self.navigate(&map, &origin.embedding, concept, cancel)?),
            None => None,
        };

        let ids = Self::candidates(&map, plan.as_ref());
        let ctx = foveate(&map, &ids, plan, budget, self.cost.as_ref());
        tracing::debug!(
            focal = ctx.focal.len(),
            peripheral = ctx.peripheral.len(),
            tokens_used = ctx.tokens_used,
            "context injected"
        );
        Ok(ctx)
    }

    /// Route across an assembled map under the search deadline.
    pub fn navigate(
        &self,
        map: &HoloMap,
        from: &[f32],
        to: &Concept,
        cancel: &CancellationToken,
    ) -> Result<NavigationPlan> {
        if cancel.is_cancelled() {
            return Err(AtlasError::SearchTimeout);
        }
        let deadline = Deadline::after(self.config.search_timeout());
        find_path(map, from, to, self.config.membership_threshold, &deadline)
            .map_err(|_| AtlasError::SearchTimeout)
    }

    /// Build or re-use the map for an origin at the configured resolution.
    /// Concurrent fills for one bucket may race; last write wins.
    async fn map_for(
        &self,
        origin: &ContextVector,
        cancel: &CancellationToken,
    ) -> Result<Arc<HoloMap>> {
        let hint = self.config.resolution_hint;
        if let Some(map) = self.cache.get(&origin.embedding, hint) {
            return Ok(map);
        }
        let built = Arc::new(self.assembler.assemble(origin, hint, cancel).await?);
        self.cache
            .put(&origin.embedding, hint, Arc::clone(&built));
        Ok(built)
    }

    fn candidates(map: &HoloMap, plan: Option<&NavigationPlan>) -> Vec<Uuid> {
        if let Some(plan) = plan
            && !plan.waypoints.is_empty()
        {
            return plan.waypoints.iter().map(|w| w.id).collect();
        }
        match map.nearest_landmark(&map.origin.embedding) {
            Some((anchor, _)) => {
                let mut ids = vec![anchor.id];
                ids.extend(map.neighbors_of(anchor.id));
                ids
            }
            None => Vec::new(),
        }
    }
}
