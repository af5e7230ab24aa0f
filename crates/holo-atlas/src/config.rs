//! Atlas configuration: clustering parameters, trace window, thresholds,
//! timeouts, and cache TTL. Deserializable from TOML; every field has a
//! documented default so a bare `[atlas]` table (or none at all) works.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use holo_core::cluster::ClusterParams;
use holo_core::constants::{
    DEFAULT_CLUSTER_EPS, DEFAULT_MIN_CLUSTER_POINTS, DEFAULT_TRACE_WINDOW, MEMBERSHIP_THRESHOLD,
    SPARSITY_THRESHOLD, TERRAIN_RESULT_LIMIT, VOID_GROUPING_RADIUS,
};
use holo_core::region::VoidParams;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Subject whose trace history is replayed.
    pub subject: String,
    /// Terrain query radius (cosine distance).
    pub search_radius: f32,
    /// Result cap per terrain query.
    pub terrain_limit: usize,
    /// DBSCAN neighborhood radius.
    pub cluster_eps: f32,
    /// DBSCAN minimum core-point neighborhood size.
    pub min_cluster_points: usize,
    /// Trace entries replayed per desire-line build.
    pub trace_window: usize,
    /// Max centroid distance for trace-step landmark assignment.
    pub membership_threshold: f32,
    /// Leader-grouping radius for void candidates.
    pub void_grouping_radius: f32,
    /// Points-per-grouping-ball below which a noise group is a void.
    pub sparsity_threshold: f64,
    /// Resolution hint used when the caller does not supply one.
    pub resolution_hint: f32,
    /// Timeout on each terrain/trace network call.
    pub io_timeout_ms: u64,
    /// Deadline for the pure map-build stages.
    pub build_timeout_ms: u64,
    /// Deadline for path search.
    pub search_timeout_ms: u64,
    /// Map cache TTL. Entries expire by TTL only, never by write-through.
    pub cache_ttl_secs: u64,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            subject: "default".to_string(),
            search_radius: 0.75,
            terrain_limit: TERRAIN_RESULT_LIMIT,
            cluster_eps: DEFAULT_CLUSTER_EPS,
            min_cluster_points: DEFAULT_MIN_CLUSTER_POINTS,
            trace_window: DEFAULT_TRACE_WINDOW,
            membership_threshold: MEMBERSHIP_THRESHOLD,
            void_grouping_radius: VOID_GROUPING_RADIUS,
            sparsity_threshold: SPARSITY_THRESHOLD,
            resolution_hint: 1.0,
            io_timeout_ms: 2_000,
            build_timeout_ms: 5_000,
            search_timeout_ms: 1_000,
            cache_ttl_secs: 60,
        }
    }
}

impl AtlasConfig {
    /// Parse from a TOML document. Missing fields fall back to defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn cluster_params(&self) -> ClusterParams {
        ClusterParams {
            eps: self.cluster_eps,
            min_points: self.min_cluster_points,
        }
    }

    pub fn void_params(&self) -> VoidParams {
        VoidParams {
            grouping_radius: self.void_grouping_radius,
            sparsity_threshold: self.sparsity_threshold,
        }
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    pub fn build_timeout(&self) -> Duration {
        Duration::from_millis(self.build_timeout_ms)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
