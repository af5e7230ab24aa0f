//! Atlas error taxonomy.
//!
//! Only unrecoverable failures surface here: without terrain data there is
//! no safe degraded behavior, and a fired deadline must never leak a
//! partial map or plan. Everything gracefully degradable — an unavailable
//! trace log, a cold-start region, a target inside a void — is absorbed
//! into the return value instead (empty edge sets, marker-only contexts,
//! plan warnings).

use thiserror::Error;

/// Errors surfaced to atlas callers.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Terrain index call failed or timed out. Not retried internally;
    /// the caller owns retry policy.
    #[error("terrain index unavailable: {0}")]
    TerrainUnavailable(String),

    /// Deadline or cancellation fired while building a map.
    #[error("map build timed out")]
    BuildTimeout,

    /// Deadline or cancellation fired during path search.
    #[error("path search timed out")]
    SearchTimeout,
}

/// Result alias for atlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;
