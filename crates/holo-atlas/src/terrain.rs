//! Interfaces to the externally-owned terrain index and trace log.
//!
//! Both are the only suspension points in the subsystem; every call site
//! wraps them in a timeout. Implementations are resolved at construction
//! time and injected — never probed at runtime.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use holo_core::{ContextVector, TraceStep};

/// Failure reported by a terrain index implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TerrainError(pub String);

/// Failure reported by a trace log implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TraceError(pub String);

/// Nearest-neighbor service over concept embeddings.
#[async_trait]
pub trait TerrainIndex: Send + Sync {
    /// All items within `radius` (cosine distance) of `embedding`, at
    /// most `limit` of them.
    async fn find_near(
        &self,
        embedding: &[f32],
        radius: f32,
        limit: usize,
    ) -> std::result::Result<Vec<ContextVector>, TerrainError>;
}

/// Append-only observation log for a subject (agent or session).
#[async_trait]
pub trait TraceLog: Send + Sync {
    /// The most recent `n` observations, strictly time-ordered, newest
    /// last.
    async fn recent(
        &self,
        subject: &str,
        n: usize,
    ) -> std::result::Result<Vec<TraceRecord>, TraceError>;
}

/// One observation from the trace log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TraceRecord {
    pub trace_id: Uuid,
    pub timestamp_ms: u64,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl TraceRecord {
    /// Reduce to what desire-line replay needs.
    pub fn step(&self) -> TraceStep {
        TraceStep {
            trace_id: self.trace_id,
            embedding: self.embedding.clone(),
        }
    }
}
