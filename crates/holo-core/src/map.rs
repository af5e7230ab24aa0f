use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::desire::WeightedEdge;
use crate::horizon::Horizon;
use crate::landmark::Attractor;
use crate::region::Region;
use crate::vector::ContextVector;

/// An immutable holographic map snapshot: landmarks, desire lines, voids,
/// and the resolution horizon, built on demand for one origin.
///
/// A pure value computed from its inputs — no lifecycle beyond the call
/// that produced it. Callers may cache it keyed by origin bucket and
/// resolution hint with a short TTL.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HoloMap {
    pub origin: ContextVector,
    pub landmarks: Vec<Attractor>,
    pub edges: Vec<WeightedEdge>,
    pub voids: Vec<Region>,
    pub horizon: Horizon,
    /// Terrain sample snapshot the map was built from; lets foveation
    /// render member content without a second index round-trip.
    pub items: BTreeMap<Uuid, ContextVector>,
}

impl HoloMap {
    pub fn landmark(&self, id: Uuid) -> Option<&Attractor> {
        self.landmarks.iter().find(|l| l.id == id)
    }

    /// Nearest landmark to an embedding by centroid distance, with the
    /// distance. Ties break toward the smaller landmark id. None on an
    /// empty (cold-start) map.
    pub fn nearest_landmark(&self, embedding: &[f32]) -> Option<(&Attractor, f32)> {
        self.landmarks
            .iter()
            .map(|lm| (lm, lm.distance_to(embedding)))
            .min_by(|(a, da), (b, db)| da.total_cmp(db).then(a.id.cmp(&b.id)))
    }

    /// Landmarks sharing an edge with `id`, in either direction.
    pub fn neighbors_of(&self, id: Uuid) -> BTreeSet<Uuid> {
        let mut out = BTreeSet::new();
        for edge in &self.edges {
            if edge.weight <= 0.0 {
                continue;
            }
            if edge.source == id {
                out.insert(edge.target);
            } else if edge.target == id {
                out.insert(edge.source);
            }
        }
        out
    }

    /// Positive-weight outgoing edges from `id`.
    pub fn outgoing(&self, id: Uuid) -> impl Iterator<Item = &WeightedEdge> {
        self.edges
            .iter()
            .filter(move |e| e.source == id && e.weight > 0.0)
    }

    /// The void containing an embedding, if any.
    pub fn void_at(&self, embedding: &[f32]) -> Option<&Region> {
        self.voids.iter().find(|v| v.contains(embedding))
    }
}
