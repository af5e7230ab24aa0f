//! Void regions: sparse territory with no landmark.
//!
//! Voids come from the clustering noise points, grouped by simple radius
//! (leader) grouping — sparsity defines them, not density, so DBSCAN's
//! core-point machinery would be the wrong tool here.

use serde::{Deserialize, Serialize};

use crate::constants::{SPARSITY_THRESHOLD, VOID_GROUPING_RADIUS};
use crate::vector::{ContextVector, cosine_distance, mean};

/// A sparse region of the terrain: unexplored territory. Carries no
/// members, only a position and extent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Region {
    pub centroid: Vec<f32>,
    pub radius: f32,
}

impl Region {
    pub fn contains(&self, embedding: &[f32]) -> bool {
        cosine_distance(&self.centroid, embedding) <= self.radius
    }
}

#[derive(Clone, Copy, Debug)]
pub struct VoidParams {
    /// Leader-grouping radius (cosine distance).
    pub grouping_radius: f32,
    /// Groups at or above this many points per grouping-ball volume are
    /// emerging structure, not voids, and are discarded.
    pub sparsity_threshold: f64,
}

impl Default for VoidParams {
    fn default() -> Self {
        Self {
            grouping_radius: VOID_GROUPING_RADIUS,
            sparsity_threshold: SPARSITY_THRESHOLD,
        }
    }
}

/// Group noise points into void regions.
///
/// Leader grouping in input order: a point joins the first group whose
/// leader is within the grouping radius, else starts a group. Density is
/// measured in points per grouping-ball volume; only groups below the
/// sparsity threshold become regions.
pub fn group_voids(noise: &[ContextVector], params: &VoidParams) -> Vec<Region> {
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (idx, point) in noise.iter().enumerate() {
        let joined = groups.iter_mut().find(|g| {
            let leader = &noise[g[0]].embedding;
            cosine_distance(leader, &point.embedding) <= params.grouping_radius
        });
        match joined {
            Some(group) => group.push(idx),
            None => groups.push(vec![idx]),
        }
    }

    groups
        .into_iter()
        .filter_map(|group| {
            let embeddings: Vec<&[f32]> = group
                .iter()
                .map(|&i| noise[i].embedding.as_slice())
                .collect();
            let centroid = mean(&embeddings);
            let spread = embeddings
                .iter()
                .map(|e| cosine_distance(&centroid, e))
                .fold(0.0f32, f32::max);

            // Volume relative to one grouping ball, so the sparsity
            // threshold reads as "points per grouping-ball volume".
            let relative_volume = f64::from((spread / params.grouping_radius).max(1.0)).powi(3);
            let density = group.len() as f64 / relative_volume;
            if density >= params.sparsity_threshold {
                return None;
            }

            Some(Region {
                centroid,
                // Emptiness extends at least one grouping ball around
                // the sampled stragglers.
                radius: spread.max(params.grouping_radius),
            })
        })
        .collect()
}
