//! Density-based clustering over cosine distance.
//!
//! Plain DBSCAN: no fixed cluster count, noise points allowed. Points are
//! visited in input order and neighbors expanded in input order, so the
//! outcome is deterministic for a given input slice.

use std::collections::VecDeque;

use crate::constants::{DEFAULT_CLUSTER_EPS, DEFAULT_MIN_CLUSTER_POINTS};
use crate::deadline::{Deadline, DeadlineExpired};
use crate::vector::{ContextVector, cosine_distance};

#[derive(Clone, Copy, Debug)]
pub struct ClusterParams {
    /// Neighborhood radius (cosine distance).
    pub eps: f32,
    /// Minimum neighborhood size (self included) for a core point.
    pub min_points: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            eps: DEFAULT_CLUSTER_EPS,
            min_points: DEFAULT_MIN_CLUSTER_POINTS,
        }
    }
}

/// Clustering result: member indices per cluster, plus noise indices.
/// Noise points are never discarded — they seed void candidate regions.
#[derive(Debug)]
pub struct ClusterOutcome {
    pub clusters: Vec<Vec<usize>>,
    pub noise: Vec<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Label {
    Unvisited,
    Noise,
    Cluster(usize),
}

/// Cluster `points` by density. O(n²) distance evaluations; the extraction
/// query is capped well below where that matters.
pub fn cluster(
    points: &[ContextVector],
    params: &ClusterParams,
    deadline: &Deadline,
) -> Result<ClusterOutcome, DeadlineExpired> {
    let n = points.len();
    let mut labels = vec![Label::Unvisited; n];
    let mut clusters: Vec<Vec<usize>> = Vec::new();

    for seed in 0..n {
        if labels[seed] != Label::Unvisited {
            continue;
        }
        deadline.check()?;

        let neighbors = region_query(points, seed, params.eps);
        if neighbors.len() < params.min_points {
            labels[seed] = Label::Noise;
            continue;
        }

        let cid = clusters.len();
        clusters.push(vec![seed]);
        labels[seed] = Label::Cluster(cid);

        let mut frontier: VecDeque<usize> = neighbors.into();
        while let Some(idx) = frontier.pop_front() {
            match labels[idx] {
                // Border point previously marked noise joins the cluster
                // but does not expand it.
                Label::Noise => {
                    labels[idx] = Label::Cluster(cid);
                    clusters[cid].push(idx);
                }
                Label::Unvisited => {
                    labels[idx] = Label::Cluster(cid);
                    clusters[cid].push(idx);
                    let expansion = region_query(points, idx, params.eps);
                    if expansion.len() >= params.min_points {
                        frontier.extend(expansion);
                    }
                    deadline.check()?;
                }
                Label::Cluster(_) => {}
            }
        }
    }

    let noise = (0..n).filter(|&i| labels[i] == Label::Noise).collect();
    Ok(ClusterOutcome { clusters, noise })
}

/// Indices of all points within `eps` of `center` (center included).
fn region_query(points: &[ContextVector], center: usize, eps: f32) -> Vec<usize> {
    let c = &points[center].embedding;
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| cosine_distance(c, &p.embedding) <= eps)
        .map(|(i, _)| i)
        .collect()
}
