use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cluster::{ClusterParams, cluster};
use crate::deadline::{Deadline, DeadlineExpired};
use crate::vector::{ContextVector, cosine_distance, mean};

/// Floor on the density radius estimate so a perfectly tight cluster does
/// not produce an infinite density.
const MIN_DENSITY_RADIUS: f64 = 1e-3;

/// A named, weighted landmark: a dense cluster of memory items collapsed
/// into a single navigable node.
///
/// Value object, created fresh on every map build. Two builds may assign
/// different ids to conceptually similar clusters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attractor {
    pub id: Uuid,
    pub centroid: Vec<f32>,
    pub members: BTreeSet<Uuid>,
    pub label: String,
    pub density: f64,
}

impl Attractor {
    /// Build an attractor from a non-empty member set.
    ///
    /// Centroid is the mean member embedding. Density is members per
    /// estimated cluster volume (ball of the mean member-to-centroid
    /// distance). Label is the most frequent member tag, ties broken
    /// toward the lexicographically smallest.
    pub fn from_members(members: &[&ContextVector]) -> Self {
        assert!(!members.is_empty(), "attractor needs at least one member");

        let embeddings: Vec<&[f32]> = members.iter().map(|m| m.embedding.as_slice()).collect();
        let centroid = mean(&embeddings);

        let spread: f64 = members
            .iter()
            .map(|m| f64::from(cosine_distance(&centroid, &m.embedding)))
            .sum::<f64>()
            / members.len() as f64;
        let radius = spread.max(MIN_DENSITY_RADIUS);
        let volume = 4.0 / 3.0 * PI * radius.powi(3);
        let density = members.len() as f64 / volume;

        Self {
            id: Uuid::new_v4(),
            centroid,
            members: members.iter().map(|m| m.id).collect(),
            label: derive_label(members),
            density,
        }
    }

    /// Cosine distance from this landmark's centroid to an embedding.
    pub fn distance_to(&self, embedding: &[f32]) -> f32 {
        cosine_distance(&self.centroid, embedding)
    }
}

/// Landmarks plus the noise points left over by clustering. Noise is
/// never discarded — it seeds void candidate regions downstream.
#[derive(Debug)]
pub struct Extraction {
    pub landmarks: Vec<Attractor>,
    pub noise: Vec<ContextVector>,
}

/// Cluster a terrain sample into attractors. Zero input points is a cold
/// start, not an error: the result is simply empty.
pub fn extract(
    points: &[ContextVector],
    params: &ClusterParams,
    deadline: &Deadline,
) -> Result<Extraction, DeadlineExpired> {
    let outcome = cluster(points, params, deadline)?;

    let landmarks = outcome
        .clusters
        .iter()
        .map(|indices| {
            let members: Vec<&ContextVector> = indices.iter().map(|&i| &points[i]).collect();
            Attractor::from_members(&members)
        })
        .collect();
    let noise = outcome.noise.iter().map(|&i| points[i].clone()).collect();

    Ok(Extraction { landmarks, noise })
}

/// Most frequent tag across members; lexicographically smallest on ties;
/// "unlabeled" when no member carries tags.
fn derive_label(members: &[&ContextVector]) -> String {
    let mut votes: BTreeMap<&str, usize> = BTreeMap::new();
    for m in members {
        for tag in &m.tags {
            *votes.entry(tag.as_str()).or_default() += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (tag, count) in &votes {
        // BTreeMap iterates tags in lexicographic order, so strictly-greater
        // keeps the smallest tag on ties.
        if best.is_none_or(|(_, c)| *count > c) {
            best = Some((tag, *count));
        }
    }
    best.map_or_else(|| "unlabeled".to_string(), |(tag, _)| tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(embedding: Vec<f32>, tags: &[&str]) -> ContextVector {
        let mut v = ContextVector::new(embedding);
        v.tags = tags.iter().map(|t| t.to_string()).collect();
        v
    }

    #[test]
    fn test_centroid_is_mean() {
        let a = member(vec![1.0, 0.0], &[]);
        let b = member(vec![0.0, 1.0], &[]);
        let attractor = Attractor::from_members(&[&a, &b]);
        assert_eq!(attractor.centroid, vec![0.5, 0.5]);
        assert_eq!(attractor.members.len(), 2);
    }

    #[test]
    fn test_label_majority_vote() {
        let a = member(vec![1.0, 0.0], &["auth", "login"]);
        let b = member(vec![0.9, 0.1], &["auth"]);
        let c = member(vec![0.95, 0.05], &["session"]);
        let attractor = Attractor::from_members(&[&a, &b, &c]);
        assert_eq!(attractor.label, "auth");
    }

    #[test]
    fn test_label_tie_breaks_lexicographically() {
        let a = member(vec![1.0, 0.0], &["zeta"]);
        let b = member(vec![0.9, 0.1], &["alpha"]);
        let attractor = Attractor::from_members(&[&a, &b]);
        assert_eq!(attractor.label, "alpha");
    }

    #[test]
    fn test_label_fallback() {
        let a = member(vec![1.0, 0.0], &[]);
        let attractor = Attractor::from_members(&[&a]);
        assert_eq!(attractor.label, "unlabeled");
    }

    #[test]
    fn test_tight_cluster_denser_than_loose() {
        let tight = [
            member(vec![1.0, 0.0, 0.0], &[]),
            member(vec![0.999, 0.01, 0.0], &[]),
            member(vec![0.998, 0.02, 0.0], &[]),
        ];
        let loose = [
            member(vec![1.0, 0.0, 0.0], &[]),
            member(vec![0.9, 0.3, 0.0], &[]),
            member(vec![0.8, 0.5, 0.0], &[]),
        ];
        let tight_refs: Vec<&ContextVector> = tight.iter().collect();
        let loose_refs: Vec<&ContextVector> = loose.iter().collect();

        let d_tight = Attractor::from_members(&tight_refs).density;
        let d_loose = Attractor::from_members(&loose_refs).density;
        assert!(
            d_tight > d_loose,
            "tight cluster should be denser: {d_tight} vs {d_loose}"
        );
    }

    #[test]
    fn test_density_finite_for_single_member() {
        let a = member(vec![1.0, 0.0], &[]);
        let attractor = Attractor::from_members(&[&a]);
        assert!(attractor.density.is_finite());
        assert!(attractor.density > 0.0);
    }

    #[test]
    fn test_extract_splits_landmarks_and_noise() {
        let points = vec![
            member(vec![1.0, 0.0, 0.0], &["auth"]),
            member(vec![0.99, 0.05, 0.0], &["auth"]),
            member(vec![0.98, 0.08, 0.0], &["auth"]),
            member(vec![0.0, 0.0, 1.0], &[]),
        ];
        let extraction = extract(&points, &ClusterParams::default(), &Deadline::none()).unwrap();

        assert_eq!(extraction.landmarks.len(), 1);
        assert_eq!(extraction.landmarks[0].label, "auth");
        assert_eq!(extraction.landmarks[0].members.len(), 3);
        assert_eq!(extraction.noise.len(), 1);
        assert_eq!(extraction.noise[0].id, points[3].id);
    }

    #[test]
    fn test_extract_cold_start() {
        let extraction = extract(&[], &ClusterParams::default(), &Deadline::none()).unwrap();
        assert!(extraction.landmarks.is_empty());
        assert!(extraction.noise.is_empty());
    }

    #[test]
    fn test_serde_roundtrip() {
        let a = member(vec![1.0, 0.0], &["auth"]);
        let attractor = Attractor::from_members(&[&a]);
        let json = serde_json::to_string(&attractor).unwrap();
        let back: Attractor = serde_json::from_str(&json).unwrap();
        assert_eq!(attractor.id, back.id);
        assert_eq!(attractor.label, back.label);
        assert_eq!(attractor.members, back.members);
    }
}
