//! Desire lines: weighted transition edges replayed from trace history.
//!
//! Weight is empirical transition probability, not geometric proximity.
//! Outgoing weights from a source sum to 1, or the source has no edges at
//! all — a landmark never departed gets zero edges, not a uniform guess.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::PROVENANCE_SAMPLE;
use crate::landmark::Attractor;

/// One trace observation, reduced to what replay needs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TraceStep {
    pub trace_id: Uuid,
    pub embedding: Vec<f32>,
}

/// A directed desire line between two landmarks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub source: Uuid,
    pub target: Uuid,
    /// Empirical transition probability from `source`, in [0, 1].
    pub weight: f64,
    /// Up to 5 contributing trace ids, in replay order.
    #[serde(default)]
    pub provenance: Vec<Uuid>,
}

/// Replay a trace window over a landmark set and produce normalized
/// transition edges.
///
/// Each step maps to its nearest landmark by centroid distance; steps
/// farther than `membership_threshold` from every landmark are unassigned
/// and break the transition chain. Nearest-landmark ties break toward the
/// smaller landmark id. Deterministic for a fixed trace and landmark set.
pub fn build_desire_lines(
    landmarks: &[Attractor],
    trace: &[TraceStep],
    membership_threshold: f32,
) -> Vec<WeightedEdge> {
    if landmarks.is_empty() || trace.len() < 2 {
        return Vec::new();
    }

    let mut counts: BTreeMap<(Uuid, Uuid), u64> = BTreeMap::new();
    let mut provenance: BTreeMap<(Uuid, Uuid), Vec<Uuid>> = BTreeMap::new();
    let mut departures: BTreeMap<Uuid, u64> = BTreeMap::new();

    let mut prev: Option<Uuid> = None;
    for step in trace {
        let current = assign(landmarks, &step.embedding, membership_threshold);
        if let (Some(from), Some(to)) = (prev, current)
            && from != to
        {
            *counts.entry((from, to)).or_default() += 1;
            *departures.entry(from).or_default() += 1;
            let sample = provenance.entry((from, to)).or_default();
            if sample.len() < PROVENANCE_SAMPLE {
                sample.push(step.trace_id);
            }
        }
        prev = current;
    }

    counts
        .into_iter()
        .map(|((source, target), count)| WeightedEdge {
            source,
            target,
            weight: count as f64 / departures[&source] as f64,
            provenance: provenance.remove(&(source, target)).unwrap_or_default(),
        })
        .collect()
}

/// Nearest landmark within the membership threshold, ties toward the
/// smaller id. None when every landmark is too far.
fn assign(landmarks: &[Attractor], embedding: &[f32], threshold: f32) -> Option<Uuid> {
    let mut best: Option<(f32, Uuid)> = None;
    for lm in landmarks {
        let d = lm.distance_to(embedding);
        if d > threshold {
            continue;
        }
        let candidate = (d, lm.id);
        if best.is_none_or(|b| candidate < b) {
            best = Some(candidate);
        }
    }
    best.map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MEMBERSHIP_THRESHOLD;
    use crate::vector::ContextVector;

    fn landmark_at(embedding: Vec<f32>) -> Attractor {
        let v = ContextVector::new(embedding);
        Attractor::from_members(&[&v])
    }

    fn step(embedding: Vec<f32>) -> TraceStep {
        TraceStep {
            trace_id: Uuid::new_v4(),
            embedding,
        }
    }

    fn walk(points: &[Vec<f32>]) -> Vec<TraceStep> {
        points.iter().cloned().map(step).collect()
    }

    #[test]
    fn test_weights_normalize_per_source() {
        let a = landmark_at(vec![1.0, 0.0, 0.0]);
        let b = landmark_at(vec![0.0, 1.0, 0.0]);
        let c = landmark_at(vec![0.0, 0.0, 1.0]);
        let landmarks = vec![a.clone(), b.clone(), c.clone()];

        // a→b, a→b, a→c: weights 2/3 and 1/3
        let trace = walk(&[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ]);
        let edges = build_desire_lines(&landmarks, &trace, MEMBERSHIP_THRESHOLD);

        let total: f64 = edges
            .iter()
            .filter(|e| e.source == a.id)
            .map(|e| e.weight)
            .sum();
        assert!((total - 1.0).abs() < 1e-6, "outgoing weights sum to {total}");

        let ab = edges
            .iter()
            .find(|e| e.source == a.id && e.target == b.id)
            .unwrap();
        assert!((ab.weight - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_never_departed_landmark_has_no_edges() {
        let a = landmark_at(vec![1.0, 0.0]);
        let b = landmark_at(vec![0.0, 1.0]);
        let landmarks = vec![a.clone(), b.clone()];

        // Only a→b is ever observed.
        let trace = walk(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        let edges = build_desire_lines(&landmarks, &trace, MEMBERSHIP_THRESHOLD);

        assert_eq!(edges.len(), 1);
        assert!(edges.iter().all(|e| e.source != b.id));
    }

    #[test]
    fn test_unassigned_step_breaks_chain() {
        let a = landmark_at(vec![1.0, 0.0, 0.0]);
        let b = landmark_at(vec![0.0, 1.0, 0.0]);
        let landmarks = vec![a.clone(), b.clone()];

        // The middle step is orthogonal to both landmarks: no a→b edge.
        let trace = walk(&[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ]);
        let edges = build_desire_lines(&landmarks, &trace, MEMBERSHIP_THRESHOLD);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_self_transition_not_counted() {
        let a = landmark_at(vec![1.0, 0.0]);
        let trace = walk(&[vec![1.0, 0.0], vec![0.99, 0.01], vec![1.0, 0.0]]);
        let edges = build_desire_lines(&[a], &trace, MEMBERSHIP_THRESHOLD);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let landmarks = vec![landmark_at(vec![1.0, 0.0]), landmark_at(vec![0.0, 1.0])];
        let trace = walk(&[
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
        ]);

        let a = build_desire_lines(&landmarks, &trace, MEMBERSHIP_THRESHOLD);
        let b = build_desire_lines(&landmarks, &trace, MEMBERSHIP_THRESHOLD);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.source, y.source);
            assert_eq!(x.target, y.target);
            assert_eq!(x.weight, y.weight);
        }
    }

    #[test]
    fn test_provenance_capped_at_five() {
        let a = landmark_at(vec![1.0, 0.0]);
        let b = landmark_at(vec![0.0, 1.0]);
        let landmarks = vec![a.clone(), b.clone()];

        let mut points = Vec::new();
        for _ in 0..8 {
            points.push(vec![1.0, 0.0]);
            points.push(vec![0.0, 1.0]);
        }
        let trace = walk(&points);
        let edges = build_desire_lines(&landmarks, &trace, MEMBERSHIP_THRESHOLD);

        let ab = edges
            .iter()
            .find(|e| e.source == a.id && e.target == b.id)
            .unwrap();
        assert_eq!(ab.provenance.len(), PROVENANCE_SAMPLE);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(build_desire_lines(&[], &[], MEMBERSHIP_THRESHOLD).is_empty());
        let lm = landmark_at(vec![1.0, 0.0]);
        let trace = walk(&[vec![1.0, 0.0]]);
        assert!(build_desire_lines(&[lm], &trace, MEMBERSHIP_THRESHOLD).is_empty());
    }
}
