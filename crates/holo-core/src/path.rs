//! Route search over the desire-line graph.
//!
//! Desire lines are searched first with edge cost `1 − weight`, so
//! high-traffic routes are cheap — the engine deliberately prefers
//! historically traveled paths over geometrically shortest ones. Only when
//! no historical route exists does it fall back to bushwhacking: A* over
//! raw embedding distance with a fixed low confidence.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::EXPLORATION_CONFIDENCE;
use crate::deadline::{Deadline, DeadlineExpired};
use crate::landmark::Attractor;
use crate::map::HoloMap;
use crate::vector::cosine_distance;

/// How a route was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// Along observed transition history.
    DesireLine,
    /// No historical precedent; pure terrain distance.
    Exploration,
}

/// A navigation target: an embedding, optionally with a landmark label
/// that takes precedence during resolution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Concept {
    pub label: Option<String>,
    pub embedding: Vec<f32>,
}

impl Concept {
    pub fn at(embedding: Vec<f32>) -> Self {
        Self {
            label: None,
            embedding,
        }
    }

    pub fn labeled(label: &str, embedding: Vec<f32>) -> Self {
        Self {
            label: Some(label.to_string()),
            embedding,
        }
    }
}

/// An ordered route between two points on the map. Produced per request,
/// never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavigationPlan {
    pub waypoints: Vec<Attractor>,
    pub confidence: f64,
    pub mode: PlanMode,
    pub warning: Option<String>,
}

/// Find the most-traveled route from `from` to `to`.
///
/// Source is the landmark nearest `from`; target is the landmark whose
/// label matches `to.label`, else the one nearest `to.embedding`. A target
/// falling inside a void is reported via `warning` and routed best-effort,
/// never silently substituted.
pub fn find_path(
    map: &HoloMap,
    from: &[f32],
    to: &Concept,
    membership_threshold: f32,
    deadline: &Deadline,
) -> Result<NavigationPlan, DeadlineExpired> {
    let Some((source, _)) = map.nearest_landmark(from) else {
        return Ok(NavigationPlan {
            waypoints: Vec::new(),
            confidence: 0.0,
            mode: PlanMode::Exploration,
            warning: Some("no landmarks charted near this origin".to_string()),
        });
    };

    let target = resolve_target(map, to);
    let target_dist = target.distance_to(&to.embedding);

    // A target inside a void, out of reach of every landmark, is itself
    // meaningful: report it and route to the nearest landmark best-effort.
    if map.void_at(&to.embedding).is_some() && target_dist > membership_threshold {
        let waypoints = astar(map, source.id, target.id, deadline)?;
        return Ok(NavigationPlan {
            waypoints: materialize(map, &waypoints),
            confidence: EXPLORATION_CONFIDENCE,
            mode: PlanMode::Exploration,
            warning: Some(format!(
                "target lies in an unexplored void; routing to nearest landmark '{}'",
                target.label
            )),
        });
    }

    if source.id == target.id {
        return Ok(NavigationPlan {
            waypoints: vec![source.clone()],
            confidence: 1.0,
            mode: PlanMode::DesireLine,
            warning: None,
        });
    }

    if let Some((ids, confidence)) = dijkstra(map, source.id, target.id, deadline)? {
        return Ok(NavigationPlan {
            waypoints: materialize(map, &ids),
            confidence,
            mode: PlanMode::DesireLine,
            warning: None,
        });
    }

    let ids = astar(map, source.id, target.id, deadline)?;
    Ok(NavigationPlan {
        waypoints: materialize(map, &ids),
        confidence: EXPLORATION_CONFIDENCE,
        mode: PlanMode::Exploration,
        warning: Some(format!(
            "no desire line connects '{}' to '{}'; bushwhacking by terrain distance",
            source.label, target.label
        )),
    })
}

/// Label match first (case-insensitive, smallest id on duplicates), else
/// nearest landmark to the concept embedding.
fn resolve_target<'a>(map: &'a HoloMap, to: &Concept) -> &'a Attractor {
    if let Some(label) = &to.label
        && let Some(found) = map
            .landmarks
            .iter()
            .filter(|lm| lm.label.eq_ignore_ascii_case(label))
            .min_by_key(|lm| lm.id)
    {
        return found;
    }
    map.nearest_landmark(&to.embedding)
        .expect("resolve_target called on a map with landmarks")
        .0
}

fn materialize(map: &HoloMap, ids: &[Uuid]) -> Vec<Attractor> {
    ids.iter()
        .filter_map(|id| map.landmark(*id).cloned())
        .collect()
}

/// Min-heap entry ordered by cost, ties by id for determinism.
struct QueueEntry {
    cost: f64,
    id: Uuid,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra over positive-weight desire lines, edge cost `1 − weight`.
/// Returns the waypoint ids and the product of traversed edge weights,
/// or None when no directed path exists.
fn dijkstra(
    map: &HoloMap,
    source: Uuid,
    target: Uuid,
    deadline: &Deadline,
) -> Result<Option<(Vec<Uuid>, f64)>, DeadlineExpired> {
    let mut dist: HashMap<Uuid, f64> = HashMap::new();
    let mut prev: HashMap<Uuid, (Uuid, f64)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(source, 0.0);
    heap.push(QueueEntry {
        cost: 0.0,
        id: source,
    });

    while let Some(QueueEntry { cost, id }) = heap.pop() {
        deadline.check()?;
        if id == target {
            break;
        }
        if cost > dist.get(&id).copied().unwrap_or(f64::INFINITY) {
            continue;
        }
        for edge in map.outgoing(id) {
            let next = cost + (1.0 - edge.weight);
            if next < dist.get(&edge.target).copied().unwrap_or(f64::INFINITY) {
                dist.insert(edge.target, next);
                prev.insert(edge.target, (id, edge.weight));
                heap.push(QueueEntry {
                    cost: next,
                    id: edge.target,
                });
            }
        }
    }

    if !dist.contains_key(&target) {
        return Ok(None);
    }

    let mut ids = vec![target];
    let mut confidence = 1.0;
    let mut cursor = target;
    while let Some((parent, weight)) = prev.get(&cursor) {
        confidence *= weight;
        ids.push(*parent);
        cursor = *parent;
    }
    ids.reverse();
    Ok(Some((ids, confidence)))
}

/// A* over the complete landmark graph with cosine distance as both edge
/// cost and heuristic. Always reaches the target — every pair of
/// landmarks is connected here, history or not.
fn astar(
    map: &HoloMap,
    source: Uuid,
    target: Uuid,
    deadline: &Deadline,
) -> Result<Vec<Uuid>, DeadlineExpired> {
    fn centroid(map: &HoloMap, id: Uuid) -> &[f32] {
        &map.landmark(id).expect("known landmark").centroid
    }
    let h =
        |id: Uuid| -> f64 { f64::from(cosine_distance(centroid(map, id), centroid(map, target))) };

    let mut g: HashMap<Uuid, f64> = HashMap::new();
    let mut prev: HashMap<Uuid, Uuid> = HashMap::new();
    let mut open = BinaryHeap::new();

    g.insert(source, 0.0);
    open.push(QueueEntry {
        cost: h(source),
        id: source,
    });

    while let Some(QueueEntry { id, .. }) = open.pop() {
        deadline.check()?;
        if id == target {
            break;
        }
        let g_here = g.get(&id).copied().unwrap_or(f64::INFINITY);
        for lm in &map.landmarks {
            if lm.id == id {
                continue;
            }
            let tentative = g_here + f64::from(cosine_distance(centroid(map, id), &lm.centroid));
            if tentative < g.get(&lm.id).copied().unwrap_or(f64::INFINITY) {
                g.insert(lm.id, tentative);
                prev.insert(lm.id, id);
                open.push(QueueEntry {
                    cost: tentative + h(lm.id),
                    id: lm.id,
                });
            }
        }
    }

    let mut ids = vec![target];
    let mut cursor = target;
    while let Some(parent) = prev.get(&cursor) {
        ids.push(*parent);
        cursor = *parent;
    }
    ids.reverse();
    Ok(ids)
}
