//! Foveated rendering: full detail near the origin, labels at the
//! periphery, nothing beyond the horizon — under a hard token budget.
//!
//! Admission is greedy, distance-first, and non-preemptive: candidates are
//! pre-sorted by distance and an admitted landmark is never evicted for a
//! later one. A best-global-fit bin-packing admission was rejected for
//! predictability and O(n log n) cost.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::FOCAL_RESOLUTION;
use crate::map::HoloMap;
use crate::path::NavigationPlan;

/// Per-entry framing overhead in tokens (headers, separators).
const ENTRY_OVERHEAD_TOKENS: usize = 8;

/// Caller-supplied token allowance. Never mutated here — the caller
/// decrements `remaining` by the returned `tokens_used` after the call.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Budget {
    pub remaining: usize,
}

impl Budget {
    pub fn new(remaining: usize) -> Self {
        Self { remaining }
    }
}

/// Pluggable token-cost estimation for rendered text.
pub trait CostModel {
    fn text_tokens(&self, text: &str) -> usize;

    fn entry_overhead(&self) -> usize {
        ENTRY_OVERHEAD_TOKENS
    }
}

/// Default estimate: one token per four characters, rounded up.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharCost;

impl CostModel for CharCost {
    fn text_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}

/// A member item rendered at full detail.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderedMember {
    pub item_id: Uuid,
    pub content: String,
}

/// A landmark inside the focal zone: full member detail.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FocalItem {
    pub landmark_id: Uuid,
    pub label: String,
    pub distance: f32,
    pub resolution: f32,
    pub members: Vec<RenderedMember>,
    pub tokens: usize,
}

/// A landmark in the peripheral zone: label and one-line summary only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeripheralItem {
    pub landmark_id: Uuid,
    pub label: String,
    pub summary: String,
    pub distance: f32,
    pub resolution: f32,
    pub tokens: usize,
}

/// The budget-constrained context payload for one agent turn.
/// `tokens_used <= budget.remaining` holds on every instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimalContext {
    pub position_marker: String,
    pub focal: Vec<FocalItem>,
    pub peripheral: Vec<PeripheralItem>,
    pub plan: Option<NavigationPlan>,
    pub tokens_used: usize,
    pub tokens_remaining: usize,
}

/// Render candidate landmarks around the map origin under the budget.
///
/// Candidates are sorted by centroid distance from the origin, classified
/// by the horizon's resolution at that distance, and admitted greedily
/// until the next entry would exceed the budget. A zero budget (or a map
/// where nothing fits) yields a valid position-marker-only context.
pub fn foveate(
    map: &HoloMap,
    candidates: &[Uuid],
    plan: Option<NavigationPlan>,
    budget: &Budget,
    cost: &dyn CostModel,
) -> OptimalContext {
    let mut ranked: Vec<(&crate::landmark::Attractor, f32)> = candidates
        .iter()
        .filter_map(|id| map.landmark(*id))
        .map(|lm| (lm, lm.distance_to(&map.origin.embedding)))
        .collect();
    ranked.sort_by(|(a, da), (b, db)| da.total_cmp(db).then(a.id.cmp(&b.id)));

    let mut focal = Vec::new();
    let mut peripheral = Vec::new();
    let mut tokens_used = 0usize;

    for (lm, distance) in ranked {
        let resolution = map.horizon.resolution_at(distance);
        if resolution == 0.0 {
            // Beyond the horizon; everything after this is too.
            break;
        }

        if resolution > FOCAL_RESOLUTION {
            let members: Vec<RenderedMember> = lm
                .members
                .iter()
                .filter_map(|id| map.items.get(id))
                .map(|item| RenderedMember {
                    item_id: item.id,
                    content: item.content.clone(),
                })
                .collect();
            let tokens = cost.entry_overhead()
                + cost.text_tokens(&lm.label)
                + members
                    .iter()
                    .map(|m| cost.text_tokens(&m.content))
                    .sum::<usize>();
            if tokens_used + tokens > budget.remaining {
                break;
            }
            tokens_used += tokens;
            focal.push(FocalItem {
                landmark_id: lm.id,
                label: lm.label.clone(),
                distance,
                resolution,
                members,
                tokens,
            });
        } else {
            let summary = format!(
                "{} — {} items, density {:.1}",
                lm.label,
                lm.members.len(),
                lm.density
            );
            let tokens =
                cost.entry_overhead() + cost.text_tokens(&lm.label) + cost.text_tokens(&summary);
            if tokens_used + tokens > budget.remaining {
                break;
            }
            tokens_used += tokens;
            peripheral.push(PeripheralItem {
                landmark_id: lm.id,
                label: lm.label.clone(),
                summary,
                distance,
                resolution,
                tokens,
            });
        }
    }

    OptimalContext {
        position_marker: format!(
            "@{} | {} landmarks, {} voids charted",
            map.origin.id,
            map.landmarks.len(),
            map.voids.len()
        ),
        focal,
        peripheral,
        plan,
        tokens_used,
        tokens_remaining: budget.remaining - tokens_used,
    }
}
