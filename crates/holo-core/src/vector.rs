use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An embedding plus a reference to the memory item it came from.
/// Produced by the terrain index; never mutated after construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContextVector {
    pub id: Uuid,
    pub embedding: Vec<f32>,
    /// Metadata tags feeding landmark label derivation.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Item content, rendered at full detail inside the focal zone.
    #[serde(default)]
    pub content: String,
}

impl ContextVector {
    pub fn new(embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            embedding,
            tags: Vec::new(),
            content: String::new(),
        }
    }

    pub fn with_content(embedding: Vec<f32>, content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            embedding,
            tags: Vec::new(),
            content: content.to_string(),
        }
    }
}

/// Cosine similarity in [-1, 1]. Zero-norm inputs yield 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut na = 0.0f64;
    let mut nb = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        na += f64::from(*x) * f64::from(*x);
        nb += f64::from(*y) * f64::from(*y);
    }
    let denom = na.sqrt() * nb.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    ((dot / denom).clamp(-1.0, 1.0)) as f32
}

/// Cosine distance in [0, 2]: 0 = identical direction, 2 = opposite.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

/// Component-wise mean of a non-empty set of equal-dimension vectors.
/// Returns an empty vector for empty input.
pub fn mean(vectors: &[&[f32]]) -> Vec<f32> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };
    let dim = first.len();
    let mut acc = vec![0.0f64; dim];
    for v in vectors {
        for (slot, x) in acc.iter_mut().zip(v.iter()) {
            *slot += f64::from(*x);
        }
    }
    let n = vectors.len() as f64;
    acc.into_iter().map(|x| (x / n) as f32).collect()
}
