/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-9;

/// DBSCAN neighborhood radius (cosine distance) for landmark extraction
pub const DEFAULT_CLUSTER_EPS: f32 = 0.25;

/// DBSCAN minimum points for a core point
pub const DEFAULT_MIN_CLUSTER_POINTS: usize = 3;

/// Maximum terrain items pulled per extraction query
pub const TERRAIN_RESULT_LIMIT: usize = 500;

/// Trace entries farther than this (cosine distance) from every landmark
/// centroid are unassigned during desire-line replay
pub const MEMBERSHIP_THRESHOLD: f32 = 0.35;

/// Trace window replayed per desire-line build
pub const DEFAULT_TRACE_WINDOW: usize = 1000;

/// Maximum contributing trace ids kept per desire line
pub const PROVENANCE_SAMPLE: usize = 5;

/// Leader-grouping radius for void candidate regions
pub const VOID_GROUPING_RADIUS: f32 = 0.3;

/// A noise group is a void when it holds fewer than this many points per
/// grouping-ball volume
pub const SPARSITY_THRESHOLD: f64 = 3.0;

/// Horizon inner radius at resolution hint 1.0
pub const BASE_INNER_RADIUS: f32 = 0.2;

/// Outer radius = inner radius * this factor
pub const HORIZON_EXPANSION: f32 = 3.0;

/// Lower clamp on the caller-supplied resolution hint
pub const MIN_RESOLUTION_HINT: f32 = 0.25;

/// Upper clamp on the caller-supplied resolution hint
pub const MAX_RESOLUTION_HINT: f32 = 4.0;

/// Landmarks above this resolution render at full member detail
pub const FOCAL_RESOLUTION: f32 = 0.7;

/// Confidence assigned to routes with no historical precedent
pub const EXPLORATION_CONFIDENCE: f64 = 0.3;
