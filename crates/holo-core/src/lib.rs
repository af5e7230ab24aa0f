//! Holographic cartography engine.
//!
//! Turns an unbounded semantic memory into a bounded, navigable topology:
//! density-clustered landmarks, trace-replayed desire lines, sparse void
//! regions, and a resolution horizon — then renders a budget-constrained,
//! foveated context payload around a point of interest.
//!
//! Zero I/O — pure math engine with no opinions about transport. The
//! terrain index and trace log live behind async interfaces in the atlas
//! crate; everything here is deterministic, synchronous computation.

pub mod cluster;
pub mod constants;
pub mod deadline;
pub mod desire;
pub mod foveate;
pub mod horizon;
pub mod landmark;
pub mod map;
pub mod path;
pub mod region;
pub mod serde_compat;
pub mod vector;

pub use cluster::{ClusterOutcome, ClusterParams, cluster};
pub use constants::{
    DEFAULT_TRACE_WINDOW, EPSILON, EXPLORATION_CONFIDENCE, FOCAL_RESOLUTION, MEMBERSHIP_THRESHOLD,
    TERRAIN_RESULT_LIMIT,
};
pub use deadline::{Deadline, DeadlineExpired};
pub use desire::{TraceStep, WeightedEdge, build_desire_lines};
pub use foveate::{
    Budget, CharCost, CostModel, FocalItem, OptimalContext, PeripheralItem, RenderedMember, foveate,
};
pub use horizon::Horizon;
pub use landmark::{Attractor, Extraction, extract};
pub use map::HoloMap;
pub use path::{Concept, NavigationPlan, PlanMode, find_path};
pub use region::{Region, VoidParams, group_voids};
pub use serde_compat::{CURRENT_VERSION, export_json, import_json};
pub use vector::{ContextVector, cosine_distance, cosine_similarity, mean};
