//! Versioned JSON envelope for map snapshots.
//!
//! No persistence lives in this subsystem — maps are rebuild-on-read — but
//! snapshots cross process boundaries for debugging and interop, so the
//! export carries an explicit format version.

use serde::{Deserialize, Serialize};

use crate::map::HoloMap;

pub const CURRENT_VERSION: &str = "1";

#[derive(Serialize, Deserialize, Debug)]
pub struct WireMap {
    pub version: String,
    pub map: HoloMap,
}

/// Serialize a map snapshot to versioned JSON.
pub fn export_json(map: &HoloMap) -> Result<String, serde_json::Error> {
    let wire = WireMap {
        version: CURRENT_VERSION.to_string(),
        map: map.clone(),
    };
    serde_json::to_string_pretty(&wire)
}

/// Deserialize a versioned JSON export back into a map snapshot.
pub fn import_json(json: &str) -> Result<HoloMap, serde_json::Error> {
    let wire: WireMap = serde_json::from_str(json)?;
    Ok(wire.map)
}
