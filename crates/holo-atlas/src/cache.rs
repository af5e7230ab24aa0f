//! TTL cache for built maps.
//!
//! Keyed by `(origin bucket, resolution bucket)`: the origin embedding is
//! quantized to 0.1 per component and hashed, so nearby requests share an
//! entry. Entries expire by TTL only — the terrain index and trace log are
//! append-only from this subsystem's point of view, so there is nothing to
//! write through. Concurrent fills may race; the build is pure and
//! idempotent, so last-write-wins is safe and no lock is held across a
//! build.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use holo_core::HoloMap;

type CacheKey = (u64, i32);

pub struct MapCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, (Instant, Arc<HoloMap>)>>,
}

impl MapCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, origin_embedding: &[f32], resolution_hint: f32) -> Option<Arc<HoloMap>> {
        let key = Self::key(origin_embedding, resolution_hint);
        let entries = self.entries.lock().expect("cache lock");
        match entries.get(&key) {
            Some((stamped, map)) if stamped.elapsed() < self.ttl => {
                tracing::debug!(bucket = key.0, "map cache hit");
                Some(Arc::clone(map))
            }
            _ => None,
        }
    }

    pub fn put(&self, origin_embedding: &[f32], resolution_hint: f32, map: Arc<HoloMap>) {
        let key = Self::key(origin_embedding, resolution_hint);
        let mut entries = self.entries.lock().expect("cache lock");
        entries.retain(|_, (stamped, _)| stamped.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), map));
    }

    fn key(embedding: &[f32], resolution_hint: f32) -> CacheKey {
        let mut hasher = DefaultHasher::new();
        for x in embedding {
            // Quantize to 0.1 so nearby origins land in one bucket.
            ((x * 10.0).round() as i32).hash(&mut hasher);
        }
        (hasher.finish(), (resolution_hint * 10.0).round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holo_core::{ContextVector, Horizon};
    use std::collections::BTreeMap;

    fn make_map(origin: Vec<f32>) -> Arc<HoloMap> {
        Arc::new(HoloMap {
            origin: ContextVector::new(origin.clone()),
            landmarks: Vec::new(),
            edges: Vec::new(),
            voids: Vec::new(),
            horizon: Horizon::for_hint(origin, 1.0),
            items: BTreeMap::new(),
        })
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = MapCache::new(Duration::from_secs(60));
        let map = make_map(vec![1.0, 0.0]);
        cache.put(&[1.0, 0.0], 1.0, Arc::clone(&map));

        let hit = cache.get(&[1.0, 0.0], 1.0).expect("cache hit");
        assert_eq!(hit.origin.id, map.origin.id);
    }

    #[test]
    fn test_nearby_origins_share_bucket() {
        let cache = MapCache::new(Duration::from_secs(60));
        cache.put(&[1.0, 0.0], 1.0, make_map(vec![1.0, 0.0]));

        // 0.02 away: same 0.1 bucket.
        assert!(cache.get(&[1.02, 0.0], 1.0).is_some());
        // 0.3 away: different bucket.
        assert!(cache.get(&[1.3, 0.0], 1.0).is_none());
    }

    #[test]
    fn test_resolution_hint_partitions() {
        let cache = MapCache::new(Duration::from_secs(60));
        cache.put(&[1.0, 0.0], 1.0, make_map(vec![1.0, 0.0]));

        assert!(cache.get(&[1.0, 0.0], 2.0).is_none());
    }

    #[test]
    fn test_expiry() {
        let cache = MapCache::new(Duration::from_millis(0));
        cache.put(&[1.0, 0.0], 1.0, make_map(vec![1.0, 0.0]));
        assert!(cache.get(&[1.0, 0.0], 1.0).is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = MapCache::new(Duration::from_secs(60));
        let first = make_map(vec![1.0, 0.0]);
        let second = make_map(vec![1.0, 0.0]);
        cache.put(&[1.0, 0.0], 1.0, first);
        cache.put(&[1.0, 0.0], 1.0, Arc::clone(&second));

        let hit = cache.get(&[1.0, 0.0], 1.0).unwrap();
        assert_eq!(hit.origin.id, second.origin.id);
    }
}
