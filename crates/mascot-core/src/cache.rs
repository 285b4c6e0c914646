use std::collections::HashMap;
use std::sync::Arc;

use mascot_types::{AssetId, DecodedAsset};

use crate::error::{CacheError, DecodeError};

/// Decode attempts per asset before a load is abandoned.
pub const MAX_DECODE_ATTEMPTS: u32 = 3;

/// Subsample factor used on each attempt; later attempts decode smaller.
const SUBSAMPLE_LADDER: [u32; MAX_DECODE_ATTEMPTS as usize] = [1, 2, 4];

/// Holds decoded assets keyed by id, at most one entry per id.
///
/// One cache belongs to one presentation session and holds the assets of a
/// single theme at a time. Entries are handed out as `Arc`s so a lookup is
/// cheap and always yields the cached instance.
#[derive(Debug, Default)]
pub struct ResourceCache {
    entries: HashMap<AssetId, Arc<DecodedAsset>>,
    resident_bytes: usize,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an asset, returning the cached entry if already present.
    ///
    /// `decode` receives the id and a subsample factor. Out-of-memory failures
    /// are retried with a larger factor up to [`MAX_DECODE_ATTEMPTS`] times;
    /// any other failure ends the load immediately.
    pub fn load<F>(&mut self, id: &AssetId, mut decode: F) -> Result<Arc<DecodedAsset>, CacheError>
    where
        F: FnMut(&AssetId, u32) -> Result<DecodedAsset, DecodeError>,
    {
        if let Some(asset) = self.entries.get(id) {
            return Ok(Arc::clone(asset));
        }

        let mut attempts = 0;
        let decoded = loop {
            let subsample = SUBSAMPLE_LADDER[attempts as usize];
            attempts += 1;
            match decode(id, subsample) {
                Ok(asset) => break asset,
                Err(e) if e.is_retryable() && attempts < MAX_DECODE_ATTEMPTS => {
                    log::warn!("{e}; retrying {id} (attempt {})", attempts + 1);
                }
                Err(source) => {
                    return Err(CacheError::DecodeFailure {
                        id: id.clone(),
                        attempts,
                        source,
                    });
                }
            }
        };

        let asset = Arc::new(decoded);
        self.resident_bytes += asset.byte_len();
        self.entries.insert(id.clone(), Arc::clone(&asset));
        log::debug!(
            "Cached {id} ({} bytes, {} resident)",
            asset.byte_len(),
            self.resident_bytes
        );
        Ok(asset)
    }

    /// Load every id in the given order.
    ///
    /// `on_each(id, completed, total)` runs after each successful load. The
    /// first failure stops the pass; entries loaded before it stay cached.
    /// Returns the number of ids processed.
    pub fn load_all<'a, I, F, P>(
        &mut self,
        ids: I,
        mut decode: F,
        mut on_each: P,
    ) -> Result<usize, CacheError>
    where
        I: IntoIterator<Item = &'a AssetId>,
        I::IntoIter: ExactSizeIterator,
        F: FnMut(&AssetId, u32) -> Result<DecodedAsset, DecodeError>,
        P: FnMut(&AssetId, usize, usize),
    {
        let ids = ids.into_iter();
        let total = ids.len();
        let mut completed = 0;
        for id in ids {
            self.load(id, &mut decode)?;
            completed += 1;
            on_each(id, completed, total);
        }
        Ok(completed)
    }

    /// Non-loading lookup.
    pub fn get(&self, id: &str) -> Option<Arc<DecodedAsset>> {
        self.entries.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Drop a single entry. Returns whether it was present.
    pub fn evict(&mut self, id: &str) -> bool {
        match self.entries.remove(id) {
            Some(asset) => {
                self.release(id, asset);
                true
            }
            None => false,
        }
    }

    /// Release every entry and clear the index. Returns the number evicted.
    pub fn evict_all(&mut self) -> usize {
        let count = self.entries.len();
        let freed = self.resident_bytes;
        for (id, asset) in self.entries.drain() {
            Self::release_entry(id.as_str(), asset);
        }
        self.resident_bytes = 0;
        if count > 0 {
            log::info!("Evicted {count} cached assets ({freed} bytes)");
        }
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total size of all cached buffers.
    pub fn resident_bytes(&self) -> usize {
        self.resident_bytes
    }

    pub fn ids(&self) -> impl Iterator<Item = &AssetId> {
        self.entries.keys()
    }

    fn release(&mut self, id: &str, asset: Arc<DecodedAsset>) {
        self.resident_bytes -= asset.byte_len();
        Self::release_entry(id, asset);
    }

    // The buffer is freed here unless a consumer still holds a handle, in
    // which case it goes when that handle is dropped.
    fn release_entry(id: &str, asset: Arc<DecodedAsset>) {
        if Arc::strong_count(&asset) > 1 {
            log::debug!("Evicted {id} while still referenced elsewhere");
        }
        drop(asset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{oom, pixels};

    #[test]
    fn load_then_get_returns_same_instance() {
        let mut cache = ResourceCache::new();
        let id = AssetId::from("idle");
        let loaded = cache.load(&id, |_, s| Ok(pixels(4, s))).unwrap();
        let fetched = cache.get("idle").unwrap();
        assert!(Arc::ptr_eq(&loaded, &fetched));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.resident_bytes(), 64);
    }

    #[test]
    fn second_load_is_a_no_op() {
        let mut cache = ResourceCache::new();
        let id = AssetId::from("idle");
        let mut calls = 0;
        let first = cache
            .load(&id, |_, s| {
                calls += 1;
                Ok(pixels(2, s))
            })
            .unwrap();
        let second = cache
            .load(&id, |_, _| panic!("decoder must not run for a cached id"))
            .unwrap();
        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn retries_out_of_memory_with_larger_subsample() {
        let mut cache = ResourceCache::new();
        let id = AssetId::from("big");
        let mut seen = Vec::new();
        let asset = cache
            .load(&id, |_, subsample| {
                seen.push(subsample);
                if seen.len() < 3 {
                    Err(oom(subsample))
                } else {
                    Ok(pixels(8, subsample))
                }
            })
            .unwrap();
        assert_eq!(seen, vec![1, 2, 4]);
        assert_eq!(
            asset.kind(),
            mascot_types::DecodedKind::Image {
                width: 2,
                height: 2,
                subsample: 4
            }
        );
    }

    #[test]
    fn gives_up_after_three_attempts() {
        let mut cache = ResourceCache::new();
        let id = AssetId::from("big");
        let mut attempts = 0;
        let err = cache
            .load(&id, |_, s| {
                attempts += 1;
                Err(oom(s))
            })
            .unwrap_err();
        assert_eq!(attempts, 3);
        assert!(matches!(err, CacheError::DecodeFailure { attempts: 3, .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn corrupt_asset_is_not_retried() {
        let mut cache = ResourceCache::new();
        let id = AssetId::from("broken");
        let mut attempts = 0;
        let err = cache
            .load(&id, |_, _| {
                attempts += 1;
                Err(DecodeError::Corrupt {
                    source_ref: "broken.png".to_string(),
                    reason: "truncated".to_string(),
                })
            })
            .unwrap_err();
        assert_eq!(attempts, 1);
        assert!(matches!(err, CacheError::DecodeFailure { attempts: 1, .. }));
    }

    #[test]
    fn load_all_reports_progress_in_input_order() {
        let mut cache = ResourceCache::new();
        let ids: Vec<AssetId> = ["c", "a", "b"].into_iter().map(AssetId::from).collect();
        let mut progress = Vec::new();
        let done = cache
            .load_all(
                &ids,
                |_, s| Ok(pixels(1, s)),
                |id, n, total| progress.push((id.to_string(), n, total)),
            )
            .unwrap();
        assert_eq!(done, 3);
        assert_eq!(
            progress,
            vec![
                ("c".to_string(), 1, 3),
                ("a".to_string(), 2, 3),
                ("b".to_string(), 3, 3)
            ]
        );
    }

    #[test]
    fn load_all_keeps_entries_loaded_before_failure() {
        let mut cache = ResourceCache::new();
        let ids: Vec<AssetId> = ["a", "b", "c"].into_iter().map(AssetId::from).collect();
        let err = cache
            .load_all(
                &ids,
                |id, s| {
                    if id.as_str() == "b" {
                        Err(oom(s))
                    } else {
                        Ok(pixels(1, s))
                    }
                },
                |_, _, _| {},
            )
            .unwrap_err();
        assert!(matches!(err, CacheError::DecodeFailure { ref id, .. } if id.as_str() == "b"));
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(!cache.contains("c"));
    }

    #[test]
    fn evict_all_clears_and_is_idempotent() {
        let mut cache = ResourceCache::new();
        let ids: Vec<AssetId> = ["a", "b"].into_iter().map(AssetId::from).collect();
        cache
            .load_all(&ids, |_, s| Ok(pixels(2, s)), |_, _, _| {})
            .unwrap();
        assert_eq!(cache.evict_all(), 2);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.resident_bytes(), 0);
        assert_eq!(cache.evict_all(), 0);
    }

    #[test]
    fn evict_single_entry_updates_accounting() {
        let mut cache = ResourceCache::new();
        cache.load(&AssetId::from("a"), |_, s| Ok(pixels(2, s))).unwrap();
        cache.load(&AssetId::from("b"), |_, s| Ok(pixels(4, s))).unwrap();
        assert!(cache.evict("b"));
        assert!(!cache.evict("b"));
        assert_eq!(cache.resident_bytes(), 16);
    }

    #[test]
    fn evict_all_leaves_outstanding_handles_valid() {
        let mut cache = ResourceCache::new();
        let held = cache
            .load(&AssetId::from("a"), |_, s| Ok(pixels(2, s)))
            .unwrap();
        assert_eq!(cache.evict_all(), 1);
        assert!(cache.is_empty());
        assert!(!cache.contains("a"));
        assert_eq!(held.byte_len(), 16);
    }
}
