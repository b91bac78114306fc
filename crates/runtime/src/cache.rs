//! Response cache with single-flight computation per request fingerprint.

use crate::{GenerationResult, Mode};
use dashmap::DashMap;
use mini_moka::sync::Cache;
use recipe::GenerationRequest;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

/// Normalised cache key for a request in a given mode.
///
/// Ingredient order and letter case do not matter.
pub fn fingerprint(request: &GenerationRequest, mode: Mode) -> String {
    let mut ingredients: Vec<String> = request
        .ingredients()
        .iter()
        .map(|i| i.to_lowercase())
        .collect();
    ingredients.sort();

    let mut hasher = Sha256::new();
    for ingredient in &ingredients {
        hasher.update(ingredient.as_bytes());
        hasher.update([0x1f]);
    }
    hasher.update([0x1e]);
    if let Some(dietary) = request.dietary_restrictions() {
        hasher.update(dietary.to_lowercase().as_bytes());
    }
    hasher.update([0x1e]);
    hasher.update(mode.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}

type Slot = Arc<OnceCell<GenerationResult>>;

/// Fingerprint → result, with one computation in flight per fingerprint.
///
/// Finished `success` results live in a bounded TTL cache. Concurrent callers
/// with the same fingerprint share one computation through an in-flight slot;
/// a degraded result is handed to everyone waiting on it and not kept.
pub struct ResponseCache {
    done: Cache<String, GenerationResult>,
    in_flight: DashMap<String, Slot>,
}

impl ResponseCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            done: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            in_flight: DashMap::new(),
        }
    }

    /// Whether a fresh result is cached for `key`.
    pub fn contains(&self, key: &String) -> bool {
        self.done.contains_key(key)
    }

    /// Computations currently running or abandoned mid-flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Return the cached result for `key`, or run `compute` exactly once
    /// among concurrent callers.
    ///
    /// `cancel` is the caller's own token. A result computed after it fired is
    /// returned to that caller only; anyone waiting on the same key runs its
    /// own `compute` instead. The same happens when the computing caller is
    /// dropped mid-flight.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: String,
        cancel: &CancellationToken,
        compute: F,
    ) -> GenerationResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GenerationResult>,
    {
        if let Some(hit) = self.done.get(&key) {
            tracing::debug!(%key, "cache hit");
            return hit;
        }

        let slot = Arc::clone(
            self.in_flight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        );
        let _release = Release {
            in_flight: &self.in_flight,
            key: &key,
            slot: &slot,
        };

        // A leader may have finished between the first lookup and taking the
        // slot.
        if let Some(hit) = self.done.get(&key) {
            return hit;
        }

        let shared = slot
            .get_or_try_init(|| async {
                tracing::debug!(%key, "cache miss");
                let result = compute().await;
                if cancel.is_cancelled() {
                    Err(result)
                } else {
                    Ok(result)
                }
            })
            .await;

        match shared {
            Ok(result) => {
                if !result.is_degraded() {
                    self.done.insert(key.clone(), result.clone());
                }
                result.clone()
            }
            Err(own) => {
                tracing::debug!(%key, "cancelled result not shared");
                own
            }
        }
    }
}

/// Drops the in-flight slot once it is finished, or once nobody else is
/// waiting on an unfinished one.
struct Release<'a> {
    in_flight: &'a DashMap<String, Slot>,
    key: &'a String,
    slot: &'a Slot,
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        // The map and this caller hold two references; more means waiters.
        self.in_flight.remove_if(self.key, |_, current| {
            Arc::ptr_eq(current, self.slot)
                && (current.initialized() || Arc::strong_count(current) <= 2)
        });
    }
}
