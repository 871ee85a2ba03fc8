// Copyright 2025 the quarry authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The cache and dispatch front-end of the loading subsystem.
//!
//! [`AssetManager`] is the single entry point: it maps normalized keys to
//! their loader/asset pair, deduplicates concurrent requests for the same
//! key, owns the work queue and worker pool, and keeps aggregate cache size
//! under a soft ceiling by evicting unreferenced completed entries on
//! insertion.
//!
//! Lock discipline: the cache map and the work queue have independent locks,
//! and no lock is ever held across a decode step, so a slow decode never
//! blocks unrelated cache lookups.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use quarry_core::{
    AssetKey, Decoder, DiagnosticsSink, LoadError, LoadEvent, ManagerConfig, NullSink,
};

use crate::asset::{Aspect, Asset};
use crate::loader::Loader;
use crate::pool::{WorkerPool, MAX_WORKERS};
use crate::queue::WorkQueue;

struct CacheEntry {
    loader: Arc<Loader>,
    asset: Arc<Asset>,
}

impl CacheEntry {
    /// Internal strong references: the cache entry holds one of each handle,
    /// and the loader itself holds one reference to its asset. Anything
    /// beyond that is an external holder, which vetoes eviction.
    fn is_evictable(&self) -> bool {
        self.loader.is_done()
            && Arc::strong_count(&self.loader) == 1
            && Arc::strong_count(&self.asset) == 2
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<AssetKey, CacheEntry>,
    // Insertion order, oldest first; drives eviction.
    order: VecDeque<AssetKey>,
    total_size: usize,
}

/// State shared between the manager front-end, the workers, and the loaders
/// (which hold it weakly, never owning).
pub(crate) struct ManagerShared {
    queue: Arc<WorkQueue>,
    cache: Mutex<CacheState>,
    base_path: RwLock<PathBuf>,
    max_cache_size: usize,
    to_load: AtomicUsize,
    // Live worker count, mirrored out of the pool so dispatch-mode checks
    // never contend with a resize that is joining a mid-decode worker.
    n_workers: AtomicUsize,
    diag: Box<dyn DiagnosticsSink>,
}

impl ManagerShared {
    fn resolve(&self, key: &AssetKey) -> PathBuf {
        self.base_path.read().unwrap().join(key.as_str())
    }

    fn report(&self, event: LoadEvent) {
        self.diag.report(&event);
    }

    pub(crate) fn loader_started(&self, key: &AssetKey) {
        self.report(LoadEvent::Started { key: key.clone() });
    }

    pub(crate) fn loader_loaded(&self, key: &AssetKey, size: usize, reporting: &Arc<Loader>) {
        {
            let mut cache = self.cache.lock().unwrap();
            // The entry may have been cleared (and the key even re-requested)
            // while the load was in flight; only the resident loader's size
            // counts, a stale one's counts for nobody.
            let resident = cache
                .entries
                .get(key)
                .is_some_and(|entry| Arc::ptr_eq(&entry.loader, reporting));
            if resident {
                cache.total_size += size;
            }
        }
        self.to_load.fetch_sub(1, Ordering::SeqCst);
        self.report(LoadEvent::Loaded {
            key: key.clone(),
            size,
        });
    }

    pub(crate) fn loader_failed(&self, key: &AssetKey, err: &LoadError) {
        self.to_load.fetch_sub(1, Ordering::SeqCst);
        self.report(LoadEvent::Failed {
            key: key.clone(),
            reason: err.to_string(),
        });
    }

    /// Evicts oldest-inserted unreferenced completed entries until the total
    /// is back under the ceiling or nothing more can go. Returns the events
    /// to report once the cache lock is released.
    fn enforce_ceiling(&self, cache: &mut CacheState) -> Vec<LoadEvent> {
        let mut evicted = Vec::new();
        let mut index = 0;
        while cache.total_size > self.max_cache_size && index < cache.order.len() {
            let key = cache.order[index].clone();
            let evictable = cache
                .entries
                .get(&key)
                .is_some_and(CacheEntry::is_evictable);
            if !evictable {
                index += 1;
                continue;
            }
            if let Some(entry) = cache.entries.remove(&key) {
                let size = entry.loader.size();
                cache.total_size -= size;
                evicted.push(LoadEvent::Evicted { key, size });
            }
            cache.order.remove(index);
        }
        evicted
    }
}

/// The process-wide asset loading and caching service.
///
/// See the [crate docs](crate) for the overall contract. All methods are
/// callable from any thread; observability queries are consistent with the
/// cache and queue contents at the instant of the call, with no stronger
/// promise under concurrent mutation.
pub struct AssetManager {
    pool: Mutex<WorkerPool>,
    shared: Arc<ManagerShared>,
}

impl AssetManager {
    /// Creates a manager with the default no-op diagnostics sink.
    pub fn new(config: ManagerConfig) -> Self {
        Self::with_diagnostics(config, Box::new(NullSink))
    }

    /// Creates a manager reporting every pipeline transition to `diag`.
    pub fn with_diagnostics(config: ManagerConfig, diag: Box<dyn DiagnosticsSink>) -> Self {
        let queue = Arc::new(WorkQueue::new());
        let shared = Arc::new(ManagerShared {
            queue: Arc::clone(&queue),
            cache: Mutex::new(CacheState::default()),
            base_path: RwLock::new(config.base_path),
            max_cache_size: config.max_cache_size,
            to_load: AtomicUsize::new(0),
            n_workers: AtomicUsize::new(0),
            diag,
        });
        let mut pool = WorkerPool::new(queue);
        pool.resize(config.n_thread);
        shared.n_workers.store(pool.len(), Ordering::SeqCst);
        Self {
            pool: Mutex::new(pool),
            shared,
        }
    }

    /// Requests the resource at `path` to be loaded with `decoder`.
    ///
    /// On cache hit the existing handles are returned unchanged: a second
    /// request for the same (normalized) key never creates a second loader,
    /// whatever its state. On miss a new loader is registered and enqueued,
    /// or executed inline on this thread when the pool is empty. Never
    /// blocks waiting for completion.
    pub fn load(&self, path: &str, decoder: Arc<dyn Decoder>) -> (Arc<Loader>, Arc<Asset>) {
        let key = AssetKey::new(path);
        let shared = &self.shared;

        let (loader, evicted) = {
            let mut cache = shared.cache.lock().unwrap();
            if let Some(entry) = cache.entries.get(&key) {
                log::debug!("serving {key} from cache");
                return (Arc::clone(&entry.loader), Arc::clone(&entry.asset));
            }

            log::debug!("requesting load of {key}");
            let asset = Asset::new(key.clone());
            let aspect = Aspect::new(&asset);
            let loader = Loader::new(
                key.clone(),
                shared.resolve(&key),
                Arc::clone(&asset),
                aspect,
                decoder,
                Arc::downgrade(shared),
            );
            cache.entries.insert(
                key.clone(),
                CacheEntry {
                    loader: Arc::clone(&loader),
                    asset,
                },
            );
            cache.order.push_back(key.clone());
            let evicted = shared.enforce_ceiling(&mut cache);
            (loader, evicted)
        };

        for event in evicted {
            shared.report(event);
        }
        shared.to_load.fetch_add(1, Ordering::SeqCst);
        shared.report(LoadEvent::Enqueued { key });

        let asset = Arc::clone(loader.asset());
        if self.n_thread() == 0 {
            // Synchronous mode: same terminal-state and publication contract
            // as the threaded path, on the caller's own thread.
            loader.execute();
        } else {
            shared.queue.push(Arc::clone(&loader));
        }
        (loader, asset)
    }

    /// Typed access to the current payload of a cached asset, if any load
    /// for `path` has succeeded.
    pub fn get<T: Send + Sync + 'static>(&self, path: &str) -> Option<Arc<T>> {
        let key = AssetKey::new(path);
        let cache = self.shared.cache.lock().unwrap();
        cache.entries.get(&key)?.asset.get::<T>()
    }

    /// Drops the manager's own references to every cache entry.
    ///
    /// Entries still held externally survive until their last holder
    /// releases them; unreferenced entries are destroyed immediately.
    pub fn clear_cache(&self) {
        let dropped = {
            let mut cache = self.shared.cache.lock().unwrap();
            let dropped = cache.entries.len();
            cache.entries.clear();
            cache.order.clear();
            cache.total_size = 0;
            dropped
        };
        log::info!("asset cache cleared ({dropped} entries)");
        self.shared.report(LoadEvent::CacheCleared { dropped });
    }

    /// Resizes the worker pool at run time, clamped to [`MAX_WORKERS`].
    /// Shrinking joins the excess workers before returning; with 0, all
    /// future loads execute synchronously in the caller's thread.
    pub fn set_n_thread(&self, count: usize) {
        let count = count.min(MAX_WORKERS);
        log::info!("resizing asset worker pool to {count}");
        let mut pool = self.pool.lock().unwrap();
        pool.resize(count);
        self.shared.n_workers.store(pool.len(), Ordering::SeqCst);
    }

    /// Current worker count.
    pub fn n_thread(&self) -> usize {
        self.shared.n_workers.load(Ordering::SeqCst)
    }

    /// Aggregate byte size of completed payloads currently tracked by the
    /// cache.
    pub fn cache_size(&self) -> usize {
        self.shared.cache.lock().unwrap().total_size
    }

    /// Number of requested loads that have not yet reached a terminal
    /// state.
    pub fn n_to_load(&self) -> usize {
        self.shared.to_load.load(Ordering::SeqCst)
    }

    /// Root used to resolve logical keys to filesystem locations.
    pub fn base_path(&self) -> PathBuf {
        self.shared.base_path.read().unwrap().clone()
    }

    /// Changes the resolution root for subsequent loads. Already-registered
    /// loaders keep the location they resolved at request time.
    pub fn set_base_path(&self, path: impl AsRef<Path>) {
        *self.shared.base_path.write().unwrap() = path.as_ref().to_path_buf();
    }
}
