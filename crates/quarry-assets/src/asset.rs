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

//! Shared result handles: the settle-once [`Aspect`] cell and the stable
//! per-key [`Asset`] identity.
//!
//! Both are shared by plain `Arc` reference counting: cloning a handle is
//! cheap, and dropping the last one deterministically makes the cache entry
//! eligible for eviction. Back-references are `Weak` so the cache and the
//! objects it creates never form a cycle.

use std::sync::{Arc, OnceLock, RwLock, Weak};

use quarry_core::{AssetKey, Payload};

/// A lazily-settled holder for the typed result of one load.
///
/// Settling is single-writer: exactly one loader writes the payload, exactly
/// once. Readers observe either "not yet settled" or the final immutable
/// payload, never an intermediate state. An aspect outlives the load request
/// that produced it for as long as any holder keeps it alive.
pub struct Aspect {
    owner: Weak<Asset>,
    cell: OnceLock<Payload>,
}

impl Aspect {
    pub(crate) fn new(owner: &Arc<Asset>) -> Arc<Self> {
        Arc::new(Self {
            owner: Arc::downgrade(owner),
            cell: OnceLock::new(),
        })
    }

    /// Whether the payload has been published yet.
    pub fn is_settled(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Byte size of the settled payload, 0 while unsettled.
    pub fn size(&self) -> usize {
        self.cell.get().map_or(0, Payload::size)
    }

    /// Typed access to the settled payload.
    ///
    /// Returns `None` while unsettled or when `T` is not the decoded type.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.cell.get()?.get::<T>()
    }

    /// The asset this aspect belongs to, if it is still alive.
    pub fn asset(&self) -> Option<Arc<Asset>> {
        self.owner.upgrade()
    }

    /// Publishes the payload. Returns `false` if already settled.
    pub(crate) fn settle(&self, payload: Payload) -> bool {
        self.cell.set(payload).is_ok()
    }
}

impl std::fmt::Debug for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aspect")
            .field("settled", &self.is_settled())
            .field("size", &self.size())
            .finish()
    }
}

/// The stable, shared identity for a logical resource.
///
/// Obtained once per key from the manager and shared thereafter; calling
/// code never constructs an `Asset` for a key that already exists in the
/// cache. Holds zero-or-one *current* aspect: the latest successfully
/// produced result, absent until the first load completes.
#[derive(Debug)]
pub struct Asset {
    key: AssetKey,
    aspect: RwLock<Option<Arc<Aspect>>>,
}

impl Asset {
    pub(crate) fn new(key: AssetKey) -> Arc<Self> {
        Arc::new(Self {
            key,
            aspect: RwLock::new(None),
        })
    }

    /// The normalized logical key this asset identifies.
    pub fn key(&self) -> &AssetKey {
        &self.key
    }

    /// The current (settled) aspect, if any load has succeeded yet.
    pub fn aspect(&self) -> Option<Arc<Aspect>> {
        self.aspect.read().unwrap().clone()
    }

    /// Whether a usable result is available.
    pub fn is_loaded(&self) -> bool {
        self.aspect().is_some_and(|a| a.is_settled())
    }

    /// Typed access to the current payload, if loaded.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.aspect()?.get::<T>()
    }

    /// Installs `aspect` as the current result. Only called by the loader
    /// that settled it, after settling, so readers never see an unsettled
    /// current aspect.
    pub(crate) fn publish(&self, aspect: Arc<Aspect>) {
        *self.aspect.write().unwrap() = Some(aspect);
    }
}
