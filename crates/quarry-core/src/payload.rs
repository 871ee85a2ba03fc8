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

//! Type-erased decoded results and the decoder plug-in contract.
//!
//! One manager caches heterogeneous asset kinds (images, structured data,
//! audio, raw bytes), so decoded results are stored type-erased and recovered
//! through a checked downcast at the point of use.

use std::any::Any;
use std::sync::Arc;

use crate::error::LoadError;
use crate::key::AssetKey;

/// The finished product of one decode step.
///
/// Wraps the typed value behind `Arc<dyn Any>` together with the byte size
/// the cache should account for it. The value is immutable once wrapped;
/// every holder shares the same allocation.
#[derive(Clone)]
pub struct Payload {
    data: Arc<dyn Any + Send + Sync>,
    size: usize,
}

impl Payload {
    /// Wraps a decoded value, accounting `size` bytes against the cache.
    pub fn new<T: Send + Sync + 'static>(value: T, size: usize) -> Self {
        Self {
            data: Arc::new(value),
            size,
        }
    }

    /// The byte size this payload counts for in cache bookkeeping.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Recovers the typed value, or `None` if `T` is not the stored type.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.data).downcast::<T>().ok()
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload").field("size", &self.size).finish()
    }
}

/// A pluggable unit of decoding capability.
///
/// Implementations turn a resource's raw byte stream into a typed [`Payload`]
/// or fail with a diagnostic; the loading core never inspects decoder
/// internals. Decoders must be shareable across worker threads.
pub trait Decoder: Send + Sync {
    /// Decodes `bytes` for the resource identified by `key`.
    fn decode(&self, key: &AssetKey, bytes: &[u8]) -> Result<Payload, LoadError>;
}
