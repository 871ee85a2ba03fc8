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

//! # Quarry Assets
//!
//! The asynchronous asset loading and caching subsystem: a process-wide
//! service that turns a logical path into a shared, lazily-populated
//! in-memory result, using a pool of background workers.
//!
//! The entry point is [`AssetManager`]. A call to
//! [`load`](AssetManager::load) either serves an existing entry from the
//! cache (a second request for the same key never creates a second unit of
//! work) or registers a new [`Loader`] and hands it to the worker pool.
//! Callers can poll the returned handles, block on
//! [`Loader::wait`], or ignore the result entirely; the shared [`Asset`]
//! reflects the outcome as soon as it is ready.
//!
//! With zero workers configured, every load executes synchronously on the
//! calling thread with identical observable behavior, which is what
//! deterministic single-threaded and test contexts use.

pub mod asset;
pub mod decode;
pub mod loader;
pub mod manager;
pub mod pool;
pub mod queue;

pub use asset::{Asset, Aspect};
pub use loader::{Loader, LoaderState};
pub use manager::AssetManager;
pub use pool::MAX_WORKERS;
