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

//! The unit of work: one pending or completed load operation for one key.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, Weak};

use quarry_core::{AssetKey, Decoder, LoadError, Payload};

use crate::asset::{Aspect, Asset};
use crate::manager::ManagerShared;

/// Lifecycle of a [`Loader`].
///
/// The transition out of `Pending` happens exactly once; `Loaded` and
/// `Failed` are terminal. There are no retries at this layer: retrying a key
/// means a fresh `load` call creating a brand-new loader, which by the dedup
/// invariant requires the failed entry to leave the cache first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    /// Not yet executed, or currently executing.
    Pending,
    /// The decode step produced a payload.
    Loaded,
    /// The decode step failed; `size()` stays 0.
    Failed,
}

/// One pending or completed load operation.
///
/// Created by the manager on cache miss, executed exactly once by whichever
/// thread dequeues it (a worker, or the caller in synchronous mode), and
/// shared by reference counting with every caller that kept the handle.
pub struct Loader {
    key: AssetKey,
    real_path: PathBuf,
    asset: Arc<Asset>,
    aspect: Arc<Aspect>,
    decoder: Arc<dyn Decoder>,
    manager: Weak<ManagerShared>,
    state: Mutex<LoaderState>,
    done: Condvar,
    size: AtomicUsize,
    executed: AtomicBool,
}

impl Loader {
    pub(crate) fn new(
        key: AssetKey,
        real_path: PathBuf,
        asset: Arc<Asset>,
        aspect: Arc<Aspect>,
        decoder: Arc<dyn Decoder>,
        manager: Weak<ManagerShared>,
    ) -> Arc<Self> {
        Arc::new(Self {
            key,
            real_path,
            asset,
            aspect,
            decoder,
            manager,
            state: Mutex::new(LoaderState::Pending),
            done: Condvar::new(),
            size: AtomicUsize::new(0),
            executed: AtomicBool::new(false),
        })
    }

    /// The normalized logical key being loaded.
    pub fn key(&self) -> &AssetKey {
        &self.key
    }

    /// The filesystem location the key resolved to at request time.
    pub fn real_path(&self) -> &std::path::Path {
        &self.real_path
    }

    /// The shared asset this load publishes into.
    pub fn asset(&self) -> &Arc<Asset> {
        &self.asset
    }

    /// Current state. Non-blocking, safe from any thread.
    pub fn state(&self) -> LoaderState {
        *self.state.lock().unwrap()
    }

    /// Whether the load reached `Loaded`.
    pub fn is_loaded(&self) -> bool {
        self.state() == LoaderState::Loaded
    }

    /// Whether the load reached either terminal state.
    pub fn is_done(&self) -> bool {
        self.state() != LoaderState::Pending
    }

    /// Byte size of the produced payload, 0 until loaded (and forever on
    /// failure).
    pub fn size(&self) -> usize {
        self.size.load(Ordering::SeqCst)
    }

    /// Blocks the calling thread until the loader is terminal.
    ///
    /// Safe to call from any number of threads simultaneously, and returns
    /// immediately if the loader has already settled.
    pub fn wait(&self) {
        let mut state = self.state.lock().unwrap();
        while *state == LoaderState::Pending {
            state = self.done.wait(state).unwrap();
        }
    }

    /// Runs the decode step. Called exactly once per loader; a second call
    /// is a contract violation and is ignored outside debug builds.
    pub fn execute(self: &Arc<Self>) {
        if self.executed.swap(true, Ordering::SeqCst) {
            debug_assert!(false, "execute() called twice for {}", self.key);
            log::error!("ignoring repeated execute() for {}", self.key);
            return;
        }

        let shared = self.manager.upgrade();
        if let Some(shared) = &shared {
            shared.loader_started(&self.key);
        }

        match self.run_decode() {
            Ok(payload) => {
                let size = payload.size();
                // Settle and publish before the terminal transition, so a
                // waiter woken by `Loaded` always observes the payload.
                self.aspect.settle(payload);
                self.asset.publish(Arc::clone(&self.aspect));
                self.size.store(size, Ordering::SeqCst);
                if let Some(shared) = &shared {
                    shared.loader_loaded(&self.key, size, self);
                }
                self.finish(LoaderState::Loaded);
            }
            Err(err) => {
                log::warn!("load of {} failed: {err}", self.key);
                if let Some(shared) = &shared {
                    shared.loader_failed(&self.key, &err);
                }
                self.finish(LoaderState::Failed);
            }
        }
    }

    fn run_decode(&self) -> Result<Payload, LoadError> {
        let bytes = std::fs::read(&self.real_path).map_err(|err| {
            let path = self.real_path.display().to_string();
            if err.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound { path }
            } else {
                LoadError::Io { path, source: err }
            }
        })?;
        self.decoder.decode(&self.key, &bytes)
    }

    fn finish(&self, terminal: LoaderState) {
        let mut state = self.state.lock().unwrap();
        debug_assert_eq!(*state, LoaderState::Pending);
        *state = terminal;
        drop(state);
        self.done.notify_all();
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("key", &self.key)
            .field("state", &self.state())
            .field("size", &self.size())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::idle_loader;
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_new_loader_is_pending_with_zero_size() {
        let loader = idle_loader("sprites/hero.png");
        assert_eq!(loader.state(), LoaderState::Pending);
        assert!(!loader.is_done());
        assert_eq!(loader.size(), 0);
    }

    #[test]
    fn test_missing_file_settles_failed() {
        let loader = idle_loader("definitely/not/here.bin");
        loader.execute();
        assert_eq!(loader.state(), LoaderState::Failed);
        assert!(!loader.is_loaded());
        assert_eq!(loader.size(), 0);
        assert!(!loader.asset().is_loaded());
    }

    #[test]
    fn test_wait_after_completion_returns_immediately() {
        let loader = idle_loader("missing.bin");
        loader.execute();
        loader.wait();
        assert!(loader.is_done());
    }

    #[test]
    fn test_many_waiters_all_observe_terminal_state() {
        let loader = idle_loader("missing.bin");

        let mut waiters = Vec::new();
        for _ in 0..4 {
            let l = Arc::clone(&loader);
            waiters.push(thread::spawn(move || {
                l.wait();
                l.is_done()
            }));
        }

        thread::sleep(Duration::from_millis(20));
        loader.execute();

        for waiter in waiters {
            assert!(waiter.join().unwrap());
        }
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_second_execute_is_ignored() {
        let loader = idle_loader("missing.bin");
        loader.execute();
        loader.execute();
        assert_eq!(loader.state(), LoaderState::Failed);
    }
}
