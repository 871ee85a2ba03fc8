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

//! Thread-safe FIFO of pending loaders, shared between the manager and the
//! worker pool.
//!
//! The queue has its own lock, independent of the cache lock, so cache
//! bookkeeping latency never couples with dispatch throughput. Entries hold
//! a strong reference to their loader and are removed exactly once, by
//! exactly one worker, in submission order.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use crate::loader::Loader;

/// A blocking FIFO work queue of pending [`Loader`]s.
pub struct WorkQueue {
    items: Mutex<VecDeque<Arc<Loader>>>,
    ready: Condvar,
}

impl WorkQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            ready: Condvar::new(),
        }
    }

    /// Appends a loader and wakes one blocked worker.
    pub fn push(&self, loader: Arc<Loader>) {
        self.items.lock().unwrap().push_back(loader);
        self.ready.notify_one();
    }

    /// Removes and returns the oldest entry, blocking while the queue is
    /// empty. Returns `None` once `running` is cleared, which is how workers
    /// are asked to stand down; a wake-up without work re-checks the flag
    /// rather than spinning.
    pub fn pop(&self, running: &AtomicBool) -> Option<Arc<Loader>> {
        let mut items = self.items.lock().unwrap();
        loop {
            if !running.load(Ordering::SeqCst) {
                return None;
            }
            if let Some(loader) = items.pop_front() {
                return Some(loader);
            }
            items = self.ready.wait(items).unwrap();
        }
    }

    /// Current queue depth.
    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wakes every blocked worker so it can re-check its stop flag.
    pub fn notify_all(&self) {
        self.ready.notify_all();
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn stopped() -> AtomicBool {
        AtomicBool::new(false)
    }

    #[test]
    fn test_pop_returns_none_when_not_running() {
        let queue = WorkQueue::new();
        assert!(queue.pop(&stopped()).is_none());
    }

    #[test]
    fn test_len_tracks_pushes() {
        let queue = WorkQueue::new();
        assert!(queue.is_empty());
        queue.push(crate::loader::test_support::idle_loader("a"));
        queue.push(crate::loader::test_support::idle_loader("b"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_fifo_order() {
        let queue = WorkQueue::new();
        let running = AtomicBool::new(true);
        queue.push(crate::loader::test_support::idle_loader("first"));
        queue.push(crate::loader::test_support::idle_loader("second"));

        let a = queue.pop(&running).unwrap();
        let b = queue.pop(&running).unwrap();
        assert_eq!(a.key().as_str(), "first");
        assert_eq!(b.key().as_str(), "second");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_blocked_pop_wakes_on_stop() {
        let queue = Arc::new(WorkQueue::new());
        let running = Arc::new(AtomicBool::new(true));

        let q = Arc::clone(&queue);
        let r = Arc::clone(&running);
        let waiter = thread::spawn(move || q.pop(&r));

        thread::sleep(Duration::from_millis(20));
        running.store(false, Ordering::SeqCst);
        queue.notify_all();

        assert!(waiter.join().unwrap().is_none());
    }
}
