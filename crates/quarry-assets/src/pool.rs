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

//! Background workers draining the work queue.
//!
//! Each worker is an OS thread looping pop-then-execute. Shutdown is
//! cooperative: a worker is asked to stand down through its own atomic flag
//! and finishes the decode it is running before exiting; queued work it has
//! not dequeued stays for the remaining workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::queue::WorkQueue;

/// Hard ceiling on the worker pool size.
pub const MAX_WORKERS: usize = 8;

struct Worker {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn spawn(index: usize, queue: Arc<WorkQueue>) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::spawn(move || {
            log::debug!("asset worker {index} started");
            while let Some(loader) = queue.pop(&flag) {
                loader.execute();
            }
            log::debug!("asset worker {index} stopped");
        });
        Self {
            running,
            handle: Some(handle),
        }
    }

    fn stop(&mut self, queue: &WorkQueue) {
        self.running.store(false, Ordering::SeqCst);
        queue.notify_all();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// A dynamically sized set of workers servicing one [`WorkQueue`].
pub struct WorkerPool {
    queue: Arc<WorkQueue>,
    workers: Vec<Worker>,
    spawned: usize,
}

impl WorkerPool {
    /// Creates an empty pool over `queue`. Call [`resize`](Self::resize) to
    /// start workers.
    pub fn new(queue: Arc<WorkQueue>) -> Self {
        Self {
            queue,
            workers: Vec::new(),
            spawned: 0,
        }
    }

    /// Number of live workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the pool currently has no workers (synchronous mode).
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Grows or shrinks the pool to `count` workers, clamped to
    /// [`MAX_WORKERS`]. Growing spawns new threads; shrinking signals the
    /// excess workers and joins them before returning.
    pub fn resize(&mut self, count: usize) {
        let count = count.min(MAX_WORKERS);
        while self.workers.len() > count {
            if let Some(mut worker) = self.workers.pop() {
                worker.stop(&self.queue);
            }
        }
        while self.workers.len() < count {
            self.workers.push(Worker::spawn(self.spawned, Arc::clone(&self.queue)));
            self.spawned += 1;
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.resize(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_grows_and_shrinks() {
        let queue = Arc::new(WorkQueue::new());
        let mut pool = WorkerPool::new(Arc::clone(&queue));
        assert!(pool.is_empty());

        pool.resize(3);
        assert_eq!(pool.len(), 3);

        pool.resize(1);
        assert_eq!(pool.len(), 1);

        pool.resize(0);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_resize_clamps_to_maximum() {
        let queue = Arc::new(WorkQueue::new());
        let mut pool = WorkerPool::new(queue);
        pool.resize(64);
        assert_eq!(pool.len(), MAX_WORKERS);
    }

    #[test]
    fn test_drop_joins_idle_workers() {
        let queue = Arc::new(WorkQueue::new());
        let mut pool = WorkerPool::new(queue);
        pool.resize(2);
        drop(pool);
    }
}
