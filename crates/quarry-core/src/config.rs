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

//! Construction-time configuration for the asset manager.

use std::path::PathBuf;

/// Options accepted by the asset manager at construction.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Soft ceiling, in bytes, for the aggregate size of cached payloads.
    /// Exceeding it triggers eviction of unreferenced, completed entries on
    /// the next insertion; it is never a hard admission gate.
    pub max_cache_size: usize,
    /// Initial worker thread count. Clamped to the pool maximum. Zero means
    /// every `load` call executes synchronously on the calling thread.
    pub n_thread: usize,
    /// Root used to resolve logical keys to real resource locations.
    pub base_path: PathBuf,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_cache_size: 1 << 28,
            n_thread: 1,
            base_path: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_threaded_with_local_root() {
        let config = ManagerConfig::default();
        assert_eq!(config.n_thread, 1);
        assert_eq!(config.base_path, PathBuf::from("."));
        assert!(config.max_cache_size > 0);
    }
}
