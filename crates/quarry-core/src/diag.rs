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

//! Diagnostics collaborator injected into the asset manager.
//!
//! Every state transition in the loading pipeline is reported here as a
//! typed [`LoadEvent`]. The pipeline itself never formats or persists
//! anything; sinks decide what to do with the stream. The default is
//! [`NullSink`], so unconfigured contexts pay nothing.

use crossbeam_channel::{Receiver, Sender};

use crate::key::AssetKey;

/// One observable transition in the loading pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    /// A new loader was registered and queued (or is about to run inline).
    Enqueued {
        /// Logical key of the resource.
        key: AssetKey,
    },
    /// A worker (or the caller, in synchronous mode) began executing a load.
    Started {
        /// Logical key of the resource.
        key: AssetKey,
    },
    /// The decode step produced a payload.
    Loaded {
        /// Logical key of the resource.
        key: AssetKey,
        /// Byte size accounted against the cache.
        size: usize,
    },
    /// The decode step failed; the loader is terminally failed.
    Failed {
        /// Logical key of the resource.
        key: AssetKey,
        /// Human-readable failure diagnostic.
        reason: String,
    },
    /// An unreferenced, completed entry was dropped to respect the ceiling.
    Evicted {
        /// Logical key of the resource.
        key: AssetKey,
        /// Byte size released from the cache.
        size: usize,
    },
    /// The whole cache was cleared on request.
    CacheCleared {
        /// Number of entries the manager dropped its references to.
        dropped: usize,
    },
}

/// Receiver of [`LoadEvent`]s, injected into the manager at construction.
///
/// Implementations must be callable from worker threads.
pub trait DiagnosticsSink: Send + Sync {
    /// Reports one pipeline transition.
    fn report(&self, event: &LoadEvent);
}

/// Sink that discards every event. The default when none is configured.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn report(&self, _event: &LoadEvent) {}
}

/// Sink that forwards events to the `log` facade with matching severity.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn report(&self, event: &LoadEvent) {
        match event {
            LoadEvent::Enqueued { key } => log::debug!("enqueued {key}"),
            LoadEvent::Started { key } => log::debug!("loading {key}"),
            LoadEvent::Loaded { key, size } => log::info!("loaded {key} ({size} bytes)"),
            LoadEvent::Failed { key, reason } => log::warn!("failed to load {key}: {reason}"),
            LoadEvent::Evicted { key, size } => log::debug!("evicted {key} ({size} bytes)"),
            LoadEvent::CacheCleared { dropped } => {
                log::info!("asset cache cleared ({dropped} entries)")
            }
        }
    }
}

/// Sink that forwards events over a channel, for tools and tests that want
/// to observe the pipeline from another thread.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<LoadEvent>,
}

impl ChannelSink {
    /// Creates a sink plus the receiving end of its event stream.
    pub fn new() -> (Self, Receiver<LoadEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl DiagnosticsSink for ChannelSink {
    fn report(&self, event: &LoadEvent) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.sender.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_forwards_events_in_order() {
        let (sink, rx) = ChannelSink::new();
        let key = AssetKey::new("maps/level1.json");
        sink.report(&LoadEvent::Enqueued { key: key.clone() });
        sink.report(&LoadEvent::Loaded {
            key: key.clone(),
            size: 64,
        });

        assert_eq!(rx.recv().unwrap(), LoadEvent::Enqueued { key: key.clone() });
        assert_eq!(rx.recv().unwrap(), LoadEvent::Loaded { key, size: 64 });
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.report(&LoadEvent::CacheCleared { dropped: 0 });
    }
}
