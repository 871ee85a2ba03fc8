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

//! Error taxonomy for the loading pipeline.
//!
//! Load errors never cross the worker/caller boundary as panics; they settle
//! the owning loader in its `Failed` terminal state and are observed by
//! polling or waiting. The variants exist so diagnostics can distinguish a
//! missing resource from a malformed one.

use thiserror::Error;

/// Everything that can go wrong while turning a logical key into a payload.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The resource does not exist at the resolved location.
    #[error("resource not found: {path}")]
    NotFound {
        /// The resolved filesystem path that was probed.
        path: String,
    },

    /// Reading the resource failed for a reason other than absence.
    #[error("i/o error reading {path}: {source}")]
    Io {
        /// The resolved filesystem path that was being read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The decoder could not produce a payload from the raw bytes.
    #[error("decode failure for {key}: {reason}")]
    Decode {
        /// The logical key of the failing resource.
        key: String,
        /// Human-readable diagnostic from the decoder.
        reason: String,
    },
}

impl LoadError {
    /// Convenience constructor for decoder implementations.
    pub fn decode(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_key_and_reason() {
        let err = LoadError::decode("tiles/grass.png", "unsupported format");
        let msg = err.to_string();
        assert!(msg.contains("tiles/grass.png"));
        assert!(msg.contains("unsupported format"));
    }

    #[test]
    fn test_io_error_preserves_source() {
        use std::error::Error as _;
        let inner = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = LoadError::Io {
            path: "assets/locked.bin".into(),
            source: inner,
        };
        assert!(err.source().is_some());
    }
}
