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

//! Normalized logical resource paths used as cache keys.

use std::fmt;

/// A normalized logical path identifying one resource within a manager.
///
/// Two raw paths that differ only in separator style, redundant `./`
/// segments, repeated separators, or ASCII case map to the same `AssetKey`,
/// which is what makes request deduplication reliable. Normalization is
/// purely lexical: it never touches the filesystem, so building a key is
/// cheap and deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetKey(String);

impl AssetKey {
    /// Builds a key from a raw, caller-supplied path.
    pub fn new(raw: &str) -> Self {
        let mut normalized = String::with_capacity(raw.len());
        for segment in raw.split(['/', '\\']) {
            if segment.is_empty() || segment == "." {
                continue;
            }
            if !normalized.is_empty() {
                normalized.push('/');
            }
            normalized.extend(segment.chars().map(|c| c.to_ascii_lowercase()));
        }
        Self(normalized)
    }

    /// Returns the normalized path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
