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

//! Raw byte passthrough.

use quarry_core::{AssetKey, Decoder, LoadError, Payload};

/// Hands the raw byte stream through unchanged, as `Vec<u8>`.
///
/// For resources the caller parses itself, and as the cheapest possible
/// decoder in tests.
#[derive(Debug, Default, Clone)]
pub struct BytesDecoder;

impl Decoder for BytesDecoder {
    fn decode(&self, _key: &AssetKey, bytes: &[u8]) -> Result<Payload, LoadError> {
        Ok(Payload::new(bytes.to_vec(), bytes.len()))
    }
}
