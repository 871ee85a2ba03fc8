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

//! Structured-data decoding.

use quarry_core::{AssetKey, Decoder, LoadError, Payload};

/// Decodes a JSON document into a dynamically typed [`serde_json::Value`].
///
/// Used for data-driven definitions (maps, entity descriptions, settings)
/// where the consumer walks the document rather than deserializing into a
/// fixed struct.
#[derive(Debug, Default, Clone)]
pub struct VariantDecoder;

impl Decoder for VariantDecoder {
    fn decode(&self, key: &AssetKey, bytes: &[u8]) -> Result<Payload, LoadError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|err| LoadError::decode(key.as_str(), err))?;
        Ok(Payload::new(value, bytes.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_document() {
        let key = AssetKey::new("maps/level1.json");
        let doc = br#"{"name": "level1", "width": 32}"#;
        let payload = VariantDecoder.decode(&key, doc).unwrap();
        let value = payload.get::<serde_json::Value>().unwrap();

        assert_eq!(value["name"], "level1");
        assert_eq!(value["width"], 32);
        assert_eq!(payload.size(), doc.len());
    }

    #[test]
    fn test_malformed_document_is_a_decode_failure() {
        let key = AssetKey::new("maps/broken.json");
        let err = VariantDecoder.decode(&key, b"{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }
}
