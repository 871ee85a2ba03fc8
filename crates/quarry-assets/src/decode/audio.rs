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

//! WAV audio decoding.

use std::io::Cursor;

use quarry_core::{AssetKey, Decoder, LoadError, Payload};

/// Interleaved 16-bit PCM samples with their layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    /// Channel count (1 = mono, 2 = stereo, ...).
    pub channels: u16,
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Interleaved samples, `channels` values per frame.
    pub samples: Vec<i16>,
}

/// Decodes 16-bit PCM WAV files into an [`AudioBuffer`].
#[derive(Debug, Default, Clone)]
pub struct WavDecoder;

impl Decoder for WavDecoder {
    fn decode(&self, key: &AssetKey, bytes: &[u8]) -> Result<Payload, LoadError> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))
            .map_err(|err| LoadError::decode(key.as_str(), err))?;
        let spec = reader.spec();

        let samples: Vec<i16> = reader
            .samples::<i16>()
            .collect::<Result<_, _>>()
            .map_err(|err| LoadError::decode(key.as_str(), err))?;
        let size = samples.len() * std::mem::size_of::<i16>();

        Ok(Payload::new(
            AudioBuffer {
                channels: spec.channels,
                sample_rate: spec.sample_rate,
                samples,
            },
            size,
        ))
    }
}
