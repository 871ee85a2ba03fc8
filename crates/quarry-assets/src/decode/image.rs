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

//! Image decoding on the CPU.

use quarry_core::{AssetKey, Decoder, LoadError, Payload};

/// A decoded image, converted to tightly packed RGBA8 in sRGB space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, row-major RGBA.
    pub pixels: Vec<u8>,
}

/// Decodes any format the `image` crate recognizes into a [`CpuImage`].
#[derive(Debug, Default, Clone)]
pub struct ImageDecoder;

impl Decoder for ImageDecoder {
    fn decode(&self, key: &AssetKey, bytes: &[u8]) -> Result<Payload, LoadError> {
        let img = image::load_from_memory(bytes)
            .map_err(|err| LoadError::decode(key.as_str(), err))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba.into_raw();
        let size = pixels.len();

        Ok(Payload::new(
            CpuImage {
                width,
                height,
                pixels,
            },
            size,
        ))
    }
}
