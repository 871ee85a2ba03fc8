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

//! Built-in decoder plug-ins.
//!
//! Each decoder implements [`quarry_core::Decoder`]: raw bytes in, typed
//! payload or diagnostic out. The loading core treats them opaquely; adding
//! a new asset kind means adding a new decoder, nothing else.

mod audio;
mod bytes;
mod image;
mod variant;

pub use audio::{AudioBuffer, WavDecoder};
pub use bytes::BytesDecoder;
pub use image::{CpuImage, ImageDecoder};
pub use variant::VariantDecoder;
