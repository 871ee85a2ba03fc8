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

//! # Quarry Core
//!
//! Foundational crate containing the contracts and primitive types shared by
//! the quarry asset pipeline. It defines *what* an asset request is made of
//! (keys, decoded payloads, decoder plug-ins, diagnostics, errors,
//! configuration) but has no knowledge of *how* loads are scheduled or
//! cached; that machinery lives in `quarry-assets`.

#![warn(missing_docs)]

pub mod config;
pub mod diag;
pub mod error;
pub mod key;
pub mod payload;

pub use config::ManagerConfig;
pub use diag::{ChannelSink, DiagnosticsSink, LoadEvent, LogSink, NullSink};
pub use error::LoadError;
pub use key::AssetKey;
pub use payload::{Decoder, Payload};
