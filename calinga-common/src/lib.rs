//  Copyright 2025 calinga Project Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

//! Shared components for calinga.
//!
//! This crate holds everything the cache levels agree on: the data model, the [`cache::TranslationCache`] level
//! trait, the injected [`clock::Clock`] and [`fs::FileSystem`] collaborators and the common error type.

/// Run blocking work on the tokio blocking pool.
pub mod asyncify;
/// The cache level abstraction.
pub mod cache;
/// Time source abstraction.
pub mod clock;
/// Error type shared by all calinga crates.
pub mod error;
/// Filesystem abstraction used by the file cache.
pub mod fs;
/// Languages and translation maps.
pub mod language;
/// Cache lookup results.
pub mod response;

/// Test doubles for the injected collaborators.
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
