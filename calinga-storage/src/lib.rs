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

//! Durable cache level for calinga.
//!
//! One json document per language plus one for the language list, under
//! `<cache directory>/<organization>/<team>/<project>/`. Documents are written to a temporary file, validated and then
//! atomically moved into place, so a crash never leaves a torn document behind.

mod cache;
mod locks;
mod naming;

pub use cache::{FileCache, FileCacheBuilder, FileCacheConfig};
pub use naming::{translations_file_name, LANGUAGES_FILE_NAME};
