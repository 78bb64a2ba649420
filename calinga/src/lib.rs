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

//! calinga - translation retrieval with layered caching.
//!
//! Translations are resolved through an ordered cascade of cache levels, by default an in-process
//! [`MemoryCache`](calinga_memory::MemoryCache) in front of a durable
//! [`FileCache`](calinga_storage::FileCache), before the remote consumer api is contacted.
//!
//! ```no_run
//! use calinga::prelude::*;
//!
//! # async fn run() -> calinga::Result<()> {
//! let settings = CalingaSettings::from_json_file("calinga.json")?;
//! let service = CalingaServiceBuilder::new(settings).build()?;
//! let text = service.translate("Welcome_Title", "de").await?;
//! # let _ = text;
//! # Ok(())
//! # }
//! ```

pub use calinga_common as common;
pub use calinga_memory as memory;
pub use calinga_storage as storage;

mod builder;
mod cascade;
mod client;
mod context;
mod service;
mod settings;

/// Error and result types.
pub mod error {
    pub use calinga_common::error::{BoxError, Error, Result};
}
pub use error::{Error, Result};

/// The most commonly used items.
pub mod prelude;

/// Test doubles for the remote client and cache levels.
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use builder::CalingaServiceBuilder;
pub use cascade::CascadedCache;
pub use client::{ConsumerClient, HttpConsumerClient, API_TOKEN_HEADER};
pub use context::LanguageContext;
pub use service::CalingaService;
pub use settings::{CalingaSettings, DEFAULT_CONSUMER_API_BASE_URL};
