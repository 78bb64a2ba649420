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

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use calinga_common::{
    cache::TranslationCache,
    clock::{Clock, SystemClock},
    error::Result,
    language::{validate_language, Language, TranslationMap},
    response::CacheResponse,
};
use parking_lot::Mutex;

/// Configuration of a [`MemoryCache`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCacheConfig {
    /// Time to live of the whole cache content, measured from the latest store.
    ///
    /// `None` or a zero duration disables expiration.
    pub expiration: Option<Duration>,
}

impl MemoryCacheConfig {
    /// Build a config from an expiration interval in seconds, `0` meaning never.
    pub fn from_secs(secs: u64) -> Self {
        Self {
            expiration: (secs > 0).then(|| Duration::from_secs(secs)),
        }
    }
}

/// Builder of [`MemoryCache`].
#[derive(Debug)]
pub struct MemoryCacheBuilder {
    config: MemoryCacheConfig,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheBuilder {
    /// Create a builder for a cache that never expires and reads the system clock.
    pub fn new() -> Self {
        Self {
            config: MemoryCacheConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the whole config.
    pub fn with_config(mut self, config: MemoryCacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the shared time to live.
    ///
    /// Default: no expiration.
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.config.expiration = Some(expiration);
        self
    }

    /// Set the clock used to compute and check the deadline.
    ///
    /// Default: [`SystemClock`].
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the memory cache.
    pub fn build(self) -> MemoryCache {
        let ttl = self.config.expiration.filter(|ttl| !ttl.is_zero());
        MemoryCache {
            state: Mutex::new(MemoryState::default()),
            ttl,
            clock: self.clock,
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    translations: HashMap<String, Arc<TranslationMap>>,
    languages: Vec<Language>,
    /// `None` until the first store after creation or clear.
    deadline: Option<Instant>,
}

impl MemoryState {
    fn reset(&mut self) {
        self.translations.clear();
        self.languages.clear();
        self.deadline = None;
    }

    /// Drop everything if the deadline has passed. Returns `true` if the state expired.
    fn expire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.reset();
                true
            }
            _ => false,
        }
    }
}

/// Process-lifetime cache level.
///
/// All entries share one deadline: every store pushes it to `now + ttl`, and a read at or past it drops everything
/// before answering. Stale data is never returned.
#[derive(Debug)]
pub struct MemoryCache {
    state: Mutex<MemoryState>,
    ttl: Option<Duration>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        MemoryCacheBuilder::new().build()
    }
}

impl MemoryCache {
    /// Create a memory cache with the given config on the system clock.
    pub fn new(config: MemoryCacheConfig) -> Self {
        MemoryCacheBuilder::new().with_config(config).build()
    }

    /// Configured time to live, `None` if entries never expire.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn touch(&self, state: &mut MemoryState) {
        if let Some(ttl) = self.ttl {
            state.deadline = Some(self.clock.now() + ttl);
        }
    }

    /// Lock the state after applying a due expiration.
    fn live_state(&self) -> parking_lot::MutexGuard<'_, MemoryState> {
        let mut state = self.state.lock();
        if self.ttl.is_some() && state.expire_if_due(self.clock.now()) {
            tracing::debug!("[memory cache]: content expired");
        }
        state
    }
}

#[async_trait]
impl TranslationCache for MemoryCache {
    async fn get_translations(
        &self,
        language: &str,
        _include_drafts: bool,
    ) -> Result<CacheResponse<Arc<TranslationMap>>> {
        validate_language(language)?;
        let state = self.live_state();
        let res = match state.translations.get(language) {
            Some(translations) => CacheResponse::found(translations.clone()),
            None => CacheResponse::empty(),
        };
        Ok(res)
    }

    async fn get_languages(&self) -> Result<CacheResponse<Vec<Language>>> {
        let state = self.live_state();
        if state.languages.is_empty() {
            return Ok(CacheResponse::empty());
        }
        Ok(CacheResponse::found(state.languages.clone()))
    }

    async fn store_translations(&self, language: &str, translations: Arc<TranslationMap>) -> Result<()> {
        validate_language(language)?;
        let mut state = self.state.lock();
        state.translations.insert(language.to_string(), translations);
        self.touch(&mut state);
        Ok(())
    }

    async fn store_languages(&self, languages: &[Language]) -> Result<()> {
        let mut state = self.state.lock();
        state.languages = languages.to_vec();
        self.touch(&mut state);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.state.lock().reset();
        tracing::debug!("[memory cache]: cleared");
        Ok(())
    }
}
