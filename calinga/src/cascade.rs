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

use std::sync::Arc;

use async_trait::async_trait;
use calinga_common::{
    cache::TranslationCache,
    error::Result,
    language::{validate_language, Language, TranslationMap},
    response::CacheResponse,
};
use futures::future::join_all;

/// First error of the per level results, if any.
fn first_error(results: Vec<Result<()>>) -> Result<()> {
    results.into_iter().find(|res| res.is_err()).unwrap_or(Ok(()))
}

fn log_backfill_errors(results: Vec<Result<()>>, what: &str) {
    for (level, res) in results.into_iter().enumerate() {
        if let Err(e) = res {
            tracing::warn!("[cascaded cache]: backfill {what} into level {level} failed, error: {e}");
        }
    }
}

/// An ordered list of cache levels behind one [`TranslationCache`].
///
/// Reads query the levels in order and return the first hit. A hit at level `k` is written into levels `0..k` before
/// it is returned, so the next read is served by the fastest level. Stores and clears go to every level concurrently.
/// Invalid language identifiers are rejected before any level is called. The cascade owns no data.
#[derive(Debug, Clone, Default)]
pub struct CascadedCache {
    levels: Vec<Arc<dyn TranslationCache>>,
}

impl CascadedCache {
    /// Create a cascade over `levels`, fastest first.
    pub fn new(levels: Vec<Arc<dyn TranslationCache>>) -> Self {
        Self { levels }
    }

    /// Append a slower level.
    pub fn with_level(mut self, level: Arc<dyn TranslationCache>) -> Self {
        self.levels.push(level);
        self
    }

    /// The levels, fastest first.
    pub fn levels(&self) -> &[Arc<dyn TranslationCache>] {
        &self.levels
    }
}

#[async_trait]
impl TranslationCache for CascadedCache {
    async fn get_translations(
        &self,
        language: &str,
        include_drafts: bool,
    ) -> Result<CacheResponse<Arc<TranslationMap>>> {
        validate_language(language)?;
        for (k, level) in self.levels.iter().enumerate() {
            let res = level.get_translations(language, include_drafts).await?;
            if !res.found_in_cache() {
                continue;
            }
            if k > 0 {
                tracing::debug!("[cascaded cache]: translations hit at level {k}, backfill, language: {language}");
                let stores = self.levels[..k]
                    .iter()
                    .map(|level| level.store_translations(language, res.result().clone()));
                log_backfill_errors(join_all(stores).await, &format!("translations of {language}"));
            }
            return Ok(res);
        }
        Ok(CacheResponse::empty())
    }

    async fn get_languages(&self) -> Result<CacheResponse<Vec<Language>>> {
        for (k, level) in self.levels.iter().enumerate() {
            let res = level.get_languages().await?;
            if !res.found_in_cache() {
                continue;
            }
            if k > 0 {
                tracing::debug!("[cascaded cache]: languages hit at level {k}, backfill");
                let stores = self.levels[..k]
                    .iter()
                    .map(|level| level.store_languages(res.result()));
                log_backfill_errors(join_all(stores).await, "languages");
            }
            return Ok(res);
        }
        Ok(CacheResponse::empty())
    }

    async fn store_translations(&self, language: &str, translations: Arc<TranslationMap>) -> Result<()> {
        // Rejected before any level is touched.
        validate_language(language)?;
        let stores = self
            .levels
            .iter()
            .map(|level| level.store_translations(language, translations.clone()));
        first_error(join_all(stores).await)
    }

    async fn store_languages(&self, languages: &[Language]) -> Result<()> {
        let stores = self.levels.iter().map(|level| level.store_languages(languages));
        first_error(join_all(stores).await)
    }

    async fn clear(&self) -> Result<()> {
        let clears = self.levels.iter().map(|level| level.clear());
        first_error(join_all(clears).await)
    }
}
