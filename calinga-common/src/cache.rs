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

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    error::Result,
    language::{Language, TranslationMap},
    response::CacheResponse,
};

/// A cache level for translations and the language list.
///
/// Implementations must tolerate concurrent calls on the same and on different languages. A miss is reported with
/// [`CacheResponse::empty`], never with an error.
#[async_trait]
pub trait TranslationCache: Send + Sync + Debug + 'static {
    /// Look up the translations of `language`.
    ///
    /// `include_drafts` is passed through for levels that distinguish drafts; the built-in levels ignore it.
    async fn get_translations(
        &self,
        language: &str,
        include_drafts: bool,
    ) -> Result<CacheResponse<Arc<TranslationMap>>>;

    /// Look up the language list.
    async fn get_languages(&self) -> Result<CacheResponse<Vec<Language>>>;

    /// Insert or overwrite the translations of `language`.
    async fn store_translations(&self, language: &str, translations: Arc<TranslationMap>) -> Result<()>;

    /// Replace the language list.
    async fn store_languages(&self, languages: &[Language]) -> Result<()>;

    /// Drop everything this level holds.
    async fn clear(&self) -> Result<()>;
}

