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

//! Utilities for testing.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use calinga_common::{
    cache::TranslationCache,
    error::{Error, Result},
    language::{Language, TranslationMap},
    response::CacheResponse,
};
use parking_lot::Mutex;

use crate::client::ConsumerClient;

/// A cache level that counts the calls it forwards.
#[derive(Debug)]
pub struct CountingCache {
    inner: Box<dyn TranslationCache>,
    translation_gets: AtomicUsize,
    translation_stores: AtomicUsize,
    language_gets: AtomicUsize,
    language_stores: AtomicUsize,
    clears: AtomicUsize,
}

impl CountingCache {
    /// Wrap a level.
    pub fn new(inner: impl TranslationCache) -> Self {
        Self {
            inner: Box::new(inner),
            translation_gets: AtomicUsize::new(0),
            translation_stores: AtomicUsize::new(0),
            language_gets: AtomicUsize::new(0),
            language_stores: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
        }
    }

    /// Number of translation lookups.
    pub fn translation_gets(&self) -> usize {
        self.translation_gets.load(Ordering::Relaxed)
    }

    /// Number of translation stores.
    pub fn translation_stores(&self) -> usize {
        self.translation_stores.load(Ordering::Relaxed)
    }

    /// Number of language list lookups.
    pub fn language_gets(&self) -> usize {
        self.language_gets.load(Ordering::Relaxed)
    }

    /// Number of language list stores.
    pub fn language_stores(&self) -> usize {
        self.language_stores.load(Ordering::Relaxed)
    }

    /// Number of clears.
    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TranslationCache for CountingCache {
    async fn get_translations(
        &self,
        language: &str,
        include_drafts: bool,
    ) -> Result<CacheResponse<Arc<TranslationMap>>> {
        self.translation_gets.fetch_add(1, Ordering::Relaxed);
        self.inner.get_translations(language, include_drafts).await
    }

    async fn get_languages(&self) -> Result<CacheResponse<Vec<Language>>> {
        self.language_gets.fetch_add(1, Ordering::Relaxed);
        self.inner.get_languages().await
    }

    async fn store_translations(&self, language: &str, translations: Arc<TranslationMap>) -> Result<()> {
        self.translation_stores.fetch_add(1, Ordering::Relaxed);
        self.inner.store_translations(language, translations).await
    }

    async fn store_languages(&self, languages: &[Language]) -> Result<()> {
        self.language_stores.fetch_add(1, Ordering::Relaxed);
        self.inner.store_languages(languages).await
    }

    async fn clear(&self) -> Result<()> {
        self.clears.fetch_add(1, Ordering::Relaxed);
        self.inner.clear().await
    }
}

/// A cache level whose every operation fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultyCache;

#[async_trait]
impl TranslationCache for FaultyCache {
    async fn get_translations(&self, language: &str, _: bool) -> Result<CacheResponse<Arc<TranslationMap>>> {
        Err(Error::translations_not_available(format!("faulty level, language: {language}")))
    }

    async fn get_languages(&self) -> Result<CacheResponse<Vec<Language>>> {
        Err(Error::languages_not_available("faulty level"))
    }

    async fn store_translations(&self, language: &str, _: Arc<TranslationMap>) -> Result<()> {
        Err(Error::translations_not_available(format!("faulty level, language: {language}")))
    }

    async fn store_languages(&self, _: &[Language]) -> Result<()> {
        Err(Error::languages_not_available("faulty level"))
    }

    async fn clear(&self) -> Result<()> {
        Err(Error::translations_not_available("faulty level"))
    }
}

/// A failure a [`ScriptedClient`] answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// [`Error::AuthorizationFailed`].
    Unauthorized,
    /// [`Error::TranslationsNotFound`].
    NotFound,
    /// [`Error::TranslationsNotAvailable`] or [`Error::LanguagesNotAvailable`].
    NotAvailable,
}

#[derive(Debug, Default)]
struct ScriptedState {
    translations: HashMap<String, TranslationMap>,
    translation_failures: HashMap<String, ScriptedFailure>,
    languages: Vec<Language>,
    language_failure: Option<ScriptedFailure>,
    translation_requests: Vec<String>,
    language_requests: usize,
}

/// A [`ConsumerClient`] answering from a script and recording requests.
///
/// Unknown languages are answered with an empty map.
#[derive(Debug, Clone, Default)]
pub struct ScriptedClient {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedClient {
    /// Create a client without any data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests for `language` with `translations`.
    pub fn with_translations<K, V>(self, language: &str, translations: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let translations = translations.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.state.lock().translations.insert(language.to_string(), translations);
        self
    }

    /// Answer requests for `language` with `failure`.
    pub fn with_translation_failure(self, language: &str, failure: ScriptedFailure) -> Self {
        self.state
            .lock()
            .translation_failures
            .insert(language.to_string(), failure);
        self
    }

    /// Answer language list requests with `languages`.
    pub fn with_languages(self, languages: Vec<Language>) -> Self {
        self.state.lock().languages = languages;
        self
    }

    /// Answer language list requests with `failure`.
    pub fn with_language_failure(self, failure: ScriptedFailure) -> Self {
        self.state.lock().language_failure = Some(failure);
        self
    }

    /// Languages translations were requested for, in request order.
    pub fn translation_requests(&self) -> Vec<String> {
        self.state.lock().translation_requests.clone()
    }

    /// Number of language list requests.
    pub fn language_requests(&self) -> usize {
        self.state.lock().language_requests
    }
}

#[async_trait]
impl ConsumerClient for ScriptedClient {
    async fn get_translations(&self, language: &str) -> Result<TranslationMap> {
        let mut state = self.state.lock();
        state.translation_requests.push(language.to_string());
        match state.translation_failures.get(language) {
            Some(ScriptedFailure::Unauthorized) => Err(Error::AuthorizationFailed(language.to_string())),
            Some(ScriptedFailure::NotFound) => Err(Error::TranslationsNotFound(language.to_string())),
            Some(ScriptedFailure::NotAvailable) => Err(Error::translations_not_available(language.to_string())),
            None => Ok(state.translations.get(language).cloned().unwrap_or_default()),
        }
    }

    async fn get_languages(&self) -> Result<Vec<Language>> {
        let mut state = self.state.lock();
        state.language_requests += 1;
        match state.language_failure {
            Some(ScriptedFailure::Unauthorized) => Err(Error::AuthorizationFailed("languages".to_string())),
            Some(_) => Err(Error::languages_not_available("scripted failure")),
            None => Ok(state.languages.clone()),
        }
    }
}
