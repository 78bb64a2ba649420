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

use calinga_common::{
    cache::TranslationCache,
    error::{Error, Result},
    language::{reference_language, Language, TranslationMap},
};

use crate::{client::ConsumerClient, context::LanguageContext, settings::CalingaSettings};

fn ensure_not_blank(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(format!("{name} must not be empty")));
    }
    Ok(())
}

#[derive(Debug)]
struct CalingaServiceInner {
    settings: CalingaSettings,
    cache: Arc<dyn TranslationCache>,
    client: Arc<dyn ConsumerClient>,
}

/// Resolves translations through the cache and the remote consumer api.
///
/// Reads go to the cache first. On a miss the remote api is asked and its answer is stored into the cache. Cache read
/// faults are logged and treated as a miss.
///
/// The service is cheap to clone, clones share the cache and the client.
#[derive(Debug, Clone)]
pub struct CalingaService {
    inner: Arc<CalingaServiceInner>,
}

impl CalingaService {
    /// Create a service from its parts. Use [`CalingaServiceBuilder`](crate::CalingaServiceBuilder) for the default
    /// wiring.
    pub fn new(
        settings: CalingaSettings,
        cache: Arc<dyn TranslationCache>,
        client: Arc<dyn ConsumerClient>,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            inner: Arc::new(CalingaServiceInner {
                settings,
                cache,
                client,
            }),
        })
    }

    /// Settings the service was created with.
    pub fn settings(&self) -> &CalingaSettings {
        &self.inner.settings
    }

    /// The cache in front of the remote api.
    pub fn cache(&self) -> &Arc<dyn TranslationCache> {
        &self.inner.cache
    }

    /// A handle translating into `language`.
    pub fn create_context(&self, language: &str) -> Result<LanguageContext> {
        ensure_not_blank(language, "language")?;
        Ok(LanguageContext::new(language, self.clone()))
    }

    /// Translate `key` into `language`.
    ///
    /// Returns the key itself in dev mode, if the key has no translation, or if the translations are not available.
    pub async fn translate(&self, key: &str, language: &str) -> Result<String> {
        ensure_not_blank(language, "language")?;
        ensure_not_blank(key, "key")?;

        if self.inner.settings.is_dev_mode {
            return Ok(key.to_string());
        }

        match self.get_translations(language).await {
            Ok(translations) => Ok(translations.get(key).cloned().unwrap_or_else(|| key.to_string())),
            Err(e) if e.is_not_available() => {
                tracing::debug!(
                    "[calinga]: translations not available, fall back to key, language: {language}, error: {e}"
                );
                Ok(key.to_string())
            }
            Err(e) => Err(e),
        }
    }

    /// All translations of `language`.
    ///
    /// Falls back to the reference language once if enabled and the requested language is not available. In dev mode
    /// every key maps to itself.
    pub async fn get_translations(&self, language: &str) -> Result<Arc<TranslationMap>> {
        ensure_not_blank(language, "language")?;

        let fallback = self.inner.settings.fallback_to_reference_language;
        let translations = match self.fetch_translations(language).await {
            Ok(translations) => translations,
            Err(e) if fallback && (e.is_not_available() || e.is_not_found()) => {
                match self.get_reference_language().await {
                    Ok(reference) if reference != language => {
                        tracing::info!(
                            "[calinga]: fall back to reference language, language: {language}, reference: {reference}, \
                             error: {e}"
                        );
                        self.fetch_translations(&reference).await?
                    }
                    _ => return Err(e),
                }
            }
            Err(e) => return Err(e),
        };

        if self.inner.settings.is_dev_mode {
            let identity: TranslationMap = translations.keys().map(|key| (key.clone(), key.clone())).collect();
            return Ok(Arc::new(identity));
        }
        Ok(translations)
    }

    async fn fetch_translations(&self, language: &str) -> Result<Arc<TranslationMap>> {
        let settings = &self.inner.settings;

        match self.inner.cache.get_translations(language, settings.include_drafts).await {
            Ok(cached) if cached.found_in_cache() => return Ok(cached.into_result()),
            Ok(_) => {}
            Err(e) if e.is_invalid_argument() => return Err(e),
            Err(e) => {
                tracing::warn!("[calinga]: read translations from cache failed, language: {language}, error: {e}")
            }
        }

        if settings.use_cache_only {
            return Err(Error::translations_not_available(format!(
                "translations are not cached and remote access is disabled, language: {language}"
            )));
        }

        let translations = self.inner.client.get_translations(language).await?;
        if translations.is_empty() {
            return Err(Error::translations_not_available(format!(
                "translations not found, path: {}, {}, {}, {language}",
                settings.organization, settings.team, settings.project
            )));
        }

        let translations = Arc::new(translations);
        if let Err(e) = self.inner.cache.store_translations(language, translations.clone()).await {
            tracing::warn!("[calinga]: store translations into cache failed, language: {language}, error: {e}");
        }
        Ok(translations)
    }

    /// Full records of the languages of the project.
    pub async fn languages(&self) -> Result<Vec<Language>> {
        match self.inner.cache.get_languages().await {
            Ok(cached) if cached.found_in_cache() => return Ok(cached.into_result()),
            Ok(_) => {}
            Err(e) => tracing::warn!("[calinga]: read languages from cache failed, error: {e}"),
        }

        if self.inner.settings.use_cache_only {
            return Err(Error::languages_not_available(
                "languages are not cached and remote access is disabled",
            ));
        }

        let languages = self.inner.client.get_languages().await?;
        if let Err(e) = self.inner.cache.store_languages(&languages).await {
            tracing::warn!("[calinga]: store languages into cache failed, error: {e}");
        }
        Ok(languages)
    }

    /// Names of the languages of the project.
    pub async fn get_languages(&self) -> Result<Vec<String>> {
        let languages = self.languages().await?;
        Ok(languages.into_iter().map(|language| language.name).collect())
    }

    /// Name of the reference language of the project.
    pub async fn get_reference_language(&self) -> Result<String> {
        let languages = self.languages().await?;
        reference_language(&languages)
            .map(|language| language.name.clone())
            .ok_or_else(|| Error::languages_not_available("reference language not found"))
    }

    /// Drop everything the cache holds.
    pub async fn clear_cache(&self) -> Result<()> {
        self.inner.cache.clear().await
    }
}

#[cfg(test)]
mod tests {
    use calinga_memory::MemoryCache;

    use super::*;
    use crate::test_utils::{CountingCache, FaultyCache, ScriptedClient, ScriptedFailure};

    const KEY_1: &str = "UnitTest_Key1";
    const KEY_2: &str = "UnitTest_Key2";

    fn settings() -> CalingaSettings {
        CalingaSettings {
            organization: "org".into(),
            team: "team".into(),
            project: "project".into(),
            cache_directory: "cache".into(),
            ..Default::default()
        }
    }

    fn client() -> ScriptedClient {
        ScriptedClient::new()
            .with_translations("de", [(KEY_1, "de translation for key 1"), (KEY_2, "de translation for key 2")])
            .with_translations("en", [(KEY_1, "en translation for key 1"), (KEY_2, "en translation for key 2")])
            .with_languages(vec![Language::new("de", false), Language::new("en", true)])
    }

    fn service_with(settings: CalingaSettings, client: ScriptedClient) -> (CalingaService, Arc<CountingCache>) {
        let cache = Arc::new(CountingCache::new(MemoryCache::default()));
        let service = CalingaService::new(settings, cache.clone(), Arc::new(client)).unwrap();
        (service, cache)
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let e = CalingaService::new(
            CalingaSettings::default(),
            Arc::new(MemoryCache::default()),
            Arc::new(ScriptedClient::new()),
        )
        .unwrap_err();
        assert!(e.is_invalid_argument());
    }

    #[test_log::test(tokio::test)]
    async fn test_translate() {
        let client = client();
        let (service, cache) = service_with(settings(), client.clone());

        assert_eq!(service.translate(KEY_1, "de").await.unwrap(), "de translation for key 1");
        assert_eq!(service.translate(KEY_2, "de").await.unwrap(), "de translation for key 2");
        assert_eq!(service.translate("Unknown_Key", "de").await.unwrap(), "Unknown_Key");

        // Only the first call reaches the remote api.
        assert_eq!(client.translation_requests(), vec!["de".to_string()]);
        assert_eq!(cache.translation_stores(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_translate_rejects_blank_input() {
        let (service, _) = service_with(settings(), client());
        assert!(service.translate("", "de").await.unwrap_err().is_invalid_argument());
        assert!(service.translate(KEY_1, " ").await.unwrap_err().is_invalid_argument());
        assert!(service.get_translations("").await.unwrap_err().is_invalid_argument());
        assert!(service.create_context("").unwrap_err().is_invalid_argument());
    }

    #[test_log::test(tokio::test)]
    async fn test_translate_falls_back_to_key() {
        let client = client().with_translation_failure("fr", ScriptedFailure::NotAvailable);
        let (service, _) = service_with(settings(), client);

        assert_eq!(service.translate(KEY_1, "fr").await.unwrap(), KEY_1);
        // Empty remote answers count as not available.
        assert_eq!(service.translate(KEY_1, "it").await.unwrap(), KEY_1);
    }

    #[test_log::test(tokio::test)]
    async fn test_translate_surfaces_authorization_failures() {
        let client = client().with_translation_failure("de", ScriptedFailure::Unauthorized);
        let (service, _) = service_with(settings(), client);
        assert!(matches!(
            service.translate(KEY_1, "de").await,
            Err(Error::AuthorizationFailed(_))
        ));
    }

    #[test_log::test(tokio::test)]
    async fn test_dev_mode() {
        let client = client();
        let (service, _) = service_with(
            CalingaSettings {
                is_dev_mode: true,
                ..settings()
            },
            client.clone(),
        );

        assert_eq!(service.translate(KEY_1, "de").await.unwrap(), KEY_1);
        assert!(client.translation_requests().is_empty());

        let translations = service.get_translations("de").await.unwrap();
        assert_eq!(translations.get(KEY_1).map(String::as_str), Some(KEY_1));
        assert_eq!(translations.get(KEY_2).map(String::as_str), Some(KEY_2));
    }

    #[test_log::test(tokio::test)]
    async fn test_cache_hit_skips_remote() {
        let client = client();
        let (service, cache) = service_with(settings(), client.clone());
        cache
            .store_translations("de", Arc::new(TranslationMap::from([(KEY_1.to_string(), "cached".to_string())])))
            .await
            .unwrap();

        assert_eq!(service.translate(KEY_1, "de").await.unwrap(), "cached");
        assert!(client.translation_requests().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_cache_faults_are_treated_as_miss() {
        let client = client();
        let service = CalingaService::new(settings(), Arc::new(FaultyCache), Arc::new(client.clone())).unwrap();

        assert_eq!(service.translate(KEY_1, "de").await.unwrap(), "de translation for key 1");
        assert_eq!(service.get_languages().await.unwrap(), vec!["de".to_string(), "en".to_string()]);
        assert_eq!(client.translation_requests(), vec!["de".to_string()]);
    }

    #[test_log::test(tokio::test)]
    async fn test_use_cache_only() {
        let client = client();
        let (service, cache) = service_with(
            CalingaSettings {
                use_cache_only: true,
                ..settings()
            },
            client.clone(),
        );

        let e = service.get_translations("de").await.unwrap_err();
        assert!(matches!(e, Error::TranslationsNotAvailable { .. }));
        assert_eq!(service.translate(KEY_1, "de").await.unwrap(), KEY_1);
        let e = service.languages().await.unwrap_err();
        assert!(matches!(e, Error::LanguagesNotAvailable { .. }));

        cache
            .store_translations("de", Arc::new(TranslationMap::from([(KEY_1.to_string(), "cached".to_string())])))
            .await
            .unwrap();
        assert_eq!(service.translate(KEY_1, "de").await.unwrap(), "cached");

        assert!(client.translation_requests().is_empty());
        assert_eq!(client.language_requests(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn test_fallback_to_reference_language() {
        let client = client().with_translation_failure("fr", ScriptedFailure::NotFound);
        let (service, _) = service_with(
            CalingaSettings {
                fallback_to_reference_language: true,
                ..settings()
            },
            client.clone(),
        );

        let translations = service.get_translations("fr").await.unwrap();
        assert_eq!(translations.get(KEY_1).map(String::as_str), Some("en translation for key 1"));
        assert_eq!(service.translate(KEY_2, "fr").await.unwrap(), "en translation for key 2");
        assert_eq!(client.translation_requests()[..2], ["fr".to_string(), "en".to_string()]);
    }

    #[test_log::test(tokio::test)]
    async fn test_no_fallback_without_setting_or_for_reference_itself() {
        let client = client().with_translation_failure("fr", ScriptedFailure::NotFound);
        let (service, _) = service_with(settings(), client.clone());
        assert!(service.get_translations("fr").await.unwrap_err().is_not_found());
        assert_eq!(client.language_requests(), 0);

        let client = ScriptedClient::new()
            .with_translation_failure("en", ScriptedFailure::NotAvailable)
            .with_languages(vec![Language::new("en", true)]);
        let (service, _) = service_with(
            CalingaSettings {
                fallback_to_reference_language: true,
                ..settings()
            },
            client.clone(),
        );
        assert!(service.get_translations("en").await.unwrap_err().is_not_available());
        assert_eq!(client.translation_requests(), vec!["en".to_string()]);
    }

    #[test_log::test(tokio::test)]
    async fn test_languages() {
        let client = client();
        let (service, cache) = service_with(settings(), client.clone());

        assert_eq!(service.get_languages().await.unwrap(), vec!["de".to_string(), "en".to_string()]);
        assert_eq!(service.get_reference_language().await.unwrap(), "en");
        assert_eq!(
            service.languages().await.unwrap(),
            vec![Language::new("de", false), Language::new("en", true)]
        );

        assert_eq!(client.language_requests(), 1);
        assert_eq!(cache.language_stores(), 1);
        assert_eq!(cache.language_gets(), 3);
    }

    #[test_log::test(tokio::test)]
    async fn test_reference_language_missing() {
        let client = ScriptedClient::new().with_languages(vec![Language::new("de", false)]);
        let (service, _) = service_with(settings(), client);
        let e = service.get_reference_language().await.unwrap_err();
        assert!(matches!(e, Error::LanguagesNotAvailable { .. }));
    }

    #[test_log::test(tokio::test)]
    async fn test_clear_cache() {
        let client = client();
        let (service, cache) = service_with(settings(), client.clone());

        service.translate(KEY_1, "de").await.unwrap();
        service.clear_cache().await.unwrap();
        assert_eq!(cache.clears(), 1);

        service.translate(KEY_1, "de").await.unwrap();
        assert_eq!(client.translation_requests(), vec!["de".to_string(), "de".to_string()]);
    }
}
