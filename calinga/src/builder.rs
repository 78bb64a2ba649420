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
    clock::{Clock, SystemClock},
    error::Result,
    fs::{FileSystem, LocalFileSystem},
};
use calinga_memory::MemoryCacheBuilder;
use calinga_storage::FileCacheBuilder;

use crate::{
    cascade::CascadedCache,
    client::{ConsumerClient, HttpConsumerClient},
    service::CalingaService,
    settings::CalingaSettings,
};

/// Builder of [`CalingaService`].
///
/// Everything is derived from one [`CalingaSettings`] value. Without overrides the service reads through a
/// [`CascadedCache`] of a memory cache and a file cache and talks http to the consumer api.
pub struct CalingaServiceBuilder {
    settings: CalingaSettings,
    clock: Arc<dyn Clock>,
    fs: Arc<dyn FileSystem>,
    cache: Option<Arc<dyn TranslationCache>>,
    client: Option<Arc<dyn ConsumerClient>>,
    http_client: Option<reqwest::Client>,
}

impl CalingaServiceBuilder {
    /// Create a builder from settings.
    pub fn new(settings: CalingaSettings) -> Self {
        Self {
            settings,
            clock: Arc::new(SystemClock),
            fs: Arc::new(LocalFileSystem),
            cache: None,
            client: None,
            http_client: None,
        }
    }

    /// Set the clock of the memory cache.
    ///
    /// Default: [`SystemClock`].
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the filesystem of the file cache.
    ///
    /// Default: [`LocalFileSystem`].
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Replace the default cascade with a custom cache.
    ///
    /// The clock and filesystem overrides only apply to the default cascade.
    pub fn with_cache(mut self, cache: Arc<dyn TranslationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the http client for the consumer api.
    pub fn with_consumer_client(mut self, client: Arc<dyn ConsumerClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the [`reqwest::Client`] the default consumer client uses.
    ///
    /// Ignored if a consumer client is set with [`Self::with_consumer_client`].
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Validate the settings and build the service.
    pub fn build(self) -> Result<CalingaService> {
        self.settings.validate()?;

        let cache: Arc<dyn TranslationCache> = match self.cache {
            Some(cache) => cache,
            None => {
                let memory = MemoryCacheBuilder::new()
                    .with_config((&self.settings).into())
                    .with_clock(self.clock)
                    .build();
                let file = FileCacheBuilder::new((&self.settings).into())
                    .with_file_system(self.fs)
                    .build();
                Arc::new(CascadedCache::new(vec![Arc::new(memory), Arc::new(file)]))
            }
        };

        let client: Arc<dyn ConsumerClient> = match self.client {
            Some(client) => client,
            None => {
                let client = match self.http_client {
                    Some(http_client) => HttpConsumerClient::with_client(&self.settings, http_client),
                    None => HttpConsumerClient::new(&self.settings),
                };
                Arc::new(client)
            }
        };

        tracing::debug!("[calinga]: build service with settings: {:?}", self.settings);
        CalingaService::new(self.settings, cache, client)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use calinga_common::{
        language::TranslationMap,
        test_utils::{MemoryFileSystem, MockClock},
    };

    use super::*;
    use crate::test_utils::ScriptedClient;

    fn settings() -> CalingaSettings {
        CalingaSettings {
            organization: "org".into(),
            team: "team".into(),
            project: "project".into(),
            cache_directory: "/cache".into(),
            memory_cache_expiration_interval_in_seconds: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_rejects_invalid_settings() {
        let e = CalingaServiceBuilder::new(CalingaSettings::default()).build().unwrap_err();
        assert!(e.is_invalid_argument());
    }

    #[test_log::test(tokio::test)]
    async fn test_default_cascade() {
        let fs = MemoryFileSystem::new();
        let clock = MockClock::new();
        let client = ScriptedClient::new().with_translations("de", [("UnitTest_Key1", "de translation for key 1")]);

        let service = CalingaServiceBuilder::new(settings())
            .with_clock(Arc::new(clock.clone()))
            .with_file_system(Arc::new(fs.clone()))
            .with_consumer_client(Arc::new(client.clone()))
            .build()
            .unwrap();

        assert_eq!(
            service.translate("UnitTest_Key1", "de").await.unwrap(),
            "de translation for key 1"
        );
        // Written through to the file cache.
        let on_disk: TranslationMap =
            serde_json::from_str(&fs.file("/cache/org/team/project/DE.json").unwrap()).unwrap();
        assert_eq!(on_disk["UnitTest_Key1"], "de translation for key 1");

        // After the memory cache expired the file cache serves the language.
        clock.advance(Duration::from_secs(7));
        assert_eq!(
            service.translate("UnitTest_Key1", "de").await.unwrap(),
            "de translation for key 1"
        );
        assert_eq!(client.translation_requests(), vec!["de".to_string()]);
    }

    #[test_log::test(tokio::test)]
    async fn test_custom_cache() {
        let cache = Arc::new(calinga_memory::MemoryCache::default());
        let service = CalingaServiceBuilder::new(settings())
            .with_cache(cache.clone())
            .with_http_client(reqwest::Client::new())
            .build()
            .unwrap();
        assert_eq!(service.settings().project, "project");

        cache
            .store_translations(
                "de",
                Arc::new(TranslationMap::from([("k".to_string(), "v".to_string())])),
            )
            .await
            .unwrap();
        assert_eq!(service.translate("k", "de").await.unwrap(), "v");
    }
}
