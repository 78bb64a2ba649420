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

use std::fmt::Debug;

use async_trait::async_trait;
use calinga_common::{
    error::{Error, Result},
    language::{Language, TranslationMap},
};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::settings::CalingaSettings;

/// Header carrying the api token.
pub const API_TOKEN_HEADER: &str = "api-token";

/// Access to the remote consumer api.
#[async_trait]
pub trait ConsumerClient: Send + Sync + Debug + 'static {
    /// Fetch the translations of `language`.
    ///
    /// Fails with [`Error::AuthorizationFailed`] on a rejected token, [`Error::TranslationsNotFound`] if the api does
    /// not know the language and [`Error::TranslationsNotAvailable`] on any other failure.
    async fn get_translations(&self, language: &str) -> Result<TranslationMap>;

    /// Fetch the languages of the project.
    ///
    /// Fails with [`Error::AuthorizationFailed`] on a rejected token and [`Error::LanguagesNotAvailable`] on any other
    /// failure.
    async fn get_languages(&self) -> Result<Vec<Language>>;
}

#[derive(Debug, Deserialize)]
struct RemoteLanguage {
    name: String,
    #[serde(default)]
    tag: Option<String>,
    #[serde(rename = "isReference", default)]
    is_reference: bool,
}

impl From<RemoteLanguage> for Language {
    fn from(remote: RemoteLanguage) -> Self {
        Language::tagged(&remote.name, remote.tag.as_deref(), remote.is_reference)
    }
}

/// [`ConsumerClient`] talking http to the calinga consumer api.
#[derive(Clone)]
pub struct HttpConsumerClient {
    client: reqwest::Client,
    base_url: String,
    organization: String,
    team: String,
    project: String,
    api_token: String,
    include_drafts: bool,
}

impl Debug for HttpConsumerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConsumerClient")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("team", &self.team)
            .field("project", &self.project)
            .field("include_drafts", &self.include_drafts)
            .finish_non_exhaustive()
    }
}

impl HttpConsumerClient {
    /// Create a client with a default [`reqwest::Client`].
    pub fn new(settings: &CalingaSettings) -> Self {
        Self::with_client(settings, reqwest::Client::new())
    }

    /// Create a client on top of an existing [`reqwest::Client`].
    pub fn with_client(settings: &CalingaSettings, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: settings.consumer_api_base_url.clone(),
            organization: settings.organization.clone(),
            team: settings.team.clone(),
            project: settings.project.clone(),
            api_token: settings.api_token.clone(),
            include_drafts: settings.include_drafts,
        }
    }

    /// `{base}/{organization}/{team}/{project}/languages[/{language}]`.
    fn languages_url(&self, language: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_argument(format!("invalid consumer api base url {}: {e}", self.base_url)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::invalid_argument(format!("consumer api base url {} cannot be a base", self.base_url))
            })?;
            segments
                .pop_if_empty()
                .extend([self.organization.as_str(), self.team.as_str(), self.project.as_str(), "languages"]);
            if let Some(language) = language {
                segments.push(language);
            }
        }
        Ok(url)
    }

    fn scope(&self, language: &str) -> String {
        format!(
            "organization = '{}', team = '{}', project = '{}', language = '{language}'",
            self.organization, self.team, self.project
        )
    }
}

#[async_trait]
impl ConsumerClient for HttpConsumerClient {
    async fn get_translations(&self, language: &str) -> Result<TranslationMap> {
        let mut url = self.languages_url(Some(language))?;
        if self.include_drafts {
            url.query_pairs_mut().append_pair("includeDrafts", "true");
        }

        let response = self
            .client
            .get(url)
            .header(API_TOKEN_HEADER, &self.api_token)
            .send()
            .await
            .map_err(|e| Error::translations_not_available_with("failed to fetch translations", e))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(Error::AuthorizationFailed(self.scope(language))),
            StatusCode::NOT_FOUND => return Err(Error::TranslationsNotFound(self.scope(language))),
            status if !status.is_success() => {
                return Err(Error::translations_not_available(format!(
                    "failed to fetch translations, status: {status}, {}",
                    self.scope(language)
                )))
            }
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::translations_not_available_with("failed to read translations", e))?;
        let translations = serde_json::from_str(&body)?;
        Ok(translations)
    }

    async fn get_languages(&self) -> Result<Vec<Language>> {
        let url = self.languages_url(None)?;

        let response = self
            .client
            .get(url)
            .header(API_TOKEN_HEADER, &self.api_token)
            .send()
            .await
            .map_err(|e| Error::languages_not_available_with("failed to fetch languages", e))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                return Err(Error::AuthorizationFailed(format!(
                    "organization = '{}', team = '{}', project = '{}'",
                    self.organization, self.team, self.project
                )))
            }
            status if !status.is_success() => {
                return Err(Error::languages_not_available(format!(
                    "failed to fetch languages, status: {status}"
                )))
            }
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::languages_not_available_with("failed to read languages", e))?;
        let languages: Vec<RemoteLanguage> = serde_json::from_str(&body)
            .map_err(|e| Error::languages_not_available_with("malformed languages", e))?;
        Ok(languages.into_iter().map(Language::from).collect())
    }
}
