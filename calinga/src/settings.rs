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
    fmt::Debug,
    path::{Path, PathBuf},
};

use calinga_common::error::{Error, Result};
use calinga_memory::MemoryCacheConfig;
use calinga_storage::FileCacheConfig;
use serde::{Deserialize, Serialize};

/// Consumer api used when none is configured.
pub const DEFAULT_CONSUMER_API_BASE_URL: &str = "https://api.calinga.io/v3";

/// Settings of a [`CalingaService`](crate::CalingaService).
///
/// Field names follow the camelCase json layout of calinga settings files. Missing fields take their default.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalingaSettings {
    /// Organization name.
    pub organization: String,
    /// Team name.
    pub team: String,
    /// Project name.
    pub project: String,
    /// Token sent with every consumer api request.
    pub api_token: String,
    /// Request draft translations as well.
    pub include_drafts: bool,
    /// Translate every key to itself.
    pub is_dev_mode: bool,
    /// Root directory of the file cache.
    pub cache_directory: PathBuf,
    /// Base url of the consumer api.
    pub consumer_api_base_url: String,
    /// Time to live of the memory cache in seconds, `0` meaning never.
    pub memory_cache_expiration_interval_in_seconds: u64,
    /// Never write or clear the file cache.
    pub do_not_write_cache_files: bool,
    /// Never contact the consumer api.
    pub use_cache_only: bool,
    /// Serve the reference language when the requested one is not available.
    pub fallback_to_reference_language: bool,
}

impl Default for CalingaSettings {
    fn default() -> Self {
        Self {
            organization: String::new(),
            team: String::new(),
            project: String::new(),
            api_token: String::new(),
            include_drafts: false,
            is_dev_mode: false,
            cache_directory: PathBuf::new(),
            consumer_api_base_url: DEFAULT_CONSUMER_API_BASE_URL.to_string(),
            memory_cache_expiration_interval_in_seconds: 0,
            do_not_write_cache_files: false,
            use_cache_only: false,
            fallback_to_reference_language: false,
        }
    }
}

impl Debug for CalingaSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalingaSettings")
            .field("organization", &self.organization)
            .field("team", &self.team)
            .field("project", &self.project)
            .field("api_token", &"<redacted>")
            .field("include_drafts", &self.include_drafts)
            .field("is_dev_mode", &self.is_dev_mode)
            .field("cache_directory", &self.cache_directory)
            .field("consumer_api_base_url", &self.consumer_api_base_url)
            .field(
                "memory_cache_expiration_interval_in_seconds",
                &self.memory_cache_expiration_interval_in_seconds,
            )
            .field("do_not_write_cache_files", &self.do_not_write_cache_files)
            .field("use_cache_only", &self.use_cache_only)
            .field("fallback_to_reference_language", &self.fallback_to_reference_language)
            .finish()
    }
}

impl CalingaSettings {
    /// Load settings from a json file and validate them.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse settings from json and validate them.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that can never work.
    pub fn validate(&self) -> Result<()> {
        if self.organization.trim().is_empty() {
            return Err(Error::invalid_argument("organization must not be empty"));
        }
        if self.project.trim().is_empty() {
            return Err(Error::invalid_argument("project must not be empty"));
        }
        if self.cache_directory.as_os_str().is_empty() {
            return Err(Error::invalid_argument("cache directory must not be empty"));
        }
        Ok(())
    }
}

impl From<&CalingaSettings> for MemoryCacheConfig {
    fn from(settings: &CalingaSettings) -> Self {
        MemoryCacheConfig::from_secs(settings.memory_cache_expiration_interval_in_seconds)
    }
}

impl From<&CalingaSettings> for FileCacheConfig {
    fn from(settings: &CalingaSettings) -> Self {
        FileCacheConfig {
            cache_directory: settings.cache_directory.clone(),
            organization: settings.organization.clone(),
            team: settings.team.clone(),
            project: settings.project.clone(),
            do_not_write_cache_files: settings.do_not_write_cache_files,
        }
    }
}
