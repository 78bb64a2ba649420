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

use calinga_common::error::Result;

use crate::service::CalingaService;

/// A [`CalingaService`] bound to one language.
#[derive(Debug, Clone)]
pub struct LanguageContext {
    language: String,
    service: CalingaService,
}

impl LanguageContext {
    pub(crate) fn new(language: &str, service: CalingaService) -> Self {
        Self {
            language: language.to_string(),
            service,
        }
    }

    /// The bound language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Translate `key` into the bound language.
    pub async fn translate(&self, key: &str) -> Result<String> {
        self.service.translate(key, &self.language).await
    }
}
