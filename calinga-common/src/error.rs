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

/// Boxed source error carried by the "not available" variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error of calinga.
///
/// "Not found in cache" is never an error, see [`crate::response::CacheResponse`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Translations could not be obtained from a cache level or the remote service.
    #[error("translations not available: {message}")]
    TranslationsNotAvailable {
        /// Description of the failure.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<BoxError>,
    },
    /// The language list could not be obtained from a cache level or the remote service.
    #[error("languages not available: {message}")]
    LanguagesNotAvailable {
        /// Description of the failure.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<BoxError>,
    },
    /// The remote service does not know the requested translations.
    #[error("translations not found: {0}")]
    TranslationsNotFound(String),
    /// The remote service rejected the api token.
    #[error("authorization failed: {0}")]
    AuthorizationFailed(String),
    /// Caller supplied input that can never succeed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Malformed json, either on disk or in a response body.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Translations not available without an underlying cause.
    pub fn translations_not_available(message: impl Into<String>) -> Self {
        Self::TranslationsNotAvailable {
            message: message.into(),
            source: None,
        }
    }

    /// Translations not available caused by `source`.
    pub fn translations_not_available_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::TranslationsNotAvailable {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Languages not available without an underlying cause.
    pub fn languages_not_available(message: impl Into<String>) -> Self {
        Self::LanguagesNotAvailable {
            message: message.into(),
            source: None,
        }
    }

    /// Languages not available caused by `source`.
    pub fn languages_not_available_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::LanguagesNotAvailable {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Invalid argument.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns `true` for errors that mean "data could not be obtained right now".
    pub fn is_not_available(&self) -> bool {
        matches!(
            self,
            Self::TranslationsNotAvailable { .. } | Self::LanguagesNotAvailable { .. }
        )
    }

    /// Returns `true` if the remote service reported the translations as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TranslationsNotFound(_))
    }

    /// Returns `true` for caller input errors.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Result type for calinga.
pub type Result<T> = core::result::Result<T, Error>;
