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

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Translation key to translated text.
///
/// Keys are unique and non-empty, values may be empty. Order is irrelevant.
pub type TranslationMap = HashMap<String, String>;

/// Separator between a language name and its tag.
pub const TAG_SEPARATOR: char = '~';

/// A language available for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Language name, e.g. `en` or `en-GB~Intranet` for a tagged language.
    pub name: String,
    /// Whether this is the reference language of the project.
    #[serde(rename = "isReference", default)]
    pub is_reference: bool,
}

impl Language {
    /// Create a language from its name.
    pub fn new(name: impl Into<String>, is_reference: bool) -> Self {
        Self {
            name: name.into(),
            is_reference,
        }
    }

    /// Create a language from a base name and an optional tag.
    ///
    /// A non-empty tag is appended to the name with [`TAG_SEPARATOR`].
    pub fn tagged(name: &str, tag: Option<&str>, is_reference: bool) -> Self {
        let name = match tag {
            Some(tag) if !tag.is_empty() => format!("{name}{TAG_SEPARATOR}{tag}"),
            _ => name.to_string(),
        };
        Self { name, is_reference }
    }
}

/// Returns the first reference language of `languages`, if any.
pub fn reference_language(languages: &[Language]) -> Option<&Language> {
    languages.iter().find(|l| l.is_reference)
}

/// Whether `c` may appear in the file name derived from a language identifier.
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '~')
}

fn is_absolute(language: &str) -> bool {
    let bytes = language.as_bytes();
    let drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    language.starts_with('/') || language.starts_with('\\') || drive || Path::new(language).is_absolute()
}

/// Reject language identifiers no cache level may hold.
///
/// Empty identifiers, identifiers with parent directory traversal, absolute paths and identifiers without any
/// [identifier character](is_identifier_char) are invalid.
pub fn validate_language(language: &str) -> Result<()> {
    if language.trim().is_empty() {
        return Err(Error::invalid_argument("language must not be empty"));
    }
    if language.contains("..") {
        return Err(Error::invalid_argument(format!(
            "language must not traverse directories: {language}"
        )));
    }
    if is_absolute(language) {
        return Err(Error::invalid_argument(format!(
            "language must not be an absolute path: {language}"
        )));
    }
    if !language.chars().any(is_identifier_char) {
        return Err(Error::invalid_argument(format!(
            "language has no usable characters: {language}"
        )));
    }
    Ok(())
}
