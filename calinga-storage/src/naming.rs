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

use calinga_common::{
    error::Result,
    language::{is_identifier_char, validate_language},
};

/// File name of the cached language list.
pub const LANGUAGES_FILE_NAME: &str = "Languages.json";

const TEMP_SUFFIX: &str = ".temp";
const BACKUP_SUFFIX: &str = ".prev";

/// File name of the cached translations of `language`.
///
/// Identifiers rejected by [`validate_language`] yield `InvalidArgument`. Characters other than alphanumerics
/// and `_-~` are stripped and the rest is upper-cased, e.g. `de` becomes `DE.json`.
pub fn translations_file_name(language: &str) -> Result<String> {
    validate_language(language)?;
    let sanitized = language
        .chars()
        .filter(|c| is_identifier_char(*c))
        .collect::<String>()
        .to_uppercase();
    Ok(format!("{sanitized}.json"))
}

/// Transient file a document is written to before it is moved into place.
pub(crate) fn temp_file_name(file_name: &str) -> String {
    format!("{file_name}{TEMP_SUFFIX}")
}

/// File the previous document is preserved at when it is replaced.
pub(crate) fn backup_file_name(file_name: &str) -> String {
    format!("{file_name}{BACKUP_SUFFIX}")
}
