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

/// Result of a cache lookup.
///
/// A miss always carries the default (empty) value of `T`. The fields are private so that a miss with a non-empty
/// value cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheResponse<T> {
    result: T,
    found_in_cache: bool,
}

impl<T> CacheResponse<T> {
    /// A hit carrying `result`.
    pub fn found(result: T) -> Self {
        Self {
            result,
            found_in_cache: true,
        }
    }

    /// Whether the lookup was a hit.
    pub fn found_in_cache(&self) -> bool {
        self.found_in_cache
    }

    /// The looked up value, empty on a miss.
    pub fn result(&self) -> &T {
        &self.result
    }

    /// Consume the response and return the looked up value.
    pub fn into_result(self) -> T {
        self.result
    }

    /// Returns the value on a hit, `None` on a miss.
    pub fn into_found(self) -> Option<T> {
        self.found_in_cache.then_some(self.result)
    }
}

impl<T: Default> CacheResponse<T> {
    /// A miss.
    pub fn empty() -> Self {
        Self {
            result: T::default(),
            found_in_cache: false,
        }
    }
}

impl<T: Default> Default for CacheResponse<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::language::{Language, TranslationMap};

    #[test]
    fn test_miss_is_empty() {
        let r = CacheResponse::<Arc<TranslationMap>>::empty();
        assert!(!r.found_in_cache());
        assert!(r.result().is_empty());
        assert!(r.into_found().is_none());

        let r = CacheResponse::<Vec<Language>>::default();
        assert!(!r.found_in_cache());
        assert!(r.into_result().is_empty());
    }

    #[test]
    fn test_hit() {
        let r = CacheResponse::found(vec![Language::new("de", true)]);
        assert!(r.found_in_cache());
        assert_eq!(r.result().len(), 1);
        assert_eq!(r.into_found(), Some(vec![Language::new("de", true)]));

        // An empty value can still be a hit.
        let r = CacheResponse::found(Vec::<Language>::new());
        assert!(r.found_in_cache());
    }
}
