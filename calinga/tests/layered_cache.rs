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

use std::{path::Path, sync::Arc, time::Duration};

use calinga::prelude::*;
use calinga_common::test_utils::MockClock;

const KEY_1: &str = "UnitTest_Key1";

fn translations(language: &str) -> Arc<TranslationMap> {
    Arc::new(TranslationMap::from([(
        KEY_1.to_string(),
        format!("{language} translation for key 1"),
    )]))
}

fn file_cache(root: &Path) -> FileCache {
    FileCache::new(FileCacheConfig {
        cache_directory: root.to_path_buf(),
        organization: "org".to_string(),
        team: "team".to_string(),
        project: "project".to_string(),
        do_not_write_cache_files: false,
    })
}

#[test_log::test(tokio::test)]
async fn test_file_cache_document_layout() {
    let dir = tempfile::tempdir().unwrap();
    let cache = file_cache(dir.path());

    cache.store_translations("de", translations("de")).await.unwrap();

    let path = dir.path().join("org/team/project/DE.json");
    assert!(path.exists());
    let on_disk: TranslationMap = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk[KEY_1], "de translation for key 1");

    let res = cache.get_translations("de", false).await.unwrap();
    assert!(res.found_in_cache());
    assert_eq!(res.into_result(), translations("de"));
}

#[test_log::test(tokio::test)]
async fn test_memory_over_file_cascade() {
    let dir = tempfile::tempdir().unwrap();
    let clock = MockClock::new();
    let memory = Arc::new(
        MemoryCacheBuilder::new()
            .with_expiration(Duration::from_secs(2))
            .with_clock(Arc::new(clock.clone()))
            .build(),
    );
    let file = Arc::new(file_cache(dir.path()));
    let cascade = CascadedCache::new(vec![memory.clone(), file.clone()]);

    cascade.store_translations("de", translations("de")).await.unwrap();
    assert!(memory.get_translations("de", false).await.unwrap().found_in_cache());
    assert!(file.get_translations("de", false).await.unwrap().found_in_cache());

    // The memory level expires, the file level still has the document and refills it.
    clock.advance(Duration::from_secs(7));
    assert!(!memory.get_translations("de", false).await.unwrap().found_in_cache());
    let res = cascade.get_translations("de", false).await.unwrap();
    assert_eq!(res.into_result(), translations("de"));
    assert!(memory.get_translations("de", false).await.unwrap().found_in_cache());

    // A fresh process only has the file level.
    let restarted = CascadedCache::new(vec![Arc::new(MemoryCache::default()), Arc::new(file_cache(dir.path()))]);
    let res = restarted.get_translations("de", false).await.unwrap();
    assert!(res.found_in_cache());

    cascade.clear().await.unwrap();
    assert!(!restarted.levels()[1].get_translations("de", false).await.unwrap().found_in_cache());
    assert!(!cascade.get_translations("de", false).await.unwrap().found_in_cache());
}

#[test_log::test(tokio::test)]
async fn test_memory_cache_expires_on_the_system_clock() {
    let cache = MemoryCache::new(MemoryCacheConfig::from_secs(2));
    cache.store_translations("de", translations("de")).await.unwrap();
    assert!(cache.get_translations("de", false).await.unwrap().found_in_cache());

    tokio::time::sleep(Duration::from_millis(2100)).await;
    let res = cache.get_translations("de", false).await.unwrap();
    assert!(!res.found_in_cache());
    assert!(res.result().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_path_traversal_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cache = file_cache(dir.path());

    let e = cache.store_translations("../../etc", translations("de")).await.unwrap_err();
    assert!(e.is_invalid_argument());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test_log::test(tokio::test)]
async fn test_cascade_keeps_levels_consistent_for_invalid_language() {
    let dir = tempfile::tempdir().unwrap();
    let memory = Arc::new(MemoryCache::default());
    let cascade = CascadedCache::new(vec![memory.clone(), Arc::new(file_cache(dir.path()))]);

    let e = cascade.store_translations("../../etc", translations("de")).await.unwrap_err();
    assert!(e.is_invalid_argument());

    let e = cascade.get_translations("../../etc", false).await.unwrap_err();
    assert!(e.is_invalid_argument());
    assert!(memory.get_translations("../../etc", false).await.unwrap_err().is_invalid_argument());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    // Valid languages are unaffected.
    cascade.store_translations("de", translations("de")).await.unwrap();
    assert!(cascade.get_translations("de", false).await.unwrap().found_in_cache());
}
