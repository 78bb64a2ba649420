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
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use calinga_common::{
    cache::TranslationCache,
    error::{Error, Result},
    fs::{FileSystem, LocalFileSystem},
    language::{Language, TranslationMap},
    response::CacheResponse,
};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::{
    locks::LockTable,
    naming::{backup_file_name, temp_file_name, translations_file_name, LANGUAGES_FILE_NAME},
};

/// Configuration of a [`FileCache`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCacheConfig {
    /// Root of all cached projects.
    pub cache_directory: PathBuf,
    /// Organization name, first path component under the root.
    pub organization: String,
    /// Team name, second path component under the root.
    pub team: String,
    /// Project name, third path component under the root.
    pub project: String,
    /// Turn stores and clears into no-ops. Reads still serve existing documents.
    pub do_not_write_cache_files: bool,
}

impl FileCacheConfig {
    /// Directory holding the documents of the configured project.
    pub fn project_directory(&self) -> PathBuf {
        self.cache_directory
            .join(&self.organization)
            .join(&self.team)
            .join(&self.project)
    }
}

/// Builder of [`FileCache`].
#[derive(Debug)]
pub struct FileCacheBuilder {
    config: FileCacheConfig,
    fs: Arc<dyn FileSystem>,
}

impl FileCacheBuilder {
    /// Create a builder for the given config on the local disk.
    pub fn new(config: FileCacheConfig) -> Self {
        Self {
            config,
            fs: Arc::new(LocalFileSystem),
        }
    }

    /// Set the filesystem documents are stored on.
    ///
    /// Default: [`LocalFileSystem`].
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Build the file cache.
    pub fn build(self) -> FileCache {
        let dir = self.config.project_directory();
        FileCache {
            inner: Arc::new(FileCacheInner {
                dir,
                do_not_write: self.config.do_not_write_cache_files,
                fs: self.fs,
                locks: LockTable::default(),
                dir_lock: RwLock::new(()),
            }),
        }
    }
}

#[derive(Debug)]
struct FileCacheInner {
    dir: PathBuf,
    do_not_write: bool,
    fs: Arc<dyn FileSystem>,
    /// Serializes stores of the same document.
    locks: LockTable,
    /// Held shared by stores, exclusively by clear.
    dir_lock: RwLock<()>,
}

/// Durable cache level with crash-safe writes.
///
/// Reads surface I/O faults and malformed documents, writes absorb every failure except invalid input.
#[derive(Debug, Clone)]
pub struct FileCache {
    inner: Arc<FileCacheInner>,
}

impl FileCache {
    /// Create a file cache for the given config on the local disk.
    pub fn new(config: FileCacheConfig) -> Self {
        FileCacheBuilder::new(config).build()
    }

    /// Directory holding the documents of the configured project.
    pub fn directory(&self) -> &Path {
        &self.inner.dir
    }

    /// Read a document. `Ok(None)` if it does not exist.
    async fn read<T>(&self, path: &Path) -> io::Result<Option<T>>
    where
        T: DeserializeOwned + Default,
    {
        let fs = &self.inner.fs;
        if !fs.file_exists(path).await? {
            return Ok(None);
        }
        let text = match fs.read_all_text(path).await {
            Ok(text) => text,
            // Removed between the check and the read.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if text.trim().is_empty() {
            return Ok(Some(T::default()));
        }
        serde_json::from_str(&text).map(Some).map_err(io::Error::from)
    }

    async fn store<T>(&self, file_name: &str, value: &T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        if self.inner.do_not_write {
            return Ok(());
        }

        let path = self.inner.dir.join(file_name);
        let temp = self.inner.dir.join(temp_file_name(file_name));
        let backup = self.inner.dir.join(backup_file_name(file_name));

        let _dir_guard = self.inner.dir_lock.read().await;
        let lock = self.inner.locks.get(&path);
        let _guard = lock.lock().await;

        match self.commit::<T>(value, &path, &temp, &backup).await {
            Ok(true) => tracing::info!("[file cache]: stored in cache, path: {}", path.display()),
            Ok(false) => self.remove_temp(&temp).await,
            Err(e) => {
                tracing::warn!("[file cache]: store failed, path: {}, error: {e}", path.display());
                self.remove_temp(&temp).await;
            }
        }
        Ok(())
    }

    /// Write `value` to `temp`, validate it and move it into place.
    ///
    /// Returns `false` if validation failed and the committed document was left untouched.
    async fn commit<T>(&self, value: &T, path: &Path, temp: &Path, backup: &Path) -> io::Result<bool>
    where
        T: Serialize + DeserializeOwned,
    {
        let fs = &self.inner.fs;
        let json = serde_json::to_string(value)?;

        fs.create_directory(&self.inner.dir).await?;
        fs.write_all_text(temp, &json).await?;

        let written = fs.read_all_text(temp).await?;
        if let Err(e) = serde_json::from_str::<T>(&written) {
            tracing::warn!(
                "[file cache]: validation of written document failed, path: {}, error: {e}",
                temp.display()
            );
            return Ok(false);
        }

        let backup = if fs.file_exists(path).await? { Some(backup) } else { None };
        fs.replace_file(temp, path, backup).await?;
        Ok(true)
    }

    async fn remove_temp(&self, temp: &Path) {
        match self.inner.fs.delete_file(temp).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "[file cache]: remove temporary file failed, path: {}, error: {e}",
                temp.display()
            ),
        }
    }

    /// Delete a file, or truncate it in place if it cannot be deleted.
    async fn wipe_file(&self, path: &Path) {
        let fs = &self.inner.fs;
        let e = match fs.delete_file(path).await {
            Ok(()) => return,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return,
            Err(e) => e,
        };
        tracing::warn!(
            "[file cache]: delete failed, truncate in place, path: {}, error: {e}",
            path.display()
        );
        if let Err(e) = fs.truncate_file(path).await {
            tracing::warn!("[file cache]: truncate failed, path: {}, error: {e}", path.display());
        }
    }
}

fn read_fault(path: &Path, e: io::Error, not_available: impl FnOnce(String, io::Error) -> Error) -> Error {
    tracing::warn!("[file cache]: read failed, path: {}, error: {e}", path.display());
    match e.downcast::<serde_json::Error>() {
        Ok(e) => Error::Json(e),
        Err(e) => not_available(format!("the file could not be read, path: {}", path.display()), e),
    }
}

#[async_trait]
impl TranslationCache for FileCache {
    async fn get_translations(
        &self,
        language: &str,
        _include_drafts: bool,
    ) -> Result<CacheResponse<Arc<TranslationMap>>> {
        let path = self.inner.dir.join(translations_file_name(language)?);
        match self.read::<TranslationMap>(&path).await {
            Ok(Some(translations)) => Ok(CacheResponse::found(Arc::new(translations))),
            Ok(None) => Ok(CacheResponse::empty()),
            Err(e) => Err(read_fault(&path, e, |m, e| Error::translations_not_available_with(m, e))),
        }
    }

    async fn get_languages(&self) -> Result<CacheResponse<Vec<Language>>> {
        let path = self.inner.dir.join(LANGUAGES_FILE_NAME);
        match self.read::<Vec<Language>>(&path).await {
            Ok(Some(languages)) => Ok(CacheResponse::found(languages)),
            Ok(None) => Ok(CacheResponse::empty()),
            Err(e) => Err(read_fault(&path, e, |m, e| Error::languages_not_available_with(m, e))),
        }
    }

    async fn store_translations(&self, language: &str, translations: Arc<TranslationMap>) -> Result<()> {
        let file_name = translations_file_name(language)?;
        self.store(&file_name, translations.as_ref()).await
    }

    async fn store_languages(&self, languages: &[Language]) -> Result<()> {
        self.store(LANGUAGES_FILE_NAME, &languages.to_vec()).await
    }

    async fn clear(&self) -> Result<()> {
        if self.inner.do_not_write {
            return Ok(());
        }

        let fs = &self.inner.fs;
        let _dir_guard = self.inner.dir_lock.write().await;

        // Directories in discovery order, a parent always precedes its children.
        let mut dirs = vec![];
        let mut stack = vec![self.inner.dir.clone()];
        while let Some(dir) = stack.pop() {
            let entries = match fs.list_directory(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!("[file cache]: list directory failed, path: {}, error: {e}", dir.display());
                    continue;
                }
            };
            for entry in entries {
                if entry.is_dir {
                    dirs.push(entry.path.clone());
                    stack.push(entry.path);
                } else {
                    self.wipe_file(&entry.path).await;
                }
            }
        }

        for dir in dirs.iter().rev() {
            if let Err(e) = fs.delete_directory(dir, false).await {
                tracing::warn!("[file cache]: delete directory failed, path: {}, error: {e}", dir.display());
            }
        }

        tracing::info!("[file cache]: cleared, path: {}", self.inner.dir.display());
        Ok(())
    }
}
