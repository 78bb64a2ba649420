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
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;

use crate::asyncify::asyncify;

/// An entry returned by [`FileSystem::list_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Filesystem primitives used by the file cache.
///
/// All text is UTF-8 and always read or written as a whole.
#[async_trait]
pub trait FileSystem: Send + Sync + Debug + 'static {
    /// Whether a regular file exists at `path`.
    async fn file_exists(&self, path: &Path) -> io::Result<bool>;

    /// Create `path` and all missing parents. Succeeds if the directory already exists.
    async fn create_directory(&self, path: &Path) -> io::Result<()>;

    /// Read the whole file.
    async fn read_all_text(&self, path: &Path) -> io::Result<String>;

    /// Create or overwrite the file with `contents`.
    async fn write_all_text(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Atomically move `source` to `destination`.
    ///
    /// If `destination` exists and `backup` is given, the previous content of `destination` is preserved at
    /// `backup`. `destination` is never observed absent or partially written.
    async fn replace_file(&self, source: &Path, destination: &Path, backup: Option<&Path>) -> io::Result<()>;

    /// Delete a file.
    async fn delete_file(&self, path: &Path) -> io::Result<()>;

    /// Delete a directory, with all its contents if `recursive` is set.
    async fn delete_directory(&self, path: &Path, recursive: bool) -> io::Result<()>;

    /// List the direct children of a directory.
    async fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Clear the read-only flag of a file and truncate it to zero length.
    async fn truncate_file(&self, path: &Path) -> io::Result<()>;
}

/// [`FileSystem`] on the local disk.
///
/// Blocking calls run on the tokio blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn file_exists(&self, path: &Path) -> io::Result<bool> {
        let path = path.to_path_buf();
        asyncify(move || match std::fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        })
        .await
    }

    async fn create_directory(&self, path: &Path) -> io::Result<()> {
        let path = path.to_path_buf();
        asyncify(move || std::fs::create_dir_all(path)).await
    }

    async fn read_all_text(&self, path: &Path) -> io::Result<String> {
        let path = path.to_path_buf();
        asyncify(move || std::fs::read_to_string(path)).await
    }

    async fn write_all_text(&self, path: &Path, contents: &str) -> io::Result<()> {
        let path = path.to_path_buf();
        let contents = contents.to_string();
        asyncify(move || std::fs::write(path, contents)).await
    }

    async fn replace_file(&self, source: &Path, destination: &Path, backup: Option<&Path>) -> io::Result<()> {
        let source = source.to_path_buf();
        let destination = destination.to_path_buf();
        let backup = backup.map(Path::to_path_buf);
        asyncify(move || {
            if let Some(backup) = backup {
                if destination.is_file() {
                    std::fs::copy(&destination, backup)?;
                }
            }
            std::fs::rename(source, destination)
        })
        .await
    }

    async fn delete_file(&self, path: &Path) -> io::Result<()> {
        let path = path.to_path_buf();
        asyncify(move || std::fs::remove_file(path)).await
    }

    async fn delete_directory(&self, path: &Path, recursive: bool) -> io::Result<()> {
        let path = path.to_path_buf();
        asyncify(move || {
            if recursive {
                std::fs::remove_dir_all(path)
            } else {
                std::fs::remove_dir(path)
            }
        })
        .await
    }

    async fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let path = path.to_path_buf();
        asyncify(move || {
            let mut entries = vec![];
            for entry in std::fs::read_dir(path)? {
                let entry = entry?;
                let is_dir = entry.file_type()?.is_dir();
                entries.push(DirEntry {
                    path: entry.path(),
                    is_dir,
                });
            }
            entries.sort_by(|a, b| a.path.cmp(&b.path));
            Ok(entries)
        })
        .await
    }

    async fn truncate_file(&self, path: &Path) -> io::Result<()> {
        let path = path.to_path_buf();
        asyncify(move || {
            let mut perms = std::fs::metadata(&path)?.permissions();
            if perms.readonly() {
                #[expect(clippy::permissions_set_readonly_false)]
                perms.set_readonly(false);
                std::fs::set_permissions(&path, perms)?;
            }
            OpenOptions::new().write(true).truncate(true).open(&path)?;
            Ok(())
        })
        .await
    }
}
