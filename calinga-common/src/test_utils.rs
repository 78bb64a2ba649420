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

//! Utilities for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    io,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    clock::Clock,
    fs::{DirEntry, FileSystem},
};

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClock {
    /// Create a clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, duration: Duration) {
        *self.now.lock() += duration;
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// A filesystem operation recorded by [`MemoryFileSystem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOp {
    /// [`FileSystem::file_exists`].
    FileExists(PathBuf),
    /// [`FileSystem::create_directory`].
    CreateDirectory(PathBuf),
    /// [`FileSystem::read_all_text`].
    ReadAllText(PathBuf),
    /// [`FileSystem::write_all_text`].
    WriteAllText(PathBuf),
    /// [`FileSystem::replace_file`].
    ReplaceFile {
        /// Moved file.
        source: PathBuf,
        /// Replaced file.
        destination: PathBuf,
        /// Where the replaced content is preserved.
        backup: Option<PathBuf>,
    },
    /// [`FileSystem::delete_file`].
    DeleteFile(PathBuf),
    /// [`FileSystem::delete_directory`].
    DeleteDirectory(PathBuf),
    /// [`FileSystem::list_directory`].
    ListDirectory(PathBuf),
    /// [`FileSystem::truncate_file`].
    TruncateFile(PathBuf),
}

impl FsOp {
    /// Whether the operation may change the filesystem.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            FsOp::FileExists(_) | FsOp::ReadAllText(_) | FsOp::ListDirectory(_)
        )
    }
}

#[derive(Debug, Default)]
struct MemoryFsState {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    ops: Vec<FsOp>,

    fail_writes: HashSet<PathBuf>,
    fail_reads: HashSet<PathBuf>,
    corrupt_reads: HashMap<PathBuf, String>,
    locked: HashSet<PathBuf>,
}

impl MemoryFsState {
    fn add_dir_all(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.dirs.contains(parent),
            _ => true,
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
}

/// An in-memory [`FileSystem`] with fault injection and an operation log.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    state: Arc<Mutex<MemoryFsState>>,
}

impl MemoryFileSystem {
    /// Create an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a file and its parent directories without recording an operation.
    pub fn insert_file(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
        let path = path.as_ref();
        let mut state = self.state.lock();
        if let Some(parent) = path.parent() {
            state.add_dir_all(parent);
        }
        state.files.insert(path.to_path_buf(), contents.into());
    }

    /// Current content of a file.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state.lock().files.get(path.as_ref()).cloned()
    }

    /// All file paths.
    pub fn files(&self) -> Vec<PathBuf> {
        self.state.lock().files.keys().cloned().collect()
    }

    /// Whether a directory exists.
    pub fn dir_exists(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().dirs.contains(path.as_ref())
    }

    /// All recorded operations.
    pub fn ops(&self) -> Vec<FsOp> {
        self.state.lock().ops.clone()
    }

    /// Number of recorded operations that may change the filesystem.
    pub fn mutation_count(&self) -> usize {
        self.state.lock().ops.iter().filter(|op| op.is_mutation()).count()
    }

    /// Forget all recorded operations.
    pub fn reset_ops(&self) {
        self.state.lock().ops.clear();
    }

    /// Make every write to `path` fail.
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        self.state.lock().fail_writes.insert(path.as_ref().to_path_buf());
    }

    /// Make every read of `path` fail.
    pub fn fail_reads_of(&self, path: impl AsRef<Path>) {
        self.state.lock().fail_reads.insert(path.as_ref().to_path_buf());
    }

    /// Make every read of `path` return `contents` instead of the stored content.
    pub fn corrupt_reads_of(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.state
            .lock()
            .corrupt_reads
            .insert(path.as_ref().to_path_buf(), contents.into());
    }

    /// Make deleting `path` fail as if the file were held open by another process.
    pub fn lock_file(&self, path: impl AsRef<Path>) {
        self.state.lock().locked.insert(path.as_ref().to_path_buf());
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn file_exists(&self, path: &Path) -> io::Result<bool> {
        let mut state = self.state.lock();
        state.ops.push(FsOp::FileExists(path.to_path_buf()));
        Ok(state.files.contains_key(path))
    }

    async fn create_directory(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock();
        state.ops.push(FsOp::CreateDirectory(path.to_path_buf()));
        state.add_dir_all(path);
        Ok(())
    }

    async fn read_all_text(&self, path: &Path) -> io::Result<String> {
        let mut state = self.state.lock();
        state.ops.push(FsOp::ReadAllText(path.to_path_buf()));
        if state.fail_reads.contains(path) {
            return Err(io::Error::other(format!("injected read failure: {}", path.display())));
        }
        if !state.files.contains_key(path) {
            return Err(not_found(path));
        }
        if let Some(contents) = state.corrupt_reads.get(path) {
            return Ok(contents.clone());
        }
        state.files.get(path).cloned().ok_or_else(|| not_found(path))
    }

    async fn write_all_text(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut state = self.state.lock();
        state.ops.push(FsOp::WriteAllText(path.to_path_buf()));
        if state.fail_writes.contains(path) {
            return Err(io::Error::other(format!("injected write failure: {}", path.display())));
        }
        if !state.parent_exists(path) {
            return Err(not_found(path));
        }
        state.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    async fn replace_file(&self, source: &Path, destination: &Path, backup: Option<&Path>) -> io::Result<()> {
        let mut state = self.state.lock();
        state.ops.push(FsOp::ReplaceFile {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            backup: backup.map(Path::to_path_buf),
        });
        if state.fail_writes.contains(destination) {
            return Err(io::Error::other(format!(
                "injected write failure: {}",
                destination.display()
            )));
        }
        let contents = state.files.get(source).cloned().ok_or_else(|| not_found(source))?;
        if let (Some(backup), Some(previous)) = (backup, state.files.get(destination).cloned()) {
            state.files.insert(backup.to_path_buf(), previous);
        }
        state.files.insert(destination.to_path_buf(), contents);
        state.files.remove(source);
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock();
        state.ops.push(FsOp::DeleteFile(path.to_path_buf()));
        if state.locked.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is locked", path.display()),
            ));
        }
        state.files.remove(path).map(|_| ()).ok_or_else(|| not_found(path))
    }

    async fn delete_directory(&self, path: &Path, recursive: bool) -> io::Result<()> {
        let mut state = self.state.lock();
        state.ops.push(FsOp::DeleteDirectory(path.to_path_buf()));
        if !state.dirs.contains(path) {
            return Err(not_found(path));
        }
        let has_children = state.files.keys().any(|p| p.starts_with(path))
            || state.dirs.iter().any(|d| d != path && d.starts_with(path));
        if has_children && !recursive {
            return Err(io::Error::other(format!("{} is not empty", path.display())));
        }
        state.files.retain(|p, _| !p.starts_with(path));
        state.dirs.retain(|d| !d.starts_with(path));
        Ok(())
    }

    async fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut state = self.state.lock();
        state.ops.push(FsOp::ListDirectory(path.to_path_buf()));
        if !state.dirs.contains(path) {
            return Err(not_found(path));
        }
        let files = state
            .files
            .keys()
            .filter(|p| p.parent() == Some(path))
            .map(|p| DirEntry {
                path: p.clone(),
                is_dir: false,
            });
        let dirs = state.dirs.iter().filter(|d| d.parent() == Some(path)).map(|d| DirEntry {
            path: d.clone(),
            is_dir: true,
        });
        let mut entries: Vec<_> = files.chain(dirs).collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn truncate_file(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock();
        state.ops.push(FsOp::TruncateFile(path.to_path_buf()));
        match state.files.get_mut(path) {
            Some(contents) => {
                contents.clear();
                Ok(())
            }
            None => Err(not_found(path)),
        }
    }
}
