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
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;

/// Lazily created per-path async locks.
///
/// Entries are never removed, the table grows with the number of distinct documents.
#[derive(Debug, Default)]
pub(crate) struct LockTable {
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl LockTable {
    pub(crate) fn get(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        self.locks.lock().entry(path.to_path_buf()).or_default().clone()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_table_reuses_locks() {
        let table = LockTable::default();
        let a1 = table.get(Path::new("/cache/DE.json"));
        let a2 = table.get(Path::new("/cache/DE.json"));
        let b = table.get(Path::new("/cache/EN.json"));

        assert!(Arc::ptr_eq(&a1, &a2));
        assert!(!Arc::ptr_eq(&a1, &b));
        assert_eq!(table.len(), 2);

        let _guard = a1.try_lock().unwrap();
        assert!(a2.try_lock().is_err());
        assert!(b.try_lock().is_ok());
    }
}
