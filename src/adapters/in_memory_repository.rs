//! In-memory table repository for testing.
//!
//! Tables are stored in the same line format the file repository writes, so
//! tests exercise the real encoding without touching the file system.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::text_repository::{read_table, write_table};
use crate::{Result, error::Error, ports::TableRepository, q_learning::ValueTable};

/// In-memory repository for testing.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use xxo::{
///     adapters::InMemoryRepository, ports::TableRepository, q_learning::ValueTable,
///     types::StateKey,
/// };
///
/// let repo = InMemoryRepository::new();
/// let mut table = ValueTable::new(9);
/// table.update(&StateKey::parse("---------X")?, 4, 0.5);
///
/// repo.save(&table, Path::new("ai_model.dat"))?;
/// let loaded = repo.load(Path::new("ai_model.dat"))?;
/// assert_eq!(loaded, table);
/// # Ok::<(), xxo::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the number of tables currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&*path.to_string_lossy())
    }

    /// Raw stored bytes, as the file repository would have written them.
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.storage().get(&*path.to_string_lossy()).cloned()
    }
}

impl TableRepository for InMemoryRepository {
    fn save(&self, table: &ValueTable, path: &Path) -> Result<()> {
        let mut bytes = Vec::new();
        write_table(table, &mut bytes).map_err(|source| Error::Io {
            operation: "encode value table in memory".to_string(),
            source,
        })?;
        self.storage()
            .insert(path.to_string_lossy().to_string(), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<ValueTable> {
        let empty = || Error::EmptyTable {
            path: path.to_path_buf(),
        };
        let bytes = self.contents(path).ok_or_else(empty)?;
        read_table(bytes.as_slice())?.ok_or_else(empty)
    }
}
