//! Repository port for value table persistence.
//!
//! This module defines the trait boundary between the learning code and the
//! storage of trained tables.

use std::path::Path;

use crate::{Result, q_learning::ValueTable};

/// Port for persisting and loading value tables.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use xxo::{ports::TableRepository, q_learning::ValueTable};
///
/// fn checkpoint<R: TableRepository>(
///     repo: &R,
///     table: &ValueTable,
///     path: &Path,
/// ) -> xxo::Result<()> {
///     repo.save(table, path)
/// }
/// ```
pub trait TableRepository {
    /// Save a table, replacing whatever is stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the table cannot be written.
    fn save(&self, table: &ValueTable, path: &Path) -> Result<()>;

    /// Load a table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyTable`] if nothing is stored at `path` or
    /// the stored table has no states, [`crate::Error::InvalidTableLine`] for
    /// malformed content and [`crate::Error::Io`] for other read failures.
    fn load(&self, path: &Path) -> Result<ValueTable>;
}
