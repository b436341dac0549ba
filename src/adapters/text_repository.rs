//! Plain text implementation of the table repository.
//!
//! One state per line: the state key, then one value per action, all
//! separated by single spaces.
//!
//! ```text
//! ---------X 0.1 0.0729 0 0 0.25 0 0 0 -0.1
//! X--------O -0.09 0 0 0 0 0 0 0 0
//! ```
//!
//! Keys are written in sorted order so identical tables produce identical
//! files. Values use the shortest representation that parses back to the
//! same `f64`. The loader accepts lines in any order and takes the action
//! space from the first line.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{Result, error::Error, ports::TableRepository, q_learning::ValueTable, types::StateKey};

/// Write `table` in the line format.
pub fn write_table<W: Write>(table: &ValueTable, writer: &mut W) -> io::Result<()> {
    let mut entries: Vec<_> = table.iter().collect();
    entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

    for (state, values) in entries {
        write!(writer, "{state}")?;
        for value in values {
            write!(writer, " {value}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Read a table in the line format.
///
/// Blank lines are skipped. Returns `Ok(None)` when the input holds no
/// states at all.
pub fn read_table<R: BufRead>(reader: R) -> Result<Option<ValueTable>> {
    let mut table: Option<ValueTable> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| Error::Io {
            operation: format!("read value table line {line_no}"),
            source,
        })?;
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else {
            continue;
        };

        let invalid = |reason: String| Error::InvalidTableLine {
            line: line_no,
            reason,
        };
        let state = StateKey::parse(key).map_err(|e| invalid(e.to_string()))?;
        let values = tokens
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("'{token}' is not a number")))
            })
            .collect::<Result<Vec<f64>>>()?;

        if values.len() != state.cell_count() {
            return Err(invalid(format!(
                "state key describes {} cells but the line has {} values",
                state.cell_count(),
                values.len()
            )));
        }

        let table = table.get_or_insert_with(|| ValueTable::new(values.len()));
        if values.len() != table.action_space() {
            return Err(invalid(format!(
                "expected {} values, found {}",
                table.action_space(),
                values.len()
            )));
        }
        table.insert(state, values)?;
    }

    Ok(table)
}

/// Where a table that could not be saved to `path` is written instead.
pub fn recovery_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "ai_model.dat".into(), |name| name.to_string_lossy());
    std::env::temp_dir().join(format!("{name}.recovery"))
}

/// File-backed repository using the line format.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use xxo::{adapters::TextFileRepository, ports::TableRepository};
///
/// let repo = TextFileRepository::new();
/// let table = repo.load(Path::new("ai_model.dat"))?;
/// repo.save(&table, Path::new("ai_model.dat"))?;
/// # Ok::<(), xxo::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFileRepository;

impl TextFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for TextFileRepository {
    fn save(&self, table: &ValueTable, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        write_table(table, &mut writer)
            .and_then(|()| writer.flush())
            .map_err(|source| Error::Io {
                operation: format!("write value table to {path:?}"),
                source,
            })?;

        info!("Saved {} states to {}", table.len(), path.display());
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<ValueTable> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No value table at {}", path.display());
                return Err(Error::EmptyTable {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("open file {path:?}"),
                    source,
                });
            }
        };

        let table = read_table(BufReader::new(file))?.ok_or_else(|| Error::EmptyTable {
            path: path.to_path_buf(),
        })?;
        info!(
            "Loaded {} states ({} actions each) from {}",
            table.len(),
            table.action_space(),
            path.display()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn sample_table() -> ValueTable {
        let mut table = ValueTable::new(9);
        let root = StateKey::parse("---------X").unwrap();
        let reply = StateKey::parse("X--------O").unwrap();
        table.update(&root, 0, 0.1);
        table.update(&root, 4, 0.0729);
        table.update(&reply, 8, -1.0 / 3.0);
        table
    }

    #[test]
    fn test_write_is_sorted_and_space_separated() {
        let mut bytes = Vec::new();
        write_table(&sample_table(), &mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "---------X 0.1 0 0 0 0.0729 0 0 0 0");
        assert!(lines[1].starts_with("X--------O 0 0 0 0 0 0 0 0 -0.333"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_file_round_trip_is_exact() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ai_model.dat");
        let repo = TextFileRepository::new();
        let table = sample_table();

        repo.save(&table, &path).unwrap();
        let loaded = repo.load(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_read_accepts_any_order_and_blank_lines() {
        let text = "X--------O 0 0 0 0 0 0 0 0 1\n\n---------X 0.5 0 0 0 0 0 0 0 0\n";
        let table = read_table(text.as_bytes()).unwrap().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.action_space(), 9);
        assert_eq!(table.value("X--------O", 8), 1.0);
    }

    #[test]
    fn test_read_empty_input() {
        assert!(read_table("".as_bytes()).unwrap().is_none());
        assert!(read_table("\n  \n".as_bytes()).unwrap().is_none());
    }

    #[test]
    fn test_read_rejects_malformed_lines() {
        let short = "---------X 0 0 0\n";
        assert!(matches!(
            read_table(short.as_bytes()),
            Err(Error::InvalidTableLine { line: 1, .. })
        ));

        let not_a_number = "---------X 0 0 0 0 zero 0 0 0 0\n";
        assert!(matches!(
            read_table(not_a_number.as_bytes()),
            Err(Error::InvalidTableLine { line: 1, .. })
        ));

        let bad_key = "---------Z 0 0 0 0 0 0 0 0 0\n";
        assert!(read_table(bad_key.as_bytes()).is_err());

        let mixed = "---------X 0 0 0 0 0 0 0 0 0\n\
                     ----------------X 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0\n";
        assert!(matches!(
            read_table(mixed.as_bytes()),
            Err(Error::InvalidTableLine { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_and_empty_files_are_empty_tables() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TextFileRepository::new();

        let missing = temp_dir.path().join("missing.dat");
        assert!(matches!(
            repo.load(&missing),
            Err(Error::EmptyTable { .. })
        ));

        let empty = temp_dir.path().join("empty.dat");
        std::fs::write(&empty, "").unwrap();
        assert!(matches!(repo.load(&empty), Err(Error::EmptyTable { .. })));
    }

    #[test]
    fn test_recovery_path_lives_in_temp_dir() {
        let path = recovery_path(Path::new("/nonexistent/dir/model.dat"));
        assert_eq!(path, std::env::temp_dir().join("model.dat.recovery"));
    }
}
