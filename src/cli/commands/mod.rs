//! CLI commands

use std::{
    path::Path,
    sync::{
        Arc, Mutex, OnceLock, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::{Context, Result, anyhow};
use log::{error, warn};

use crate::{
    adapters::{TextFileRepository, recovery_path},
    ports::TableRepository,
    q_learning::ValueTable,
};

pub mod play;
pub mod train;

/// Stop flag raised by Ctrl-C, shared by every command in the process.
static INTERRUPTED: OnceLock<Mutex<std::result::Result<Arc<AtomicBool>, String>>> =
    OnceLock::new();

/// Install the Ctrl-C handler once and return its flag.
pub(crate) fn interrupt_flag() -> Result<Arc<AtomicBool>> {
    let slot = INTERRUPTED.get_or_init(|| {
        let flag = Arc::new(AtomicBool::new(false));
        let handler_flag = Arc::clone(&flag);
        let result = ctrlc::set_handler(move || {
            handler_flag.store(true, Ordering::SeqCst);
        })
        .map(|()| flag)
        .map_err(|e| format!("failed to set Ctrl-C handler: {e}"));
        Mutex::new(result)
    });

    let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    match &*guard {
        Ok(flag) => {
            // A previous run in this process may have been interrupted
            flag.store(false, Ordering::SeqCst);
            Ok(Arc::clone(flag))
        }
        Err(message) => Err(anyhow!(message.clone())),
    }
}

/// Save `table` to `path`; on failure also write a copy to the temp dir.
///
/// The first save error is returned either way so the command fails.
pub(crate) fn save_with_recovery(table: &ValueTable, path: &Path) -> Result<()> {
    let repo = TextFileRepository::new();
    let Err(err) = repo.save(table, path) else {
        return Ok(());
    };

    error!("Failed to save value table to {}: {err}", path.display());
    let recovery = recovery_path(path);
    match repo.save(table, &recovery) {
        Ok(()) => warn!("Wrote recovery copy to {}", recovery.display()),
        Err(recovery_err) => error!(
            "Failed to write recovery copy to {}: {recovery_err}",
            recovery.display()
        ),
    }
    Err(err).with_context(|| {
        format!(
            "failed to save value table to {} (recovery copy: {})",
            path.display(),
            recovery.display()
        )
    })
}

/// Ctrl-C handler setup failing should not stop a run; fall back to a flag
/// nobody raises.
pub(crate) fn interrupt_flag_or_default() -> Arc<AtomicBool> {
    interrupt_flag().unwrap_or_else(|err| {
        warn!("{err:#}; Ctrl-C will abort without saving");
        Arc::new(AtomicBool::new(false))
    })
}
