//! Shared capability-based filesystem helpers for seed-data tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs::Dir;

/// Return a unique, empty-or-absent dumps directory under
/// `target/seed-data-tests`.
///
/// Only the parent is created so tests also exercise directory creation on
/// the first save.
///
/// # Errors
///
/// Returns any filesystem errors encountered while creating the parent.
pub fn unique_dumps_dir(prefix: &str) -> io::Result<Utf8PathBuf> {
    static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let counter = DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
    let process_id = std::process::id();
    let parent = Utf8PathBuf::from("target").join("seed-data-tests");
    let root = Dir::open_ambient_dir(".", ambient_authority())?;
    root.create_dir_all(&parent)?;
    let dir = parent.join(format!("{prefix}-{process_id}-{counter}"));
    match root.remove_dir_all(&dir) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    Ok(dir)
}
