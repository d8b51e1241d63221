//! Atomic file replacement.
//!
//! Dumps are written to a hidden sibling and renamed into place, so a crash
//! mid-write leaves the previous dump intact and readers never observe a
//! truncated document.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temp file that is removed on drop unless it was renamed into place.
struct PendingFile<'dir> {
    dir: &'dir Dir,
    name: String,
    persisted: bool,
}

impl<'dir> PendingFile<'dir> {
    fn create(dir: &'dir Dir, target: &str) -> io::Result<(Self, cap_std::fs::File)> {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!(".{target}.{}.{counter}.tmp", std::process::id());
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let file = dir.open_with(&name, &options)?;
        Ok((
            Self {
                dir,
                name,
                persisted: false,
            },
            file,
        ))
    }

    fn persist(mut self, target: &str) -> io::Result<()> {
        replace(self.dir, &self.name, target)?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for PendingFile<'_> {
    fn drop(&mut self) {
        if !self.persisted && self.dir.remove_file(&self.name).is_err() {
            // The temp file is hidden and harmless if it lingers.
        }
    }
}

/// Replaces `file_name` inside `dir` with `contents`.
///
/// Last write wins when two writers race on the same name.
pub(crate) fn write_atomic(dir: &Dir, file_name: &str, contents: &str) -> io::Result<()> {
    let (pending, mut file) = PendingFile::create(dir, file_name)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    drop(file);
    pending.persist(file_name)?;
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Directory sync is unsupported on some platforms.
    }
    Ok(())
}

#[cfg(windows)]
fn replace(dir: &Dir, from: &str, to: &str) -> io::Result<()> {
    match dir.remove_file(to) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(from, dir, to)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, from: &str, to: &str) -> io::Result<()> {
    dir.rename(from, dir, to)
}
