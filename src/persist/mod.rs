//! File persistence with advisory locking.
//!
//! Every file handle the crate opens is held under an exclusive advisory
//! lock for as long as it is used. Locks are taken with a non-blocking
//! attempt that is retried [`MAX_LOCK_ATTEMPTS`] times, [`LOCK_RETRY_DELAY`]
//! apart, before giving up with [`XmlError::StuckLock`].
//!
//! [`save`] renders the document first, then locks the target once and keeps
//! it locked while any existing non-empty content is copied to `<path>.bck`
//! and the target is overwritten.

use std::ffi::OsString;
use std::fs::{File, OpenOptions, TryLockError};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::error::{Result, XmlError};
use crate::tree::Document;

/// Number of non-blocking lock attempts before giving up.
pub const MAX_LOCK_ATTEMPTS: u32 = 5;

/// Pause between two lock attempts.
pub const LOCK_RETRY_DELAY: Duration = Duration::from_millis(200);

/// An open file holding an exclusive advisory lock.
///
/// The lock is released when the guard is dropped.
#[derive(Debug)]
pub struct LockedFile {
    file: File,
    path: PathBuf,
}

impl LockedFile {
    /// Opens `path` with `options` and locks it.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Io`] if the file cannot be opened or the lock call
    /// fails, and [`XmlError::StuckLock`] if the lock stays taken.
    pub fn open(path: &Path, options: &OpenOptions) -> Result<Self> {
        let file = options.open(path).map_err(|e| XmlError::io(path, e))?;
        lock_with_retry(&file, path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Reads the whole file.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Io`] on read failure.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.file
            .read_to_end(&mut bytes)
            .map_err(|e| XmlError::io(&self.path, e))?;
        Ok(bytes)
    }

    /// Truncates the file and writes `data` as its new content, from the
    /// start of the file whatever was read before.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Io`] on write failure.
    pub fn replace_contents(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .set_len(0)
            .and_then(|()| self.file.rewind())
            .and_then(|()| self.file.write_all(data))
            .and_then(|()| self.file.flush())
            .map_err(|e| XmlError::io(&self.path, e))
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            log::warn!("{}: failed to release lock: {e}", self.path.display());
        }
    }
}

fn lock_with_retry(file: &File, path: &Path) -> Result<()> {
    for attempt in 1..=MAX_LOCK_ATTEMPTS {
        match file.try_lock() {
            Ok(()) => return Ok(()),
            Err(TryLockError::WouldBlock) => {
                log::debug!(
                    "{}: locked by another handle (attempt {attempt}/{MAX_LOCK_ATTEMPTS})",
                    path.display()
                );
                if attempt < MAX_LOCK_ATTEMPTS {
                    thread::sleep(LOCK_RETRY_DELAY);
                }
            }
            Err(TryLockError::Error(e)) => return Err(XmlError::io(path, e)),
        }
    }
    Err(XmlError::StuckLock {
        path: path.to_path_buf(),
    })
}

/// Returns the backup location for `path`: the same path with `.bck`
/// appended.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bck");
    PathBuf::from(name)
}

/// Reads a file while holding its lock.
///
/// # Errors
///
/// Returns [`XmlError::Io`] or [`XmlError::StuckLock`].
pub fn read_locked(path: &Path) -> Result<Vec<u8>> {
    let mut file = LockedFile::open(path, OpenOptions::new().read(true))?;
    file.read_all()
}

/// Writes `data` to `path` while holding its lock. The file is created if
/// missing and truncated only after the lock is taken.
///
/// # Errors
///
/// Returns [`XmlError::Io`] or [`XmlError::StuckLock`].
pub fn write_locked(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = LockedFile::open(
        path,
        OpenOptions::new().write(true).create(true).truncate(false),
    )?;
    file.replace_contents(data)
}

/// Dumps `doc` and writes it to `path`, backing up a non-empty existing
/// file to `<path>.bck` first.
///
/// The target stays locked from the backup read until the new content is
/// written, so no other locking writer can slip in between.
///
/// # Errors
///
/// Returns [`XmlError::Encoding`] if the dump fails, in which case no file
/// is touched. Returns [`XmlError::Io`] or [`XmlError::StuckLock`] if the
/// backup or the write fails; a failed backup leaves the target unchanged.
pub fn save(doc: &Document, path: &Path) -> Result<()> {
    let output = doc.dump()?;

    let mut target = LockedFile::open(
        path,
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false),
    )?;
    let previous = target.read_all()?;
    if !previous.is_empty() {
        let backup = backup_path(path);
        write_locked(&backup, &previous)?;
        log::debug!(
            "backed up {} bytes of {} to {}",
            previous.len(),
            path.display(),
            backup.display()
        );
    }

    target.replace_contents(&output.data)?;
    log::debug!(
        "saved {} bytes ({}) to {}",
        output.len(),
        output.encoding,
        path.display()
    );
    Ok(())
}
