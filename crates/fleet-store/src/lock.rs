//! Advisory file locks over shared files.
//!
//! A [`LockedFile`] holds an open handle plus an advisory lock on it for its
//! whole lifetime; the lock is released on drop. Every read-decide-write
//! sequence on a shared file happens while one `LockedFile` is alive, so the
//! durable state of each file reflects a total order of critical sections.
//!
//! Rewrites happen in place (truncate + write) rather than via rename: a
//! rename would swap the inode out from under processes blocked on the lock.
//! Lock waits are unbounded.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fleet_types::TypeError;
use fs2::FileExt;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

/// One line of a shared file, terminator stripped.
///
/// Kept as bytes: a corrupt row must not make the rest of the file
/// unreadable, and it is written back unchanged on rewrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLine(Vec<u8>);

impl RawLine {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The line as text; a line that is not UTF-8 is a malformed record.
    pub fn text(&self) -> Result<&str, TypeError> {
        std::str::from_utf8(&self.0).map_err(|e| TypeError::MalformedRecord {
            line: String::from_utf8_lossy(&self.0).into_owned(),
            reason: format!("not valid UTF-8: {e}"),
        })
    }

    pub fn is_blank(&self) -> bool {
        self.0.iter().all(u8::is_ascii_whitespace)
    }
}

impl AsRef<[u8]> for RawLine {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for RawLine {
    fn from(line: &str) -> Self {
        Self(line.as_bytes().to_vec())
    }
}

fn split_lines(contents: &[u8]) -> Vec<RawLine> {
    let body = contents.strip_suffix(b"\n").unwrap_or(contents);
    if body.is_empty() {
        return Vec::new();
    }
    body.split(|&b| b == b'\n')
        .map(|line| RawLine(line.strip_suffix(b"\r").unwrap_or(line).to_vec()))
        .collect()
}

/// An open shared file with an advisory lock held until drop.
#[derive(Debug)]
pub struct LockedFile {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl LockedFile {
    /// Open (creating the file and its parent directories if needed) and
    /// take an exclusive lock.
    pub fn exclusive(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)?;
        Self::acquire(file, path, LockMode::Exclusive)
    }

    /// Take an exclusive lock on an existing file. Returns `None` if the file
    /// does not exist; nothing is created.
    pub fn exclusive_existing(path: &Path) -> StoreResult<Option<Self>> {
        match OpenOptions::new().read(true).write(true).open(path) {
            Ok(file) => Self::acquire(file, path, LockMode::Exclusive).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Take a shared lock for reading. Returns `None` if the file does not
    /// exist.
    pub fn shared(path: &Path) -> StoreResult<Option<Self>> {
        match File::open(path) {
            Ok(file) => Self::acquire(file, path, LockMode::Shared).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn acquire(file: File, path: &Path, mode: LockMode) -> StoreResult<Self> {
        let locked = match mode {
            LockMode::Shared => FileExt::lock_shared(&file),
            LockMode::Exclusive => FileExt::lock_exclusive(&file),
        };
        locked.map_err(|source| StoreError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?mode, "lock acquired");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            mode,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Read the whole file as lines (line terminators stripped).
    pub fn read_lines(&mut self) -> StoreResult<Vec<RawLine>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut contents = Vec::new();
        self.file.read_to_end(&mut contents)?;
        Ok(split_lines(&contents))
    }

    /// Replace the file's contents with `lines`, one per line.
    pub fn rewrite<L: AsRef<[u8]>>(&mut self, lines: &[L]) -> StoreResult<()> {
        debug_assert_eq!(self.mode, LockMode::Exclusive);
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        let mut writer = BufWriter::new(&self.file);
        for line in lines {
            writer.write_all(line.as_ref())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        drop(writer);
        self.file.sync_data()?;
        Ok(())
    }

    /// Append one line at the end of the file.
    pub fn append_line(&mut self, line: &str) -> StoreResult<()> {
        self.append_lines(std::slice::from_ref(&line))
    }

    /// Append several lines at the end of the file.
    ///
    /// A hand-edited file missing its trailing newline gets one first, so
    /// the appended record never fuses with the last existing line.
    pub fn append_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> StoreResult<()> {
        debug_assert_eq!(self.mode, LockMode::Exclusive);
        let len = self.file.seek(SeekFrom::End(0))?;
        let mut buf = String::new();
        if len > 0 {
            self.file.seek(SeekFrom::End(-1))?;
            let mut last = [0u8; 1];
            self.file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                buf.push('\n');
            }
        }
        for line in lines {
            buf.push_str(line.as_ref());
            buf.push('\n');
        }
        self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(buf.as_bytes())?;
        self.file.sync_data()?;
        Ok(())
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), error = %e, "failed to release lock");
        } else {
            debug!(path = %self.path.display(), "lock released");
        }
    }
}
