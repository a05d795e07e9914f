use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::io::store::FileStore;

/// Name of the lock file inside the data directory
pub const LOCK_FILE: &str = ".lock";

const DEFAULT_WAIT: Duration = Duration::from_secs(5);
const MAX_BACKOFF: Duration = Duration::from_millis(80);

/// Exclusive hold on a data directory's stores while a read-modify-write
/// runs. Released when dropped.
///
/// The holder's pid is written into the lock file so a blocked process can
/// say who it is waiting on. The file itself is left in place; removing it
/// while another process waits on the old inode would let two writers in.
#[derive(Debug)]
pub struct WriteLock {
    file: File,
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{dir} is busy{}", holder_suffix(*holder))]
    Busy { dir: PathBuf, holder: Option<u32> },
}

fn holder_suffix(holder: Option<u32>) -> String {
    holder.map(|pid| format!(" (held by lode process {})", pid)).unwrap_or_default()
}

impl WriteLock {
    /// Lock the data directory, waiting at most `wait`.
    pub fn acquire(dir: &Path, wait: Duration) -> Result<Self, LockError> {
        let path = dir.join(LOCK_FILE);
        let open_err = |source| LockError::Open {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(dir).map_err(open_err)?;
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(open_err)?;

        let deadline = Instant::now() + wait;
        let mut backoff = Duration::from_millis(5);
        while !try_flock(&file) {
            if Instant::now() >= deadline {
                let holder = read_holder(&mut file);
                tracing::warn!(dir = %dir.display(), ?holder, "store lock busy");
                return Err(LockError::Busy {
                    dir: dir.to_path_buf(),
                    holder,
                });
            }
            std::thread::sleep(backoff);
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }

        // The pid is informational; failing to record it does not matter.
        let _ = file
            .set_len(0)
            .and_then(|_| file.write_all(std::process::id().to_string().as_bytes()));
        Ok(WriteLock { file, path })
    }

    /// Lock with the default five second wait.
    pub fn for_dir(dir: &Path) -> Result<Self, LockError> {
        Self::acquire(dir, DEFAULT_WAIT)
    }

    /// Lock the directory backing `store`.
    pub fn for_store(store: &FileStore) -> Result<Self, LockError> {
        Self::for_dir(store.dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = self.file.set_len(0);
    }
}

fn read_holder(file: &mut File) -> Option<u32> {
    let mut text = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut text).ok()?;
    text.trim().parse().ok()
}

#[cfg(unix)]
fn try_flock(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and stays open for the call.
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn try_flock(_file: &File) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn store_lock_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("nested").join("data"));
        let lock = WriteLock::for_store(&store).unwrap();
        assert!(lock.path().ends_with(LOCK_FILE));
        assert!(lock.path().exists());
    }

    #[test]
    fn busy_directory_names_the_holder() {
        let tmp = TempDir::new().unwrap();
        let _held = WriteLock::for_dir(tmp.path()).unwrap();

        let err = WriteLock::acquire(tmp.path(), Duration::from_millis(30)).unwrap_err();
        match err {
            LockError::Busy { holder, .. } => assert_eq!(holder, Some(std::process::id())),
            other => panic!("expected Busy, got {other}"),
        }
    }

    #[test]
    fn release_keeps_file_and_allows_relock() {
        let tmp = TempDir::new().unwrap();
        let first = WriteLock::for_dir(tmp.path()).unwrap();
        let path = first.path().to_path_buf();
        drop(first);

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert!(WriteLock::acquire(tmp.path(), Duration::from_millis(30)).is_ok());
    }
}
