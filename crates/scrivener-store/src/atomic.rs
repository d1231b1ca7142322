//! Crash-safe file replacement

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Suffix appended to a record path while it is being written
pub(crate) const TEMP_SUFFIX: &str = ".tmp";

/// Temporary path used while writing `path`
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Write `bytes` to `path` so that readers see either the old or the new
/// contents, never a partial file
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = temp_path(path);
    let result = write_and_rename(&tmp, path, bytes);
    if result.is_err() {
        // Leftovers are also swept at load time
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_and_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(tmp)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, path)
}

/// Run `op` and retry it once on failure
pub(crate) fn retry_once<T>(what: &str, mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    match op() {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("{} failed, retrying once: {}", what, e);
            op()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path_appends_suffix() {
        let tmp = temp_path(Path::new("/notes/abc.json"));
        assert_eq!(tmp, PathBuf::from("/notes/abc.json.tmp"));
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.json");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_atomic_failure_keeps_previous_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.json");
        write_atomic(&path, b"original").unwrap();

        // A directory squatting on the temp path makes File::create fail
        fs::create_dir(temp_path(&path)).unwrap();

        assert!(write_atomic(&path, b"replacement").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_retry_once_recovers_from_single_failure() {
        let mut calls = 0;
        let result = retry_once("op", || {
            calls += 1;
            if calls == 1 {
                Err(io::Error::new(io::ErrorKind::Other, "transient"))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn test_retry_once_gives_up_after_second_failure() {
        let mut calls = 0;
        let result: io::Result<()> = retry_once("op", || {
            calls += 1;
            Err(io::Error::new(io::ErrorKind::Other, "persistent"))
        });
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }
}
