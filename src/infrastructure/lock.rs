//! Run lock
//!
//! One refit process per package root: markers and manifests are
//! rewritten in place, so two concurrent runs over the same tree would
//! race each other. An exclusive advisory lock on `<root>/.refit.lock`
//! guards the run; the file records the holder for diagnostics.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{RefitError, RefitResult};

pub const LOCK_FILE_NAME: &str = ".refit.lock";

/// Exclusive lock over a package root, released on drop
#[derive(Debug)]
pub struct RunLock {
    file: std::fs::File,
    path: PathBuf,
}

impl RunLock {
    /// Try to acquire the lock for `root`.
    ///
    /// Fails immediately with `LockHeld` when another process owns it,
    /// quoting whatever holder information that process recorded.
    pub fn acquire(root: &Path) -> RefitResult<Self> {
        let path = root.join(LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            let holder = std::fs::read_to_string(&path)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "unknown holder".to_string());
            return Err(RefitError::LockHeld { path, holder });
        }

        let info = serde_json::json!({
            "pid": std::process::id(),
            "started": chrono::Utc::now().to_rfc3339(),
        });
        file.set_len(0)?;
        writeln!(&file, "{}", info)?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}
