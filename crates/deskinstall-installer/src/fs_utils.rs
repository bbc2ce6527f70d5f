use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};

const WRITE_CHECK_PREFIX: &str = ".deskinstall-write-check";

/// Removes a file or symbolic link, dangling links included.
pub fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(_) => fs::remove_file(path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

/// Makes `path` absolute against the current directory and folds `.` and `..`
/// lexically. Symbolic links are left unresolved.
pub fn normalize_install_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    normalized.components().next_back(),
                    Some(Component::RootDir) | Some(Component::Prefix(_)) | None
                ) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Creates and removes a uniquely named scratch file in `dir`. Files already
/// present in `dir` are never opened.
pub fn ensure_writable_dir(dir: &Path) -> Result<()> {
    let scratch = dir.join(write_check_file_name());
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&scratch)
        .map_err(|err| anyhow!("no write permission in {}: {err}", dir.display()))?;
    fs::remove_file(&scratch)
        .with_context(|| format!("failed to remove write check file {}", scratch.display()))?;
    Ok(())
}

fn write_check_file_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    format!("{WRITE_CHECK_PREFIX}-{}-{nanos}", std::process::id())
}
