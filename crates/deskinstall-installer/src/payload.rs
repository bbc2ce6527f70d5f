use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::fs_utils::remove_file_if_exists;

/// Progress notifications emitted while a payload is copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyProgress {
    Percent(u8),
    Copied(String),
}

pub fn count_payload_files(source: &Path) -> Result<u64> {
    let mut count = 0_u64;
    for entry in payload_entries(source) {
        let entry = entry.with_context(|| {
            format!("failed to enumerate payload under {}", source.display())
        })?;
        if !entry.file_type().is_dir() {
            count += 1;
        }
    }
    Ok(count)
}

/// Copies every entry under `source` into `destination`, keeping relative paths.
///
/// Entries are visited depth-first in file name order. Existing files at the
/// destination are replaced. The first failure stops the copy; files already
/// written stay in place.
pub fn copy_payload<F>(source: &Path, destination: &Path, mut on_progress: F) -> Result<u64>
where
    F: FnMut(CopyProgress),
{
    if !source.is_dir() {
        return Err(anyhow!(
            "installation payload missing at {}",
            source.display()
        ));
    }

    let total_files = count_payload_files(source)?;
    let mut copied_files = 0_u64;

    for entry in payload_entries(source) {
        let entry = entry.with_context(|| {
            format!("failed to enumerate payload under {}", source.display())
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("payload entry escapes root: {}", entry.path().display()))?;
        let relative_display = relative.to_string_lossy().replace('\\', "/");
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("failed to create folder {}", target.display()))?;
            continue;
        }

        copy_payload_file(entry.path(), &target)
            .with_context(|| format!("failed to copy {relative_display}"))?;
        copied_files += 1;
        on_progress(CopyProgress::Percent(copy_percent(copied_files, total_files)));
        on_progress(CopyProgress::Copied(relative_display));
    }

    if total_files == 0 {
        on_progress(CopyProgress::Percent(100));
    }

    Ok(copied_files)
}

pub fn copy_percent(copied: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = copied.saturating_mul(100) / total;
    percent.min(100) as u8
}

fn payload_entries(source: &Path) -> walkdir::IntoIter {
    WalkDir::new(source)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
}

fn copy_payload_file(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create folder {}", parent.display()))?;
    }
    remove_file_if_exists(target)
        .with_context(|| format!("failed to replace {}", target.display()))?;

    #[cfg(unix)]
    {
        let metadata = fs::symlink_metadata(source)
            .with_context(|| format!("failed to stat {}", source.display()))?;
        if metadata.file_type().is_symlink() {
            let link_target = fs::read_link(source)
                .with_context(|| format!("failed to read symlink {}", source.display()))?;
            std::os::unix::fs::symlink(&link_target, target).with_context(|| {
                format!(
                    "failed to create symlink {} -> {}",
                    target.display(),
                    link_target.display()
                )
            })?;
            return Ok(());
        }
    }

    fs::copy(source, target).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            target.display()
        )
    })?;
    Ok(())
}
