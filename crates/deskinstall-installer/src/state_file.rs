use anyhow::{Context, Result};
use deskinstall_core::InstallerState;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::SetupLayout;

pub fn write_installer_state(layout: &SetupLayout, state: &InstallerState) -> Result<PathBuf> {
    let path = layout.state_file().to_path_buf();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let payload = state.to_json_pretty()?;
    fs::write(&path, payload.as_bytes())
        .with_context(|| format!("failed to write installer state: {}", path.display()))?;
    Ok(path)
}

pub fn read_installer_state(layout: &SetupLayout) -> Result<Option<InstallerState>> {
    let path = layout.state_file();
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read installer state: {}", path.display()));
        }
    };

    let state = InstallerState::from_json_str(&raw)
        .with_context(|| format!("failed to parse installer state: {}", path.display()))?;
    Ok(Some(state))
}
