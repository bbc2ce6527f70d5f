use anyhow::{Context, Result};
use deskinstall_core::{PRODUCT_DISPLAY_NAME, PRODUCT_SLUG, STATE_FILE_NAME};
use std::path::{Path, PathBuf};

const VENDOR_CONFIG_DIR: &str = "Mintplex Labs";
const INSTALLER_CONFIG_DIR: &str = "AnythingLLM Installer";
const PAYLOAD_DIR_NAME: &str = "payload";

/// Every filesystem location the workflow reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupLayout {
    payload_dir: PathBuf,
    state_file: PathBuf,
    default_install_path: PathBuf,
}

impl SetupLayout {
    pub fn new(
        payload_dir: impl Into<PathBuf>,
        state_file: impl Into<PathBuf>,
        default_install_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            payload_dir: payload_dir.into(),
            state_file: state_file.into(),
            default_install_path: default_install_path.into(),
        }
    }

    /// Resolves the per-user defaults for the running installer executable.
    pub fn discover() -> Result<Self> {
        let exe = std::env::current_exe().context("failed to resolve installer executable path")?;
        let exe_dir = exe
            .parent()
            .context("installer executable has no parent directory")?;
        Ok(Self::new(
            exe_dir.join(PAYLOAD_DIR_NAME),
            default_state_file_path()?,
            default_install_path(),
        ))
    }

    pub fn with_payload_dir(mut self, payload_dir: impl Into<PathBuf>) -> Self {
        self.payload_dir = payload_dir.into();
        self
    }

    pub fn with_state_file(mut self, state_file: impl Into<PathBuf>) -> Self {
        self.state_file = state_file.into();
        self
    }

    pub fn payload_dir(&self) -> &Path {
        &self.payload_dir
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    pub fn default_install_path(&self) -> &Path {
        &self.default_install_path
    }
}

pub fn default_state_file_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .or_else(dirs::data_dir)
        .context("no per-user configuration directory is available")?;
    Ok(project_state_file_path(&base))
}

pub(crate) fn project_state_file_path(config_dir: &Path) -> PathBuf {
    config_dir
        .join(VENDOR_CONFIG_DIR)
        .join(INSTALLER_CONFIG_DIR)
        .join(PRODUCT_SLUG)
        .join(STATE_FILE_NAME)
}

pub fn default_install_path() -> PathBuf {
    if cfg!(windows) {
        let base = dirs::data_local_dir()
            .map(|dir| dir.join("Programs"))
            .or_else(|| {
                dirs::home_dir().map(|home| home.join("AppData").join("Local").join("Programs"))
            });
        return base
            .map(|dir| dir.join(PRODUCT_DISPLAY_NAME))
            .unwrap_or_else(|| PathBuf::from(PRODUCT_DISPLAY_NAME));
    }

    if cfg!(target_os = "macos") {
        return PathBuf::from("/Applications").join(PRODUCT_DISPLAY_NAME);
    }

    let base = dirs::data_dir()
        .map(|dir| dir.join("applications"))
        .or_else(|| dirs::home_dir().map(|home| home.join("Applications")));
    base.map(|dir| dir.join(PRODUCT_DISPLAY_NAME))
        .unwrap_or_else(|| PathBuf::from(PRODUCT_DISPLAY_NAME))
}
