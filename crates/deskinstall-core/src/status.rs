use std::cmp::Ordering;
use std::path::PathBuf;

use crate::{compare_versions, InstallAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationStatus {
    pub installed: bool,
    pub update_available: bool,
    pub repair_available: bool,
    pub installed_version: String,
    pub available_version: String,
    pub install_path: PathBuf,
    pub recommended_action: InstallAction,
}

impl InstallationStatus {
    /// Derives the recommended action from what was persisted and what is on disk.
    ///
    /// An empty `installed_version` means nothing was installed. A recorded
    /// installation whose directory has vanished is always a repair; the version
    /// comparison only runs when the directory still exists.
    pub fn evaluate(
        installed_version: &str,
        available_version: &str,
        install_path: PathBuf,
        install_path_exists: bool,
    ) -> Self {
        let mut status = Self {
            installed: false,
            update_available: false,
            repair_available: false,
            installed_version: installed_version.to_string(),
            available_version: available_version.to_string(),
            install_path,
            recommended_action: InstallAction::FreshInstall,
        };

        if installed_version.is_empty() {
            return status;
        }

        status.installed = true;
        status.repair_available = true;
        if !install_path_exists {
            status.recommended_action = InstallAction::RepairExisting;
            return status;
        }

        status.update_available =
            compare_versions(installed_version, available_version) == Ordering::Less;
        status.recommended_action = if status.update_available {
            InstallAction::UpdateExisting
        } else {
            InstallAction::RepairExisting
        };
        status
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub success: bool,
    pub message: String,
}

impl InstallResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
