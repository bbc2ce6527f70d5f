use anyhow::{Context, Result};
use chrono::Utc;
use deskinstall_core::{
    available_version, InstallAction, InstallResult, InstallationStatus, InstallerState,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::fs_utils::{ensure_writable_dir, normalize_install_path};
use crate::payload::{copy_payload, CopyProgress};
use crate::shortcuts::{ShortcutInstaller, ShortcutKind};
use crate::state_file::{read_installer_state, write_installer_state};
use crate::SetupLayout;

const SHORTCUT_WARNING_SUFFIX: &str =
    "Some shortcuts could not be created. See the log for details.";

/// Notifications delivered to the presentation shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallerEvent {
    DetectionFinished(InstallationStatus),
    Message(String),
    Percent(u8),
    Warning(String),
    InstallationFinished(InstallResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub target: PathBuf,
    pub action: InstallAction,
    pub desktop_shortcut: bool,
    pub menu_shortcut: bool,
}

/// Detection and installation for one product payload.
///
/// The workflow keeps no state between calls and takes no locks; callers run
/// at most one installation at a time.
pub struct InstallWorkflow {
    layout: SetupLayout,
    available_version: String,
    shortcuts: Box<dyn ShortcutInstaller + Send + Sync>,
}

impl InstallWorkflow {
    pub fn new(layout: SetupLayout, shortcuts: Box<dyn ShortcutInstaller + Send + Sync>) -> Self {
        Self {
            layout,
            available_version: available_version().to_string(),
            shortcuts,
        }
    }

    pub fn with_available_version(mut self, version: impl Into<String>) -> Self {
        self.available_version = version.into();
        self
    }

    pub fn layout(&self) -> &SetupLayout {
        &self.layout
    }

    pub fn available_version(&self) -> &str {
        &self.available_version
    }

    pub fn detect(&self) -> InstallationStatus {
        let mut install_path = self.layout.default_install_path().to_path_buf();
        let mut installed_version = String::new();

        match read_installer_state(&self.layout) {
            Ok(Some(state)) => {
                if !state.path.trim().is_empty() {
                    install_path = PathBuf::from(state.path);
                }
                installed_version = state.version;
            }
            Ok(None) => debug!(
                "no installer state at {}",
                self.layout.state_file().display()
            ),
            Err(err) => warn!("ignoring unreadable installer state: {err:#}"),
        }

        let install_path = normalize_install_path(&install_path);
        let path_exists = install_path.is_dir();
        let status = InstallationStatus::evaluate(
            installed_version.trim(),
            &self.available_version,
            install_path,
            path_exists,
        );
        info!(
            installed = status.installed,
            recommended = status.recommended_action.as_str(),
            "detected installation at {}",
            status.install_path.display()
        );
        status
    }

    /// Runs the full installation and reports progress through `on_event`.
    ///
    /// Directory, payload and state failures end the run with an unsuccessful
    /// result. Shortcut failures are reported as warnings and leave the result
    /// successful.
    pub fn install<F>(&self, request: &InstallRequest, mut on_event: F) -> InstallResult
    where
        F: FnMut(InstallerEvent),
    {
        let target = normalize_install_path(&request.target);
        match self.run_installation(&target, request, &mut on_event) {
            Ok(shortcut_warnings) => {
                on_event(InstallerEvent::Percent(100));
                let mut message = request.action.completion_message().to_string();
                if !shortcut_warnings.is_empty() {
                    message.push('\n');
                    message.push_str(SHORTCUT_WARNING_SUFFIX);
                }
                info!(
                    action = request.action.as_str(),
                    "installation finished in {}",
                    target.display()
                );
                InstallResult::succeeded(message)
            }
            Err(err) => {
                warn!(action = request.action.as_str(), "installation failed: {err:#}");
                InstallResult::failed(format!("{err:#}"))
            }
        }
    }

    fn run_installation<F>(
        &self,
        target: &Path,
        request: &InstallRequest,
        on_event: &mut F,
    ) -> Result<Vec<String>>
    where
        F: FnMut(InstallerEvent),
    {
        on_event(InstallerEvent::Message(format!(
            "Preparing installation in {}",
            target.display()
        )));
        prepare_target_dir(target, request.action)?;

        on_event(InstallerEvent::Message("Copying application files...".to_string()));
        let copied = copy_payload(self.layout.payload_dir(), target, |progress| match progress {
            CopyProgress::Percent(percent) => on_event(InstallerEvent::Percent(percent)),
            CopyProgress::Copied(relative) => {
                on_event(InstallerEvent::Message(format!("Copied {relative}")))
            }
        })?;
        debug!("copied {copied} payload files into {}", target.display());

        let state = InstallerState::new(
            target.display().to_string(),
            self.available_version.clone(),
            Utc::now(),
        );
        let state_path = write_installer_state(&self.layout, &state)
            .context("could not save the installation state")?;
        debug!("saved installer state to {}", state_path.display());

        let warnings = self.create_shortcuts(target, request, on_event);
        Ok(warnings)
    }

    fn create_shortcuts<F>(
        &self,
        target: &Path,
        request: &InstallRequest,
        on_event: &mut F,
    ) -> Vec<String>
    where
        F: FnMut(InstallerEvent),
    {
        let mut kinds = Vec::new();
        if request.desktop_shortcut {
            kinds.push(ShortcutKind::Desktop);
        }
        if request.menu_shortcut {
            kinds.push(ShortcutKind::Menu);
        }
        if kinds.is_empty() {
            return Vec::new();
        }

        let executable = self.shortcuts.executable_path(target);
        let mut warnings = Vec::new();
        for kind in kinds {
            match self.shortcuts.create_shortcut(kind, target, &executable) {
                Ok(Some(path)) => {
                    info!("created {kind} shortcut at {}", path.display());
                    on_event(InstallerEvent::Message(format!(
                        "Created {kind} shortcut at {}",
                        path.display()
                    )));
                }
                Ok(None) => debug!("no {kind} shortcut needed on this platform"),
                Err(err) => {
                    let warning = format!("failed to create {kind} shortcut: {err:#}");
                    warn!("{warning}");
                    on_event(InstallerEvent::Warning(warning.clone()));
                    warnings.push(warning);
                }
            }
        }
        warnings
    }
}

fn prepare_target_dir(target: &Path, action: InstallAction) -> Result<()> {
    if !target.is_dir() {
        fs::create_dir_all(target).with_context(|| {
            format!("could not create the installation directory: {}", target.display())
        })?;
    }

    if action.requires_writable_target() {
        ensure_writable_dir(target)?;
    }
    Ok(())
}
