use anyhow::{anyhow, Context, Result};
use deskinstall_core::{PRODUCT_DISPLAY_NAME, PRODUCT_SLUG};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::fs_utils::remove_file_if_exists;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutKind {
    Desktop,
    Menu,
}

impl ShortcutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Menu => "menu",
        }
    }
}

impl fmt::Display for ShortcutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform integration that places launchers for an installed product.
pub trait ShortcutInstaller {
    /// Location of the launchable artifact inside `install_dir`.
    fn executable_path(&self, install_dir: &Path) -> PathBuf;

    /// Creates or replaces the shortcut of `kind`.
    ///
    /// Returns the written artifact, or `None` when the platform needs nothing
    /// for this kind.
    fn create_shortcut(
        &self,
        kind: ShortcutKind,
        install_dir: &Path,
        executable: &Path,
    ) -> Result<Option<PathBuf>>;
}

pub fn platform_shortcut_installer() -> Box<dyn ShortcutInstaller + Send + Sync> {
    if cfg!(windows) {
        return Box::new(WindowsShellLinks::discover());
    }
    if cfg!(target_os = "macos") {
        return Box::new(MacosAliases::discover());
    }
    Box::new(FreedesktopShortcuts::discover())
}

/// `.desktop` launchers for Linux and other freedesktop hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreedesktopShortcuts {
    desktop_dir: Option<PathBuf>,
    applications_dir: Option<PathBuf>,
}

impl FreedesktopShortcuts {
    pub fn new(desktop_dir: Option<PathBuf>, applications_dir: Option<PathBuf>) -> Self {
        Self {
            desktop_dir,
            applications_dir,
        }
    }

    pub fn discover() -> Self {
        let applications_dir = dirs::data_dir()
            .map(|dir| dir.join("applications"))
            .or_else(|| dirs::home_dir().map(|home| project_linux_user_applications_dir(&home)));
        Self::new(dirs::desktop_dir(), applications_dir)
    }
}

impl ShortcutInstaller for FreedesktopShortcuts {
    fn executable_path(&self, install_dir: &Path) -> PathBuf {
        install_dir.join(PRODUCT_SLUG)
    }

    fn create_shortcut(
        &self,
        kind: ShortcutKind,
        _install_dir: &Path,
        executable: &Path,
    ) -> Result<Option<PathBuf>> {
        let dir = match kind {
            ShortcutKind::Desktop => self
                .desktop_dir
                .clone()
                .ok_or_else(|| anyhow!("could not locate the desktop folder"))?,
            ShortcutKind::Menu => {
                let dir = self
                    .applications_dir
                    .clone()
                    .ok_or_else(|| anyhow!("could not locate the applications menu folder"))?;
                fs::create_dir_all(&dir).with_context(|| {
                    format!("failed to create applications menu folder {}", dir.display())
                })?;
                dir
            }
        };

        let entry_path = dir.join(format!("{PRODUCT_SLUG}.desktop"));
        fs::write(&entry_path, render_desktop_entry(executable).as_bytes()).with_context(|| {
            format!("failed to write {kind} launcher {}", entry_path.display())
        })?;
        mark_launcher_executable(&entry_path)?;
        Ok(Some(entry_path))
    }
}

pub(crate) fn project_linux_user_applications_dir(home: &Path) -> PathBuf {
    home.join(".local").join("share").join("applications")
}

pub(crate) fn render_desktop_entry(executable: &Path) -> String {
    let mut desktop = String::new();
    desktop.push_str("[Desktop Entry]\n");
    desktop.push_str("Type=Application\n");
    desktop.push_str(&format!("Name={PRODUCT_DISPLAY_NAME}\n"));
    desktop.push_str(&format!("Exec=\"{}\"\n", executable.display()));
    desktop.push_str(&format!("Icon={}\n", executable.display()));
    desktop.push_str("Terminal=false\n");
    desktop.push_str("Categories=Utility;Development;\n");
    desktop
}

#[cfg(unix)]
fn mark_launcher_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to mark launcher executable: {}", path.display()))
}

#[cfg(not(unix))]
fn mark_launcher_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Finder aliases for macOS, expressed as symbolic links to the app bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacosAliases {
    desktop_dir: Option<PathBuf>,
    user_applications_dir: Option<PathBuf>,
}

impl MacosAliases {
    pub fn new(desktop_dir: Option<PathBuf>, user_applications_dir: Option<PathBuf>) -> Self {
        Self {
            desktop_dir,
            user_applications_dir,
        }
    }

    pub fn discover() -> Self {
        Self::new(
            dirs::desktop_dir(),
            dirs::home_dir().map(|home| home.join("Applications")),
        )
    }
}

impl ShortcutInstaller for MacosAliases {
    fn executable_path(&self, install_dir: &Path) -> PathBuf {
        install_dir.join(format!("{PRODUCT_DISPLAY_NAME}.app"))
    }

    fn create_shortcut(
        &self,
        kind: ShortcutKind,
        _install_dir: &Path,
        executable: &Path,
    ) -> Result<Option<PathBuf>> {
        let dir = match kind {
            ShortcutKind::Desktop => self
                .desktop_dir
                .clone()
                .ok_or_else(|| anyhow!("could not locate the desktop folder"))?,
            ShortcutKind::Menu => {
                if is_inside_applications_dir(executable) {
                    debug!(
                        "{} already lives in an Applications folder; no menu alias needed",
                        executable.display()
                    );
                    return Ok(None);
                }
                let dir = self
                    .user_applications_dir
                    .clone()
                    .ok_or_else(|| anyhow!("could not locate the user Applications folder"))?;
                fs::create_dir_all(&dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
                dir
            }
        };

        let app_name = executable
            .file_name()
            .ok_or_else(|| anyhow!("invalid application bundle path: {}", executable.display()))?;
        let link_path = dir.join(app_name);
        remove_file_if_exists(&link_path)
            .with_context(|| format!("failed to replace alias {}", link_path.display()))?;
        create_symlink(executable, &link_path).with_context(|| {
            format!(
                "failed to create {kind} alias {} -> {}",
                link_path.display(),
                executable.display()
            )
        })?;
        Ok(Some(link_path))
    }
}

fn is_inside_applications_dir(bundle: &Path) -> bool {
    bundle
        .ancestors()
        .skip(1)
        .any(|ancestor| ancestor.file_name().is_some_and(|name| name == "Applications"))
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic aliases are only supported on unix hosts",
    ))
}

pub(crate) type CommandRunner = fn(&mut Command, &str) -> Result<()>;

/// `.lnk` shell links created through PowerShell's `WScript.Shell` object.
#[derive(Debug, Clone)]
pub struct WindowsShellLinks {
    desktop_dir: Option<PathBuf>,
    start_menu_dir: Option<PathBuf>,
    run_command: CommandRunner,
}

impl WindowsShellLinks {
    pub fn new(desktop_dir: Option<PathBuf>, start_menu_dir: Option<PathBuf>) -> Self {
        Self {
            desktop_dir,
            start_menu_dir,
            run_command,
        }
    }

    pub fn discover() -> Self {
        Self::new(
            dirs::desktop_dir(),
            dirs::data_dir().map(|appdata| project_windows_start_menu_programs_dir(&appdata)),
        )
    }

    #[cfg(test)]
    pub(crate) fn with_runner(mut self, run_command: CommandRunner) -> Self {
        self.run_command = run_command;
        self
    }
}

impl ShortcutInstaller for WindowsShellLinks {
    fn executable_path(&self, install_dir: &Path) -> PathBuf {
        install_dir.join(format!("{PRODUCT_SLUG}.exe"))
    }

    fn create_shortcut(
        &self,
        kind: ShortcutKind,
        _install_dir: &Path,
        executable: &Path,
    ) -> Result<Option<PathBuf>> {
        let dir = match kind {
            ShortcutKind::Desktop => self
                .desktop_dir
                .clone()
                .ok_or_else(|| anyhow!("could not locate the desktop folder"))?,
            ShortcutKind::Menu => self
                .start_menu_dir
                .clone()
                .ok_or_else(|| anyhow!("could not locate the Start Menu folder"))?,
        };

        let link_path = dir.join(format!("{PRODUCT_DISPLAY_NAME}.lnk"));
        let mut command = build_shell_link_command(&link_path, executable);
        (self.run_command)(&mut command, &format!("failed to create {kind} shortcut"))?;
        Ok(Some(link_path))
    }
}

pub(crate) fn project_windows_start_menu_programs_dir(appdata: &Path) -> PathBuf {
    appdata
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
}

pub(crate) fn build_shell_link_command(link_path: &Path, executable: &Path) -> Command {
    let working_dir = executable.parent().unwrap_or(executable);
    let script = format!(
        "$ErrorActionPreference='Stop';\
         $WScriptShell=New-Object -ComObject WScript.Shell;\
         $Shortcut=$WScriptShell.CreateShortcut('{link}');\
         $Shortcut.TargetPath='{exe}';\
         $Shortcut.WorkingDirectory='{dir}';\
         $Shortcut.IconLocation='{exe}';\
         $Shortcut.Save();",
        link = powershell_quote(link_path),
        exe = powershell_quote(executable),
        dir = powershell_quote(working_dir),
    );

    let mut command = Command::new("powershell");
    command
        .arg("-NoProfile")
        .arg("-ExecutionPolicy")
        .arg("Bypass")
        .arg("-Command")
        .arg(script);
    command
}

fn powershell_quote(path: &Path) -> String {
    path.display().to_string().replace('\'', "''")
}

pub(crate) fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    Err(anyhow!(
        "{context_message}: status={} stdout='{}' stderr='{}'",
        output.status,
        stdout.trim(),
        stderr.trim()
    ))
}
