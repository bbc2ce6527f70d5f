mod fs_utils;
mod layout;
mod payload;
mod shortcuts;
mod state_file;
mod tasks;
mod workflow;

pub use fs_utils::{ensure_writable_dir, normalize_install_path, remove_file_if_exists};
pub use layout::{default_install_path, default_state_file_path, SetupLayout};
pub use payload::{copy_payload, copy_percent, count_payload_files, CopyProgress};
pub use shortcuts::{
    platform_shortcut_installer, FreedesktopShortcuts, MacosAliases, ShortcutInstaller,
    ShortcutKind, WindowsShellLinks,
};
pub use state_file::{read_installer_state, write_installer_state};
pub use tasks::{spawn_detection, spawn_installation};
pub use workflow::{InstallRequest, InstallWorkflow, InstallerEvent};
