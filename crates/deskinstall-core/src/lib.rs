mod action;
mod product;
mod state;
mod status;
mod version;

pub use action::InstallAction;
pub use product::{available_version, PRODUCT_DISPLAY_NAME, PRODUCT_SLUG, STATE_FILE_NAME};
pub use state::InstallerState;
pub use status::{InstallResult, InstallationStatus};
pub use version::compare_versions;

#[cfg(test)]
mod tests;
