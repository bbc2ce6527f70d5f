use anyhow::{anyhow, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallAction {
    FreshInstall,
    UpdateExisting,
    RepairExisting,
}

impl InstallAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FreshInstall => "fresh",
            Self::UpdateExisting => "update",
            Self::RepairExisting => "repair",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fresh" | "install" => Ok(Self::FreshInstall),
            "update" => Ok(Self::UpdateExisting),
            "repair" => Ok(Self::RepairExisting),
            other => Err(anyhow!(
                "invalid install action '{other}' (expected fresh, update or repair)"
            )),
        }
    }

    /// Update and repair reuse an existing directory that must stay writable.
    pub fn requires_writable_target(self) -> bool {
        !matches!(self, Self::FreshInstall)
    }

    pub fn completion_message(self) -> &'static str {
        match self {
            Self::FreshInstall => "Installation completed successfully.",
            Self::UpdateExisting => "Update completed successfully.",
            Self::RepairExisting => "Repair completed successfully.",
        }
    }
}
