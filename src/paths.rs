use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const STATE_FILE_NAME: &str = "window-state.json";
pub const CONFIG_FILE_NAME: &str = "settings.toml";

/// Locations inside the per-user application data directory.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_file: PathBuf,
    pub state_file: PathBuf,
}

impl AppPaths {
    pub fn initialize() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "TextCompare", "textcompare")
            .context("Unable to determine user data directory")?;
        let data_dir = dirs.config_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir).context("Failed to create user data directory")?;
        Ok(Self::in_dir(&data_dir))
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self {
            config_file: dir.join(CONFIG_FILE_NAME),
            state_file: dir.join(STATE_FILE_NAME),
        }
    }
}
