use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::paths::AppPaths;

pub const DEFAULT_ABOUT_URL: &str = "https://github.com/jj-repository/TextCompare";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub min_width: i32,
    pub min_height: i32,
    /// Allows the web inspector from the View menu.
    pub developer_extras: bool,
    pub about_url: String,
    /// Overrides the bundled page location.
    pub content_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_width: 800,
            min_height: 600,
            developer_extras: true,
            about_url: DEFAULT_ABOUT_URL.to_string(),
            content_file: None,
        }
    }
}

impl Settings {
    pub fn load(paths: &AppPaths) -> Self {
        let Ok(raw) = fs::read_to_string(&paths.config_file) else {
            return Self::default();
        };
        toml::from_str(&raw).unwrap_or_else(|err| {
            log::warn!(
                "Ignoring invalid {}: {err}",
                paths.config_file.display()
            );
            Self::default()
        })
    }

    /// Like `load`, but writes the defaults out on first run so the file is
    /// there to edit.
    pub fn load_or_init(paths: &AppPaths) -> Self {
        let settings = Self::load(paths);
        if !paths.config_file.exists() {
            if let Err(err) = settings.save(paths) {
                log::warn!("Failed to write default settings: {err:?}");
            }
        }
        settings
    }

    pub fn save(&self, paths: &AppPaths) -> Result<()> {
        let toml = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(&paths.config_file, toml).context("Failed to write settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dir(dir.path());
        assert_eq!(Settings::load(&paths), Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dir(dir.path());
        fs::write(&paths.config_file, "min_width = 1024\ndeveloper_extras = false\n").unwrap();

        let settings = Settings::load(&paths);
        assert_eq!(settings.min_width, 1024);
        assert!(!settings.developer_extras);
        assert_eq!(settings.min_height, 600);
        assert_eq!(settings.about_url, DEFAULT_ABOUT_URL);
        assert!(settings.content_file.is_none());
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dir(dir.path());
        fs::write(&paths.config_file, "min_width = \"wide\"").unwrap();
        assert_eq!(Settings::load(&paths), Settings::default());
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dir(dir.path());
        assert_eq!(Settings::load_or_init(&paths), Settings::default());
        let raw = fs::read_to_string(&paths.config_file).unwrap();
        assert!(raw.contains("min_width = 800"));
        assert_eq!(Settings::load(&paths), Settings::default());
    }

    #[test]
    fn test_existing_file_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dir(dir.path());
        fs::write(&paths.config_file, "min_height = 720\n").unwrap();
        assert_eq!(Settings::load_or_init(&paths).min_height, 720);
        assert_eq!(
            fs::read_to_string(&paths.config_file).unwrap(),
            "min_height = 720\n"
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dir(dir.path());
        let settings = Settings {
            min_height: 480,
            content_file: Some(PathBuf::from("/opt/textcompare/index.html")),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();
        assert_eq!(Settings::load(&paths), settings);
    }
}
