// Editor configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::EditorSettings;

/// Location of `config.toml` in the platform config directory.
pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("com", "RustCalendar", "IntervalGrid") {
        dirs.config_dir().join("config.toml")
    } else {
        log::warn!("Unable to resolve project directory; using current dir for config");
        PathBuf::from("config.toml")
    }
}

/// Load settings from `path`. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<EditorSettings> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(EditorSettings::default());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    let settings: EditorSettings = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    settings
        .validate()
        .map_err(|e| anyhow!("Invalid settings in {}: {}", path.display(), e))?;
    Ok(settings)
}

/// Load settings, falling back to defaults with a warning on any error.
pub fn load_settings_or_default(path: &Path) -> EditorSettings {
    match load_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Failed to load settings: {:#}, using defaults", e);
            EditorSettings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &EditorSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }
    }

    let data = toml::to_string_pretty(settings).context("failed to serialize settings")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write config to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::{GridSettings, GridUnit};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, EditorSettings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let settings = EditorSettings {
            grid: GridSettings::new(GridUnit::Year, 2).unwrap(),
            prevent_overlap: false,
            display_timezone: "Australia/Brisbane".to_string(),
            reference_instant: Some(0),
            ..EditorSettings::default()
        };

        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_config_rejected_then_defaulted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[grid]\nunit = \"month\"\nvalue = 40\n").unwrap();

        let err = load_settings(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid settings"));
        assert_eq!(load_settings_or_default(&path), EditorSettings::default());
    }

    #[test]
    fn test_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "grid = [").unwrap();
        assert!(load_settings(&path).is_err());
    }
}
