use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::models::settings::CalendarSettings;

const SETTINGS_FILE: &str = "settings.toml";
const DATABASE_FILE: &str = "calendar.db";

/// Loads and stores `CalendarSettings` as TOML.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    /// Use an explicit settings file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `settings.toml` in the platform config directory
    pub fn from_project_dirs() -> Result<Self> {
        let dirs = project_dirs()?;
        Ok(Self::new(dirs.config_dir().join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, writing defaults first when the file does not exist
    pub fn load_or_create(&self) -> Result<CalendarSettings> {
        if !self.path.exists() {
            log::info!("No settings at {:?}, writing defaults", self.path);
            let settings = CalendarSettings::default();
            self.save(&settings)?;
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&self.path)
            .context(format!("Failed to read settings from {:?}", self.path))?;
        CalendarSettings::from_toml(&content)
            .context(format!("Invalid settings in {:?}", self.path))
    }

    pub fn save(&self, settings: &CalendarSettings) -> Result<()> {
        settings.validate()?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create settings directory {:?}", parent))?;
        }

        std::fs::write(&self.path, settings.to_toml()?)
            .context(format!("Failed to write settings to {:?}", self.path))?;
        Ok(())
    }
}

/// Database location: the configured path, else `calendar.db` in the
/// platform data directory
pub fn database_path(settings: &CalendarSettings) -> Result<PathBuf> {
    if let Some(path) = &settings.database_path {
        return Ok(path.clone());
    }
    let dirs = project_dirs()?;
    std::fs::create_dir_all(dirs.data_dir())
        .context(format!("Failed to create data directory {:?}", dirs.data_dir()))?;
    Ok(dirs.data_dir().join(DATABASE_FILE))
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "CoachDashboard", "CoachCalendar")
        .context("Failed to determine the platform config directory")
}
