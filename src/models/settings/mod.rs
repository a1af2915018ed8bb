// Settings module
// User-tunable calendar geometry, interaction and locale settings

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::utils::date::parse_weekday;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Pixel height of one hour row
    pub hour_height: f32,
    /// Snap granularity in minutes
    pub slot_minutes: u32,
    /// Pointer travel (px) that turns a click into a drag
    pub drag_threshold: f32,
    /// Smallest visual height of an event block (px)
    pub min_block_height: f32,
    pub first_day_of_week: String,
    /// IANA timezone name used to render instants
    pub timezone: String,
    pub database_path: Option<PathBuf>,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            hour_height: 80.0,
            slot_minutes: 15,
            drag_threshold: 5.0,
            min_block_height: 30.0,
            first_day_of_week: "Monday".to_string(),
            timezone: "UTC".to_string(),
            database_path: None,
        }
    }
}

impl CalendarSettings {
    /// Viewer timezone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone '{}': {}", self.timezone, e))
    }

    /// First weekday of the visible week; unknown names fall back to Monday
    pub fn first_weekday(&self) -> Weekday {
        parse_weekday(&self.first_day_of_week).unwrap_or(Weekday::Mon)
    }

    /// Check ranges the grid depends on
    pub fn validate(&self) -> Result<()> {
        if self.hour_height.is_nan() || self.hour_height <= 0.0 {
            return Err(anyhow!("hour_height must be positive"));
        }
        if self.slot_minutes == 0 || 1440 % self.slot_minutes != 0 {
            return Err(anyhow!("slot_minutes must divide a day evenly"));
        }
        if self.drag_threshold < 0.0 {
            return Err(anyhow!("drag_threshold cannot be negative"));
        }
        self.tz()?;
        Ok(())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
