//! Persisted importer settings.
//!
//! Settings live in a flat JSON record with camelCase keys. Any field missing
//! from the file is filled from [`Settings::default`], and unrecognised enum
//! values degrade to a sensible fallback instead of failing the load.

use crate::error::{BookmarksImporterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

pub const DEFAULT_FILE_NAME: &str = "Bookmarks";
pub const DEFAULT_FILE_NAME_PATTERN: &str = "{title} {date}";
pub const DEFAULT_SCREENSHOT_WIDTH: u32 = 1920;
pub const DEFAULT_SCREENSHOT_HEIGHT: u32 = 1080;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub output_file_name: String,
    pub file_name_pattern: String,
    pub date_format: DateFormat,
    pub output_folder: String,
    pub include_descriptions: bool,
    /// Reserved; no renderer mirrors folders on disk yet.
    pub create_folder_structure: bool,
    pub view_mode: ViewMode,
    pub screenshot_service: ScreenshotService,
    pub screenshot_width: u32,
    pub screenshot_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_file_name: DEFAULT_FILE_NAME.to_string(),
            file_name_pattern: DEFAULT_FILE_NAME_PATTERN.to_string(),
            date_format: DateFormat::default(),
            output_folder: String::new(),
            include_descriptions: true,
            create_folder_structure: true,
            view_mode: ViewMode::Cards,
            screenshot_service: ScreenshotService::ThumIo,
            screenshot_width: DEFAULT_SCREENSHOT_WIDTH,
            screenshot_height: DEFAULT_SCREENSHOT_HEIGHT,
        }
    }
}

impl Settings {
    /// Replaces blank or zero values with their defaults.
    pub fn normalized(mut self) -> Self {
        if self.file_name_pattern.is_empty() {
            self.file_name_pattern = DEFAULT_FILE_NAME_PATTERN.to_string();
        }
        if self.output_file_name.is_empty() {
            self.output_file_name = DEFAULT_FILE_NAME.to_string();
        }
        if self.screenshot_width == 0 {
            self.screenshot_width = DEFAULT_SCREENSHOT_WIDTH;
        }
        if self.screenshot_height == 0 {
            self.screenshot_height = DEFAULT_SCREENSHOT_HEIGHT;
        }
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json).map_err(|e| BookmarksImporterError::Settings {
            reason: format!("Invalid settings file: {}", e),
        })?;
        Ok(settings.normalized())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateFormat {
    #[default]
    YearMonthDay,
    DayMonthYear,
    MonthDayYear,
    YearMonthDaySlash,
    DayMonthYearSlash,
    MonthDayYearSlash,
}

impl DateFormat {
    pub const ALL: [DateFormat; 6] = [
        DateFormat::YearMonthDay,
        DateFormat::DayMonthYear,
        DateFormat::MonthDayYear,
        DateFormat::YearMonthDaySlash,
        DateFormat::DayMonthYearSlash,
        DateFormat::MonthDayYearSlash,
    ];

    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::YearMonthDay => "YYYY-MM-DD",
            DateFormat::DayMonthYear => "DD-MM-YYYY",
            DateFormat::MonthDayYear => "MM-DD-YYYY",
            DateFormat::YearMonthDaySlash => "YYYY/MM/DD",
            DateFormat::DayMonthYearSlash => "DD/MM/YYYY",
            DateFormat::MonthDayYearSlash => "MM/DD/YYYY",
        }
    }
}

impl From<String> for DateFormat {
    fn from(value: String) -> Self {
        DateFormat::ALL
            .into_iter()
            .find(|format| format.pattern() == value)
            .unwrap_or_default()
    }
}

impl From<DateFormat> for String {
    fn from(value: DateFormat) -> Self {
        value.pattern().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ViewMode {
    #[default]
    List,
    Table,
    Cards,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::List => "list",
            ViewMode::Table => "table",
            ViewMode::Cards => "cards",
        }
    }
}

impl From<String> for ViewMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "table" => ViewMode::Table,
            "cards" => ViewMode::Cards,
            _ => ViewMode::List,
        }
    }
}

impl From<ViewMode> for String {
    fn from(value: ViewMode) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScreenshotService {
    ThumIo,
    ThumbnailWs,
    None,
    /// A value this version does not know; always renders the placeholder.
    Other(String),
}

impl From<String> for ScreenshotService {
    fn from(value: String) -> Self {
        match value.as_str() {
            "thum.io" => ScreenshotService::ThumIo,
            "api.thumbnail.ws" => ScreenshotService::ThumbnailWs,
            "none" => ScreenshotService::None,
            _ => ScreenshotService::Other(value),
        }
    }
}

impl From<ScreenshotService> for String {
    fn from(value: ScreenshotService) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ScreenshotService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenshotService::ThumIo => f.write_str("thum.io"),
            ScreenshotService::ThumbnailWs => f.write_str("api.thumbnail.ws"),
            ScreenshotService::None => f.write_str("none"),
            ScreenshotService::Other(value) => f.write_str(value),
        }
    }
}

/// JSON file holding the persisted [`Settings`].
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Settings> {
        if !fs::try_exists(&self.path).await? {
            debug!("No settings file at {}, using defaults", self.path.display());
            return Ok(Settings::default());
        }

        let json = fs::read_to_string(&self.path).await?;
        let settings = Settings::from_json(&json)?;
        debug!("Loaded settings from {}", self.path.display());
        Ok(settings)
    }

    pub async fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json).await?;
        info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
