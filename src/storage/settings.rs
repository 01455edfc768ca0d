//! Settings storage
//!
//! Manages persistence of user preferences and connection settings.

use crate::storage::{get_data_dir, StorageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `server_url` when set
pub const SERVER_URL_ENV: &str = "TITAN_SERVER_URL";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Base URL of the chat server
    pub server_url: String,
    /// Connect timeout for backend requests, in seconds
    pub request_timeout_secs: u64,
    /// Thinking mode used until the server reports its own
    pub thinking_by_default: bool,
    /// Attempts when creating or validating a session
    pub session_retry_attempts: u32,
    /// First retry delay in milliseconds, doubled on each retry
    pub session_retry_backoff_ms: u64,
    /// UI theme: "dark" or "light"
    pub theme: String,
    /// Font size: "small", "medium", or "large"
    pub font_size: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: 30,
            thinking_by_default: false,
            session_retry_attempts: 3,
            session_retry_backoff_ms: 2000,
            theme: "dark".to_string(),
            font_size: "medium".to_string(),
        }
    }
}

impl AppSettings {
    /// Validate settings values
    ///
    /// Ensures all parameters are within acceptable ranges
    pub fn validate(&mut self) {
        let url = self.server_url.trim().trim_end_matches('/');
        self.server_url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            DEFAULT_SERVER_URL.to_string()
        };

        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 300);
        self.session_retry_attempts = self.session_retry_attempts.clamp(1, 10);
        self.session_retry_backoff_ms = self.session_retry_backoff_ms.clamp(100, 30_000);

        // Validate theme
        if self.theme != "dark" && self.theme != "light" {
            self.theme = "dark".to_string();
        }

        // Validate font size
        if !["small", "medium", "large"].contains(&self.font_size.as_str()) {
            self.font_size = "medium".to_string();
        }
    }

    /// Server URL to connect to.
    ///
    /// A non-empty `TITAN_SERVER_URL` wins over the stored value. It is never
    /// written back into the settings.
    pub fn effective_server_url(&self) -> String {
        self.server_url_with_override(std::env::var(SERVER_URL_ENV).ok())
    }

    fn server_url_with_override(&self, value: Option<String>) -> String {
        match value.filter(|u| !u.trim().is_empty()) {
            Some(url) => {
                tracing::info!("Using server URL from {}", SERVER_URL_ENV);
                let mut overridden = self.clone();
                overridden.server_url = url;
                overridden.validate();
                overridden.server_url
            }
            None => self.server_url.clone(),
        }
    }
}

/// Get the settings file path
fn get_settings_path() -> Result<PathBuf, StorageError> {
    Ok(get_data_dir()?.join("settings.json"))
}

/// Load settings from disk
///
/// Returns default settings if the file doesn't exist or is corrupted.
pub fn load_settings() -> AppSettings {
    match get_settings_path().and_then(|p| load_settings_from(&p)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            AppSettings::default()
        }
    }
}

/// Load and validate settings from a specific file
pub fn load_settings_from(path: &Path) -> Result<AppSettings, StorageError> {
    if !path.exists() {
        tracing::info!("Settings file not found, using defaults");
        return Ok(AppSettings::default());
    }

    let json = fs::read_to_string(path)?;
    let mut settings: AppSettings = serde_json::from_str(&json)?;

    // Validate loaded settings
    settings.validate();

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Save settings to disk
pub fn save_settings(settings: &AppSettings) -> Result<(), StorageError> {
    save_settings_to(&get_settings_path()?, settings)
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), StorageError> {
    // Ensure the parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;

    tracing::debug!("Saved settings to {}", path.display());
    Ok(())
}
