//! Persistent storage
//!
//! Local persistence is limited to settings; chats live on the server.

use std::path::PathBuf;
use thiserror::Error;

pub mod settings;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access data directory: {0}")]
    DataDirError(String),
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to serialize/deserialize JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Get the application data directory
///
/// Returns the platform-specific application data directory:
/// - Windows: `C:\Users\{user}\AppData\Roaming\TitanChat\TitanChat`
/// - macOS: `/Users/{user}/Library/Application Support/com.TitanChat.TitanChat`
/// - Linux: `/home/{user}/.local/share/titanchat`
pub fn get_data_dir() -> Result<PathBuf, StorageError> {
    directories::ProjectDirs::from("com", "TitanChat", "TitanChat")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| StorageError::DataDirError("Could not determine data directory".to_string()))
}

/// Create the data directory if it does not exist yet
pub fn init_storage() -> Result<PathBuf, StorageError> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Initialized storage at: {}", data_dir.display());
    Ok(data_dir)
}
