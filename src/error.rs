use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookmarksImporterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bookmark structure not found in HTML file")]
    StructureNotFound,

    #[error("Could not read {path}: {reason}")]
    FileRead { path: String, reason: String },

    #[error("Storage error: {reason}")]
    Storage { reason: String },

    #[error("Settings error: {reason}")]
    Settings { reason: String },
}

pub type Result<T> = std::result::Result<T, BookmarksImporterError>;
