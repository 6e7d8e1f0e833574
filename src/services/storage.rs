use crate::error::{BookmarksImporterError, Result};
use crate::services::importer::{Confirm, FilePicker, Storage};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Storage rooted at a directory on the local filesystem.
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a vault path onto the root. `.` and `..` segments are dropped so
    /// the result never leaves the root.
    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|segment| !matches!(*segment, "" | "." | ".."))
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    async fn ensure_dir(dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            fs::create_dir_all(dir).await.map_err(|e| BookmarksImporterError::Storage {
                reason: format!("Failed to create folder {}: {}", dir.display(), e),
            })?;
            info!("Created folder: {}", dir.display());
        }
        Ok(())
    }
}

impl Storage for FsStorage {
    type Handle = PathBuf;

    async fn ensure_folder(&self, path: &str) -> Result<()> {
        Self::ensure_dir(&self.resolve(path)).await
    }

    async fn existing(&self, path: &str) -> Result<Option<PathBuf>> {
        let file = self.resolve(path);
        let exists = fs::try_exists(&file).await?;
        Ok(exists.then_some(file))
    }

    async fn overwrite(&self, handle: &PathBuf, text: &str) -> Result<()> {
        fs::write(handle, text).await.map_err(|e| BookmarksImporterError::Storage {
            reason: format!("Failed to write {}: {}", handle.display(), e),
        })
    }

    async fn create(&self, path: &str, text: &str) -> Result<()> {
        let file = self.resolve(path);
        // Slash date formats put part of the name into subfolders
        if let Some(parent) = file.parent() {
            Self::ensure_dir(parent).await?;
        }

        let mut handle = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file)
            .await
            .map_err(|e| BookmarksImporterError::Storage {
                reason: format!("Failed to create {}: {}", file.display(), e),
            })?;

        handle.write_all(text.as_bytes()).await?;
        handle.flush().await?;
        debug!("Wrote {} bytes to {}", text.len(), file.display());
        Ok(())
    }
}

/// Picks the file named on the command line, if any.
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl FilePicker for PathPicker {
    async fn pick(&self) -> Result<Option<String>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };

        if !has_html_extension(path) {
            warn!("{} does not look like an HTML export", path.display());
        }

        info!("Reading file: {}", path.display());
        let content = fs::read_to_string(path).await.map_err(|e| BookmarksImporterError::FileRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(content))
    }
}

fn has_html_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// Prompts on stdin, defaulting to "no".
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                warn!("Could not read answer: {}", e);
                false
            }
        }
    }
}

/// Answers every question the same way, for non-interactive runs.
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, message: &str) -> bool {
        debug!("{} -> {}", message, if self.0 { "yes" } else { "no" });
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fs_storage_lifecycle() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());

        storage.ensure_folder("Imports/2024").await.unwrap();
        storage.ensure_folder("Imports/2024").await.unwrap();
        assert!(dir.path().join("Imports").join("2024").is_dir());

        assert!(storage.existing("Imports/2024/a.md").await.unwrap().is_none());
        storage.create("Imports/2024/a.md", "first").await.unwrap();

        let handle = storage.existing("Imports/2024/a.md").await.unwrap().unwrap();
        storage.overwrite(&handle, "second").await.unwrap();
        assert_eq!(std::fs::read_to_string(&handle).unwrap(), "second");

        let err = storage.create("Imports/2024/a.md", "third").await.unwrap_err();
        assert!(matches!(err, BookmarksImporterError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_create_makes_missing_parent_folders() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());

        storage.create("Bookmarks 09/03/2024.md", "body").await.unwrap();

        let file = dir.path().join("Bookmarks 09").join("03").join("2024.md");
        assert_eq!(std::fs::read_to_string(file).unwrap(), "body");
        assert!(storage.existing("Bookmarks 09/03/2024.md").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_paths_stay_inside_root() {
        let dir = TempDir::new().unwrap();
        let vault = dir.path().join("vault");
        let storage = FsStorage::new(&vault);

        assert_eq!(storage.resolve("../outside/./a.md"), vault.join("outside").join("a.md"));

        storage.ensure_folder("../outside").await.unwrap();
        storage.create("../../outside/a.md", "body").await.unwrap();

        assert!(vault.join("outside").join("a.md").is_file());
        assert!(!dir.path().join("outside").exists());
    }

    #[tokio::test]
    async fn test_path_picker() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bookmarks.html");
        std::fs::write(&file, "<dl></dl>").unwrap();

        assert_eq!(PathPicker::new(None).pick().await.unwrap(), None);
        assert_eq!(
            PathPicker::new(Some(file)).pick().await.unwrap().as_deref(),
            Some("<dl></dl>")
        );

        let err = PathPicker::new(Some(dir.path().join("missing.html")))
            .pick()
            .await
            .unwrap_err();
        assert!(matches!(err, BookmarksImporterError::FileRead { .. }));
    }

    #[test]
    fn test_html_extension() {
        assert!(has_html_extension(Path::new("export.HTML")));
        assert!(has_html_extension(Path::new("export.htm")));
        assert!(!has_html_extension(Path::new("export.json")));
        assert!(!has_html_extension(Path::new("export")));
    }
}
