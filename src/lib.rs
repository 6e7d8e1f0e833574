//! # Bookmarks Importer Library
//!
//! Converts Netscape bookmark HTML exports into Markdown documents.
//! Bookmarks can be rendered as a folder hierarchy, a screenshot table or an
//! HTML card grid.
//!
//! ## Example Usage
//!
//! ```rust
//! use bookmarks_importer::{BookmarkParser, MarkdownRenderer, Settings, ViewMode};
//!
//! let html = r#"<DL><p><DT><A HREF="https://www.rust-lang.org/">Rust</A></DL>"#;
//! let bookmarks = BookmarkParser::parse_html(html)?;
//!
//! let settings = Settings {
//!     view_mode: ViewMode::List,
//!     ..Settings::default()
//! };
//! let markdown = MarkdownRenderer::new(&settings).render(&bookmarks);
//!
//! assert_eq!(markdown, "- [Rust](https://www.rust-lang.org/)\n");
//! # Ok::<(), bookmarks_importer::BookmarksImporterError>(())
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use config::{DateFormat, ScreenshotService, Settings, SettingsStore, ViewMode};
pub use error::{BookmarksImporterError, Result};
pub use services::{
    BookmarkParser, Confirm, CreationDate, FilePicker, FixedAnswer, FsStorage, Importer, MarkdownRenderer,
    PathPicker, Storage, TerminalConfirm,
};
pub use types::{Bookmark, BookmarkStats, FlatBookmark, ImportReport};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::renderer::flatten;

    const EXPORT: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks Menu</H1>
<DL><p>
    <DT><H3>Toolbar</H3>
    <DL><p>
        <DT><A HREF="https://news.ycombinator.com/" ADD_DATE="1700000000">Hacker News</A>
        <DT><H3>Rust</H3>
        <DL><p>
            <DT><A HREF="https://doc.rust-lang.org/book/">The Book</A>
            <DT><A HREF="https://tokio.rs/">Tokio | async</A>
        </DL><p>
    </DL><p>
    <DT><A HREF="http://192.168.1.1/">Router</A>
</DL><p>"#;

    #[test]
    fn test_parse_then_flatten_keeps_document_order() {
        let bookmarks = BookmarkParser::parse_html(EXPORT).unwrap();
        let flat = flatten(&bookmarks);

        let summary: Vec<(&str, &str)> = flat.iter().map(|b| (b.title, b.folder.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                ("Hacker News", "Toolbar"),
                ("The Book", "Toolbar > Rust"),
                ("Tokio | async", "Toolbar > Rust"),
                ("Router", "Root"),
            ]
        );
    }

    #[test]
    fn test_table_workflow() {
        let bookmarks = BookmarkParser::parse_html(EXPORT).unwrap();
        let settings = Settings {
            view_mode: ViewMode::Table,
            ..Settings::default()
        };

        let markdown = MarkdownRenderer::new(&settings).render(&bookmarks);
        let rows: Vec<&str> = markdown.lines().filter(|l| l.starts_with("| ![")).collect();

        assert_eq!(rows.len(), 4);
        assert!(rows[2].contains("[Tokio \\| async](https://tokio.rs/)"));
        assert!(rows[3].contains("https://via.placeholder.com/1920x1080/"));
    }

    #[tokio::test]
    async fn test_import_to_filesystem() {
        let dir = tempfile::TempDir::new().unwrap();
        let export = dir.path().join("bookmarks.html");
        std::fs::write(&export, EXPORT).unwrap();

        let settings = Settings {
            output_folder: "Imports".to_string(),
            file_name_pattern: "{title}".to_string(),
            ..Settings::default()
        };
        let importer = Importer::new(&settings, FsStorage::new(dir.path().join("vault")), FixedAnswer(true));

        let report = importer.run(&PathPicker::new(Some(export))).await.unwrap().unwrap();

        assert_eq!(report.path, "Imports/Bookmarks.md");
        assert_eq!(report.stats.leaves, 4);
        let written = std::fs::read_to_string(dir.path().join("vault").join("Imports").join("Bookmarks.md")).unwrap();
        assert!(written.starts_with("# Bookmarks\n\n*Imported on: "));
        assert!(written.contains("<div class=\"bookmarks-cards\">"));
        assert!(written.contains("<p class=\"bookmark-card-url\">news.ycombinator.com</p>"));
    }

    #[tokio::test]
    async fn test_import_with_slash_date_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let export = dir.path().join("bookmarks.html");
        std::fs::write(&export, format!("<!-- 2024-03-09 -->\n{}", EXPORT)).unwrap();

        let settings = Settings {
            date_format: DateFormat::DayMonthYearSlash,
            ..Settings::default()
        };
        let vault = dir.path().join("vault");
        let importer = Importer::new(&settings, FsStorage::new(&vault), FixedAnswer(true));

        let report = importer.run(&PathPicker::new(Some(export))).await.unwrap().unwrap();

        assert_eq!(report.path, "Bookmarks 09/03/2024.md");
        assert_eq!(report.creation_date, "09/03/2024");
        let written = std::fs::read_to_string(vault.join("Bookmarks 09").join("03").join("2024.md")).unwrap();
        assert!(written.contains("*Creation date: 09/03/2024*"));
    }
}
