use crate::config::Settings;
use crate::error::Result;
use crate::services::dates::{generate_file_name, CreationDate};
use crate::services::parser::BookmarkParser;
use crate::services::renderer::MarkdownRenderer;
use crate::types::{Bookmark, BookmarkStats, ImportReport};
use chrono::{NaiveDate, Utc};
use scraper::Html;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Message shown to the user once an import has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Imported,
    Failed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Imported => f.write_str("Bookmarks imported successfully!"),
            Notice::Failed(reason) => write!(f, "Error importing bookmarks: {}", reason),
        }
    }
}

/// Where the rendered document is written.
///
/// Paths are `/`-separated and relative to the storage root.
#[allow(async_fn_in_trait)]
pub trait Storage {
    type Handle;

    /// Creates a folder; an already existing folder is not an error.
    async fn ensure_folder(&self, path: &str) -> Result<()>;
    async fn existing(&self, path: &str) -> Result<Option<Self::Handle>>;
    async fn overwrite(&self, handle: &Self::Handle, text: &str) -> Result<()>;
    async fn create(&self, path: &str, text: &str) -> Result<()>;
}

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// Lets the user choose an export file; `None` means the user cancelled.
#[allow(async_fn_in_trait)]
pub trait FilePicker {
    async fn pick(&self) -> Result<Option<String>>;
}

/// Result of turning export HTML into Markdown, before anything is written.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub creation_date: CreationDate,
    pub formatted_date: String,
    pub bookmarks: Vec<Bookmark>,
    pub markdown: String,
    pub stats: BookmarkStats,
}

pub fn convert(settings: &Settings, html: &str) -> Result<Conversion> {
    let document = Html::parse_document(html);
    let creation_date = CreationDate::resolve(&document, html);
    let bookmarks = BookmarkParser::parse_document(&document)?;
    let stats = BookmarkStats::collect(&bookmarks);
    let markdown = MarkdownRenderer::new(settings).render(&bookmarks);

    debug!(
        "Converted {} bookmarks in {} folders ({} bytes of markdown)",
        stats.leaves,
        stats.folders,
        markdown.len()
    );

    Ok(Conversion {
        formatted_date: creation_date.formatted(settings.date_format),
        creation_date,
        bookmarks,
        markdown,
        stats,
    })
}

pub fn document_header(imported_on: NaiveDate, creation_date: &str) -> String {
    format!(
        "# Bookmarks\n\n*Imported on: {}*\n*Creation date: {}*\n\n---\n\n",
        imported_on.format("%Y-%m-%d"),
        creation_date
    )
}

/// Runs a whole import: pick, convert, write.
pub struct Importer<'a, S, C> {
    settings: &'a Settings,
    storage: S,
    confirm: C,
}

impl<'a, S, C> Importer<'a, S, C>
where
    S: Storage,
    C: Confirm,
{
    pub fn new(settings: &'a Settings, storage: S, confirm: C) -> Self {
        Self {
            settings,
            storage,
            confirm,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn run<P: FilePicker>(&self, picker: &P) -> Result<Option<ImportReport>> {
        let Some(html) = picker.pick().await? else {
            info!("No file selected, nothing to import");
            return Ok(None);
        };

        self.import_html(&html).await.map(Some)
    }

    /// Like [`Importer::run`], but folds the outcome into a user-facing notice.
    pub async fn run_with_notice<P: FilePicker>(&self, picker: &P) -> Option<Notice> {
        match self.run(picker).await {
            Ok(Some(report)) => {
                info!(
                    "Imported {} bookmarks into {}{}",
                    report.stats.leaves,
                    report.path,
                    if report.overwritten { " (overwritten)" } else { "" }
                );
                Some(Notice::Imported)
            }
            Ok(None) => None,
            Err(e) => {
                error!("Error processing bookmarks: {}", e);
                Some(Notice::Failed(e.to_string()))
            }
        }
    }

    pub async fn import_html(&self, html: &str) -> Result<ImportReport> {
        let conversion = convert(self.settings, html)?;
        let content = format!(
            "{}{}",
            document_header(Utc::now().date_naive(), &conversion.formatted_date),
            conversion.markdown
        );

        let (path, overwritten) = self.write(&conversion.formatted_date, &content).await?;

        Ok(ImportReport {
            path,
            overwritten,
            creation_date: conversion.formatted_date,
            stats: conversion.stats,
        })
    }

    async fn write(&self, creation_date: &str, content: &str) -> Result<(String, bool)> {
        let base_name = generate_file_name(self.settings, creation_date, Utc::now().timestamp_millis());
        let file_name = format!("{}.md", base_name);

        let folder = self.settings.output_folder.trim();
        if !folder.is_empty() {
            if let Err(e) = self.storage.ensure_folder(folder).await {
                warn!("Could not create folder '{}': {}", folder, e);
            }
        }
        let file_path = within_folder(folder, &file_name);

        let Some(handle) = self.storage.existing(&file_path).await? else {
            self.storage.create(&file_path, content).await?;
            info!("Created {}", file_path);
            return Ok((file_path, false));
        };

        let question = format!(
            "The file \"{}\" already exists. Do you want to overwrite it?",
            file_name
        );
        if self.confirm.confirm(&question) {
            self.storage.overwrite(&handle, content).await?;
            info!("Overwrote {}", file_path);
            return Ok((file_path, true));
        }

        let alternative = within_folder(
            folder,
            &format!("{} {}.md", base_name, Utc::now().timestamp_millis()),
        );
        self.storage.create(&alternative, content).await?;
        info!("Kept existing file, created {}", alternative);
        Ok((alternative, false))
    }
}

fn within_folder(folder: &str, file_name: &str) -> String {
    if folder.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", folder, file_name)
    }
}
