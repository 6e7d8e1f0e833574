use crate::config::{Settings, ViewMode};
use crate::services::links::{domain_of, escape_markdown, ScreenshotLinks};
use crate::types::{Bookmark, FlatBookmark};
use std::fmt::Write;
use tracing::debug;

const ROOT_FOLDER: &str = "Root";
const FOLDER_SEPARATOR: &str = " > ";
const EMPTY_NOTICE: &str = "No bookmarks found.\n\n";
const MAX_HEADING_LEVEL: usize = 6;

/// Turns a bookmark tree into Markdown in the configured view mode.
pub struct MarkdownRenderer<'a> {
    settings: &'a Settings,
    links: ScreenshotLinks<'a>,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            links: ScreenshotLinks::new(settings),
        }
    }

    pub fn render(&self, bookmarks: &[Bookmark]) -> String {
        debug!("Rendering {} entries as {}", bookmarks.len(), self.settings.view_mode.as_str());

        match self.settings.view_mode {
            ViewMode::List => self.render_list(bookmarks),
            ViewMode::Table => self.render_table(bookmarks),
            ViewMode::Cards => self.render_cards(bookmarks),
        }
    }

    /// Folder hierarchy as headings with indented bullet links.
    pub fn render_list(&self, bookmarks: &[Bookmark]) -> String {
        let mut markdown = String::new();
        self.write_list(&mut markdown, bookmarks, 0);
        markdown
    }

    fn write_list(&self, markdown: &mut String, bookmarks: &[Bookmark], depth: usize) {
        for bookmark in bookmarks {
            match bookmark {
                Bookmark::Folder { title, children } => {
                    let level = (depth + 1).min(MAX_HEADING_LEVEL);
                    let _ = write!(markdown, "{} {}\n\n", "#".repeat(level), title);
                    self.write_list(markdown, children, depth + 1);
                }
                Bookmark::Leaf {
                    title, url, date_added, ..
                } => {
                    let _ = write!(markdown, "{}- [{}]({})", "  ".repeat(depth), title, url);
                    match date_added {
                        Some(date) if self.settings.include_descriptions => {
                            let _ = write!(markdown, " *(Added on: {})*", date);
                        }
                        _ => {}
                    }
                    markdown.push('\n');
                }
            }
        }
    }

    /// One row per bookmark with a screenshot cell and a link cell.
    pub fn render_table(&self, bookmarks: &[Bookmark]) -> String {
        let flat = flatten(bookmarks);
        if flat.is_empty() {
            return EMPTY_NOTICE.to_string();
        }

        let mut markdown = String::from("| Screenshot | Site |\n|------------|------|\n");
        for bookmark in &flat {
            let _ = writeln!(
                markdown,
                "| ![Screenshot]({}) | [{}]({}) |",
                self.links.screenshot_url(bookmark.url),
                escape_markdown(bookmark.title),
                bookmark.url
            );
        }

        markdown.push('\n');
        markdown
    }

    /// HTML card grid with lazy-loaded previews.
    pub fn render_cards(&self, bookmarks: &[Bookmark]) -> String {
        let flat = flatten(bookmarks);
        if flat.is_empty() {
            return EMPTY_NOTICE.to_string();
        }

        let mut markdown = String::from("<div class=\"bookmarks-cards\">\n\n");
        for bookmark in &flat {
            let title = escape_markdown(bookmark.title);
            let screenshot = self.links.screenshot_url(bookmark.url);

            markdown.push_str("<div class=\"bookmark-card\">\n");
            let _ = writeln!(markdown, "  <a href=\"{}\" class=\"bookmark-card-link\">", bookmark.url);
            markdown.push_str("    <div class=\"bookmark-card-image\">\n");
            let _ = writeln!(
                markdown,
                "      <img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                screenshot, title
            );
            markdown.push_str("    </div>\n");
            markdown.push_str("    <div class=\"bookmark-card-content\">\n");
            let _ = writeln!(markdown, "      <h3 class=\"bookmark-card-title\">{}</h3>", title);
            let _ = writeln!(
                markdown,
                "      <p class=\"bookmark-card-url\">{}</p>",
                domain_of(bookmark.url)
            );
            markdown.push_str("    </div>\n");
            markdown.push_str("  </a>\n");
            markdown.push_str("</div>\n\n");
        }

        markdown.push_str("</div>\n\n");
        markdown
    }
}

/// Leaves in pre-order, each labelled with its `>`-joined folder path.
pub fn flatten(bookmarks: &[Bookmark]) -> Vec<FlatBookmark<'_>> {
    let mut flat = Vec::new();
    collect_leaves(bookmarks, "", &mut flat);
    flat
}

fn collect_leaves<'a>(bookmarks: &'a [Bookmark], folder: &str, flat: &mut Vec<FlatBookmark<'a>>) {
    for bookmark in bookmarks {
        match bookmark {
            Bookmark::Folder { title, children } => {
                let path = if folder.is_empty() {
                    title.clone()
                } else {
                    format!("{}{}{}", folder, FOLDER_SEPARATOR, title)
                };
                collect_leaves(children, &path, flat);
            }
            Bookmark::Leaf {
                title, url, date_added, ..
            } => flat.push(FlatBookmark {
                title,
                url,
                date_added: *date_added,
                folder: if folder.is_empty() {
                    ROOT_FOLDER.to_string()
                } else {
                    folder.to_string()
                },
            }),
        }
    }
}
