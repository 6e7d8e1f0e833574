use crate::error::{BookmarksImporterError, Result};
use crate::services::dates::epoch_seconds_to_date;
use crate::types::Bookmark;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, info};

static LIST_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dl").unwrap());
static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").unwrap());
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

const UNTITLED_FOLDER: &str = "Untitled Folder";
const UNTITLED: &str = "Untitled";

/// Reads the `<dl>`/`<dt>` tree of a Netscape bookmark export.
pub struct BookmarkParser;

impl BookmarkParser {
    pub fn parse_html(html: &str) -> Result<Vec<Bookmark>> {
        let document = Html::parse_document(html);
        Self::parse_document(&document)
    }

    pub fn parse_document(document: &Html) -> Result<Vec<Bookmark>> {
        let list = document
            .select(&LIST_SELECTOR)
            .next()
            .ok_or(BookmarksImporterError::StructureNotFound)?;

        let bookmarks = Self::parse_list(list);
        info!("Parsed {} top-level bookmark entries", bookmarks.len());
        Ok(bookmarks)
    }

    fn parse_list(container: ElementRef<'_>) -> Vec<Bookmark> {
        container
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name().eq_ignore_ascii_case("dt"))
            .filter_map(Self::parse_item)
            .collect()
    }

    fn parse_item(item: ElementRef<'_>) -> Option<Bookmark> {
        // A heading wins over a link nested in the same item
        if let Some(heading) = item.select(&HEADING_SELECTOR).next() {
            let title = text_or(heading, UNTITLED_FOLDER);
            let children = item
                .select(&LIST_SELECTOR)
                .next()
                .map(Self::parse_list)
                .unwrap_or_default();

            debug!("Folder '{}' with {} entries", title, children.len());
            return Some(Bookmark::Folder { title, children });
        }

        let link = item.select(&LINK_SELECTOR).next()?;
        let attributes = link.value();
        let date_added = attributes
            .attr("add_date")
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .and_then(epoch_seconds_to_date);

        Some(Bookmark::Leaf {
            title: text_or(link, UNTITLED),
            url: attributes.attr("href").unwrap_or_default().to_string(),
            description: None,
            date_added,
        })
    }
}

fn text_or(element: ElementRef<'_>, fallback: &str) -> String {
    let text: String = element.text().collect();
    match text.trim() {
        "" => fallback.to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EXPORT: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file. -->
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
    <DT><H3 ADD_DATE="1600000000">Work</H3>
    <DL><p>
        <DT><A HREF="https://github.com" ADD_DATE="1700000000">GitHub</A>
        <DT><H3>Projects</H3>
        <DL><p>
            <DT><A HREF="https://crates.io">crates.io</A>
        </DL><p>
    </DL><p>
    <DT><A HREF="https://www.rust-lang.org/" ADD_DATE="not-a-number">Rust</A>
    <HR>
</DL><p>
"#;

    #[test]
    fn test_parses_nested_export() {
        let bookmarks = BookmarkParser::parse_html(EXPORT).unwrap();

        assert_eq!(
            bookmarks,
            vec![
                Bookmark::folder(
                    "Work",
                    vec![
                        Bookmark::leaf(
                            "GitHub",
                            "https://github.com",
                            NaiveDate::from_ymd_opt(2023, 11, 14)
                        ),
                        Bookmark::folder("Projects", vec![Bookmark::leaf("crates.io", "https://crates.io", None)]),
                    ]
                ),
                Bookmark::leaf("Rust", "https://www.rust-lang.org/", None),
            ]
        );
    }

    #[test]
    fn test_missing_list_is_structure_error() {
        let err = BookmarkParser::parse_html("<html><body><ul><li>x</li></ul></body></html>").unwrap_err();
        assert!(matches!(err, BookmarksImporterError::StructureNotFound));
    }

    #[test]
    fn test_empty_list_yields_no_bookmarks() {
        assert!(BookmarkParser::parse_html("<dl><p></dl>").unwrap().is_empty());
    }

    #[test]
    fn test_heading_takes_precedence_over_link() {
        let html = r#"<dl><dt><h3>Folder</h3><a href="https://example.com">Link</a></dt></dl>"#;
        let bookmarks = BookmarkParser::parse_html(html).unwrap();

        assert!(bookmarks[0].is_folder());
        assert_eq!(bookmarks, vec![Bookmark::folder("Folder", Vec::new())]);
    }

    #[test]
    fn test_blank_titles_and_missing_href() {
        let html = r#"<dl>
<dt><h3>   </h3><dl><dt><a>  </a></dl>
<dt><a href="javascript:void(0)"></a>
</dl>"#;
        let bookmarks = BookmarkParser::parse_html(html).unwrap();

        assert_eq!(
            bookmarks,
            vec![
                Bookmark::folder("Untitled Folder", vec![Bookmark::leaf("Untitled", "", None)]),
                Bookmark::leaf("Untitled", "javascript:void(0)", None),
            ]
        );
    }

    #[test]
    fn test_items_without_heading_or_link_are_skipped() {
        let html = r#"<dl><dt>plain text</dt><dd>a description</dd><dt><a href="https://a.example">A</a></dt></dl>"#;
        let bookmarks = BookmarkParser::parse_html(html).unwrap();

        assert_eq!(bookmarks, vec![Bookmark::leaf("A", "https://a.example", None)]);
    }
}
