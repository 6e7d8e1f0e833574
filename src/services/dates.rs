use crate::config::{DateFormat, Settings, DEFAULT_FILE_NAME, DEFAULT_FILE_NAME_PATTERN};
use chrono::{DateTime, Datelike, Local, NaiveDate};
use regex::Regex;
use scraper::{Html, Selector};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static COMMENT_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--.*?(\d{4}-\d{2}-\d{2}).*?-->").unwrap());
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap());
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static ADD_DATE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[add_date]").unwrap());

/// Where the creation date of an export was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Comment,
    Title,
    FirstAddDate,
    ImportTime,
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DateSource::Comment => "HTML comment",
            DateSource::Title => "document title",
            DateSource::FirstAddDate => "first add_date attribute",
            DateSource::ImportTime => "import time",
        };
        f.write_str(label)
    }
}

/// The single date attributed to a whole bookmark export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationDate {
    pub date: NaiveDate,
    pub source: DateSource,
}

impl CreationDate {
    /// Tries comment, title, first `add_date`, then falls back to today.
    pub fn resolve(document: &Html, raw_html: &str) -> Self {
        let found = Self::from_comment(raw_html)
            .map(|date| (date, DateSource::Comment))
            .or_else(|| Self::from_title(document).map(|date| (date, DateSource::Title)))
            .or_else(|| Self::from_first_add_date(document).map(|date| (date, DateSource::FirstAddDate)));

        let (date, source) = found.unwrap_or_else(|| (Local::now().date_naive(), DateSource::ImportTime));
        debug!("Creation date {} taken from {}", date, source);
        Self { date, source }
    }

    pub fn formatted(&self, format: DateFormat) -> String {
        format_date(self.date, format)
    }

    fn from_comment(raw_html: &str) -> Option<NaiveDate> {
        let captures = COMMENT_DATE_RE.captures(raw_html)?;
        parse_iso_date(&captures[1])
    }

    fn from_title(document: &Html) -> Option<NaiveDate> {
        let title: String = document.select(&TITLE_SELECTOR).next()?.text().collect();
        let captures = DATE_RE.captures(&title)?;
        parse_iso_date(&captures[1])
    }

    fn from_first_add_date(document: &Html) -> Option<NaiveDate> {
        let element = document.select(&ADD_DATE_SELECTOR).next()?;
        let seconds = element.value().attr("add_date")?.trim().parse::<i64>().ok()?;
        DateTime::from_timestamp(seconds, 0).map(|utc| utc.with_timezone(&Local).date_naive())
    }
}

fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Calendar date (UTC) of a Unix timestamp given in seconds.
pub fn epoch_seconds_to_date(seconds: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(seconds, 0).map(|utc| utc.date_naive())
}

pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    format
        .pattern()
        .replacen("YYYY", &format!("{:04}", date.year()), 1)
        .replacen("MM", &format!("{:02}", date.month()), 1)
        .replacen("DD", &format!("{:02}", date.day()), 1)
}

/// Fills `{title}`, `{date}` and `{timestamp}` into the filename pattern.
///
/// Each placeholder is substituted once, in that order; a second occurrence
/// of the same token is left in place.
pub fn generate_file_name(settings: &Settings, creation_date: &str, timestamp_millis: i64) -> String {
    let pattern: &str = if settings.file_name_pattern.is_empty() {
        DEFAULT_FILE_NAME_PATTERN
    } else {
        &settings.file_name_pattern
    };
    let title: &str = if settings.output_file_name.is_empty() {
        DEFAULT_FILE_NAME
    } else {
        &settings.output_file_name
    };

    pattern
        .replacen("{title}", title, 1)
        .replacen("{date}", creation_date, 1)
        .replacen("{timestamp}", &timestamp_millis.to_string(), 1)
}
