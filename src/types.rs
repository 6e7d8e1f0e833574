use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A node of the bookmark tree, either a folder or a saved link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Bookmark {
    Folder {
        title: String,
        children: Vec<Bookmark>,
    },
    Leaf {
        title: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_added: Option<NaiveDate>,
    },
}

impl Bookmark {
    pub fn folder(title: impl Into<String>, children: Vec<Bookmark>) -> Self {
        Bookmark::Folder {
            title: title.into(),
            children,
        }
    }

    pub fn leaf(title: impl Into<String>, url: impl Into<String>, date_added: Option<NaiveDate>) -> Self {
        Bookmark::Leaf {
            title: title.into(),
            url: url.into(),
            description: None,
            date_added,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Bookmark::Folder { .. })
    }
}

/// A leaf bookmark lifted out of the tree, labelled with its ancestor folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatBookmark<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub date_added: Option<NaiveDate>,
    pub folder: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BookmarkStats {
    pub folders: usize,
    pub leaves: usize,
    pub max_depth: usize,
}

impl BookmarkStats {
    pub fn collect(bookmarks: &[Bookmark]) -> Self {
        let mut stats = Self::default();
        stats.visit(bookmarks, 0);
        stats
    }

    fn visit(&mut self, bookmarks: &[Bookmark], depth: usize) {
        for bookmark in bookmarks {
            match bookmark {
                Bookmark::Folder { children, .. } => {
                    self.folders += 1;
                    self.max_depth = self.max_depth.max(depth + 1);
                    self.visit(children, depth + 1);
                }
                Bookmark::Leaf { .. } => self.leaves += 1,
            }
        }
    }
}

/// Outcome of a finished import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub path: String,
    pub overwritten: bool,
    pub creation_date: String,
    pub stats: BookmarkStats,
}
