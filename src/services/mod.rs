pub mod dates;
pub mod importer;
pub mod links;
pub mod parser;
pub mod renderer;
pub mod storage;

pub use dates::{CreationDate, DateSource};
pub use importer::{Confirm, FilePicker, Importer, Storage};
pub use links::ScreenshotLinks;
pub use parser::BookmarkParser;
pub use renderer::MarkdownRenderer;
pub use storage::{FixedAnswer, FsStorage, PathPicker, TerminalConfirm};
