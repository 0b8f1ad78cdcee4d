/*!
 * Status notifications for the caller of a combine run
 */

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

/// Receives status updates while a run progresses
pub trait StatusSink {
    /// Short textual status such as "Scanning…" or "Done"
    fn status(&self, message: &str);

    /// Called after each file has been appended
    fn progress(&self, _done: usize, _total: usize, _path: &str) {}

    /// Called once with the archive path after a successful run
    fn reveal(&self, _archive: &Path) {}
}

// Closures receive status messages only
impl<F> StatusSink for F
where
    F: Fn(&str),
{
    fn status(&self, message: &str) {
        self(message)
    }
}

/// Discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStatus;

impl StatusSink for NullStatus {
    fn status(&self, _message: &str) {}
}

/// Keep the tail of long paths so the file name stays visible
fn path_tail(path: &str, max_chars: usize) -> String {
    let count = path.chars().count();
    if count <= max_chars {
        return path.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let start = path
        .char_indices()
        .nth(count - keep)
        .map_or(path.len(), |(i, _)| i);
    format!("...{}", &path[start..])
}

/// Drives an indicatif progress bar
impl StatusSink for ProgressBar {
    fn status(&self, message: &str) {
        self.set_message(message.to_string());
    }

    fn progress(&self, done: usize, total: usize, path: &str) {
        self.set_length(total as u64);
        self.set_position(done as u64);
        let display = path_tail(path, 48);
        self.set_message(display);
    }
}

/// Records every notification, for tests and embedding callers
#[derive(Debug, Default)]
pub struct StatusLog {
    pub messages: RefCell<Vec<String>>,
    pub progress: RefCell<Vec<(usize, usize, String)>>,
    pub revealed: RefCell<Option<PathBuf>>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

impl StatusSink for StatusLog {
    fn status(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn progress(&self, done: usize, total: usize, path: &str) {
        self.progress
            .borrow_mut()
            .push((done, total, path.to_string()));
    }

    fn reveal(&self, archive: &Path) {
        *self.revealed.borrow_mut() = Some(archive.to_path_buf());
    }
}
