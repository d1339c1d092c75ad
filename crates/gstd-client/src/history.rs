//! Persistent command history.
//!
//! One command per line, oldest first. The file is read when the client
//! starts and rewritten when an interactive session ends.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::AppError;

/// File name of the history under the home directory.
pub(crate) const HISTORY_FILE: &str = ".gstc_history";

/// Entries kept; older ones are dropped first.
pub(crate) const HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Default)]
pub(crate) struct History {
    path: Option<PathBuf>,
    entries: VecDeque<String>,
}

impl History {
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(HISTORY_FILE))
    }

    /// Reads the history at `path`; a missing file is an empty history.
    pub(crate) fn load(path: Option<PathBuf>) -> Result<Self, AppError> {
        let text = match path.as_deref().map(|file| (file, fs::read_to_string(file))) {
            None => String::new(),
            Some((_, Ok(text))) => text,
            Some((_, Err(error))) if error.kind() == io::ErrorKind::NotFound => String::new(),
            Some((file, Err(source))) => return Err(history_error(file, source)),
        };
        let mut history = Self {
            path,
            entries: VecDeque::new(),
        };
        for line in text.lines() {
            history.push(line);
        }
        Ok(history)
    }

    /// An empty history that is never written.
    pub(crate) fn detached() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.entries.push_back(line.to_owned());
        while self.entries.len() > HISTORY_LIMIT {
            self.entries.pop_front();
        }
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Rewrites the history file.
    pub(crate) fn save(&self) -> Result<(), AppError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(entry);
            text.push('\n');
        }
        fs::write(path, text).map_err(|source| history_error(path, source))
    }
}

fn history_error(path: &Path, source: io::Error) -> AppError {
    AppError::History {
        path: path.display().to_string(),
        source,
    }
}
