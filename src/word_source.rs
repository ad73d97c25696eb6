use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::theme::Theme;

static WORDBANK_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/wordbank");

/// Why a theme's word list could not produce a word
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("word list {0} not found")]
    NotFound(String),
    #[error("word list {0} is not valid UTF-8")]
    Encoding(String),
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("word list {0} has no words")]
    Empty(String),
}

/// Supplies words for a theme
pub trait WordSource {
    /// Load the parsed word list backing `theme`
    fn load(&self, theme: &Theme) -> Result<Vec<String>, LoadError>;

    /// Pick one word uniformly at random and return it upper-cased
    fn select_word(&self, theme: &Theme, rng: &mut dyn RngCore) -> Result<String, LoadError> {
        let words = self.load(theme)?;
        words
            .choose(rng)
            .map(|w| w.to_uppercase())
            .ok_or_else(|| LoadError::Empty(theme.file_name.to_string()))
    }
}

/// Split a newline-delimited list, trimming entries and dropping blank lines
pub fn parse_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Word lists compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedWords;

impl WordSource for EmbeddedWords {
    fn load(&self, theme: &Theme) -> Result<Vec<String>, LoadError> {
        let file = WORDBANK_DIR
            .get_file(theme.file_name)
            .ok_or_else(|| LoadError::NotFound(theme.file_name.to_string()))?;
        let text = file
            .contents_utf8()
            .ok_or_else(|| LoadError::Encoding(theme.file_name.to_string()))?;
        Ok(parse_word_list(text))
    }
}

/// Word lists read from a directory on every load, so edits show up without a restart
#[derive(Debug, Clone)]
pub struct DirectoryWords {
    root: PathBuf,
}

impl DirectoryWords {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl WordSource for DirectoryWords {
    fn load(&self, theme: &Theme) -> Result<Vec<String>, LoadError> {
        let path = self.root.join(theme.file_name);
        let bytes = fs::read(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(path.display().to_string()),
            _ => LoadError::Io {
                path: path.clone(),
                source,
            },
        })?;
        let text =
            String::from_utf8(bytes).map_err(|_| LoadError::Encoding(path.display().to_string()))?;
        Ok(parse_word_list(&text))
    }
}

/// Serves a fixed sequence of words, one per call, then reports the list as empty
#[derive(Debug, Default)]
pub struct QueuedWords {
    queue: RefCell<VecDeque<String>>,
}

impl QueuedWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: RefCell::new(words.into_iter().map(Into::into).collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl WordSource for QueuedWords {
    fn load(&self, _theme: &Theme) -> Result<Vec<String>, LoadError> {
        Ok(self.queue.borrow().iter().cloned().collect())
    }

    fn select_word(&self, theme: &Theme, _rng: &mut dyn RngCore) -> Result<String, LoadError> {
        self.queue
            .borrow_mut()
            .pop_front()
            .map(|w| w.trim().to_uppercase())
            .ok_or_else(|| LoadError::Empty(theme.file_name.to_string()))
    }
}
