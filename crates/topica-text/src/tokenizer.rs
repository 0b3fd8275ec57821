//! Word segmentation and stop-word filtering.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use jieba_rs::Jieba;
use tracing::{debug, info};
use unicode_segmentation::UnicodeSegmentation;

use topica_core::config::{Segmenter, TokenizerConfig};
use topica_core::error::{Result, TopicaError};

/// A set of terms excluded from tokenized output.
///
/// Entries are matched exactly against the (already normalized) token, so a
/// list meant for a lowercasing tokenizer should itself be lowercase.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// A stop-word set that filters nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a newline-delimited stop-word file.
    ///
    /// Each line is trimmed of surrounding whitespace and blank lines are
    /// skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TopicaError::resource(path, e))?;
        let stopwords = Self::parse(&content);
        info!(
            path = %path.display(),
            count = stopwords.len(),
            "Stop words loaded"
        );
        Ok(stopwords)
    }

    /// Parse newline-delimited stop words from an in-memory string.
    pub fn parse(content: &str) -> Self {
        content.lines().collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let words = iter
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }
}

/// Splits raw text into normalized tokens.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: StopWords,
    lowercase: bool,
    segmenter: Segmenter,
}

impl Tokenizer {
    pub fn new(stopwords: StopWords, lowercase: bool) -> Self {
        Self {
            stopwords,
            lowercase,
            segmenter: Segmenter::default(),
        }
    }

    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Build a tokenizer from configuration, loading the stop-word file if set.
    pub fn from_config(config: &TokenizerConfig) -> Result<Self> {
        let stopwords = match &config.stopwords_file {
            Some(path) => StopWords::load(path)?,
            None => {
                debug!("No stop-word file configured; stop-word filtering disabled");
                StopWords::empty()
            }
        };
        Ok(Self::new(stopwords, config.lowercase).with_segmenter(config.segmenter))
    }

    /// Segment `text` into words, dropping whitespace and stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        normalize(segment(text, self.segmenter), self.lowercase, &self.stopwords)
    }

    pub fn stopwords(&self) -> &StopWords {
        &self.stopwords
    }

    pub fn segmenter(&self) -> Segmenter {
        self.segmenter
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(StopWords::empty(), true)
    }
}

/// Tokenize with the default segmenter and lowercasing against the given
/// stop-word set.
pub fn tokenize(text: &str, stopwords: &StopWords) -> Vec<String> {
    normalize(segment(text, Segmenter::default()), true, stopwords)
}

static JIEBA: OnceLock<Jieba> = OnceLock::new();

/// The shared dictionary segmenter, loaded on first use.
fn jieba() -> &'static Jieba {
    JIEBA.get_or_init(|| {
        debug!("Loading jieba dictionary");
        Jieba::new()
    })
}

fn segment(text: &str, segmenter: Segmenter) -> Vec<&str> {
    match segmenter {
        Segmenter::Jieba => jieba().cut(text, true),
        Segmenter::Unicode => text.unicode_words().collect(),
    }
}

fn normalize(words: Vec<&str>, lowercase: bool, stopwords: &StopWords) -> Vec<String> {
    words
        .into_iter()
        .filter(|w| !w.trim().is_empty())
        .map(|w| if lowercase { w.to_lowercase() } else { w.to_string() })
        .filter(|w| !stopwords.contains(w))
        .collect()
}
