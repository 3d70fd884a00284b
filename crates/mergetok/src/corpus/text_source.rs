//! # Text Sources

use crate::util::validators;
use anyhow::Context;
use std::path::PathBuf;
use thiserror::Error;

/// Default fraction of items used for training.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Supplies raw text items for training and validation.
pub trait TextSource {
    /// Load the training (`is_train`) or validation partition, in order.
    fn load_text_items(
        &self,
        is_train: bool,
    ) -> anyhow::Result<Vec<String>>;
}

/// Corpus availability errors.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// A corpus file does not exist.
    #[error("corpus file not found: {0}")]
    MissingCorpus(PathBuf),

    /// No corpus files were configured.
    #[error("no corpus files configured")]
    NoSources,
}

/// Split off the leading `train_ratio` of `items` (training) or the rest (validation).
///
/// The cut is ``floor(len * train_ratio)``.
pub fn partition_items(
    mut items: Vec<String>,
    train_ratio: f64,
    is_train: bool,
) -> Vec<String> {
    let cut = ((items.len() as f64) * train_ratio).floor() as usize;
    let cut = cut.min(items.len());
    if is_train {
        items.truncate(cut);
        items
    } else {
        items.split_off(cut)
    }
}

/// A [`TextSource`] over an in-memory item list.
#[derive(Debug, Clone)]
pub struct InMemoryTextSource {
    items: Vec<String>,
    train_ratio: f64,
}

impl InMemoryTextSource {
    /// Create a source over `items`, with [`DEFAULT_TRAIN_RATIO`].
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            train_ratio: DEFAULT_TRAIN_RATIO,
        }
    }

    /// Sets the training fraction; must be within ``[0.0, 1.0]``.
    pub fn with_train_ratio(
        self,
        train_ratio: f64,
    ) -> Self {
        Self {
            train_ratio: validators::expect_train_ratio(train_ratio),
            ..self
        }
    }

    /// All items, unpartitioned.
    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl TextSource for InMemoryTextSource {
    fn load_text_items(
        &self,
        is_train: bool,
    ) -> anyhow::Result<Vec<String>> {
        Ok(partition_items(
            self.items.clone(),
            self.train_ratio,
            is_train,
        ))
    }
}

/// A [`TextSource`] reading one item per non-blank line from text files.
///
/// Files are read in the given order.
#[derive(Debug, Clone)]
pub struct LineFileTextSource {
    paths: Vec<PathBuf>,
    train_ratio: f64,
}

impl LineFileTextSource {
    /// Create a source over `paths`, with [`DEFAULT_TRAIN_RATIO`].
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            train_ratio: DEFAULT_TRAIN_RATIO,
        }
    }

    /// Sets the training fraction; must be within ``[0.0, 1.0]``.
    pub fn with_train_ratio(
        self,
        train_ratio: f64,
    ) -> Self {
        Self {
            train_ratio: validators::expect_train_ratio(train_ratio),
            ..self
        }
    }

    fn read_all(&self) -> anyhow::Result<Vec<String>> {
        if self.paths.is_empty() {
            return Err(CorpusError::NoSources.into());
        }

        let mut items = Vec::new();
        for path in &self.paths {
            if !path.exists() {
                return Err(CorpusError::MissingCorpus(path.clone()).into());
            }
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read corpus file {}", path.display()))?;
            items.extend(
                content
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string),
            );
        }
        log::debug!(
            "Read {} items from {} corpus files",
            items.len(),
            self.paths.len()
        );
        Ok(items)
    }
}

impl TextSource for LineFileTextSource {
    fn load_text_items(
        &self,
        is_train: bool,
    ) -> anyhow::Result<Vec<String>> {
        Ok(partition_items(self.read_all()?, self.train_ratio, is_train))
    }
}
