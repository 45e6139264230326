// src/article/mod.rs
pub mod front_matter;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_TITLE: &str = "New Security Insight";
pub const DEFAULT_DESCRIPTION: &str = "Check out the latest post on Tharunaditya Security.";

/// One post source file, read once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSource {
    pub path: PathBuf,
    pub raw: String,
}

impl ArticleSource {
    pub fn new(path: impl Into<PathBuf>, raw: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            raw: raw.into(),
        }
    }

    pub async fn read(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("file not found: {}", path.display());
        }
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading post from {}", path.display()))?;
        Ok(Self::new(path, raw))
    }

    pub fn metadata(&self) -> ArticleMetadata {
        ArticleMetadata::extract(&self.raw)
    }
}

/// Title and summary shown in the push notification. Always populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleMetadata {
    pub title: String,
    pub description: String,
}

impl ArticleMetadata {
    pub fn extract(raw: &str) -> Self {
        let header = front_matter::header_region(raw);

        let title = front_matter::scalar_field(header, "title")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let summary = |key: &str| front_matter::quoted_field(header, key).filter(|d| !d.trim().is_empty());
        let description = summary("excerpt")
            .or_else(|| summary("description"))
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        Self { title, description }
    }
}
