//! File store — the flat content directory of `.html` artifacts.
//!
//! Every name is normalized to carry [`HTML_SUFFIX`] and checked against the
//! artifact filename rules before it touches the filesystem.

use chrono::{DateTime, Local};
use std::io;
use std::path::{Path, PathBuf};

use crate::types::PathsConfig;

/// Suffix every artifact name carries.
pub const HTML_SUFFIX: &str = ".html";

/// Append [`HTML_SUFFIX`] unless `name` already ends with it.
pub fn with_html_suffix(name: &str) -> String {
    if name.ends_with(HTML_SUFFIX) {
        name.to_string()
    } else {
        format!("{name}{HTML_SUFFIX}")
    }
}

/// `[a-zA-Z0-9_-]+\.html`
pub fn is_valid_html_filename(name: &str) -> bool {
    match name.strip_suffix(HTML_SUFFIX) {
        Some(stem) => {
            !stem.is_empty()
                && stem
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        }
        None => false,
    }
}

/// A stored HTML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub size_bytes: u64,
    pub modified_at: DateTime<Local>,
}

/// Content directory handle.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create the content and examples directories if needed and return a
    /// store rooted at the absolute content directory.
    pub async fn open(paths: &PathsConfig) -> io::Result<Self> {
        tokio::fs::create_dir_all(&paths.content_dir).await?;
        tokio::fs::create_dir_all(&paths.examples_dir).await?;

        // keeps the otherwise-empty content directory under version control
        let gitkeep = paths.content_dir.join(".gitkeep");
        if !tokio::fs::try_exists(&gitkeep).await? {
            tokio::fs::write(&gitkeep, b"").await?;
        }

        let root = tokio::fs::canonicalize(&paths.content_dir).await?;
        tracing::debug!(root = %root.display(), "content directory ready");
        Ok(Self { root })
    }

    /// Absolute content directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolved path for an artifact name (suffix applied).
    pub fn path_for(&self, name: &str) -> io::Result<PathBuf> {
        let name = with_html_suffix(name);
        if !is_valid_html_filename(&name) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid artifact name: {name}"),
            ));
        }
        Ok(self.root.join(name))
    }

    /// Write `content` verbatim, replacing any previous artifact.
    pub async fn write(&self, name: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, content.as_bytes()).await?;
        Ok(path)
    }

    pub async fn read(&self, name: &str) -> io::Result<String> {
        let path = self.path_for(name)?;
        tokio::fs::read_to_string(path).await
    }

    /// Artifacts in directory enumeration order (not sorted).
    pub async fn list(&self) -> io::Result<Vec<Artifact>> {
        let mut artifacts = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(HTML_SUFFIX) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            artifacts.push(Artifact {
                name,
                size_bytes: metadata.len(),
                modified_at: DateTime::<Local>::from(metadata.modified()?),
            });
        }
        Ok(artifacts)
    }
}
