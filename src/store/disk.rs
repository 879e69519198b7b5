use crate::core::model::Document;
use crate::core::store::DocumentStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keeps the whole document in a single pretty-printed JSON file.
///
/// A missing file reads as an empty document. Every save rewrites the file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&mut self) -> Result<Document> {
        if !self.path.exists() {
            debug!("No data file at {}, starting empty", self.path.display());
            return Ok(Document::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read data file: {}", self.path.display()))?;
        let document: Document = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse data file: {}", self.path.display()))?;
        debug!(
            sales = document.sales.len(),
            expenses = document.expenses.len(),
            rates = document.rates.len(),
            "Loaded data file {}",
            self.path.display()
        );
        Ok(document)
    }

    fn save(&mut self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(document).context("Failed to serialize data file")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write data file: {}", self.path.display()))?;
        debug!("Saved data file {}", self.path.display());
        Ok(())
    }
}
