//! Persistence abstraction for the cash book document

use crate::core::model::Document;
use anyhow::Result;

/// Loads and saves the whole document at once.
pub trait DocumentStore {
    /// Returns the persisted document, or an empty one if nothing was saved yet.
    fn load(&mut self) -> Result<Document>;

    /// Replaces the persisted document with `document`.
    fn save(&mut self, document: &Document) -> Result<()>;
}
