use crate::core::model::Document;
use crate::core::store::DocumentStore;
use anyhow::Result;
use tracing::debug;

/// In-memory document store. Counts saves so callers can tell whether a
/// mutation was flushed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Document,
    saves: usize,
}

impl MemoryStore {
    /// Creates an empty MemoryStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a MemoryStore that starts out holding `document`
    pub fn with_document(document: Document) -> Self {
        Self { document, saves: 0 }
    }

    /// The last saved document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of times `save` was called
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl DocumentStore for MemoryStore {
    fn load(&mut self) -> Result<Document> {
        debug!("Memory store LOAD");
        Ok(self.document.clone())
    }

    fn save(&mut self, document: &Document) -> Result<()> {
        self.document = document.clone();
        self.saves += 1;
        debug!(saves = self.saves, "Memory store SAVE");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ExchangeRate;

    #[test]
    fn test_memory_store_load_save() {
        let mut store = MemoryStore::new();

        // Initially, store is empty
        assert_eq!(store.load().unwrap(), Document::default());
        assert_eq!(store.saves(), 0);

        let mut document = Document::default();
        document.rates.push(ExchangeRate {
            date: "2024-01-01".parse().unwrap(),
            rate: 36.0,
        });
        store.save(&document).unwrap();

        assert_eq!(store.saves(), 1);
        assert_eq!(store.load().unwrap(), document);
        assert_eq!(store.document(), &document);
    }
}
