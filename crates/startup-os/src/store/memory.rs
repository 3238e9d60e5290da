use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{CollectionPath, Document, DocumentPatch, DocumentStore, StoreError};

/// Thread-safe in-memory store keeping documents in insertion order.
#[derive(Default, Clone)]
pub struct MemoryDocumentStore {
    collections: Arc<Mutex<HashMap<String, Vec<Document>>>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<Document>>>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn next_id(&self) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("doc-{id:06}")
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn fetch(&self, path: &CollectionPath, id: &str) -> Result<Option<Document>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(&path.to_string())
            .and_then(|documents| documents.iter().find(|document| document.id == id))
            .cloned())
    }

    fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.get(&path.to_string()).cloned().unwrap_or_default())
    }

    fn insert(&self, path: &CollectionPath, mut document: Document) -> Result<String, StoreError> {
        if document.id.is_empty() {
            document.id = self.next_id();
        }

        let mut guard = self.lock()?;
        let documents = guard.entry(path.to_string()).or_default();
        if documents.iter().any(|existing| existing.id == document.id) {
            return Err(StoreError::Conflict);
        }
        let id = document.id.clone();
        documents.push(document);
        Ok(id)
    }

    fn update(
        &self,
        path: &CollectionPath,
        id: &str,
        patch: DocumentPatch,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let document = guard
            .get_mut(&path.to_string())
            .and_then(|documents| documents.iter_mut().find(|document| document.id == id))
            .ok_or(StoreError::NotFound)?;
        document.fields.extend(patch);
        Ok(())
    }
}
