//! Document store seam.
//!
//! The dashboard persists plain JSON objects per collection, optionally scoped under a parent
//! startup. Services only depend on [`DocumentStore`], so tests and the API binary can plug in
//! [`MemoryDocumentStore`] while production wiring targets a managed backend.

mod memory;

pub use memory::MemoryDocumentStore;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::domain::StartupId;

/// Named collections the core reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Startups,
    Users,
    Goals,
    Tasks,
    Milestones,
    Team,
    ConnectionRequests,
}

impl Collection {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Startups => "startups",
            Self::Users => "users",
            Self::Goals => "goals",
            Self::Tasks => "tasks",
            Self::Milestones => "milestones",
            Self::Team => "team",
            Self::ConnectionRequests => "connectionRequests",
        }
    }
}

/// A collection, optionally nested under one startup document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    pub collection: Collection,
    pub scope: Option<StartupId>,
}

impl CollectionPath {
    pub fn root(collection: Collection) -> Self {
        Self {
            collection,
            scope: None,
        }
    }

    pub fn scoped(startup: &StartupId, collection: Collection) -> Self {
        Self {
            collection,
            scope: Some(startup.clone()),
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(startup) => write!(
                f,
                "{}/{}/{}",
                Collection::Startups.name(),
                startup,
                self.collection.name()
            ),
            None => f.write_str(self.collection.name()),
        }
    }
}

/// Raw record as delivered by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Build a document from a JSON object literal; non-object values yield no fields.
    pub fn from_value(id: impl Into<String>, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Partial update merged key-by-key into an existing document.
pub type DocumentPatch = Map<String, Value>;

/// Storage abstraction so the services can be exercised in isolation.
pub trait DocumentStore: Send + Sync {
    fn fetch(&self, path: &CollectionPath, id: &str) -> Result<Option<Document>, StoreError>;
    fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, StoreError>;
    /// Insert a document; an empty id asks the store to assign one.
    fn insert(&self, path: &CollectionPath, document: Document) -> Result<String, StoreError>;
    fn update(
        &self,
        path: &CollectionPath,
        id: &str,
        patch: DocumentPatch,
    ) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document already exists")]
    Conflict,
    #[error("document not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
