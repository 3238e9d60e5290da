use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use crate::domain::{Identity, StartupId};
use crate::normalize::encode_timestamp;
use crate::store::{
    Collection, CollectionPath, Document, DocumentPatch, DocumentStore, MemoryDocumentStore,
    StoreError,
};

pub(super) const FOUNDER_ID: &str = "founder-1";
pub(super) const ADMIN_ID: &str = "admin-1";

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 15, 9, 30, 0).unwrap()
}

pub(super) fn founder() -> Identity {
    Identity::signed_in(FOUNDER_ID)
}

pub(super) fn admin() -> Identity {
    Identity::signed_in(ADMIN_ID)
}

pub(super) fn startups() -> CollectionPath {
    CollectionPath::root(Collection::Startups)
}

pub(super) fn scoped(collection: Collection) -> CollectionPath {
    CollectionPath::scoped(&StartupId::from(FOUNDER_ID), collection)
}

pub(super) fn insert(store: &impl DocumentStore, path: &CollectionPath, id: &str, value: Value) {
    store
        .insert(path, Document::from_value(id, value))
        .expect("seed insert");
}

pub(super) fn founder_profile() -> Value {
    json!({
        "name": "Ledgerly",
        "role": "FOUNDER",
        "stage": "mvp",
        "types": ["Fintech", "SaaS"],
        "city": "Pune",
        "country": "India",
        "problem": "SMB invoices are paid late",
        "revenueModel": "Subscription",
        "healthScore": 40,
        "previousScore": 35,
        "status": "pending",
        "lastUpdate": encode_timestamp(now() - Duration::days(3)),
    })
}

/// Founder with a deck-less profile, 3/5 tasks done, 1/2 milestones and a two-person team.
pub(super) fn seeded_store() -> Arc<MemoryDocumentStore> {
    let store = Arc::new(MemoryDocumentStore::new());
    insert(&*store, &startups(), FOUNDER_ID, founder_profile());

    insert(
        &*store,
        &scoped(Collection::Goals),
        "g-1",
        json!({ "title": "Launch beta", "status": "On Track", "progress": 60 }),
    );
    insert(
        &*store,
        &scoped(Collection::Goals),
        "g-2",
        json!({ "title": "Close pilot", "status": "At Risk", "progress": 20 }),
    );
    insert(
        &*store,
        &scoped(Collection::Goals),
        "g-3",
        json!({ "title": "Incorporate", "status": "Completed", "progress": 100 }),
    );

    for (id, status, goal) in [
        ("t-1", "Done", Some("g-1")),
        ("t-2", "Done", Some("g-1")),
        ("t-3", "Done", None),
        ("t-4", "In Progress", Some("g-removed")),
        ("t-5", "To Do", Some("g-2")),
    ] {
        insert(
            &*store,
            &scoped(Collection::Tasks),
            id,
            json!({ "title": format!("Task {id}"), "status": status, "goalId": goal }),
        );
    }

    insert(
        &*store,
        &scoped(Collection::Milestones),
        "m-1",
        json!({ "title": "First customer", "status": "Achieved" }),
    );
    insert(
        &*store,
        &scoped(Collection::Milestones),
        "m-2",
        json!({ "title": "Seed round", "status": "Pending" }),
    );

    insert(
        &*store,
        &scoped(Collection::Team),
        "tm-1",
        json!({ "name": "Asha", "role": "CEO", "status": "Active" }),
    );
    insert(
        &*store,
        &scoped(Collection::Team),
        "tm-2",
        json!({ "name": "Ravi", "role": "CTO", "status": "Active" }),
    );

    store
}

/// Registers `admin-1` as a platform super admin and the founder as a plain user.
pub(super) fn seed_accounts(store: &MemoryDocumentStore) {
    let users = CollectionPath::root(Collection::Users);
    insert(
        store,
        &users,
        ADMIN_ID,
        json!({ "email": "ops@startupos.example", "role": "SUPER_ADMIN" }),
    );
    insert(
        store,
        &users,
        FOUNDER_ID,
        json!({ "email": "asha@ledgerly.example", "role": "FOUNDER" }),
    );
}

/// Adds three other members to the directory: an investor, a founder and a mentor.
pub(super) fn seed_directory(store: &MemoryDocumentStore) {
    insert(
        store,
        &startups(),
        "investor-1",
        json!({
            "name": "Seedfund Capital",
            "role": "INVESTOR",
            "stage": "revenue",
            "types": ["Fintech"],
            "city": "Mumbai",
            "country": "India",
            "createdAt": encode_timestamp(now() - Duration::days(1)),
        }),
    );
    insert(
        store,
        &startups(),
        "founder-2",
        json!({
            "name": "Tutorly",
            "role": "FOUNDER",
            "stage": "idea",
            "types": ["Edtech"],
            "city": "Pune",
            "country": "India",
            "status": "approved",
            "createdAt": encode_timestamp(now() - Duration::days(10)),
        }),
    );
    insert(
        store,
        &startups(),
        "mentor-1",
        json!({
            "name": "Guide Partners",
            "role": "Mentor",
            "types": ["SaaS", "AI"],
            "country": "Germany",
        }),
    );
}

/// Reads succeed; every write fails.
pub(super) struct ReadOnlyStore(pub(super) Arc<MemoryDocumentStore>);

impl DocumentStore for ReadOnlyStore {
    fn fetch(&self, path: &CollectionPath, id: &str) -> Result<Option<Document>, StoreError> {
        self.0.fetch(path, id)
    }

    fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        self.0.list(path)
    }

    fn insert(&self, _path: &CollectionPath, _document: Document) -> Result<String, StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }

    fn update(
        &self,
        _path: &CollectionPath,
        _id: &str,
        _patch: DocumentPatch,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }
}

pub(super) struct UnavailableStore;

impl DocumentStore for UnavailableStore {
    fn fetch(&self, _path: &CollectionPath, _id: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }

    fn list(&self, _path: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }

    fn insert(&self, _path: &CollectionPath, _document: Document) -> Result<String, StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }

    fn update(
        &self,
        _path: &CollectionPath,
        _id: &str,
        _patch: DocumentPatch,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }
}
