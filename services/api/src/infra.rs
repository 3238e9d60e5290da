use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use startup_os::domain::{StartupId, SUPER_ADMIN_ROLE};
use startup_os::error::AppError;
use startup_os::normalize::encode_timestamp;
use startup_os::store::{Collection, CollectionPath, Document, DocumentStore, StoreError};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) const DEMO_FOUNDER_ID: &str = "demo-founder";
pub(crate) const DEMO_ADMIN_ID: &str = "demo-admin";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

pub(crate) fn read_json_file<T>(path: &Path) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Populate a store with one founder workspace, a handful of directory members and the
/// platform accounts for the founder and a super admin.
pub(crate) fn seed_demo_store<S>(store: &S, now: DateTime<Utc>) -> Result<StartupId, StoreError>
where
    S: DocumentStore,
{
    let founder = StartupId::from(DEMO_FOUNDER_ID);
    let startups = CollectionPath::root(Collection::Startups);
    let scoped = |collection| CollectionPath::scoped(&founder, collection);

    put(
        store,
        &startups,
        DEMO_FOUNDER_ID,
        json!({
            "name": "Ledgerly",
            "email": "founders@ledgerly.example",
            "role": "FOUNDER",
            "stage": "mvp",
            "types": ["Fintech", "SaaS"],
            "city": "Bengaluru",
            "country": "India",
            "problem": "Small suppliers wait months for invoices to clear",
            "solution": "Invoice financing embedded in accounting tools",
            "revenueModel": "Take rate on financed invoices",
            "pitchDeck": "https://ledgerly.example/deck.pdf",
            "healthScore": 52,
            "previousScore": 48,
            "status": "pending",
            "lastUpdate": encode_timestamp(now - Duration::days(2)),
            "createdAt": encode_timestamp(now - Duration::days(30)),
        }),
    )?;

    let users = CollectionPath::root(Collection::Users);
    for (id, email, role) in [
        (DEMO_FOUNDER_ID, "founders@ledgerly.example", "FOUNDER"),
        (DEMO_ADMIN_ID, "ops@startupos.example", SUPER_ADMIN_ROLE),
    ] {
        put(store, &users, id, json!({ "email": email, "role": role }))?;
    }

    for (id, title, status, progress) in [
        ("goal-beta", "Ship private beta", "On Track", 70),
        ("goal-pilot", "Sign two pilot lenders", "At Risk", 25),
        ("goal-entity", "Incorporate", "Completed", 100),
    ] {
        put(
            store,
            &scoped(Collection::Goals),
            id,
            json!({ "title": title, "status": status, "progress": progress, "type": "Business" }),
        )?;
    }

    for (id, title, status, goal) in [
        ("task-1", "Finish onboarding flow", "Done", Some("goal-beta")),
        ("task-2", "Bank API sandbox", "Done", Some("goal-beta")),
        ("task-3", "Draft pilot term sheet", "In Progress", Some("goal-pilot")),
        ("task-4", "Pricing page copy", "To Do", None),
    ] {
        put(
            store,
            &scoped(Collection::Tasks),
            id,
            json!({ "title": title, "status": status, "priority": "High", "goalId": goal }),
        )?;
    }

    for (id, title, status) in [
        ("ms-1", "First paying customer", "Achieved"),
        ("ms-2", "Pre-seed close", "Pending"),
    ] {
        put(
            store,
            &scoped(Collection::Milestones),
            id,
            json!({ "title": title, "status": status }),
        )?;
    }

    for (id, name, role) in [("tm-1", "Asha Rao", "CEO"), ("tm-2", "Vik Menon", "CTO")] {
        put(
            store,
            &scoped(Collection::Team),
            id,
            json!({ "name": name, "role": role, "status": "Active", "access": "Admin" }),
        )?;
    }

    let members: [(&str, Value); 4] = [
        (
            "seedfund",
            json!({
                "name": "Seedfund Capital",
                "role": "INVESTOR",
                "stage": "revenue",
                "types": ["Fintech"],
                "city": "Bengaluru",
                "country": "India",
                "status": "approved",
                "createdAt": encode_timestamp(now - Duration::days(12)),
            }),
        ),
        (
            "tutorly",
            json!({
                "name": "Tutorly",
                "role": "FOUNDER",
                "stage": "idea",
                "types": ["Edtech"],
                "city": "Pune",
                "country": "India",
                "status": "approved",
                "createdAt": encode_timestamp(now - Duration::days(8)),
            }),
        ),
        (
            "guide-partners",
            json!({
                "name": "Guide Partners",
                "role": "Mentor",
                "types": ["SaaS", "AI"],
                "country": "Germany",
                "createdAt": encode_timestamp(now - Duration::days(1)),
            }),
        ),
        (
            "greenloop",
            json!({
                "name": "Greenloop",
                "role": "FOUNDER",
                "stage": "validation",
                "types": ["Climate", "SaaS"],
                "city": "Bengaluru",
                "country": "India",
                "createdAt": encode_timestamp(now - Duration::days(3)),
            }),
        ),
    ];
    for (id, fields) in members {
        put(store, &startups, id, fields)?;
    }

    Ok(founder)
}

fn put<S>(store: &S, path: &CollectionPath, id: &str, fields: Value) -> Result<(), StoreError>
where
    S: DocumentStore,
{
    store.insert(path, Document::from_value(id, fields)).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use startup_os::store::MemoryDocumentStore;

    #[test]
    fn demo_seed_populates_founder_workspace() {
        let store = MemoryDocumentStore::new();
        let founder = seed_demo_store(&store, Utc::now()).expect("seed succeeds");

        let startups = store
            .list(&CollectionPath::root(Collection::Startups))
            .expect("list startups");
        assert_eq!(startups.len(), 5);

        let tasks = store
            .list(&CollectionPath::scoped(&founder, Collection::Tasks))
            .expect("list tasks");
        assert_eq!(tasks.len(), 4);

        let admin = store
            .fetch(&CollectionPath::root(Collection::Users), DEMO_ADMIN_ID)
            .expect("fetch admin")
            .expect("admin account seeded");
        assert!(startup_os::normalize::user_account(&admin).is_super_admin());
    }

    #[test]
    fn seeding_twice_conflicts() {
        let store = MemoryDocumentStore::new();
        seed_demo_store(&store, Utc::now()).expect("first seed");
        assert!(matches!(
            seed_demo_store(&store, Utc::now()),
            Err(StoreError::Conflict)
        ));
    }

    #[test]
    fn timestamps_parse_rfc3339() {
        let parsed = parse_timestamp("2025-10-15T09:30:00Z").expect("valid timestamp");
        assert_eq!(parsed.timestamp(), 1_760_520_600);
        assert!(parse_timestamp("yesterday").is_err());
    }
}
