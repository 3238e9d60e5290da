use std::sync::Arc;

use super::common::*;
use crate::config::DirectoryConfig;
use crate::domain::{ConnectionStatus, Identity, StartupId};
use crate::matching::{DirectoryFilter, DirectorySurface};
use crate::service::{DirectoryService, ServiceError};
use crate::store::MemoryDocumentStore;

fn service(store: Arc<MemoryDocumentStore>) -> DirectoryService<MemoryDocumentStore> {
    DirectoryService::new(store, DirectoryConfig::default())
}

fn ids(page: &crate::service::DirectoryPage) -> Vec<&str> {
    page.entries
        .iter()
        .map(|entry| entry.ranked.profile.id.as_str())
        .collect()
}

#[test]
fn browse_ranks_other_members_and_excludes_viewer() {
    let store = seeded_store();
    seed_directory(&store);

    let page = service(store)
        .browse(&founder(), DirectorySurface::Community, &DirectoryFilter::default())
        .expect("browse");

    // investor: 20 fintech + 25 adjacent stage + 10 country + 30 roles = 85
    // founder-2: 10 country + 15 city = 25 (idea is two steps from mvp)
    // mentor: 20 SaaS
    assert_eq!(ids(&page), ["investor-1", "founder-2", "mentor-1"]);
    let scores: Vec<_> = page
        .entries
        .iter()
        .map(|entry| entry.ranked.match_score)
        .collect();
    assert_eq!(scores, [Some(85), Some(25), Some(20)]);
    assert_eq!(page.stats.members, 3);
    assert_eq!(page.stats.founders, 1);
    assert_eq!(page.stats.investors, 1);
}

#[test]
fn browse_before_onboarding_keeps_store_order_unscored() {
    let store = Arc::new(MemoryDocumentStore::new());
    seed_directory(&store);

    let page = service(store)
        .browse(
            &Identity::signed_in("newcomer"),
            DirectorySurface::Founders,
            &DirectoryFilter::default(),
        )
        .expect("browse");

    assert_eq!(ids(&page), ["investor-1", "founder-2", "mentor-1"]);
    assert!(page
        .entries
        .iter()
        .all(|entry| entry.ranked.match_score.is_none()));
}

#[test]
fn surface_filters_do_not_change_scores() {
    let store = seeded_store();
    seed_directory(&store);

    let filter = DirectoryFilter {
        stage: Some("revenue".to_string()),
        ..DirectoryFilter::default()
    };
    let page = service(store)
        .browse(&founder(), DirectorySurface::Network, &filter)
        .expect("browse");

    assert_eq!(ids(&page), ["investor-1"]);
    assert_eq!(page.entries[0].ranked.match_score, Some(85));
    assert_eq!(page.stats.members, 3);
}

#[test]
fn candidate_limit_caps_loaded_members() {
    let store = seeded_store();
    seed_directory(&store);

    let limited = DirectoryService::new(store, DirectoryConfig { candidate_limit: 2 });
    let page = limited
        .browse(&founder(), DirectorySurface::Founders, &DirectoryFilter::default())
        .expect("browse");

    // The viewer's own document occupies one of the two slots.
    assert_eq!(ids(&page), ["investor-1"]);
}

#[test]
fn connection_request_is_recorded_and_marked_sent() {
    let store = seeded_store();
    seed_directory(&store);
    let service = service(store);
    let target = StartupId::from("investor-1");

    let request = service
        .send_connection_request(&founder(), &target, now())
        .expect("request sent");
    assert_eq!(request.from_name, "Ledgerly");
    assert_eq!(request.to_name, "Seedfund Capital");
    assert_eq!(request.status, ConnectionStatus::Pending);
    assert_eq!(request.created_at, Some(now()));
    assert!(!request.id.is_empty());

    let page = service
        .browse(&founder(), DirectorySurface::Community, &DirectoryFilter::default())
        .expect("browse");
    let flags: Vec<_> = page
        .entries
        .iter()
        .map(|entry| (entry.ranked.profile.id.as_str(), entry.request_sent))
        .collect();
    assert_eq!(
        flags,
        [("investor-1", true), ("founder-2", false), ("mentor-1", false)]
    );
}

#[test]
fn duplicate_requests_are_suppressed() {
    let store = seeded_store();
    seed_directory(&store);
    let service = service(store);
    let target = StartupId::from("founder-2");

    service
        .send_connection_request(&founder(), &target, now())
        .expect("first request");
    match service.send_connection_request(&founder(), &target, now()) {
        Err(ServiceError::DuplicateRequest(id)) => assert_eq!(id, target),
        other => panic!("expected duplicate, got {other:?}"),
    }
}

#[test]
fn requests_to_self_or_unknown_members_are_rejected() {
    let store = seeded_store();
    let service = service(store);

    match service.send_connection_request(&founder(), &StartupId::from(FOUNDER_ID), now()) {
        Err(ServiceError::InvalidRequest(_)) => {}
        other => panic!("expected invalid request, got {other:?}"),
    }
    match service.send_connection_request(&founder(), &StartupId::from("ghost"), now()) {
        Err(ServiceError::ProfileNotFound(id)) => assert_eq!(id.as_str(), "ghost"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn sender_without_profile_is_named_unknown() {
    let store = Arc::new(MemoryDocumentStore::new());
    seed_directory(&store);
    let service = service(store);

    let request = service
        .send_connection_request(
            &Identity::signed_in("newcomer"),
            &StartupId::from("mentor-1"),
            now(),
        )
        .expect("request sent");
    assert_eq!(request.from_name, "Unknown");
}
