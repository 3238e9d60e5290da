use std::sync::Arc;

use chrono::Duration;

use super::common::*;
use crate::domain::{Identity, Trend, UNLINKED_GOAL};
use crate::health::CategoryScores;
use crate::normalize;
use crate::service::{DashboardService, ServiceError, Writeback};
use crate::store::{DocumentStore, MemoryDocumentStore, StoreError};

#[test]
fn refresh_computes_breakdown_and_persists_changed_score() {
    let store = seeded_store();
    let service = DashboardService::new(store.clone());

    let refresh = service
        .refresh_health(&founder(), now())
        .expect("refresh succeeds");

    assert_eq!(
        refresh.report.breakdown,
        CategoryScores {
            validation: 20,
            execution: 15,
            milestones: 10,
            team: 15,
            consistency: 10,
            readiness: 3,
        }
    );
    assert_eq!(refresh.report.score, 73);
    assert_eq!(refresh.report.trend, Trend::Up);
    assert_eq!(refresh.writeback, Writeback::Persisted { previous_score: 40 });

    let stored = store
        .fetch(&startups(), FOUNDER_ID)
        .expect("fetch succeeds")
        .map(|document| normalize::startup_profile(&document))
        .expect("profile present");
    assert_eq!(stored.health_score, 73);
    assert_eq!(stored.previous_score, Some(40));
    assert_eq!(stored.trend, Some(Trend::Up));
    assert_eq!(stored.last_update, Some(now()));
}

#[test]
fn refresh_skips_write_when_score_is_unchanged() {
    let store = seeded_store();
    let service = DashboardService::new(store.clone());

    service
        .refresh_health(&founder(), now())
        .expect("first refresh");
    let second = service
        .refresh_health(&founder(), now() + Duration::hours(1))
        .expect("second refresh");

    assert_eq!(second.report.score, 73);
    assert_eq!(second.writeback, Writeback::Skipped);
    // previousScore is now 40, so the trend still reads up.
    assert_eq!(second.report.trend, Trend::Up);
}

#[test]
fn failed_write_still_returns_the_computed_report() {
    let service = DashboardService::new(Arc::new(ReadOnlyStore(seeded_store())));

    let refresh = service
        .refresh_health(&founder(), now())
        .expect("computation survives write failure");

    assert_eq!(refresh.report.score, 73);
    match refresh.writeback {
        Writeback::Failed { reason } => assert!(reason.contains("read only")),
        other => panic!("expected failed writeback, got {other:?}"),
    }
}

#[test]
fn missing_profile_yields_degenerate_report_without_writing() {
    let service = DashboardService::new(Arc::new(MemoryDocumentStore::new()));

    let refresh = service
        .refresh_health(&Identity::signed_in("not-onboarded"), now())
        .expect("refresh succeeds");

    assert_eq!(refresh.report.score, 0);
    assert_eq!(refresh.report.trend, Trend::Neutral);
    assert_eq!(refresh.writeback, Writeback::Skipped);
}

#[test]
fn anonymous_callers_are_rejected() {
    let service = DashboardService::new(seeded_store());
    match service.snapshot(&Identity::anonymous()) {
        Err(ServiceError::Unauthenticated) => {}
        other => panic!("expected unauthenticated, got {other:?}"),
    }
}

#[test]
fn store_outage_propagates_from_snapshot() {
    let service = DashboardService::new(Arc::new(UnavailableStore));
    match service.summary(&founder(), now()) {
        Err(ServiceError::Store(StoreError::Unavailable(reason))) => {
            assert_eq!(reason, "backend offline")
        }
        other => panic!("expected store error, got {other:?}"),
    }
}

#[test]
fn summary_counts_goals_tasks_and_approval_state() {
    let service = DashboardService::new(seeded_store());

    let summary = service.summary(&founder(), now()).expect("summary");

    assert_eq!(summary.startup_name.as_deref(), Some("Ledgerly"));
    assert!(summary.pending_approval);
    assert_eq!(summary.active_goals, 2);
    assert_eq!(summary.blocked_goals, 1);
    assert_eq!(summary.open_tasks, 2);
    assert_eq!(summary.done_tasks, 3);
    assert_eq!(summary.achieved_milestones, 1);
    assert_eq!(summary.team_size, 2);
    assert_eq!(summary.health.report.score, 73);
}

#[test]
fn task_board_resolves_goal_titles_with_fallback() {
    let service = DashboardService::new(seeded_store());

    let board = service.task_board(&founder()).expect("task board");
    let titles: Vec<_> = board
        .iter()
        .map(|entry| (entry.task.id.as_str(), entry.goal_title.as_str()))
        .collect();

    assert_eq!(
        titles,
        [
            ("t-1", "Launch beta"),
            ("t-2", "Launch beta"),
            ("t-3", UNLINKED_GOAL),
            ("t-4", UNLINKED_GOAL),
            ("t-5", "Close pilot"),
        ]
    );
}
