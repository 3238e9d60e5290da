//! Behavioral checks for the two pure engines through the crate's public surface.

mod common {
    use startup_os::domain::{Stage, StartupId, StartupProfile};

    pub(super) fn profile(
        id: &str,
        role: &str,
        stage: Option<Stage>,
        types: &[&str],
    ) -> StartupProfile {
        StartupProfile {
            id: StartupId::from(id),
            name: id.to_string(),
            role: role.to_string(),
            stage,
            types: types.iter().map(|tag| tag.to_string()).collect(),
            ..StartupProfile::default()
        }
    }
}

mod health {
    use chrono::{Duration, TimeZone, Utc};
    use startup_os::domain::{
        Milestone, MilestoneStatus, Stage, StartupRecords, Task, TaskStatus, TeamMember, Trend,
    };
    use startup_os::compute_health_score;
    use startup_os::health::HealthCategory;

    use super::common::profile;

    fn records(
        done: usize,
        open: usize,
        achieved: usize,
        pending: usize,
        team: usize,
    ) -> StartupRecords {
        let tasks = (0..done)
            .map(|_| TaskStatus::Done)
            .chain((0..open).map(|_| TaskStatus::ToDo))
            .enumerate()
            .map(|(index, status)| Task {
                id: format!("t-{index}"),
                status,
                ..Task::default()
            })
            .collect();
        let milestones = (0..achieved)
            .map(|_| MilestoneStatus::Achieved)
            .chain((0..pending).map(|_| MilestoneStatus::Pending))
            .enumerate()
            .map(|(index, status)| Milestone {
                id: format!("m-{index}"),
                status,
                ..Milestone::default()
            })
            .collect();
        let team = (0..team)
            .map(|index| TeamMember {
                id: format!("tm-{index}"),
                ..TeamMember::default()
            })
            .collect();
        StartupRecords {
            tasks,
            milestones,
            team,
            ..StartupRecords::default()
        }
    }

    #[test]
    fn idea_stage_founder_with_thin_records() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let mut founder = profile("f", "FOUNDER", Some(Stage::Idea), &[]);
        founder.last_update = Some(now - Duration::days(8));
        founder.previous_score = Some(30);

        let report = compute_health_score(Some(&founder), &records(1, 2, 0, 1, 1), now);

        // 5 validation + 8 execution + 0 milestones + 5 team + 0 consistency + 0 readiness
        assert_eq!(report.breakdown.validation, 5);
        assert_eq!(report.breakdown.execution, 8);
        assert_eq!(report.breakdown.milestones, 0);
        assert_eq!(report.breakdown.team, 5);
        assert_eq!(report.breakdown.consistency, 0);
        assert_eq!(report.score, 18);
        assert_eq!(report.trend, Trend::Down);
    }

    #[test]
    fn growth_stage_team_reaches_the_ceiling() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let mut founder = profile("f", "FOUNDER", Some(Stage::Growth), &["SaaS"]);
        founder.problem = Some("Churn".to_string());
        founder.revenue_model = Some("Seats".to_string());
        founder.pitch_deck = Some("deck.pdf".to_string());
        founder.website = Some("https://example.com".to_string());
        founder.last_update = Some(now - Duration::days(7));
        founder.previous_score = Some(100);

        let report = compute_health_score(Some(&founder), &records(6, 0, 3, 0, 3), now);

        assert_eq!(report.score, 100);
        assert_eq!(report.trend, Trend::Neutral);
        assert_eq!(report.components.len(), HealthCategory::ordered().len());
        assert!(report
            .components
            .iter()
            .all(|component| component.score == component.max));
    }

    #[test]
    fn solo_founder_with_many_tasks_counts_as_active_team() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let founder = profile("f", "FOUNDER", Some(Stage::Validation), &[]);

        let busy = compute_health_score(Some(&founder), &records(0, 6, 0, 0, 1), now);
        let idle = compute_health_score(Some(&founder), &records(0, 5, 0, 0, 1), now);

        assert_eq!(busy.breakdown.team, 15);
        assert_eq!(idle.breakdown.team, 5);
    }
}

mod matching {
    use startup_os::domain::Stage;
    use startup_os::matching::score_pair;
    use startup_os::rank_matches;

    use super::common::profile;

    #[test]
    fn investor_outranks_peers_and_ties_keep_input_order() {
        let me = profile("me", "Founder", Some(Stage::Mvp), &["Health"]);
        let candidates = vec![
            profile("peer-a", "Founder", Some(Stage::Idea), &[]),
            profile("angel", "Investor", Some(Stage::Growth), &["Health"]),
            profile("peer-b", "Founder", Some(Stage::Growth), &[]),
        ];

        let ranked = rank_matches(Some(&me), candidates);
        let order: Vec<(&str, Option<u8>)> = ranked
            .iter()
            .map(|entry| (entry.profile.id.as_str(), entry.match_score))
            .collect();

        assert_eq!(
            order,
            [("angel", Some(50)), ("peer-a", Some(0)), ("peer-b", Some(0))]
        );
    }

    #[test]
    fn missing_locations_never_match_each_other() {
        let me = profile("me", "Founder", None, &[]);
        let other = profile("other", "Mentor", None, &[]);

        let breakdown = score_pair(&me, &other);
        assert_eq!(breakdown.same_city, 0);
        assert_eq!(breakdown.same_country, 0);
        assert_eq!(breakdown.stage_proximity, 0);
        assert_eq!(breakdown.score(), 0);
    }

    #[test]
    fn repeated_industry_tags_score_once() {
        let me = profile("me", "Founder", None, &["AI"]);
        let echo = profile("echo", "Founder", None, &["AI", "AI", "AI", "AI", "AI"]);

        assert_eq!(score_pair(&me, &echo).shared_industries, 20);
        assert_eq!(rank_matches(Some(&me), vec![echo])[0].match_score, Some(20));
    }

    #[test]
    fn oversized_tag_lists_clamp_without_panicking() {
        let tags: Vec<String> = (0..3_300).map(|index| format!("sector-{index}")).collect();
        let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();
        let me = profile("me", "Founder", Some(Stage::Mvp), &tag_refs);
        let fund = profile("fund", "Investor", Some(Stage::Revenue), &tag_refs);

        let ranked = rank_matches(Some(&me), vec![fund]);
        assert_eq!(ranked[0].match_score, Some(100));
    }

    #[test]
    fn ranking_without_viewer_is_unscored() {
        let candidates = vec![
            profile("b", "Founder", None, &[]),
            profile("a", "Investor", None, &[]),
        ];
        let ranked = rank_matches(None, candidates);
        assert_eq!(ranked[0].profile.id.as_str(), "b");
        assert!(ranked.iter().all(|entry| entry.match_score.is_none()));
    }
}

mod routing {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use startup_os::config::DirectoryConfig;
    use startup_os::router::{startup_router, AppServices};
    use startup_os::store::MemoryDocumentStore;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        startup_router(AppServices::new(
            Arc::new(MemoryDocumentStore::new()),
            DirectoryConfig::default(),
        ))
    }

    async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(uri, &body.to_string()).await
    }

    async fn post_raw(uri: &str, body: &str) -> (StatusCode, Value) {
        let response = build_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&body).expect("json"))
    }

    #[tokio::test]
    async fn health_endpoint_scores_inline_snapshot() {
        let (status, report) = post(
            "/api/v1/score/health",
            json!({
                "profile": {
                    "stage": "mvp",
                    "problem": "Slow onboarding",
                    "revenue_model": "Usage",
                    "last_update": "2025-05-30T00:00:00Z",
                },
                "records": {
                    "tasks": [
                        { "id": "t-1", "status": "Done" },
                        { "id": "t-2", "status": "To Do" },
                    ],
                },
                "now": "2025-06-01T00:00:00Z",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        // 20 validation + 13 execution + 0 milestones + 5 team + 10 consistency + 3 readiness
        assert_eq!(report["score"], 51);
        assert_eq!(report["breakdown"]["execution"], 13);
        assert_eq!(report["trend"], "up");
    }

    #[tokio::test]
    async fn health_endpoint_accepts_store_field_names() {
        let (status, report) = post(
            "/api/v1/score/health",
            json!({
                "profile": {
                    "stage": "mvp",
                    "problem": "Slow onboarding",
                    "revenueModel": "Usage",
                    "lastUpdate": "2025-05-30T00:00:00Z",
                },
                "records": {
                    "tasks": [
                        { "id": "t-1", "status": "Done", "goalId": "g-1" },
                        { "id": "t-2", "status": "To Do" },
                    ],
                },
                "now": "2025-06-01T00:00:00Z",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["score"], 51);
        assert_eq!(report["breakdown"]["validation"], 20);
        assert_eq!(report["breakdown"]["consistency"], 10);
    }

    #[tokio::test]
    async fn malformed_bodies_get_json_error_payloads() {
        let (status, payload) = post_raw("/api/v1/score/health", "{\"profile\": ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"].is_string());

        let (status, payload) =
            post_raw("/api/v1/score/matches", r#"{"candidates": "everyone"}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(payload["error"].is_string());
    }

    #[tokio::test]
    async fn health_endpoint_without_profile_is_zero() {
        let (status, report) = post("/api/v1/score/health", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["score"], 0);
        assert_eq!(report["trend"], "neutral");
    }

    #[tokio::test]
    async fn matches_endpoint_clamps_and_sorts() {
        let (status, ranked) = post(
            "/api/v1/score/matches",
            json!({
                "me": {
                    "role": "FOUNDER",
                    "stage": "revenue",
                    "types": ["Fintech", "SaaS"],
                    "city": "Pune",
                    "country": "India",
                },
                "candidates": [
                    { "id": "mentor", "role": "Mentor" },
                    {
                        "id": "fund",
                        "role": "INVESTOR",
                        "stage": "revenue",
                        "types": ["Fintech", "SaaS"],
                        "city": "Pune",
                        "country": "India",
                    },
                ],
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ranked[0]["id"], "fund");
        assert_eq!(ranked[0]["match_score"], 100);
        assert_eq!(ranked[1]["id"], "mentor");
        assert_eq!(ranked[1]["match_score"], 0);
    }
}
