use crate::infra::{read_json_file, seed_demo_store, DEMO_ADMIN_ID};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Deserialize;
use startup_os::config::DirectoryConfig;
use startup_os::domain::{Identity, StartupProfile, StartupRecords};
use startup_os::error::AppError;
use startup_os::health::HealthReport;
use startup_os::matching::{DirectoryFilter, DirectorySurface, RankedProfile};
use startup_os::router::AppServices;
use startup_os::service::{
    DashboardSummary, DirectoryPage, ReviewDecision, ServiceError, Writeback,
};
use startup_os::store::MemoryDocumentStore;
use startup_os::{compute_health_score, rank_matches};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding `{ "profile": ..., "records": ... }`
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Evaluation instant (RFC 3339). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// JSON file holding `{ "me": ..., "candidates": [...] }`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Only show the top N matches
    #[arg(long)]
    pub(crate) top: Option<usize>,
    /// Print the ranking as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory surface to browse (community, network, founders)
    #[arg(long, default_value = "community")]
    pub(crate) surface: String,
    /// Free-text directory search
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Override the evaluation instant (RFC 3339, defaults to now)
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Skip the admin review portion of the demo
    #[arg(long)]
    pub(crate) skip_review: bool,
}

#[derive(Debug, Deserialize)]
struct ScoreInput {
    #[serde(default)]
    profile: Option<StartupProfile>,
    #[serde(default)]
    records: StartupRecords,
}

#[derive(Debug, Deserialize)]
struct RankInput {
    #[serde(default)]
    me: Option<StartupProfile>,
    #[serde(default)]
    candidates: Vec<StartupProfile>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        snapshot,
        now,
        json,
    } = args;

    let input: ScoreInput = read_json_file(&snapshot)?;
    let now = now.unwrap_or_else(Utc::now);
    let report = compute_health_score(input.profile.as_ref(), &input.records, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_health_report(&report);
    }
    Ok(())
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs { input, top, json } = args;

    let input: RankInput = read_json_file(&input)?;
    let mut ranked = rank_matches(input.me.as_ref(), input.candidates);
    if let Some(top) = top {
        ranked.truncate(top);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        render_ranking(&ranked);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        surface,
        query,
        now,
        skip_review,
    } = args;

    let surface = surface
        .parse::<DirectorySurface>()
        .map_err(ServiceError::InvalidRequest)?;
    let now = now.unwrap_or_else(Utc::now);

    let store = Arc::new(MemoryDocumentStore::new());
    let founder = seed_demo_store(&*store, now).map_err(ServiceError::from)?;
    let services = AppServices::new(store, DirectoryConfig::default());
    let identity = Identity::signed_in(founder.as_str());

    println!("StartupOS dashboard demo");
    let summary = services.dashboard.summary(&identity, now)?;
    render_summary(&summary);

    println!("\nTask board");
    for entry in services.dashboard.task_board(&identity)? {
        println!(
            "  - [{}] {} ({}) -> {}",
            entry.task.status.label(),
            entry.task.title,
            entry.task.priority.label(),
            entry.goal_title
        );
    }

    let filter = DirectoryFilter {
        query,
        ..DirectoryFilter::default()
    };
    let page = services.directory.browse(&identity, surface, &filter)?;
    render_directory(&page);

    if let Some(best) = page
        .entries
        .iter()
        .find(|entry| !entry.request_sent)
        .map(|entry| entry.ranked.profile.id.clone())
    {
        let request = services
            .directory
            .send_connection_request(&identity, &best, now)?;
        println!(
            "\nConnection request sent: {} -> {} ({})",
            request.from_name,
            request.to_name,
            request.status.key()
        );
    }

    if !skip_review {
        let admin = Identity::signed_in(DEMO_ADMIN_ID);
        println!(
            "\nAdmin queue: {} pending review",
            services.admin.pending_count(&admin)?
        );
        let reviewed = services
            .admin
            .review(&admin, &founder, ReviewDecision::Approve, now)?;
        println!(
            "  - {} marked {} by {}",
            reviewed.name,
            reviewed.status.key(),
            reviewed.reviewed_by.as_deref().unwrap_or(DEMO_ADMIN_ID)
        );
    }

    Ok(())
}

fn render_health_report(report: &HealthReport) {
    println!("Health score: {}/100 ({})", report.score, report.trend.label());
    for component in &report.components {
        println!(
            "  - {:<12} {:>2}/{:<2} {}",
            component.category.label(),
            component.score,
            component.max,
            component.notes
        );
    }
}

fn render_ranking(ranked: &[RankedProfile]) {
    if ranked.is_empty() {
        println!("No candidates to rank.");
        return;
    }
    for (position, entry) in ranked.iter().enumerate() {
        let score = entry
            .match_score
            .map(|score| format!("{score:>3}%"))
            .unwrap_or_else(|| "   -".to_string());
        println!(
            "{:>2}. {} {} [{}]",
            position + 1,
            score,
            entry.profile.name,
            entry.profile.role
        );
    }
}

fn render_summary(summary: &DashboardSummary) {
    println!(
        "Startup: {}{}",
        summary.startup_name.as_deref().unwrap_or("(onboarding incomplete)"),
        if summary.pending_approval {
            " | awaiting approval"
        } else {
            ""
        }
    );
    render_health_report(&summary.health.report);
    match &summary.health.writeback {
        Writeback::Skipped => println!("  stored score already current"),
        Writeback::Persisted { previous_score } => {
            println!("  stored score updated (previous {previous_score})")
        }
        Writeback::Failed { reason } => println!("  score not saved: {reason}"),
    }
    println!(
        "Goals: {} active, {} blocked | Tasks: {} open, {} done | Milestones achieved: {} | Team: {}",
        summary.active_goals,
        summary.blocked_goals,
        summary.open_tasks,
        summary.done_tasks,
        summary.achieved_milestones,
        summary.team_size
    );
}

fn render_directory(page: &DirectoryPage) {
    println!(
        "\n{} directory: {} members | {} founders | {} investors",
        page.surface, page.stats.members, page.stats.founders, page.stats.investors
    );
    for entry in &page.entries {
        let profile = &entry.ranked.profile;
        let score = entry
            .ranked
            .match_score
            .map(|score| format!("{score}%"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  - {} ({}) match {} | {}{}",
            profile.name,
            profile.role,
            score,
            profile.types.join(", "),
            if entry.request_sent {
                " | request sent"
            } else {
                ""
            }
        );
    }
}
