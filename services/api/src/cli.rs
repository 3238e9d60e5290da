use crate::demo::{run_demo, run_rank, run_score, DemoArgs, RankArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use startup_os::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "StartupOS",
    about = "Serve and exercise the StartupOS health scoring and matching core",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute a health score from a JSON snapshot file
    Score(ScoreArgs),
    /// Rank candidate profiles against a viewer from a JSON file
    Rank(RankArgs),
    /// Run a seeded end-to-end walkthrough of the dashboard, directory and admin flows
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory store with the demo workspace
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Rank(args) => run_rank(args),
        Command::Demo(args) => run_demo(args),
    }
}
