//! Pick'em pool batch entrypoint: imports a season file, re-scores it and prints the
//! JSON season report.

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pickem_pool::{
    config::AppConfig,
    dto::schedule::ScheduleFile,
    services::{import_service::import_schedule, report_service::season_report},
    state::AppState,
};

/// Score a pick'em season file and print its JSON report
#[derive(Parser, Debug)]
#[command(name = "pickem-pool")]
struct Cli {
    /// Season schedule file (teams, users, games and picks)
    #[arg(env = "PICKEM_POOL_SCHEDULE_PATH")]
    schedule: PathBuf,

    /// Instant the report is computed for (RFC 3339); defaults to now
    #[arg(long, env = "PICKEM_POOL_REPORT_AT", value_parser = parse_instant)]
    report_at: Option<OffsetDateTime>,
}

fn parse_instant(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let contents = fs::read_to_string(&cli.schedule)
        .with_context(|| format!("reading {}", cli.schedule.display()))?;
    let file: ScheduleFile = serde_json::from_str(&contents).context("parsing schedule file")?;

    let state = AppState::in_memory(AppConfig::load());
    let summary = import_schedule(&state, file)
        .await
        .context("importing schedule")?;
    info!(
        path = %cli.schedule.display(),
        games = summary.games,
        picks = summary.picks,
        "season loaded"
    );

    let now = cli.report_at.unwrap_or_else(OffsetDateTime::now_utc);
    let report = season_report(&state, now)
        .await
        .context("building season report")?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Configure tracing subscribers; logs go to stderr so stdout stays valid JSON.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
