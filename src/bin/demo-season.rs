//! Print a random season file for local testing.

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pickem_pool::services::demo_season::{DemoOptions, generate};

/// Generate a random pick'em season as a schedule JSON file on stdout
#[derive(Parser, Debug)]
#[command(name = "demo-season")]
struct Cli {
    /// Number of weeks to schedule
    #[arg(long, default_value_t = DemoOptions::default().weeks)]
    weeks: u16,

    /// Games per week
    #[arg(long, default_value_t = DemoOptions::default().games_per_week)]
    games_per_week: usize,

    /// Number of pool users
    #[arg(long, default_value_t = DemoOptions::default().users)]
    users: usize,

    /// Leading weeks that get results
    #[arg(long, default_value_t = DemoOptions::default().decided_weeks)]
    decided_weeks: u16,

    /// Seed for a reproducible season
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let options = DemoOptions {
        weeks: cli.weeks,
        games_per_week: cli.games_per_week,
        users: cli.users,
        decided_weeks: cli.decided_weeks,
    };

    let file = match cli.seed {
        Some(seed) => generate(&mut StdRng::seed_from_u64(seed), options),
        None => generate(&mut rand::rng(), options),
    };
    info!(?options, seed = ?cli.seed, "generated demo season");
    println!("{}", serde_json::to_string_pretty(&file)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn omitted_options_use_demo_defaults() {
        let cli = Cli::try_parse_from(["demo-season", "--weeks", "2"]).unwrap();
        let defaults = DemoOptions::default();
        assert_eq!(cli.weeks, 2);
        assert_eq!(cli.games_per_week, defaults.games_per_week);
        assert_eq!(cli.users, defaults.users);
        assert_eq!(cli.decided_weeks, defaults.decided_weeks);
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn out_of_range_weeks_are_rejected() {
        assert!(Cli::try_parse_from(["demo-season", "--weeks", "70000"]).is_err());
    }
}
