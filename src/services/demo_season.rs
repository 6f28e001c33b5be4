//! Random season generator used to exercise the pool locally.

use indexmap::IndexMap;
use rand::{Rng, seq::SliceRandom};
use time::{Duration, OffsetDateTime, macros::datetime};

use crate::dto::schedule::{GameInput, ScheduleFile, TeamInput, UserInput, WeekInput};

/// Thursday night opener of the generated season.
const SEASON_OPENER: OffsetDateTime = datetime!(2025-09-05 00:20 UTC);

/// Name, alias, conference and division of every franchise.
const LEAGUE: [(&str, &str, &str, &str); 32] = [
    ("Buffalo Bills", "BUF", "AFC", "East"),
    ("Miami Dolphins", "MIA", "AFC", "East"),
    ("New England Patriots", "NE", "AFC", "East"),
    ("New York Jets", "NYJ", "AFC", "East"),
    ("Baltimore Ravens", "BAL", "AFC", "North"),
    ("Cincinnati Bengals", "CIN", "AFC", "North"),
    ("Cleveland Browns", "CLE", "AFC", "North"),
    ("Pittsburgh Steelers", "PIT", "AFC", "North"),
    ("Houston Texans", "HOU", "AFC", "South"),
    ("Indianapolis Colts", "IND", "AFC", "South"),
    ("Jacksonville Jaguars", "JAX", "AFC", "South"),
    ("Tennessee Titans", "TEN", "AFC", "South"),
    ("Denver Broncos", "DEN", "AFC", "West"),
    ("Kansas City Chiefs", "KC", "AFC", "West"),
    ("Las Vegas Raiders", "LV", "AFC", "West"),
    ("Los Angeles Chargers", "LAC", "AFC", "West"),
    ("Dallas Cowboys", "DAL", "NFC", "East"),
    ("New York Giants", "NYG", "NFC", "East"),
    ("Philadelphia Eagles", "PHI", "NFC", "East"),
    ("Washington Commanders", "WAS", "NFC", "East"),
    ("Chicago Bears", "CHI", "NFC", "North"),
    ("Detroit Lions", "DET", "NFC", "North"),
    ("Green Bay Packers", "GB", "NFC", "North"),
    ("Minnesota Vikings", "MIN", "NFC", "North"),
    ("Atlanta Falcons", "ATL", "NFC", "South"),
    ("Carolina Panthers", "CAR", "NFC", "South"),
    ("New Orleans Saints", "NO", "NFC", "South"),
    ("Tampa Bay Buccaneers", "TB", "NFC", "South"),
    ("Arizona Cardinals", "ARI", "NFC", "West"),
    ("Los Angeles Rams", "LAR", "NFC", "West"),
    ("San Francisco 49ers", "SF", "NFC", "West"),
    ("Seattle Seahawks", "SEA", "NFC", "West"),
];

/// Shape of the generated season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoOptions {
    pub weeks: u16,
    /// Capped at 16, every team plays at most once a week.
    pub games_per_week: usize,
    pub users: usize,
    /// Weeks, from the first, that get random results.
    pub decided_weeks: u16,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            weeks: 4,
            games_per_week: 5,
            users: 6,
            decided_weeks: 3,
        }
    }
}

/// Generate a season with random matchups, picks and results.
///
/// Every user picks every game; decided games get a random winner, with an
/// occasional tie.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, options: DemoOptions) -> ScheduleFile {
    let teams: Vec<TeamInput> = LEAGUE
        .iter()
        .map(|(name, alias, conference, division)| TeamInput {
            name: (*name).into(),
            alias: (*alias).into(),
            conference: (*conference).into(),
            division: (*division).into(),
        })
        .collect();

    let users: Vec<UserInput> = (1..=options.users)
        .map(|n| UserInput {
            username: format!("player{n}"),
            first_name: Some(format!("Player{n}")),
            last_name: Some("Demo".into()),
        })
        .collect();

    let games_per_week = options.games_per_week.min(LEAGUE.len() / 2);
    let mut aliases: Vec<&str> = LEAGUE.iter().map(|(_, alias, _, _)| *alias).collect();

    let weeks = (1..=options.weeks)
        .map(|week| {
            aliases.shuffle(rng);
            let week_start = SEASON_OPENER + Duration::weeks(i64::from(week) - 1);
            let decided = week <= options.decided_weeks;

            let games = aliases
                .chunks_exact(2)
                .take(games_per_week)
                .enumerate()
                .map(|(slot, pair)| {
                    let (home, away) = (pair[0].to_string(), pair[1].to_string());
                    let picks: IndexMap<String, String> = users
                        .iter()
                        .map(|user| {
                            let choice = if rng.random_bool(0.5) { &home } else { &away };
                            (user.username.clone(), choice.clone())
                        })
                        .collect();

                    let (winner, tie) = if !decided {
                        (None, false)
                    } else if rng.random_bool(0.02) {
                        (None, true)
                    } else if rng.random_bool(0.5) {
                        (Some(home.clone()), false)
                    } else {
                        (Some(away.clone()), false)
                    };

                    GameInput {
                        kickoff: week_start + Duration::hours(3 * slot as i64),
                        home,
                        away,
                        points: 1,
                        winner,
                        tie,
                        picks,
                    }
                })
                .collect();

            WeekInput { week, games }
        })
        .collect();

    ScheduleFile {
        teams,
        users,
        weeks,
    }
}
