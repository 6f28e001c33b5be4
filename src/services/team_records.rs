//! Team win/loss/tie records, division tables and record reconciliation.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use serde::Serialize;
use uuid::Uuid;

use crate::dao::models::{GameEntity, TeamEntity};

/// Win/loss/tie counters of one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl TeamRecord {
    /// Counters stored on a team row.
    pub fn of(team: &TeamEntity) -> Self {
        Self {
            wins: team.wins,
            losses: team.losses,
            ties: team.ties,
        }
    }

    /// Decided games played.
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// `(wins + ties / 2) / games`, or 0 before the first decided game.
    pub fn win_pct(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => (f64::from(self.wins) + f64::from(self.ties) / 2.0) / f64::from(games),
        }
    }
}

impl fmt::Display for TeamRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wins, self.losses, self.ties)
    }
}

/// Teams of one division, best record first.
#[derive(Debug, Clone, PartialEq)]
pub struct DivisionTable {
    /// Conference and division, e.g. "AFC East".
    pub name: String,
    pub teams: Vec<TeamEntity>,
}

/// Group teams by conference and division, each sorted by winning percentage then name.
pub fn division_standings(teams: &[TeamEntity]) -> Vec<DivisionTable> {
    let mut grouped: BTreeMap<(String, String), Vec<TeamEntity>> = BTreeMap::new();
    for team in teams {
        grouped
            .entry((team.conference.clone(), team.division.clone()))
            .or_default()
            .push(team.clone());
    }

    grouped
        .into_iter()
        .map(|((conference, division), mut teams)| {
            teams.sort_by(|a, b| {
                TeamRecord::of(b)
                    .win_pct()
                    .total_cmp(&TeamRecord::of(a).win_pct())
                    .then_with(|| a.name.cmp(&b.name))
            });
            DivisionTable {
                name: format!("{conference} {division}"),
                teams,
            }
        })
        .collect()
}

/// Records implied by the decided games.
pub fn expected_records(games: &[GameEntity]) -> HashMap<Uuid, TeamRecord> {
    let mut records: HashMap<Uuid, TeamRecord> = HashMap::new();
    for game in games {
        match (game.winner, game.is_tie) {
            (Some(winner), _) => {
                let loser = if winner == game.home_team {
                    game.away_team
                } else {
                    game.home_team
                };
                records.entry(winner).or_default().wins += 1;
                records.entry(loser).or_default().losses += 1;
            }
            (None, true) => {
                records.entry(game.home_team).or_default().ties += 1;
                records.entry(game.away_team).or_default().ties += 1;
            }
            (None, false) => {}
        }
    }
    records
}

/// A team whose stored counters disagree with its decided games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDrift {
    pub team_id: Uuid,
    pub alias: String,
    pub stored: TeamRecord,
    pub expected: TeamRecord,
}

/// List every team whose stored record differs from the one implied by `games`.
pub fn reconcile_team_records(games: &[GameEntity], teams: &[TeamEntity]) -> Vec<RecordDrift> {
    let expected = expected_records(games);
    teams
        .iter()
        .filter_map(|team| {
            let stored = TeamRecord::of(team);
            let expected = expected.get(&team.id).copied().unwrap_or_default();
            (stored != expected).then(|| RecordDrift {
                team_id: team.id,
                alias: team.alias.clone(),
                stored,
                expected,
            })
        })
        .collect()
}
