use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    dao::models::{GameEntity, PickEntity, TeamEntity, UserEntity},
    dto::format_instant,
    services::standings::{CumulativeRow, CumulativeStandings, WeekRow, WeeklyStandings},
};

/// Alias of a team, or its id when the team is unknown.
pub(crate) fn alias_of(teams: &HashMap<Uuid, TeamEntity>, id: Uuid) -> String {
    teams
        .get(&id)
        .map(|team| team.alias.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Pool participant as shown in standings tables.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct UserSnapshot {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub short_name: String,
}

impl From<&UserEntity> for UserSnapshot {
    fn from(user: &UserEntity) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name(),
            short_name: user.short_name(),
        }
    }
}

/// Game header of a weekly summary column.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub id: Uuid,
    pub week: u16,
    /// Kickoff in RFC 3339.
    pub kickoff: String,
    pub home_team: String,
    pub away_team: String,
    pub winner: Option<String>,
    pub is_tie: bool,
    pub points: i32,
}

impl GameSnapshot {
    pub fn from_game(game: &GameEntity, teams: &HashMap<Uuid, TeamEntity>) -> Self {
        Self {
            id: game.id,
            week: game.week,
            kickoff: format_instant(game.game_time),
            home_team: alias_of(teams, game.home_team),
            away_team: alias_of(teams, game.away_team),
            winner: game.winner.map(|winner| alias_of(teams, winner)),
            is_tie: game.is_tie,
            points: game.points,
        }
    }
}

/// One cell of a weekly summary row.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PickSnapshot {
    pub game_id: Uuid,
    pub picked_team: String,
    pub points_earned: i32,
    pub bonus_points: i32,
    /// `null` while the game is pending.
    pub is_correct: Option<bool>,
}

impl PickSnapshot {
    pub fn from_pick(pick: &PickEntity, teams: &HashMap<Uuid, TeamEntity>) -> Self {
        Self {
            game_id: pick.game_id,
            picked_team: alias_of(teams, pick.picked_team),
            points_earned: pick.points_earned,
            bonus_points: pick.bonus_points,
            is_correct: pick.is_correct,
        }
    }
}

/// Ranked row of a weekly summary.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct WeeklyRow {
    pub user: UserSnapshot,
    /// Aligned with the summary's games; `null` where no pick was made.
    pub picks: Vec<Option<PickSnapshot>>,
    pub points_earned: i32,
    pub rank: u32,
    pub perfect_week: bool,
}

impl WeeklyRow {
    fn from_row(row: &WeekRow, teams: &HashMap<Uuid, TeamEntity>) -> Self {
        Self {
            user: UserSnapshot::from(&row.user),
            picks: row
                .picks
                .iter()
                .map(|pick| pick.as_ref().map(|pick| PickSnapshot::from_pick(pick, teams)))
                .collect(),
            points_earned: row.points,
            rank: row.rank,
            perfect_week: row.perfect_week,
        }
    }
}

/// Response payload for a single week.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct WeeklySummaryResponse {
    pub week: u16,
    pub games: Vec<GameSnapshot>,
    pub rows: Vec<WeeklyRow>,
}

impl WeeklySummaryResponse {
    pub fn from_standings(standings: &WeeklyStandings, teams: &HashMap<Uuid, TeamEntity>) -> Self {
        Self {
            week: standings.week,
            games: standings
                .games
                .iter()
                .map(|game| GameSnapshot::from_game(game, teams))
                .collect(),
            rows: standings
                .rows
                .iter()
                .map(|row| WeeklyRow::from_row(row, teams))
                .collect(),
        }
    }
}

/// Ranked row of the season table.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StandingsRow {
    pub user: UserSnapshot,
    pub weekly_points: Vec<i32>,
    pub total_points: i32,
    pub rank: u32,
}

impl From<&CumulativeRow> for StandingsRow {
    fn from(row: &CumulativeRow) -> Self {
        Self {
            user: UserSnapshot::from(&row.user),
            weekly_points: row.weekly_points.clone(),
            total_points: row.total_points,
            rank: row.rank,
        }
    }
}

/// Response payload for the season table.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CumulativeStandingsResponse {
    pub weeks: Vec<u16>,
    pub rows: Vec<StandingsRow>,
}

impl From<&CumulativeStandings> for CumulativeStandingsResponse {
    fn from(standings: &CumulativeStandings) -> Self {
        Self {
            weeks: standings.weeks.clone(),
            rows: standings.rows.iter().map(StandingsRow::from).collect(),
        }
    }
}
