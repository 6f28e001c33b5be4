use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// NFL franchise together with its running win/loss/tie record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Full display name (e.g. "Buffalo Bills").
    pub name: String,
    /// Short code used in compact tables (e.g. "BUF").
    pub alias: String,
    /// Conference the team plays in ("AFC" / "NFC").
    pub conference: String,
    /// Division inside the conference ("East", "North", ...).
    pub division: String,
    /// Decided games won, maintained by the result lifecycle.
    pub wins: u32,
    /// Decided games lost, maintained by the result lifecycle.
    pub losses: u32,
    /// Decided games tied, maintained by the result lifecycle.
    pub ties: u32,
}

impl TeamEntity {
    /// Build a team with an empty record and a fresh identifier.
    pub fn new(
        name: impl Into<String>,
        alias: impl Into<String>,
        conference: impl Into<String>,
        division: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            alias: alias.into(),
            conference: conference.into(),
            division: division.into(),
            wins: 0,
            losses: 0,
            ties: 0,
        }
    }
}

/// Pool participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Stable identifier for the user.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UserEntity {
    /// Build a user without a real name.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            first_name: None,
            last_name: None,
        }
    }

    /// "First L." when both names are known, the username otherwise.
    pub fn display_name(&self) -> String {
        match (non_blank(&self.first_name), non_blank(&self.last_name)) {
            (Some(first), Some(last)) => {
                let initial = last.chars().next().map(String::from).unwrap_or_default();
                format!("{first} {initial}.")
            }
            _ => self.username.clone(),
        }
    }

    /// First name when known, the username otherwise.
    pub fn short_name(&self) -> String {
        non_blank(&self.first_name)
            .map(str::to_owned)
            .unwrap_or_else(|| self.username.clone())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Scheduled NFL game and its (optional) result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game.
    pub id: Uuid,
    /// Season week the game belongs to.
    pub week: u16,
    pub home_team: Uuid,
    pub away_team: Uuid,
    /// Kickoff instant; picks lock once it is reached.
    #[serde(with = "time::serde::rfc3339")]
    pub game_time: OffsetDateTime,
    /// Winning team, when the game is decided with a winner.
    pub winner: Option<Uuid>,
    /// Whether the game ended tied. Never set together with `winner`.
    pub is_tie: bool,
    /// Base value of a correct pick on this game.
    pub points: i32,
}

impl GameEntity {
    /// Build a scheduled game worth the default single point.
    pub fn new(week: u16, home_team: Uuid, away_team: Uuid, game_time: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            week,
            home_team,
            away_team,
            game_time,
            winner: None,
            is_tie: false,
            points: 1,
        }
    }

    /// Whether `team_id` is one of the two participants.
    pub fn involves(&self, team_id: Uuid) -> bool {
        self.home_team == team_id || self.away_team == team_id
    }

    /// Whether kickoff has been reached at `now`.
    pub fn has_started(&self, now: OffsetDateTime) -> bool {
        self.game_time <= now
    }
}

/// A user's selection of one team to win a specific game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickEntity {
    /// Primary key of the pick.
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    /// Team the user expects to win; always one of the game's teams.
    pub picked_team: Uuid,
    /// Base points stored by the last scoring pass.
    pub points_earned: i32,
    /// Uniqueness bonus stored by the last scoring pass.
    pub bonus_points: i32,
    /// `None` while the game is pending.
    pub is_correct: Option<bool>,
}

impl PickEntity {
    /// Build an unscored pick.
    pub fn new(user_id: Uuid, game_id: Uuid, picked_team: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            game_id,
            picked_team,
            points_earned: 0,
            bonus_points: 0,
            is_correct: None,
        }
    }

    /// Stored value of the pick (base plus uniqueness bonus).
    pub fn total_points(&self) -> i32 {
        self.points_earned + self.bonus_points
    }
}

/// Rows touched by a single result update, committed by the store as one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultChangeSet {
    /// Game row carrying the new result.
    pub game: GameEntity,
    /// Teams whose counters changed; empty when the result did not change.
    pub teams: Vec<TeamEntity>,
    /// Picks whose stored score differs from the recomputed one.
    pub picks: Vec<PickEntity>,
}

impl ResultChangeSet {
    /// Whether committing the change set would only rewrite the game row.
    pub fn is_noop(&self) -> bool {
        self.teams.is_empty() && self.picks.is_empty()
    }
}
