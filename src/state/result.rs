//! Game result lifecycle: outcomes, allowed transitions and team record deltas.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::{GameEntity, TeamEntity};

/// Result lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "winner", rename_all = "snake_case")]
pub enum GameOutcome {
    /// Not played yet, or result cleared.
    Scheduled,
    /// Decided with a winning team.
    Winner(Uuid),
    /// Decided as a tie.
    Tie,
}

impl GameOutcome {
    /// Read the outcome stored on a game row.
    pub fn of(game: &GameEntity) -> Result<Self, ResultError> {
        match (game.winner, game.is_tie) {
            (Some(_), true) => Err(ResultError::InconsistentGame { game_id: game.id }),
            (Some(winner), false) => Ok(GameOutcome::Winner(winner)),
            (None, true) => Ok(GameOutcome::Tie),
            (None, false) => Ok(GameOutcome::Scheduled),
        }
    }

    /// Whether the game has a final result.
    pub fn is_decided(&self) -> bool {
        !matches!(self, GameOutcome::Scheduled)
    }

    /// Write the outcome onto a game row.
    pub fn write_to(&self, game: &mut GameEntity) {
        match self {
            GameOutcome::Scheduled => {
                game.winner = None;
                game.is_tie = false;
            }
            GameOutcome::Winner(team_id) => {
                game.winner = Some(*team_id);
                game.is_tie = false;
            }
            GameOutcome::Tie => {
                game.winner = None;
                game.is_tie = true;
            }
        }
    }
}

/// Errors raised while planning or applying a result change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultError {
    /// The requested change is not an allowed lifecycle transition.
    #[error("invalid result transition for game `{game_id}`: {from:?} -> {to:?}")]
    InvalidTransition {
        game_id: Uuid,
        from: GameOutcome,
        to: GameOutcome,
    },
    /// The declared winner did not play in the game.
    #[error("team `{team_id}` did not play in game `{game_id}`")]
    WinnerNotInGame { game_id: Uuid, team_id: Uuid },
    /// Stored row has both a winner and the tie flag.
    #[error("game `{game_id}` is marked both tied and won")]
    InconsistentGame { game_id: Uuid },
    /// A team participating in the game is missing from the supplied rows.
    #[error("team `{team_id}` is missing")]
    MissingTeam { team_id: Uuid },
    /// Reversing a result would push a counter below zero; needs manual reconciliation.
    #[error("record of team `{team_id}` drifted: {counter} cannot be adjusted by {delta}")]
    RecordDrift {
        team_id: Uuid,
        counter: &'static str,
        delta: i32,
    },
}

/// Signed adjustment of one team's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordDelta {
    pub team_id: Uuid,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
}

impl RecordDelta {
    fn zero(team_id: Uuid) -> Self {
        Self {
            team_id,
            ..Self::default()
        }
    }

    fn is_zero(&self) -> bool {
        self.wins == 0 && self.losses == 0 && self.ties == 0
    }

    /// Apply the delta to a team with checked arithmetic.
    pub fn apply(&self, team: &mut TeamEntity) -> Result<(), ResultError> {
        let team_id = team.id;
        let adjust = move |value: u32, delta: i32, counter: &'static str| {
            value
                .checked_add_signed(delta)
                .ok_or(ResultError::RecordDrift {
                    team_id,
                    counter,
                    delta,
                })
        };
        let wins = adjust(team.wins, self.wins, "wins")?;
        let losses = adjust(team.losses, self.losses, "losses")?;
        let ties = adjust(team.ties, self.ties, "ties")?;
        team.wins = wins;
        team.losses = losses;
        team.ties = ties;
        Ok(())
    }
}

/// Validated move of a game from its stored outcome to a requested one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTransition {
    pub game_id: Uuid,
    pub home_team: Uuid,
    pub away_team: Uuid,
    pub from: GameOutcome,
    pub to: GameOutcome,
}

impl ResultTransition {
    /// Validate that `to` can be reached from the game's stored outcome.
    ///
    /// Re-applying the current outcome is accepted and yields a transition whose
    /// [`changes_result`](Self::changes_result) is false.
    pub fn plan(game: &GameEntity, to: GameOutcome) -> Result<Self, ResultError> {
        if let GameOutcome::Winner(team_id) = to {
            if !game.involves(team_id) {
                return Err(ResultError::WinnerNotInGame {
                    game_id: game.id,
                    team_id,
                });
            }
        }

        let from = GameOutcome::of(game)?;
        let allowed = from == to
            || matches!(
                (from, to),
                (GameOutcome::Scheduled, _) | (_, GameOutcome::Scheduled)
            );
        if !allowed {
            return Err(ResultError::InvalidTransition {
                game_id: game.id,
                from,
                to,
            });
        }

        Ok(Self {
            game_id: game.id,
            home_team: game.home_team,
            away_team: game.away_team,
            from,
            to,
        })
    }

    /// Whether the stored outcome actually changes.
    pub fn changes_result(&self) -> bool {
        self.from != self.to
    }

    /// Counter adjustments: undo the previous outcome, then apply the new one.
    ///
    /// Empty when the outcome does not change.
    pub fn record_deltas(&self) -> Vec<RecordDelta> {
        if !self.changes_result() {
            return Vec::new();
        }

        let mut home = RecordDelta::zero(self.home_team);
        let mut away = RecordDelta::zero(self.away_team);
        self.accumulate(self.from, -1, &mut home, &mut away);
        self.accumulate(self.to, 1, &mut home, &mut away);

        [home, away]
            .into_iter()
            .filter(|delta| !delta.is_zero())
            .collect()
    }

    fn accumulate(
        &self,
        outcome: GameOutcome,
        sign: i32,
        home: &mut RecordDelta,
        away: &mut RecordDelta,
    ) {
        match outcome {
            GameOutcome::Scheduled => {}
            GameOutcome::Tie => {
                home.ties += sign;
                away.ties += sign;
            }
            GameOutcome::Winner(winner) if winner == self.home_team => {
                home.wins += sign;
                away.losses += sign;
            }
            GameOutcome::Winner(_) => {
                away.wins += sign;
                home.losses += sign;
            }
        }
    }

    /// Adjust copies of the participating teams, returning the updated rows.
    pub fn apply_to_teams(&self, teams: &[TeamEntity]) -> Result<Vec<TeamEntity>, ResultError> {
        self.record_deltas()
            .into_iter()
            .map(|delta| {
                let mut team = teams
                    .iter()
                    .find(|team| team.id == delta.team_id)
                    .cloned()
                    .ok_or(ResultError::MissingTeam {
                        team_id: delta.team_id,
                    })?;
                delta.apply(&mut team)?;
                Ok(team)
            })
            .collect()
    }
}
