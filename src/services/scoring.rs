//! Scoring engine: turns picks into base points, uniqueness bonuses and
//! perfect-week bonuses. Every call site (result updates, pick submission,
//! reports, audits) goes through these functions.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{GameEntity, PickEntity};

/// Points added to the only correct pick of a game.
pub const DEFAULT_UNIQUE_BONUS: i32 = 2;
/// Points added once to a user's weekly total for a clean week.
pub const DEFAULT_PERFECT_WEEK_BONUS: i32 = 3;

/// Bonus values in effect for the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    #[serde(default = "default_unique_bonus")]
    pub unique_bonus: i32,
    #[serde(default = "default_perfect_week_bonus")]
    pub perfect_week_bonus: i32,
}

fn default_unique_bonus() -> i32 {
    DEFAULT_UNIQUE_BONUS
}

fn default_perfect_week_bonus() -> i32 {
    DEFAULT_PERFECT_WEEK_BONUS
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            unique_bonus: DEFAULT_UNIQUE_BONUS,
            perfect_week_bonus: DEFAULT_PERFECT_WEEK_BONUS,
        }
    }
}

/// Derived score of a single pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickScore {
    pub points_earned: i32,
    pub bonus_points: i32,
    pub is_correct: Option<bool>,
}

impl PickScore {
    /// Base plus uniqueness bonus.
    pub fn total(&self) -> i32 {
        self.points_earned + self.bonus_points
    }

    /// Whether the stored fields of `pick` already hold this score.
    pub fn is_stored_on(&self, pick: &PickEntity) -> bool {
        pick.points_earned == self.points_earned
            && pick.bonus_points == self.bonus_points
            && pick.is_correct == self.is_correct
    }

    /// Copy the derived fields onto `pick`.
    pub fn write_to(&self, pick: &mut PickEntity) {
        pick.points_earned = self.points_earned;
        pick.bonus_points = self.bonus_points;
        pick.is_correct = self.is_correct;
    }
}

/// Base points and correctness of picking `picked_team` on `game`.
///
/// Pending games score 0 with unknown correctness; ties score 0 for everyone.
pub fn base_score(game: &GameEntity, picked_team: Uuid) -> PickScore {
    match game.winner {
        Some(winner) if winner == picked_team => PickScore {
            points_earned: game.points,
            bonus_points: 0,
            is_correct: Some(true),
        },
        Some(_) => PickScore {
            is_correct: Some(false),
            ..PickScore::default()
        },
        None if game.is_tie => PickScore {
            is_correct: Some(false),
            ..PickScore::default()
        },
        None => PickScore::default(),
    }
}

/// Score every pick of one game, awarding the uniqueness bonus to a lone correct pick.
///
/// Picks for other games are ignored.
pub fn score_game<'a>(
    rules: &ScoringRules,
    game: &GameEntity,
    picks: impl IntoIterator<Item = &'a PickEntity>,
) -> Vec<(Uuid, PickScore)> {
    let mut scored: Vec<(Uuid, PickScore)> = picks
        .into_iter()
        .filter(|pick| pick.game_id == game.id)
        .map(|pick| (pick.id, base_score(game, pick.picked_team)))
        .collect();

    let correct = scored
        .iter()
        .filter(|(_, score)| score.is_correct == Some(true))
        .count();
    if correct == 1 {
        if let Some((_, score)) = scored
            .iter_mut()
            .find(|(_, score)| score.is_correct == Some(true))
        {
            score.bonus_points = rules.unique_bonus;
        }
    }

    scored
}

/// Recompute every pick of `games` and return only those whose stored score changed,
/// already carrying the new values.
pub fn rescore_picks(
    rules: &ScoringRules,
    games: &[GameEntity],
    picks: &[PickEntity],
) -> Vec<PickEntity> {
    let by_id: HashMap<Uuid, &PickEntity> = picks.iter().map(|pick| (pick.id, pick)).collect();

    games
        .iter()
        .flat_map(|game| score_game(rules, game, picks))
        .filter_map(|(pick_id, score)| {
            let pick = by_id.get(&pick_id)?;
            if score.is_stored_on(pick) {
                None
            } else {
                let mut updated = (*pick).clone();
                score.write_to(&mut updated);
                Some(updated)
            }
        })
        .collect()
}

/// Weekly totals of one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserWeekScore {
    /// Sum of pick values (base plus uniqueness bonus).
    pub pick_points: i32,
    /// Number of correct picks.
    pub correct: usize,
    pub perfect_week: bool,
    /// Pick points plus the perfect-week bonus when earned.
    pub total: i32,
}

/// Scores of a whole week.
#[derive(Debug, Clone, Default)]
pub struct WeekScores {
    /// Score of every pick, keyed by pick id.
    pub picks: HashMap<Uuid, PickScore>,
    /// Totals of every user holding at least one pick, in first-seen order.
    pub users: IndexMap<Uuid, UserWeekScore>,
    pub games_count: usize,
    /// True when no game of the week is pending.
    pub all_decided: bool,
}

impl WeekScores {
    /// Weekly total of a user; users without picks score 0.
    pub fn total_for(&self, user_id: Uuid) -> i32 {
        self.users.get(&user_id).map(|u| u.total).unwrap_or(0)
    }

    /// Whether the user earned the perfect-week bonus.
    pub fn is_perfect(&self, user_id: Uuid) -> bool {
        self.users
            .get(&user_id)
            .map(|u| u.perfect_week)
            .unwrap_or(false)
    }
}

/// Score one week: per-pick values, per-user totals and perfect weeks.
pub fn score_week(rules: &ScoringRules, games: &[GameEntity], picks: &[PickEntity]) -> WeekScores {
    let scores: HashMap<Uuid, PickScore> = games
        .iter()
        .flat_map(|game| score_game(rules, game, picks))
        .collect();

    let mut users: IndexMap<Uuid, UserWeekScore> = IndexMap::new();
    for pick in picks {
        let Some(score) = scores.get(&pick.id) else {
            continue;
        };
        let entry = users.entry(pick.user_id).or_default();
        entry.pick_points += score.total();
        if score.is_correct == Some(true) {
            entry.correct += 1;
        }
    }

    let games_count = games.len();
    let all_decided = games.iter().all(|game| game.winner.is_some() || game.is_tie);
    for user in users.values_mut() {
        user.perfect_week = all_decided && games_count > 0 && user.correct == games_count;
        user.total = user.pick_points
            + if user.perfect_week {
                rules.perfect_week_bonus
            } else {
                0
            };
    }

    WeekScores {
        picks: scores,
        users,
        games_count,
        all_decided,
    }
}
