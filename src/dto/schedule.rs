use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dto::validation::validate_team_alias;

/// Season file consumed by the importer: teams, users and weekly games with
/// optional results and picks.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ScheduleFile {
    #[validate(nested)]
    pub teams: Vec<TeamInput>,
    #[validate(nested)]
    #[serde(default)]
    pub users: Vec<UserInput>,
    #[validate(nested)]
    pub weeks: Vec<WeekInput>,
}

/// Franchise definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeamInput {
    pub name: String,
    pub alias: String,
    pub conference: String,
    pub division: String,
}

impl Validate for TeamInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", ValidationError::new("team_name_empty"));
        }
        if let Err(e) = validate_team_alias(&self.alias) {
            errors.add("alias", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Pool participant.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UserInput {
    #[validate(length(min = 1))]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Games of one week.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct WeekInput {
    pub week: u16,
    #[validate(nested)]
    pub games: Vec<GameInput>,
}

fn default_points() -> i32 {
    1
}

/// One scheduled game, referencing teams by alias and users by username.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameInput {
    pub home: String,
    pub away: String,
    #[serde(with = "time::serde::rfc3339")]
    pub kickoff: OffsetDateTime,
    #[serde(default = "default_points")]
    pub points: i32,
    /// Alias of the winning team, when decided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tie: bool,
    /// Username -> alias of the picked team.
    #[serde(default)]
    pub picks: IndexMap<String, String>,
}

impl Validate for GameInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (field, alias) in [("home", &self.home), ("away", &self.away)] {
            if let Err(e) = validate_team_alias(alias) {
                errors.add(field, e);
            }
        }
        if self.home == self.away {
            errors.add("away", ValidationError::new("same_team_twice"));
        }
        if self.points < 1 {
            errors.add("points", ValidationError::new("points_not_positive"));
        }
        if let Some(winner) = &self.winner {
            if self.tie {
                errors.add("tie", ValidationError::new("tie_with_winner"));
            }
            if winner != &self.home && winner != &self.away {
                errors.add("winner", ValidationError::new("winner_not_in_game"));
            }
        }
        if self
            .picks
            .values()
            .any(|alias| alias != &self.home && alias != &self.away)
        {
            errors.add("picks", ValidationError::new("pick_not_in_game"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Rows created by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub teams: usize,
    pub users: usize,
    pub games: usize,
    pub picks: usize,
    /// Games whose recorded result was applied.
    pub results: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "teams": [
            { "name": "Kansas City Chiefs", "alias": "KC", "conference": "AFC", "division": "West" },
            { "name": "Baltimore Ravens", "alias": "BAL", "conference": "AFC", "division": "North" }
        ],
        "users": [ { "username": "ann", "first_name": "Ann", "last_name": "Lee" } ],
        "weeks": [
            { "week": 1, "games": [
                { "home": "KC", "away": "BAL", "kickoff": "2025-09-05T00:20:00Z",
                  "winner": "KC", "picks": { "ann": "KC" } }
            ] }
        ]
    }"#;

    #[test]
    fn sample_file_parses_and_validates() {
        let file: ScheduleFile = serde_json::from_str(SAMPLE).unwrap();
        assert!(file.validate().is_ok());
        let game = &file.weeks[0].games[0];
        assert_eq!(game.points, 1);
        assert!(!game.tie);
        assert_eq!(game.picks.get("ann").map(String::as_str), Some("KC"));
    }

    #[test]
    fn nested_errors_are_reported() {
        let mut file: ScheduleFile = serde_json::from_str(SAMPLE).unwrap();
        file.teams[0].alias = "kc".into();
        assert!(file.validate().is_err());
        assert!(
            file.teams[0]
                .validate()
                .unwrap_err()
                .field_errors()
                .contains_key("alias")
        );

        let mut game = file.weeks[0].games[0].clone();
        game.tie = true;
        game.points = 0;
        let errors = game.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("tie"));
        assert!(fields.contains_key("points"));
        assert!(!fields.contains_key("winner"));
    }

    #[test]
    fn pick_on_a_team_outside_the_game_is_rejected() {
        let mut file: ScheduleFile = serde_json::from_str(SAMPLE).unwrap();
        file.weeks[0].games[0]
            .picks
            .insert("ann".into(), "DEN".into());
        assert!(file.validate().is_err());
    }
}
