//! Season import: loads teams, users, games and picks from a [`ScheduleFile`] and
//! applies recorded results through the result lifecycle.

use indexmap::IndexMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{GameEntity, PickEntity, TeamEntity, UserEntity},
    dto::schedule::{ImportSummary, ScheduleFile},
    error::ServiceError,
    services::result_service::recompute_game_result,
    state::{SharedState, result::GameOutcome},
};

/// Rows resolved from a schedule file, ready to be stored.
struct ImportPlan {
    teams: Vec<TeamEntity>,
    users: Vec<UserEntity>,
    games: Vec<GameEntity>,
    picks: Vec<PickEntity>,
    results: Vec<(Uuid, GameOutcome)>,
}

fn resolve<'a, T>(
    index: &'a IndexMap<String, T>,
    key: &str,
    what: &str,
) -> Result<&'a T, ServiceError> {
    index
        .get(key)
        .ok_or_else(|| ServiceError::InvalidInput(format!("unknown {what} `{key}`")))
}

fn plan_import(file: ScheduleFile) -> Result<ImportPlan, ServiceError> {
    let mut teams: IndexMap<String, TeamEntity> = IndexMap::new();
    for input in file.teams {
        let team = TeamEntity::new(input.name, input.alias, input.conference, input.division);
        if let Some(previous) = teams.insert(team.alias.clone(), team) {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate team alias `{}`",
                previous.alias
            )));
        }
    }

    let mut users: IndexMap<String, UserEntity> = IndexMap::new();
    for input in file.users {
        let mut user = UserEntity::new(input.username);
        user.first_name = input.first_name;
        user.last_name = input.last_name;
        if let Some(previous) = users.insert(user.username.clone(), user) {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate username `{}`",
                previous.username
            )));
        }
    }

    let mut games = Vec::new();
    let mut picks = Vec::new();
    let mut results = Vec::new();
    for week in file.weeks {
        for input in week.games {
            let home = resolve(&teams, &input.home, "team")?;
            let away = resolve(&teams, &input.away, "team")?;
            let mut game = GameEntity::new(week.week, home.id, away.id, input.kickoff);
            game.points = input.points;

            for (username, alias) in &input.picks {
                let user = resolve(&users, username, "user")?;
                let team = resolve(&teams, alias, "team")?;
                picks.push(PickEntity::new(user.id, game.id, team.id));
            }

            let outcome = match (&input.winner, input.tie) {
                (Some(alias), _) => Some(GameOutcome::Winner(resolve(&teams, alias, "team")?.id)),
                (None, true) => Some(GameOutcome::Tie),
                (None, false) => None,
            };
            if let Some(outcome) = outcome {
                results.push((game.id, outcome));
            }
            games.push(game);
        }
    }

    Ok(ImportPlan {
        teams: teams.into_values().collect(),
        users: users.into_values().collect(),
        games,
        picks,
        results,
    })
}

/// Validate and store a schedule file.
///
/// Nothing is written unless every alias and username resolves. Games are stored
/// as scheduled; recorded results are then applied one by one so team records and
/// pick scores come from the result lifecycle.
pub async fn import_schedule(
    state: &SharedState,
    file: ScheduleFile,
) -> Result<ImportSummary, ServiceError> {
    file.validate()?;
    let plan = plan_import(file)?;
    let store = state.store();

    let mut summary = ImportSummary {
        teams: plan.teams.len(),
        users: plan.users.len(),
        games: plan.games.len(),
        picks: plan.picks.len(),
        results: 0,
    };

    for team in plan.teams {
        store.save_team(team).await?;
    }
    for user in plan.users {
        store.save_user(user).await?;
    }
    for game in plan.games {
        store.save_game(game).await?;
    }
    for pick in plan.picks {
        store.upsert_pick(pick).await?;
    }
    for (game_id, outcome) in plan.results {
        recompute_game_result(state, game_id, outcome).await?;
        summary.results += 1;
    }

    info!(
        teams = summary.teams,
        users = summary.users,
        games = summary.games,
        picks = summary.picks,
        results = summary.results,
        "schedule imported"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, state::AppState};

    const SEASON: &str = r#"{
        "teams": [
            { "name": "Philadelphia Eagles", "alias": "PHI", "conference": "NFC", "division": "East" },
            { "name": "Dallas Cowboys", "alias": "DAL", "conference": "NFC", "division": "East" }
        ],
        "users": [
            { "username": "ann" },
            { "username": "bob", "first_name": "Bob", "last_name": "Ross" }
        ],
        "weeks": [
            { "week": 1, "games": [
                { "home": "PHI", "away": "DAL", "kickoff": "2025-09-05T00:20:00Z",
                  "winner": "PHI", "picks": { "ann": "PHI", "bob": "DAL" } }
            ] },
            { "week": 2, "games": [
                { "home": "DAL", "away": "PHI", "kickoff": "2025-09-14T20:25:00Z", "points": 2,
                  "tie": true, "picks": { "ann": "DAL" } },
                { "home": "PHI", "away": "DAL", "kickoff": "2025-09-16T00:15:00Z" }
            ] }
        ]
    }"#;

    fn season() -> ScheduleFile {
        serde_json::from_str(SEASON).unwrap()
    }

    #[tokio::test]
    async fn import_applies_results_through_the_lifecycle() {
        let state = AppState::in_memory(AppConfig::default());
        let summary = import_schedule(&state, season()).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                teams: 2,
                users: 2,
                games: 3,
                picks: 3,
                results: 2
            }
        );

        let store = state.store();
        let teams = store.list_teams().await.unwrap();
        let phi = teams.iter().find(|t| t.alias == "PHI").unwrap();
        let dal = teams.iter().find(|t| t.alias == "DAL").unwrap();
        assert_eq!((phi.wins, phi.losses, phi.ties), (1, 0, 1));
        assert_eq!((dal.wins, dal.losses, dal.ties), (0, 1, 1));

        let week1 = store.list_week_games(1).await.unwrap();
        let picks = store
            .list_picks_for_games(vec![week1[0].id])
            .await
            .unwrap();
        assert_eq!(picks.iter().map(|p| p.total_points()).sum::<i32>(), 3);

        let users = store.list_users().await.unwrap();
        assert_eq!(users[1].display_name(), "Bob R.");
    }

    #[tokio::test]
    async fn unknown_user_rejects_the_file_without_writing() {
        let state = AppState::in_memory(AppConfig::default());
        let mut file = season();
        file.weeks[0].games[0]
            .picks
            .insert("zed".into(), "PHI".into());

        let err = import_schedule(&state, file).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(state.store().list_teams().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_file_is_rejected_by_validation() {
        let state = AppState::in_memory(AppConfig::default());
        let mut file = season();
        file.weeks[1].games[0].points = 0;
        let err = import_schedule(&state, file).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn duplicate_aliases_are_rejected() {
        let state = AppState::in_memory(AppConfig::default());
        let mut file = season();
        file.teams[1].alias = "PHI".into();
        assert!(import_schedule(&state, file).await.is_err());
    }
}
