//! Full season report assembled for the batch binary.

use time::OffsetDateTime;

use crate::{
    dto::{
        format_instant,
        report::{DivisionStandingsResponse, SeasonReport},
    },
    error::ServiceError,
    services::{
        audit_service::{audit_picks, rescore_all},
        summary_service::{cumulative_standings, current_week_info, visible_weekly_summaries},
        team_records::division_standings,
    },
    state::SharedState,
};

/// Correct stale pick scores, then report standings, division tables and the audit
/// as seen at `now`.
pub async fn season_report(
    state: &SharedState,
    now: OffsetDateTime,
) -> Result<SeasonReport, ServiceError> {
    let rescored_picks = rescore_all(state).await?;
    let teams = state.store().list_teams().await?;

    Ok(SeasonReport {
        generated_at: format_instant(now),
        week_info: current_week_info(state, now).await?,
        rescored_picks,
        weekly_summaries: visible_weekly_summaries(state, now).await?,
        standings: cumulative_standings(state).await?,
        divisions: division_standings(&teams)
            .iter()
            .map(DivisionStandingsResponse::from)
            .collect(),
        audit: audit_picks(state).await?,
    })
}
