use serde::Serialize;
use uuid::Uuid;

use crate::{
    dto::summary::{CumulativeStandingsResponse, WeeklySummaryResponse},
    services::{
        pick_window::WeekInfo,
        team_records::{DivisionTable, RecordDrift, TeamRecord},
    },
};

/// Correctness of a pick as shown in audits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickStatus {
    Correct,
    Incorrect,
    Pending,
}

impl From<Option<bool>> for PickStatus {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => PickStatus::Correct,
            Some(false) => PickStatus::Incorrect,
            None => PickStatus::Pending,
        }
    }
}

/// One audited pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub week: u16,
    /// "AWY @ HOM".
    pub game: String,
    /// Winner alias, `TIE` or `TBD`.
    pub winner: String,
    pub points: i32,
    pub user: String,
    pub picked_team: String,
    pub status: PickStatus,
    pub stored_points: i32,
    pub expected_points: i32,
    /// Stored score differs from a fresh scoring pass.
    pub drift: bool,
}

/// Team whose stored record disagrees with the decided games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamDriftEntry {
    pub team_id: Uuid,
    pub team: String,
    pub stored: String,
    pub expected: String,
}

impl From<&RecordDrift> for TeamDriftEntry {
    fn from(drift: &RecordDrift) -> Self {
        Self {
            team_id: drift.team_id,
            team: drift.alias.clone(),
            stored: drift.stored.to_string(),
            expected: drift.expected.to_string(),
        }
    }
}

/// Read-only audit of every pick and team record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Most recent week first, games by kickoff.
    pub entries: Vec<AuditEntry>,
    pub team_drifts: Vec<TeamDriftEntry>,
}

impl AuditReport {
    /// Number of picks whose stored score drifted.
    pub fn pick_drifts(&self) -> usize {
        self.entries.iter().filter(|entry| entry.drift).count()
    }
}

/// Team line of a division table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStandingRow {
    pub alias: String,
    pub name: String,
    /// "W-L-T".
    pub record: String,
    pub win_pct: f64,
}

/// Division table with its teams, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionStandingsResponse {
    pub division: String,
    pub teams: Vec<TeamStandingRow>,
}

impl From<&DivisionTable> for DivisionStandingsResponse {
    fn from(table: &DivisionTable) -> Self {
        Self {
            division: table.name.clone(),
            teams: table
                .teams
                .iter()
                .map(|team| {
                    let record = TeamRecord::of(team);
                    TeamStandingRow {
                        alias: team.alias.clone(),
                        name: team.name.clone(),
                        record: record.to_string(),
                        win_pct: record.win_pct(),
                    }
                })
                .collect(),
        }
    }
}

/// Everything the batch binary prints.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonReport {
    /// RFC 3339 instant the report was computed for.
    pub generated_at: String,
    pub week_info: WeekInfo,
    /// Picks whose stored score was corrected before reporting.
    pub rescored_picks: usize,
    pub weekly_summaries: Vec<WeeklySummaryResponse>,
    pub standings: CumulativeStandingsResponse,
    pub divisions: Vec<DivisionStandingsResponse>,
    pub audit: AuditReport,
}
