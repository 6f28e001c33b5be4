use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::summary::PickSnapshot;

/// One entry of a pick form: the team expected to win a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PickSelection {
    pub game_id: Uuid,
    pub team_id: Uuid,
}

/// Outcome of a pick submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickSubmissionResponse {
    /// Picks stored by this submission, scored.
    pub saved: Vec<PickSnapshot>,
    /// Games skipped because they had already kicked off.
    pub locked: Vec<Uuid>,
}
