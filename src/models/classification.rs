//! Classification (standings) rows.

use crate::models::competition::CompetitionId;
use crate::models::team::{TeamId, TeamStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ranked row of the standings table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub team_id: TeamId,
    pub team_name: String,
    pub institution: String,
    #[serde(flatten)]
    pub stats: TeamStats,
    /// 1-based rank.
    pub position: u32,
}

/// Stored standings of one competition, replaced wholesale on every recompute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub competition_id: CompetitionId,
    pub rows: Vec<Standing>,
    pub updated_at: DateTime<Utc>,
}
