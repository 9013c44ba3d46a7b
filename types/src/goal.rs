use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rewards::Rewards;

/// What a goal measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalKind {
    /// Builtin milestone over the number of currently-completed tasks.
    TotalTasks,
    /// Player-defined, claimable at will.
    Custom,
}

/// A claimable milestone paying out [`Rewards`] once.
///
/// Builtin goals are defined in the catalog; a wizard's goal list stores
/// only their claim-state overrides (a copy with `claimed` set) alongside
/// full records of player-created custom goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    /// Required completed-task count; present on builtin milestones.
    #[serde(rename = "targetNumber", default, skip_serializing_if = "Option::is_none")]
    pub target_count: Option<u32>,
    pub rewards: Rewards,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
}

impl Goal {
    pub fn is_claimed(&self) -> bool {
        self.claimed == Some(true)
    }
}
