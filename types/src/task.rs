use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rewards::Rewards;

/// How a completed task re-arms itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    /// One-shot: stays completed until edited or deleted.
    None,
    Daily,
    Weekly,
}

/// A habit the player can complete for rewards.
///
/// Completion state, cooldown and timer bookkeeping all live on the record
/// itself; the rules that interpret them (and the explicit `now` they run
/// against) are in `grimoire-core::timegate` and `::progression`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Nominal effort, shown on the task card.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub rewards: Rewards,
    pub icon: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
    #[serde(rename = "recurrenceType", default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_timer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_duration_minutes: Option<u32>,
    #[serde(rename = "timerStartTime", default, skip_serializing_if = "Option::is_none")]
    pub timer_started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_active: Option<bool>,
}

impl Task {
    /// Whether the timer feature is enabled and configured on this task.
    pub fn timer_capable(&self) -> bool {
        self.has_timer == Some(true) && self.timer_duration_minutes.is_some()
    }

    /// Whether a timer is currently running.
    pub fn timer_running(&self) -> bool {
        self.timer_active == Some(true) && self.timer_started_at.is_some()
    }

    /// Recurrence with the absent case collapsed to [`RecurrenceKind::None`].
    pub fn recurrence_kind(&self) -> RecurrenceKind {
        self.recurrence.unwrap_or(RecurrenceKind::None)
    }
}
