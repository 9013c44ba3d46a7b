//! Mutable session state and the operations that act on it.
//!
//! [`GameSession`] owns the active wizard, the task list, and the store
//! they persist to. Only the service loop touches it, so every operation
//! runs against settled state. Persistence is fire-and-forget: a failed
//! write is logged and the in-memory state stays authoritative.

use chrono::{DateTime, Utc};
use grimoire_types::{Goal, GoalKind, RecurrenceKind, Rewards, Task, Wizard};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog;
use crate::progression;
use crate::store::ProfileStore;
use crate::timegate;

use super::Snapshot;

/// Fields for a player-created task. Omitted options fall back to the
/// defaults of a daily habit with a 24h cooldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaskRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub duration_minutes: u32,
    pub rewards: Rewards,
    pub icon: Option<String>,
    pub cooldown_hours: Option<u32>,
    pub recurrence: Option<RecurrenceKind>,
    #[serde(default)]
    pub has_timer: bool,
    pub timer_duration_minutes: Option<u32>,
}

/// Partial update of a task's definition. `None` fields stay untouched.
/// Completion and timer state are owned by their own operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<u32>,
    pub rewards: Option<Rewards>,
    pub icon: Option<String>,
    pub cooldown_hours: Option<u32>,
    pub recurrence: Option<RecurrenceKind>,
    pub has_timer: Option<bool>,
    pub timer_duration_minutes: Option<u32>,
}

/// Fields for a player-created goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoalRequest {
    pub name: String,
    pub description: Option<String>,
    pub rewards: Rewards,
}

/// The mutable heart of a running game: active wizard, task list, and the
/// store they persist to.
pub struct GameSession {
    store: ProfileStore,
    wizard: Option<Wizard>,
    tasks: Vec<Task>,
    id_seq: u64,
}

impl GameSession {
    /// Resolve the store's active profile into a live session.
    pub fn new(store: ProfileStore, now: DateTime<Utc>) -> Self {
        let (wizard, tasks) = store.load_active(now);
        Self {
            store,
            wizard,
            tasks,
            id_seq: 0,
        }
    }

    /// Immutable view of the current state.
    pub fn snapshot(&self) -> Snapshot {
        let goals = match &self.wizard {
            Some(wizard) => progression::merged_goals(wizard, &catalog::builtin_goals()),
            None => Vec::new(),
        };
        Snapshot {
            wizard: self.wizard.clone(),
            tasks: self.tasks.clone(),
            goals,
            completed_count: progression::completed_task_count(&self.tasks),
            profiles: self.store.profile_names(),
        }
    }

    // ─── Profiles ───

    /// Start a fresh wizard with the seeded task list and make it the
    /// active profile. An existing profile with the same name is replaced.
    pub fn create_profile(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            // An empty name would collide with the store's "no active
            // profile" sentinel.
            return;
        }
        info!(profile = %name, "creating profile");
        self.wizard = Some(Wizard::new(name));
        self.tasks = catalog::seed_tasks();
        self.persist();
    }

    /// Adopt another stored profile. Unknown names leave the session as is.
    pub fn switch_profile(&mut self, name: &str, now: DateTime<Utc>) {
        let (wizard, tasks) = self.store.switch_profile(name, now);
        let Some(wizard) = wizard else {
            debug!(profile = %name, "ignoring switch to unknown profile");
            return;
        };
        info!(profile = %wizard.name, "switched profile");
        self.wizard = Some(wizard);
        self.tasks = tasks;
    }

    /// Delete a stored profile, then adopt whatever the store now points
    /// at (possibly nothing).
    pub fn clear_profile(&mut self, name: &str, now: DateTime<Utc>) {
        if let Err(e) = self.store.clear_profile(name) {
            warn!(error = %e, "failed to clear profile");
        }
        let (wizard, tasks) = self.store.load_active(now);
        self.wizard = wizard;
        self.tasks = tasks;
    }

    // ─── Tasks ───

    pub fn complete_task(&mut self, task_id: &str, now: DateTime<Utc>) {
        let Some(wizard) = &mut self.wizard else {
            return;
        };
        if progression::complete_task(wizard, &mut self.tasks, task_id, catalog::spell_catalog(), now)
        {
            self.persist();
        }
    }

    pub fn add_task(&mut self, request: NewTaskRequest, now: DateTime<Utc>) {
        let task = Task {
            id: self.next_id("custom", now),
            name: request.name,
            description: request.description,
            duration_minutes: request.duration_minutes,
            rewards: request.rewards,
            icon: request.icon.unwrap_or_else(|| "📝".to_string()),
            completed: false,
            last_completed: None,
            cooldown_hours: Some(request.cooldown_hours.unwrap_or(24)),
            is_custom: Some(true),
            recurrence: Some(request.recurrence.unwrap_or(RecurrenceKind::Daily)),
            created_at: Some(now),
            has_timer: request.has_timer.then_some(true),
            timer_duration_minutes: request.timer_duration_minutes,
            timer_started_at: None,
            timer_active: None,
        };
        debug!(task = %task.id, "task added");
        self.tasks.push(task);
        self.persist();
    }

    pub fn edit_task(&mut self, task_id: &str, patch: TaskPatch) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return;
        };
        if let Some(name) = patch.name {
            task.name = name;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(duration) = patch.duration_minutes {
            task.duration_minutes = duration;
        }
        if let Some(rewards) = patch.rewards {
            task.rewards = rewards;
        }
        if let Some(icon) = patch.icon {
            task.icon = icon;
        }
        if let Some(cooldown) = patch.cooldown_hours {
            task.cooldown_hours = Some(cooldown);
        }
        if let Some(recurrence) = patch.recurrence {
            task.recurrence = Some(recurrence);
        }
        if let Some(has_timer) = patch.has_timer {
            task.has_timer = Some(has_timer);
        }
        if let Some(minutes) = patch.timer_duration_minutes {
            task.timer_duration_minutes = Some(minutes);
        }
        debug!(task = %task_id, "task edited");
        self.persist();
    }

    pub fn delete_task(&mut self, task_id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        if self.tasks.len() < before {
            debug!(task = %task_id, "task deleted");
            self.persist();
        }
    }

    // ─── Goals ───

    pub fn add_goal(&mut self, request: NewGoalRequest, now: DateTime<Utc>) {
        let id = self.next_id("goal", now);
        let Some(wizard) = &mut self.wizard else {
            return;
        };
        wizard.goals.push(Goal {
            id,
            name: request.name,
            description: request.description,
            kind: GoalKind::Custom,
            target_count: None,
            rewards: request.rewards,
            created_at: Some(now),
            claimed: Some(false),
            is_custom: Some(true),
        });
        self.persist();
    }

    pub fn claim_goal(&mut self, goal_id: &str) {
        let Some(wizard) = &mut self.wizard else {
            return;
        };
        if progression::claim_goal(wizard, &self.tasks, goal_id, &catalog::builtin_goals()) {
            self.persist();
        }
    }

    /// Remove a player-created goal. Builtin ids are left alone: their
    /// stored records are claim overrides, and removing one would un-claim
    /// the milestone.
    pub fn delete_goal(&mut self, goal_id: &str) {
        let Some(wizard) = &mut self.wizard else {
            return;
        };
        let before = wizard.goals.len();
        wizard
            .goals
            .retain(|g| g.kind != GoalKind::Custom || g.id != goal_id);
        if wizard.goals.len() < before {
            debug!(goal = %goal_id, "goal deleted");
            self.persist();
        }
    }

    // ─── Timers ───

    pub fn start_timer(&mut self, task_id: &str, now: DateTime<Utc>) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return;
        };
        if !task.timer_capable() || task.timer_running() {
            return;
        }
        task.timer_active = Some(true);
        task.timer_started_at = Some(now);
        debug!(task = %task_id, "timer started");
        self.persist();
    }

    pub fn stop_timer(&mut self, task_id: &str) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return;
        };
        if !task.timer_running() {
            return;
        }
        task.timer_active = Some(false);
        task.timer_started_at = None;
        debug!(task = %task_id, "timer stopped");
        self.persist();
    }

    /// Complete every task whose running timer has elapsed, then disarm
    /// those timers. Runs on each sweep tick.
    pub fn sweep_timers(&mut self, now: DateTime<Utc>) {
        let due: Vec<String> = self
            .tasks
            .iter()
            .filter(|t| timegate::is_timer_complete(t, now))
            .map(|t| t.id.clone())
            .collect();
        if due.is_empty() {
            return;
        }

        for task_id in &due {
            if let Some(wizard) = &mut self.wizard
                && progression::complete_task(
                    wizard,
                    &mut self.tasks,
                    task_id,
                    catalog::spell_catalog(),
                    now,
                )
            {
                info!(task = %task_id, "timer elapsed; task completed");
            }
            // Disarm even when completion no-ops (cooldown, already
            // completed), so an expired timer cannot re-fire every tick.
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == *task_id) {
                task.timer_active = Some(false);
                task.timer_started_at = None;
            }
        }
        self.persist();
    }

    fn next_id(&mut self, prefix: &str, now: DateTime<Utc>) -> String {
        let id = format!("{prefix}-{}-{}", now.timestamp_millis(), self.id_seq);
        self.id_seq += 1;
        id
    }

    fn persist(&self) {
        let Some(wizard) = &self.wizard else {
            return;
        };
        if let Err(e) = self.store.save_active(wizard, &self.tasks) {
            warn!(error = %e, "failed to persist profile; keeping in-memory state");
        }
    }
}
