//! Progression rules: rewards, leveling, spell unlocks, goals, recurrence.
//!
//! Everything here is a pure rule over explicit state; clocks and
//! persistence live with the session loop, which threads a single `now`
//! through each operation. Mutating functions report whether (or how much)
//! anything changed so the caller can decide to persist.

use chrono::{DateTime, Utc};
use grimoire_types::{Goal, Rewards, Spell, Task, Wizard};
use tracing::debug;

use crate::timegate;

#[cfg(test)]
mod progression_tests;

/// Resource ceiling gained by both pools on each level-up.
const LEVEL_RESOURCE_BONUS: u32 = 2;

// ═══════════════════════════════════════════════════════════════════════════
// Rewards & Leveling
// ═══════════════════════════════════════════════════════════════════════════

/// Apply a reward payout to the wizard, then run leveling.
///
/// Resource amounts permanently raise the pool's ceiling and then refill
/// toward it, in that order, so the refill can use the new headroom. An
/// absent or zero amount leaves the pool alone.
pub fn apply_rewards(wizard: &mut Wizard, rewards: &Rewards) {
    wizard.experience += rewards.experience;

    if let Some(mana) = rewards.mana.filter(|&amount| amount > 0) {
        wizard.max_mana += mana;
        wizard.mana = (wizard.mana + mana).min(wizard.max_mana);
    }
    if let Some(mind) = rewards.mind.filter(|&amount| amount > 0) {
        wizard.max_mind += mind;
        wizard.mind = (wizard.mind + mind).min(wizard.max_mind);
    }

    apply_leveling(wizard);
}

/// Consume banked experience, possibly across several levels at once.
///
/// Each level-up subtracts the old threshold, multiplies the next one by
/// 1.5 (integer floor), grows both resource ceilings by 2 and refills both
/// pools to full.
pub fn apply_leveling(wizard: &mut Wizard) {
    // A zero threshold would spin forever; treat it as no further leveling.
    while wizard.experience_to_next > 0 && wizard.experience >= wizard.experience_to_next {
        wizard.experience -= wizard.experience_to_next;
        wizard.level += 1;
        wizard.experience_to_next = wizard.experience_to_next * 3 / 2;
        wizard.max_mana += LEVEL_RESOURCE_BONUS;
        wizard.max_mind += LEVEL_RESOURCE_BONUS;
        wizard.mana = wizard.max_mana;
        wizard.mind = wizard.max_mind;
        debug!(
            level = wizard.level,
            to_next = wizard.experience_to_next,
            "level up"
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Task Completion
// ═══════════════════════════════════════════════════════════════════════════

/// Count of tasks currently marked completed.
pub fn completed_task_count(tasks: &[Task]) -> u32 {
    tasks.iter().filter(|t| t.completed).count() as u32
}

/// Complete a task by id at `now`.
///
/// Returns false and leaves all state untouched when the id is unknown,
/// the task is already completed, or its cooldown is still running. On
/// success the task is stamped, rewards and leveling apply, and any newly
/// met spell unlocks are granted.
pub fn complete_task(
    wizard: &mut Wizard,
    tasks: &mut [Task],
    task_id: &str,
    spells: &[Spell],
    now: DateTime<Utc>,
) -> bool {
    let Some(idx) = tasks.iter().position(|t| t.id == task_id) else {
        return false;
    };
    if tasks[idx].completed || timegate::is_on_cooldown(&tasks[idx], now) {
        return false;
    }

    tasks[idx].completed = true;
    tasks[idx].last_completed = Some(now);

    let rewards = tasks[idx].rewards.clone();
    apply_rewards(wizard, &rewards);
    evaluate_spell_unlocks(wizard, tasks, task_id, spells);
    true
}

// ═══════════════════════════════════════════════════════════════════════════
// Spell Unlocks
// ═══════════════════════════════════════════════════════════════════════════

/// Unlock every spell whose requirement the wizard now meets.
///
/// Criteria are alternatives: reaching the level, reaching the completed
/// count, or having just completed the requirement's special task. The
/// count is the *current* completed count (recurrence resets lower it
/// again later); unlocks are never revoked. Returns how many spells were
/// newly unlocked.
pub fn evaluate_spell_unlocks(
    wizard: &mut Wizard,
    tasks: &[Task],
    just_completed: &str,
    spells: &[Spell],
) -> usize {
    let completed = completed_task_count(tasks);
    let mut unlocked = 0;

    for spell in spells {
        if wizard.has_spell(&spell.id) {
            continue;
        }
        let req = &spell.unlock;
        let level_met = req.level.is_some_and(|l| wizard.level >= l);
        let count_met = req.tasks_completed.is_some_and(|c| completed >= c);
        let special_met = req.special_task.as_deref() == Some(just_completed);

        if level_met || count_met || special_met {
            debug!(spell = %spell.id, "spell unlocked");
            wizard.spells.push(spell.id.clone());
            unlocked += 1;
        }
    }
    unlocked
}

// ═══════════════════════════════════════════════════════════════════════════
// Goals
// ═══════════════════════════════════════════════════════════════════════════

/// The goal list as shown to the player: catalog milestones (claim state
/// taken from the wizard's overrides) followed by the wizard's own goals
/// that have no catalog counterpart, in stored order.
///
/// Catalog definitions win for everything except the claimed bit, so a
/// stale stored copy of a builtin can never fork its definition.
pub fn merged_goals(wizard: &Wizard, catalog_goals: &[Goal]) -> Vec<Goal> {
    let mut merged: Vec<Goal> = Vec::with_capacity(catalog_goals.len() + wizard.goals.len());

    for def in catalog_goals {
        let mut goal = def.clone();
        goal.claimed = wizard
            .goals
            .iter()
            .find(|g| g.id == def.id)
            .and_then(|g| g.claimed);
        merged.push(goal);
    }

    merged.extend(
        wizard
            .goals
            .iter()
            .filter(|g| !catalog_goals.iter().any(|d| d.id == g.id))
            .cloned(),
    );
    merged
}

/// Claim a goal's payout. Idempotent: rewards pay out exactly once.
///
/// Builtin milestones require the completed-task count to have reached the
/// target and record a claim override on the wizard; custom goals are
/// claimed in place. Unknown ids, unmet targets and repeat claims are
/// silent no-ops returning false.
pub fn claim_goal(
    wizard: &mut Wizard,
    tasks: &[Task],
    goal_id: &str,
    catalog_goals: &[Goal],
) -> bool {
    if let Some(def) = catalog_goals.iter().find(|d| d.id == goal_id) {
        return claim_builtin(wizard, tasks, def);
    }

    let Some(idx) = wizard.goals.iter().position(|g| g.id == goal_id) else {
        return false;
    };
    if wizard.goals[idx].is_claimed() {
        return false;
    }
    wizard.goals[idx].claimed = Some(true);
    let rewards = wizard.goals[idx].rewards.clone();
    apply_rewards(wizard, &rewards);
    debug!(goal = %goal_id, "custom goal claimed");
    true
}

fn claim_builtin(wizard: &mut Wizard, tasks: &[Task], def: &Goal) -> bool {
    if wizard.goals.iter().any(|g| g.id == def.id && g.is_claimed()) {
        return false;
    }
    if completed_task_count(tasks) < def.target_count.unwrap_or(1) {
        return false;
    }

    apply_rewards(wizard, &def.rewards);

    // Insert or replace the claim override for this id.
    let mut record = def.clone();
    record.claimed = Some(true);
    match wizard.goals.iter().position(|g| g.id == def.id) {
        Some(idx) => wizard.goals[idx] = record,
        None => wizard.goals.push(record),
    }
    debug!(goal = %def.id, "milestone claimed");
    true
}

// ═══════════════════════════════════════════════════════════════════════════
// Recurrence
// ═══════════════════════════════════════════════════════════════════════════

/// Re-arm completed recurring tasks whose window has elapsed at `now`.
///
/// Runs on every profile load and switch. Returns how many tasks were
/// reset so callers can decide whether to persist.
pub fn reset_recurring_tasks(tasks: &mut [Task], now: DateTime<Utc>) -> usize {
    let mut reset = 0;
    for task in tasks.iter_mut() {
        if timegate::should_recur(task, now) {
            task.completed = false;
            task.last_completed = None;
            reset += 1;
        }
    }
    if reset > 0 {
        debug!(count = reset, "recurring tasks re-armed");
    }
    reset
}
