//! Tests for progression rules: rewards, leveling, unlocks, goals,
//! recurrence resets.

use chrono::{DateTime, Duration, TimeZone, Utc};
use grimoire_types::{
    Goal, GoalKind, RecurrenceKind, Rewards, Spell, Task, UnlockRequirement, Wizard,
};

use super::*;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap()
}

fn xp(amount: u64) -> Rewards {
    Rewards {
        experience: amount,
        mana: None,
        mind: None,
    }
}

/// Create a minimal task for testing
fn make_task(id: &str, rewards: Rewards) -> Task {
    Task {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        duration_minutes: 30,
        rewards,
        icon: "📝".to_string(),
        completed: false,
        last_completed: None,
        cooldown_hours: None,
        is_custom: None,
        recurrence: None,
        created_at: None,
        has_timer: None,
        timer_duration_minutes: None,
        timer_started_at: None,
        timer_active: None,
    }
}

fn make_spell(id: &str, unlock: UnlockRequirement) -> Spell {
    Spell {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        icon: "✨".to_string(),
        unlock,
    }
}

fn level_unlock(level: u32) -> UnlockRequirement {
    UnlockRequirement {
        level: Some(level),
        ..Default::default()
    }
}

fn count_unlock(count: u32) -> UnlockRequirement {
    UnlockRequirement {
        tasks_completed: Some(count),
        ..Default::default()
    }
}

fn special_unlock(task_id: &str) -> UnlockRequirement {
    UnlockRequirement {
        special_task: Some(task_id.to_string()),
        ..Default::default()
    }
}

fn make_milestone(id: &str, target: u32, rewards: Rewards) -> Goal {
    Goal {
        id: id.to_string(),
        name: id.to_string(),
        description: None,
        kind: GoalKind::TotalTasks,
        target_count: Some(target),
        rewards,
        created_at: None,
        claimed: None,
        is_custom: None,
    }
}

fn make_custom_goal(id: &str, rewards: Rewards) -> Goal {
    Goal {
        id: id.to_string(),
        name: id.to_string(),
        description: Some("personal".to_string()),
        kind: GoalKind::Custom,
        target_count: None,
        rewards,
        created_at: Some(base_time()),
        claimed: Some(false),
        is_custom: Some(true),
    }
}

// ─── Rewards & Leveling ─────────────────────────────────────────────────────

#[test]
fn test_big_reward_levels_up_twice() {
    let mut wizard = Wizard::new("Elandra");
    apply_rewards(&mut wizard, &xp(250));

    // 250 XP from level 1: 100 to level 2, then 150 to level 3.
    assert_eq!(wizard.level, 3);
    assert_eq!(wizard.experience, 0);
    assert_eq!(wizard.experience_to_next, 225);
    // Two level-ups grow each ceiling by 2 and refill the pools.
    assert_eq!((wizard.mana, wizard.max_mana), (14, 14));
    assert_eq!((wizard.mind, wizard.max_mind), (14, 14));
}

#[test]
fn test_partial_reward_banks_experience() {
    let mut wizard = Wizard::new("Elandra");
    apply_rewards(&mut wizard, &xp(60));

    assert_eq!(wizard.level, 1);
    assert_eq!(wizard.experience, 60);
    assert_eq!(wizard.experience_to_next, 100);
}

#[test]
fn test_threshold_floor_is_integer() {
    let mut wizard = Wizard::new("Elandra");
    wizard.experience_to_next = 225;
    apply_rewards(&mut wizard, &xp(225));

    // floor(225 * 1.5) = 337, not 337.5 rounded up
    assert_eq!(wizard.level, 2);
    assert_eq!(wizard.experience_to_next, 337);
}

#[test]
fn test_resource_reward_raises_ceiling_then_refills() {
    // Full pool: the whole amount lands on both ceiling and current.
    let mut wizard = Wizard::new("Elandra");
    apply_rewards(
        &mut wizard,
        &Rewards {
            experience: 0,
            mana: Some(5),
            mind: None,
        },
    );
    assert_eq!((wizard.mana, wizard.max_mana), (15, 15));
    assert_eq!((wizard.mind, wizard.max_mind), (10, 10));

    // Drained pool: ceiling still rises by the amount, current only by it.
    let mut wizard = Wizard::new("Elandra");
    wizard.mind = 3;
    apply_rewards(
        &mut wizard,
        &Rewards {
            experience: 0,
            mana: None,
            mind: Some(5),
        },
    );
    assert_eq!((wizard.mind, wizard.max_mind), (8, 15));
}

#[test]
fn test_zero_resource_reward_is_inert() {
    let mut wizard = Wizard::new("Elandra");
    apply_rewards(
        &mut wizard,
        &Rewards {
            experience: 0,
            mana: Some(0),
            mind: Some(0),
        },
    );
    assert_eq!((wizard.mana, wizard.max_mana), (10, 10));
    assert_eq!((wizard.mind, wizard.max_mind), (10, 10));
}

#[test]
fn test_resource_reward_applies_before_leveling() {
    let mut wizard = Wizard::new("Elandra");
    apply_rewards(
        &mut wizard,
        &Rewards {
            experience: 100,
            mana: Some(5),
            mind: None,
        },
    );

    // Ceiling raise (+5) lands first, then the level-up adds +2 and refills.
    assert_eq!(wizard.level, 2);
    assert_eq!((wizard.mana, wizard.max_mana), (17, 17));
    assert_eq!((wizard.mind, wizard.max_mind), (12, 12));
}

#[test]
fn test_corrupt_zero_threshold_does_not_hang() {
    let mut wizard = Wizard::new("Elandra");
    wizard.experience_to_next = 0;
    apply_rewards(&mut wizard, &xp(1_000));

    assert_eq!(wizard.level, 1);
    assert_eq!(wizard.experience, 1_000);
}

// ─── Task Completion ────────────────────────────────────────────────────────

#[test]
fn test_complete_task_stamps_and_pays() {
    let now = base_time();
    let mut wizard = Wizard::new("Elandra");
    let mut tasks = vec![
        make_task("workout", xp(25)),
        make_task("study", xp(15)),
    ];

    assert!(complete_task(&mut wizard, &mut tasks, "workout", &[], now));

    assert!(tasks[0].completed);
    assert_eq!(tasks[0].last_completed, Some(now));
    assert_eq!(wizard.experience, 25);
    // The other record is untouched.
    assert!(!tasks[1].completed);
    assert_eq!(tasks[1].last_completed, None);
}

#[test]
fn test_complete_task_on_cooldown_changes_nothing() {
    let now = base_time();
    let mut wizard = Wizard::new("Elandra");
    let mut task = make_task("workout", xp(25));
    task.cooldown_hours = Some(24);
    task.last_completed = Some(now - Duration::hours(2));
    let mut tasks = vec![task];

    let wizard_before = wizard.clone();
    let tasks_before = tasks.clone();

    assert!(!complete_task(&mut wizard, &mut tasks, "workout", &[], now));
    assert_eq!(wizard, wizard_before);
    assert_eq!(tasks, tasks_before);
}

#[test]
fn test_complete_task_rejects_repeat_and_unknown() {
    let now = base_time();
    let mut wizard = Wizard::new("Elandra");
    let mut tasks = vec![make_task("workout", xp(25))];

    assert!(complete_task(&mut wizard, &mut tasks, "workout", &[], now));
    assert!(!complete_task(&mut wizard, &mut tasks, "workout", &[], now));
    assert!(!complete_task(&mut wizard, &mut tasks, "no-such-task", &[], now));
    assert_eq!(wizard.experience, 25);
}

#[test]
fn test_complete_task_ready_again_after_cooldown() {
    let now = base_time();
    let mut wizard = Wizard::new("Elandra");
    let mut task = make_task("workout", xp(25));
    task.cooldown_hours = Some(24);
    task.last_completed = Some(now - Duration::hours(25));
    let mut tasks = vec![task];

    assert!(complete_task(&mut wizard, &mut tasks, "workout", &[], now));
    assert_eq!(tasks[0].last_completed, Some(now));
}

// ─── Spell Unlocks ──────────────────────────────────────────────────────────

#[test]
fn test_unlock_by_level() {
    let now = base_time();
    let spells = vec![
        make_spell("fireball", level_unlock(2)),
        make_spell("lightning", level_unlock(5)),
    ];
    let mut wizard = Wizard::new("Elandra");
    let mut tasks = vec![make_task("workout", xp(100))];

    assert!(complete_task(&mut wizard, &mut tasks, "workout", &spells, now));

    assert_eq!(wizard.level, 2);
    assert!(wizard.has_spell("fireball"));
    assert!(!wizard.has_spell("lightning"));
}

#[test]
fn test_one_reward_can_unlock_several_levels_of_spells() {
    let now = base_time();
    let spells = vec![
        make_spell("fireball", level_unlock(2)),
        make_spell("teleport", level_unlock(3)),
    ];
    let mut wizard = Wizard::new("Elandra");
    // 250 XP crosses two thresholds in one completion.
    let mut tasks = vec![make_task("epic", xp(250))];

    assert!(complete_task(&mut wizard, &mut tasks, "epic", &spells, now));

    assert_eq!(wizard.level, 3);
    assert!(wizard.has_spell("fireball"));
    assert!(wizard.has_spell("teleport"));
}

#[test]
fn test_unlock_by_completed_count_uses_current_count() {
    let spells = vec![make_spell("healing", count_unlock(3))];
    let mut wizard = Wizard::new("Elandra");
    let mut tasks = vec![
        make_task("a", xp(1)),
        make_task("b", xp(1)),
        make_task("c", xp(1)),
    ];
    tasks[0].completed = true;
    tasks[1].completed = true;

    evaluate_spell_unlocks(&mut wizard, &tasks, "b", &spells);
    assert!(!wizard.has_spell("healing"));

    tasks[2].completed = true;
    evaluate_spell_unlocks(&mut wizard, &tasks, "c", &spells);
    assert!(wizard.has_spell("healing"));
}

#[test]
fn test_unlock_by_special_task() {
    let spells = vec![make_spell("invisibility", special_unlock("meditation"))];
    let mut wizard = Wizard::new("Elandra");
    let tasks = vec![make_task("meditation", xp(20))];

    evaluate_spell_unlocks(&mut wizard, &tasks, "study", &spells);
    assert!(!wizard.has_spell("invisibility"));

    evaluate_spell_unlocks(&mut wizard, &tasks, "meditation", &spells);
    assert!(wizard.has_spell("invisibility"));
}

#[test]
fn test_unlocks_are_monotonic_and_deduplicated() {
    let spells = vec![make_spell("healing", count_unlock(1))];
    let mut wizard = Wizard::new("Elandra");
    let mut tasks = vec![make_task("a", xp(1))];
    tasks[0].completed = true;

    assert_eq!(evaluate_spell_unlocks(&mut wizard, &tasks, "a", &spells), 1);
    assert_eq!(evaluate_spell_unlocks(&mut wizard, &tasks, "a", &spells), 0);

    // A recurrence reset lowers the count but never revokes the spell.
    tasks[0].completed = false;
    assert_eq!(evaluate_spell_unlocks(&mut wizard, &tasks, "a", &spells), 0);
    assert_eq!(wizard.spells, vec!["healing".to_string()]);
}

// ─── Goals ──────────────────────────────────────────────────────────────────

#[test]
fn test_merged_goals_joins_catalog_and_custom() {
    let catalog = vec![
        make_milestone("milestone-5", 5, xp(50)),
        make_milestone("milestone-15", 15, xp(150)),
    ];
    let mut wizard = Wizard::new("Elandra");

    // Claim override for one builtin plus one custom goal.
    let mut claimed = make_milestone("milestone-5", 5, xp(50));
    claimed.claimed = Some(true);
    wizard.goals.push(claimed);
    wizard.goals.push(make_custom_goal("goal-1", xp(100)));

    let merged = merged_goals(&wizard, &catalog);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].id, "milestone-5");
    assert!(merged[0].is_claimed());
    assert_eq!(merged[1].id, "milestone-15");
    assert!(!merged[1].is_claimed());
    assert_eq!(merged[2].id, "goal-1");
}

#[test]
fn test_merged_goals_definition_fields_come_from_catalog() {
    let catalog = vec![make_milestone("milestone-5", 5, xp(50))];
    let mut wizard = Wizard::new("Elandra");

    // A stale stored override with tampered fields.
    let mut stale = make_milestone("milestone-5", 99, xp(9_999));
    stale.name = "old name".to_string();
    stale.claimed = Some(true);
    wizard.goals.push(stale);

    let merged = merged_goals(&wizard, &catalog);
    assert_eq!(merged[0].name, "milestone-5");
    assert_eq!(merged[0].target_count, Some(5));
    assert_eq!(merged[0].rewards, xp(50));
    assert!(merged[0].is_claimed());
}

#[test]
fn test_builtin_goal_claim_gated_by_count() {
    let catalog = vec![make_milestone("milestone-5", 5, xp(50))];
    let mut wizard = Wizard::new("Elandra");
    let mut tasks: Vec<Task> = (0..5)
        .map(|i| make_task(&format!("t{i}"), xp(1)))
        .collect();
    for task in tasks.iter_mut().take(4) {
        task.completed = true;
    }

    // 4 of 5: nothing happens.
    assert!(!claim_goal(&mut wizard, &tasks, "milestone-5", &catalog));
    assert_eq!(wizard.experience, 0);
    assert!(wizard.goals.is_empty());

    // 5 of 5: pays once and records the override.
    tasks[4].completed = true;
    assert!(claim_goal(&mut wizard, &tasks, "milestone-5", &catalog));
    assert_eq!(wizard.experience, 50);
    assert_eq!(wizard.goals.len(), 1);
    assert!(wizard.goals[0].is_claimed());

    // Second claim is a no-op; no double payout.
    assert!(!claim_goal(&mut wizard, &tasks, "milestone-5", &catalog));
    assert_eq!(wizard.experience, 50);
    assert_eq!(wizard.goals.len(), 1);
}

#[test]
fn test_custom_goal_claim_is_idempotent() {
    let catalog = vec![make_milestone("milestone-5", 5, xp(50))];
    let mut wizard = Wizard::new("Elandra");
    wizard.goals.push(make_custom_goal("goal-1", xp(100)));

    assert!(claim_goal(&mut wizard, &[], "goal-1", &catalog));
    assert_eq!(wizard.experience, 100);
    assert_eq!(wizard.level, 2);

    assert!(!claim_goal(&mut wizard, &[], "goal-1", &catalog));
    assert_eq!(wizard.level, 2);
}

#[test]
fn test_claim_unknown_goal_is_a_noop() {
    let mut wizard = Wizard::new("Elandra");
    let before = wizard.clone();

    assert!(!claim_goal(&mut wizard, &[], "no-such-goal", &[]));
    assert_eq!(wizard, before);
}

// ─── Recurrence ─────────────────────────────────────────────────────────────

#[test]
fn test_reset_recurring_rearms_elapsed_tasks() {
    let now = base_time();
    let mut daily = make_task("study", xp(15));
    daily.completed = true;
    daily.recurrence = Some(RecurrenceKind::Daily);
    daily.last_completed = Some(now - Duration::hours(25));

    let mut fresh_daily = make_task("workout", xp(25));
    fresh_daily.completed = true;
    fresh_daily.recurrence = Some(RecurrenceKind::Daily);
    fresh_daily.last_completed = Some(now - Duration::hours(2));

    let mut one_shot = make_task("quest", xp(50));
    one_shot.completed = true;
    one_shot.recurrence = Some(RecurrenceKind::None);
    one_shot.last_completed = Some(now - Duration::days(30));

    let mut tasks = vec![daily, fresh_daily, one_shot];
    assert_eq!(reset_recurring_tasks(&mut tasks, now), 1);

    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].last_completed, None);
    assert!(tasks[1].completed, "recent daily must stay completed");
    assert!(tasks[2].completed, "one-shot never re-arms");
}

#[test]
fn test_reset_recurring_weekly() {
    let now = base_time();
    let mut weekly = make_task("review", xp(40));
    weekly.completed = true;
    weekly.recurrence = Some(RecurrenceKind::Weekly);
    weekly.last_completed = Some(now - Duration::days(8));

    let mut tasks = vec![weekly];
    assert_eq!(reset_recurring_tasks(&mut tasks, now), 1);
    assert!(!tasks[0].completed);
}
