//! Builtin catalog data: seed tasks, the spell book, and milestone goals.
//!
//! Definitions ship embedded in the binary as TOML and are parsed once on
//! first access. Accessors hand out fresh clones (or a static slice for
//! read-only consumers); nothing here is mutated at runtime, so a new
//! profile can always be seeded from a pristine copy.

use std::sync::LazyLock;

use grimoire_types::{Goal, Spell, Task};
use serde::Deserialize;

const TASKS_TOML: &str = include_str!("tasks.toml");
const SPELLS_TOML: &str = include_str!("spells.toml");
const GOALS_TOML: &str = include_str!("goals.toml");

/// Root structure of an embedded catalog file.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "task")]
    tasks: Vec<Task>,
    #[serde(default, rename = "spell")]
    spells: Vec<Spell>,
    #[serde(default, rename = "goal")]
    goals: Vec<Goal>,
}

fn parse(contents: &str, which: &str) -> CatalogFile {
    // Embedded compile-time data; a parse failure here is a packaging
    // defect caught by the tests below.
    toml::from_str(contents).unwrap_or_else(|e| panic!("invalid builtin catalog {which}: {e}"))
}

static SEED_TASKS: LazyLock<Vec<Task>> = LazyLock::new(|| parse(TASKS_TOML, "tasks.toml").tasks);
static SPELLS: LazyLock<Vec<Spell>> = LazyLock::new(|| parse(SPELLS_TOML, "spells.toml").spells);
static BUILTIN_GOALS: LazyLock<Vec<Goal>> =
    LazyLock::new(|| parse(GOALS_TOML, "goals.toml").goals);

/// Fresh copy of the builtin task list for seeding a profile.
///
/// Every call returns pristine records: not completed, no timestamps, no
/// running timers. Callers own and mutate their copy.
pub fn seed_tasks() -> Vec<Task> {
    SEED_TASKS.clone()
}

/// The full spell book.
///
/// Spell definitions are immutable catalog data; a wizard only records
/// which ids it has unlocked.
pub fn spell_catalog() -> &'static [Spell] {
    &SPELLS
}

/// Fresh copies of the builtin milestone goals, claim state unset.
///
/// Per-profile claim state lives on the wizard as override records; the
/// definitions here are never mutated.
pub fn builtin_goals() -> Vec<Goal> {
    BUILTIN_GOALS.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grimoire_types::{GoalKind, RecurrenceKind};

    #[test]
    fn test_embedded_files_parse() {
        assert_eq!(seed_tasks().len(), 6);
        assert_eq!(spell_catalog().len(), 6);
        assert_eq!(builtin_goals().len(), 3);
    }

    #[test]
    fn test_seed_tasks_are_pristine() {
        for task in seed_tasks() {
            assert!(!task.completed, "seed task {} starts completed", task.id);
            assert!(task.last_completed.is_none());
            assert!(task.cooldown_hours.is_some());
            assert_eq!(task.recurrence_kind(), RecurrenceKind::Daily);
            assert!(!task.timer_running());
        }
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<String> = seed_tasks().into_iter().map(|t| t.id).collect();
        ids.extend(spell_catalog().iter().map(|s| s.id.clone()));
        ids.extend(builtin_goals().into_iter().map(|g| g.id));
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_every_spell_has_an_unlock_criterion() {
        for spell in spell_catalog() {
            let u = &spell.unlock;
            assert!(
                u.level.is_some() || u.tasks_completed.is_some() || u.special_task.is_some(),
                "spell {} is not unlockable",
                spell.id
            );
        }
    }

    #[test]
    fn test_special_task_references_resolve() {
        let tasks = seed_tasks();
        for spell in spell_catalog() {
            if let Some(task_id) = &spell.unlock.special_task {
                assert!(
                    tasks.iter().any(|t| &t.id == task_id),
                    "spell {} references unknown task {}",
                    spell.id,
                    task_id
                );
            }
        }
    }

    #[test]
    fn test_builtin_goals_are_countable_milestones() {
        for goal in builtin_goals() {
            assert_eq!(goal.kind, GoalKind::TotalTasks);
            assert!(goal.target_count.is_some(), "goal {} has no target", goal.id);
            assert!(goal.claimed.is_none());
            assert!(goal.is_custom.is_none());
        }
    }
}
