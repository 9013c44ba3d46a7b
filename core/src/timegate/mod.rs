//! Pure time-gate math for tasks.
//!
//! Cooldowns, focus timers and recurrence windows are all evaluated here
//! against an explicit `now`; nothing in this module reads the clock. The
//! session loop picks the instant once per operation and threads it
//! through, which keeps every rule deterministic and testable.

use chrono::{DateTime, Utc};
use grimoire_types::{RecurrenceKind, Task};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;


/// Milliseconds of cooldown left before the task can be completed again.
///
/// Zero when the task has never been completed or carries no cooldown. A
/// `last_completed` in the future (clock skew across devices) clamps to the
/// full window rather than going negative.
pub fn cooldown_remaining_ms(task: &Task, now: DateTime<Utc>) -> i64 {
    let (Some(last), Some(hours)) = (task.last_completed, task.cooldown_hours) else {
        return 0;
    };
    let window = i64::from(hours) * HOUR_MS;
    let elapsed = (now - last).num_milliseconds();
    (window - elapsed).clamp(0, window)
}

/// Whether the task's cooldown gate is still closed at `now`.
///
/// At exactly the boundary the task is ready again.
pub fn is_on_cooldown(task: &Task, now: DateTime<Utc>) -> bool {
    cooldown_remaining_ms(task, now) > 0
}

/// Milliseconds left on a running focus timer.
///
/// Zero when no timer is running or the task has no timer duration.
pub fn timer_remaining_ms(task: &Task, now: DateTime<Utc>) -> i64 {
    if !task.timer_running() {
        return 0;
    }
    let (Some(started), Some(minutes)) = (task.timer_started_at, task.timer_duration_minutes)
    else {
        return 0;
    };
    let window = i64::from(minutes) * MINUTE_MS;
    let elapsed = (now - started).num_milliseconds();
    (window - elapsed).clamp(0, window)
}

/// Whether a running timer has used up its full duration at `now`.
///
/// Only ever true while the timer flags are still set; the sweep clears
/// them after acting on it.
pub fn is_timer_complete(task: &Task, now: DateTime<Utc>) -> bool {
    task.timer_running()
        && task.timer_duration_minutes.is_some()
        && timer_remaining_ms(task, now) == 0
}

/// Whether a completed recurring task's window has elapsed at `now` and it
/// should re-arm.
pub fn should_recur(task: &Task, now: DateTime<Utc>) -> bool {
    if !task.completed {
        return false;
    }
    let Some(last) = task.last_completed else {
        return false;
    };
    let window = match task.recurrence_kind() {
        RecurrenceKind::None => return false,
        RecurrenceKind::Daily => DAY_MS,
        RecurrenceKind::Weekly => WEEK_MS,
    };
    (now - last).num_milliseconds() >= window
}
